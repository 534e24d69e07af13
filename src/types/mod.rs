// Copyright (c) 2024 Mike Tsao

//! The document model that the mutation engine operates on.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{Instrument, Note, Score, Tempo, TickEvent, TickEventKind, TickTrack};
}

pub use {
    note::{Instrument, Note},
    score::{Score, TickEvent, TickEventKind, TickTrack},
    time::Tempo,
};

pub mod midi;

mod note;
mod score;
mod time;
