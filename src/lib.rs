// Copyright (c) 2024 Mike Tsao

#![deny(missing_docs, unused_imports, unused_variables)]
#![allow(rustdoc::private_intra_doc_links)]

//! Midimorph perturbs symbolic music, producing augmented variants of a
//! piece for machine-learning training pipelines, much as image augmentation
//! libraries jitter pictures.
//!
//! The library operates on a [Score](types::Score): a set of
//! [Instrument](types::Instrument)s holding seconds-domain notes, plus
//! tick-domain meta tracks carrying the tempo timeline. A
//! [Transform](augmentation::Transform) randomly mutates some aspect of a
//! score -- pitches, onsets, durations, the note population, or the tempo
//! timeline -- under clipping rules that keep the result a valid document.
//! [Compose] chains transforms into a pipeline that applies them in order.
//!
//! Parsing a MIDI file into a [Score](types::Score) and serializing one back
//! out are jobs for an external codec; [types::midi] exposes the conversions
//! such a codec needs.
//!
//! ```
//! use midimorph::prelude::*;
//!
//! let mut score = Score::default();
//! let mut lead = Instrument::new_with("lead", false);
//! lead.notes.push(Note::new_with(60, 100, 0.0, 0.5));
//! lead.notes.push(Note::new_with(64, 100, 0.5, 1.0));
//! score.instruments.push(lead);
//!
//! let pipeline = Compose::new(vec![
//!     Box::new(PitchShiftBuilder::default().max_shift(4).build().unwrap()),
//!     Box::new(NoteDeleteBuilder::default().build().unwrap()),
//! ]);
//!
//! // Same seed, same augmentation, every time.
//! let mut rng = Rng::new_with_seed(42);
//! pipeline.apply(&mut score, &mut rng);
//! ```

/// A collection of imports that are useful to users of this crate. `use
/// midimorph::prelude::*;` for easier onboarding.
pub mod prelude {
    pub use super::{augmentation::prelude::*, types::prelude::*, util::prelude::*};
}

pub use augmentation::Compose;

pub mod augmentation;
pub mod types;
pub mod util;
