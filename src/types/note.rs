// Copyright (c) 2024 Mike Tsao

use serde::{Deserialize, Serialize};

/// A [Note] is a single played note in the seconds domain. It knows which
/// key it's playing (a MIDI key value), how hard (a MIDI velocity), and when
/// (start/end) it's supposed to sound, relative to time zero.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Note {
    /// The MIDI key code for the note. 69 is (usually) A4. Valid values are
    /// 0..=127.
    pub key: u8,
    /// The MIDI velocity. Valid values are 0..=127.
    pub velocity: u8,
    /// When the note begins sounding, in seconds. Never negative.
    pub start: f64,
    /// When the note stops sounding, in seconds. Never less than `start`.
    pub end: f64,
}
impl Note {
    /// Creates a [Note] from a key, velocity, and start/end pair.
    pub const fn new_with(key: u8, velocity: u8, start: f64, end: f64) -> Self {
        Self {
            key,
            velocity,
            start,
            end,
        }
    }

    /// How long the note sounds, in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// An [Instrument] is one track's note sequence plus the flag that marks
/// percussion tracks, which the mutation engine leaves alone.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Instrument {
    /// A human-readable track name.
    pub name: String,
    /// Percussion tracks are never candidates for note-level augmentation.
    pub is_percussion: bool,
    /// The notes, in insertion order. Parsers populate this in
    /// non-decreasing offset order, and [Instrument::end_time] relies on
    /// that; it is a documented precondition, not something we enforce.
    pub notes: Vec<Note>,
}
impl Instrument {
    /// Creates an empty [Instrument].
    pub fn new_with(name: &str, is_percussion: bool) -> Self {
        Self {
            name: name.to_string(),
            is_percussion,
            ..Default::default()
        }
    }

    /// The nominal end of this instrument: the offset of its last note, or
    /// zero if it has none. Meaningful only under the non-decreasing offset
    /// order precondition.
    pub fn end_time(&self) -> f64 {
        self.notes.last().map(|note| note.end).unwrap_or_default()
    }
}
