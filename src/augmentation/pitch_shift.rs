// Copyright (c) 2024 Mike Tsao

use super::{select_instruments, validate_probability, ShiftDirection, Transform};
use crate::{types::Score, util::Rng};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Randomly transposes some of each selected instrument's notes.
///
/// Within each selected instrument, `floor(p * note_count)` notes are drawn
/// without replacement; each gets an independent uniform integer shift,
/// restricted by `mode`, and is then clamped to the valid MIDI key range.
///
/// ```
/// use midimorph::prelude::*;
///
/// // Transpose up to a tritone in either direction, on 20% of notes.
/// let transform = PitchShiftBuilder::default()
///     .max_shift(6)
///     .build()
///     .unwrap();
/// ```
#[derive(Builder, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[builder(build_fn(validate = "Self::validate"))]
#[serde(rename_all = "kebab-case")]
pub struct PitchShift {
    /// The largest allowed transposition, in semitones. At most 127.
    max_shift: u8,
    /// Whether notes may move up, down, or either way.
    #[builder(default)]
    mode: ShiftDirection,
    /// The fraction of candidate instruments that may be touched.
    #[builder(default = "1.0")]
    p_instruments: f64,
    /// The fraction of each selected instrument's notes that may be
    /// transposed.
    #[builder(default = "0.2")]
    p: f64,
}
impl PitchShiftBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(max_shift) = self.max_shift {
            if max_shift > 127 {
                return Err(format!(
                    "MIDI notes cannot be shifted by more than 127, got {max_shift}"
                ));
            }
        }
        validate_probability(self.p, "p")?;
        validate_probability(self.p_instruments, "p_instruments")
    }
}
impl PitchShift {
    fn shifted_key(&self, key: u8, rng: &mut Rng) -> u8 {
        let max_shift = self.max_shift as i32;
        let delta = match self.mode {
            ShiftDirection::Both => rng.rand_int_inclusive(-max_shift, max_shift),
            ShiftDirection::Up => rng.rand_int_inclusive(0, max_shift),
            ShiftDirection::Down => rng.rand_int_inclusive(-max_shift, 0),
        };
        (key as i32 + delta).clamp(0, 127) as u8
    }
}
impl Transform for PitchShift {
    fn apply(&self, score: &mut Score, rng: &mut Rng) {
        for index in select_instruments(score, self.p_instruments, rng) {
            let instrument = &mut score.instruments[index];
            let count = (self.p * instrument.notes.len() as f64) as usize;
            if count == 0 {
                log::debug!(
                    "PitchShift has no notes to transpose on instrument {:?}; skipping",
                    instrument.name
                );
                continue;
            }

            // Select first, write second.
            for note_index in rng.sample_indices(instrument.notes.len(), count) {
                let note = &mut instrument.notes[note_index];
                note.key = self.shifted_key(note.key, rng);
            }
        }
    }
}
