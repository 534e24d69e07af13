// Copyright (c) 2024 Mike Tsao

use super::{select_instruments, validate_probability, Transform};
use crate::{types::Score, util::Rng};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use strum_macros::{EnumIter, EnumString, IntoStaticStr};

/// Which way a note's duration is allowed to change.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    EnumIter,
    EnumString,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "kebab-case")]
pub enum DurationShiftMode {
    /// Notes may be shrunk or extended.
    #[default]
    Both,
    /// Notes may only be shrunk.
    Shrink,
    /// Notes may only be extended.
    Extend,
}

/// Randomly changes note durations while keeping onsets intact.
///
/// Only the offset moves. It is clamped from below so that at least
/// `min_duration` of the note survives a shrink, and from above by the
/// instrument end time captured before any edits, so an extension can't push
/// a note past the nominal instrument end.
#[derive(Builder, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[builder(build_fn(validate = "Self::validate"))]
#[serde(rename_all = "kebab-case")]
pub struct DurationShift {
    /// The largest allowed duration change, in seconds.
    max_shift: f64,
    /// Whether notes may shrink, extend, or either.
    #[builder(default)]
    mode: DurationShiftMode,
    /// The least duration a note can have after shrinking, in seconds.
    #[builder(default = "1e-6")]
    min_duration: f64,
    /// The fraction of candidate instruments that may be touched.
    #[builder(default = "1.0")]
    p_instruments: f64,
    /// The fraction of each selected instrument's notes that may change.
    #[builder(default = "0.2")]
    p: f64,
}
impl DurationShiftBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(max_shift) = self.max_shift {
            if !max_shift.is_finite() || max_shift < 0.0 {
                return Err(format!(
                    "max_shift must be a finite non-negative number of seconds, got {max_shift}"
                ));
            }
        }
        if let Some(min_duration) = self.min_duration {
            if !min_duration.is_finite() || min_duration < 0.0 {
                return Err(format!(
                    "min_duration must be a finite non-negative number of seconds, got {min_duration}"
                ));
            }
        }
        validate_probability(self.p, "p")?;
        validate_probability(self.p_instruments, "p_instruments")
    }
}
impl DurationShift {
    fn delta(&self, rng: &mut Rng) -> f64 {
        match self.mode {
            DurationShiftMode::Both => rng.uniform(-self.max_shift, self.max_shift),
            DurationShiftMode::Shrink => rng.uniform(-self.max_shift, 0.0),
            DurationShiftMode::Extend => rng.uniform(0.0, self.max_shift),
        }
    }
}
impl Transform for DurationShift {
    fn apply(&self, score: &mut Score, rng: &mut Rng) {
        for index in select_instruments(score, self.p_instruments, rng) {
            let instrument = &mut score.instruments[index];
            let count = (self.p * instrument.notes.len() as f64) as usize;
            if count == 0 {
                log::debug!(
                    "DurationShift has no notes to reshape on instrument {:?}; skipping",
                    instrument.name
                );
                continue;
            }

            let end_time = instrument.end_time();
            for note_index in rng.sample_indices(instrument.notes.len(), count) {
                let note = &mut instrument.notes[note_index];
                // max-then-min: if the bounds ever cross (a note that starts
                // at the very end of the instrument), the upper bound wins.
                note.end = (note.end + self.delta(rng))
                    .max(note.start + self.min_duration)
                    .min(end_time);
            }
        }
    }
}
