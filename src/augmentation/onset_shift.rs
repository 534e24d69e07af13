// Copyright (c) 2024 Mike Tsao

use super::{select_instruments, validate_probability, Transform};
use crate::{types::Score, util::Rng};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use strum_macros::{EnumIter, EnumString, IntoStaticStr};

/// Which way an onset is allowed to move in time.
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
pub enum OnsetShiftMode {
    /// Notes may be advanced or delayed.
    #[default]
    Both,
    /// Notes may only be advanced (moved earlier).
    Advance,
    /// Notes may only be delayed (moved later).
    Delay,
}

/// Randomly moves note onsets while keeping each note's duration intact.
///
/// The new onset is clamped to `[0, instrument_end_time]`, where the
/// instrument end time is the last note's offset captured once per
/// instrument, before any edits. The offset is then recomputed as onset plus
/// the original duration, and is deliberately not re-clamped: a delayed note
/// may ring past the nominal instrument end. That asymmetry with
/// [DurationShift](super::DurationShift) is long-standing observed behavior
/// that downstream consumers tolerate, so it is kept.
#[derive(Builder, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[builder(build_fn(validate = "Self::validate"))]
#[serde(rename_all = "kebab-case")]
pub struct OnsetTimeShift {
    /// The farthest a note onset may move, in seconds.
    max_shift: f64,
    /// Whether notes may be advanced, delayed, or either.
    #[builder(default)]
    mode: OnsetShiftMode,
    /// The fraction of candidate instruments that may be touched.
    #[builder(default = "1.0")]
    p_instruments: f64,
    /// The fraction of each selected instrument's notes that may move.
    #[builder(default = "0.2")]
    p: f64,
}
impl OnsetTimeShiftBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(max_shift) = self.max_shift {
            if !max_shift.is_finite() || max_shift < 0.0 {
                return Err(format!(
                    "max_shift must be a finite non-negative number of seconds, got {max_shift}"
                ));
            }
        }
        validate_probability(self.p, "p")?;
        validate_probability(self.p_instruments, "p_instruments")
    }
}
impl OnsetTimeShift {
    fn shifted_onset(&self, onset: f64, end_time: f64, rng: &mut Rng) -> f64 {
        let delta = match self.mode {
            OnsetShiftMode::Both => rng.uniform(-self.max_shift, self.max_shift),
            OnsetShiftMode::Advance => rng.uniform(-self.max_shift, 0.0),
            OnsetShiftMode::Delay => rng.uniform(0.0, self.max_shift),
        };
        (onset + delta).max(0.0).min(end_time)
    }
}
impl Transform for OnsetTimeShift {
    fn apply(&self, score: &mut Score, rng: &mut Rng) {
        for index in select_instruments(score, self.p_instruments, rng) {
            let instrument = &mut score.instruments[index];
            let count = (self.p * instrument.notes.len() as f64) as usize;
            if count == 0 {
                log::debug!(
                    "OnsetTimeShift has no notes to move on instrument {:?}; skipping",
                    instrument.name
                );
                continue;
            }

            // Captured once; edits below must not move the goalposts.
            let end_time = instrument.end_time();
            for note_index in rng.sample_indices(instrument.notes.len(), count) {
                let note = &mut instrument.notes[note_index];
                let duration = note.duration();
                note.start = self.shifted_onset(note.start, end_time, rng);
                note.end = note.start + duration;
            }
        }
    }
}
