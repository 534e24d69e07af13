// Copyright (c) 2024 Mike Tsao

use super::{select_instruments, validate_probability, Transform};
use crate::{types::Score, util::Rng};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Randomly deletes some of each selected instrument's notes.
///
/// `p` is the maximum fraction of notes that may disappear: the survivor
/// count is `ceil(uniform(1 - p, 1.0) * deletable)`, where `deletable`
/// excludes the last note when `can_delete_last_note` is false (keeping the
/// instrument's total duration unchanged). Survivors are drawn without
/// replacement and keep their original relative order.
#[derive(Builder, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[builder(build_fn(validate = "Self::validate"))]
#[serde(rename_all = "kebab-case")]
pub struct NoteDelete {
    /// When false, the last note survives every pass, so the instrument's
    /// nominal end time never moves.
    #[builder(default = "true")]
    can_delete_last_note: bool,
    /// The fraction of candidate instruments that may be touched.
    #[builder(default = "1.0")]
    p_instruments: f64,
    /// The maximum fraction of notes that may be deleted per instrument.
    #[builder(default = "0.2")]
    p: f64,
}
impl NoteDeleteBuilder {
    fn validate(&self) -> Result<(), String> {
        validate_probability(self.p, "p")?;
        validate_probability(self.p_instruments, "p_instruments")
    }
}
impl NoteDelete {
    /// How many of `deletable` notes survive, given one uniform draw from
    /// `[1 - p, 1.0]`.
    pub(crate) fn preserved_count(draw: f64, deletable: usize) -> usize {
        (draw * deletable as f64).ceil() as usize
    }
}
impl Transform for NoteDelete {
    fn apply(&self, score: &mut Score, rng: &mut Rng) {
        for index in select_instruments(score, self.p_instruments, rng) {
            let instrument = &mut score.instruments[index];
            if instrument.notes.is_empty() {
                log::debug!(
                    "NoteDelete has no notes to delete on instrument {:?}; skipping",
                    instrument.name
                );
                continue;
            }

            let deletable = if self.can_delete_last_note {
                instrument.notes.len()
            } else {
                instrument.notes.len() - 1
            };
            let preserved = Self::preserved_count(rng.uniform(1.0 - self.p, 1.0), deletable);
            if preserved == 0 {
                log::debug!(
                    "NoteDelete would preserve no notes on instrument {:?}; skipping",
                    instrument.name
                );
                continue;
            }

            let mut survivors = rng.sample_indices(deletable, preserved);
            survivors.sort_unstable();
            if !self.can_delete_last_note {
                survivors.push(deletable);
            }

            let preserved_notes: Vec<_> = survivors
                .iter()
                .map(|&note_index| instrument.notes[note_index].clone())
                .collect();
            instrument.notes = preserved_notes;
        }
    }
}
