// Copyright (c) 2024 Mike Tsao

//! The randomized mutation engine: transforms that perturb a
//! [Score](crate::types::Score) to produce augmented training variants.
//!
//! Each transform is configured once, at construction, through a builder
//! that validates eagerly; a misconfigured transform never reaches
//! [Transform::apply]. At apply time, data-shape edge cases (no eligible
//! instruments, zero notes to sample, an empty document) are never errors:
//! the transform leaves the score unchanged and says so on the log's debug
//! channel, because augmentation runs unattended over heterogeneous corpora
//! where sparse documents are routine.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{
        Compose, DurationShift, DurationShiftBuilder, DurationShiftMode, NoteAdd, NoteAddBuilder,
        NoteDelete, NoteDeleteBuilder, OnsetShiftMode, OnsetTimeShift, OnsetTimeShiftBuilder,
        PitchShift, PitchShiftBuilder, ShiftDirection, TempoShift, TempoShiftBuilder, Transform,
    };
}

pub use {
    compose::Compose,
    duration_shift::{DurationShift, DurationShiftBuilder, DurationShiftMode},
    note_add::{NoteAdd, NoteAddBuilder},
    note_delete::{NoteDelete, NoteDeleteBuilder},
    onset_shift::{OnsetShiftMode, OnsetTimeShift, OnsetTimeShiftBuilder},
    pitch_shift::{PitchShift, PitchShiftBuilder},
    tempo_shift::{TempoShift, TempoShiftBuilder},
};

mod compose;
mod duration_shift;
mod note_add;
mod note_delete;
mod onset_shift;
mod pitch_shift;
mod tempo_shift;

use crate::{types::Score, util::Rng};
use serde::{Deserialize, Serialize};
use strum_macros::{EnumIter, EnumString, IntoStaticStr};

/// A [Transform] probabilistically alters a subset of a [Score]'s fields or
/// structure, in place. Transforms are stateless across invocations: all
/// knobs are fixed at construction, and every random draw comes from the
/// [Rng] the caller passes in.
pub trait Transform: core::fmt::Debug {
    /// Applies this transform to the given score.
    fn apply(&self, score: &mut Score, rng: &mut Rng);
}

/// Which way a symmetric shift is allowed to go.
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
pub enum ShiftDirection {
    /// The shift may go either way.
    #[default]
    Both,
    /// The shift may only increase the value.
    Up,
    /// The shift may only decrease the value.
    Down,
}

/// The epsilon that stands in for "the smallest possible draw" wherever a
/// uniform range must exclude zero.
pub(crate) const EPS: f64 = 1e-12;

/// The shared instrument-selection policy. Percussion instruments are never
/// candidates. When `p_instruments` is less than 1.0 and more than one
/// candidate exists, `floor(p_instruments * candidates)` instruments are
/// drawn without replacement; a zero draw skips the whole score for this
/// transform. Otherwise every candidate is selected.
///
/// Returns indices into `score.instruments` so that callers can mutate the
/// selected instruments afterward (select first, write second).
pub(crate) fn select_instruments(score: &Score, p_instruments: f64, rng: &mut Rng) -> Vec<usize> {
    let candidates: Vec<usize> = score
        .instruments
        .iter()
        .enumerate()
        .filter_map(|(index, instrument)| (!instrument.is_percussion).then_some(index))
        .collect();

    if candidates.is_empty() {
        log::warn!("score contains no non-percussion instruments");
        return candidates;
    }

    if p_instruments < 1.0 && candidates.len() > 1 {
        let count = (p_instruments * candidates.len() as f64) as usize;
        if count == 0 {
            log::debug!("no instruments left to randomly modify; skipping score");
            return Vec::default();
        }
        rng.sample_indices(candidates.len(), count)
            .into_iter()
            .map(|index| candidates[index])
            .collect()
    } else {
        candidates
    }
}

/// Shared builder check: a probability must lie in 0.0..=1.0.
pub(crate) fn validate_probability(value: Option<f64>, name: &str) -> Result<(), String> {
    if let Some(value) = value {
        if !(0.0..=1.0).contains(&value) {
            return Err(format!("{name} must be within 0.0..=1.0, got {value}"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Instrument, Note};
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    pub(crate) fn test_instrument(name: &str, is_percussion: bool, note_count: usize) -> Instrument {
        let mut instrument = Instrument::new_with(name, is_percussion);
        for i in 0..note_count {
            let start = i as f64 * 0.5;
            instrument
                .notes
                .push(Note::new_with(60, 100, start, start + 0.5));
        }
        instrument
    }

    pub(crate) fn test_score(note_count: usize) -> Score {
        let mut score = Score::default();
        score
            .instruments
            .push(test_instrument("lead", false, note_count));
        score
    }

    #[test]
    fn shift_direction_parses_lowercase_names() {
        assert_eq!(ShiftDirection::from_str("up"), Ok(ShiftDirection::Up));
        assert_eq!(ShiftDirection::from_str("down"), Ok(ShiftDirection::Down));
        assert_eq!(ShiftDirection::from_str("both"), Ok(ShiftDirection::Both));
        assert!(ShiftDirection::from_str("sideways").is_err());

        for direction in ShiftDirection::iter() {
            let name: &'static str = direction.into();
            assert_eq!(ShiftDirection::from_str(name), Ok(direction));
        }
    }

    #[test]
    fn selection_excludes_percussion() {
        let mut score = test_score(4);
        score.instruments.push(test_instrument("drums", true, 4));

        let mut rng = Rng::new_with_seed(1);
        let selected = select_instruments(&score, 1.0, &mut rng);
        assert_eq!(
            selected,
            vec![0],
            "Only the non-percussion instrument should be a candidate"
        );
    }

    #[test]
    fn selection_of_all_percussion_score_is_empty() {
        let mut score = Score::default();
        score.instruments.push(test_instrument("drums", true, 4));

        let mut rng = Rng::new_with_seed(1);
        assert!(select_instruments(&score, 1.0, &mut rng).is_empty());
    }

    #[test]
    fn selection_draws_partial_subset_without_replacement() {
        let mut score = Score::default();
        for i in 0..10 {
            score
                .instruments
                .push(test_instrument(&format!("track {i}"), false, 2));
        }

        let mut rng = Rng::new_with_seed(2);
        let mut selected = select_instruments(&score, 0.5, &mut rng);
        assert_eq!(selected.len(), 5, "floor(0.5 * 10) candidates");
        selected.sort_unstable();
        selected.dedup();
        assert_eq!(selected.len(), 5, "No instrument should be selected twice");
    }

    #[test]
    fn selection_skips_when_fraction_rounds_to_zero() {
        let mut score = Score::default();
        score.instruments.push(test_instrument("a", false, 2));
        score.instruments.push(test_instrument("b", false, 2));

        let mut rng = Rng::new_with_seed(3);
        assert!(
            select_instruments(&score, 0.3, &mut rng).is_empty(),
            "floor(0.3 * 2) is zero, so the whole score is skipped"
        );
    }

    #[test]
    fn single_instrument_ignores_p_instruments() {
        let score = test_score(4);
        let mut rng = Rng::new_with_seed(4);
        assert_eq!(
            select_instruments(&score, 0.1, &mut rng),
            vec![0],
            "With one candidate, p_instruments doesn't apply"
        );
    }
}
