// Copyright (c) 2024 Mike Tsao

use super::{select_instruments, validate_probability, Transform, EPS};
use crate::{
    types::{Note, Score},
    util::Rng,
};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Randomly adds new notes to each selected instrument.
///
/// The added count is `ceil(uniform(eps, p) * existing_note_count)`, so `p`
/// bounds the growth relative to what's already there. Each new note draws
/// its key, velocity, onset, and duration uniformly from the configured
/// ranges; when `restrict_to_instrument_time` is set, no new note rings past
/// the last pre-existing note's offset.
#[derive(Builder, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[builder(build_fn(validate = "Self::validate"))]
#[serde(rename_all = "kebab-case")]
pub struct NoteAdd {
    /// Lowest and highest MIDI key a new note may take, inclusive.
    note_num_range: (u8, u8),
    /// Lowest and highest MIDI velocity a new note may take, inclusive.
    note_velocity_range: (u8, u8),
    /// Shortest and longest duration a new note may take, in seconds.
    note_duration_range: (f64, f64),
    /// When true, new-note offsets are clipped to the last pre-existing
    /// note's offset.
    #[builder(default = "true")]
    restrict_to_instrument_time: bool,
    /// The fraction of candidate instruments that may be touched.
    #[builder(default = "1.0")]
    p_instruments: f64,
    /// The maximum fraction of notes (relative to the existing count) that
    /// may be added per instrument.
    #[builder(default = "0.2")]
    p: f64,
}
impl NoteAddBuilder {
    fn validate(&self) -> Result<(), String> {
        for (range, name) in [
            (self.note_num_range, "note_num_range"),
            (self.note_velocity_range, "note_velocity_range"),
        ] {
            if let Some((low, high)) = range {
                if low > high {
                    return Err(format!("{name} must be (low, high) with low <= high"));
                }
                if high > 127 {
                    return Err(format!("{name} values must be MIDI 0..=127, got {high}"));
                }
            }
        }
        if let Some((low, high)) = self.note_duration_range {
            if !low.is_finite() || !high.is_finite() || low < 0.0 || low > high {
                return Err(format!(
                    "note_duration_range must be finite seconds with 0 <= low <= high, got ({low}, {high})"
                ));
            }
        }
        validate_probability(self.p, "p")?;
        validate_probability(self.p_instruments, "p_instruments")
    }
}
impl NoteAdd {
    /// How many notes to add, given one uniform draw from `[eps, p]` and
    /// the instrument's existing note count.
    pub(crate) fn added_count(draw: f64, existing: usize) -> usize {
        (draw * existing as f64).ceil() as usize
    }

    fn generate_note(&self, end_time: f64, rng: &mut Rng) -> Note {
        let key = rng.rand_int_inclusive(self.note_num_range.0 as i32, self.note_num_range.1 as i32)
            as u8;
        let velocity = rng.rand_int_inclusive(
            self.note_velocity_range.0 as i32,
            self.note_velocity_range.1 as i32,
        ) as u8;
        let start = rng.uniform(0.0, end_time);
        let mut end = start + rng.uniform(self.note_duration_range.0, self.note_duration_range.1);
        if self.restrict_to_instrument_time {
            end = end.min(end_time);
        }
        Note::new_with(key, velocity, start, end)
    }
}
impl Transform for NoteAdd {
    fn apply(&self, score: &mut Score, rng: &mut Rng) {
        for index in select_instruments(score, self.p_instruments, rng) {
            let instrument = &mut score.instruments[index];
            // An empty instrument offers no end time to place notes in, and
            // a p at or below epsilon can add nothing.
            if self.p <= EPS || instrument.notes.is_empty() {
                log::debug!(
                    "NoteAdd has nowhere to add notes on instrument {:?}; skipping",
                    instrument.name
                );
                continue;
            }

            let count = Self::added_count(rng.uniform(EPS, self.p), instrument.notes.len());
            let end_time = instrument.end_time();
            for _ in 0..count {
                let note = self.generate_note(end_time, rng);
                instrument.notes.push(note);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::test_score;
    use super::*;

    fn test_transform() -> NoteAddBuilder {
        let mut builder = NoteAddBuilder::default();
        builder
            .note_num_range((48, 72))
            .note_velocity_range((40, 100))
            .note_duration_range((0.1, 0.4));
        builder
    }

    #[test]
    fn rejects_invalid_configuration() {
        assert!(
            NoteAddBuilder::default().build().is_err(),
            "All three ranges are required"
        );
        assert!(test_transform().note_num_range((80, 60)).build().is_err());
        assert!(test_transform()
            .note_velocity_range((0, 200))
            .build()
            .is_err());
        assert!(test_transform()
            .note_duration_range((0.5, 0.1))
            .build()
            .is_err());
        assert!(test_transform()
            .note_duration_range((-0.5, 0.1))
            .build()
            .is_err());
        assert!(test_transform().p(7.0).build().is_err());
        assert!(test_transform().build().is_ok());
    }

    #[test]
    fn added_count_matches_the_addition_law() {
        // With p = 0.3 and the draw pinned at the top of [eps, 0.3], exactly
        // 3 notes join an instrument of 10.
        assert_eq!(NoteAdd::added_count(0.3, 10), 3);
        assert_eq!(NoteAdd::added_count(1e-12, 10), 1);
        assert_eq!(NoteAdd::added_count(0.3, 0), 0);
    }

    #[test]
    fn zero_probability_is_a_no_op() {
        let mut score = test_score(10);
        let expected = score.clone();

        let transform = test_transform().p(0.0).build().unwrap();
        transform.apply(&mut score, &mut Rng::new_with_seed(1));
        assert_eq!(score, expected);
    }

    #[test]
    fn new_notes_respect_every_configured_range() {
        let mut score = test_score(10);
        let end_time = score.instruments[0].end_time();

        let transform = test_transform().p(0.9).build().unwrap();
        transform.apply(&mut score, &mut Rng::new_with_seed(2));

        let notes = &score.instruments[0].notes;
        assert!(notes.len() > 10, "Something should have been added");
        assert!(
            notes.len() <= 19,
            "At most ceil(0.9 * 10) notes may be added"
        );
        for note in &notes[10..] {
            assert!((48..=72).contains(&note.key));
            assert!((40..=100).contains(&note.velocity));
            assert!(note.start >= 0.0 && note.start <= end_time);
            assert!(note.end >= note.start);
            assert!(
                note.end <= end_time,
                "Restricted mode clips offsets to the instrument end"
            );
        }
    }

    #[test]
    fn unrestricted_mode_may_ring_past_the_end() {
        let mut score = test_score(10);
        let transform = test_transform()
            .note_duration_range((0.1, 0.4))
            .restrict_to_instrument_time(false)
            .p(0.9)
            .build()
            .unwrap();
        transform.apply(&mut score, &mut Rng::new_with_seed(3));

        for note in &score.instruments[0].notes[10..] {
            assert!(note.duration() >= 0.1 - 1e-9 && note.duration() <= 0.4 + 1e-9);
        }
    }

    #[test]
    fn empty_instrument_is_skipped() {
        let mut score = test_score(0);
        let expected = score.clone();

        let transform = test_transform().p(0.9).build().unwrap();
        transform.apply(&mut score, &mut Rng::new_with_seed(4));
        assert_eq!(score, expected);
    }
}
