// Copyright (c) 2024 Mike Tsao

use super::Transform;
use crate::{types::Score, util::Rng};

/// Composes several [Transform]s into one pipeline.
///
/// Stages run strictly in order; a later stage observes the mutated output
/// of every earlier one, so `[DurationShift, NoteDelete]` and
/// `[NoteDelete, DurationShift]` are different pipelines. An empty pipeline
/// is the identity function.
///
/// [Compose] is itself a [Transform], so pipelines nest.
#[derive(Debug, Default)]
pub struct Compose {
    stages: Vec<Box<dyn Transform>>,
}
impl Compose {
    /// Creates a pipeline from the given stages.
    pub fn new(stages: Vec<Box<dyn Transform>>) -> Self {
        Self { stages }
    }

    /// Appends a stage to the end of the pipeline.
    pub fn push(&mut self, stage: Box<dyn Transform>) {
        self.stages.push(stage);
    }

    /// How many stages the pipeline has.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Whether the pipeline has no stages.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}
impl Transform for Compose {
    fn apply(&self, score: &mut Score, rng: &mut Rng) {
        for stage in &self.stages {
            stage.apply(score, rng);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::test_score;
    use super::*;
    use crate::types::Note;

    /// Appends one fixed note, deterministically.
    #[derive(Debug)]
    struct AppendMarker(u8);
    impl Transform for AppendMarker {
        fn apply(&self, score: &mut Score, _rng: &mut Rng) {
            if let Some(instrument) = score.instruments.first_mut() {
                let start = instrument.end_time();
                instrument
                    .notes
                    .push(Note::new_with(self.0, 64, start, start + 1.0));
            }
        }
    }

    /// Duplicates every note, deterministically.
    #[derive(Debug)]
    struct DoubleNotes;
    impl Transform for DoubleNotes {
        fn apply(&self, score: &mut Score, _rng: &mut Rng) {
            for instrument in score.instruments.iter_mut() {
                let copies = instrument.notes.clone();
                instrument.notes.extend(copies);
            }
        }
    }

    #[test]
    fn empty_pipeline_is_identity() {
        let mut score = test_score(5);
        let expected = score.clone();

        let pipeline = Compose::default();
        assert!(pipeline.is_empty());
        pipeline.apply(&mut score, &mut Rng::new_with_seed(1));
        assert_eq!(score, expected);
    }

    #[test]
    fn stages_run_in_list_order() {
        let mut appended_first = test_score(3);
        Compose::new(vec![Box::new(AppendMarker(1)), Box::new(DoubleNotes)])
            .apply(&mut appended_first, &mut Rng::new_with_seed(2));

        let mut doubled_first = test_score(3);
        Compose::new(vec![Box::new(DoubleNotes), Box::new(AppendMarker(1))])
            .apply(&mut doubled_first, &mut Rng::new_with_seed(2));

        assert_eq!(appended_first.note_count(), 8, "(3 + 1) * 2");
        assert_eq!(doubled_first.note_count(), 7, "3 * 2 + 1");
        assert_ne!(
            appended_first, doubled_first,
            "The pipeline must not reorder its stages"
        );
    }

    #[test]
    fn pipelines_nest() {
        let inner = Compose::new(vec![Box::new(AppendMarker(1))]);
        let mut outer = Compose::default();
        outer.push(Box::new(inner));
        outer.push(Box::new(AppendMarker(2)));
        assert_eq!(outer.len(), 2);

        let mut score = test_score(0);
        score.instruments[0]
            .notes
            .push(Note::new_with(60, 100, 0.0, 1.0));
        outer.apply(&mut score, &mut Rng::new_with_seed(3));
        assert_eq!(score.note_count(), 3);
    }
}
