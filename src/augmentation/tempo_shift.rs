// Copyright (c) 2024 Mike Tsao

use super::{validate_probability, ShiftDirection, Transform};
use crate::{
    types::{Score, Tempo, TickEvent, TickEventKind},
    util::Rng,
};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Randomly shifts the tempo timeline while keeping note timings intact.
///
/// Unlike the note-level transforms, this one makes a single whole-document
/// decision: one gate draw per `apply` determines whether the timeline is
/// reshifted at all, so a multi-event timeline moves coherently instead of
/// event by event.
///
/// The transform also repairs a structural violation while it's in there:
/// MIDI allows tempo events only on the designated (first) track, so any
/// tempo event found on another track is removed, never tolerated.
///
/// With `respect_tempo_shifts` set, every tempo event keeps its original
/// tick position and (if the gate passes) gets an independently drawn new
/// value; otherwise the whole timeline collapses to a single tempo event at
/// the origin, taken from the first event. A score with no tempo metadata
/// at all is given a synthesized event at the origin, assuming
/// [Tempo::DEFAULT_BPM].
#[derive(Builder, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[builder(build_fn(validate = "Self::validate"))]
#[serde(rename_all = "kebab-case")]
pub struct TempoShift {
    /// The largest allowed tempo change, in BPM. Must be positive.
    max_shift: f64,
    /// Whether the tempo may move up, down, or either way.
    #[builder(default)]
    mode: ShiftDirection,
    /// The BPM bounds a shifted tempo must stay within.
    #[builder(default = "(30.0, 200.0)")]
    tempo_range: (f64, f64),
    /// The probability of keeping the original tempo. With probability
    /// `1 - p`, the timeline is shifted.
    #[builder(default = "0.2")]
    p: f64,
    /// Preserve every tempo event at its tick (true), or consolidate the
    /// timeline into a single event at the origin (false).
    #[builder(default = "true")]
    respect_tempo_shifts: bool,
}
impl TempoShiftBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(max_shift) = self.max_shift {
            if !max_shift.is_finite() || max_shift <= 0.0 {
                return Err(format!("max_shift must be positive BPM, got {max_shift}"));
            }
        }
        if let Some((low, high)) = self.tempo_range {
            if !low.is_finite() || !high.is_finite() || low <= 0.0 || low >= high {
                return Err(format!(
                    "tempo_range must satisfy 0 < min < max BPM, got ({low}, {high})"
                ));
            }
        }
        validate_probability(self.p, "p")
    }
}
impl TempoShift {
    fn shifted_micros(&self, micros: u32, rng: &mut Rng) -> u32 {
        let delta = match self.mode {
            ShiftDirection::Both => rng.uniform(-self.max_shift, self.max_shift),
            ShiftDirection::Up => rng.uniform(0.0, self.max_shift),
            ShiftDirection::Down => rng.uniform(-self.max_shift, 0.0),
        };
        let bpm = (Tempo::from_micros_per_beat(micros).0 + delta)
            .max(self.tempo_range.0)
            .min(self.tempo_range.1);
        Tempo(bpm).as_micros_per_beat()
    }
}
impl Transform for TempoShift {
    fn apply(&self, score: &mut Score, rng: &mut Rng) {
        if score.meta_tracks.is_empty() {
            log::warn!("score has no meta tracks; TempoShift has nothing to do");
            return;
        }

        // Repair pass: tempo events belong only on the designated track.
        for (track_index, track) in score.meta_tracks.iter_mut().enumerate().skip(1) {
            let before = track.events.len();
            track.events.retain(|event| !event.is_tempo());
            let stripped = before - track.events.len();
            if stripped > 0 {
                log::warn!(
                    "removed {stripped} stray tempo event(s) from track {track_index}; \
                     tempo events belong on the first track only"
                );
            }
        }

        // One gate decision for the whole document.
        let should_change = rng.rand_float() > self.p;

        // Detach the timeline from the designated track before rewriting it.
        let track = &mut score.meta_tracks[0];
        let mut tempo_events: Vec<(u32, u32)> = Vec::default();
        let mut rest: Vec<TickEvent> = Vec::default();
        for event in track.events.drain(..) {
            match event.kind {
                TickEventKind::Tempo(micros) => tempo_events.push((event.tick, micros)),
                _ => rest.push(event),
            }
        }

        if tempo_events.is_empty() {
            log::warn!(
                "no tempo metadata found; assuming a default of {}",
                Tempo::default()
            );
            let micros = Tempo::default().as_micros_per_beat();
            let micros = if should_change {
                self.shifted_micros(micros, rng)
            } else {
                micros
            };
            rest.insert(
                0,
                TickEvent {
                    tick: 0,
                    kind: TickEventKind::Tempo(micros),
                },
            );
        } else if self.respect_tempo_shifts {
            for (tick, micros) in tempo_events {
                let micros = if should_change {
                    self.shifted_micros(micros, rng)
                } else {
                    micros
                };
                rest.push(TickEvent {
                    tick,
                    kind: TickEventKind::Tempo(micros),
                });
            }
            rest.sort_by_key(|event| event.tick);
        } else {
            if tempo_events.len() > 1 {
                log::info!(
                    "consolidating {} tempo events into one at the origin",
                    tempo_events.len()
                );
            }
            let (_, micros) = tempo_events[0];
            let micros = if should_change {
                self.shifted_micros(micros, rng)
            } else {
                micros
            };
            rest.insert(
                0,
                TickEvent {
                    tick: 0,
                    kind: TickEventKind::Tempo(micros),
                },
            );
        }

        track.events = rest;
    }
}
