// Copyright (c) 2024 Mike Tsao

use super::{note::Instrument, time::Tempo};
use serde::{Deserialize, Serialize};

/// The tick-domain meta events we track. Everything else a MIDI file might
/// carry stays with the external codec.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TickEventKind {
    /// A tempo change, in microseconds per quarter-note.
    Tempo(u32),
    /// A time-signature change.
    TimeSignature {
        /// Beats per measure.
        numerator: u8,
        /// The value of a beat: 4 means a quarter-note gets the beat. Always
        /// a power of two.
        denominator: u8,
    },
    /// A key-signature change.
    KeySignature {
        /// Sharps if positive, flats if negative.
        sharps: i8,
        /// Whether the key is minor.
        minor: bool,
    },
    /// Marks the end of a track.
    EndOfTrack,
}

/// A [TickEvent] is one meta event at an absolute position in MIDI ticks.
///
/// Positions are absolute rather than delta-encoded so that removing an
/// event can't silently shift everything after it; deltas are recomputed at
/// the serializer boundary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TickEvent {
    /// Absolute position in MIDI ticks.
    pub tick: u32,
    /// What the event does.
    pub kind: TickEventKind,
}
impl TickEvent {
    /// Creates a tempo-change event at the given tick.
    pub fn new_tempo(tick: u32, tempo: Tempo) -> Self {
        Self {
            tick,
            kind: TickEventKind::Tempo(tempo.as_micros_per_beat()),
        }
    }

    /// Whether this is a tempo-change event.
    pub fn is_tempo(&self) -> bool {
        matches!(self.kind, TickEventKind::Tempo(_))
    }

    /// The event's tempo in BPM, if it is a tempo change.
    pub fn tempo(&self) -> Option<Tempo> {
        match self.kind {
            TickEventKind::Tempo(micros) => Some(Tempo::from_micros_per_beat(micros)),
            _ => None,
        }
    }
}

/// A [TickTrack] is one track's tick-domain meta-event list, ordered by
/// tick.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TickTrack {
    /// The events, ordered by tick position.
    pub events: Vec<TickEvent>,
}
impl TickTrack {
    /// The tempo-change events on this track, in order.
    pub fn tempo_events(&self) -> impl Iterator<Item = &TickEvent> {
        self.events.iter().filter(|event| event.is_tempo())
    }
}

/// A [Score] is the in-memory form of one symbolic-music document. The
/// external parser creates it, zero or more
/// [Transform](crate::augmentation::Transform)s reshape it, and the external
/// serializer consumes it.
///
/// Instruments hold the seconds-domain note view. Meta tracks hold the
/// tick-domain view; by MIDI convention, `meta_tracks[0]` is the designated
/// tempo track, and tempo events anywhere else are a structural violation
/// that [TempoShift](crate::augmentation::TempoShift) repairs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Score {
    /// The instrument tracks.
    pub instruments: Vec<Instrument>,
    /// The tick-domain meta tracks. Index 0 is the designated tempo track.
    pub meta_tracks: Vec<TickTrack>,
    /// MIDI ticks per quarter-note.
    pub ticks_per_beat: u16,
}
impl Default for Score {
    fn default() -> Self {
        Self {
            instruments: Vec::default(),
            meta_tracks: vec![TickTrack::default()],
            ticks_per_beat: 480,
        }
    }
}
impl Score {
    /// The designated tempo track, if the score has any meta tracks at all.
    pub fn tempo_track(&self) -> Option<&TickTrack> {
        self.meta_tracks.first()
    }

    /// Total number of notes across all instruments.
    pub fn note_count(&self) -> usize {
        self.instruments
            .iter()
            .map(|instrument| instrument.notes.len())
            .sum()
    }
}
