// Copyright (c) 2024 Mike Tsao

//! Conversions between the document model and the wire-level [midly] types
//! that an external MIDI codec speaks. The codec itself (file parsing and
//! serialization) is out of scope for this crate.

use super::{
    note::Note,
    score::{TickEventKind, TickTrack},
};
use midly::{MetaMessage, MidiMessage, TrackEvent, TrackEventKind};

pub use midly::num::{u24, u28, u7};

/// Provides MIDI-related utility functionality.
pub struct MidiUtils {}
impl MidiUtils {
    /// Convenience function to make a note-on [MidiMessage].
    pub fn new_note_on(note: u8, vel: u8) -> MidiMessage {
        MidiMessage::NoteOn {
            key: u7::from_int_lossy(note),
            vel: u7::from_int_lossy(vel),
        }
    }

    /// Convenience function to make a note-off [MidiMessage].
    pub fn new_note_off(note: u8, vel: u8) -> MidiMessage {
        MidiMessage::NoteOff {
            key: u7::from_int_lossy(note),
            vel: u7::from_int_lossy(vel),
        }
    }

    /// The note-on/note-off pair for a [Note], for handoff to a serializer
    /// that tracks its own timing.
    pub fn note_messages(note: &Note) -> (MidiMessage, MidiMessage) {
        (
            Self::new_note_on(note.key, note.velocity),
            Self::new_note_off(note.key, note.velocity),
        )
    }
}

impl TickEventKind {
    /// The wire-level meta message for this event.
    pub fn to_meta(&self) -> MetaMessage<'static> {
        match *self {
            Self::Tempo(micros) => MetaMessage::Tempo(u24::new(micros)),
            Self::TimeSignature {
                numerator,
                denominator,
            } => {
                // MIDI wants the denominator as a power of two.
                MetaMessage::TimeSignature(numerator, denominator.trailing_zeros() as u8, 24, 8)
            }
            Self::KeySignature { sharps, minor } => MetaMessage::KeySignature(sharps, minor),
            Self::EndOfTrack => MetaMessage::EndOfTrack,
        }
    }

    /// Builds one of ours from a wire-level meta message, or `None` for the
    /// message kinds we don't track.
    pub fn from_meta(meta: &MetaMessage) -> Option<Self> {
        match *meta {
            MetaMessage::Tempo(micros) => Some(Self::Tempo(micros.as_int())),
            MetaMessage::TimeSignature(numerator, denominator_exponent, _, _) => {
                Some(Self::TimeSignature {
                    numerator,
                    denominator: 1u8 << denominator_exponent.min(7),
                })
            }
            MetaMessage::KeySignature(sharps, minor) => Some(Self::KeySignature { sharps, minor }),
            MetaMessage::EndOfTrack => Some(Self::EndOfTrack),
            _ => None,
        }
    }
}

impl TickTrack {
    /// Renders this track as wire-level events with delta timing, ready for
    /// the external serializer. Events are expected to be ordered by tick;
    /// an out-of-order event collapses to a zero delta rather than
    /// corrupting the stream.
    pub fn to_midly(&self) -> Vec<TrackEvent<'static>> {
        let mut last_tick = 0;
        self.events
            .iter()
            .map(|event| {
                let delta = event.tick.saturating_sub(last_tick);
                last_tick = last_tick.max(event.tick);
                TrackEvent {
                    delta: u28::new(delta),
                    kind: TrackEventKind::Meta(event.kind.to_meta()),
                }
            })
            .collect()
    }
}
