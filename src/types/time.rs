// Copyright (c) 2024 Mike Tsao

use core::fmt;
use serde::{Deserialize, Serialize};

/// Beats per minute.
///
/// MIDI stores tempo natively as microseconds per quarter-note. [Tempo]
/// converts to and from that unit at the edges and speaks BPM everywhere
/// else, because BPM is what humans (and augmentation ranges) reason in.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Tempo(pub f64);
impl Default for Tempo {
    fn default() -> Self {
        Self(Self::DEFAULT_BPM)
    }
}
impl fmt::Display for Tempo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("{:0.2} BPM", self.0))
    }
}
impl From<f64> for Tempo {
    fn from(value: f64) -> Self {
        Self(value)
    }
}
impl From<Tempo> for f64 {
    fn from(value: Tempo) -> Self {
        value.0
    }
}
impl Tempo {
    /// The tempo assumed for documents that carry no tempo metadata.
    pub const DEFAULT_BPM: f64 = 120.0;

    // The constant that links BPM to the MIDI tempo unit.
    const MICROS_PER_MINUTE: f64 = 60_000_000.0;

    /// Creates a [Tempo] from a MIDI tempo meta-event value (microseconds
    /// per quarter-note).
    pub fn from_micros_per_beat(micros: u32) -> Self {
        Self(Self::MICROS_PER_MINUTE / micros as f64)
    }

    /// This tempo as a MIDI tempo meta-event value, rounded to the nearest
    /// whole microsecond.
    pub fn as_micros_per_beat(&self) -> u32 {
        (Self::MICROS_PER_MINUTE / self.0).round() as u32
    }

    /// Beats per second.
    pub fn bps(&self) -> f64 {
        self.0 / 60.0
    }
}
