// Hall Pedal: Channel Identifiers & System Events

use crate::config::*;

// ---------------------------------------------------------------------------
// Pedal channels
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PedalId {
    Sustain,
    Sostenuto,
    Soft,
}

impl PedalId {
    pub const ALL: [PedalId; 3] = [Self::Sustain, Self::Sostenuto, Self::Soft];

    /// Slot in the channel registry.
    pub const fn index(self) -> usize {
        match self {
            Self::Sustain   => 0,
            Self::Sostenuto => 1,
            Self::Soft      => 2,
        }
    }

    /// Index the web portal uses for its pedal table (soft first).
    pub const fn status_index(self) -> u8 {
        match self {
            Self::Soft      => 0,
            Self::Sostenuto => 1,
            Self::Sustain   => 2,
        }
    }

    /// NVS keys holding the committed (min, max) bounds.
    pub const fn store_keys(self) -> (&'static str, &'static str) {
        match self {
            Self::Sustain   => ("sustainmin", "sustainmax"),
            Self::Sostenuto => ("sostenutomin", "sostenutomax"),
            Self::Soft      => ("softmin", "softmax"),
        }
    }

    /// Human-readable label (kept for debugging/logging purposes).
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Sustain   => "sustain",
            Self::Sostenuto => "sostenuto",
            Self::Soft      => "soft",
        }
    }
}

// ---------------------------------------------------------------------------
// Page turner keys
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKey {
    /// Short press: next page.
    PageDown,
    /// Long press: previous page.
    PageUp,
}

// ---------------------------------------------------------------------------
// Buzzer cues: (scale degree, duration ms) played in order
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToneCue {
    /// Do–So.
    CalibrationStart,
    /// So–Do.
    CalibrationCanceled,
    /// Long So.
    CalibrationSaved,
    /// Do–Mi–So.
    PortalBoot,
}

impl ToneCue {
    pub fn notes(self) -> &'static [(u8, u32)] {
        match self {
            Self::CalibrationStart    => &[(1, TONE_SHORT_MS), (5, TONE_SHORT_MS)],
            Self::CalibrationCanceled => &[(5, TONE_SHORT_MS), (1, TONE_SHORT_MS)],
            Self::CalibrationSaved    => &[(5, TONE_LONG_MS)],
            Self::PortalBoot          => &[(1, TONE_SHORT_MS), (3, TONE_SHORT_MS), (5, TONE_SHORT_MS)],
        }
    }
}

// ---------------------------------------------------------------------------
// Boot outcome
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootMode {
    /// Regular pedal operation.
    Normal,
    /// Calibration button held at power-on.
    Calibration,
    /// Soft pedal held at power-on: the firmware upload portal was requested.
    Portal,
}
