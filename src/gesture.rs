// Hall Pedal: Button Gesture Detection
//
// Polled at the control-loop rate.  Each tracker is an explicit state machine
// owned by the caller, so edge detection can be driven from tests with
// synthetic timestamps.

use crate::interfaces::ButtonInput;

/// Active-low read with a single re-check after `recheck` has waited, to
/// reject glitches.  For discrete buttons only, never the sensing path.
pub fn debounced_low(button: &mut dyn ButtonInput, recheck: impl FnOnce()) -> bool {
    if !button.is_low() {
        return false;
    }
    recheck();
    button.is_low()
}

// ---------------------------------------------------------------------------
// One-shot long press
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PressState {
    Released,
    Held { since_ms: u32 },
    /// Already fired for this press; waiting for release.
    Latched,
}

/// Fires once per press when held for at least `hold_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LongPressTracker {
    hold_ms: u32,
    state: PressState,
}

impl LongPressTracker {
    pub const fn new(hold_ms: u32) -> Self {
        Self { hold_ms, state: PressState::Released }
    }

    /// Feed the current level; returns `true` on the cycle the hold completes.
    pub fn update(&mut self, pressed: bool, now_ms: u32) -> bool {
        if !pressed {
            self.state = PressState::Released;
            return false;
        }
        match self.state {
            PressState::Released => {
                self.state = PressState::Held { since_ms: now_ms };
                false
            }
            PressState::Held { since_ms } if now_ms.wrapping_sub(since_ms) >= self.hold_ms => {
                self.state = PressState::Latched;
                true
            }
            PressState::Held { .. } | PressState::Latched => false,
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.state != PressState::Released
    }
}

// ---------------------------------------------------------------------------
// Threshold with hysteresis
// ---------------------------------------------------------------------------

/// Turns a 0–255 level into an engaged flag: on above `engage_above`, off
/// below `release_below`, unchanged in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngageDetector {
    engage_above: u8,
    release_below: u8,
    engaged: bool,
}

impl EngageDetector {
    pub const fn new(engage_above: u8, release_below: u8) -> Self {
        Self { engage_above, release_below, engaged: false }
    }

    pub fn update(&mut self, level: u8) -> bool {
        if level > self.engage_above {
            self.engaged = true;
        } else if level < self.release_below {
            self.engaged = false;
        }
        self.engaged
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged
    }
}

// ---------------------------------------------------------------------------
// Hold-duration classifier
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// Released before the long threshold; carries the hold time.
    Short { held_ms: u32 },
    /// Reached the long threshold (reported without waiting for release),
    /// or released exactly on it.
    Long,
    /// Released past the long threshold before a poll caught it; carries the
    /// hold time and maps to no page key.
    Overheld { held_ms: u32 },
}

impl Gesture {
    /// Duration reported to collaborators: the hold time on release,
    /// exactly the long threshold for a long one.
    pub fn duration_ms(self, long_ms: u32) -> u32 {
        match self {
            Self::Short { held_ms } | Self::Overheld { held_ms } => held_ms,
            Self::Long => long_ms,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HoldState {
    Up,
    Down { since_ms: u32 },
    /// Classified as long; ignore the rest of this interval.
    Classified,
}

/// Classifies each down interval exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoldClassifier {
    long_ms: u32,
    state: HoldState,
}

impl HoldClassifier {
    pub const fn new(long_ms: u32) -> Self {
        Self { long_ms, state: HoldState::Up }
    }

    pub fn long_ms(&self) -> u32 {
        self.long_ms
    }

    pub fn update(&mut self, down: bool, now_ms: u32) -> Option<Gesture> {
        match (self.state, down) {
            (HoldState::Up, true) => {
                self.state = HoldState::Down { since_ms: now_ms };
                None
            }
            (HoldState::Down { since_ms }, true) => {
                if now_ms.wrapping_sub(since_ms) >= self.long_ms {
                    self.state = HoldState::Classified;
                    Some(Gesture::Long)
                } else {
                    None
                }
            }
            (HoldState::Down { since_ms }, false) => {
                self.state = HoldState::Up;
                let held_ms = now_ms.wrapping_sub(since_ms);
                match held_ms {
                    0 => None,
                    h if h < self.long_ms => Some(Gesture::Short { held_ms }),
                    h if h == self.long_ms => Some(Gesture::Long),
                    _ => Some(Gesture::Overheld { held_ms }),
                }
            }
            (HoldState::Classified, false) => {
                self.state = HoldState::Up;
                None
            }
            (HoldState::Up, false) | (HoldState::Classified, true) => None,
        }
    }

    /// `update` in the collaborator-facing form: milliseconds or 0.
    pub fn duration(&mut self, down: bool, now_ms: u32) -> u32 {
        self.update(down, now_ms)
            .map(|g| g.duration_ms(self.long_ms))
            .unwrap_or(0)
    }
}
