// Hall Pedal: Hardware & System Configuration
// Target: ESP32 (Xtensa) pedal controller with three Hall-effect sensors

// ---------------------------------------------------------------------------
// GPIO Pin Definitions
// ---------------------------------------------------------------------------
pub const PIN_ADC_SUSTAIN: i32 = 35;       // ADC1_CH7: sustain pedal Hall sensor
pub const PIN_ADC_SOSTENUTO: i32 = 32;     // ADC1_CH4: sostenuto pedal Hall sensor
pub const PIN_ADC_SOFT: i32 = 33;          // ADC1_CH5: soft pedal Hall sensor

pub const ADC_CHANNEL_SUSTAIN: u32 = 7;
pub const ADC_CHANNEL_SOSTENUTO: u32 = 4;
pub const ADC_CHANNEL_SOFT: u32 = 5;

pub const PIN_DAC_SUSTAIN: i32 = 25;       // DAC_CHAN_0: sustain voltage output
pub const PIN_DAC_SOSTENUTO: i32 = 26;     // DAC_CHAN_1: sostenuto voltage output
pub const PIN_SWITCH_SOFT: i32 = 17;       // Soft pedal switch output (only two DACs)

pub const PIN_BUTTON_SUSTAIN: i32 = 27;    // INPUT_PULLUP, active LOW
pub const PIN_BUTTON_SOSTENUTO: i32 = 14;  // INPUT_PULLUP, active LOW
pub const PIN_BUTTON_SOFT: i32 = 13;       // INPUT_PULLUP, active LOW
pub const PIN_BUTTON_CALIBRATE: i32 = PIN_BUTTON_SOSTENUTO;

pub const PIN_BUZZER: i32 = 16;

// ---------------------------------------------------------------------------
// Buzzer (LEDC PWM)
// ---------------------------------------------------------------------------
pub const BUZZER_LEDC_CHANNEL: u32 = 0;
pub const BUZZER_BASE_FREQ_HZ: u32 = 2000;
pub const BUZZER_DUTY_BITS: u32 = 8;
/// C-major scale C4..B4, indexed by scale degree 1..=7.
pub const SCALE_FREQS_HZ: [u32; 7] = [262, 294, 330, 349, 392, 440, 494];

// ---------------------------------------------------------------------------
// Task Stack Sizes (bytes)
// ---------------------------------------------------------------------------
pub const STACK_CONTROL: usize = 8192;

// ---------------------------------------------------------------------------
// Timing (milliseconds)
// ---------------------------------------------------------------------------
pub const CYCLE_DELAY_MS: u64 = 10;                    // ~100 Hz control loop
pub const DEBOUNCE_RECHECK_MS: u32 = 10;
pub const CALIBRATION_TIMEOUT_MS: u32 = 20_000;        // 20 s without finishing → cancel
pub const CALIBRATION_FINISH_HOLD_MS: u32 = 2000;      // hold calibrate button to save
pub const PAGE_TURN_LONG_PRESS_MS: u32 = 1000;
pub const TONE_SHORT_MS: u32 = 120;
pub const TONE_LONG_MS: u32 = 240;

// ---------------------------------------------------------------------------
// Signal Path
// ---------------------------------------------------------------------------
pub const OVERSAMPLE_COUNT: usize = 3;
pub const DEFAULT_DEADZONE: f32 = 0.05;
pub const MAX_DEADZONE: f32 = 0.45;                    // keeps the two deadzones apart
pub const EMA_FAST_ALPHA: f32 = 0.7;
pub const EMA_SLOW_ALPHA: f32 = 0.2;
pub const EMA_FAST_THRESHOLD: i32 = 15;
pub const JITTER_BAND: i32 = 1;
pub const MAX_STEP: i32 = 12;
pub const OUTPUT_MAX: i32 = 255;

/// Sentinel bounds: an unset range is inverted so the first sample widens it.
pub const UNSET_MIN_MV: i32 = i32::MAX;
pub const UNSET_MAX_MV: i32 = 0;

// ---------------------------------------------------------------------------
// Outputs & Gestures (mapped 0–255 units)
// ---------------------------------------------------------------------------
pub const PAGE_TURN_ENGAGE_ABOVE: u8 = 100;
pub const PAGE_TURN_RELEASE_BELOW: u8 = 90;
pub const SOFT_SWITCH_ABOVE: u8 = 127;
pub const PORTAL_TRIGGER_ABOVE: u8 = 127;
pub const DAC_SCALE_NUM: u16 = 2;                      // DAC = mapped * 2 / 3
pub const DAC_SCALE_DEN: u16 = 3;

// ---------------------------------------------------------------------------
// Persistent Storage (NVS)
// ---------------------------------------------------------------------------
pub const NVS_NAMESPACE: &str = "config";

// ---------------------------------------------------------------------------
// Runtime tunables
// ---------------------------------------------------------------------------

/// Knobs the control cycle reads every pass. `Default` mirrors the constants
/// above; tests shrink the timings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerConfig {
    pub deadzone: f32,
    pub calibration_timeout_ms: u32,
    pub calibration_finish_hold_ms: u32,
    pub page_turn_long_press_ms: u32,
    pub page_turn_engage_above: u8,
    pub page_turn_release_below: u8,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            deadzone: DEFAULT_DEADZONE,
            calibration_timeout_ms: CALIBRATION_TIMEOUT_MS,
            calibration_finish_hold_ms: CALIBRATION_FINISH_HOLD_MS,
            page_turn_long_press_ms: PAGE_TURN_LONG_PRESS_MS,
            page_turn_engage_above: PAGE_TURN_ENGAGE_ABOVE,
            page_turn_release_below: PAGE_TURN_RELEASE_BELOW,
        }
    }
}
