// Hall Pedal: Hardware Seams
//
// Everything the signal path needs from the outside world.  The firmware
// binary implements these over ESP-IDF drivers; tests use in-memory fakes.

use crate::config::SCALE_FREQS_HZ;
use crate::events::{PageKey, PedalId, ToneCue};

/// Raw ADC counts for one pedal. Repeated calls must be independent.
pub trait RawSensor {
    fn sample(&mut self, pedal: PedalId) -> u16;
}

/// ADC counts → millivolts, characterised once at startup.
pub trait CalibrationCurve {
    fn raw_to_mv(&self, raw: u16) -> i32;
}

/// Key/value persistence for the calibration bounds.
pub trait CalibrationStore {
    /// Returns `default` when the key has never been written.
    fn load(&mut self, key: &str, default: i32) -> i32;
    fn save(&mut self, key: &str, value: i32) -> anyhow::Result<()>;
}

/// Piezo buzzer. `tone` blocks for `duration_ms` when it is positive.
pub trait Buzzer {
    fn tone(&mut self, degree: u8, duration_ms: u32);

    fn play(&mut self, cue: ToneCue) {
        for &(degree, ms) in cue.notes() {
            self.tone(degree, ms);
        }
    }
}

/// Pitch for a scale degree, `None` outside 1..=7.
pub fn degree_to_hz(degree: u8) -> Option<u32> {
    match degree {
        1..=7 => Some(SCALE_FREQS_HZ[degree as usize - 1]),
        _ => None,
    }
}

/// Fire-and-forget live view of each pedal (used by the upload portal).
pub trait StatusSink {
    fn report(&mut self, status_index: u8, mv: i32, min: i32, max: i32, mapped: u8);
}

/// Analog/switch outputs towards the instrument.
pub trait PedalOutputs {
    fn write_sustain(&mut self, value: u8) -> anyhow::Result<()>;
    fn write_sostenuto(&mut self, value: u8) -> anyhow::Result<()>;
    fn set_soft_switch(&mut self, on: bool) -> anyhow::Result<()>;
}

/// Bluetooth keyboard used as a page turner.
pub trait PageTurner {
    fn is_connected(&self) -> bool;
    fn send(&mut self, key: PageKey);
}

/// Active-low push button.
pub trait ButtonInput {
    fn is_low(&mut self) -> bool;
}

/// Every collaborator one control cycle touches.
pub struct Io<'a> {
    pub sensor: &'a mut dyn RawSensor,
    pub curve: &'a dyn CalibrationCurve,
    pub store: &'a mut dyn CalibrationStore,
    pub buzzer: &'a mut dyn Buzzer,
    pub outputs: &'a mut dyn PedalOutputs,
    pub page_turner: &'a mut dyn PageTurner,
    pub calibrate_button: &'a mut dyn ButtonInput,
    /// Only present while the upload portal is running.
    pub status: Option<&'a mut dyn StatusSink>,
}
