// In-memory collaborators for unit tests.

use std::collections::HashMap;

use crate::events::{PageKey, PedalId};
use crate::interfaces::*;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MemoryStore {
    values: HashMap<String, i32>,
    pub fail_writes: bool,
    pub writes: usize,
}

impl MemoryStore {
    pub fn get(&self, key: &str) -> Option<i32> {
        self.values.get(key).copied()
    }
}

impl CalibrationStore for MemoryStore {
    fn load(&mut self, key: &str, default: i32) -> i32 {
        self.get(key).unwrap_or(default)
    }

    fn save(&mut self, key: &str, value: i32) -> anyhow::Result<()> {
        if self.fail_writes {
            anyhow::bail!("nvs write rejected for {key}");
        }
        self.writes += 1;
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct ToneLog(pub Vec<(u8, u32)>);

impl Buzzer for ToneLog {
    fn tone(&mut self, degree: u8, duration_ms: u32) {
        self.0.push((degree, duration_ms));
    }
}

#[derive(Debug, Default)]
pub struct StatusLog(pub Vec<(u8, i32, i32, i32, u8)>);

impl StatusSink for StatusLog {
    fn report(&mut self, status_index: u8, mv: i32, min: i32, max: i32, mapped: u8) {
        self.0.push((status_index, mv, min, max, mapped));
    }
}

/// Holds one steady level per pedal; counts read the same as millivolts
/// through [`UnityCurve`].
#[derive(Debug, Default)]
pub struct FixedSensor {
    pub levels: [u16; 3],
}

impl FixedSensor {
    pub fn set(&mut self, pedal: PedalId, level: u16) {
        self.levels[pedal.index()] = level;
    }
}

impl RawSensor for FixedSensor {
    fn sample(&mut self, pedal: PedalId) -> u16 {
        self.levels[pedal.index()]
    }
}

pub struct UnityCurve;

impl CalibrationCurve for UnityCurve {
    fn raw_to_mv(&self, raw: u16) -> i32 {
        i32::from(raw)
    }
}

#[derive(Debug, Default)]
pub struct OutputLog {
    pub sustain: Vec<u8>,
    pub sostenuto: Vec<u8>,
    pub soft: Vec<bool>,
}

impl PedalOutputs for OutputLog {
    fn write_sustain(&mut self, value: u8) -> anyhow::Result<()> {
        self.sustain.push(value);
        Ok(())
    }

    fn write_sostenuto(&mut self, value: u8) -> anyhow::Result<()> {
        self.sostenuto.push(value);
        Ok(())
    }

    fn set_soft_switch(&mut self, on: bool) -> anyhow::Result<()> {
        self.soft.push(on);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct KeyLog {
    pub connected: bool,
    pub sent: Vec<PageKey>,
}

impl PageTurner for KeyLog {
    fn is_connected(&self) -> bool {
        self.connected
    }

    fn send(&mut self, key: PageKey) {
        self.sent.push(key);
    }
}

#[derive(Debug, Default)]
pub struct HeldButton(pub bool);

impl ButtonInput for HeldButton {
    fn is_low(&mut self) -> bool {
        self.0
    }
}

/// Owns one of every fake so a test can borrow them all as an [`Io`].
#[derive(Default)]
pub struct Bench {
    pub sensor: FixedSensor,
    pub store: MemoryStore,
    pub tones: ToneLog,
    pub outputs: OutputLog,
    pub keys: KeyLog,
    pub button: HeldButton,
    pub status: StatusLog,
    pub portal: bool,
}

impl Bench {
    pub fn io(&mut self) -> Io<'_> {
        Io {
            sensor: &mut self.sensor,
            curve: &UnityCurve,
            store: &mut self.store,
            buzzer: &mut self.tones,
            outputs: &mut self.outputs,
            page_turner: &mut self.keys,
            calibrate_button: &mut self.button,
            status: if self.portal { Some(&mut self.status as &mut dyn StatusSink) } else { None },
        }
    }
}
