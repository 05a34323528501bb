// Hall Pedal: Voltage Sampler
//
// Oversamples a Hall sensor back-to-back (no inter-sample delay, this sits on
// the latency-critical path) and converts the integer mean to millivolts.

use crate::config::OVERSAMPLE_COUNT;
use crate::events::PedalId;
use crate::interfaces::{CalibrationCurve, RawSensor};

/// Calibrated millivolt reading for `pedal`.
pub fn read_millivolts(
    sensor: &mut dyn RawSensor,
    curve: &dyn CalibrationCurve,
    pedal: PedalId,
) -> i32 {
    let sum: u32 = (0..OVERSAMPLE_COUNT)
        .map(|_| u32::from(sensor.sample(pedal)))
        .sum();
    let mean = (sum / OVERSAMPLE_COUNT as u32) as u16;
    curve.raw_to_mv(mean)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sequence {
        values: Vec<u16>,
        calls: Vec<PedalId>,
    }

    impl RawSensor for Sequence {
        fn sample(&mut self, pedal: PedalId) -> u16 {
            self.calls.push(pedal);
            self.values.remove(0)
        }
    }

    /// 12-bit counts onto 0..3300 mV.
    struct Linear;

    impl CalibrationCurve for Linear {
        fn raw_to_mv(&self, raw: u16) -> i32 {
            i32::from(raw) * 3300 / 4095
        }
    }

    struct Identity;

    impl CalibrationCurve for Identity {
        fn raw_to_mv(&self, raw: u16) -> i32 {
            i32::from(raw)
        }
    }

    #[test]
    fn takes_three_samples_of_the_requested_pedal() {
        let mut sensor = Sequence { values: vec![10, 20, 30, 99], calls: Vec::new() };
        read_millivolts(&mut sensor, &Identity, PedalId::Soft);
        assert_eq!(sensor.calls, vec![PedalId::Soft; 3]);
        assert_eq!(sensor.values, vec![99]);
    }

    #[test]
    fn mean_truncates_before_conversion() {
        let mut sensor = Sequence { values: vec![100, 101, 101], calls: Vec::new() };
        assert_eq!(read_millivolts(&mut sensor, &Identity, PedalId::Sustain), 100);
    }

    #[test]
    fn applies_the_curve_to_the_mean() {
        let mut sensor = Sequence { values: vec![4095, 4095, 4095], calls: Vec::new() };
        assert_eq!(read_millivolts(&mut sensor, &Linear, PedalId::Sostenuto), 3300);
    }
}
