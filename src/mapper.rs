// Hall Pedal: Pedal Value Mapper
//
// Millivolts → 0..=255 in four stages:
//   1. Symmetric deadzone at both ends of the calibrated travel.
//   2. Linear position inside the remaining span.
//   3. Two-speed EMA: fast when the jump is large (deliberate movement),
//      slow when it is small (sensor noise).
//   4. Output stage: ±1 flicker is ignored, larger changes are step-limited.

use crate::config::*;
use crate::events::PedalId;
use crate::interfaces::StatusSink;
use crate::registry::{CalibrationBounds, ChannelRegistry, PedalChannel, Primed};

/// Deadzone-trimmed input span, in millivolts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveRange {
    pub low: i32,
    pub high: i32,
}

impl EffectiveRange {
    /// `deadzone` is clamped to `0.0..=MAX_DEADZONE`.
    pub fn new(bounds: CalibrationBounds, deadzone: f32) -> Self {
        let dz = deadzone.clamp(0.0, MAX_DEADZONE);
        let trim = (bounds.max as f32 - bounds.min as f32) * dz;
        Self {
            low: (bounds.min as f32 + trim) as i32,
            high: (bounds.max as f32 - trim) as i32,
        }
    }

    pub fn span(&self) -> i64 {
        i64::from(self.high) - i64::from(self.low)
    }

    /// Unfiltered 0..=255 position of `mv` inside the range.
    pub fn position(&self, mv: i32) -> i32 {
        if self.high <= self.low {
            return 0;
        }
        let clamped = mv.clamp(self.low, self.high);
        let offset = i64::from(clamped) - i64::from(self.low);
        let fraction = offset as f32 / self.span() as f32;
        (OUTPUT_MAX as f32 * fraction) as i32
    }
}

/// Advance one channel's filter by one sample and return its output.
///
/// An uncalibrated channel (`max <= min`) yields 0 and leaves the filter
/// untouched.
pub fn map(channel: &mut PedalChannel, mv: i32, deadzone: f32) -> u8 {
    if !channel.bounds.is_calibrated() {
        return 0;
    }
    let target = EffectiveRange::new(channel.bounds, deadzone).position(mv);

    let state = match channel.filter.primed {
        // Cold start: no lag on the very first sample.
        None => Primed { ema: target as f32, last_output: target },
        Some(mut state) => {
            let delta = target as f32 - state.ema;
            let alpha = if (delta as i32).abs() > EMA_FAST_THRESHOLD {
                EMA_FAST_ALPHA
            } else {
                EMA_SLOW_ALPHA
            };
            state.ema += alpha * delta;

            let rounded = state.ema.round() as i32;
            let step = rounded - state.last_output;
            if step.abs() > JITTER_BAND {
                state.last_output += step.clamp(-MAX_STEP, MAX_STEP);
            }
            state
        }
    };

    let output = state.last_output.clamp(0, OUTPUT_MAX);
    channel.filter.primed = Some(Primed { last_output: output, ..state });
    output as u8
}

impl ChannelRegistry {
    /// Map `pedal`'s reading and mirror it to the status sink, if any.
    /// Uncalibrated pedals are not reported.
    pub fn map_pedal(
        &mut self,
        pedal: PedalId,
        mv: i32,
        deadzone: f32,
        status: Option<&mut (dyn StatusSink + '_)>,
    ) -> u8 {
        let channel = &mut self[pedal];
        let mapped = map(channel, mv, deadzone);
        let bounds = channel.bounds;
        if let Some(sink) = status.filter(|_| bounds.is_calibrated()) {
            sink.report(pedal.status_index(), mv, bounds.min, bounds.max, mapped);
        }
        mapped
    }

    /// Last value produced for `pedal` (0 before its first sample).
    pub fn mapped_value(&self, pedal: PedalId) -> u8 {
        self[pedal]
            .filter
            .primed
            .map(|p| p.last_output.clamp(0, OUTPUT_MAX) as u8)
            .unwrap_or(0)
    }
}
