// Hall Pedal: Channel Registry
//
// One owned record per pedal, indexed by `PedalId` rather than by GPIO number.

use core::ops::{Index, IndexMut};

use crate::config::{UNSET_MAX_MV, UNSET_MIN_MV};
use crate::events::PedalId;
use crate::interfaces::CalibrationStore;

/// Travel range in millivolts. Meaningful only when `max > min`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalibrationBounds {
    pub min: i32,
    pub max: i32,
}

impl CalibrationBounds {
    pub const UNSET: Self = Self { min: UNSET_MIN_MV, max: UNSET_MAX_MV };

    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub fn is_calibrated(&self) -> bool {
        self.max > self.min
    }

    /// Grow the range to include `mv`. Never narrows.
    pub fn widen(&mut self, mv: i32) {
        self.min = self.min.min(mv);
        self.max = self.max.max(mv);
    }
}

impl Default for CalibrationBounds {
    fn default() -> Self {
        Self::UNSET
    }
}

/// Smoother memory. `None` until the first valid sample arrives.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FilterState {
    pub primed: Option<Primed>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Primed {
    pub ema: f32,
    pub last_output: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PedalChannel {
    pub bounds: CalibrationBounds,
    pub filter: FilterState,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChannelRegistry {
    channels: [PedalChannel; 3],
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all six bounds with the committed values. Missing keys read
    /// as unset, leaving that pedal uncalibrated.
    pub fn load_bounds(&mut self, store: &mut dyn CalibrationStore) {
        let mut loaded = [CalibrationBounds::UNSET; 3];
        for pedal in PedalId::ALL {
            let (min_key, max_key) = pedal.store_keys();
            loaded[pedal.index()] = CalibrationBounds::new(
                store.load(min_key, UNSET_MIN_MV),
                store.load(max_key, UNSET_MAX_MV),
            );
        }
        for pedal in PedalId::ALL {
            self[pedal].bounds = loaded[pedal.index()];
        }
        log::info!(
            "Bounds loaded — sustain {:?} | sostenuto {:?} | soft {:?}",
            self[PedalId::Sustain].bounds,
            self[PedalId::Sostenuto].bounds,
            self[PedalId::Soft].bounds,
        );
    }

    /// Write all six bounds. Stops at the first failing key.
    pub fn save_bounds(&self, store: &mut dyn CalibrationStore) -> anyhow::Result<()> {
        for pedal in PedalId::ALL {
            let (min_key, max_key) = pedal.store_keys();
            let bounds = self[pedal].bounds;
            store.save(min_key, bounds.min)?;
            store.save(max_key, bounds.max)?;
        }
        log::info!(
            "Bounds saved — sustain {:?} | sostenuto {:?} | soft {:?}",
            self[PedalId::Sustain].bounds,
            self[PedalId::Sostenuto].bounds,
            self[PedalId::Soft].bounds,
        );
        Ok(())
    }

    /// Set every pedal's bounds to the unset sentinel.
    pub fn clear_bounds(&mut self) {
        for channel in &mut self.channels {
            channel.bounds = CalibrationBounds::UNSET;
        }
    }

    /// Forget a pedal's smoothing history; the next sample is a cold start.
    pub fn reset_filter(&mut self, pedal: PedalId) {
        self[pedal].filter = FilterState::default();
    }

    pub fn bounds(&self, pedal: PedalId) -> CalibrationBounds {
        self[pedal].bounds
    }
}

impl Index<PedalId> for ChannelRegistry {
    type Output = PedalChannel;

    fn index(&self, pedal: PedalId) -> &PedalChannel {
        &self.channels[pedal.index()]
    }
}

impl IndexMut<PedalId> for ChannelRegistry {
    fn index_mut(&mut self, pedal: PedalId) -> &mut PedalChannel {
        &mut self.channels[pedal.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryStore;

    #[test]
    fn first_boot_is_uncalibrated() {
        let mut store = MemoryStore::default();
        let mut registry = ChannelRegistry::new();
        registry.load_bounds(&mut store);
        for pedal in PedalId::ALL {
            assert!(!registry.bounds(pedal).is_calibrated());
        }
    }

    #[test]
    fn bounds_round_trip_through_the_store() {
        let mut store = MemoryStore::default();
        let mut registry = ChannelRegistry::new();
        registry[PedalId::Sustain].bounds = CalibrationBounds::new(500, 3000);
        registry[PedalId::Soft].bounds = CalibrationBounds::new(800, 2100);
        registry.save_bounds(&mut store).unwrap();

        assert_eq!(store.get("sustainmin"), Some(500));
        assert_eq!(store.get("softmax"), Some(2100));

        let mut fresh = ChannelRegistry::new();
        fresh.load_bounds(&mut store);
        assert_eq!(fresh.bounds(PedalId::Sustain), CalibrationBounds::new(500, 3000));
        assert_eq!(fresh.bounds(PedalId::Soft), CalibrationBounds::new(800, 2100));
        assert!(!fresh.bounds(PedalId::Sostenuto).is_calibrated());
    }

    #[test]
    fn widen_never_narrows() {
        let mut bounds = CalibrationBounds::UNSET;
        bounds.widen(1200);
        assert_eq!(bounds, CalibrationBounds::new(1200, 1200));
        bounds.widen(900);
        bounds.widen(1000);
        bounds.widen(2500);
        bounds.widen(2000);
        assert_eq!(bounds, CalibrationBounds::new(900, 2500));
    }

    #[test]
    fn reset_filter_touches_only_one_pedal() {
        let mut registry = ChannelRegistry::new();
        for pedal in PedalId::ALL {
            registry[pedal].filter.primed = Some(Primed { ema: 40.0, last_output: 40 });
        }
        registry.reset_filter(PedalId::Sostenuto);
        assert!(registry[PedalId::Sostenuto].filter.primed.is_none());
        assert!(registry[PedalId::Sustain].filter.primed.is_some());
        assert!(registry[PedalId::Soft].filter.primed.is_some());
    }

    #[test]
    fn clear_bounds_keeps_filter_state() {
        let mut registry = ChannelRegistry::new();
        registry[PedalId::Soft].bounds = CalibrationBounds::new(10, 20);
        registry[PedalId::Soft].filter.primed = Some(Primed { ema: 5.0, last_output: 5 });
        registry.clear_bounds();
        assert_eq!(registry.bounds(PedalId::Soft), CalibrationBounds::UNSET);
        assert!(registry[PedalId::Soft].filter.primed.is_some());
    }
}
