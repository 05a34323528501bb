// Hall Pedal: Calibration Session
//
// Guided travel-range capture:
//   1. Power on with the calibration button held → session starts (Do–So).
//   2. Press each pedal fully and release it; bounds only ever widen.
//   3. Hold the calibration button 2 s → bounds are saved (long So).
//   4. No finish within 20 s → session is canceled, the committed bounds are
//      reloaded from NVS and nothing is saved (So–Do).
//
// While a session is active the control cycle performs no mapping and writes
// no outputs.

use crate::events::{PedalId, ToneCue};
use crate::interfaces::{Buzzer, CalibrationStore};
use crate::registry::ChannelRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Active { started_ms: u32 },
    /// Timed out this cycle; a finish request in the same cycle must not save.
    Canceled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationOutcome {
    /// Bounds committed. `persisted` is false if the store rejected a write.
    Committed { persisted: bool },
    /// Timed out; committed bounds restored.
    TimedOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CalibrationSession {
    state: SessionState,
}

impl CalibrationSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, SessionState::Active { .. })
    }

    /// Begin a session, superseding any running one.
    pub fn start(&mut self, registry: &mut ChannelRegistry, buzzer: &mut dyn Buzzer, now_ms: u32) {
        if self.is_active() {
            log::warn!("Calibration restarted — discarding in-progress bounds");
        }
        registry.clear_bounds();
        self.state = SessionState::Active { started_ms: now_ms };
        log::info!("Calibration started");
        buzzer.play(ToneCue::CalibrationStart);
    }

    /// Widen `pedal`'s bounds to include `mv`. Ignored unless active.
    pub fn sample(&self, registry: &mut ChannelRegistry, pedal: PedalId, mv: i32) {
        if self.is_active() {
            registry[pedal].bounds.widen(mv);
        }
    }

    /// Cancel the session if it has run for `timeout_ms`. Returns `true` on
    /// the cycle the timeout fires.
    pub fn check_timeout(
        &mut self,
        registry: &mut ChannelRegistry,
        store: &mut dyn CalibrationStore,
        buzzer: &mut dyn Buzzer,
        now_ms: u32,
        timeout_ms: u32,
    ) -> bool {
        let SessionState::Active { started_ms } = self.state else {
            return false;
        };
        if now_ms.wrapping_sub(started_ms) < timeout_ms {
            return false;
        }

        self.state = SessionState::Canceled;
        registry.load_bounds(store);
        log::warn!("Calibration timed out after {} ms — previous bounds restored", timeout_ms);
        buzzer.play(ToneCue::CalibrationCanceled);
        true
    }

    /// Handle a finish request. A session canceled earlier in the same cycle
    /// ends without saving or sounding the success cue.
    pub fn finish(
        &mut self,
        registry: &ChannelRegistry,
        store: &mut dyn CalibrationStore,
        buzzer: &mut dyn Buzzer,
    ) -> Option<CalibrationOutcome> {
        let outcome = match self.state {
            SessionState::Idle => return None,
            SessionState::Canceled => {
                log::info!("Calibration was canceled — bounds not saved");
                CalibrationOutcome::TimedOut
            }
            SessionState::Active { .. } => {
                let persisted = match registry.save_bounds(store) {
                    Ok(()) => true,
                    Err(e) => {
                        log::error!("Saving calibration failed: {:?}", e);
                        false
                    }
                };
                buzzer.play(ToneCue::CalibrationSaved);
                log::info!("Calibration complete");
                CalibrationOutcome::Committed { persisted }
            }
        };
        self.state = SessionState::Idle;
        Some(outcome)
    }

    /// End-of-cycle cleanup: a canceled session becomes idle.
    pub fn settle(&mut self) -> Option<CalibrationOutcome> {
        if self.state == SessionState::Canceled {
            self.state = SessionState::Idle;
            Some(CalibrationOutcome::TimedOut)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::CalibrationBounds;
    use crate::testing::{MemoryStore, ToneLog};

    fn committed_store() -> MemoryStore {
        let mut store = MemoryStore::default();
        let mut registry = ChannelRegistry::new();
        registry[PedalId::Sustain].bounds = CalibrationBounds::new(500, 3000);
        registry[PedalId::Sostenuto].bounds = CalibrationBounds::new(600, 2900);
        registry[PedalId::Soft].bounds = CalibrationBounds::new(700, 2800);
        registry.save_bounds(&mut store).unwrap();
        store
    }

    #[test]
    fn start_clears_bounds_and_beeps() {
        let mut store = committed_store();
        let mut registry = ChannelRegistry::new();
        registry.load_bounds(&mut store);
        let mut tones = ToneLog::default();
        let mut session = CalibrationSession::new();

        session.start(&mut registry, &mut tones, 0);

        assert!(session.is_active());
        assert_eq!(tones.0, vec![(1, 120), (5, 120)]);
        for pedal in PedalId::ALL {
            assert_eq!(registry.bounds(pedal), CalibrationBounds::UNSET);
        }
    }

    #[test]
    fn samples_widen_each_pedal_independently() {
        let mut registry = ChannelRegistry::new();
        let mut session = CalibrationSession::new();
        session.start(&mut registry, &mut ToneLog::default(), 0);

        let sustain = [1500, 1400, 2200, 1800, 3100, 900, 1000];
        let soft = [2000, 2000, 2100, 1900, 2050];
        let (mut last_min, mut last_max) = (i32::MAX, i32::MIN);
        for (i, &mv) in sustain.iter().enumerate() {
            session.sample(&mut registry, PedalId::Sustain, mv);
            if let Some(&soft_mv) = soft.get(i) {
                session.sample(&mut registry, PedalId::Soft, soft_mv);
            }
            let b = registry.bounds(PedalId::Sustain);
            assert!(b.min <= last_min && b.max >= last_max);
            last_min = b.min;
            last_max = b.max;
        }
        assert_eq!(registry.bounds(PedalId::Sustain), CalibrationBounds::new(900, 3100));
        assert_eq!(registry.bounds(PedalId::Soft), CalibrationBounds::new(1900, 2100));
        assert!(!registry.bounds(PedalId::Sostenuto).is_calibrated());
    }

    #[test]
    fn sampling_outside_a_session_is_ignored() {
        let mut registry = ChannelRegistry::new();
        let session = CalibrationSession::new();
        session.sample(&mut registry, PedalId::Soft, 1200);
        assert_eq!(registry.bounds(PedalId::Soft), CalibrationBounds::UNSET);
    }

    #[test]
    fn finish_persists_and_plays_success() {
        let mut store = MemoryStore::default();
        let mut registry = ChannelRegistry::new();
        let mut tones = ToneLog::default();
        let mut session = CalibrationSession::new();
        session.start(&mut registry, &mut tones, 0);
        session.sample(&mut registry, PedalId::Soft, 800);
        session.sample(&mut registry, PedalId::Soft, 2600);

        let outcome = session.finish(&registry, &mut store, &mut tones);

        assert_eq!(outcome, Some(CalibrationOutcome::Committed { persisted: true }));
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(store.get("softmin"), Some(800));
        assert_eq!(store.get("softmax"), Some(2600));
        assert_eq!(tones.0.last(), Some(&(5, 240)));
    }

    #[test]
    fn failed_persist_still_ends_the_session() {
        let mut store = MemoryStore::default();
        store.fail_writes = true;
        let mut registry = ChannelRegistry::new();
        let mut session = CalibrationSession::new();
        session.start(&mut registry, &mut ToneLog::default(), 0);

        let outcome = session.finish(&registry, &mut store, &mut ToneLog::default());

        assert_eq!(outcome, Some(CalibrationOutcome::Committed { persisted: false }));
        assert!(!session.is_active());
    }

    #[test]
    fn timeout_restores_committed_bounds() {
        let mut store = committed_store();
        let mut registry = ChannelRegistry::new();
        registry.load_bounds(&mut store);
        let mut tones = ToneLog::default();
        let mut session = CalibrationSession::new();
        session.start(&mut registry, &mut tones, 1000);
        session.sample(&mut registry, PedalId::Sustain, 100);

        assert!(!session.check_timeout(&mut registry, &mut store, &mut tones, 20_999, 20_000));
        assert!(session.check_timeout(&mut registry, &mut store, &mut tones, 21_000, 20_000));

        assert_eq!(session.state(), SessionState::Canceled);
        assert_eq!(registry.bounds(PedalId::Sustain), CalibrationBounds::new(500, 3000));
        assert_eq!(registry.bounds(PedalId::Soft), CalibrationBounds::new(700, 2800));
        assert_eq!(tones.0[2..], [(5, 120), (1, 120)]);
        assert_eq!(session.settle(), Some(CalibrationOutcome::TimedOut));
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn timeout_wins_over_finish_in_the_same_cycle() {
        let mut store = committed_store();
        let before = store.clone();
        let mut registry = ChannelRegistry::new();
        registry.load_bounds(&mut store);
        let mut tones = ToneLog::default();
        let mut session = CalibrationSession::new();
        session.start(&mut registry, &mut tones, 0);
        session.sample(&mut registry, PedalId::Sostenuto, 50);

        session.check_timeout(&mut registry, &mut store, &mut tones, 20_000, 20_000);
        let outcome = session.finish(&registry, &mut store, &mut tones);

        assert_eq!(outcome, Some(CalibrationOutcome::TimedOut));
        assert_eq!(store, before);
        assert!(!tones.0.contains(&(5, 240)));
        assert_eq!(session.settle(), None);
    }

    #[test]
    fn finish_without_session_is_a_no_op() {
        let mut session = CalibrationSession::new();
        let mut store = MemoryStore::default();
        let outcome = session.finish(&ChannelRegistry::new(), &mut store, &mut ToneLog::default());
        assert_eq!(outcome, None);
        assert_eq!(store.writes, 0);
    }
}
