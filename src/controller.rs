// Hall Pedal: Control Cycle
//
// One `cycle` per loop pass (~10 ms).  Either a calibration pass (sample and
// widen only, no outputs) or a normal pass:
//   sample → map → DAC / switch outputs → page-turn gesture.

use crate::calibration::{CalibrationOutcome, CalibrationSession};
use crate::config::*;
use crate::events::{BootMode, PageKey, PedalId, ToneCue};
use crate::gesture::{debounced_low, EngageDetector, Gesture, HoldClassifier, LongPressTracker};
use crate::interfaces::{Io, PedalOutputs};
use crate::registry::ChannelRegistry;
use crate::sampler::read_millivolts;

/// What one pass did, for the caller's logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CycleReport {
    /// A calibration session was running when the pass began.
    pub calibrating: bool,
    /// Mapped values by `PedalId::index`; `None` on a calibration pass.
    pub mapped: Option<[u8; 3]>,
    pub page_key: Option<PageKey>,
    pub calibration: Option<CalibrationOutcome>,
}

pub struct PedalController {
    config: ControllerConfig,
    registry: ChannelRegistry,
    session: CalibrationSession,
    finish_press: LongPressTracker,
    page_engage: EngageDetector,
    page_hold: HoldClassifier,
}

impl PedalController {
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            config,
            registry: ChannelRegistry::new(),
            session: CalibrationSession::new(),
            finish_press: LongPressTracker::new(config.calibration_finish_hold_ms),
            page_engage: EngageDetector::new(config.page_turn_engage_above, config.page_turn_release_below),
            page_hold: HoldClassifier::new(config.page_turn_long_press_ms),
        }
    }

    /// Load committed bounds, then decide the boot mode from what the user is
    /// holding.  `recheck` waits out the button debounce interval.
    pub fn boot(&mut self, io: &mut Io<'_>, now_ms: u32, recheck: impl FnOnce()) -> BootMode {
        self.registry.load_bounds(io.store);

        if debounced_low(io.calibrate_button, recheck) {
            self.session.start(&mut self.registry, io.buzzer, now_ms);
            return BootMode::Calibration;
        }

        let mv = read_millivolts(io.sensor, io.curve, PedalId::Soft);
        let soft = self.registry.map_pedal(PedalId::Soft, mv, self.config.deadzone, None);
        if soft > PORTAL_TRIGGER_ABOVE {
            log::info!("Soft pedal held at boot ({}) — portal requested", soft);
            io.buzzer.play(ToneCue::PortalBoot);
            return BootMode::Portal;
        }

        BootMode::Normal
    }

    pub fn cycle(&mut self, io: &mut Io<'_>, now_ms: u32) -> CycleReport {
        if self.session.is_active() {
            return self.calibration_cycle(io, now_ms);
        }

        let mut mapped = [0u8; 3];
        for pedal in PedalId::ALL {
            let mv = read_millivolts(io.sensor, io.curve, pedal);
            mapped[pedal.index()] =
                self.registry
                    .map_pedal(pedal, mv, self.config.deadzone, io.status.as_deref_mut());
        }

        // A connected page turner takes over the sostenuto pedal.
        let page_turner = io.page_turner.is_connected();
        drive_outputs(io.outputs, &mapped, page_turner);

        let page_key = if page_turner {
            self.page_turn(mapped[PedalId::Sostenuto.index()], now_ms)
        } else {
            self.page_engage = EngageDetector::new(
                self.config.page_turn_engage_above,
                self.config.page_turn_release_below,
            );
            self.page_hold = HoldClassifier::new(self.config.page_turn_long_press_ms);
            None
        };
        if let Some(key) = page_key {
            log::info!("Page turn: {:?}", key);
            io.page_turner.send(key);
        }

        CycleReport { calibrating: false, mapped: Some(mapped), page_key, calibration: None }
    }

    fn calibration_cycle(&mut self, io: &mut Io<'_>, now_ms: u32) -> CycleReport {
        for pedal in PedalId::ALL {
            let mv = read_millivolts(io.sensor, io.curve, pedal);
            self.session.sample(&mut self.registry, pedal, mv);
        }

        // Timeout is checked first so it wins a same-cycle finish request.
        self.session.check_timeout(
            &mut self.registry,
            io.store,
            io.buzzer,
            now_ms,
            self.config.calibration_timeout_ms,
        );

        let finish = self.finish_press.update(io.calibrate_button.is_low(), now_ms);
        let mut calibration = None;
        if finish {
            calibration = self.session.finish(&self.registry, io.store, io.buzzer);
        }
        if calibration.is_none() {
            calibration = self.session.settle();
        }

        CycleReport { calibrating: true, mapped: None, page_key: None, calibration }
    }

    fn page_turn(&mut self, sostenuto: u8, now_ms: u32) -> Option<PageKey> {
        let down = self.page_engage.update(sostenuto);
        match self.page_hold.update(down, now_ms)? {
            Gesture::Long => Some(PageKey::PageUp),
            Gesture::Short { .. } => Some(PageKey::PageDown),
            Gesture::Overheld { held_ms } => {
                log::debug!("Page pedal held {} ms between polls — no key", held_ms);
                None
            }
        }
    }

    /// Last mapped value for `pedal`.
    pub fn mapped_value(&self, pedal: PedalId) -> u8 {
        self.registry.mapped_value(pedal)
    }

    pub fn calibration_active(&self) -> bool {
        self.session.is_active()
    }

    /// Drop `pedal`'s smoothing history.
    pub fn reset_channel(&mut self, pedal: PedalId) {
        self.registry.reset_filter(pedal);
    }

    pub fn registry(&self) -> &ChannelRegistry {
        &self.registry
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }
}

fn dac_level(mapped: u8) -> u8 {
    (u16::from(mapped) * DAC_SCALE_NUM / DAC_SCALE_DEN) as u8
}

fn drive_outputs(outputs: &mut dyn PedalOutputs, mapped: &[u8; 3], page_turner: bool) {
    if let Err(e) = outputs.write_sustain(dac_level(mapped[PedalId::Sustain.index()])) {
        log::warn!("Sustain DAC write failed: {:?}", e);
    }
    if !page_turner {
        if let Err(e) = outputs.write_sostenuto(dac_level(mapped[PedalId::Sostenuto.index()])) {
            log::warn!("Sostenuto DAC write failed: {:?}", e);
        }
    }
    if let Err(e) = outputs.set_soft_switch(mapped[PedalId::Soft.index()] > SOFT_SWITCH_ABOVE) {
        log::warn!("Soft switch write failed: {:?}", e);
    }
}
