// Hall Pedal: Control Task
//
// Owns every pedal peripheral and runs the control cycle with a fixed
// ~10 ms delay between passes.

use std::thread;
use std::time::{Duration, Instant};

use esp_idf_hal::gpio::{AnyInputPin, AnyOutputPin, PinDriver};
use esp_idf_svc::nvs::EspDefaultNvsPartition;

use hall_pedal::config::*;
use hall_pedal::controller::PedalController;
use hall_pedal::events::{BootMode, PedalId};
use hall_pedal::interfaces::{Io, StatusSink};

use crate::drivers::adc::{AdcCurve, PedalAdc};
use crate::drivers::buzzer::PiezoBuzzer;
use crate::drivers::dac::DacOutputs;
use crate::drivers::link::{LogStatus, PageTurnerLink};
use crate::drivers::nvs::NvsStore;
use crate::input::PedalButton;

/// Peripherals handed over from `main`.
pub struct ControlHardware {
    pub calibrate_button: AnyInputPin,
    pub soft_switch: AnyOutputPin,
    pub nvs: EspDefaultNvsPartition,
}

pub fn control_task(hw: ControlHardware) -> anyhow::Result<()> {
    log::info!("Control task started");

    // The ADC/DAC/LEDC handles are raw pointers, so they are created here
    // rather than moved in from `main`.
    let mut sensor = PedalAdc::new()?;
    let curve = AdcCurve::new()?;
    let mut store = NvsStore::new(hw.nvs)?;
    let mut buzzer = PiezoBuzzer::new()?;
    let mut outputs = DacOutputs::new(PinDriver::output(hw.soft_switch)?)?;
    let mut button = PedalButton::new(PinDriver::input(hw.calibrate_button)?);
    let mut page_turner = PageTurnerLink::default();
    let mut status = LogStatus;

    let mut controller = PedalController::new(ControllerConfig::default());

    let mode = {
        let mut io = Io {
            sensor: &mut sensor,
            curve: &curve,
            store: &mut store,
            buzzer: &mut buzzer,
            outputs: &mut outputs,
            page_turner: &mut page_turner,
            calibrate_button: &mut button,
            status: None,
        };
        controller.boot(&mut io, crate::now_ms(), || {
            thread::sleep(Duration::from_millis(u64::from(DEBOUNCE_RECHECK_MS)))
        })
    };
    log::info!("Boot mode: {:?}", mode);

    // The portal's pedal table is only fed while the portal was requested.
    let portal = mode == BootMode::Portal;
    let interval = Duration::from_millis(CYCLE_DELAY_MS);

    loop {
        let tick_start = Instant::now();

        let mut io = Io {
            sensor: &mut sensor,
            curve: &curve,
            store: &mut store,
            buzzer: &mut buzzer,
            outputs: &mut outputs,
            page_turner: &mut page_turner,
            calibrate_button: &mut button,
            status: if portal { Some(&mut status as &mut dyn StatusSink) } else { None },
        };
        let report = controller.cycle(&mut io, crate::now_ms());

        if let Some(outcome) = report.calibration {
            log::info!("Calibration ended: {:?}", outcome);
        }
        if report.calibrating {
            log::trace!("calibrating | cost:{}us", tick_start.elapsed().as_micros());
        } else if let Some(mapped) = report.mapped {
            log::trace!(
                "sustain:{:03} | sostenuto:{:03} | soft:{:03} | cost:{}us",
                mapped[PedalId::Sustain.index()],
                mapped[PedalId::Sostenuto.index()],
                mapped[PedalId::Soft.index()],
                tick_start.elapsed().as_micros()
            );
        }

        thread::sleep(interval);
    }
}
