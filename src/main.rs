// Hall Pedal: Firmware Entry Point
//
// Boot sequence:
//   1. Load the committed pedal ranges from NVS.
//   2. Calibration button (sostenuto) held → guided calibration (Do–So).
//   3. Soft pedal held → upload portal requested (Do–Mi–So).
//   4. Otherwise normal operation.
//
// Normal operation is a single control task polling every ~10 ms:
//   Hall sensors → 0–255 → sustain/sostenuto DACs + soft switch, and
//   sostenuto gestures → page turns while a page turner is connected.

#[cfg(target_os = "espidf")]
mod drivers;
#[cfg(target_os = "espidf")]
mod input;
#[cfg(target_os = "espidf")]
mod tasks;

#[cfg(target_os = "espidf")]
use std::thread;
#[cfg(target_os = "espidf")]
use std::time::Duration;

#[cfg(target_os = "espidf")]
use esp_idf_hal::gpio::{InputPin, OutputPin};
#[cfg(target_os = "espidf")]
use esp_idf_hal::prelude::*;
#[cfg(target_os = "espidf")]
use esp_idf_svc::nvs::EspDefaultNvsPartition;

#[cfg(target_os = "espidf")]
use hall_pedal::config::*;

// ---------------------------------------------------------------------------
// Utility: milliseconds since boot (wraps at ~49 days: fine for timeouts)
// ---------------------------------------------------------------------------
#[cfg(target_os = "espidf")]
pub fn now_ms() -> u32 {
    unsafe { (esp_idf_sys::esp_timer_get_time() / 1000) as u32 }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------
#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    // Link esp-idf-sys runtime patches and initialise logging.
    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();
    log::info!("Hall pedal firmware starting…");

    // ---- Peripherals ------------------------------------------------------
    let peripherals = Peripherals::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    // ADC, DAC and LEDC are driven through the raw ESP-IDF oneshot APIs and
    // claim their pins by number; only the GPIOs go through PinDriver.
    let hardware = tasks::control::ControlHardware {
        calibrate_button: peripherals.pins.gpio14.downgrade_input(),
        soft_switch: peripherals.pins.gpio17.downgrade_output(),
        nvs,
    };

    // ---- Control task -----------------------------------------------------
    thread::Builder::new()
        .name("control".into())
        .stack_size(STACK_CONTROL)
        .spawn(move || {
            if let Err(e) = tasks::control::control_task(hardware) {
                log::error!("Control task failed: {:?}", e);
            }
        })?;

    // Main thread has nothing left to do: park it forever.
    loop {
        thread::sleep(Duration::from_secs(60));
    }
}

/// Host builds carry the library and its tests; the firmware itself only runs
/// on the ESP32.
#[cfg(not(target_os = "espidf"))]
fn main() -> anyhow::Result<()> {
    eprintln!("hall-pedal: firmware entry point is only available on the espidf target");
    Ok(())
}
