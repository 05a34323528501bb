// Hall Pedal: Pedal Buttons
//
// Mechanical buttons under each pedal, wired active LOW.  Only the sostenuto
// button is read (calibration trigger and finish); the other two only get
// their pull-ups so they do not float.

use esp_idf_hal::gpio::{AnyInputPin, Input, PinDriver};

use hall_pedal::config::*;
use hall_pedal::interfaces::ButtonInput;

pub struct PedalButton<'d> {
    pin: PinDriver<'d, AnyInputPin, Input>,
}

impl<'d> PedalButton<'d> {
    pub fn new(pin: PinDriver<'d, AnyInputPin, Input>) -> Self {
        configure_pullups();
        Self { pin }
    }
}

impl ButtonInput for PedalButton<'_> {
    fn is_low(&mut self) -> bool {
        self.pin.is_low()
    }
}

/// Enable internal pull-ups on all three pedal buttons.  Done through the raw
/// API because a downgraded input-only pin has no pull configuration.
fn configure_pullups() {
    for pin in [PIN_BUTTON_SUSTAIN, PIN_BUTTON_SOSTENUTO, PIN_BUTTON_SOFT] {
        let ret = unsafe {
            esp_idf_sys::gpio_set_pull_mode(pin, esp_idf_sys::gpio_pull_mode_t_GPIO_PULLUP_ONLY)
        };
        if ret != esp_idf_sys::ESP_OK {
            log::warn!("Pull-up on GPIO{} failed ({})", pin, ret);
        }
    }
}
