// Hall Pedal: Piezo Buzzer Driver
//
// LEDC PWM at 50 % duty; the timer frequency is retuned per note.

use std::thread;
use std::time::Duration;

use esp_idf_sys::{self as sys, esp};

use hall_pedal::config::*;
use hall_pedal::interfaces::{degree_to_hz, Buzzer};

const SPEED_MODE: sys::ledc_mode_t = sys::ledc_mode_t_LEDC_LOW_SPEED_MODE;
const TIMER: sys::ledc_timer_t = sys::ledc_timer_t_LEDC_TIMER_0;
const CHANNEL: sys::ledc_channel_t = BUZZER_LEDC_CHANNEL as sys::ledc_channel_t;
const HALF_DUTY: u32 = 1 << (BUZZER_DUTY_BITS - 1);

pub struct PiezoBuzzer;

impl PiezoBuzzer {
    pub fn new() -> anyhow::Result<Self> {
        unsafe {
            let timer_cfg = sys::ledc_timer_config_t {
                speed_mode: SPEED_MODE,
                duty_resolution: BUZZER_DUTY_BITS as sys::ledc_timer_bit_t,
                timer_num: TIMER,
                freq_hz: BUZZER_BASE_FREQ_HZ,
                ..core::mem::zeroed()
            };
            esp!(sys::ledc_timer_config(&timer_cfg))?;

            let channel_cfg = sys::ledc_channel_config_t {
                gpio_num: PIN_BUZZER,
                speed_mode: SPEED_MODE,
                channel: CHANNEL,
                timer_sel: TIMER,
                duty: 0,
                hpoint: 0,
                ..core::mem::zeroed()
            };
            esp!(sys::ledc_channel_config(&channel_cfg))?;
        }
        Ok(Self)
    }

    fn set_duty(&mut self, duty: u32) {
        unsafe {
            sys::ledc_set_duty(SPEED_MODE, CHANNEL, duty);
            sys::ledc_update_duty(SPEED_MODE, CHANNEL);
        }
    }

    pub fn silence(&mut self) {
        self.set_duty(0);
    }
}

impl Buzzer for PiezoBuzzer {
    /// Blocks the calling thread for `duration_ms`; 0 leaves the note on.
    fn tone(&mut self, degree: u8, duration_ms: u32) {
        let Some(freq) = degree_to_hz(degree) else {
            return;
        };
        unsafe {
            sys::ledc_set_freq(SPEED_MODE, TIMER, freq);
        }
        self.set_duty(HALF_DUTY);

        if duration_ms > 0 {
            thread::sleep(Duration::from_millis(u64::from(duration_ms)));
            self.silence();
        }
    }
}
