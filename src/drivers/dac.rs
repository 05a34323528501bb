// Hall Pedal: Pedal Outputs
//
// Sustain and sostenuto are analog voltages on the two ESP32 DAC channels;
// the soft pedal is a plain switch output.

use esp_idf_hal::gpio::{AnyOutputPin, Output, PinDriver};
use esp_idf_sys::{self as sys, esp};

use hall_pedal::config::*;
use hall_pedal::interfaces::PedalOutputs;

fn dac_channel(chan_id: sys::dac_channel_t) -> anyhow::Result<sys::dac_oneshot_handle_t> {
    let mut handle: sys::dac_oneshot_handle_t = core::ptr::null_mut();
    let cfg = sys::dac_oneshot_config_t { chan_id };
    unsafe {
        esp!(sys::dac_oneshot_new_channel(&cfg, &mut handle))?;
    }
    Ok(handle)
}

pub struct DacOutputs<'d> {
    sustain: sys::dac_oneshot_handle_t,
    sostenuto: sys::dac_oneshot_handle_t,
    soft_switch: PinDriver<'d, AnyOutputPin, Output>,
}

impl<'d> DacOutputs<'d> {
    pub fn new(soft_switch: PinDriver<'d, AnyOutputPin, Output>) -> anyhow::Result<Self> {
        let mut outputs = Self {
            sustain: dac_channel(sys::dac_channel_t_DAC_CHAN_0)?,
            sostenuto: dac_channel(sys::dac_channel_t_DAC_CHAN_1)?,
            soft_switch,
        };
        outputs.soft_switch.set_low()?;
        log::info!(
            "Outputs ready — sustain DAC GPIO{} | sostenuto DAC GPIO{} | soft switch GPIO{}",
            PIN_DAC_SUSTAIN,
            PIN_DAC_SOSTENUTO,
            PIN_SWITCH_SOFT
        );
        Ok(outputs)
    }
}

impl PedalOutputs for DacOutputs<'_> {
    fn write_sustain(&mut self, value: u8) -> anyhow::Result<()> {
        unsafe { esp!(sys::dac_oneshot_output_voltage(self.sustain, value))? };
        Ok(())
    }

    fn write_sostenuto(&mut self, value: u8) -> anyhow::Result<()> {
        unsafe { esp!(sys::dac_oneshot_output_voltage(self.sostenuto, value))? };
        Ok(())
    }

    fn set_soft_switch(&mut self, on: bool) -> anyhow::Result<()> {
        if on {
            self.soft_switch.set_high()?;
        } else {
            self.soft_switch.set_low()?;
        }
        Ok(())
    }
}
