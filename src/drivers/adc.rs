// Hall Pedal: ADC1 Oneshot Driver
//
// Raw ESP-IDF oneshot reads of the three Hall sensors (11 dB attenuation,
// 12-bit) plus the line-fitting calibration scheme that turns counts into
// millivolts.

use esp_idf_sys::{self as sys, esp};

use hall_pedal::config::*;
use hall_pedal::events::PedalId;
use hall_pedal::interfaces::{CalibrationCurve, RawSensor};

const ATTEN: sys::adc_atten_t = sys::adc_atten_t_ADC_ATTEN_DB_11;
const BITWIDTH: sys::adc_bitwidth_t = sys::adc_bitwidth_t_ADC_BITWIDTH_12;

fn channel(pedal: PedalId) -> sys::adc_channel_t {
    match pedal {
        PedalId::Sustain   => ADC_CHANNEL_SUSTAIN as sys::adc_channel_t,
        PedalId::Sostenuto => ADC_CHANNEL_SOSTENUTO as sys::adc_channel_t,
        PedalId::Soft      => ADC_CHANNEL_SOFT as sys::adc_channel_t,
    }
}

pub struct PedalAdc {
    unit: sys::adc_oneshot_unit_handle_t,
    // Last good count per pedal, returned if a read fails.
    last: [u16; 3],
}

impl PedalAdc {
    pub fn new() -> anyhow::Result<Self> {
        let mut unit: sys::adc_oneshot_unit_handle_t = core::ptr::null_mut();
        unsafe {
            let unit_cfg = sys::adc_oneshot_unit_init_cfg_t {
                unit_id: sys::adc_unit_t_ADC_UNIT_1,
                ulp_mode: sys::adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
                ..core::mem::zeroed()
            };
            esp!(sys::adc_oneshot_new_unit(&unit_cfg, &mut unit))?;

            let chan_cfg = sys::adc_oneshot_chan_cfg_t {
                atten: ATTEN,
                bitwidth: BITWIDTH,
            };
            for pedal in PedalId::ALL {
                esp!(sys::adc_oneshot_config_channel(unit, channel(pedal), &chan_cfg))?;
            }
        }
        log::info!(
            "ADC1 ready — sustain GPIO{} | sostenuto GPIO{} | soft GPIO{}",
            PIN_ADC_SUSTAIN,
            PIN_ADC_SOSTENUTO,
            PIN_ADC_SOFT
        );
        Ok(Self { unit, last: [0; 3] })
    }
}

impl RawSensor for PedalAdc {
    fn sample(&mut self, pedal: PedalId) -> u16 {
        let mut raw: i32 = 0;
        let ret = unsafe { sys::adc_oneshot_read(self.unit, channel(pedal), &mut raw) };
        if ret == sys::ESP_OK {
            self.last[pedal.index()] = raw.clamp(0, i32::from(u16::MAX)) as u16;
        } else {
            log::debug!("ADC read failed on {} ({})", pedal.display_name(), ret);
        }
        self.last[pedal.index()]
    }
}

impl Drop for PedalAdc {
    fn drop(&mut self) {
        unsafe {
            sys::adc_oneshot_del_unit(self.unit);
        }
    }
}

/// Counts → millivolts, characterised once from eFuse/default Vref.
pub struct AdcCurve {
    handle: sys::adc_cali_handle_t,
}

impl AdcCurve {
    pub fn new() -> anyhow::Result<Self> {
        let mut handle: sys::adc_cali_handle_t = core::ptr::null_mut();
        unsafe {
            let cfg = sys::adc_cali_line_fitting_config_t {
                unit_id: sys::adc_unit_t_ADC_UNIT_1,
                atten: ATTEN,
                bitwidth: BITWIDTH,
                ..core::mem::zeroed()
            };
            esp!(sys::adc_cali_create_scheme_line_fitting(&cfg, &mut handle))?;
        }
        Ok(Self { handle })
    }
}

impl CalibrationCurve for AdcCurve {
    fn raw_to_mv(&self, raw: u16) -> i32 {
        let mut mv: i32 = 0;
        unsafe {
            sys::adc_cali_raw_to_voltage(self.handle, i32::from(raw), &mut mv);
        }
        mv
    }
}
