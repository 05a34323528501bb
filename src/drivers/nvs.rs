// Hall Pedal: NVS Calibration Store

use esp_idf_svc::nvs::{EspDefaultNvsPartition, EspNvs, NvsDefault};

use hall_pedal::config::NVS_NAMESPACE;
use hall_pedal::interfaces::CalibrationStore;

pub struct NvsStore {
    nvs: EspNvs<NvsDefault>,
}

impl NvsStore {
    pub fn new(partition: EspDefaultNvsPartition) -> anyhow::Result<Self> {
        let nvs = EspNvs::new(partition, NVS_NAMESPACE, true)?;
        Ok(Self { nvs })
    }
}

impl CalibrationStore for NvsStore {
    fn load(&mut self, key: &str, default: i32) -> i32 {
        match self.nvs.get_i32(key) {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(e) => {
                log::warn!("NVS read of '{}' failed: {}", key, e);
                default
            }
        }
    }

    fn save(&mut self, key: &str, value: i32) -> anyhow::Result<()> {
        self.nvs.set_i32(key, value)?;
        Ok(())
    }
}
