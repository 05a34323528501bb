// Hall Pedal: Companion Subsystem Links
//
// The Bluetooth page turner and the upload portal run outside the control
// task.  These are the ends the control cycle talks to.

use hall_pedal::events::{PageKey, PedalId};
use hall_pedal::interfaces::{PageTurner, StatusSink};

/// Page turner connection state as seen by the control task.  No BLE
/// keyboard stack is linked into this firmware, so `connected` is never set
/// and the sostenuto pedal always keeps its DAC output.
#[derive(Debug, Default)]
pub struct PageTurnerLink {
    connected: bool,
}

impl PageTurner for PageTurnerLink {
    fn is_connected(&self) -> bool {
        self.connected
    }

    fn send(&mut self, key: PageKey) {
        log::info!("Page key → host: {:?}", key);
    }
}

/// Mirrors the portal's live pedal table to the log.
#[derive(Debug, Default)]
pub struct LogStatus;

impl StatusSink for LogStatus {
    fn report(&mut self, status_index: u8, mv: i32, min: i32, max: i32, mapped: u8) {
        let name = PedalId::ALL
            .iter()
            .find(|p| p.status_index() == status_index)
            .map(|p| p.display_name())
            .unwrap_or("?");
        log::debug!("[{}] {} mV | range {}–{} mV | mapped {:03}", name, mv, min, max, mapped);
    }
}
