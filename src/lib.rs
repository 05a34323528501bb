// Hall Pedal: Signal Path
//
// Hardware-independent core of the pedal controller: oversampled Hall
// readings, adaptive smoothing to 0–255, guided range calibration and
// pedal gestures.  The ESP32 bindings live in the firmware binary.

pub mod calibration;
pub mod config;
pub mod controller;
pub mod events;
pub mod gesture;
pub mod interfaces;
pub mod mapper;
pub mod registry;
pub mod sampler;

#[cfg(test)]
mod testing;
