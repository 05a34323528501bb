pub mod adc;
pub mod buzzer;
pub mod dac;
pub mod link;
pub mod nvs;
