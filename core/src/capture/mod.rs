pub mod adc;

pub use adc::{AdcFrameLoader, AdcTensor};
