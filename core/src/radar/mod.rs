pub mod config;
pub mod params;

pub use config::{RadarConfig, RadarParameters, SPEED_OF_LIGHT};
pub use params::DerivedParameters;
