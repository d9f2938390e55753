//! Signal-processing core for FMCW radar ADC captures.
//!
//! The modules follow the evaluation-tool processing chain: parameter
//! derivation, ADC deframing, Kaiser windowing, range and Doppler FFTs and
//! dBFS normalization into Range-Doppler maps and range profiles.

pub mod capture;
pub mod math;
pub mod prelude;
pub mod processing;
pub mod radar;
pub mod telemetry;

pub use capture::{AdcFrameLoader, AdcTensor};
pub use prelude::{FmcwError, FmcwResult, ProcessingStage};
pub use processing::{Pipeline, PipelineOutput, RangeDopplerMap, RangeProfile};
pub use radar::{DerivedParameters, RadarConfig, RadarParameters};
