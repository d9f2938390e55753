pub mod doppler;
pub mod normalize;
pub mod pipeline;
pub mod profile;
pub mod range;

pub use doppler::{DopplerSpectrum, DopplerStage, MapPeak, RangeDopplerMap};
pub use normalize::Normalizer;
pub use pipeline::{Pipeline, PipelineOutput};
pub use profile::{chirp_mean_magnitude, ProfileStage, RangeProfile};
pub use range::{RangeFftResult, RangeStage};
