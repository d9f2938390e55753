/// Common error type for configuration, loading and stage execution.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum FmcwError {
    #[error("invalid configuration: {parameter} = {value} is out of range")]
    Configuration { parameter: &'static str, value: String },
    #[error("ADC stream size mismatch: expected {expected} int16 values, observed {observed}")]
    SizeMismatch { expected: usize, observed: usize },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("internal failure: {0}")]
    Internal(String),
}

impl FmcwError {
    pub(crate) fn configuration(parameter: &'static str, value: impl ToString) -> Self {
        FmcwError::Configuration {
            parameter,
            value: value.to_string(),
        }
    }
}

pub type FmcwResult<T> = Result<T, FmcwError>;

/// Trait describing a single step of the processing chain.
///
/// Stages own their reusable state (window, FFT plan, scratch) and consume
/// immutable inputs, producing freshly allocated outputs.
pub trait ProcessingStage {
    type Input;
    type Output;

    fn name(&self) -> &'static str;
    fn execute(&mut self, input: &Self::Input) -> FmcwResult<Self::Output>;
}
