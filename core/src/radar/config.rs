use crate::prelude::{FmcwError, FmcwResult};
use serde::{Deserialize, Serialize};

/// Speed of light in vacuum (m/s).
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;

/// Chirp profile as entered in the evaluation tool, in engineering units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RadarParameters {
    pub start_freq_ghz: f64,
    pub slope_mhz_per_us: f64,
    pub idle_time_us: f64,
    pub ramp_end_time_us: f64,
    pub adc_sample_rate_ksps: f64,
    pub adc_samples: usize,
    pub chirps_per_frame: usize,
    pub frames: usize,
}

impl RadarParameters {
    /// Converts to SI units and validates the result.
    pub fn into_config(&self) -> FmcwResult<RadarConfig> {
        RadarConfig::new(
            self.start_freq_ghz * 1e9,
            self.slope_mhz_per_us * 1e12,
            self.idle_time_us * 1e-6,
            self.ramp_end_time_us * 1e-6,
            self.adc_sample_rate_ksps * 1e3,
            self.adc_samples,
            self.chirps_per_frame,
            self.frames,
        )
    }
}

/// Validated, immutable radar configuration in SI units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RadarConfig {
    start_freq_hz: f64,
    slope_hz_per_s: f64,
    idle_time_s: f64,
    ramp_end_time_s: f64,
    sample_rate_hz: f64,
    adc_samples: usize,
    chirps_per_frame: usize,
    frames: usize,
    #[serde(skip)]
    stream_len: usize,
}

impl RadarConfig {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        start_freq_hz: f64,
        slope_hz_per_s: f64,
        idle_time_s: f64,
        ramp_end_time_s: f64,
        sample_rate_hz: f64,
        adc_samples: usize,
        chirps_per_frame: usize,
        frames: usize,
    ) -> FmcwResult<Self> {
        for (parameter, value) in [
            ("start_freq", start_freq_hz),
            ("slope", slope_hz_per_s),
            ("idle_time", idle_time_s),
            ("ramp_end_time", ramp_end_time_s),
            ("adc_sample_rate", sample_rate_hz),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(FmcwError::configuration(parameter, value));
            }
        }
        if adc_samples < 2 || adc_samples % 2 != 0 {
            return Err(FmcwError::configuration("adc_samples", adc_samples));
        }
        if chirps_per_frame < 2 || chirps_per_frame % 2 != 0 {
            return Err(FmcwError::configuration(
                "chirps_per_frame",
                chirps_per_frame,
            ));
        }
        if frames == 0 {
            return Err(FmcwError::configuration("frames", frames));
        }
        let stream_len = 2usize
            .checked_mul(adc_samples)
            .and_then(|len| len.checked_mul(chirps_per_frame))
            .and_then(|len| len.checked_mul(frames))
            .ok_or_else(|| {
                FmcwError::configuration(
                    "stream_len",
                    format!("2 x {} x {} x {}", adc_samples, chirps_per_frame, frames),
                )
            })?;

        Ok(Self {
            start_freq_hz,
            slope_hz_per_s,
            idle_time_s,
            ramp_end_time_s,
            sample_rate_hz,
            adc_samples,
            chirps_per_frame,
            frames,
            stream_len,
        })
    }

    pub fn start_freq_hz(&self) -> f64 {
        self.start_freq_hz
    }

    pub fn slope_hz_per_s(&self) -> f64 {
        self.slope_hz_per_s
    }

    pub fn idle_time_s(&self) -> f64 {
        self.idle_time_s
    }

    pub fn ramp_end_time_s(&self) -> f64 {
        self.ramp_end_time_s
    }

    pub fn sample_rate_hz(&self) -> f64 {
        self.sample_rate_hz
    }

    pub fn adc_samples(&self) -> usize {
        self.adc_samples
    }

    pub fn chirps_per_frame(&self) -> usize {
        self.chirps_per_frame
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Number of int16 values a raw capture must hold (I and Q slot per sample).
    pub fn expected_stream_len(&self) -> usize {
        self.stream_len
    }
}

#[cfg(test)]
pub(crate) fn reference_parameters() -> RadarParameters {
    RadarParameters {
        start_freq_ghz: 77.0,
        slope_mhz_per_us: 29.982,
        idle_time_us: 100.0,
        ramp_end_time_us: 60.0,
        adc_sample_rate_ksps: 10_000.0,
        adc_samples: 256,
        chirps_per_frame: 128,
        frames: 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engineering_units_convert_to_si() {
        let config = reference_parameters().into_config().unwrap();
        assert!((config.start_freq_hz() - 77e9).abs() < 1.0);
        assert!((config.slope_hz_per_s() - 29.982e12).abs() < 1.0);
        assert!((config.ramp_end_time_s() - 60e-6).abs() < 1e-15);
        assert!((config.idle_time_s() - 100e-6).abs() < 1e-15);
        assert_eq!(config.sample_rate_hz(), 10e6);
        assert_eq!(config.expected_stream_len(), 2 * 256 * 128);
    }

    #[test]
    fn non_positive_time_is_rejected_with_parameter_name() {
        let mut params = reference_parameters();
        params.idle_time_us = 0.0;
        match params.into_config() {
            Err(FmcwError::Configuration { parameter, .. }) => assert_eq!(parameter, "idle_time"),
            other => panic!("unexpected result {:?}", other),
        }

        params = reference_parameters();
        params.slope_mhz_per_us = -1.0;
        assert!(params.into_config().is_err());
    }

    #[test]
    fn odd_or_tiny_sample_counts_are_rejected() {
        let mut params = reference_parameters();
        params.adc_samples = 255;
        assert!(params.into_config().is_err());

        params = reference_parameters();
        params.chirps_per_frame = 0;
        assert!(params.into_config().is_err());

        params = reference_parameters();
        params.frames = 0;
        let err = params.into_config().unwrap_err();
        assert!(err.to_string().contains("frames"));
    }

    #[test]
    fn oversized_capture_shape_is_rejected() {
        let huge = 1usize << (usize::BITS / 2);
        let err = RadarConfig::new(77e9, 30e12, 100e-6, 60e-6, 10e6, huge, huge, 1).unwrap_err();
        match err {
            FmcwError::Configuration { parameter, .. } => assert_eq!(parameter, "stream_len"),
            other => panic!("unexpected error {:?}", other),
        }

        let config = RadarConfig::new(77e9, 30e12, 100e-6, 60e-6, 10e6, 4, 2, 3).unwrap();
        assert_eq!(config.expected_stream_len(), 48);
    }

    #[test]
    fn parameters_require_every_field() {
        let json = r#"{"start_freq_ghz": 77.0, "slope_mhz_per_us": 29.982}"#;
        assert!(serde_json::from_str::<RadarParameters>(json).is_err());

        let json = serde_json::to_string(&reference_parameters()).unwrap();
        let parsed: RadarParameters = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, reference_parameters());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let mut value = serde_json::to_value(reference_parameters()).unwrap();
        value["rx_antennas"] = serde_json::json!(4);
        assert!(serde_json::from_value::<RadarParameters>(value).is_err());
    }
}
