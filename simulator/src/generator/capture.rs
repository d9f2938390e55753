use anyhow::Context;
use fmcwcore::radar::{DerivedParameters, RadarConfig, SPEED_OF_LIGHT};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Configuration for synthesizing a real-only ADC capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Target distance (m).
    pub range_m: f64,
    /// Radial velocity (m/s), positive when receding.
    pub velocity_mps: f64,
    /// Peak beat-signal amplitude in ADC counts.
    pub amplitude: f64,
    /// Uniform noise half-width in ADC counts.
    pub noise: f64,
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            range_m: 2.0,
            velocity_mps: 1.0,
            amplitude: 4_000.0,
            noise: 20.0,
            seed: 0,
        }
    }
}

/// Beat signal of a single point target, interleaved `[I, 0, I, 0, ...]`.
pub fn build_capture(config: &RadarConfig, generator: &GeneratorConfig) -> anyhow::Result<Vec<i16>> {
    let params = DerivedParameters::derive(config);
    let beat_hz = 2.0 * config.slope_hz_per_s() * generator.range_m / SPEED_OF_LIGHT;
    let doppler_hz = 2.0 * generator.velocity_mps / params.wavelength_m;
    let chirps_total = config
        .chirps_per_frame()
        .checked_mul(config.frames())
        .context("overflow computing chirp count for generator")?;

    let mut rng = StdRng::seed_from_u64(generator.seed);
    let mut stream = Vec::with_capacity(config.expected_stream_len());

    for chirp_index in 0..chirps_total {
        let slow_time = chirp_index as f64 * params.total_chirp_time_s;
        for sample_index in 0..config.adc_samples() {
            let fast_time = sample_index as f64 / config.sample_rate_hz();
            let phase = 2.0 * PI * (beat_hz * fast_time + doppler_hz * slow_time);
            let jitter = if generator.noise > 0.0 {
                rng.gen_range(-generator.noise..generator.noise)
            } else {
                0.0
            };
            let value = (generator.amplitude * phase.cos() + jitter)
                .round()
                .clamp(i16::MIN as f64, i16::MAX as f64);
            stream.push(value as i16);
            stream.push(0);
        }
    }

    Ok(stream)
}

/// Little-endian byte image of an int16 stream, as written by the capture card.
pub fn encode_le(stream: &[i16]) -> Vec<u8> {
    stream.iter().flat_map(|value| value.to_le_bytes()).collect()
}
