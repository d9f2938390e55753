use crate::radar::config::{RadarConfig, SPEED_OF_LIGHT};
use serde::Serialize;

/// Quantities derived once from a [`RadarConfig`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedParameters {
    /// Ramp end time plus idle time (s).
    pub total_chirp_time_s: f64,
    pub prf_hz: f64,
    pub wavelength_m: f64,
    pub bandwidth_hz: f64,
    pub range_resolution_m: f64,
    /// Retained range bins, half the ADC samples per chirp.
    pub max_range_bins: usize,
    /// Distance between adjacent range-axis entries (m).
    pub range_bin_spacing_m: f64,
    /// Beat-frequency limit of the real-sampled IF, `c·fs/(4·slope)` (m).
    pub max_range_m: f64,
    pub velocity_resolution_mps: f64,
    pub max_velocity_mps: f64,
    /// Range of each retained bin (m), ascending from 0.
    pub range_axis: Vec<f64>,
    /// Doppler frequency of each shifted chirp bin (Hz), ascending.
    pub doppler_axis_hz: Vec<f64>,
    /// Radial velocity of each shifted chirp bin (m/s), ascending.
    pub velocity_axis: Vec<f64>,
}

impl DerivedParameters {
    pub fn derive(config: &RadarConfig) -> Self {
        let total_chirp_time_s = config.ramp_end_time_s() + config.idle_time_s();
        let prf_hz = 1.0 / total_chirp_time_s;
        let wavelength_m = SPEED_OF_LIGHT / config.start_freq_hz();
        let bandwidth_hz = config.slope_hz_per_s() * config.ramp_end_time_s();
        let range_resolution_m = SPEED_OF_LIGHT / (2.0 * bandwidth_hz);

        let adc_samples = config.adc_samples();
        let max_range_bins = adc_samples / 2;
        let bin_spacing_hz = config.sample_rate_hz() / adc_samples as f64;
        // Beat frequency to distance: R = c·f_b / (2·S).
        let range_axis: Vec<f64> = (0..max_range_bins)
            .map(|k| SPEED_OF_LIGHT * k as f64 * bin_spacing_hz / (2.0 * config.slope_hz_per_s()))
            .collect();
        let range_bin_spacing_m = SPEED_OF_LIGHT * bin_spacing_hz / (2.0 * config.slope_hz_per_s());
        let max_range_m = SPEED_OF_LIGHT * config.sample_rate_hz() / (4.0 * config.slope_hz_per_s());

        let chirps = config.chirps_per_frame();
        let half = (chirps / 2) as isize;
        let doppler_step_hz = 1.0 / (chirps as f64 * total_chirp_time_s);
        let doppler_axis_hz: Vec<f64> = (0..chirps as isize)
            .map(|j| (j - half) as f64 * doppler_step_hz)
            .collect();
        let velocity_axis: Vec<f64> = doppler_axis_hz
            .iter()
            .map(|f_d| wavelength_m / 2.0 * f_d)
            .collect();

        Self {
            total_chirp_time_s,
            prf_hz,
            wavelength_m,
            bandwidth_hz,
            range_resolution_m,
            max_range_bins,
            range_bin_spacing_m,
            max_range_m,
            velocity_resolution_mps: wavelength_m / 2.0 * doppler_step_hz,
            max_velocity_mps: wavelength_m / (4.0 * total_chirp_time_s),
            range_axis,
            doppler_axis_hz,
            velocity_axis,
        }
    }
}
