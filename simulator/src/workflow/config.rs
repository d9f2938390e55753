use crate::generator::capture::GeneratorConfig;
use anyhow::Context;
use fmcwcore::radar::{RadarConfig, RadarParameters};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

fn default_output() -> PathBuf {
    PathBuf::from("range_doppler_report.json")
}

fn default_workers() -> usize {
    1
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkflowConfig {
    pub radar: RadarParameters,
    /// Raw int16 capture; required unless a synthetic target is configured.
    #[serde(default)]
    pub input: Option<PathBuf>,
    #[serde(default = "default_output")]
    pub output: PathBuf,
    #[serde(default = "default_workers")]
    pub workers: usize,
    #[serde(default)]
    pub synthetic: Option<GeneratorConfig>,
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        config
            .validate()
            .with_context(|| format!("checking workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    /// A workflow reads exactly one capture source.
    pub fn validate(&self) -> anyhow::Result<()> {
        if let (Some(input), Some(_)) = (&self.input, &self.synthetic) {
            anyhow::bail!(
                "workflow sets both input {} and a synthetic target; keep only one",
                input.display()
            );
        }
        Ok(())
    }

    pub fn radar_config(&self) -> anyhow::Result<RadarConfig> {
        self.radar
            .into_config()
            .context("validating radar parameters")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const WORKFLOW: &str = "\
radar:
  start_freq_ghz: 77.0
  slope_mhz_per_us: 29.982
  idle_time_us: 100.0
  ramp_end_time_us: 60.0
  adc_sample_rate_ksps: 10000.0
  adc_samples: 256
  chirps_per_frame: 128
  frames: 1
input: capture.bin
";

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(WORKFLOW.as_bytes()).unwrap();
        let path = temp.into_temp_path();
        let cfg = WorkflowConfig::load(&path).unwrap();
        assert_eq!(cfg.radar.adc_samples, 256);
        assert_eq!(cfg.input, Some(PathBuf::from("capture.bin")));
        assert_eq!(cfg.workers, 1);
        assert_eq!(cfg.output, default_output());
        assert!(cfg.synthetic.is_none());
        assert_eq!(cfg.radar_config().unwrap().chirps_per_frame(), 128);
    }

    #[test]
    fn missing_radar_field_fails_to_parse() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(WORKFLOW.replace("  frames: 1\n", "").as_bytes())
            .unwrap();
        let path = temp.into_temp_path();
        assert!(WorkflowConfig::load(&path).is_err());
    }

    #[test]
    fn invalid_radar_values_fail_validation() {
        let yaml = WORKFLOW.replace("idle_time_us: 100.0", "idle_time_us: -5.0");
        let cfg: WorkflowConfig = serde_yaml::from_str(&yaml).unwrap();
        let err = cfg.radar_config().unwrap_err();
        assert!(format!("{:#}", err).contains("idle_time"));
    }

    #[test]
    fn synthetic_block_uses_generator_defaults() {
        let yaml = format!(
            "{}synthetic:\n  range_m: 3.5\n",
            WORKFLOW.replace("input: capture.bin\n", "")
        );
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(yaml.as_bytes()).unwrap();
        let path = temp.into_temp_path();
        let cfg = WorkflowConfig::load(&path).unwrap();
        assert!(cfg.input.is_none());
        let synthetic = cfg.synthetic.unwrap();
        assert_eq!(synthetic.range_m, 3.5);
        assert_eq!(synthetic.seed, GeneratorConfig::default().seed);
    }

    #[test]
    fn input_and_synthetic_are_exclusive() {
        let yaml = format!("{}synthetic:\n  range_m: 3.5\n", WORKFLOW);
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(yaml.as_bytes()).unwrap();
        let path = temp.into_temp_path();
        let err = WorkflowConfig::load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("both input capture.bin and a synthetic target"));
    }
}
