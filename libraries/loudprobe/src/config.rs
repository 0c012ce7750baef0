/// Probe configuration
use crate::error::{ProbeError, Result};
use crate::report::Length;
use crate::stats::SoxLength;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Cutoff used by the full preset to keep bass-heavy material from skewing
/// the integrated loudness
pub const DEFAULT_HIGHPASS_HZ: f64 = 150.0;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProbeConfig {
    #[serde(default = "default_sox_path")]
    pub sox_path: PathBuf,

    #[serde(default = "default_bs1770gain_path")]
    pub bs1770gain_path: PathBuf,

    /// Run sox `stat` and report the file length
    #[serde(default = "default_measure_duration")]
    pub measure_duration: bool,

    /// Analyze a highpass-filtered copy at this cutoff instead of the input
    #[serde(default)]
    pub highpass_hz: Option<f64>,

    /// Also request momentary and short-term maxima
    #[serde(default)]
    pub extended_metrics: bool,

    #[serde(default)]
    pub duration_unit: DurationUnit,

    /// Deadline for each subprocess
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Unit the measured length is reported in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    #[default]
    Seconds,
    /// Whole microseconds, rounded half away from zero
    Microseconds,
}

impl DurationUnit {
    pub fn length(self, measured: SoxLength) -> Length {
        match self {
            DurationUnit::Seconds => Length::Seconds(measured.seconds()),
            DurationUnit::Microseconds => Length::Microseconds(measured.microseconds()),
        }
    }
}

/// Which loudness metrics bs1770gain is asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricSet {
    /// Integrated loudness, true peak and loudness range
    Standard,
    /// Standard plus momentary and short-term maxima
    Extended,
}

impl MetricSet {
    /// Short-option cluster passed to bs1770gain
    pub fn flags(self) -> &'static str {
        match self {
            MetricSet::Standard => "-itr",
            MetricSet::Extended => "-itrms",
        }
    }
}

impl ProbeConfig {
    /// Integrated loudness, true peak and range of the unfiltered input,
    /// length in seconds
    pub fn minimal() -> Self {
        Self::default()
    }

    /// Highpass pre-filter, momentary and short-term maxima, length in
    /// microseconds
    pub fn full() -> Self {
        Self {
            highpass_hz: Some(DEFAULT_HIGHPASS_HZ),
            extended_metrics: true,
            duration_unit: DurationUnit::Microseconds,
            ..Self::default()
        }
    }

    /// Load configuration from an optional TOML file and the environment
    ///
    /// Environment variables are prefixed with `LOUDPROBE_`, e.g.
    /// `LOUDPROBE_HIGHPASS_HZ=150`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        if let Some(path) = path {
            settings = settings.add_source(config::File::from(path.to_path_buf()));
        }

        settings = settings.add_source(config::Environment::with_prefix("LOUDPROBE").try_parsing(true));

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.sox_path.as_os_str().is_empty() {
            return Err(ProbeError::Config("sox path is empty".to_string()));
        }

        if self.bs1770gain_path.as_os_str().is_empty() {
            return Err(ProbeError::Config("bs1770gain path is empty".to_string()));
        }

        if let Some(hz) = self.highpass_hz {
            if !hz.is_finite() || hz <= 0.0 {
                return Err(ProbeError::Config(format!(
                    "Highpass cutoff must be a positive frequency, got {}",
                    hz
                )));
            }
        }

        if self.timeout_secs == Some(0) {
            return Err(ProbeError::Config("Timeout must be at least one second".to_string()));
        }

        Ok(())
    }

    pub fn metric_set(&self) -> MetricSet {
        if self.extended_metrics {
            MetricSet::Extended
        } else {
            MetricSet::Standard
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

// Default values
fn default_sox_path() -> PathBuf {
    PathBuf::from("sox")
}

fn default_bs1770gain_path() -> PathBuf {
    PathBuf::from("bs1770gain")
}

fn default_measure_duration() -> bool {
    true
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            sox_path: default_sox_path(),
            bs1770gain_path: default_bs1770gain_path(),
            measure_duration: default_measure_duration(),
            highpass_hz: None,
            extended_metrics: false,
            duration_unit: DurationUnit::default(),
            timeout_secs: None,
        }
    }
}
