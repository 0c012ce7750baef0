//! Loudness probe: drives sox and bs1770gain for one file at a time

use crate::bs1770::{bs1770gain_args, parse_loudness_xml};
use crate::config::ProbeConfig;
use crate::error::{ProbeError, Result};
use crate::report::{LoudnessReport, LoudnessValues};
use crate::runner::{SystemRunner, ToolRunner};
use crate::scratch::ScratchCopy;
use crate::stats::{sox_args, LengthPattern, SoxLength};
use std::ffi::OsString;
use std::path::Path;

/// Whether each configured tool could be launched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolAvailability {
    pub sox: bool,
    pub bs1770gain: bool,
}

impl ToolAvailability {
    pub fn all(&self) -> bool {
        self.sox && self.bs1770gain
    }
}

/// Measures loudness and length of audio files
///
/// Each call is independent: the probe holds no per-call state, so one
/// instance can serve concurrent calls for different files.
///
/// # Example
///
/// ```no_run
/// use loudprobe::{LoudnessProbe, ProbeConfig};
///
/// # async fn run() -> loudprobe::Result<()> {
/// let probe = LoudnessProbe::new(ProbeConfig::full())?;
/// let report = probe.compute_loudness("song.flac").await?;
/// println!("{}", report);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct LoudnessProbe<R = SystemRunner> {
    config: ProbeConfig,
    runner: R,
    length: LengthPattern,
}

impl LoudnessProbe<SystemRunner> {
    /// Create a probe that spawns the configured tools
    pub fn new(config: ProbeConfig) -> Result<Self> {
        let runner = SystemRunner::new(config.timeout());
        Self::with_runner(config, runner)
    }
}

impl<R: ToolRunner> LoudnessProbe<R> {
    /// Create a probe that runs tools through `runner`
    pub fn with_runner(config: ProbeConfig, runner: R) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            runner,
            length: LengthPattern::compile()?,
        })
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Measure loudness (and, if enabled, length) of the file at `path`
    ///
    /// The path is handed to the tools as is; a missing or unreadable file
    /// shows up as a tool failure.
    ///
    /// # Errors
    /// Any failing step fails the whole call; see [`ProbeError`].
    pub async fn compute_loudness(&self, path: impl AsRef<Path>) -> Result<LoudnessReport> {
        let path = path.as_ref();

        let scratch = match self.config.highpass_hz {
            Some(_) => Some(ScratchCopy::create(path)?),
            None => None,
        };

        let measured = self.run_statistics(path, scratch.as_ref()).await?;

        let target = scratch.as_ref().map_or(path, ScratchCopy::path);
        let values = self.run_loudness(target).await?;

        let duration = measured.map(|length| self.config.duration_unit.length(length));
        let report = LoudnessReport::new(values, duration);

        tracing::info!("Measured {}: {}", path.display(), report);
        Ok(report)
    }

    /// Check that sox and bs1770gain can be launched
    pub async fn check_tools(&self) -> ToolAvailability {
        let sox = self.launches(&self.config.sox_path, "--version").await;
        let bs1770gain = self.launches(&self.config.bs1770gain_path, "--help").await;
        ToolAvailability { sox, bs1770gain }
    }

    async fn launches(&self, program: &Path, arg: &str) -> bool {
        match self.runner.run(program, &[OsString::from(arg)]).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("{} is not available: {}", program.display(), e);
                false
            }
        }
    }

    /// Run sox when the length or a filtered copy is wanted
    async fn run_statistics(&self, input: &Path, scratch: Option<&ScratchCopy>) -> Result<Option<SoxLength>> {
        let measure = self.config.measure_duration;
        let filtered = scratch
            .zip(self.config.highpass_hz)
            .map(|(copy, hz)| (copy.path(), hz));

        if !measure && filtered.is_none() {
            return Ok(None);
        }

        let args = sox_args(input, filtered, measure);
        tracing::debug!("sox {:?}", args);

        let output = self
            .runner
            .run(&self.config.sox_path, &args)
            .await
            .map_err(|e| ProbeError::DurationTool(format!("{}: {}", self.config.sox_path.display(), e)))?;

        if !output.success {
            return Err(ProbeError::DurationTool(output.failure_message()));
        }

        if !measure {
            return Ok(None);
        }

        let diagnostics = String::from_utf8_lossy(&output.stderr);
        let length = self.length.extract(&diagnostics)?;
        tracing::debug!("Length of {}: {} s", input.display(), length.seconds());
        Ok(Some(length))
    }

    async fn run_loudness(&self, target: &Path) -> Result<LoudnessValues> {
        let metrics = self.config.metric_set();
        let args = bs1770gain_args(metrics, target);
        tracing::debug!("bs1770gain {:?}", args);

        let output = self
            .runner
            .run(&self.config.bs1770gain_path, &args)
            .await
            .map_err(|e| {
                ProbeError::LoudnessTool(format!("{}: {}", self.config.bs1770gain_path.display(), e))
            })?;

        // Partial stdout from a failed run is never parsed
        if !output.success {
            return Err(ProbeError::LoudnessTool(output.failure_message()));
        }

        let xml = String::from_utf8_lossy(&output.stdout);
        parse_loudness_xml(&xml, metrics)
    }
}
