//! Loudness and duration probing for audio files
//!
//! This crate measures a single file by driving two external tools:
//! - `bs1770gain` for ITU-R BS.1770 / EBU R128 loudness (integrated LUFS,
//!   loudness range, true peak, optionally momentary and short-term maxima)
//! - `sox` for the file length and, optionally, a highpass-filtered copy so
//!   bass-heavy material does not skew the integrated loudness
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌───────────────┐
//! │ Audio File  │ ──► │ sox stat     │ ──► │ Length        │
//! └─────────────┘     │ (+ highpass) │     └───────┬───────┘
//!                     └──────┬───────┘             │
//!                            ▼ filtered copy       ▼
//!                     ┌──────────────┐     ┌───────────────┐
//!                     │ bs1770gain   │ ──► │ LoudnessReport│
//!                     │ --xml        │     └───────────────┘
//!                     └──────────────┘
//! ```
//!
//! Tools are reached through the [`ToolRunner`] trait; [`SystemRunner`]
//! spawns real processes.
//!
//! # Example
//!
//! ```ignore
//! use loudprobe::{LoudnessProbe, ProbeConfig};
//!
//! let probe = LoudnessProbe::new(ProbeConfig::minimal())?;
//! let report = probe.compute_loudness("song.mp3").await?;
//!
//! println!("Integrated loudness: {:.1} LUFS", report.integrated_loudness);
//! println!("Loudness range: {:.1} LU", report.loudness_range);
//! ```

#![deny(unsafe_code)]

mod bs1770;
mod config;
mod error;
mod probe;
mod report;
mod runner;
mod scratch;
mod stats;
mod xml;

pub use bs1770::{bs1770gain_args, parse_loudness_xml};
pub use config::{DurationUnit, MetricSet, ProbeConfig, DEFAULT_HIGHPASS_HZ};
pub use error::{ProbeError, Result};
pub use probe::{LoudnessProbe, ToolAvailability};
pub use report::{Length, LoudnessReport, LoudnessValues};
pub use runner::{SystemRunner, ToolOutput, ToolRunner};
pub use stats::{parse_duration, sox_args, LengthPattern, SoxLength};
