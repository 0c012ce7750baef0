//! bs1770gain: command line and XML report extraction
//!
//! With `--xml` bs1770gain prints a report like this on stdout:
//!
//! ```text
//! <bs1770gain>
//!   <album>
//!     <track total="1" number="1" file="audio&#x2E;mp3">
//!       <integrated lufs="-16.32" lu="-6.68" />
//!       <range lufs="2.53" />
//!       <true-peak tpfs="-0.23" factor="0.974183" />
//!     </track>
//!     <summary total="1">
//!       ...
//!     </summary>
//!   </album>
//! </bs1770gain>
//! ```
//!
//! Values are read from the first `track` only. `summary` aggregates over
//! all tracks of the invocation and is never consulted.

use crate::config::MetricSet;
use crate::error::{ProbeError, Result};
use crate::report::LoudnessValues;
use crate::xml::{parse_document, Element};
use std::ffi::OsString;
use std::path::Path;

const ROOT: &str = "bs1770gain";

/// bs1770gain arguments analyzing `target` with XML on stdout and nothing else
pub fn bs1770gain_args(metrics: MetricSet, target: &Path) -> Vec<OsString> {
    vec![
        metrics.flags().into(),
        "--loglevel=quiet".into(),
        "--xml".into(),
        target.as_os_str().to_owned(),
    ]
}

/// Read loudness values for the first track of a bs1770gain XML report
///
/// # Errors
/// Fails with [`ProbeError::ParseLoudness`] when the document is malformed
/// or lacks any element or attribute `metrics` requires.
pub fn parse_loudness_xml(xml: &str, metrics: MetricSet) -> Result<LoudnessValues> {
    let root = parse_document(xml)?;
    if root.name != ROOT {
        return Err(ProbeError::ParseLoudness(format!(
            "expected <{}> root, found <{}>",
            ROOT, root.name
        )));
    }

    let track = root
        .child("album")
        .ok_or_else(|| ProbeError::ParseLoudness("no <album> element".to_string()))?
        .child("track")
        .ok_or_else(|| ProbeError::ParseLoudness("no <track> element in <album>".to_string()))?;

    let (momentary_maximum, shortterm_maximum) = match metrics {
        MetricSet::Standard => (None, None),
        MetricSet::Extended => (
            Some(metric(track, "momentary", "lufs")?),
            Some(metric(track, "shortterm-maximum", "lufs")?),
        ),
    };

    Ok(LoudnessValues {
        integrated_loudness: metric(track, "integrated", "lufs")?,
        true_peak: metric(track, "true-peak", "tpfs")?,
        loudness_range: metric(track, "range", "lufs")?,
        momentary_maximum,
        shortterm_maximum,
    })
}

fn metric(track: &Element, name: &str, attribute: &str) -> Result<f64> {
    let raw = track
        .child(name)
        .ok_or_else(|| ProbeError::ParseLoudness(format!("no <{}> element in <track>", name)))?
        .attribute(attribute)
        .ok_or_else(|| {
            ProbeError::ParseLoudness(format!("<{}> has no {} attribute", name, attribute))
        })?;

    raw.trim().parse().map_err(|e| {
        ProbeError::ParseLoudness(format!("<{} {}={:?}>: {}", name, attribute, raw, e))
    })
}
