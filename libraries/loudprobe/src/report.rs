//! Loudness report returned by a probe

use serde::Serialize;
use std::fmt;

/// Length of the analyzed audio
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Length {
    /// Seconds as printed by sox
    Seconds(f64),
    /// Seconds rounded to whole microseconds
    Microseconds(u64),
}

impl Length {
    pub fn as_secs_f64(&self) -> f64 {
        match *self {
            Length::Seconds(secs) => secs,
            Length::Microseconds(micros) => micros as f64 / 1_000_000.0,
        }
    }
}

/// Loudness values read from the first track of bs1770gain's XML
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LoudnessValues {
    pub integrated_loudness: f64,
    pub true_peak: f64,
    pub loudness_range: f64,
    pub momentary_maximum: Option<f64>,
    pub shortterm_maximum: Option<f64>,
}

/// Loudness and duration of one audio file
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LoudnessReport {
    /// Integrated loudness in LUFS
    pub integrated_loudness: f64,

    /// Maximum true peak, as the `tpfs` value bs1770gain reports
    pub true_peak: f64,

    /// Loudness range in LU
    pub loudness_range: f64,

    /// Maximum momentary loudness in LUFS, when extended metrics were requested
    pub momentary_maximum: Option<f64>,

    /// Maximum short-term loudness in LUFS, when extended metrics were requested
    pub shortterm_maximum: Option<f64>,

    /// Length of the audio, when duration measurement is enabled
    pub duration: Option<Length>,
}

impl LoudnessReport {
    pub fn new(values: LoudnessValues, duration: Option<Length>) -> Self {
        Self {
            integrated_loudness: values.integrated_loudness,
            true_peak: values.true_peak,
            loudness_range: values.loudness_range,
            momentary_maximum: values.momentary_maximum,
            shortterm_maximum: values.shortterm_maximum,
            duration,
        }
    }
}

impl fmt::Display for LoudnessReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Loudness: {:.2} LUFS, Range: {:.2} LU, True Peak: {:.2}",
            self.integrated_loudness, self.loudness_range, self.true_peak
        )?;
        if let Some(momentary) = self.momentary_maximum {
            write!(f, ", Momentary Max: {:.2} LUFS", momentary)?;
        }
        if let Some(shortterm) = self.shortterm_maximum {
            write!(f, ", Short-term Max: {:.2} LUFS", shortterm)?;
        }
        if let Some(duration) = self.duration {
            write!(f, ", Length: {:.3} s", duration.as_secs_f64())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values() -> LoudnessValues {
        LoudnessValues {
            integrated_loudness: -16.32,
            true_peak: -0.23,
            loudness_range: 2.53,
            momentary_maximum: None,
            shortterm_maximum: None,
        }
    }

    #[test]
    fn test_length_as_seconds() {
        assert_eq!(Length::Seconds(12.5).as_secs_f64(), 12.5);
        assert_eq!(Length::Microseconds(181_230_000).as_secs_f64(), 181.23);
    }

    #[test]
    fn test_display_minimal() {
        let report = LoudnessReport::new(values(), Some(Length::Seconds(3.0)));
        assert_eq!(
            report.to_string(),
            "Loudness: -16.32 LUFS, Range: 2.53 LU, True Peak: -0.23, Length: 3.000 s"
        );
    }

    #[test]
    fn test_display_extended_without_duration() {
        let mut values = values();
        values.momentary_maximum = Some(-9.5);
        values.shortterm_maximum = Some(-11.25);
        let report = LoudnessReport::new(values, None);

        let text = report.to_string();
        assert!(text.contains("Momentary Max: -9.50 LUFS"));
        assert!(text.contains("Short-term Max: -11.25 LUFS"));
        assert!(!text.contains("Length"));
    }

    #[test]
    fn test_serializes_duration_unit() {
        let report = LoudnessReport::new(values(), Some(Length::Microseconds(5_000_000)));
        let json = serde_json::to_value(report).unwrap();
        assert_eq!(json["duration"]["microseconds"], 5_000_000);
        assert_eq!(json["integrated_loudness"], -16.32);
        assert!(json["momentary_maximum"].is_null());
    }
}
