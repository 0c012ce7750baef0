//! sox statistics: command line and length extraction
//!
//! `sox <input> -n stat` prints a block of statistics to stderr, among them
//! a line like `Length (seconds):    181.230000`. When a filtered copy is
//! wanted the same run writes it instead of discarding the output.

use crate::error::{ProbeError, Result};
use regex::Regex;
use std::ffi::OsString;
use std::path::Path;

const LENGTH_PATTERN: &str = r"Length \(seconds\):\s+(\d+(\.\d+)?)";

/// Length as sox printed it, converted without going through binary floats
/// where whole microseconds are asked for
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoxLength {
    seconds: f64,
    microseconds: u64,
}

impl SoxLength {
    /// Parse the decimal text captured from the `Length (seconds)` line
    pub fn from_decimal(text: &str) -> Result<Self> {
        let invalid = |reason: &str| ProbeError::InvalidDuration(format!("{:?}: {}", text, reason));

        let seconds: f64 = text.parse::<f64>().map_err(|e| invalid(&e.to_string()))?;
        if !seconds.is_finite() {
            return Err(invalid("out of range"));
        }

        let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if whole.is_empty() || !all_digits(whole) || !all_digits(fraction) {
            return Err(invalid("not a plain decimal"));
        }

        // First six fractional digits, zero padded; the seventh decides rounding
        let mut micros_part = 0_u64;
        let mut digits = fraction.bytes();
        for _ in 0..6 {
            let digit = digits.next().map_or(0, |b| u64::from(b - b'0'));
            micros_part = micros_part * 10 + digit;
        }
        let round_up = digits.next().is_some_and(|b| b >= b'5');

        let microseconds = whole
            .parse::<u64>()
            .ok()
            .and_then(|w| w.checked_mul(1_000_000))
            .and_then(|m| m.checked_add(micros_part))
            .and_then(|m| m.checked_add(u64::from(round_up)))
            .ok_or_else(|| invalid("out of range"))?;

        Ok(Self {
            seconds,
            microseconds,
        })
    }

    pub fn seconds(&self) -> f64 {
        self.seconds
    }

    /// Whole microseconds, rounded half away from zero on the printed digits
    pub fn microseconds(&self) -> u64 {
        self.microseconds
    }
}

/// Compiled matcher for the `Length (seconds)` line
#[derive(Debug, Clone)]
pub struct LengthPattern {
    regex: Regex,
}

impl LengthPattern {
    pub fn compile() -> Result<Self> {
        Ok(Self {
            regex: Regex::new(LENGTH_PATTERN)?,
        })
    }

    /// Extract the length from sox diagnostics
    pub fn extract(&self, diagnostics: &str) -> Result<SoxLength> {
        let captures = self
            .regex
            .captures(diagnostics)
            .ok_or(ProbeError::DurationNotFound)?;

        SoxLength::from_decimal(&captures[1])
    }
}

/// Extract the length from sox `stat` output
pub fn parse_duration(diagnostics: &str) -> Result<SoxLength> {
    LengthPattern::compile()?.extract(diagnostics)
}

/// sox arguments for one statistics/filter run
///
/// With `filtered` set, a highpass-filtered copy is written there;
/// otherwise output goes to the null device. `stat` is appended only when
/// the length is wanted.
pub fn sox_args(input: &Path, filtered: Option<(&Path, f64)>, with_stat: bool) -> Vec<OsString> {
    let mut args = vec![input.as_os_str().to_owned()];

    match filtered {
        Some((output, cutoff_hz)) => {
            args.push(output.as_os_str().to_owned());
            args.push("highpass".into());
            args.push(cutoff_hz.to_string().into());
        }
        None => args.push("-n".into()),
    }

    if with_stat {
        args.push("stat".into());
    }

    args
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOX_STAT: &str = "Samples read:          15993344
Length (seconds):    181.330068
Scaled by:         2147483647.0
Maximum amplitude:     0.999969
Minimum amplitude:    -1.000000
Midline amplitude:    -0.000015
Mean    norm:          0.213540
RMS     amplitude:     0.282117
";

    #[test]
    fn test_extracts_length_from_stat_block() {
        let length = parse_duration(SOX_STAT).unwrap();
        assert!((length.seconds() - 181.330068).abs() < 1e-9);
        assert_eq!(length.microseconds(), 181_330_068);
    }

    #[test]
    fn test_extracts_integer_length() {
        let length = parse_duration("Length (seconds): 42\n").unwrap();
        assert_eq!(length.seconds(), 42.0);
        assert_eq!(length.microseconds(), 42_000_000);
    }

    #[test]
    fn test_missing_length_line() {
        let result = parse_duration("Samples read: 100\nRMS amplitude: 0.1\n");
        assert!(matches!(result, Err(ProbeError::DurationNotFound)));

        // No whitespace between colon and number does not match
        assert!(matches!(
            parse_duration("Length (seconds):12.0"),
            Err(ProbeError::DurationNotFound)
        ));
    }

    #[test]
    fn test_out_of_range_length() {
        let digits = "9".repeat(400);
        let text = format!("Length (seconds): {}\n", digits);
        assert!(matches!(
            parse_duration(&text),
            Err(ProbeError::InvalidDuration(_))
        ));
    }

    #[test]
    fn test_microseconds_round_on_printed_digits() {
        let cases = [
            ("0.0019985", 1_999),
            ("0.0019984", 1_998),
            ("181.23", 181_230_000),
            ("1.0000005", 1_000_001),
            ("0.0000004", 0),
            ("0.0000005", 1),
            ("3599.9999995", 3_600_000_000),
            ("7", 7_000_000),
            ("59.12345649999", 59_123_456),
        ];
        for (text, micros) in cases {
            let length = SoxLength::from_decimal(text).unwrap();
            assert_eq!(length.microseconds(), micros, "{}", text);
        }
    }

    #[test]
    fn test_microsecond_overflow_is_invalid() {
        assert!(matches!(
            SoxLength::from_decimal("18446744073709.551616"),
            Err(ProbeError::InvalidDuration(_))
        ));
    }

    #[test]
    fn test_stat_only_args() {
        let args = sox_args(Path::new("/music/a.flac"), None, true);
        assert_eq!(args, vec!["/music/a.flac", "-n", "stat"]);
    }

    #[test]
    fn test_filtered_args() {
        let args = sox_args(
            Path::new("/music/a.flac"),
            Some((Path::new("/tmp/x/a.flac"), 150.0)),
            true,
        );
        assert_eq!(
            args,
            vec!["/music/a.flac", "/tmp/x/a.flac", "highpass", "150", "stat"]
        );

        let args = sox_args(
            Path::new("/music/a.flac"),
            Some((Path::new("/tmp/x/a.flac"), 80.5)),
            false,
        );
        assert_eq!(args, vec!["/music/a.flac", "/tmp/x/a.flac", "highpass", "80.5"]);
    }
}
