//! Error types for loudness probing

use thiserror::Error;

/// Result type for probe operations
pub type Result<T> = std::result::Result<T, ProbeError>;

/// Errors that can occur while probing a file
///
/// Every variant is terminal: a failed call never yields a partial report.
#[derive(Error, Debug)]
pub enum ProbeError {
    /// The duration pattern failed to compile
    #[error("Cannot compile duration pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Invalid or unloadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The scratch directory for the filtered copy could not be created
    #[error("Error creating temporary directory: {0}")]
    TempResource(#[source] std::io::Error),

    /// sox could not be launched or exited unsuccessfully
    #[error("Duration tool failed: {0}")]
    DurationTool(String),

    /// sox ran but printed no `Length (seconds)` line
    #[error("Cannot get audio length: duration not found in statistics output")]
    DurationNotFound,

    /// The captured length is not a usable number
    #[error("Cannot parse audio length: {0}")]
    InvalidDuration(String),

    /// bs1770gain could not be launched or exited unsuccessfully
    #[error("Loudness computation failed: {0}")]
    LoudnessTool(String),

    /// bs1770gain output did not match the expected XML layout
    #[error("Cannot parse loudness information: {0}")]
    ParseLoudness(String),
}

impl From<config::ConfigError> for ProbeError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_cause() {
        let err = ProbeError::LoudnessTool("bs1770gain: no such file".to_string());
        assert_eq!(
            err.to_string(),
            "Loudness computation failed: bs1770gain: no such file"
        );

        let err = ProbeError::ParseLoudness("missing <track>".to_string());
        assert!(err.to_string().starts_with("Cannot parse loudness information"));
    }

    #[test]
    fn test_temp_resource_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ProbeError::TempResource(io);
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("denied"));
    }
}
