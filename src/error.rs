//! Error types
//!
//! Only loading is fallible. Death and running out of power are gameplay
//! states and never surface here.

use thiserror::Error;

/// Failure to produce a playable level
#[derive(Debug, Error)]
pub enum LevelError {
    /// A level must contain exactly one start marker
    #[error(
        "invalid level configuration in {resource}: expected {expected} start marker(s), found {actual}"
    )]
    InvalidMarkerCount {
        resource: String,
        expected: usize,
        actual: usize,
    },

    #[error("failed to read level {resource}: {source}")]
    Io {
        resource: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse level {resource}: {source}")]
    Parse {
        resource: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no level {level} in {resource}")]
    Missing { resource: String, level: u32 },
}

/// Failure to load or validate tuning
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid tuning value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_error_message_names_resource_and_counts() {
        let err = LevelError::InvalidMarkerCount {
            resource: "level_2.json".to_string(),
            expected: 1,
            actual: 0,
        };
        let message = err.to_string();
        assert!(message.contains("level_2.json"));
        assert!(message.contains("expected 1"));
        assert!(message.contains("found 0"));
    }
}
