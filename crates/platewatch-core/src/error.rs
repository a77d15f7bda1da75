//! Error types for PlateWatch.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for every PlateWatch crate.
///
/// Store failures are ordinary values here: the tracker hands them back to
/// the caller instead of letting them tear the process down.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlateWatchError {
    /// A name outside the fixed set of 50 state labels.
    #[error("Invalid label: '{name}' is not one of the 50 U.S. states")]
    InvalidLabel { name: String },

    /// The backing key-value store failed to read or write.
    #[error("Store error: {0}")]
    Store(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON"
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PlateWatchError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an InvalidLabel error
    pub fn invalid_label(name: impl Into<String>) -> Self {
        Self::InvalidLabel { name: name.into() }
    }

    /// Creates a Store error
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    pub fn is_invalid_label(&self) -> bool {
        matches!(self, Self::InvalidLabel { .. })
    }

    /// True for any failure that originated in the backing store,
    /// including the IO and serialization errors it may wrap.
    pub fn is_store_failure(&self) -> bool {
        matches!(
            self,
            Self::Store(_) | Self::Io { .. } | Self::Serialization { .. }
        )
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for PlateWatchError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for PlateWatchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for PlateWatchError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for PlateWatchError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, PlateWatchError>`.
pub type Result<T> = std::result::Result<T, PlateWatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_label_message_names_the_input() {
        let err = PlateWatchError::invalid_label("Puerto Rico");
        assert!(err.is_invalid_label());
        assert!(err.to_string().contains("'Puerto Rico'"));
    }

    #[test]
    fn test_io_error_counts_as_store_failure() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: PlateWatchError = io.into();
        assert!(err.is_store_failure());
        assert!(!err.is_invalid_label());
    }

    #[test]
    fn test_toml_parse_error_conversion() {
        let parse = toml::from_str::<toml::Table>("not = = toml").unwrap_err();
        let err: PlateWatchError = parse.into();
        match err {
            PlateWatchError::Serialization { format, .. } => assert_eq!(format, "TOML"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
