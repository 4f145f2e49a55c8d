//! Error types for the AnimeLab stream service
//!
//! Errors stay inside the crate boundary for the service operations themselves:
//! the adapter turns them into empty results plus a log line. They surface
//! directly only from constructors and parsers (client setup, config loading,
//! season names).

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Error type for stream service operations
#[derive(Error, Debug)]
pub enum StreamServiceError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Server answered with a non-success status code
    #[error("Unexpected HTTP status: {0}")]
    UnexpectedStatus(u16),

    /// Response body could not be decoded
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Season name outside the fixed season table
    #[error("Unknown season: {0}")]
    UnknownSeason(String),

    /// Proxy setting is not in `host:port` form
    #[error("Invalid proxy: {0}")]
    InvalidProxy(String),

    /// Configuration could not be loaded
    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

/// Serialize StreamServiceError as its display string
impl Serialize for StreamServiceError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<serde_json::Error> for StreamServiceError {
    fn from(err: serde_json::Error) -> Self {
        StreamServiceError::ParseError(err.to_string())
    }
}

impl From<toml::de::Error> for StreamServiceError {
    fn from(err: toml::de::Error) -> Self {
        StreamServiceError::ConfigError(err.to_string())
    }
}

/// Result type alias for stream service operations
pub type Result<T> = std::result::Result<T, StreamServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_unexpected_status() {
        let error = StreamServiceError::UnexpectedStatus(503);
        assert_eq!(error.to_string(), "Unexpected HTTP status: 503");
    }

    #[test]
    fn test_error_display_parse_error() {
        let error = StreamServiceError::ParseError("missing field `list`".to_string());
        assert_eq!(
            error.to_string(),
            "Failed to parse API response: missing field `list`"
        );
    }

    #[test]
    fn test_error_display_unknown_season() {
        let error = StreamServiceError::UnknownSeason("Winter".to_string());
        assert_eq!(error.to_string(), "Unknown season: Winter");
    }

    #[test]
    fn test_error_display_invalid_proxy() {
        let error = StreamServiceError::InvalidProxy("localhost:abc".to_string());
        assert_eq!(error.to_string(), "Invalid proxy: localhost:abc");
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: StreamServiceError = json_err.into();
        assert!(matches!(error, StreamServiceError::ParseError(_)));
    }

    #[test]
    fn test_error_serialize() {
        let error = StreamServiceError::UnknownSeason("monsoon".to_string());
        let json = serde_json::to_string(&error).unwrap();
        assert_eq!(json, "\"Unknown season: monsoon\"");
    }
}
