//! Error types for the text node's serialization boundary.
//!
//! Layout and editing never fail; out-of-range input is clamped. Only
//! decoding a node from JSON can reject its input.

use std::fmt;

/// Result type alias for fallible operations in this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for decoding and parsing.
#[derive(Debug)]
pub enum Error {
    /// Malformed JSON or a field with the wrong shape.
    Json(serde_json::Error),
    /// Invalid color notation.
    InvalidColor(String),
    /// Structurally invalid construction payload.
    InvalidOptions(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(e) => write!(f, "invalid node json: {e}"),
            Self::InvalidColor(s) => write!(f, "invalid color format: {s}"),
            Self::InvalidOptions(reason) => write!(f, "invalid text node options: {reason}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidColor("not-a-color".to_string());
        assert!(err.to_string().contains("invalid color format"));

        let err = Error::InvalidOptions("styleRanges must be an array".to_string());
        assert!(err.to_string().contains("styleRanges"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
