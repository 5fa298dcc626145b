//! Error types for Vorleser.
//!
//! All fallible operations in this crate return [`Result`]. The taxonomy
//! separates fatal archive-stage failures (malformed container, missing
//! package document, extraction faults) from per-unit classification
//! failures, which are absorbed into the unit data and never surface here.
//!
//! System errors (`std::io::Error`) bubble up unchanged so real filesystem
//! problems stay visible to callers.
use thiserror::Error;

/// Result type alias using `VorleserError`.
pub type Result<T> = std::result::Result<T, VorleserError>;

/// Main error type for all Vorleser operations.
#[derive(Debug, Error)]
pub enum VorleserError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The container descriptor is missing or carries no usable rootfile
    /// reference. Fatal to the whole conversion.
    #[error("Malformed container: {message}")]
    MalformedContainer {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The package document path named by the container descriptor does not
    /// exist inside the archive. Fatal.
    #[error("Missing package document: {0}")]
    MissingPackageDocument(String),

    /// Wraps any lower-level archive or XML fault encountered while pulling
    /// content out of the book. Fatal.
    #[error("Extraction failed: {message}")]
    Extraction {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A classification oracle call failed. Callers inside the pipeline
    /// convert this into an error-typed unit; it never crosses the per-unit
    /// boundary.
    #[error("Classification error: {0}")]
    Classification(String),
}

impl From<serde_json::Error> for VorleserError {
    fn from(err: serde_json::Error) -> Self {
        VorleserError::Serialization {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl VorleserError {
    /// Create a MalformedContainer error.
    pub fn malformed_container<S: Into<String>>(message: S) -> Self {
        Self::MalformedContainer {
            message: message.into(),
            source: None,
        }
    }

    /// Create a MalformedContainer error with source.
    pub fn malformed_container_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::MalformedContainer {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an Extraction error.
    pub fn extraction<S: Into<String>>(message: S) -> Self {
        Self::Extraction {
            message: message.into(),
            source: None,
        }
    }

    /// Create an Extraction error with source.
    pub fn extraction_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Extraction {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a Validation error.
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
            source: None,
        }
    }

    /// Create a Serialization error.
    pub fn serialization<S: Into<String>>(message: S) -> Self {
        Self::Serialization {
            message: message.into(),
            source: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: VorleserError = io_err.into();
        assert!(matches!(err, VorleserError::Io(_)));
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_malformed_container() {
        let err = VorleserError::malformed_container("no rootfile element");
        assert_eq!(err.to_string(), "Malformed container: no rootfile element");
    }

    #[test]
    fn test_extraction_with_source() {
        let source = std::io::Error::new(std::io::ErrorKind::InvalidData, "bad data");
        let err = VorleserError::extraction_with_source("archive unreadable", source);
        assert_eq!(err.to_string(), "Extraction failed: archive unreadable");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_missing_package_document() {
        let err = VorleserError::MissingPackageDocument("OEBPS/content.opf".to_string());
        assert_eq!(err.to_string(), "Missing package document: OEBPS/content.opf");
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: VorleserError = json_err.into();
        assert!(matches!(err, VorleserError::Serialization { .. }));
    }

    #[test]
    fn test_validation_error() {
        let err = VorleserError::validation("batch size must be at least 1");
        assert!(err.to_string().contains("batch size"));
    }
}
