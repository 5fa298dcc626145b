//! Conversion configuration.
//!
//! All heuristic constants of the pipeline live here rather than being baked
//! into the code: the narration rate and the CJK character-per-word ratio are
//! approximations, and the classification batching parameters depend on the
//! rate limits of whatever oracle backend the caller plugs in.

use crate::{Result, VorleserError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main conversion configuration.
///
/// Can be loaded from TOML or JSON files, or created programmatically.
///
/// # Example
///
/// ```rust
/// use vorleser::ConversionConfig;
///
/// let config = ConversionConfig::default();
/// assert_eq!(config.classification_batch_size, 3);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// Maximum number of characters of cleaned text handed to the oracle.
    #[serde(default = "default_excerpt_limit")]
    pub excerpt_limit: usize,

    /// Number of classification calls in flight at once. The oracle backend
    /// is assumed to apply rate limits, so this stays small.
    #[serde(default = "default_batch_size")]
    pub classification_batch_size: usize,

    /// Pause between classification batches, in milliseconds.
    #[serde(default = "default_batch_delay_ms")]
    pub classification_batch_delay_ms: u64,

    /// Upper bound on a single oracle call, in seconds. An elapsed timer is
    /// treated exactly like a malformed response.
    #[serde(default = "default_timeout_secs")]
    pub classification_timeout_secs: u64,

    /// Narration rate used for duration estimates.
    #[serde(default = "default_words_per_minute")]
    pub words_per_minute: f64,

    /// Characters per word approximation for zh/ja/ko text.
    #[serde(default = "default_cjk_chars_per_word")]
    pub cjk_chars_per_word: f64,

    /// Maximum number of characters of a raw oracle payload retained on an
    /// error-typed unit for diagnostics.
    #[serde(default = "default_raw_response_limit")]
    pub raw_response_limit: usize,

    /// Force the working language instead of resolving it from metadata or
    /// content (canonical two-letter code).
    #[serde(default)]
    pub language_override: Option<String>,
}

fn default_excerpt_limit() -> usize {
    3000
}

fn default_batch_size() -> usize {
    3
}

fn default_batch_delay_ms() -> u64 {
    2000
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_words_per_minute() -> f64 {
    150.0
}

fn default_cjk_chars_per_word() -> f64 {
    2.5
}

fn default_raw_response_limit() -> usize {
    200
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            excerpt_limit: default_excerpt_limit(),
            classification_batch_size: default_batch_size(),
            classification_batch_delay_ms: default_batch_delay_ms(),
            classification_timeout_secs: default_timeout_secs(),
            words_per_minute: default_words_per_minute(),
            cjk_chars_per_word: default_cjk_chars_per_word(),
            raw_response_limit: default_raw_response_limit(),
            language_override: None,
        }
    }
}

impl ConversionConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| VorleserError::serialization(format!("Invalid TOML config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate field ranges.
    pub fn validate(&self) -> Result<()> {
        if self.excerpt_limit == 0 {
            return Err(VorleserError::validation("excerpt_limit must be at least 1"));
        }
        if self.classification_batch_size == 0 {
            return Err(VorleserError::validation(
                "classification_batch_size must be at least 1",
            ));
        }
        if self.classification_timeout_secs == 0 {
            return Err(VorleserError::validation(
                "classification_timeout_secs must be at least 1",
            ));
        }
        if self.words_per_minute <= 0.0 {
            return Err(VorleserError::validation("words_per_minute must be positive"));
        }
        if self.cjk_chars_per_word <= 0.0 {
            return Err(VorleserError::validation("cjk_chars_per_word must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = ConversionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.excerpt_limit, 3000);
        assert_eq!(config.classification_batch_size, 3);
        assert_eq!(config.words_per_minute, 150.0);
        assert_eq!(config.cjk_chars_per_word, 2.5);
        assert!(config.language_override.is_none());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "classification_batch_size = 5").unwrap();
        writeln!(file, "words_per_minute = 180.0").unwrap();

        let config = ConversionConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(config.classification_batch_size, 5);
        assert_eq!(config.words_per_minute, 180.0);
        assert_eq!(config.excerpt_limit, 3000);
    }

    #[test]
    fn test_invalid_toml_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "not valid toml [[[").unwrap();

        let result = ConversionConfig::from_toml_file(file.path());
        assert!(matches!(result, Err(VorleserError::Serialization { .. })));
    }

    #[test]
    fn test_json_loading() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"excerpt_limit\": 500, \"language_override\": \"de\"}}").unwrap();

        let config = ConversionConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.excerpt_limit, 500);
        assert_eq!(config.language_override.as_deref(), Some("de"));
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let config = ConversionConfig {
            classification_batch_size: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(VorleserError::Validation { .. })));
    }

    #[test]
    fn test_negative_rate_rejected() {
        let config = ConversionConfig {
            words_per_minute: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ConversionConfig {
            cjk_chars_per_word: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
