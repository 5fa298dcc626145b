//! Content classification via an external oracle.
//!
//! The semantic judgment (is this spine item a chapter, front matter, a
//! table of contents?) is delegated to a [`Classifier`] backend. Backends
//! can be rule-based, ML, or remote services; the core only builds the
//! bounded request, enforces the call timeout, and defensively normalizes
//! whatever payload comes back. A failure on one unit never crosses the
//! per-unit boundary.

pub mod response;

use crate::core::config::ConversionConfig;
use crate::types::{BookMetadata, ClassificationResult};
use crate::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Classification oracle backend.
///
/// Implementations receive a bounded excerpt of a unit's cleaned text plus
/// the book metadata, and return a raw payload the core parses defensively:
/// ideally a JSON object with `content_type`, `chapter_number`, `title`, and
/// `include` fields, but anything is tolerated.
///
/// # Thread Safety
///
/// Backends must be `Send + Sync`; the pipeline keeps several calls in
/// flight at once.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Unique backend name, used in logs.
    fn name(&self) -> &str;

    /// Judge one content unit.
    async fn classify(&self, excerpt: &str, metadata: &BookMetadata) -> Result<String>;
}

/// Classify one unit's text, absorbing every failure mode into an
/// error-typed result.
///
/// "No response within the timeout", "the call failed", and "the payload is
/// unusable" are all treated identically: the unit is classified as
/// [`ContentType::Error`](crate::types::ContentType::Error) and excluded.
pub async fn classify_unit(
    classifier: &dyn Classifier,
    text: &str,
    metadata: &BookMetadata,
    config: &ConversionConfig,
) -> ClassificationResult {
    let excerpt = bounded_excerpt(text, config.excerpt_limit);
    let timeout = Duration::from_secs(config.classification_timeout_secs);

    match tokio::time::timeout(timeout, classifier.classify(excerpt, metadata)).await {
        Ok(Ok(payload)) => response::parse_payload(&payload, config.raw_response_limit),
        Ok(Err(e)) => {
            tracing::warn!(
                classifier = classifier.name(),
                error = %e,
                "classification call failed, unit marked as error"
            );
            ClassificationResult::error(None)
        }
        Err(_) => {
            tracing::warn!(
                classifier = classifier.name(),
                timeout_secs = config.classification_timeout_secs,
                "classification call timed out, unit marked as error"
            );
            ClassificationResult::error(None)
        }
    }
}

/// First `limit` characters of `text`, cut on a char boundary.
pub(crate) fn bounded_excerpt(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
