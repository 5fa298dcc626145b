//! Defensive parsing of oracle payloads.
//!
//! Oracle backends are untrusted: the payload may be clean JSON, JSON
//! wrapped in markdown code fences, or free text. Parsing tries the payload
//! as-is, then once more with the fences stripped, and gives up into an
//! error-typed result carrying a bounded excerpt of the raw payload.

use crate::types::{ClassificationResult, ContentType};
use serde::Deserialize;

/// Loose mirror of the payload shape the oracle is asked to produce.
///
/// Every field is optional and `chapter_number` accepts both numbers and
/// numeric strings; `camelCase` aliases cover backends that answer in the
/// JS convention.
#[derive(Debug, Deserialize)]
struct RawClassification {
    #[serde(alias = "contentType")]
    content_type: Option<String>,

    #[serde(alias = "chapterNumber")]
    chapter_number: Option<serde_json::Value>,

    title: Option<String>,

    include: Option<bool>,
}

/// Parse an oracle payload into a classification, never failing.
pub fn parse_payload(payload: &str, raw_response_limit: usize) -> ClassificationResult {
    let attempt = serde_json::from_str::<RawClassification>(payload.trim())
        .or_else(|_| serde_json::from_str::<RawClassification>(strip_code_fences(payload)));

    match attempt {
        Ok(raw) => normalize(raw),
        Err(e) => {
            tracing::warn!(error = %e, "unparseable classification payload, unit marked as error");
            ClassificationResult::error(Some(bounded(payload, raw_response_limit)))
        }
    }
}

/// Strip a wrapping markdown code fence (```json ... ``` or ``` ... ```).
fn strip_code_fences(payload: &str) -> &str {
    let trimmed = payload.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json", "JSON", ...) on the opening fence line.
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    body.strip_suffix("```").unwrap_or(body).trim()
}

fn normalize(raw: RawClassification) -> ClassificationResult {
    let content_type = raw
        .content_type
        .as_deref()
        .map(ContentType::from_label)
        .unwrap_or(ContentType::Other);

    let chapter_number = raw.chapter_number.and_then(|value| match value {
        serde_json::Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        serde_json::Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    });

    let title = raw.title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty());

    ClassificationResult::new(content_type, chapter_number, title, raw.include.unwrap_or(true))
}

fn bounded(payload: &str, limit: usize) -> String {
    match payload.char_indices().nth(limit) {
        Some((idx, _)) => payload[..idx].to_string(),
        None => payload.to_string(),
    }
}
