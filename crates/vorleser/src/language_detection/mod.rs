//! Working-language resolution.
//!
//! The pipeline needs a single canonical two-letter code to pick the
//! segmentation rules. Resolution order: declared package metadata →
//! content-based detection (feature `language-detection`, whatlang) →
//! "en". Only the first two characters of a declared tag are significant:
//! "en-US" and "en_GB" both canonicalize to "en".

use crate::types::DEFAULT_LANGUAGE;

/// How much sampled text the content heuristic looks at.
const DETECTION_SAMPLE_CHARS: usize = 2000;

/// Minimum whatlang confidence to accept a content-based guess.
#[cfg(feature = "language-detection")]
const MIN_CONFIDENCE: f64 = 0.5;

/// Resolve the working language for a document.
///
/// `declared` is the package-metadata language (if any); `sample` is cleaned
/// content text used for the heuristic fallback.
pub fn resolve_language(declared: Option<&str>, sample: &str) -> String {
    if let Some(code) = declared.and_then(canonical_code) {
        return code;
    }

    let bounded: String = sample.chars().take(DETECTION_SAMPLE_CHARS).collect();
    if let Some(code) = detect_from_content(&bounded) {
        tracing::debug!(language = %code, "language resolved from content heuristics");
        return code;
    }

    DEFAULT_LANGUAGE.to_string()
}

/// Canonicalize a language tag to its two-letter code.
///
/// Returns `None` when the tag does not start with two ASCII letters.
pub fn canonical_code(tag: &str) -> Option<String> {
    let mut chars = tag.trim().chars();
    let first = chars.next()?;
    let second = chars.next()?;
    if first.is_ascii_alphabetic() && second.is_ascii_alphabetic() {
        Some(format!(
            "{}{}",
            first.to_ascii_lowercase(),
            second.to_ascii_lowercase()
        ))
    } else {
        None
    }
}

#[cfg(feature = "language-detection")]
fn detect_from_content(sample: &str) -> Option<String> {
    if sample.trim().is_empty() {
        return None;
    }
    let info = whatlang::detect(sample)?;
    if info.confidence() < MIN_CONFIDENCE {
        return None;
    }
    lang_to_code(info.lang())
}

#[cfg(not(feature = "language-detection"))]
fn detect_from_content(_sample: &str) -> Option<String> {
    None
}

/// Map whatlang's ISO 639-3 language to the two-letter code the segmenter
/// buckets on. Languages without a mapping fall through to the default.
#[cfg(feature = "language-detection")]
fn lang_to_code(lang: whatlang::Lang) -> Option<String> {
    use whatlang::Lang;

    let code = match lang {
        Lang::Eng => "en",
        Lang::Fra => "fr",
        Lang::Spa => "es",
        Lang::Deu => "de",
        Lang::Ita => "it",
        Lang::Por => "pt",
        Lang::Nld => "nl",
        Lang::Rus => "ru",
        Lang::Ukr => "uk",
        Lang::Pol => "pl",
        Lang::Ces => "cs",
        Lang::Swe => "sv",
        Lang::Dan => "da",
        Lang::Nob => "no",
        Lang::Fin => "fi",
        Lang::Hun => "hu",
        Lang::Ron => "ro",
        Lang::Tur => "tr",
        Lang::Ell => "el",
        Lang::Cat => "ca",
        Lang::Cmn => "zh",
        Lang::Jpn => "ja",
        Lang::Kor => "ko",
        Lang::Ara => "ar",
        Lang::Heb => "he",
        Lang::Hin => "hi",
        Lang::Tha => "th",
        Lang::Vie => "vi",
        Lang::Ind => "id",
        _ => return None,
    };
    Some(code.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_code() {
        assert_eq!(canonical_code("en").as_deref(), Some("en"));
        assert_eq!(canonical_code("en-US").as_deref(), Some("en"));
        assert_eq!(canonical_code("EN_gb").as_deref(), Some("en"));
        assert_eq!(canonical_code("  de-DE ").as_deref(), Some("de"));
        assert_eq!(canonical_code("zh-Hans").as_deref(), Some("zh"));
        assert_eq!(canonical_code("x"), None);
        assert_eq!(canonical_code(""), None);
        assert_eq!(canonical_code("12"), None);
    }

    #[test]
    fn test_declared_language_wins() {
        let resolved = resolve_language(Some("fr-CA"), "This is clearly English text.");
        assert_eq!(resolved, "fr");
    }

    #[test]
    fn test_unusable_declared_falls_through() {
        let resolved = resolve_language(Some("?"), "");
        assert_eq!(resolved, "en");
    }

    #[test]
    fn test_empty_everything_defaults_to_en() {
        assert_eq!(resolve_language(None, ""), "en");
    }

    #[test]
    #[cfg(feature = "language-detection")]
    fn test_content_heuristic_detects_german() {
        let sample = "Der schnelle braune Fuchs springt über den faulen Hund. \
                      Es war einmal ein kleines Mädchen, das in einem großen Wald wohnte. \
                      Die Sonne schien hell über den Bergen und die Vögel sangen.";
        assert_eq!(resolve_language(None, sample), "de");
    }

    #[test]
    #[cfg(feature = "language-detection")]
    fn test_content_heuristic_detects_english() {
        let sample = "It was the best of times, it was the worst of times, it was the age \
                      of wisdom, it was the age of foolishness, it was the epoch of belief.";
        assert_eq!(resolve_language(None, sample), "en");
    }
}
