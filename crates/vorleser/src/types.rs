use serde::{Deserialize, Serialize};

/// Title used when the package document declares none.
pub const DEFAULT_TITLE: &str = "Untitled Book";

/// Author used when the package document declares none.
pub const DEFAULT_AUTHOR: &str = "Unknown Author";

/// Language used when neither metadata nor content heuristics resolve one.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Semantic role of a content unit, as judged by the classification oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Chapter,
    Frontmatter,
    Toc,
    Copyright,
    Dedication,
    Preface,
    Appendix,
    Other,
    /// The oracle call failed or returned an unusable payload. Units carrying
    /// this type are always excluded.
    Error,
}

impl ContentType {
    /// Normalize an oracle-supplied label into a content type.
    ///
    /// Unknown labels map to `Other` rather than failing; the oracle output
    /// is untrusted.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "chapter" => Self::Chapter,
            "frontmatter" | "front_matter" | "front-matter" | "front matter" => Self::Frontmatter,
            "toc" | "table_of_contents" | "table of contents" => Self::Toc,
            "copyright" => Self::Copyright,
            "dedication" => Self::Dedication,
            "preface" => Self::Preface,
            "appendix" => Self::Appendix,
            "error" => Self::Error,
            _ => Self::Other,
        }
    }
}

/// Oracle judgment for a single content unit.
///
/// `include` defaults to true; it is forced to false when the content type is
/// [`ContentType::Error`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub content_type: ContentType,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub chapter_number: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    pub include: bool,

    /// Bounded excerpt of the raw oracle payload, retained for diagnostics
    /// when the payload could not be parsed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
}

impl ClassificationResult {
    /// Build a result, enforcing the error-implies-excluded invariant.
    pub fn new(
        content_type: ContentType,
        chapter_number: Option<u32>,
        title: Option<String>,
        include: bool,
    ) -> Self {
        let include = include && content_type != ContentType::Error;
        Self {
            content_type,
            chapter_number,
            title,
            include,
            raw_response: None,
        }
    }

    /// Error-typed result for a failed or unusable oracle call.
    pub fn error(raw_response: Option<String>) -> Self {
        Self {
            content_type: ContentType::Error,
            chapter_number: None,
            title: None,
            include: false,
            raw_response,
        }
    }
}

impl Default for ClassificationResult {
    fn default() -> Self {
        Self::new(ContentType::Other, None, None, true)
    }
}

/// One manifest `item` from the package document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub id: String,
    pub href: String,
    pub media_type: String,

    /// Title hint when the manifest declares one; rarely present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Book-level metadata handed to the classification oracle and carried into
/// the final document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookMetadata {
    pub title: String,
    pub author: String,
    /// Canonical two-letter language code.
    pub language: String,
}

impl Default for BookMetadata {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            author: DEFAULT_AUTHOR.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

/// One spine-ordered, cleaned, classified piece of book content.
///
/// Created during extraction, enriched by classification and segmentation,
/// immutable thereafter. Units are never deleted, only filtered into the
/// document's `chapters`/`front_matter` views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentUnit {
    /// 0-based position, assigned in spine order.
    pub index: usize,
    pub id: String,
    pub href: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_hint: Option<String>,

    /// Cleaned plain text.
    pub text: String,

    pub classification: ClassificationResult,

    /// Present only for included chapter-typed units.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentences: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_count: Option<usize>,

    /// Formatted narration estimate ("Nm 0s"); present only for included
    /// chapter-typed units.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_duration: Option<String>,

    /// Canonical two-letter language code used for segmentation.
    pub language: String,
}

impl ContentUnit {
    /// Whether this unit is an included chapter.
    pub fn is_chapter(&self) -> bool {
        self.classification.content_type == ContentType::Chapter && self.classification.include
    }

    /// Whether this unit belongs in the front-matter view: included, not a
    /// chapter, not an error.
    pub fn is_front_matter(&self) -> bool {
        self.classification.include
            && !matches!(
                self.classification.content_type,
                ContentType::Chapter | ContentType::Error
            )
    }
}

/// Final structured document assembled by the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    pub author: String,
    pub language: String,

    /// Number of units extracted from the spine, before any filtering.
    pub total_content_count: usize,
    pub total_chapter_count: usize,

    /// RFC 3339 timestamp of the conversion run.
    pub processed_at: String,

    /// Aggregate of per-chapter narration estimates, or "Unknown" when no
    /// unit qualifies.
    pub estimated_total_duration: String,

    /// Included chapter-typed units, in spine order.
    pub chapters: Vec<ContentUnit>,

    /// Included non-chapter, non-error units, in spine order.
    pub front_matter: Vec<ContentUnit>,

    /// Full unfiltered unit list, retained for diagnostics.
    pub units: Vec<ContentUnit>,
}
