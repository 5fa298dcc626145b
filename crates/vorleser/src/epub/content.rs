//! Spine-ordered content extraction and markup cleaning.

use super::{EpubReader, PackageDocument};
use once_cell::sync::Lazy;
use regex::Regex;

static SCRIPT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<script[^>]*>.*?</script>").expect("script block regex pattern is valid and should compile")
});
static STYLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<style[^>]*>.*?</style>").expect("style block regex pattern is valid and should compile")
});
static TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>]+>").expect("tag regex pattern is valid and should compile"));
static NUMERIC_ENTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&#(x[0-9a-fA-F]+|[0-9]+);").expect("numeric entity regex pattern is valid and should compile")
});
static WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex pattern is valid and should compile"));

/// One spine item's extracted, cleaned text, before classification.
#[derive(Debug, Clone)]
pub struct ExtractedUnit {
    /// 0-based position in extraction order (spine order minus skips).
    pub index: usize,
    pub id: String,
    pub href: String,
    pub title_hint: Option<String>,
    pub text: String,
}

/// Walk the spine in order and extract every renderable item.
///
/// Skip conditions are tolerated, not fatal: spine references without a
/// manifest entry, non-HTML media types, and hrefs absent from the archive
/// are all passed over silently (with a debug log). Archive-level faults were
/// already surfaced when the reader was opened.
pub fn extract_units(reader: &mut EpubReader, package: &PackageDocument) -> Vec<ExtractedUnit> {
    let mut units = Vec::new();

    for idref in &package.spine {
        let Some(entry) = package.manifest.get(idref) else {
            tracing::debug!(idref = %idref, "spine reference not in manifest, skipping");
            continue;
        };

        if !entry.media_type.to_ascii_lowercase().contains("html") {
            tracing::debug!(
                href = %entry.href,
                media_type = %entry.media_type,
                "non-renderable spine item, skipping"
            );
            continue;
        }

        let path = resolve_href(&package.directory, &entry.href);
        let Some(markup) = reader.read_entry(&path) else {
            tracing::debug!(path = %path, "spine item missing from archive, skipping");
            continue;
        };

        units.push(ExtractedUnit {
            index: units.len(),
            id: entry.id.clone(),
            href: entry.href.clone(),
            title_hint: entry.title.clone(),
            text: clean_markup(&markup),
        });
    }

    units
}

/// Resolve a manifest href against the package document's directory.
///
/// A leading `/` addresses the archive root; `.`/`..` segments are
/// normalized away.
pub(crate) fn resolve_href(base_dir: &str, href: &str) -> String {
    let joined = if let Some(rooted) = href.strip_prefix('/') {
        rooted.to_string()
    } else if base_dir.is_empty() {
        href.to_string()
    } else {
        format!("{}/{}", base_dir.trim_end_matches('/'), href)
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in joined.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

/// Reduce markup to plain text.
///
/// Script and style blocks go first (case-insensitive, non-greedy, spanning
/// lines), every remaining tag becomes a single space so adjacent elements
/// stay word-separated, entities are decoded, and whitespace runs collapse
/// to one space.
pub(crate) fn clean_markup(markup: &str) -> String {
    let cleaned = SCRIPT_RE.replace_all(markup, " ");
    let cleaned = STYLE_RE.replace_all(&cleaned, " ");
    let cleaned = TAG_RE.replace_all(&cleaned, " ");
    let cleaned = decode_entities(&cleaned);
    let cleaned = WHITESPACE_RE.replace_all(&cleaned, " ");
    cleaned.trim().to_string()
}

/// Decode the named XML entities plus numeric character references.
fn decode_entities(text: &str) -> String {
    let decoded = NUMERIC_ENTITY_RE.replace_all(text, |caps: &regex::Captures| {
        let body = &caps[1];
        let code = if let Some(hex) = body.strip_prefix('x') {
            u32::from_str_radix(hex, 16).ok()
        } else {
            body.parse::<u32>().ok()
        };
        match code.and_then(char::from_u32) {
            Some(c) => c.to_string(),
            None => caps[0].to_string(),
        }
    });

    decoded
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}
