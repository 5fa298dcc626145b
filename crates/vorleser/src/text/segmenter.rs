//! Language-aware sentence segmentation and narration estimates.
//!
//! Two rule buckets:
//!
//! - Space-delimited languages with Latin-derived punctuation (the default):
//!   a sentence ends at `.`/`!`/`?` followed by whitespace and a capital
//!   letter from the language's accepted set. The `regex` crate has no
//!   lookahead, so instead of splitting on a boundary pattern the segmenter
//!   finds boundary matches and cuts just after the punctuation, which also
//!   keeps the terminal mark attached to the preceding sentence.
//! - zh/ja/ko: no word spacing, so text splits directly on the full-width
//!   terminal marks (ko additionally on their ASCII equivalents).
//!
//! Segmentation is a pure function of (text, language); repeated calls give
//! identical results.

use once_cell::sync::Lazy;
use regex::Regex;

static BOUNDARY_DEFAULT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[.!?]\s+[A-Z]").expect("default sentence boundary regex pattern is valid and should compile")
});
static BOUNDARY_DE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[.!?]\s+[A-ZÄÖÜß]").expect("German sentence boundary regex pattern is valid and should compile")
});
static BOUNDARY_ES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[.!?]\s+[A-ZÁÉÍÓÚÑÜ¿¡]").expect("Spanish sentence boundary regex pattern is valid and should compile")
});
static BOUNDARY_FR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[.!?]\s+[A-ZÀÂÆÇÉÈÊËÎÏÔŒÙÛÜ]")
        .expect("French sentence boundary regex pattern is valid and should compile")
});
static BOUNDARY_IT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[.!?]\s+[A-ZÀÈÉÌÒÙ]").expect("Italian sentence boundary regex pattern is valid and should compile")
});

const CJK_TERMINALS: &[char] = &['。', '！', '？'];
const KO_TERMINALS: &[char] = &['。', '！', '？', '.', '!', '?'];

/// Split cleaned text into sentences for the given canonical language code.
///
/// Terminal punctuation stays with its sentence. Results are trimmed and
/// segments without a single alphanumeric character are dropped, so
/// punctuation-only input yields an empty list rather than an error.
pub fn split_sentences(text: &str, language: &str) -> Vec<String> {
    match language {
        "zh" | "ja" => split_on_terminals(text, CJK_TERMINALS),
        "ko" => split_on_terminals(text, KO_TERMINALS),
        _ => split_latin(text, boundary_for(language)),
    }
}

fn boundary_for(language: &str) -> &'static Regex {
    match language {
        "de" => &BOUNDARY_DE,
        "es" => &BOUNDARY_ES,
        "fr" => &BOUNDARY_FR,
        "it" => &BOUNDARY_IT,
        _ => &BOUNDARY_DEFAULT,
    }
}

fn split_latin(text: &str, boundary: &Regex) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for m in boundary.find_iter(text) {
        // Boundary matches `<punct><whitespace><capital>`; the punctuation is
        // a single byte, so the cut lands right after it.
        let cut = m.start() + 1;
        push_sentence(&mut sentences, &text[start..cut]);
        start = cut;
    }
    push_sentence(&mut sentences, &text[start..]);

    sentences
}

fn split_on_terminals(text: &str, terminals: &[char]) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for (idx, c) in text.char_indices() {
        if terminals.contains(&c) {
            let cut = idx + c.len_utf8();
            push_sentence(&mut sentences, &text[start..cut]);
            start = cut;
        }
    }
    push_sentence(&mut sentences, &text[start..]);

    sentences
}

fn push_sentence(sentences: &mut Vec<String>, segment: &str) {
    let trimmed = segment.trim();
    if !trimmed.is_empty() && trimmed.chars().any(char::is_alphanumeric) {
        sentences.push(trimmed.to_string());
    }
}

/// Count words for the given canonical language code.
///
/// Space-delimited languages count whitespace-separated tokens; zh/ja/ko
/// have no word spacing, so the count is approximated from the
/// non-whitespace character count and the configured characters-per-word
/// ratio.
pub fn word_count(text: &str, language: &str, cjk_chars_per_word: f64) -> usize {
    match language {
        "zh" | "ja" | "ko" => {
            let chars = text.chars().filter(|c| !c.is_whitespace()).count();
            (chars as f64 / cjk_chars_per_word).ceil() as usize
        }
        _ => text.split_whitespace().count(),
    }
}

/// Narration estimate for a word count, formatted as "Nm 0s".
///
/// Anything non-empty rounds up to at least one minute.
pub fn estimate_duration(word_count: usize, words_per_minute: f64) -> String {
    let minutes = (word_count as f64 / words_per_minute).round().max(1.0) as u64;
    format!("{}m 0s", minutes)
}
