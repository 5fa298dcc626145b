//! Pipeline stages past extraction: classification, segmentation, assembly.
//!
//! Classification runs in fixed-size batches with an explicit pause between
//! batches; the oracle backend is assumed to be rate-limited, so the
//! pipeline never launches unbounded concurrent calls. Tasks are tagged with
//! their unit index and results are reordered back into spine order before
//! assembly, so completion order never leaks into the document.

use crate::classify::{self, Classifier};
use crate::core::config::ConversionConfig;
use crate::epub::{ExtractedUnit, PackageDocument};
use crate::language_detection;
use crate::text::{duration, segmenter};
use crate::types::{BookMetadata, ClassificationResult, ContentUnit, Document};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

/// Run classification, segmentation, and assembly over extracted units.
pub(crate) async fn run_pipeline(
    extracted: Vec<ExtractedUnit>,
    package: &PackageDocument,
    classifier: Arc<dyn Classifier>,
    config: &ConversionConfig,
) -> Document {
    let language = resolve_document_language(package, &extracted, config);
    let metadata = Arc::new(BookMetadata {
        title: package.title.clone(),
        author: package.author.clone(),
        language: language.clone(),
    });

    let classifications = classify_all(&extracted, classifier, Arc::clone(&metadata), config).await;

    let mut units: Vec<ContentUnit> = extracted
        .into_iter()
        .zip(classifications)
        .map(|(unit, classification)| ContentUnit {
            index: unit.index,
            id: unit.id,
            href: unit.href,
            title_hint: unit.title_hint,
            text: unit.text,
            classification,
            sentences: None,
            word_count: None,
            estimated_duration: None,
            language: language.clone(),
        })
        .collect();

    for unit in &mut units {
        if unit.is_chapter() {
            let sentences = segmenter::split_sentences(&unit.text, &unit.language);
            let words = segmenter::word_count(&unit.text, &unit.language, config.cjk_chars_per_word);
            unit.estimated_duration = Some(segmenter::estimate_duration(words, config.words_per_minute));
            unit.word_count = Some(words);
            unit.sentences = Some(sentences);
        }
    }

    let estimated_total_duration = duration::aggregate_durations(&units);
    let chapters: Vec<ContentUnit> = units.iter().filter(|u| u.is_chapter()).cloned().collect();
    let front_matter: Vec<ContentUnit> = units.iter().filter(|u| u.is_front_matter()).cloned().collect();

    tracing::info!(
        units = units.len(),
        chapters = chapters.len(),
        front_matter = front_matter.len(),
        language = %language,
        "document assembled"
    );

    Document {
        title: metadata.title.clone(),
        author: metadata.author.clone(),
        language,
        total_content_count: units.len(),
        total_chapter_count: chapters.len(),
        processed_at: chrono::Utc::now().to_rfc3339(),
        estimated_total_duration,
        chapters,
        front_matter,
        units,
    }
}

/// Classify every unit in spine order, `classification_batch_size` calls in
/// flight at once, pausing between batches.
///
/// Per-unit failures are already absorbed inside
/// [`classify::classify_unit`]; a panicked task additionally falls back to an
/// error-typed result, so this function always returns one result per unit.
async fn classify_all(
    extracted: &[ExtractedUnit],
    classifier: Arc<dyn Classifier>,
    metadata: Arc<BookMetadata>,
    config: &ConversionConfig,
) -> Vec<ClassificationResult> {
    let mut results: Vec<Option<ClassificationResult>> = vec![None; extracted.len()];
    if extracted.is_empty() {
        return Vec::new();
    }

    let config = Arc::new(config.clone());
    let batch_delay = Duration::from_millis(config.classification_batch_delay_ms);

    for (batch_index, batch) in extracted.chunks(config.classification_batch_size).enumerate() {
        if batch_index > 0 && !batch_delay.is_zero() {
            tokio::time::sleep(batch_delay).await;
        }

        let mut tasks = JoinSet::new();
        for unit in batch {
            let index = unit.index;
            let text = unit.text.clone();
            let classifier = Arc::clone(&classifier);
            let metadata = Arc::clone(&metadata);
            let config = Arc::clone(&config);

            tasks.spawn(async move {
                let result =
                    classify::classify_unit(classifier.as_ref(), &text, &metadata, &config).await;
                (index, result)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => results[index] = Some(result),
                Err(join_err) => {
                    tracing::warn!(error = %join_err, "classification task panicked, unit marked as error");
                }
            }
        }
    }

    results
        .into_iter()
        .map(|r| r.unwrap_or_else(|| ClassificationResult::error(None)))
        .collect()
}

fn resolve_document_language(
    package: &PackageDocument,
    extracted: &[ExtractedUnit],
    config: &ConversionConfig,
) -> String {
    if let Some(code) = config
        .language_override
        .as_deref()
        .and_then(language_detection::canonical_code)
    {
        return code;
    }

    // Content heuristics only look at a bounded sample, so stop collecting
    // once enough text is on hand.
    let mut sample = String::new();
    for unit in extracted {
        if sample.len() >= 4000 {
            break;
        }
        if !sample.is_empty() {
            sample.push(' ');
        }
        sample.push_str(&unit.text);
    }

    language_detection::resolve_language(package.declared_language.as_deref(), &sample)
}
