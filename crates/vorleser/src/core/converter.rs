//! Main conversion entry points.
//!
//! # Functions
//!
//! - [`convert_bytes`] - Convert an EPUB held in memory
//! - [`convert_file`] - Convert an EPUB on disk
//! - [`convert_bytes_sync`] / [`convert_file_sync`] - Blocking wrappers
//!
//! Failures at the archive-read stage (bad zip, malformed container, missing
//! package document) abort the conversion; everything after that point is
//! absorbed per unit, so a partially-classified book still comes back as a
//! valid [`Document`].

use crate::classify::Classifier;
use crate::core::config::ConversionConfig;
use crate::core::pipeline;
use crate::epub::{EpubReader, content};
use crate::types::Document;
use crate::Result;
use once_cell::sync::Lazy;
use std::path::Path;
use std::sync::Arc;

/// Global Tokio runtime for the synchronous wrappers.
///
/// Lazily initialized on first use and shared across all sync calls; runtime
/// creation only fails on system resource exhaustion, at which point nothing
/// else would work either.
static GLOBAL_RUNTIME: Lazy<tokio::runtime::Runtime> = Lazy::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to create global Tokio runtime - system may be out of resources")
});

/// Convert an EPUB byte buffer into a structured document.
///
/// # Errors
///
/// Returns `VorleserError::MalformedContainer` / `MissingPackageDocument` /
/// `Extraction` for archive-stage faults and `Validation` for an invalid
/// config. Classification and segmentation failures never surface here; they
/// become error-typed units inside the document.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use vorleser::{convert_bytes, Classifier, ConversionConfig};
///
/// # async fn example(classifier: Arc<dyn Classifier>) -> vorleser::Result<()> {
/// let bytes = std::fs::read("book.epub")?;
/// let config = ConversionConfig::default();
/// let document = convert_bytes(&bytes, classifier, &config).await?;
/// println!("{} chapters", document.total_chapter_count);
/// # Ok(())
/// # }
/// ```
pub async fn convert_bytes(
    bytes: &[u8],
    classifier: Arc<dyn Classifier>,
    config: &ConversionConfig,
) -> Result<Document> {
    config.validate()?;

    let mut reader = EpubReader::from_bytes(bytes.to_vec())?;
    let package = reader.read_package()?;
    let extracted = content::extract_units(&mut reader, &package);

    tracing::info!(
        title = %package.title,
        spine_items = package.spine.len(),
        extracted = extracted.len(),
        "spine content extracted"
    );

    Ok(pipeline::run_pipeline(extracted, &package, classifier, config).await)
}

/// Convert an EPUB file into a structured document.
pub async fn convert_file(
    path: impl AsRef<Path>,
    classifier: Arc<dyn Classifier>,
    config: &ConversionConfig,
) -> Result<Document> {
    let bytes = tokio::fs::read(path.as_ref()).await?;
    convert_bytes(&bytes, classifier, config).await
}

/// Synchronous wrapper around [`convert_bytes`].
pub fn convert_bytes_sync(
    bytes: &[u8],
    classifier: Arc<dyn Classifier>,
    config: &ConversionConfig,
) -> Result<Document> {
    GLOBAL_RUNTIME.block_on(convert_bytes(bytes, classifier, config))
}

/// Synchronous wrapper around [`convert_file`].
pub fn convert_file_sync(
    path: impl AsRef<Path>,
    classifier: Arc<dyn Classifier>,
    config: &ConversionConfig,
) -> Result<Document> {
    GLOBAL_RUNTIME.block_on(convert_file(path, classifier, config))
}
