//! Vorleser - EPUB-to-Structured-Content Pipeline
//!
//! Vorleser turns an EPUB into a structured document ready for narration
//! tooling: it extracts the book's manifest and spine from the container,
//! walks the reading order, cleans markup into plain text, classifies each
//! content unit through a pluggable oracle (chapter, front matter, table of
//! contents, ...), segments chapter text into sentences with language-aware
//! rules, and estimates narration durations.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vorleser::{convert_file_sync, Classifier, ConversionConfig};
//!
//! # fn main() -> vorleser::Result<()> {
//! # let classifier: Arc<dyn Classifier> = unimplemented!();
//! let config = ConversionConfig::default();
//! let document = convert_file_sync("book.epub", classifier, &config)?;
//! println!("{}: {} chapters, {}", document.title, document.total_chapter_count,
//!     document.estimated_total_duration);
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **Core Module** (`core`): conversion orchestration and configuration
//! - **EPUB** (`epub`): container/package parsing and spine-ordered extraction
//! - **Classification** (`classify`): oracle capability trait with defensive
//!   payload normalization
//! - **Text** (`text`): sentence segmentation and duration handling
//!
//! # Failure model
//!
//! Archive-stage faults (malformed container, missing package document,
//! corrupt zip) fail the conversion. Everything per unit (oracle errors,
//! timeouts, unparseable payloads) is absorbed into error-typed units, so a
//! partially-processed book is still a valid, inspectable document.

#![deny(unsafe_code)]

pub mod classify;
pub mod core;
pub mod epub;
pub mod error;
pub mod language_detection;
pub mod text;
pub mod types;

pub use crate::classify::Classifier;
pub use crate::core::config::ConversionConfig;
pub use crate::core::converter::{convert_bytes, convert_bytes_sync, convert_file, convert_file_sync};
pub use crate::error::{Result, VorleserError};
pub use crate::types::*;
