#![allow(dead_code)]

//! Shared fixtures: in-memory EPUB construction and scripted classifiers.

use async_trait::async_trait;
use std::io::{Cursor, Write};
use vorleser::{BookMetadata, Classifier, Result, VorleserError};
use zip::write::{FileOptions, ZipWriter};

pub const CONTAINER_XML: &str = r#"<?xml version="1.0"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#;

/// Build a zip archive from (path, content) pairs.
pub fn build_zip(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut zip = ZipWriter::new(&mut cursor);
        let options = FileOptions::<'_, ()>::default();
        for (name, content) in entries {
            zip.start_file(*name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }
    cursor.into_inner()
}

/// Build an EPUB with the standard container descriptor, the given package
/// document at `OEBPS/content.opf`, and the given documents under `OEBPS/`.
pub fn build_book(opf: &str, documents: &[(&str, &str)]) -> Vec<u8> {
    let mut entries: Vec<(String, String)> = vec![
        ("META-INF/container.xml".to_string(), CONTAINER_XML.to_string()),
        ("OEBPS/content.opf".to_string(), opf.to_string()),
    ];
    for (name, content) in documents {
        entries.push((format!("OEBPS/{}", name), content.to_string()));
    }
    let borrowed: Vec<(&str, &str)> = entries
        .iter()
        .map(|(n, c)| (n.as_str(), c.as_str()))
        .collect();
    build_zip(&borrowed)
}

/// Reference fixture: "Test Book" by "A. Author", two XHTML spine items with
/// one English paragraph each.
pub fn two_chapter_book() -> Vec<u8> {
    let opf = r#"<?xml version="1.0"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
    <dc:title>Test Book</dc:title>
    <dc:creator>A. Author</dc:creator>
    <dc:language>en</dc:language>
  </metadata>
  <manifest>
    <item id="ch1" href="ch1.xhtml" media-type="application/xhtml+xml"/>
    <item id="ch2" href="ch2.xhtml" media-type="application/xhtml+xml"/>
  </manifest>
  <spine>
    <itemref idref="ch1"/>
    <itemref idref="ch2"/>
  </spine>
</package>"#;
    build_book(
        opf,
        &[
            (
                "ch1.xhtml",
                "<html><body><p>The first chapter opens quietly. Nothing moved in the house. \
                 Then the clock struck twelve.</p></body></html>",
            ),
            (
                "ch2.xhtml",
                "<html><body><p>The second chapter picks up speed. Everyone ran for the door. \
                 Outside, the rain kept falling.</p></body></html>",
            ),
        ],
    )
}

/// Classifier scripted by excerpt substring; the first matching rule wins,
/// otherwise the fallback payload is returned. Matching on content rather
/// than call order keeps replies deterministic under concurrent batches.
pub struct ScriptedClassifier {
    rules: Vec<(String, String)>,
    fallback: String,
}

impl ScriptedClassifier {
    pub fn new(rules: &[(&str, &str)], fallback: &str) -> Self {
        Self {
            rules: rules
                .iter()
                .map(|(needle, reply)| (needle.to_string(), reply.to_string()))
                .collect(),
            fallback: fallback.to_string(),
        }
    }
}

#[async_trait]
impl Classifier for ScriptedClassifier {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn classify(&self, excerpt: &str, _metadata: &BookMetadata) -> Result<String> {
        let reply = self
            .rules
            .iter()
            .find(|(needle, _)| excerpt.contains(needle.as_str()))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| self.fallback.clone());
        Ok(reply)
    }
}

/// Classifier whose every call fails.
pub struct BrokenClassifier;

#[async_trait]
impl Classifier for BrokenClassifier {
    fn name(&self) -> &str {
        "broken"
    }

    async fn classify(&self, _excerpt: &str, _metadata: &BookMetadata) -> Result<String> {
        Err(VorleserError::Classification("backend offline".to_string()))
    }
}
