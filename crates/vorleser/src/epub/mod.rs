//! EPUB container reading.
//!
//! An EPUB is a zip archive with a fixed-path container descriptor
//! (`META-INF/container.xml`) pointing at the package document (OPF), which
//! in turn declares metadata, the resource manifest, and the spine reading
//! order. This module opens the archive and locates/loads the package
//! document; [`package`] parses it and [`content`] walks the spine.

pub mod content;
pub mod package;

use crate::{Result, VorleserError};
use std::io::{Cursor, Read};
use zip::ZipArchive;

pub use content::ExtractedUnit;
pub use package::PackageDocument;

/// Fixed path of the container descriptor inside the archive.
const CONTAINER_PATH: &str = "META-INF/container.xml";

/// Open EPUB archive with entry-level text access.
#[derive(Debug)]
pub struct EpubReader {
    archive: ZipArchive<Cursor<Vec<u8>>>,
}

impl EpubReader {
    /// Open an EPUB from its raw bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| VorleserError::extraction_with_source("failed to open archive as ZIP", e))?;
        Ok(Self { archive })
    }

    /// Read an archive entry as text, `None` when the entry is absent or
    /// unreadable. Content is decoded as UTF-8 with lossy fallback.
    pub(crate) fn read_entry(&mut self, path: &str) -> Option<String> {
        let mut file = self.archive.by_name(path).ok()?;
        let mut buf = Vec::new();
        file.read_to_end(&mut buf).ok()?;
        Some(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Locate the package document via the container descriptor and parse it.
    pub fn read_package(&mut self) -> Result<PackageDocument> {
        let container = self.read_entry(CONTAINER_PATH).ok_or_else(|| {
            VorleserError::malformed_container("META-INF/container.xml not found in archive")
        })?;

        let opf_path = container_rootfile_path(&container)?;

        let opf_xml = self
            .read_entry(&opf_path)
            .ok_or_else(|| VorleserError::MissingPackageDocument(opf_path.clone()))?;

        let directory = package_directory(&opf_path);
        package::parse_package(&opf_xml, directory)
    }
}

/// Pull the package document path out of the container descriptor.
///
/// The first `rootfile` element wins; a missing element or a missing/empty
/// `full-path` attribute is a malformed container.
fn container_rootfile_path(xml: &str) -> Result<String> {
    let doc = roxmltree::Document::parse(xml).map_err(|e| {
        VorleserError::malformed_container_with_source("container descriptor is not valid XML", e)
    })?;

    let rootfile = doc
        .descendants()
        .find(|n| n.tag_name().name() == "rootfile")
        .ok_or_else(|| {
            VorleserError::malformed_container("no rootfile element in container descriptor")
        })?;

    match rootfile.attribute("full-path").map(str::trim) {
        Some(path) if !path.is_empty() => Ok(path.to_string()),
        _ => Err(VorleserError::malformed_container(
            "rootfile element lacks a full-path attribute",
        )),
    }
}

/// Directory of the package document, used to resolve relative hrefs.
fn package_directory(opf_path: &str) -> String {
    match opf_path.rfind('/') {
        Some(idx) => opf_path[..idx].to_string(),
        None => String::new(),
    }
}
