//! Package document (OPF) parsing: metadata, manifest, spine.

use crate::types::{DEFAULT_AUTHOR, DEFAULT_TITLE, ManifestEntry};
use crate::{Result, VorleserError};
use std::collections::HashMap;

/// Parsed package document.
///
/// `spine` preserves the declared reading order exactly; `manifest` is keyed
/// by item id, last write wins on duplicates.
#[derive(Debug, Clone)]
pub struct PackageDocument {
    pub title: String,
    pub author: String,

    /// Language as declared by the package, before canonicalization; `None`
    /// when neither `dc:language`, the package `xml:lang`, nor a language
    /// `meta` element is present.
    pub declared_language: Option<String>,

    pub manifest: HashMap<String, ManifestEntry>,
    pub spine: Vec<String>,

    /// Directory of the package document inside the archive.
    pub directory: String,
}

/// Parse a package document.
///
/// Tag names are matched on their local part so `dc:`-prefixed and
/// differently-prefixed documents parse the same way. For the repeated
/// Dublin Core elements the first occurrence wins.
pub fn parse_package(xml: &str, directory: String) -> Result<PackageDocument> {
    let doc = roxmltree::Document::parse(xml).map_err(|e| {
        VorleserError::extraction_with_source("package document is not valid XML", e)
    })?;

    let mut title: Option<String> = None;
    let mut author: Option<String> = None;
    let mut dc_language: Option<String> = None;
    let mut meta_language: Option<String> = None;
    let mut manifest: HashMap<String, ManifestEntry> = HashMap::new();
    let mut spine: Vec<String> = Vec::new();

    for node in doc.descendants() {
        match node.tag_name().name() {
            "title" => {
                if title.is_none() {
                    title = non_empty_text(&node);
                }
            }
            "creator" => {
                if author.is_none() {
                    author = non_empty_text(&node);
                }
            }
            "language" => {
                if dc_language.is_none() {
                    dc_language = non_empty_text(&node);
                }
            }
            "item" => {
                let id = node.attribute("id").unwrap_or("").trim();
                let href = node.attribute("href").unwrap_or("").trim();
                let media_type = node.attribute("media-type").unwrap_or("").trim();
                if !id.is_empty() && !href.is_empty() && !media_type.is_empty() {
                    manifest.insert(
                        id.to_string(),
                        ManifestEntry {
                            id: id.to_string(),
                            href: href.to_string(),
                            media_type: media_type.to_string(),
                            title: node
                                .attribute("title")
                                .map(str::trim)
                                .filter(|t| !t.is_empty())
                                .map(String::from),
                        },
                    );
                }
            }
            "itemref" => {
                if let Some(idref) = node.attribute("idref") {
                    let idref = idref.trim();
                    if !idref.is_empty() {
                        spine.push(idref.to_string());
                    }
                }
            }
            "meta" => {
                if meta_language.is_none() && is_language_meta(&node) {
                    meta_language = node
                        .attribute("content")
                        .map(str::trim)
                        .filter(|v| !v.is_empty())
                        .map(String::from)
                        .or_else(|| non_empty_text(&node));
                }
            }
            _ => {}
        }
    }

    // Package root xml:lang sits between dc:language and language metas in
    // the fallback chain.
    let root_lang = doc
        .root_element()
        .attributes()
        .find(|a| a.name() == "lang")
        .map(|a| a.value().trim().to_string())
        .filter(|v| !v.is_empty());

    let declared_language = dc_language.or(root_lang).or(meta_language);

    Ok(PackageDocument {
        title: title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        author: author.unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
        declared_language,
        manifest,
        spine,
        directory,
    })
}

fn non_empty_text(node: &roxmltree::Node) -> Option<String> {
    node.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
}

fn is_language_meta(node: &roxmltree::Node) -> bool {
    let indicates_language =
        |value: &str| value.to_ascii_lowercase().contains("language");
    node.attribute("name").is_some_and(indicates_language)
        || node.attribute("property").is_some_and(indicates_language)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_metadata() {
        let opf = r#"<?xml version="1.0"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
    <dc:title>Test Book</dc:title>
    <dc:creator>A. Author</dc:creator>
    <dc:language>en-US</dc:language>
  </metadata>
  <manifest>
    <item id="ch1" href="ch1.xhtml" media-type="application/xhtml+xml"/>
    <item id="ch2" href="ch2.xhtml" media-type="application/xhtml+xml"/>
    <item id="css" href="style.css" media-type="text/css"/>
  </manifest>
  <spine>
    <itemref idref="ch1"/>
    <itemref idref="ch2"/>
  </spine>
</package>"#;

        let package = parse_package(opf, "OEBPS".to_string()).unwrap();
        assert_eq!(package.title, "Test Book");
        assert_eq!(package.author, "A. Author");
        assert_eq!(package.declared_language.as_deref(), Some("en-US"));
        assert_eq!(package.manifest.len(), 3);
        assert_eq!(package.spine, vec!["ch1", "ch2"]);
        assert_eq!(package.manifest["ch1"].href, "ch1.xhtml");
    }

    #[test]
    fn test_metadata_defaults() {
        let opf = r#"<package><manifest/><spine/></package>"#;
        let package = parse_package(opf, String::new()).unwrap();
        assert_eq!(package.title, "Untitled Book");
        assert_eq!(package.author, "Unknown Author");
        assert!(package.declared_language.is_none());
        assert!(package.spine.is_empty());
    }

    #[test]
    fn test_first_title_and_creator_win() {
        let opf = r#"<package>
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
    <dc:title>First Title</dc:title>
    <dc:title>Second Title</dc:title>
    <dc:creator>First Author</dc:creator>
    <dc:creator>Second Author</dc:creator>
  </metadata>
</package>"#;
        let package = parse_package(opf, String::new()).unwrap();
        assert_eq!(package.title, "First Title");
        assert_eq!(package.author, "First Author");
    }

    #[test]
    fn test_duplicate_manifest_ids_last_wins() {
        let opf = r#"<package><manifest>
  <item id="ch1" href="old.xhtml" media-type="application/xhtml+xml"/>
  <item id="ch1" href="new.xhtml" media-type="application/xhtml+xml"/>
</manifest></package>"#;
        let package = parse_package(opf, String::new()).unwrap();
        assert_eq!(package.manifest.len(), 1);
        assert_eq!(package.manifest["ch1"].href, "new.xhtml");
    }

    #[test]
    fn test_manifest_items_require_all_attributes() {
        let opf = r#"<package><manifest>
  <item id="no-href" media-type="application/xhtml+xml"/>
  <item href="no-id.xhtml" media-type="application/xhtml+xml"/>
  <item id="no-media" href="x.xhtml"/>
  <item id="ok" href="ok.xhtml" media-type="application/xhtml+xml"/>
</manifest></package>"#;
        let package = parse_package(opf, String::new()).unwrap();
        assert_eq!(package.manifest.len(), 1);
        assert!(package.manifest.contains_key("ok"));
    }

    #[test]
    fn test_spine_skips_missing_idref() {
        let opf = r#"<package><spine>
  <itemref idref="a"/>
  <itemref/>
  <itemref idref="b"/>
</spine></package>"#;
        let package = parse_package(opf, String::new()).unwrap();
        assert_eq!(package.spine, vec!["a", "b"]);
    }

    #[test]
    fn test_spine_order_preserved() {
        let opf = r#"<package><spine>
  <itemref idref="zeta"/>
  <itemref idref="alpha"/>
  <itemref idref="mid"/>
</spine></package>"#;
        let package = parse_package(opf, String::new()).unwrap();
        assert_eq!(package.spine, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_language_from_root_xml_lang() {
        let opf = r#"<package xml:lang="fr"><metadata/></package>"#;
        let package = parse_package(opf, String::new()).unwrap();
        assert_eq!(package.declared_language.as_deref(), Some("fr"));
    }

    #[test]
    fn test_language_from_meta_element() {
        let opf = r#"<package><metadata>
  <meta name="dtb:language" content="de"/>
</metadata></package>"#;
        let package = parse_package(opf, String::new()).unwrap();
        assert_eq!(package.declared_language.as_deref(), Some("de"));
    }

    #[test]
    fn test_dc_language_beats_fallbacks() {
        let opf = r#"<package xml:lang="fr">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
    <dc:language>es</dc:language>
    <meta name="language" content="de"/>
  </metadata>
</package>"#;
        let package = parse_package(opf, String::new()).unwrap();
        assert_eq!(package.declared_language.as_deref(), Some("es"));
    }

    #[test]
    fn test_invalid_xml_is_extraction_error() {
        let err = parse_package("<package><unclosed", String::new()).unwrap_err();
        assert!(matches!(err, VorleserError::Extraction { .. }));
    }
}
