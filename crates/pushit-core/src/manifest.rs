//! Slug → publishing metadata, read once per run from `posts.json`.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("manifest {path} could not be read: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("manifest {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// One manifest record as it appears on disk.
///
/// Key names follow the SEO plugin fields the remote site expects; the short aliases are accepted
/// for hand-written manifests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, alias = "description", alias = "seo_description")]
    pub rank_math_description: Option<String>,
    #[serde(default, alias = "rank_math_focus_keyword")]
    pub focus_keyword: Option<String>,
    #[serde(default, alias = "featured_image")]
    pub featured_image_url: Option<String>,
}

/// A required manifest field that was absent or blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    Slug,
    Title,
    SeoDescription,
    FocusKeyword,
}

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MissingField::Slug => "slug",
            MissingField::Title => "title",
            MissingField::SeoDescription => "rank_math_description",
            MissingField::FocusKeyword => "focus_keyword",
        };
        f.write_str(name)
    }
}

/// Validated metadata for one content item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentMeta {
    pub slug: String,
    pub title: String,
    pub seo_description: String,
    pub focus_keyword: String,
    pub media: Option<String>,
}

fn slug_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]*$").expect("static slug regex"))
}

pub fn is_valid_slug(slug: &str) -> bool {
    slug_pattern().is_match(slug)
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
}

impl ManifestEntry {
    /// Check the entry joined to the queue file `slug`.
    ///
    /// SEO fields are only mandatory when `require_seo` is set; otherwise they default to empty.
    pub fn validate(&self, slug: &str, require_seo: bool) -> Result<ContentMeta, MissingField> {
        let declared = non_blank(&self.slug).unwrap_or(slug);
        if declared != slug || !is_valid_slug(slug) {
            return Err(MissingField::Slug);
        }
        let title = non_blank(&self.title).ok_or(MissingField::Title)?;

        let seo_description = non_blank(&self.rank_math_description);
        let focus_keyword = non_blank(&self.focus_keyword);
        if require_seo {
            seo_description.ok_or(MissingField::SeoDescription)?;
            focus_keyword.ok_or(MissingField::FocusKeyword)?;
        }

        Ok(ContentMeta {
            slug: slug.to_string(),
            title: title.to_string(),
            seo_description: seo_description.unwrap_or_default().to_string(),
            focus_keyword: focus_keyword.unwrap_or_default().to_string(),
            media: non_blank(&self.featured_image_url).map(str::to_string),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ManifestDocument {
    List(Vec<ManifestEntry>),
    Keyed(BTreeMap<String, ManifestEntry>),
}

/// Immutable slug → entry mapping plus the non-fatal issues found while reading it.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    entries: BTreeMap<String, ManifestEntry>,
    pub warnings: Vec<String>,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let raw = fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw).map_err(|source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Accepts either a JSON array of entries (keyed by their `slug`) or an object keyed by slug.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let document: ManifestDocument = serde_json::from_str(raw)?;
        let mut manifest = Manifest::default();

        match document {
            ManifestDocument::List(list) => {
                for (index, entry) in list.into_iter().enumerate() {
                    let Some(slug) = non_blank(&entry.slug).map(str::to_string) else {
                        manifest
                            .warnings
                            .push(format!("Manifest entry #{} has no slug; ignoring it.", index + 1));
                        continue;
                    };
                    manifest.insert(slug, entry);
                }
            }
            ManifestDocument::Keyed(map) => {
                for (slug, entry) in map {
                    manifest.insert(slug, entry);
                }
            }
        }

        Ok(manifest)
    }

    fn insert(&mut self, slug: String, entry: ManifestEntry) {
        if self.entries.contains_key(&slug) {
            self.warnings.push(format!(
                "Duplicate manifest entry for slug '{slug}'; keeping the first one."
            ));
            return;
        }
        self.entries.insert(slug, entry);
    }

    pub fn get(&self, slug: &str) -> Option<&ManifestEntry> {
        self.entries.get(slug)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(slug: &str, title: &str) -> ManifestEntry {
        ManifestEntry {
            slug: Some(slug.to_string()),
            title: Some(title.to_string()),
            ..ManifestEntry::default()
        }
    }

    #[test]
    fn test_list_manifest_is_keyed_by_slug() {
        let raw = r#"[
            {"slug": "a", "title": "Post A", "rank_math_description": "desc", "focus_keyword": "kw"},
            {"slug": "b", "title": "Post B", "featured_image_url": "https://cdn.example.com/b.png"}
        ]"#;
        let manifest = Manifest::from_json(raw).unwrap();
        assert_eq!(manifest.len(), 2);
        assert!(manifest.warnings.is_empty());
        assert_eq!(
            manifest.get("b").unwrap().featured_image_url.as_deref(),
            Some("https://cdn.example.com/b.png")
        );
    }

    #[test]
    fn test_keyed_manifest_and_aliases() {
        let raw = r#"{"intro": {"title": "Intro", "description": "d", "featured_image": "~/img.jpg"}}"#;
        let manifest = Manifest::from_json(raw).unwrap();
        let meta = manifest.get("intro").unwrap().validate("intro", false).unwrap();
        assert_eq!(meta.seo_description, "d");
        assert_eq!(meta.media.as_deref(), Some("~/img.jpg"));
    }

    #[test]
    fn test_entries_without_slug_and_duplicates_warn() {
        let raw = r#"[{"title": "orphan"}, {"slug": "a", "title": "one"}, {"slug": "a", "title": "two"}]"#;
        let manifest = Manifest::from_json(raw).unwrap();
        assert_eq!(manifest.len(), 1);
        assert_eq!(manifest.get("a").unwrap().title.as_deref(), Some("one"));
        assert_eq!(manifest.warnings.len(), 2);
    }

    #[test]
    fn test_malformed_manifest_is_an_error() {
        assert!(Manifest::from_json("{not json").is_err());
        assert!(Manifest::from_json("42").is_err());
    }

    #[test]
    fn test_validate_requires_title() {
        let mut e = entry("a", "  ");
        assert_eq!(e.validate("a", false), Err(MissingField::Title));
        e.title = None;
        assert_eq!(e.validate("a", false), Err(MissingField::Title));
    }

    #[test]
    fn test_validate_seo_fields_only_when_required() {
        let e = entry("a", "Title");
        let meta = e.validate("a", false).unwrap();
        assert_eq!(meta.seo_description, "");
        assert_eq!(meta.focus_keyword, "");
        assert_eq!(e.validate("a", true), Err(MissingField::SeoDescription));

        let mut with_desc = e.clone();
        with_desc.rank_math_description = Some("desc".to_string());
        assert_eq!(with_desc.validate("a", true), Err(MissingField::FocusKeyword));
    }

    #[test]
    fn test_validate_rejects_mismatched_or_unsafe_slugs() {
        assert_eq!(entry("b", "T").validate("a", false), Err(MissingField::Slug));
        let keyed = ManifestEntry {
            title: Some("T".to_string()),
            ..ManifestEntry::default()
        };
        assert_eq!(keyed.validate("has space", false), Err(MissingField::Slug));
        assert!(keyed.validate("fine-slug_2", false).is_ok());
    }
}
