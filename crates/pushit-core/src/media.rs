//! Featured-image resolution and upload.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::PublishError;
use crate::remote::{MediaUpload, PublishApi};

const FALLBACK_CONTENT_TYPE: &str = "image/jpeg";

/// Where the image bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaReference {
    Remote(String),
    Local(PathBuf),
}

impl MediaReference {
    /// `http(s)://` stays remote; `file://` and bare paths (with `~` expanded) are local.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return Some(MediaReference::Remote(trimmed.to_string()));
        }
        let path = match trimmed.get(..7) {
            Some(scheme) if scheme.eq_ignore_ascii_case("file://") => {
                let rest = &trimmed[7..];
                urlencoding::decode(rest)
                    .map(|decoded| decoded.into_owned())
                    .unwrap_or_else(|_| rest.to_string())
            }
            _ => trimmed.to_string(),
        };
        Some(MediaReference::Local(PathBuf::from(
            shellexpand::tilde(&path).as_ref(),
        )))
    }

    /// Extension of the last path segment, ignoring any query string or fragment.
    fn extension(&self) -> Option<String> {
        let last_segment = match self {
            MediaReference::Remote(url) => {
                let without_query = url.split(['?', '#']).next().unwrap_or(url);
                without_query.rsplit('/').next().unwrap_or(without_query).to_string()
            }
            MediaReference::Local(path) => path.file_name()?.to_string_lossy().into_owned(),
        };
        Path::new(&last_segment)
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
    }

    pub fn content_type(&self) -> &'static str {
        self.extension()
            .as_deref()
            .and_then(content_type_for_extension)
            .unwrap_or(FALLBACK_CONTENT_TYPE)
    }
}

pub fn content_type_for_extension(ext: &str) -> Option<&'static str> {
    let content_type = match ext.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "avif" => "image/avif",
        "tif" | "tiff" => "image/tiff",
        _ => return None,
    };
    Some(content_type)
}

/// Canonical file extension for the uploaded name.
pub fn extension_for_content_type(content_type: &str) -> &'static str {
    match content_type {
        "image/png" => "png",
        "image/gif" => "gif",
        "image/bmp" => "bmp",
        "image/webp" => "webp",
        "image/svg+xml" => "svg",
        "image/avif" => "avif",
        "image/tiff" => "tiff",
        _ => "jpg",
    }
}

/// Result of the media stage. Never blocks the item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaOutcome {
    Attached(u64),
    NotRequested,
    Failed(String),
}

impl MediaOutcome {
    pub fn media_id(&self) -> Option<u64> {
        match self {
            MediaOutcome::Attached(id) => Some(*id),
            MediaOutcome::NotRequested | MediaOutcome::Failed(_) => None,
        }
    }
}

async fn load_bytes<A: PublishApi>(api: &A, reference: &MediaReference) -> Result<Vec<u8>, PublishError> {
    match reference {
        MediaReference::Remote(url) => api.fetch_image(url).await,
        MediaReference::Local(path) => Ok(tokio::fs::read(path).await?),
    }
}

/// Resolve `reference`, upload it named after `slug`, and report the media id.
pub async fn upload_featured_image<A: PublishApi>(
    api: &A,
    reference: Option<&str>,
    slug: &str,
) -> MediaOutcome {
    let Some(reference) = reference.and_then(MediaReference::parse) else {
        return MediaOutcome::NotRequested;
    };

    let loaded = load_bytes(api, &reference).await.and_then(|bytes| {
        if bytes.is_empty() {
            Err(PublishError::message("image source is empty"))
        } else {
            Ok(bytes)
        }
    });
    let bytes = match loaded {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(slug, stage = "media", error = %err, "Could not read featured image");
            return MediaOutcome::Failed(format!("could not read image: {err}"));
        }
    };

    let content_type = reference.content_type();
    let upload = MediaUpload {
        filename: format!("{slug}.{}", extension_for_content_type(content_type)),
        content_type,
        bytes,
    };

    match api.upload_media(upload).await {
        Ok(id) => {
            info!(slug, media_id = id, "Uploaded featured image");
            MediaOutcome::Attached(id)
        }
        Err(err) => {
            warn!(slug, stage = "media", error = %err, "Featured image upload failed");
            MediaOutcome::Failed(format!("upload failed: {err}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_distinguishes_remote_and_local() {
        assert_eq!(
            MediaReference::parse("https://cdn.example.com/a.png"),
            Some(MediaReference::Remote("https://cdn.example.com/a.png".to_string()))
        );
        assert_eq!(
            MediaReference::parse("file:///srv/img/my%20photo.jpg"),
            Some(MediaReference::Local(PathBuf::from("/srv/img/my photo.jpg")))
        );
        assert_eq!(
            MediaReference::parse("/srv/img/a.gif"),
            Some(MediaReference::Local(PathBuf::from("/srv/img/a.gif")))
        );
        assert_eq!(MediaReference::parse("   "), None);
    }

    #[test]
    fn test_tilde_is_expanded() {
        let Some(MediaReference::Local(path)) = MediaReference::parse("~/pic.png") else {
            panic!("expected a local reference");
        };
        assert!(!path.to_string_lossy().starts_with('~'));
        assert!(path.ends_with("pic.png"));
    }

    #[test]
    fn test_content_type_from_extension() {
        let remote = MediaReference::parse("https://cdn.example.com/x/Photo.PNG?w=300#top").unwrap();
        assert_eq!(remote.content_type(), "image/png");
        let webp = MediaReference::parse("/tmp/a.webp").unwrap();
        assert_eq!(webp.content_type(), "image/webp");
        let unknown = MediaReference::parse("https://cdn.example.com/image").unwrap();
        assert_eq!(unknown.content_type(), "image/jpeg");
        let dotted_host = MediaReference::parse("https://cdn.example.com/").unwrap();
        assert_eq!(dotted_host.content_type(), "image/jpeg");
    }

    #[test]
    fn test_extension_for_content_type() {
        assert_eq!(extension_for_content_type("image/jpeg"), "jpg");
        assert_eq!(extension_for_content_type("image/svg+xml"), "svg");
        assert_eq!(extension_for_content_type("application/octet-stream"), "jpg");
    }

    #[test]
    fn test_media_id_only_when_attached() {
        assert_eq!(MediaOutcome::Attached(5).media_id(), Some(5));
        assert_eq!(MediaOutcome::NotRequested.media_id(), None);
        assert_eq!(MediaOutcome::Failed("x".into()).media_id(), None);
    }
}
