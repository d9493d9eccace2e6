//! HTTP surface of the remote site.

use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::debug;

use crate::config::{Credentials, PublishConfig};
use crate::error::PublishError;
use crate::payload::PostPayload;

const API_PREFIX: &str = "wp-json/wp/v2";
const MAX_ERROR_BODY_CHARS: usize = 300;
const DUPLICATE_STATUSES: &str = "publish,future,draft,pending,private";

/// Image bytes ready for the media endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaUpload {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// A record returned by the slug query. Only the id is requested.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemotePost {
    #[serde(default)]
    pub id: Option<u64>,
}

/// What the create call reported back. Both fields are optional so an unexpected body never
/// turns a 2xx into a failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CreatedPost {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteUser {
    pub id: u64,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct CreatedMedia {
    id: u64,
}

/// Remote operations the pipeline needs. Implemented over HTTP by [`WordPressClient`].
#[allow(async_fn_in_trait)]
pub trait PublishApi {
    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, PublishError>;
    async fn upload_media(&self, upload: MediaUpload) -> Result<u64, PublishError>;
    async fn posts_with_slug(&self, slug: &str) -> Result<Vec<RemotePost>, PublishError>;
    async fn create_post(&self, payload: &PostPayload) -> Result<CreatedPost, PublishError>;
    async fn current_user(&self) -> Result<RemoteUser, PublishError>;
}

#[derive(Debug, Clone)]
pub struct WordPressClient {
    http: Client,
    base_url: String,
    credentials: Credentials,
}

impl WordPressClient {
    pub fn new(config: &PublishConfig) -> Result<Self, PublishError> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("pushit/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: config.site_url.trim_end_matches('/').to_string(),
            credentials: config.credentials.clone(),
        })
    }

    pub fn endpoint(&self, resource: &str) -> String {
        format!("{}/{API_PREFIX}/{resource}", self.base_url)
    }

    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder.basic_auth(&self.credentials.username, Some(&self.credentials.password))
    }
}

/// Convert a non-2xx response into [`PublishError::Status`] carrying a shortened body.
async fn ensure_success(response: Response) -> Result<Response, PublishError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(PublishError::Status {
        status: status.as_u16(),
        body: truncate_chars(body.trim(), MAX_ERROR_BODY_CHARS),
    })
}

fn truncate_chars(value: &str, max: usize) -> String {
    match value.char_indices().nth(max) {
        Some((cut, _)) => format!("{}…", &value[..cut]),
        None => value.to_string(),
    }
}

pub fn slug_query(slug: &str) -> String {
    format!(
        "slug={}&status={}&_fields=id",
        urlencoding::encode(slug),
        urlencoding::encode(DUPLICATE_STATUSES)
    )
}

impl PublishApi for WordPressClient {
    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, PublishError> {
        let response = ensure_success(self.http.get(url).send().await?).await?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn upload_media(&self, upload: MediaUpload) -> Result<u64, PublishError> {
        let MediaUpload {
            filename,
            content_type,
            bytes,
        } = upload;
        debug!(%filename, content_type, size = bytes.len(), "Uploading media");
        let request = self
            .http
            .post(self.endpoint("media"))
            .header(CONTENT_TYPE, content_type)
            .header(
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            )
            .body(bytes);
        let response = ensure_success(self.authed(request).send().await?).await?;
        let text = response.text().await?;
        let media: CreatedMedia = serde_json::from_str(&text)?;
        Ok(media.id)
    }

    async fn posts_with_slug(&self, slug: &str) -> Result<Vec<RemotePost>, PublishError> {
        let url = format!("{}?{}", self.endpoint("posts"), slug_query(slug));
        let response = ensure_success(self.authed(self.http.get(url)).send().await?).await?;
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn create_post(&self, payload: &PostPayload) -> Result<CreatedPost, PublishError> {
        let request = self.http.post(self.endpoint("posts")).json(payload);
        let response = ensure_success(self.authed(request).send().await?).await?;
        let text = response.text().await.unwrap_or_default();
        Ok(serde_json::from_str(&text).unwrap_or_default())
    }

    async fn current_user(&self) -> Result<RemoteUser, PublishError> {
        let request = self.http.get(self.endpoint("users/me"));
        let response = ensure_success(self.authed(request).send().await?).await?;
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}
