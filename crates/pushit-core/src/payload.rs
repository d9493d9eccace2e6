//! The create-record request body.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::PostStatus;
use crate::manifest::ContentMeta;

const DATE_GMT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PayloadError {
    #[error("status 'schedule' requires a publish time")]
    MissingSchedule,
}

/// Status as the remote understands it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireStatus {
    Draft,
    Publish,
    Future,
}

impl From<PostStatus> for WireStatus {
    fn from(status: PostStatus) -> Self {
        match status {
            PostStatus::Draft => WireStatus::Draft,
            PostStatus::Publish => WireStatus::Publish,
            PostStatus::Schedule => WireStatus::Future,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostMeta {
    pub rank_math_description: String,
    pub rank_math_focus_keyword: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostPayload {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub status: WireStatus,
    pub categories: Vec<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_gmt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_media: Option<u64>,
    pub meta: PostMeta,
}

/// A queue file joined with its validated manifest metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentItem {
    pub meta: ContentMeta,
    pub body: String,
}

/// Assemble the body for one item.
///
/// `schedule` is only consulted for [`PostStatus::Schedule`]; other statuses never carry `date_gmt`.
pub fn build_payload(
    item: &ContentItem,
    status: PostStatus,
    schedule: Option<DateTime<Utc>>,
    media_id: Option<u64>,
    categories: &[u64],
) -> Result<PostPayload, PayloadError> {
    let date_gmt = match status {
        PostStatus::Schedule => {
            let at = schedule.ok_or(PayloadError::MissingSchedule)?;
            Some(at.format(DATE_GMT_FORMAT).to_string())
        }
        PostStatus::Draft | PostStatus::Publish => None,
    };

    Ok(PostPayload {
        title: item.meta.title.clone(),
        slug: item.meta.slug.clone(),
        content: item.body.clone(),
        status: status.into(),
        categories: categories.to_vec(),
        date_gmt,
        featured_media: media_id,
        meta: PostMeta {
            rank_math_description: item.meta.seo_description.clone(),
            rank_math_focus_keyword: item.meta.focus_keyword.clone(),
        },
    })
}
