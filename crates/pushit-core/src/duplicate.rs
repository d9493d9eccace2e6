use tracing::warn;

use crate::remote::PublishApi;

/// Answer to "does the remote already have this slug?".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DuplicateStatus {
    Exists,
    Absent,
    /// The remote could not answer; carries the reason.
    Unknown(String),
}

impl DuplicateStatus {
    /// Only a definite `Absent` lets an item through.
    pub fn should_skip(&self) -> bool {
        !matches!(self, DuplicateStatus::Absent)
    }
}

pub async fn check_duplicate<A: PublishApi>(api: &A, slug: &str) -> DuplicateStatus {
    match api.posts_with_slug(slug).await {
        Ok(posts) if posts.is_empty() => DuplicateStatus::Absent,
        Ok(_) => DuplicateStatus::Exists,
        Err(err) => {
            warn!(slug, stage = "duplicate", error = %err, "Duplicate check inconclusive");
            DuplicateStatus::Unknown(err.to_string())
        }
    }
}
