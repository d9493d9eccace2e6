#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use pushit_core::config::{Credentials, PostStatus, PublishConfig};
use pushit_core::{
    CreatedPost, MediaUpload, PostPayload, PublishApi, PublishError, RemotePost, RemoteUser,
};

/// Every remote interaction the fake saw, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    FetchImage(String),
    UploadMedia(String),
    Lookup(String),
    Create(String),
    CurrentUser,
}

/// In-memory remote site. Created slugs become visible to later lookups.
#[derive(Debug, Default)]
pub struct FakeApi {
    pub calls: Mutex<Vec<Call>>,
    pub existing: Mutex<HashSet<String>>,
    pub created: Mutex<Vec<PostPayload>>,
    pub uploads: Mutex<Vec<MediaUpload>>,
    pub images: HashMap<String, Vec<u8>>,
    pub lookup_fails_for: HashSet<String>,
    pub create_fails_for: HashSet<String>,
    pub fail_uploads: bool,
    next_id: Mutex<u64>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_existing(self, slug: &str) -> Self {
        self.existing.lock().unwrap().insert(slug.to_string());
        self
    }

    pub fn with_image(mut self, url: &str, bytes: &[u8]) -> Self {
        self.images.insert(url.to_string(), bytes.to_vec());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn created(&self) -> Vec<PostPayload> {
        self.created.lock().unwrap().clone()
    }

    pub fn create_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::Create(_)))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_id(&self) -> u64 {
        let mut id = self.next_id.lock().unwrap();
        *id += 1;
        *id
    }
}

impl PublishApi for FakeApi {
    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, PublishError> {
        self.record(Call::FetchImage(url.to_string()));
        self.images.get(url).cloned().ok_or(PublishError::Status {
            status: 404,
            body: "not found".to_string(),
        })
    }

    async fn upload_media(&self, upload: MediaUpload) -> Result<u64, PublishError> {
        self.record(Call::UploadMedia(upload.filename.clone()));
        if self.fail_uploads {
            return Err(PublishError::Status {
                status: 413,
                body: "too large".to_string(),
            });
        }
        self.uploads.lock().unwrap().push(upload);
        Ok(1000 + self.next_id())
    }

    async fn posts_with_slug(&self, slug: &str) -> Result<Vec<RemotePost>, PublishError> {
        self.record(Call::Lookup(slug.to_string()));
        if self.lookup_fails_for.contains(slug) {
            return Err(PublishError::message("connection reset"));
        }
        if self.existing.lock().unwrap().contains(slug) {
            Ok(vec![RemotePost { id: Some(1) }])
        } else {
            Ok(Vec::new())
        }
    }

    async fn create_post(&self, payload: &PostPayload) -> Result<CreatedPost, PublishError> {
        self.record(Call::Create(payload.slug.clone()));
        if self.create_fails_for.contains(&payload.slug) {
            return Err(PublishError::Status {
                status: 500,
                body: "internal error".to_string(),
            });
        }
        self.existing.lock().unwrap().insert(payload.slug.clone());
        self.created.lock().unwrap().push(payload.clone());
        let id = self.next_id();
        Ok(CreatedPost {
            id: Some(id),
            link: Some(format!("https://blog.example.com/?p={id}")),
        })
    }

    async fn current_user(&self) -> Result<RemoteUser, PublishError> {
        self.record(Call::CurrentUser);
        Ok(RemoteUser {
            id: 1,
            name: "Editor".to_string(),
        })
    }
}

/// A content directory laid out like a real profile: `pre-post/`, `posted/`, `posts.json`.
pub struct Site {
    pub root: tempfile::TempDir,
}

impl Site {
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("tempdir");
        fs::create_dir_all(root.path().join("pre-post")).expect("queue dir");
        Self { root }
    }

    pub fn queue(&self) -> PathBuf {
        self.root.path().join("pre-post")
    }

    pub fn archive(&self) -> PathBuf {
        self.root.path().join("posted")
    }

    pub fn run_log(&self) -> PathBuf {
        self.root.path().join("push.log")
    }

    pub fn queue_file(&self, slug: &str, body: &str) {
        fs::write(self.queue().join(format!("{slug}.html")), body).expect("write queue file");
    }

    pub fn manifest(&self, json: &str) {
        fs::write(self.root.path().join("posts.json"), json).expect("write manifest");
    }

    pub fn queued(&self) -> Vec<String> {
        names_in(&self.queue())
    }

    pub fn archived(&self) -> Vec<String> {
        names_in(&self.archive())
    }

    pub fn config(&self, status: PostStatus) -> PublishConfig {
        let root = self.root.path();
        PublishConfig {
            profile_name: "acme".to_string(),
            site_url: "https://blog.example.com".to_string(),
            credentials: Credentials {
                username: "editor".to_string(),
                password: "app pass".to_string(),
            },
            category_ids: vec![4],
            status,
            default_media: None,
            schedule: None,
            queue_dir: root.join("pre-post"),
            archive_dir: root.join("posted"),
            manifest_path: root.join("posts.json"),
            run_log_path: root.join("push.log"),
            content_extension: "html".to_string(),
            require_seo_fields: false,
            request_timeout: Duration::from_secs(5),
        }
    }
}

fn names_in(dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| !name.starts_with('.'))
        .collect();
    names.sort();
    names
}
