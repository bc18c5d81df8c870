//! Publishing: durable write of generated text to object storage under a
//! timestamped key.

pub mod mock;
pub mod s3;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

use crate::consts::KEY_PREFIX;

/// Why a publish did not happen. A missing bucket is caught before any
/// network call, so the two variants are distinguishable to the caller.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("no destination bucket configured")]
    MissingBucket,
    #[error("object store write failed: {0}")]
    Remote(String),
}

/// The opaque put-object call.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(&self, bucket: &str, key: &str, bytes: Vec<u8>) -> anyhow::Result<()>;
}

/// Writes each blog to one bucket, one object per generation.
pub struct Publisher {
    store: Arc<dyn ObjectStore>,
    bucket: Option<String>,
}

impl Publisher {
    pub fn new(store: Arc<dyn ObjectStore>, bucket: Option<String>) -> Self {
        Self { store, bucket }
    }

    /// Whether a destination is configured at all.
    pub fn enabled(&self) -> bool {
        matches!(&self.bucket, Some(b) if !b.trim().is_empty())
    }

    /// Write `content` as UTF-8 and return the object key.
    ///
    /// Keys are timestamped to the second, so two publishes within the
    /// same second land on the same key and the later one wins.
    pub async fn publish(&self, content: &str) -> Result<String, PublishError> {
        let bucket = match &self.bucket {
            Some(b) if !b.trim().is_empty() => b,
            _ => return Err(PublishError::MissingBucket),
        };

        let key = timestamped_key(Utc::now());
        self.store
            .put(bucket, &key, content.as_bytes().to_vec())
            .await
            .map_err(|e| {
                error!(bucket = %bucket, key = %key, error = %e, "upload failed");
                PublishError::Remote(e.to_string())
            })?;

        info!(bucket = %bucket, key = %key, "blog uploaded");
        Ok(key)
    }
}

/// `blog-output/<UTC YYYYMMDD-HHMMSS>.txt`
fn timestamped_key(now: DateTime<Utc>) -> String {
    format!("{}/{}.txt", KEY_PREFIX, now.format("%Y%m%d-%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::mock::{FailStore, MemoryStore};
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn key_format() {
        let at = Utc.with_ymd_and_hms(2026, 8, 27, 9, 30, 5).unwrap();
        assert_eq!(timestamped_key(at), "blog-output/20260827-093005.txt");
    }

    #[tokio::test]
    async fn publish_writes_one_object() {
        let store = Arc::new(MemoryStore::new());
        let publisher = Publisher::new(store.clone(), Some("my-bucket".to_string()));

        let key = publisher.publish("hello world").await.unwrap();

        let objects = store.objects();
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].bucket, "my-bucket");
        assert_eq!(objects[0].key, key);
        assert_eq!(objects[0].bytes, b"hello world");
        assert!(key.starts_with("blog-output/"));
        assert!(key.ends_with(".txt"));
    }

    #[tokio::test]
    async fn missing_bucket_fails_without_store_call() {
        let store = Arc::new(MemoryStore::new());
        let publisher = Publisher::new(store.clone(), None);

        let err = publisher.publish("hello").await.unwrap_err();
        assert!(matches!(err, PublishError::MissingBucket));
        assert!(store.objects().is_empty());
    }

    #[tokio::test]
    async fn blank_bucket_fails_without_store_call() {
        let store = Arc::new(MemoryStore::new());
        let publisher = Publisher::new(store.clone(), Some("   ".to_string()));

        let err = publisher.publish("hello").await.unwrap_err();
        assert!(matches!(err, PublishError::MissingBucket));
        assert!(store.objects().is_empty());
    }

    #[tokio::test]
    async fn store_failure_maps_to_remote_error() {
        let store = Arc::new(FailStore::new("access denied"));
        let publisher = Publisher::new(store, Some("my-bucket".to_string()));

        let err = publisher.publish("hello").await.unwrap_err();
        match err {
            PublishError::Remote(message) => assert!(message.contains("access denied")),
            other => panic!("expected Remote, got {:?}", other),
        }
    }

    #[test]
    fn enabled_reflects_bucket_presence() {
        let store = Arc::new(MemoryStore::new());
        assert!(!Publisher::new(store.clone(), None).enabled());
        assert!(!Publisher::new(store.clone(), Some("  ".to_string())).enabled());
        assert!(Publisher::new(store, Some("bucket".to_string())).enabled());
    }
}
