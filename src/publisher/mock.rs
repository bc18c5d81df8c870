use anyhow::{Result, bail};
use async_trait::async_trait;
use std::sync::Mutex;

use super::ObjectStore;

/// One recorded write.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub bucket: String,
    pub key: String,
    pub bytes: Vec<u8>,
}

/// In-memory store for tests. Records every put.
#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<Vec<StoredObject>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn objects(&self) -> Vec<StoredObject> {
        self.objects.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn put(&self, bucket: &str, key: &str, bytes: Vec<u8>) -> Result<()> {
        self.objects.lock().unwrap().push(StoredObject {
            bucket: bucket.to_string(),
            key: key.to_string(),
            bytes,
        });
        Ok(())
    }
}

/// A store whose every put fails, for exercising the remote-error path.
pub struct FailStore {
    message: String,
}

impl FailStore {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl ObjectStore for FailStore {
    async fn put(&self, _bucket: &str, _key: &str, _bytes: Vec<u8>) -> Result<()> {
        bail!("{}", self.message)
    }
}
