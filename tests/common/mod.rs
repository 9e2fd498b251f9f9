//! Shared test setup: an in-memory object backend
//!
//! Stands in for S3 behind the `ObjectBackend` seam, with the real 1000-key
//! page cap and continuation-token semantics so pagination is genuinely
//! exercised.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use media_store::backend::{BackendError, BackendResult, ListPage, ObjectBackend};
use media_store::MediaStore;

pub const TEST_CDN_DOMAIN: &str = "cdn.example.com";
pub const TEST_BUCKET: &str = "listing-media-test";

/// In-memory object backend
#[derive(Default)]
pub struct MemoryBackend {
    objects: Mutex<BTreeMap<String, String>>,
    list_poison_prefix: Mutex<Option<String>>,
}

impl MemoryBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Simulates a client consuming a grant: PUTs an object at `key`
    pub fn put_object(&self, key: &str, content_type: &str) {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), content_type.to_string());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }

    pub fn count_with_prefix(&self, prefix: &str) -> usize {
        self.objects
            .lock()
            .unwrap()
            .keys()
            .filter(|key| key.starts_with(prefix))
            .count()
    }

    pub fn total_objects(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    /// Makes every LIST under `prefix` fail, simulating a backend outage
    pub fn poison_list_prefix(&self, prefix: &str) {
        *self.list_poison_prefix.lock().unwrap() = Some(prefix.to_string());
    }
}

#[async_trait]
impl ObjectBackend for MemoryBackend {
    async fn presign_put(
        &self,
        key: &str,
        content_type: &str,
        expires_in: Duration,
    ) -> BackendResult<String> {
        Ok(format!(
            "https://{TEST_BUCKET}.s3.test-region.amazonaws.com/{key}?X-Amz-Expires={}&Content-Type={content_type}",
            expires_in.as_secs()
        ))
    }

    async fn list_page(
        &self,
        prefix: &str,
        max_keys: i32,
        continuation_token: Option<String>,
    ) -> BackendResult<ListPage> {
        if let Some(poisoned) = self.list_poison_prefix.lock().unwrap().as_deref() {
            if prefix.starts_with(poisoned) {
                return Err(BackendError::UpstreamError(
                    "injected LIST failure".to_string(),
                ));
            }
        }

        let objects = self.objects.lock().unwrap();
        // The continuation token is the last key of the previous page, the
        // same position-marker shape S3 tokens have.
        let marker = continuation_token.unwrap_or_default();

        let mut keys: Vec<String> = Vec::new();
        let mut truncated = false;
        for key in objects.keys() {
            if !key.starts_with(prefix) || key.as_str() <= marker.as_str() {
                continue;
            }
            if keys.len() == usize::try_from(max_keys).unwrap() {
                truncated = true;
                break;
            }
            keys.push(key.clone());
        }

        let next_continuation_token = if truncated { keys.last().cloned() } else { None };

        Ok(ListPage {
            keys,
            next_continuation_token,
        })
    }

    async fn delete_batch(&self, keys: &[String]) -> BackendResult<()> {
        if keys.len() > 1000 {
            return Err(BackendError::S3Error(
                "batch delete exceeds 1000 keys".to_string(),
            ));
        }

        let mut objects = self.objects.lock().unwrap();
        for key in keys {
            objects.remove(key);
        }

        Ok(())
    }

    fn object_url(&self, key: &str) -> String {
        format!("https://{TEST_BUCKET}.s3.test-region.amazonaws.com/{key}")
    }
}

/// Store fronted by the test CDN domain
pub fn store_over(backend: &Arc<MemoryBackend>) -> MediaStore {
    MediaStore::new(backend.clone(), Some(TEST_CDN_DOMAIN.to_string()), 900)
}

/// Store with no CDN configured, exercising the direct-URL fallback
pub fn store_without_cdn(backend: &Arc<MemoryBackend>) -> MediaStore {
    MediaStore::new(backend.clone(), None, 900)
}
