//! Object-storage backend abstraction
//!
//! [`ObjectBackend`] is the seam between the store and S3: production wires
//! in [`S3ObjectBackend`], tests inject an in-memory implementation.

mod error;
mod s3;

use std::time::Duration;

use async_trait::async_trait;

pub use error::{BackendError, BackendResult};
pub use s3::S3ObjectBackend;

/// Backend cap on LIST page size and batch-delete size, per call
pub const MAX_KEYS_PER_BATCH: i32 = 1000;

/// One page of keys under a prefix
#[derive(Debug, Clone, Default)]
pub struct ListPage {
    /// Keys in this page, at most the requested cap
    pub keys: Vec<String>,
    /// Continuation token, present when the listing is truncated
    pub next_continuation_token: Option<String>,
}

/// Storage backend operations used by [`MediaStore`](crate::store::MediaStore)
#[async_trait]
pub trait ObjectBackend: Send + Sync {
    /// Generates a presigned PUT URL scoped to exactly `key` and
    /// `content_type`, valid for `expires_in`
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if presigning fails
    async fn presign_put(
        &self,
        key: &str,
        content_type: &str,
        expires_in: Duration,
    ) -> BackendResult<String>;

    /// Lists one page of at most `max_keys` keys under `prefix`
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the LIST call fails
    async fn list_page(
        &self,
        prefix: &str,
        max_keys: i32,
        continuation_token: Option<String>,
    ) -> BackendResult<ListPage>;

    /// Deletes `keys` in a single batched call
    ///
    /// Callers never pass more keys than one LIST page returned; the batch
    /// cap and the LIST cap are the same [`MAX_KEYS_PER_BATCH`].
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the DELETE call fails or reports failed keys
    async fn delete_batch(&self, keys: &[String]) -> BackendResult<()>;

    /// Direct public URL for `key`, used when no CDN domain fronts the bucket
    fn object_url(&self, key: &str) -> String;
}
