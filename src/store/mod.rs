//! Marketplace media store over an object-storage backend
//!
//! [`MediaStore`] owns key construction and validation; the actual object
//! state lives entirely in the backend. Every method is request-scoped and
//! holds no mutable state between calls.

mod error;

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use mime::Mime;
use rand::{distributions::Alphanumeric, Rng};
use serde::Serialize;
use strum::IntoEnumIterator;
use tracing::{debug, info};

use crate::backend::{ObjectBackend, S3ObjectBackend, MAX_KEYS_PER_BATCH};
use crate::environment::Environment;
use crate::namespace::Namespace;

pub use error::{StoreError, StoreResult};

/// Default validity window for upload grants (15 minutes)
pub const DEFAULT_GRANT_EXPIRY_SECS: u64 = 15 * 60;

const KEY_SUFFIX_LEN: usize = 6;

/// Time-boxed authorization to PUT one object at one key
///
/// Stateless from the store's perspective: nothing exists in the backend
/// until the client actually PUTs to `url`, and the backend rejects the PUT
/// past `expires_at`.
#[derive(Debug, Clone, Serialize)]
pub struct UploadGrant {
    /// Presigned URL the uploading client PUTs the raw bytes to, with the
    /// same `Content-Type` the grant was issued for
    pub url: String,
    /// Generated object key, to be persisted by the caller for later
    /// reference and deletion
    pub key: String,
    /// UTC timestamp past which the backend rejects the PUT
    pub expires_at: DateTime<Utc>,
}

/// Media store for listing objects
pub struct MediaStore {
    backend: Arc<dyn ObjectBackend>,
    cdn_domain: Option<String>,
    grant_expiry_secs: u64,
}

impl MediaStore {
    /// Creates a store over a backend
    ///
    /// # Arguments
    ///
    /// * `backend` - Object-storage backend, shared process-wide
    /// * `cdn_domain` - Public CDN hostname fronting the bucket; `None` falls
    ///   back to direct backend URLs
    /// * `grant_expiry_secs` - Default validity window for upload grants
    #[must_use]
    pub const fn new(
        backend: Arc<dyn ObjectBackend>,
        cdn_domain: Option<String>,
        grant_expiry_secs: u64,
    ) -> Self {
        Self {
            backend,
            cdn_domain,
            grant_expiry_secs,
        }
    }

    /// Builds a store wired to S3 from environment configuration
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Config` if the media bucket is not configured
    pub async fn from_environment(environment: &Environment) -> StoreResult<Self> {
        let backend = S3ObjectBackend::from_environment(environment).await?;

        Ok(Self::new(
            Arc::new(backend),
            environment.cdn_domain(),
            environment.grant_expiry_secs(),
        ))
    }

    /// Issues a presigned upload grant for one new object
    ///
    /// Validates the item id, extension, and content type against the
    /// namespace's lifecycle rule before touching the backend, then generates
    /// a fresh unique key and presigns a PUT for it. Issuance alone creates
    /// nothing in the backend.
    ///
    /// Intended file size is validated separately by the caller via
    /// [`Namespace::validate_file_size`]; the actual byte count is unknown
    /// until the client reads the file, and the bucket policy backstops it.
    ///
    /// # Arguments
    ///
    /// * `namespace` - Target namespace
    /// * `item_id` - Owning item, becomes the grouping segment of the key
    /// * `extension` - Key extension, must be allowed for the namespace
    /// * `content_type` - MIME type the client will PUT with
    /// * `expiry_secs` - Override for the grant validity window
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Validation` if any input violates the namespace
    /// rule, `StoreError::Backend` if presigning fails
    pub async fn issue_upload_grant(
        &self,
        namespace: Namespace,
        item_id: &str,
        extension: &str,
        content_type: &str,
        expiry_secs: Option<u64>,
    ) -> StoreResult<UploadGrant> {
        validate_item_id(item_id)?;

        if !namespace.allows_extension(extension) {
            return Err(StoreError::Validation(format!(
                "extension `{extension}` is not allowed for namespace `{namespace}`"
            )));
        }

        let mime: Mime = content_type.parse().map_err(|_| {
            StoreError::Validation(format!("`{content_type}` is not a valid MIME type"))
        })?;
        let content_type = mime.essence_str();

        if !namespace.allows_content_type(content_type) {
            return Err(StoreError::Validation(format!(
                "content type `{content_type}` is not allowed for namespace `{namespace}`"
            )));
        }

        let key = generate_key(namespace, item_id, extension);
        let expiry_secs = expiry_secs.unwrap_or(self.grant_expiry_secs);

        let url = self
            .backend
            .presign_put(&key, content_type, Duration::from_secs(expiry_secs))
            .await?;

        let expires_at: DateTime<Utc> = Utc::now() + Duration::from_secs(expiry_secs);

        info!("Issued upload grant for key: {key}");

        Ok(UploadGrant {
            url,
            key,
            expires_at,
        })
    }

    /// Resolves the public URL for a stored object key
    ///
    /// Pure and deterministic: the CDN domain prepended to the key, or the
    /// direct backend URL when no CDN domain is configured. Never calls the
    /// backend over the network.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Validation` only for an empty key
    pub fn resolve_public_url(&self, key: &str) -> StoreResult<String> {
        if key.is_empty() {
            return Err(StoreError::Validation(
                "object key must not be empty".to_string(),
            ));
        }

        Ok(match &self.cdn_domain {
            Some(domain) => format!("https://{domain}/{key}"),
            None => self.backend.object_url(key),
        })
    }

    /// Resolves the public URL of an item's conventional staged root
    ///
    /// Display convenience for before individual staged objects are resolved.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Validation` for an invalid item id
    pub fn resolve_staged_root_url(&self, item_id: &str) -> StoreResult<String> {
        validate_item_id(item_id)?;
        self.resolve_public_url(&format!("{}/{item_id}", Namespace::Staged))
    }

    /// Deletes every stored object belonging to an item, across all
    /// namespaces
    ///
    /// Sweeps namespaces sequentially in declaration order; within each, an
    /// iterative LIST/DELETE loop carries the continuation token so items
    /// with more than one page of objects are fully drained. Idempotent: an
    /// item with no objects anywhere is a no-op.
    ///
    /// Not transactional across namespaces. A backend failure aborts the
    /// call and leaves already-swept namespaces swept; re-invoking resumes
    /// safely.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Validation` for an invalid item id,
    /// `StoreError::Backend` if a LIST or DELETE call fails
    pub async fn delete_all_for_item(&self, item_id: &str) -> StoreResult<()> {
        validate_item_id(item_id)?;

        info!("Deleting all stored objects for item: {item_id}");

        let mut total_deleted: usize = 0;

        for namespace in Namespace::iter() {
            let prefix = format!("{namespace}/{item_id}/");
            let mut continuation_token: Option<String> = None;

            loop {
                let page = self
                    .backend
                    .list_page(&prefix, MAX_KEYS_PER_BATCH, continuation_token.take())
                    .await?;

                if page.keys.is_empty() {
                    break;
                }

                self.backend.delete_batch(&page.keys).await?;
                total_deleted += page.keys.len();

                debug!("Deleted {} objects under prefix: {prefix}", page.keys.len());

                match page.next_continuation_token {
                    Some(token) => continuation_token = Some(token),
                    None => break,
                }
            }
        }

        info!("Deleted {total_deleted} objects for item: {item_id}");

        Ok(())
    }
}

/// Generates a fresh object key: `{namespace}/{item_id}/{unix_ms}-{rand6}.{ext}`
///
/// The millisecond timestamp plus random suffix keeps keys unique even for
/// rapid concurrent uploads of the same item.
fn generate_key(namespace: Namespace, item_id: &str, extension: &str) -> String {
    let timestamp_ms = Utc::now().timestamp_millis();
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(KEY_SUFFIX_LEN)
        .map(char::from)
        .collect::<String>()
        .to_lowercase();
    let extension = extension.to_lowercase();

    format!("{namespace}/{item_id}/{timestamp_ms}-{suffix}.{extension}")
}

fn validate_item_id(item_id: &str) -> StoreResult<()> {
    if item_id.is_empty() {
        return Err(StoreError::Validation(
            "item id must not be empty".to_string(),
        ));
    }

    // A slash inside an item id would leak the item into another prefix and
    // break per-item deletion isolation.
    if item_id.contains('/') {
        return Err(StoreError::Validation(format!(
            "item id `{item_id}` must not contain `/`"
        )));
    }

    Ok(())
}
