//! S3 implementation of the object backend

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::{
    presigning::PresigningConfig,
    types::{Delete, ObjectIdentifier},
    Client as S3Client,
};
use tracing::{debug, info};

use super::{BackendError, BackendResult, ListPage, ObjectBackend};
use crate::environment::Environment;
use crate::store::StoreResult;

/// S3-backed [`ObjectBackend`]
///
/// Holds a shared SDK client; the client is safe for concurrent use, so one
/// instance serves the whole process. Retry policy lives in the SDK config
/// (see [`Environment::aws_config`]), not here.
pub struct S3ObjectBackend {
    s3_client: Arc<S3Client>,
    bucket_name: String,
    region: Option<String>,
}

impl S3ObjectBackend {
    /// Creates a backend over a pre-configured S3 client
    #[must_use]
    pub fn new(s3_client: Arc<S3Client>, bucket_name: String) -> Self {
        let region = s3_client.config().region().map(ToString::to_string);
        Self {
            s3_client,
            bucket_name,
            region,
        }
    }

    /// Builds a backend from environment configuration
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Config` if the media bucket is not configured
    pub async fn from_environment(environment: &Environment) -> StoreResult<Self> {
        let bucket_name = environment.media_bucket()?;
        let config = environment.s3_client_config().await;
        let s3_client = Arc::new(S3Client::from_conf(config));

        info!("Initialized S3 media backend for bucket: {bucket_name}");

        Ok(Self::new(s3_client, bucket_name))
    }
}

#[async_trait]
impl ObjectBackend for S3ObjectBackend {
    async fn presign_put(
        &self,
        key: &str,
        content_type: &str,
        expires_in: Duration,
    ) -> BackendResult<String> {
        debug!("Generating presigned PUT URL for key: {key}");

        let presigned_config = PresigningConfig::expires_in(expires_in).map_err(|e| {
            BackendError::ConfigError(format!("Failed to create presigning config: {e}"))
        })?;

        let presigned = self
            .s3_client
            .put_object()
            .bucket(&self.bucket_name)
            .key(key)
            .content_type(content_type)
            .presigned(presigned_config)
            .await?;

        Ok(presigned.uri().to_string())
    }

    async fn list_page(
        &self,
        prefix: &str,
        max_keys: i32,
        continuation_token: Option<String>,
    ) -> BackendResult<ListPage> {
        let mut request = self
            .s3_client
            .list_objects_v2()
            .bucket(&self.bucket_name)
            .prefix(prefix)
            .max_keys(max_keys);

        if let Some(token) = continuation_token {
            request = request.continuation_token(token);
        }

        let response = request.send().await?;

        let keys = response
            .contents()
            .iter()
            .filter_map(|object| object.key().map(String::from))
            .collect();

        Ok(ListPage {
            keys,
            next_continuation_token: response.next_continuation_token().map(String::from),
        })
    }

    async fn delete_batch(&self, keys: &[String]) -> BackendResult<()> {
        if keys.is_empty() {
            return Ok(());
        }

        debug!("Deleting batch of {} objects", keys.len());

        let identifiers = keys
            .iter()
            .map(|key| ObjectIdentifier::builder().key(key).build())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| BackendError::S3Error(format!("Invalid delete target: {e}")))?;

        let delete = Delete::builder()
            .set_objects(Some(identifiers))
            .quiet(true)
            .build()
            .map_err(|e| BackendError::S3Error(format!("Failed to build delete request: {e}")))?;

        let response = self
            .s3_client
            .delete_objects()
            .bucket(&self.bucket_name)
            .delete(delete)
            .send()
            .await?;

        // Quiet mode still reports per-key failures.
        if !response.errors().is_empty() {
            return Err(BackendError::S3Error(format!(
                "Batch delete reported {} failed keys",
                response.errors().len()
            )));
        }

        Ok(())
    }

    fn object_url(&self, key: &str) -> String {
        match &self.region {
            Some(region) => format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket_name, region, key
            ),
            None => format!("https://{}.s3.amazonaws.com/{}", self.bucket_name, key),
        }
    }
}
