//! Environment configuration for different deployment stages

use std::env;
use std::time::Duration;

use aws_config::{retry::RetryConfig, timeout::TimeoutConfig, BehaviorVersion};

use crate::store::{StoreError, StoreResult, DEFAULT_GRANT_EXPIRY_SECS};

/// Application environment configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    /// Production environment
    Production,
    /// Staging environment
    Staging,
    /// Development environment (uses `LocalStack`)
    Development {
        /// Optional override for upload grant expiry in seconds
        grant_expiry_override: Option<u64>,
    },
}

impl Environment {
    /// Creates an Environment from the `APP_ENV` environment variable
    ///
    /// # Panics
    ///
    /// Panics if `APP_ENV` contains an invalid value
    #[must_use]
    pub fn from_env() -> Self {
        let env = env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .trim()
            .to_lowercase();

        match env.as_str() {
            "production" => Self::Production,
            "staging" => Self::Staging,
            "development" => {
                let grant_expiry_override = env::var("GRANT_EXPIRY_SECS")
                    .ok()
                    .and_then(|val| val.parse::<u64>().ok());

                Self::Development {
                    grant_expiry_override,
                }
            }
            _ => panic!("Invalid environment: {env}"),
        }
    }

    /// Returns the media bucket name for the environment
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Config` if `MEDIA_BUCKET_NAME` is not set in
    /// production or staging; development falls back to the local bucket
    pub fn media_bucket(&self) -> StoreResult<String> {
        match self {
            Self::Production | Self::Staging => env::var("MEDIA_BUCKET_NAME").map_err(|_| {
                StoreError::Config("MEDIA_BUCKET_NAME environment variable is not set".to_string())
            }),
            Self::Development { .. } => {
                Ok(env::var("MEDIA_BUCKET_NAME").unwrap_or_else(|_| "listing-media".to_string()))
            }
        }
    }

    /// Returns the CDN domain fronting the bucket, if configured
    ///
    /// Absence is non-fatal: public URLs degrade to direct bucket URLs.
    #[must_use]
    pub fn cdn_domain(&self) -> Option<String> {
        env::var("CDN_DOMAIN").ok().filter(|domain| !domain.is_empty())
    }

    /// Upload grant expiry time in seconds
    #[must_use]
    pub fn grant_expiry_secs(&self) -> u64 {
        match self {
            Self::Production | Self::Staging => DEFAULT_GRANT_EXPIRY_SECS,
            Self::Development {
                grant_expiry_override,
            } => grant_expiry_override.unwrap_or(DEFAULT_GRANT_EXPIRY_SECS),
        }
    }

    /// Returns the endpoint URL to use for AWS services
    #[must_use]
    pub const fn override_aws_endpoint_url(&self) -> Option<&str> {
        match self {
            // Regular AWS endpoints for production and staging
            Self::Production | Self::Staging => None,
            // LocalStack endpoint for development
            Self::Development { .. } => Some("http://localhost:4566"),
        }
    }

    /// AWS configuration with retry and timeout settings
    pub async fn aws_config(&self) -> aws_config::SdkConfig {
        let retry_config = RetryConfig::standard()
            .with_max_attempts(3)
            .with_initial_backoff(Duration::from_millis(50));

        let timeout_config = TimeoutConfig::builder()
            .operation_timeout(Duration::from_secs(30))
            .build();

        let mut config_builder = aws_config::load_defaults(BehaviorVersion::latest())
            .await
            .to_builder()
            .retry_config(retry_config)
            .timeout_config(timeout_config);

        if let Some(endpoint_url) = self.override_aws_endpoint_url() {
            config_builder = config_builder.endpoint_url(endpoint_url);
        }

        config_builder.build()
    }

    /// AWS S3 service configuration
    pub async fn s3_client_config(&self) -> aws_sdk_s3::Config {
        let aws_config = self.aws_config().await;
        let s3_config: aws_sdk_s3::Config = (&aws_config).into();
        let mut builder = s3_config.to_builder();

        // Override "force path style" to true for compatibility with LocalStack
        // https://github.com/awslabs/aws-sdk-rust/discussions/874
        if matches!(self, Self::Development { .. }) {
            builder.set_force_path_style(Some(true));
        }

        builder.build()
    }
}
