//! Error types for backend operations

use aws_sdk_s3::{
    error::SdkError,
    operation::{
        delete_objects::DeleteObjectsError, list_objects_v2::ListObjectsV2Error,
        put_object::PutObjectError,
    },
};
use thiserror::Error;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Errors that can occur talking to the storage backend
#[derive(Error, Debug)]
pub enum BackendError {
    /// S3 service error
    #[error("S3 service error: {0}")]
    S3Error(String),

    /// AWS SDK error (connectivity, serialization, credentials)
    #[error("AWS SDK error: {0}")]
    AwsError(String),

    /// Backend client configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Upstream service error (5xx from S3)
    #[error("Upstream service error: {0}")]
    UpstreamError(String),
}

fn classify<E>(error: &SdkError<E>) -> Option<BackendError>
where
    E: std::fmt::Debug,
{
    match error {
        SdkError::ServiceError(service_err) if service_err.raw().status().as_u16() >= 500 => {
            Some(BackendError::UpstreamError(format!("{service_err:?}")))
        }
        SdkError::ServiceError(service_err) => {
            Some(BackendError::S3Error(format!("{:?}", service_err.err())))
        }
        _ => None,
    }
}

impl From<SdkError<ListObjectsV2Error>> for BackendError {
    fn from(error: SdkError<ListObjectsV2Error>) -> Self {
        classify(&error).unwrap_or_else(|| Self::AwsError(error.to_string()))
    }
}

impl From<SdkError<DeleteObjectsError>> for BackendError {
    fn from(error: SdkError<DeleteObjectsError>) -> Self {
        classify(&error).unwrap_or_else(|| Self::AwsError(error.to_string()))
    }
}

impl From<SdkError<PutObjectError>> for BackendError {
    fn from(error: SdkError<PutObjectError>) -> Self {
        classify(&error).unwrap_or_else(|| Self::AwsError(error.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_s3::{error::ErrorMetadata, operation::put_object::PutObjectError};
    use aws_smithy_runtime_api::{client::orchestrator::HttpResponse, http::StatusCode};
    use aws_smithy_types::body::SdkBody;

    fn service_error(status: u16) -> SdkError<PutObjectError> {
        let err = PutObjectError::generic(
            ErrorMetadata::builder()
                .code("InternalError")
                .message("injected service error")
                .build(),
        );
        let raw = HttpResponse::new(
            StatusCode::try_from(status).expect("valid status code"),
            SdkBody::empty(),
        );
        SdkError::service_error(err, raw)
    }

    #[test]
    fn test_5xx_service_error_maps_to_upstream_error() {
        let err = BackendError::from(service_error(503));
        assert!(matches!(err, BackendError::UpstreamError(_)));
    }

    #[test]
    fn test_4xx_service_error_maps_to_s3_error() {
        let err = BackendError::from(service_error(403));
        assert!(matches!(err, BackendError::S3Error(_)));
    }

    #[test]
    fn test_non_service_failure_maps_to_aws_error() {
        let err: SdkError<PutObjectError> = SdkError::timeout_error("operation timed out");
        assert!(matches!(
            BackendError::from(err),
            BackendError::AwsError(_)
        ));
    }
}
