use aws_sdk_s3::error::{BuildError, DisplayErrorContext, SdkError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("Invalid request type: {0}")]
    InvalidRequestType(String),

    #[error("malformed event: {0}")]
    MalformedEvent(String),

    #[error("Invalid resource properties: {0}")]
    InvalidProperties(String),

    #[error("Unexpected catalog entity: {0}")]
    EntityError(String),

    #[error("Failed to decode object body: {0}")]
    DecodeError(String),

    #[error("Failed to interact with AWS services: {0}")]
    AwsError(String),

    #[error("Failed to send HTTP request: {0}")]
    HttpError(String),

    #[error("Failed to deliver CloudFormation response: {0}")]
    CallbackError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<reqwest::Error> for ResourceError {
    fn from(error: reqwest::Error) -> Self {
        ResourceError::HttpError(error.to_string())
    }
}

impl From<base64::DecodeError> for ResourceError {
    fn from(error: base64::DecodeError) -> Self {
        ResourceError::DecodeError(error.to_string())
    }
}

// S3 and Marketplace Catalog re-export the same smithy error types, so these
// impls cover both clients.
impl<E, R> From<SdkError<E, R>> for ResourceError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    fn from(error: SdkError<E, R>) -> Self {
        ResourceError::AwsError(DisplayErrorContext(error).to_string())
    }
}

impl From<BuildError> for ResourceError {
    fn from(error: BuildError) -> Self {
        ResourceError::AwsError(format!("request build failed: {error}"))
    }
}
