//! Amazon S3 client module

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;

use crate::errors::ResourceError;

/// An object to store under `bucket/key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutObject {
    pub bucket: String,
    pub key: String,
    pub body: Vec<u8>,
    pub content_type: Option<String>,
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put_object(&self, object: PutObject) -> Result<(), ResourceError>;

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), ResourceError>;
}

/// `ObjectStore` backed by the AWS SDK.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(&self, object: PutObject) -> Result<(), ResourceError> {
        self.client
            .put_object()
            .bucket(object.bucket)
            .key(object.key)
            .set_content_type(object.content_type)
            .body(ByteStream::from(object.body))
            .send()
            .await?;
        Ok(())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), ResourceError> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await?;
        Ok(())
    }
}
