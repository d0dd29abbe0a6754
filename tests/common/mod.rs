//! In-memory fakes for the AWS collaborators and the callback transport.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cfn_marketplace_resources::clients::{CatalogApi, ObjectStore, PutObject};
use cfn_marketplace_resources::core::catalog::{ChangeSetRequest, ChangeSetSummary, EntityDetails};
use cfn_marketplace_resources::core::models::CustomResourceEvent;
use cfn_marketplace_resources::errors::ResourceError;
use cfn_marketplace_resources::responder::CallbackTransport;
use lambda_runtime::{Config, Context, LambdaEvent};
use serde_json::{Value, json};
use url::Url;

pub const RESPONSE_URL: &str =
    "https://cloudformation-custom-resource-response-useast1.s3.amazonaws.com/arn%3Aaws/req?X-Amz-Signature=sig";

pub fn payload(request_type: &str, props: Value) -> Value {
    json!({
        "RequestType": request_type,
        "ServiceToken": "arn:aws:lambda:us-east-1:123456789012:function:handler",
        "ResponseURL": RESPONSE_URL,
        "StackId": "arn:aws:cloudformation:us-east-1:123456789012:stack/listing/guid",
        "RequestId": "req-123",
        "LogicalResourceId": "Listing",
        "ResourceType": "Custom::Listing",
        "ResourceProperties": props
    })
}

pub fn event(request_type: &str, props: Value) -> CustomResourceEvent {
    CustomResourceEvent::from_payload(payload(request_type, props)).unwrap()
}

/// Wraps a raw payload the way the Lambda runtime delivers it.
pub fn invocation(payload: Value, log_stream: &str) -> LambdaEvent<Value> {
    let mut context = Context::default();
    context.env_config = Arc::new(Config {
        log_stream: log_stream.to_string(),
        ..Config::default()
    });
    LambdaEvent::new(payload, context)
}

/// Records every body instead of sending it.
#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<(Url, String)>>,
    fail: bool,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<(Url, String)> {
        self.sent.lock().unwrap().clone()
    }

    /// The single response sent, parsed as JSON.
    pub fn only_response(&self) -> Value {
        let sent = self.sent();
        assert_eq!(sent.len(), 1, "expected exactly one response");
        serde_json::from_str(&sent[0].1).unwrap()
    }
}

#[async_trait]
impl CallbackTransport for RecordingTransport {
    async fn put(&self, url: &Url, body: String) -> Result<(), ResourceError> {
        self.sent.lock().unwrap().push((url.clone(), body));
        if self.fail {
            return Err(ResourceError::CallbackError("connection reset".to_string()));
        }
        Ok(())
    }
}

/// Catalog returning a fixed details document.
#[derive(Default)]
pub struct FakeCatalog {
    details: Option<Value>,
    change_set_fails: bool,
    pub describe_calls: Mutex<Vec<String>>,
    pub change_sets: Mutex<Vec<ChangeSetRequest>>,
}

impl FakeCatalog {
    pub fn with_details(details: Value) -> Self {
        Self {
            details: Some(details),
            ..Self::default()
        }
    }

    /// Every describe call fails with an access error.
    pub fn unreachable() -> Self {
        Self::default()
    }

    pub fn rejecting_change_sets(details: Value) -> Self {
        Self {
            details: Some(details),
            change_set_fails: true,
            ..Self::default()
        }
    }

    pub fn describe_count(&self) -> usize {
        self.describe_calls.lock().unwrap().len()
    }

    pub fn submitted(&self) -> Vec<ChangeSetRequest> {
        self.change_sets.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogApi for FakeCatalog {
    async fn describe_entity(&self, entity_id: &str) -> Result<EntityDetails, ResourceError> {
        self.describe_calls.lock().unwrap().push(entity_id.to_string());
        match &self.details {
            Some(details) => EntityDetails::parse(&details.to_string()),
            None => Err(ResourceError::AwsError(
                "AccessDeniedException: not authorized".to_string(),
            )),
        }
    }

    async fn start_change_set(
        &self,
        request: &ChangeSetRequest,
    ) -> Result<ChangeSetSummary, ResourceError> {
        self.change_sets.lock().unwrap().push(request.clone());
        if self.change_set_fails {
            return Err(ResourceError::AwsError(
                "ResourceInUseException: change set in progress".to_string(),
            ));
        }
        Ok(ChangeSetSummary {
            change_set_id: Some("cs-1".to_string()),
            change_set_arn: Some("arn:aws:aws-marketplace:us-east-1:123:AWSMarketplace/ChangeSet/cs-1".to_string()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub content_type: Option<String>,
}

/// Object store kept in memory, keyed by `(bucket, key)`.
#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<(String, String), StoredObject>>,
    fail: bool,
    pub calls: Mutex<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn insert(&self, bucket: &str, key: &str, body: &[u8]) {
        self.objects.lock().unwrap().insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                body: body.to_vec(),
                content_type: None,
            },
        );
    }

    pub fn get(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn put_object(&self, object: PutObject) -> Result<(), ResourceError> {
        *self.calls.lock().unwrap() += 1;
        if self.fail {
            return Err(ResourceError::AwsError("NoSuchBucket".to_string()));
        }
        self.objects.lock().unwrap().insert(
            (object.bucket, object.key),
            StoredObject {
                body: object.body,
                content_type: object.content_type,
            },
        );
        Ok(())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), ResourceError> {
        *self.calls.lock().unwrap() += 1;
        if self.fail {
            return Err(ResourceError::AwsError("AccessDenied".to_string()));
        }
        self.objects
            .lock()
            .unwrap()
            .remove(&(bucket.to_string(), key.to_string()));
        Ok(())
    }
}
