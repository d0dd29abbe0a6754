use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

use crate::errors::ResourceError;
use crate::utils::flags::deserialize_flag;

/// String-valued attributes returned to the template through `Fn::GetAtt`.
pub type ResponseData = BTreeMap<String, String>;

/// Lifecycle stage of a custom resource. Unknown values are kept so they can
/// be reported back in the failure reason.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum RequestType {
    Create,
    Update,
    Delete,
    Unknown(String),
}

impl From<String> for RequestType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Create" => RequestType::Create,
            "Update" => RequestType::Update,
            "Delete" => RequestType::Delete,
            _ => RequestType::Unknown(value),
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestType::Create => f.write_str("Create"),
            RequestType::Update => f.write_str("Update"),
            RequestType::Delete => f.write_str("Delete"),
            RequestType::Unknown(other) => f.write_str(other),
        }
    }
}

/// A CloudFormation custom-resource lifecycle event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomResourceEvent {
    pub request_type: RequestType,
    #[serde(rename = "ResponseURL")]
    pub response_url: Url,
    pub stack_id: String,
    pub request_id: String,
    pub logical_resource_id: String,
    #[serde(default)]
    pub resource_type: Option<String>,
    #[serde(default)]
    pub physical_resource_id: Option<String>,
    #[serde(default)]
    pub resource_properties: Map<String, Value>,
}

impl CustomResourceEvent {
    /// Parses the raw Lambda payload.
    ///
    /// # Errors
    ///
    /// Returns `MalformedEvent` when any field is missing or has the wrong
    /// type. [`Self::envelope_only`] may still recover enough to answer it.
    pub fn from_payload(payload: Value) -> Result<Self, ResourceError> {
        serde_json::from_value(payload).map_err(|e| ResourceError::MalformedEvent(e.to_string()))
    }

    /// Reads only what a response needs from a payload that failed to parse.
    /// Missing ids become empty strings and the properties are dropped.
    ///
    /// Returns `None` without a valid `ResponseURL`, as there is nowhere to
    /// send an answer.
    #[must_use]
    pub fn envelope_only(payload: &Value) -> Option<Self> {
        let response_url = payload
            .get("ResponseURL")
            .and_then(Value::as_str)
            .and_then(|raw| Url::parse(raw).ok())?;
        let text = |name: &str| payload.get(name).and_then(Value::as_str).map(ToString::to_string);

        let request_type = match payload.get("RequestType") {
            Some(Value::String(raw)) => RequestType::from(raw.clone()),
            other => RequestType::Unknown(other.map(Value::to_string).unwrap_or_default()),
        };

        Some(Self {
            request_type,
            response_url,
            stack_id: text("StackId").unwrap_or_default(),
            request_id: text("RequestId").unwrap_or_default(),
            logical_resource_id: text("LogicalResourceId").unwrap_or_default(),
            resource_type: text("ResourceType"),
            physical_resource_id: text("PhysicalResourceId"),
            resource_properties: Map::new(),
        })
    }

    /// Reads `ResourceProperties` into a typed struct. `ServiceToken` is
    /// stripped first since it is injected by CloudFormation, not the template.
    ///
    /// # Errors
    ///
    /// Returns `InvalidProperties` when a required property is missing or has
    /// the wrong type.
    pub fn properties<T: DeserializeOwned>(&self) -> Result<T, ResourceError> {
        let mut props = self.resource_properties.clone();
        props.remove("ServiceToken");
        serde_json::from_value(Value::Object(props))
            .map_err(|e| ResourceError::InvalidProperties(e.to_string()))
    }

    /// Physical id to report when the handler could not derive its own.
    #[must_use]
    pub fn fallback_physical_id(&self) -> String {
        self.physical_resource_id
            .clone()
            .unwrap_or_else(|| self.logical_resource_id.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseStatus {
    Success,
    Failed,
}

/// The JSON envelope PUT to the event's `ResponseURL`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomResourceResponse {
    pub status: ResponseStatus,
    pub reason: String,
    pub physical_resource_id: String,
    pub stack_id: String,
    pub request_id: String,
    pub logical_resource_id: String,
    pub data: ResponseData,
}

/// What a handler decided for one invocation, before it is merged with the
/// event's correlation ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceOutcome {
    pub status: ResponseStatus,
    pub reason: Option<String>,
    pub physical_resource_id: String,
    pub data: ResponseData,
}

impl ResourceOutcome {
    #[must_use]
    pub fn success(physical_resource_id: impl Into<String>, data: ResponseData) -> Self {
        Self {
            status: ResponseStatus::Success,
            reason: None,
            physical_resource_id: physical_resource_id.into(),
            data,
        }
    }

    /// A failure with empty data; the reason defaults to the log stream pointer.
    #[must_use]
    pub fn failed(physical_resource_id: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Failed,
            reason: None,
            physical_resource_id: physical_resource_id.into(),
            data: ResponseData::new(),
        }
    }

    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    #[must_use]
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }
}

/// `ResourceProperties` of the product code lookup resource.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProductCodeProperties {
    pub product_id: String,
}

/// `ResourceProperties` of the fulfillment URL resource.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FulfillmentUrlProperties {
    pub product_id: String,
    pub fulfillment_url: String,
}

/// `ResourceProperties` of the S3 object content resource.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ObjectContentProperties {
    pub bucket_name: String,
    pub key: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub is_base64_encoded: bool,
}
