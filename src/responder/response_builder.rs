//! Builds the response envelope CloudFormation expects at `ResponseURL`.

use crate::core::models::{CustomResourceEvent, CustomResourceResponse, ResourceOutcome};
use crate::errors::ResourceError;

/// Reason used when the handler did not supply one.
#[must_use]
pub fn default_reason(log_stream_name: &str) -> String {
    format!("See the details in CloudWatch Log Stream: {log_stream_name}")
}

/// Merges a handler outcome with the event's correlation ids.
///
/// # Examples
///
/// ```
/// use cfn_marketplace_resources::core::models::{CustomResourceEvent, ResourceOutcome, ResponseData};
/// use cfn_marketplace_resources::responder::response_builder::build_response;
///
/// let event = CustomResourceEvent::from_payload(serde_json::json!({
///     "RequestType": "Delete",
///     "ResponseURL": "https://example.com/callback",
///     "StackId": "stack",
///     "RequestId": "req",
///     "LogicalResourceId": "Res",
///     "ResourceProperties": {}
/// }))
/// .unwrap();
///
/// let response = build_response(&event, ResourceOutcome::success("id", ResponseData::new()), "stream");
/// assert_eq!(response.request_id, "req");
/// ```
#[must_use]
pub fn build_response(
    event: &CustomResourceEvent,
    outcome: ResourceOutcome,
    log_stream_name: &str,
) -> CustomResourceResponse {
    CustomResourceResponse {
        status: outcome.status,
        reason: outcome
            .reason
            .unwrap_or_else(|| default_reason(log_stream_name)),
        physical_resource_id: outcome.physical_resource_id,
        stack_id: event.stack_id.clone(),
        request_id: event.request_id.clone(),
        logical_resource_id: event.logical_resource_id.clone(),
        data: outcome.data,
    }
}

/// Serializes the envelope to the exact body that will be sent.
///
/// # Errors
///
/// Returns `CallbackError` if serialization fails.
pub fn serialize_response(response: &CustomResourceResponse) -> Result<String, ResourceError> {
    serde_json::to_string(response)
        .map_err(|e| ResourceError::CallbackError(format!("serialize response: {e}")))
}
