//! Custom-resource handlers, one per Lambda function
//!
//! Each handler resolves an event into a `ResourceOutcome` and hands it to
//! the `Responder`. Resolution never fails: every error becomes a FAILED
//! outcome, so exactly one response is sent per event that names a
//! `ResponseURL`, parsed or not.

pub mod fulfillment_url;
pub mod product_code;
pub mod s3_content;

use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::core::models::{CustomResourceEvent, RequestType, ResourceOutcome};
use crate::errors::ResourceError;

/// An invocation ready to be answered.
#[derive(Debug)]
pub enum Invocation {
    /// A well-formed event for the handler to resolve.
    Event(CustomResourceEvent),
    /// An event that failed to parse but still names a `ResponseURL`. It is
    /// answered with `outcome` without reaching the handler.
    Malformed {
        event: CustomResourceEvent,
        outcome: ResourceOutcome,
    },
}

/// Splits a Lambda invocation into the custom-resource event and the log
/// stream name used in default failure reasons.
///
/// # Errors
///
/// Returns an error only if the payload has no valid `ResponseURL`. No
/// response can be sent in that case.
pub fn parse_invocation(event: LambdaEvent<Value>) -> Result<(Invocation, String), Error> {
    let (payload, context) = event.into_parts();
    let log_stream = context.env_config.log_stream.clone();

    #[cfg(feature = "debug-logs")]
    info!("Request received: {}", payload);

    let cfn_event = match CustomResourceEvent::from_payload(payload.clone()) {
        Ok(cfn_event) => cfn_event,
        Err(e) => {
            let Some(envelope) = CustomResourceEvent::envelope_only(&payload) else {
                error!("Unanswerable event: {}", e);
                return Err(Error::from(e));
            };
            error!("{}", e);
            let physical_id = Some(envelope.fallback_physical_id())
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| log_stream.clone());
            let outcome = ResourceOutcome::failed(physical_id).with_reason(e.to_string());
            return Ok((
                Invocation::Malformed {
                    event: envelope,
                    outcome,
                },
                log_stream,
            ));
        }
    };

    info!(
        request_type = %cfn_event.request_type,
        stack_id = %cfn_event.stack_id,
        request_id = %cfn_event.request_id,
        logical_resource_id = %cfn_event.logical_resource_id,
        resource_type = cfn_event.resource_type.as_deref().unwrap_or(""),
        "Request received"
    );

    Ok((Invocation::Event(cfn_event), log_stream))
}

/// Outcome for a `RequestType` outside Create/Update/Delete.
pub(crate) fn invalid_request_type(
    physical_resource_id: String,
    request_type: &RequestType,
) -> ResourceOutcome {
    let err = ResourceError::InvalidRequestType(request_type.to_string());
    warn!("{}", err);
    ResourceOutcome::failed(physical_resource_id).with_reason(err.to_string())
}

/// Physical id for catalog-backed resources: the product id, which stays the
/// same across updates that do not move the resource to another product.
pub(crate) fn product_physical_id(event: &CustomResourceEvent) -> String {
    event
        .resource_properties
        .get("ProductId")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .map_or_else(|| event.fallback_physical_id(), ToString::to_string)
}
