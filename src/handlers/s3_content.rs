//! S3 object content resource.
//!
//! Create/Update write `Body` to `s3://BucketName/Key`, Delete removes it.
//! The physical id is always the key, so renaming the key replaces the
//! resource.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, PAD};
use base64::engine::{DecodePaddingMode, Engine};
use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use tracing::{error, info};

use super::{Invocation, invalid_request_type, parse_invocation};
use crate::clients::{ObjectStore, PutObject};
use crate::core::models::{
    CustomResourceEvent, ObjectContentProperties, RequestType, ResourceOutcome, ResponseData,
};
use crate::errors::ResourceError;
use crate::responder::{CallbackTransport, Responder};

/// Accepts padded and unpadded input alike.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    PAD.with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Returns the bytes to store, base64-decoding when the flag is set.
///
/// ASCII whitespace inside base64 input is ignored, padding is optional and
/// the URL-safe characters `-` and `_` are read as `+` and `/`.
///
/// # Errors
///
/// Returns `DecodeError` when the body is flagged as base64 but is not valid
/// base64.
pub fn decode_body(props: &ObjectContentProperties) -> Result<Vec<u8>, ResourceError> {
    if !props.is_base64_encoded {
        return Ok(props.body.clone().into_bytes());
    }

    let compact: String = props
        .body
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    Ok(LENIENT_BASE64.decode(compact)?)
}

async fn save<S: ObjectStore + ?Sized>(
    store: &S,
    props: &ObjectContentProperties,
) -> Result<ResponseData, ResourceError> {
    let body = decode_body(props)?;
    info!(
        "Saving s3://{}/{} ({} bytes)",
        props.bucket_name,
        props.key,
        body.len()
    );
    #[cfg(feature = "debug-logs")]
    tracing::debug!("Object body: {}", String::from_utf8_lossy(&body));

    store
        .put_object(PutObject {
            bucket: props.bucket_name.clone(),
            key: props.key.clone(),
            body,
            content_type: props.content_type.clone(),
        })
        .await?;
    info!("Saved");

    let mut data = ResponseData::new();
    data.insert("BucketName".to_string(), props.bucket_name.clone());
    data.insert("Key".to_string(), props.key.clone());
    if let Some(content_type) = &props.content_type {
        data.insert("ContentType".to_string(), content_type.clone());
    }
    Ok(data)
}

/// Decides the outcome for one event.
pub async fn resolve<S: ObjectStore + ?Sized>(
    store: &S,
    event: &CustomResourceEvent,
) -> ResourceOutcome {
    let props = event.properties::<ObjectContentProperties>();
    let physical_id = props
        .as_ref()
        .map_or_else(|_| event.fallback_physical_id(), |p| p.key.clone());

    match (&event.request_type, props) {
        (other @ RequestType::Unknown(_), _) => invalid_request_type(physical_id, other),
        (_, Err(e)) => {
            error!("Error: {}", e);
            ResourceOutcome::failed(physical_id)
        }
        (RequestType::Delete, Ok(props)) => {
            info!("Deleting s3://{}/{}", props.bucket_name, props.key);
            match store.delete_object(&props.bucket_name, &props.key).await {
                Ok(()) => {
                    info!("Deleted");
                    ResourceOutcome::success(physical_id, ResponseData::new())
                }
                Err(e) => {
                    error!("Failed to delete object: {}", e);
                    ResourceOutcome::failed(physical_id)
                }
            }
        }
        (RequestType::Create | RequestType::Update, Ok(props)) => {
            match save(store, &props).await {
                Ok(data) => ResourceOutcome::success(physical_id, data),
                Err(e) => {
                    error!("Could not save to S3: {}", e);
                    ResourceOutcome::failed(physical_id)
                }
            }
        }
    }
}

/// # Errors
///
/// Returns an error only when the response could not be delivered.
pub async fn handle<S, T>(
    store: &S,
    responder: &Responder<'_, T>,
    event: &CustomResourceEvent,
) -> Result<(), ResourceError>
where
    S: ObjectStore + ?Sized,
    T: CallbackTransport + ?Sized,
{
    let outcome = resolve(store, event).await;
    responder.send(event, outcome).await
}

/// Lambda entry point for the S3 content function.
#[tracing::instrument(level = "info", skip_all)]
pub async fn function_handler<S, T>(
    event: LambdaEvent<Value>,
    store: &S,
    transport: &T,
) -> Result<(), Error>
where
    S: ObjectStore + ?Sized,
    T: CallbackTransport + ?Sized,
{
    let (invocation, log_stream) = parse_invocation(event)?;
    let responder = Responder::new(transport, log_stream);

    let delivered = match invocation {
        Invocation::Event(cfn_event) => handle(store, &responder, &cfn_event).await,
        Invocation::Malformed { event, outcome } => responder.send(&event, outcome).await,
    };
    delivered.map_err(|e| {
        error!("Failed to deliver response: {}", e);
        Error::from(e)
    })
}
