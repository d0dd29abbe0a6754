//! Product code lookup resource.
//!
//! Create/Update read the product code of a marketplace product and expose it
//! as the `ProductCode` attribute. Delete has nothing to clean up.

use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use tracing::{error, info};

use super::{Invocation, invalid_request_type, parse_invocation, product_physical_id};
use crate::clients::CatalogApi;
use crate::core::models::{
    CustomResourceEvent, ProductCodeProperties, RequestType, ResourceOutcome, ResponseData,
};
use crate::errors::ResourceError;
use crate::responder::{CallbackTransport, Responder};

/// Reason and `error` attribute reported to CloudFormation on lookup failure.
/// The underlying error only goes to the log.
pub const FETCH_FAILURE_MESSAGE: &str = "Failed to fetch product code";

async fn fetch_product_code<C: CatalogApi + ?Sized>(
    catalog: &C,
    event: &CustomResourceEvent,
) -> Result<String, ResourceError> {
    let props: ProductCodeProperties = event.properties()?;
    let details = catalog.describe_entity(&props.product_id).await?;
    details.product_code().map(ToString::to_string)
}

/// Decides the outcome for one event.
pub async fn resolve<C: CatalogApi + ?Sized>(
    catalog: &C,
    event: &CustomResourceEvent,
) -> ResourceOutcome {
    let physical_id = product_physical_id(event);

    match &event.request_type {
        RequestType::Create | RequestType::Update => {
            match fetch_product_code(catalog, event).await {
                Ok(code) => {
                    info!("Fetched product code {} for {}", code, physical_id);
                    ResourceOutcome::success(physical_id, ResponseData::new())
                        .with_data("ProductCode", code)
                }
                Err(e) => {
                    error!("Error: {}", e);
                    ResourceOutcome::failed(physical_id)
                        .with_reason(FETCH_FAILURE_MESSAGE)
                        .with_data("error", FETCH_FAILURE_MESSAGE)
                }
            }
        }
        RequestType::Delete => ResourceOutcome::success(physical_id, ResponseData::new()),
        other @ RequestType::Unknown(_) => invalid_request_type(physical_id, other),
    }
}

/// # Errors
///
/// Returns an error only when the response could not be delivered.
pub async fn handle<C, T>(
    catalog: &C,
    responder: &Responder<'_, T>,
    event: &CustomResourceEvent,
) -> Result<(), ResourceError>
where
    C: CatalogApi + ?Sized,
    T: CallbackTransport + ?Sized,
{
    let outcome = resolve(catalog, event).await;
    responder.send(event, outcome).await
}

/// Lambda entry point for the product code function.
#[tracing::instrument(level = "info", skip_all)]
pub async fn function_handler<C, T>(
    event: LambdaEvent<Value>,
    catalog: &C,
    transport: &T,
) -> Result<(), Error>
where
    C: CatalogApi + ?Sized,
    T: CallbackTransport + ?Sized,
{
    let (invocation, log_stream) = parse_invocation(event)?;
    let responder = Responder::new(transport, log_stream);

    let delivered = match invocation {
        Invocation::Event(cfn_event) => handle(catalog, &responder, &cfn_event).await,
        Invocation::Malformed { event, outcome } => responder.send(&event, outcome).await,
    };
    delivered.map_err(|e| {
        error!("Failed to deliver response: {}", e);
        Error::from(e)
    })
}
