//! SaaS fulfillment URL resource.
//!
//! Create/Update point the product's delivery option at `FulfillmentUrl` by
//! submitting an `UpdateDeliveryOptions` change-set. The change-set runs
//! asynchronously in the catalog; only its submission is awaited here.

use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use tracing::{debug, error, info};
use url::Url;

use super::{Invocation, invalid_request_type, parse_invocation, product_physical_id};
use crate::clients::CatalogApi;
use crate::core::catalog::{ChangeSetRequest, ChangeSetSummary};
use crate::core::config::AppConfig;
use crate::core::models::{
    CustomResourceEvent, FulfillmentUrlProperties, RequestType, ResourceOutcome, ResponseData,
};
use crate::errors::ResourceError;
use crate::responder::{CallbackTransport, Responder};

pub const UPDATE_FAILURE_MESSAGE: &str = "Failed to update fulfillment url";

async fn submit_fulfillment_url<C: CatalogApi + ?Sized>(
    catalog: &C,
    config: &AppConfig,
    event: &CustomResourceEvent,
) -> Result<ChangeSetSummary, ResourceError> {
    let props: FulfillmentUrlProperties = event.properties()?;
    Url::parse(&props.fulfillment_url).map_err(|e| {
        ResourceError::InvalidProperties(format!("FulfillmentUrl {}: {e}", props.fulfillment_url))
    })?;

    let details = catalog.describe_entity(&props.product_id).await?;
    let delivery_option_id = details.single_delivery_option_id()?;
    debug!("Delivery option id: {}", delivery_option_id);

    let request = ChangeSetRequest::update_fulfillment_url(
        &config.catalog_name,
        &config.saas_entity_type,
        &props.product_id,
        delivery_option_id,
        &props.fulfillment_url,
    )?;
    debug!("StartChangeSet request: {:?}", request);

    let summary = catalog.start_change_set(&request).await?;
    info!(
        change_set_id = summary.change_set_id.as_deref().unwrap_or(""),
        "Change-set submitted"
    );
    Ok(summary)
}

/// Decides the outcome for one event.
pub async fn resolve<C: CatalogApi + ?Sized>(
    catalog: &C,
    config: &AppConfig,
    event: &CustomResourceEvent,
) -> ResourceOutcome {
    let physical_id = product_physical_id(event);

    match &event.request_type {
        RequestType::Create | RequestType::Update => {
            let submitted = submit_fulfillment_url(catalog, config, event)
                .await
                .and_then(|summary| {
                    serde_json::to_string(&summary)
                        .map_err(|e| ResourceError::EntityError(format!("change-set result: {e}")))
                });

            match submitted {
                Ok(result) => ResourceOutcome::success(physical_id, ResponseData::new())
                    .with_data("StartChangeSetResp", result),
                Err(e) => {
                    error!("Error: {}", e);
                    ResourceOutcome::failed(physical_id)
                        .with_reason(UPDATE_FAILURE_MESSAGE)
                        .with_data("error", UPDATE_FAILURE_MESSAGE)
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
    config: &AppConfig,
    responder: &Responder<'_, T>,
    event: &CustomResourceEvent,
) -> Result<(), ResourceError>
where
    C: CatalogApi + ?Sized,
    T: CallbackTransport + ?Sized,
{
    let outcome = resolve(catalog, config, event).await;
    responder.send(event, outcome).await
}

/// Lambda entry point for the fulfillment URL function.
#[tracing::instrument(level = "info", skip_all)]
pub async fn function_handler<C, T>(
    event: LambdaEvent<Value>,
    catalog: &C,
    config: &AppConfig,
    transport: &T,
) -> Result<(), Error>
where
    C: CatalogApi + ?Sized,
    T: CallbackTransport + ?Sized,
{
    let (invocation, log_stream) = parse_invocation(event)?;
    let responder = Responder::new(transport, log_stream);

    let delivered = match invocation {
        Invocation::Event(cfn_event) => handle(catalog, config, &responder, &cfn_event).await,
        Invocation::Malformed { event, outcome } => responder.send(&event, outcome).await,
    };
    delivered.map_err(|e| {
        error!("Failed to deliver response: {}", e);
        Error::from(e)
    })
}
