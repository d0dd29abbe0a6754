use aws_config::Region;
use cfn_marketplace_resources::clients::MarketplaceCatalogClient;
use cfn_marketplace_resources::core::config::AppConfig;
use cfn_marketplace_resources::handlers::fulfillment_url;
use cfn_marketplace_resources::responder::HttpTransport;
use lambda_runtime::{Error, LambdaEvent, run, service_fn};
use serde_json::Value;
use tracing::error;

#[tokio::main]
async fn main() -> Result<(), Error> {
    cfn_marketplace_resources::setup_logging();

    let config = AppConfig::from_env().map_err(|e| {
        error!("Config error: {}", e);
        Error::from(e)
    })?;
    let shared = aws_config::from_env()
        .region(Region::new(config.catalog_region.clone()))
        .load()
        .await;
    let catalog = MarketplaceCatalogClient::new(
        aws_sdk_marketplacecatalog::Client::new(&shared),
        config.catalog_name.clone(),
    );
    let transport = HttpTransport::new(config.callback_timeout)?;

    run(service_fn(|event: LambdaEvent<Value>| {
        fulfillment_url::function_handler(event, &catalog, &config, &transport)
    }))
    .await
}
