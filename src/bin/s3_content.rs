use cfn_marketplace_resources::clients::S3ObjectStore;
use cfn_marketplace_resources::core::config::AppConfig;
use cfn_marketplace_resources::handlers::s3_content;
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
    // Bucket region comes from the function's own environment.
    let shared = aws_config::from_env().load().await;
    let store = S3ObjectStore::new(aws_sdk_s3::Client::new(&shared));
    let transport = HttpTransport::new(config.callback_timeout)?;

    run(service_fn(|event: LambdaEvent<Value>| {
        s3_content::function_handler(event, &store, &transport)
    }))
    .await
}
