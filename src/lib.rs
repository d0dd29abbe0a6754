/// CloudFormation custom resources for publishing a SaaS product on AWS Marketplace.
///
/// This crate implements three Lambda-backed custom resources:
/// 1. `product-code` reads the marketplace product code of a product
/// 2. `fulfillment-url` points the product's SaaS delivery option at a new URL via a change-set
/// 3. `s3-content` uploads (or deletes) an S3 object from template-supplied content
///
/// # Architecture
///
/// Every function follows the same path:
/// - parse the CloudFormation event from the Lambda payload
/// - dispatch on `RequestType` and call AWS through an injected client trait
/// - report exactly one SUCCESS/FAILED envelope to the pre-signed `ResponseURL`
///
/// # Example
///
/// ```no_run
/// use cfn_marketplace_resources::clients::S3ObjectStore;
/// use cfn_marketplace_resources::core::models::CustomResourceEvent;
/// use cfn_marketplace_resources::handlers::s3_content;
/// use cfn_marketplace_resources::responder::{HttpTransport, Responder};
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     cfn_marketplace_resources::setup_logging();
///
///     let shared = aws_config::from_env().load().await;
///     let store = S3ObjectStore::new(aws_sdk_s3::Client::new(&shared));
///     let transport = HttpTransport::new(Duration::from_secs(30))?;
///     let responder = Responder::new(&transport, "local");
///
///     let event = CustomResourceEvent::from_payload(serde_json::json!({
///         "RequestType": "Create",
///         "ResponseURL": "https://example.com/presigned",
///         "StackId": "stack",
///         "RequestId": "req",
///         "LogicalResourceId": "Index",
///         "ResourceProperties": {
///             "BucketName": "my-bucket",
///             "Key": "index.html",
///             "Body": "<h1>hello</h1>",
///             "ContentType": "text/html"
///         }
///     }))?;
///
///     s3_content::handle(&store, &responder, &event).await?;
///     Ok(())
/// }
/// ```
pub mod clients;
pub mod core;
pub mod errors;
pub mod handlers;
pub mod responder;
pub mod utils;

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// Output goes to `CloudWatch` Logs. The level is taken from `RUST_LOG` and
/// defaults to `info`. Calling this more than once is harmless.
///
/// # Example
///
/// ```
/// cfn_marketplace_resources::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_target(true)
        .without_time();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
