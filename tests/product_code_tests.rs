mod common;

use cfn_marketplace_resources::handlers::product_code::{self, FETCH_FAILURE_MESSAGE};
use cfn_marketplace_resources::responder::Responder;
use common::{FakeCatalog, RESPONSE_URL, RecordingTransport, event, invocation, payload};
use serde_json::json;

fn product_details() -> serde_json::Value {
    json!({
        "Description": { "ProductCode": "6x9b2kq0example", "ProductTitle": "Widget SaaS" },
        "Versions": []
    })
}

#[tokio::test]
async fn test_create_returns_product_code() {
    let catalog = FakeCatalog::with_details(product_details());
    let transport = RecordingTransport::new();
    let responder = Responder::new(&transport, "2026/10/18/[$LATEST]abc");

    let ev = event("Create", json!({ "ProductId": "prod-p1" }));
    product_code::handle(&catalog, &responder, &ev).await.unwrap();

    let resp = transport.only_response();
    assert_eq!(resp["Status"], "SUCCESS");
    assert_eq!(resp["Data"], json!({ "ProductCode": "6x9b2kq0example" }));
    assert_eq!(resp["PhysicalResourceId"], "prod-p1");
    assert_eq!(resp["RequestId"], "req-123");
    assert_eq!(resp["LogicalResourceId"], "Listing");
    assert_eq!(
        resp["Reason"],
        "See the details in CloudWatch Log Stream: 2026/10/18/[$LATEST]abc"
    );
    assert_eq!(catalog.describe_calls.lock().unwrap().as_slice(), ["prod-p1"]);
}

#[tokio::test]
async fn test_update_keeps_physical_id_stable() {
    let catalog = FakeCatalog::with_details(product_details());
    let transport = RecordingTransport::new();
    let responder = Responder::new(&transport, "stream");

    let create = event("Create", json!({ "ProductId": "prod-p1" }));
    let mut update = event("Update", json!({ "ProductId": "prod-p1" }));
    update.physical_resource_id = Some("prod-p1".to_string());

    product_code::handle(&catalog, &responder, &create).await.unwrap();
    product_code::handle(&catalog, &responder, &update).await.unwrap();

    let sent = transport.sent();
    assert_eq!(sent.len(), 2);
    let ids: Vec<String> = sent
        .iter()
        .map(|(_, body)| {
            let v: serde_json::Value = serde_json::from_str(body).unwrap();
            v["PhysicalResourceId"].as_str().unwrap().to_string()
        })
        .collect();
    assert_eq!(ids[0], ids[1]);
}

#[tokio::test]
async fn test_delete_succeeds_without_remote_call() {
    let catalog = FakeCatalog::unreachable();
    let transport = RecordingTransport::new();
    let responder = Responder::new(&transport, "stream");

    let ev = event("Delete", json!({ "ProductId": "p1" }));
    product_code::handle(&catalog, &responder, &ev).await.unwrap();

    let resp = transport.only_response();
    assert_eq!(resp["Status"], "SUCCESS");
    assert_eq!(resp["Data"], json!({}));
    assert_eq!(catalog.describe_count(), 0);
}

#[tokio::test]
async fn test_lookup_failure_reports_generic_error() {
    let catalog = FakeCatalog::unreachable();
    let transport = RecordingTransport::new();
    let responder = Responder::new(&transport, "stream");

    let ev = event("Create", json!({ "ProductId": "p1" }));
    product_code::handle(&catalog, &responder, &ev).await.unwrap();

    let resp = transport.only_response();
    assert_eq!(resp["Status"], "FAILED");
    assert_eq!(resp["Data"], json!({ "error": "Failed to fetch product code" }));
    assert_eq!(resp["Reason"], FETCH_FAILURE_MESSAGE);
    // AWS detail stays in the logs.
    assert!(!resp.to_string().contains("AccessDenied"));
}

#[tokio::test]
async fn test_missing_product_code_is_a_failure() {
    let catalog = FakeCatalog::with_details(json!({ "Description": {} }));
    let transport = RecordingTransport::new();
    let responder = Responder::new(&transport, "stream");

    let ev = event("Update", json!({ "ProductId": "p1" }));
    product_code::handle(&catalog, &responder, &ev).await.unwrap();

    assert_eq!(transport.only_response()["Status"], "FAILED");
}

#[tokio::test]
async fn test_missing_product_id_fails_without_lookup() {
    let catalog = FakeCatalog::with_details(product_details());
    let transport = RecordingTransport::new();
    let responder = Responder::new(&transport, "stream");

    let ev = event("Create", json!({}));
    product_code::handle(&catalog, &responder, &ev).await.unwrap();

    let resp = transport.only_response();
    assert_eq!(resp["Status"], "FAILED");
    assert_eq!(resp["PhysicalResourceId"], "Listing");
    assert_eq!(catalog.describe_count(), 0);
}

#[tokio::test]
async fn test_invalid_request_type_fails_with_empty_data() {
    let catalog = FakeCatalog::with_details(product_details());
    let transport = RecordingTransport::new();
    let responder = Responder::new(&transport, "stream");

    let ev = event("Replace", json!({ "ProductId": "p1" }));
    product_code::handle(&catalog, &responder, &ev).await.unwrap();

    let resp = transport.only_response();
    assert_eq!(resp["Status"], "FAILED");
    assert_eq!(resp["Data"], json!({}));
    assert_eq!(resp["Reason"], "Invalid request type: Replace");
    assert_eq!(catalog.describe_count(), 0);
}

#[tokio::test]
async fn test_delivery_failure_is_returned() {
    let catalog = FakeCatalog::with_details(product_details());
    let transport = RecordingTransport::failing();
    let responder = Responder::new(&transport, "stream");

    let ev = event("Create", json!({ "ProductId": "p1" }));
    let result = product_code::handle(&catalog, &responder, &ev).await;

    assert!(result.is_err());
    // Attempted exactly once, never retried.
    assert_eq!(transport.sent().len(), 1);
}

#[tokio::test]
async fn test_function_handler_reports_log_stream_in_default_reason() {
    let catalog = FakeCatalog::unreachable();
    let transport = RecordingTransport::new();

    let lambda_event = invocation(
        payload("Create", json!({ "ProductId": "prod-p1" })),
        "2026/10/18/[$LATEST]f00d",
    );
    product_code::function_handler(lambda_event, &catalog, &transport)
        .await
        .unwrap();

    let resp = transport.only_response();
    assert_eq!(resp["Status"], "FAILED");
    assert_eq!(resp["PhysicalResourceId"], "prod-p1");

    let transport = RecordingTransport::new();
    let lambda_event = invocation(
        payload("Delete", json!({ "ProductId": "prod-p1" })),
        "2026/10/18/[$LATEST]f00d",
    );
    product_code::function_handler(lambda_event, &catalog, &transport)
        .await
        .unwrap();

    assert_eq!(
        transport.only_response()["Reason"],
        "See the details in CloudWatch Log Stream: 2026/10/18/[$LATEST]f00d"
    );
}

#[tokio::test]
async fn test_malformed_event_still_gets_one_failed_response() {
    let catalog = FakeCatalog::with_details(product_details());
    let transport = RecordingTransport::new();

    let mut raw = payload("Delete", json!({}));
    raw["ResourceProperties"] = serde_json::Value::Null;
    product_code::function_handler(invocation(raw, "stream"), &catalog, &transport)
        .await
        .unwrap();

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0.as_str(), RESPONSE_URL);

    let resp = transport.only_response();
    assert_eq!(resp["Status"], "FAILED");
    assert!(resp["Reason"].as_str().unwrap().starts_with("malformed event: "));
    assert_eq!(resp["RequestId"], "req-123");
    assert_eq!(resp["LogicalResourceId"], "Listing");
    assert_eq!(resp["PhysicalResourceId"], "Listing");
    assert_eq!(resp["Data"], json!({}));
    assert_eq!(catalog.describe_count(), 0);
}

#[tokio::test]
async fn test_missing_ids_default_to_empty_and_log_stream() {
    let catalog = FakeCatalog::with_details(product_details());
    let transport = RecordingTransport::new();

    let raw = json!({ "RequestType": "Create", "ResponseURL": RESPONSE_URL });
    product_code::function_handler(invocation(raw, "stream-7"), &catalog, &transport)
        .await
        .unwrap();

    let resp = transport.only_response();
    assert_eq!(resp["Status"], "FAILED");
    assert_eq!(resp["StackId"], "");
    assert_eq!(resp["RequestId"], "");
    assert_eq!(resp["LogicalResourceId"], "");
    assert_eq!(resp["PhysicalResourceId"], "stream-7");
}

#[tokio::test]
async fn test_event_without_response_url_is_an_invocation_error() {
    let catalog = FakeCatalog::with_details(product_details());
    let transport = RecordingTransport::new();

    let mut raw = payload("Create", json!({ "ProductId": "p1" }));
    raw.as_object_mut().unwrap().remove("ResponseURL");
    let result = product_code::function_handler(invocation(raw, "stream"), &catalog, &transport).await;

    assert!(result.is_err());
    assert!(transport.sent().is_empty());
    assert_eq!(catalog.describe_count(), 0);
}
