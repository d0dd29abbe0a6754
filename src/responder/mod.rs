//! Delivery of custom-resource responses to CloudFormation.
//!
//! Every invocation ends with exactly one PUT of the response envelope to the
//! pre-signed `ResponseURL` carried in the event. Delivery is attempted once;
//! a failure is logged and returned to the caller.

pub mod response_builder;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_LENGTH;
use tracing::{error, info};
use url::Url;

use crate::core::models::{CustomResourceEvent, ResourceOutcome};
use crate::errors::ResourceError;
use response_builder::{build_response, serialize_response};

/// Sends a serialized response body to the callback URL.
#[async_trait]
pub trait CallbackTransport: Send + Sync {
    async fn put(&self, url: &Url, body: String) -> Result<(), ResourceError>;
}

/// `reqwest`-backed transport. The scheme of the URL (http or https) picks
/// plain or TLS transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// # Errors
    ///
    /// Returns `HttpError` if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self, ResourceError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CallbackTransport for HttpTransport {
    async fn put(&self, url: &Url, body: String) -> Result<(), ResourceError> {
        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(ResourceError::CallbackError(format!(
                    "unsupported response URL scheme: {other}"
                )));
            }
        }

        // Byte length, not char count: the pre-signed URL rejects a mismatch.
        let content_length = body.len();
        let resp = self
            .client
            .put(url.clone())
            .header(CONTENT_LENGTH, content_length)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                error!("Response PUT failed: {}", e);
                ResourceError::CallbackError(e.to_string())
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body_text = resp
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read body>".to_string());
            error!(
                "Response PUT rejected: status={} body={}",
                status, body_text
            );
            return Err(ResourceError::CallbackError(format!(
                "CloudFormation response failed with {status}"
            )));
        }

        info!("Response delivered: status={}", status);
        Ok(())
    }
}

/// Builds the envelope for an event and delivers it through a transport.
pub struct Responder<'a, T: CallbackTransport + ?Sized> {
    transport: &'a T,
    log_stream_name: String,
}

impl<'a, T: CallbackTransport + ?Sized> Responder<'a, T> {
    pub fn new(transport: &'a T, log_stream_name: impl Into<String>) -> Self {
        Self {
            transport,
            log_stream_name: log_stream_name.into(),
        }
    }

    /// # Errors
    ///
    /// Returns `CallbackError` when the response cannot be serialized or
    /// delivered. The delivery is not retried.
    pub async fn send(
        &self,
        event: &CustomResourceEvent,
        outcome: ResourceOutcome,
    ) -> Result<(), ResourceError> {
        let response = build_response(event, outcome, &self.log_stream_name);
        let body = serialize_response(&response)?;
        info!(
            status = ?response.status,
            reason = %response.reason,
            physical_resource_id = %response.physical_resource_id,
            "Sending response"
        );
        #[cfg(feature = "debug-logs")]
        tracing::debug!("Response body: {}", body);

        self.transport.put(&event.response_url, body).await
    }
}
