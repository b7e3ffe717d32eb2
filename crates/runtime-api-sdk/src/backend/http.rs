// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! HTTP-based SDK backend for communication with the runtime API.

use std::io;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use reqwest::header::{CONTENT_TYPE, HeaderMap};
use runtime_api_protocol::headers::{FUNCTION_ERROR_TYPE, sanitize_header_value};
use runtime_api_protocol::{
    ErrorReport, ErrorScope, HeaderSource, InvocationMetadata, RuntimeEndpoint,
};
use tokio_util::io::{ReaderStream, StreamReader};
use tracing::debug;

use super::RuntimeBackend;
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::types::{Invocation, Payload, ResponseBody};

/// HTTP backend for runtime API operations.
///
/// Holds one pooled `reqwest::Client` that is reused for every call.
pub struct HttpBackend {
    /// Pooled HTTP client
    client: reqwest::Client,
    /// URL builder for the configured runtime API
    endpoint: RuntimeEndpoint,
}

impl HttpBackend {
    /// Create a new HTTP backend with the given configuration.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .user_agent(config.user_agent.clone())
            .tcp_nodelay(true)
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: RuntimeEndpoint::new(&config.runtime_api, &config.api_version),
        })
    }

    /// URL builder used by this backend.
    pub fn endpoint(&self) -> &RuntimeEndpoint {
        &self.endpoint
    }
}

#[async_trait]
impl RuntimeBackend for HttpBackend {
    async fn next_invocation(&self) -> Result<Invocation> {
        let url = self.endpoint.next_invocation();
        debug!(url = %url, "GET next invocation");

        let response = ensure_success(self.client.get(&url).send().await?).await?;
        let metadata = InvocationMetadata::from_headers(&ResponseHeaders(response.headers()))?;

        let stream = response.bytes_stream().map_err(io::Error::other);
        let payload = Payload::from_reader(StreamReader::new(stream));

        Ok(Invocation::new(metadata, payload))
    }

    async fn send_response(&self, request_id: &str, body: ResponseBody) -> Result<()> {
        let url = self.endpoint.invocation_response(request_id);
        debug!(url = %url, known_len = ?body.known_len(), "POST invocation response");

        // First error raised by the caller's stream, if any.
        let output_failure: Arc<OnceLock<String>> = Arc::new(OnceLock::new());

        let body = match body {
            ResponseBody::Bytes(bytes) => reqwest::Body::from(bytes),
            ResponseBody::Stream(reader) => {
                let failure = Arc::clone(&output_failure);
                let stream = ReaderStream::new(reader).inspect_err(move |e| {
                    let _ = failure.set(e.to_string());
                });
                reqwest::Body::wrap_stream(stream)
            }
        };

        let sent = self.client.post(&url).body(body).send().await;
        if let Some(message) = output_failure.get() {
            return Err(ClientError::OutputStream(message.clone()));
        }
        ensure_success(sent?).await?;
        Ok(())
    }

    async fn post_error(&self, scope: &ErrorScope, report: &ErrorReport) -> Result<()> {
        let url = self.endpoint.error_for(scope);
        debug!(url = %url, error_type = %report.error_type, "POST error report");

        let error_type = sanitize_header_value(&report.error_type);
        let response = self
            .client
            .post(&url)
            .header(FUNCTION_ERROR_TYPE, error_type.as_ref())
            .header(CONTENT_TYPE, "application/json")
            .body(report.to_json())
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn await_restore(&self) -> Result<()> {
        let url = self.endpoint.restore_next();
        debug!(url = %url, "GET restore next");

        ensure_success(self.client.get(&url).send().await?).await?;
        Ok(())
    }
}

/// Adapts reqwest headers to the protocol's header lookup.
struct ResponseHeaders<'a>(&'a HeaderMap);

impl HeaderSource for ResponseHeaders<'_> {
    fn header(&self, name: &str) -> Option<&[u8]> {
        self.0.get(name).map(|value| value.as_bytes())
    }
}

/// Turn a non-success status into [`ClientError::Status`].
async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Status {
        status: status.as_u16(),
        body,
    })
}
