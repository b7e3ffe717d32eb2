// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! One invocation cycle of the echo runtime.
//!
//! Every invocation ends in exactly one outcome posted to the host: the echoed
//! response, or an invocation error saying why there is none.

use std::io;

use runtime_api_sdk::{
    CancellationToken, ErrorKind, ErrorScope, Invocation, ResponseBody, RuntimeClient,
};
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::warn;

use crate::handler::echo;

/// Default cap on accepted payload size (6 MiB).
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 6 * 1024 * 1024;

/// Read at most `max_bytes` from `reader`.
///
/// Returns `None` as soon as the input turns out to be longer, without
/// buffering more than `max_bytes + 1` bytes.
pub async fn read_capped<R>(reader: R, max_bytes: usize) -> io::Result<Option<Vec<u8>>>
where
    R: AsyncRead + Unpin,
{
    let limit = u64::try_from(max_bytes).unwrap_or(u64::MAX).saturating_add(1);
    let mut buf = Vec::new();
    reader.take(limit).read_to_end(&mut buf).await?;
    if buf.len() > max_bytes {
        Ok(None)
    } else {
        Ok(Some(buf))
    }
}

/// Echo one invocation, or report why it could not be echoed.
pub async fn handle_invocation(
    client: &RuntimeClient,
    max_payload_bytes: usize,
    invocation: Invocation,
    cancel: &CancellationToken,
) -> runtime_api_sdk::Result<()> {
    let (metadata, payload) = invocation.into_parts();
    let request_id = metadata.request_id();

    let input = match read_capped(payload, max_payload_bytes).await {
        Ok(Some(input)) => input,
        Ok(None) => {
            let scope = ErrorScope::Invocation(request_id.to_string());
            return client
                .report_error_type(&scope, "Function.PayloadTooLarge", cancel)
                .await;
        }
        Err(e) => {
            return client
                .report_invocation_error(request_id, &e, Some("Runtime.PayloadReadError"), cancel)
                .await;
        }
    };

    match echo(request_id, &input) {
        Ok(output) => respond(client, request_id, ResponseBody::from(output), cancel).await,
        Err(e) => {
            client
                .report_invocation_error(request_id, &e, None, cancel)
                .await
        }
    }
}

/// Send `body`; if the body itself fails mid-send, report that instead.
pub async fn respond(
    client: &RuntimeClient,
    request_id: &str,
    body: ResponseBody,
    cancel: &CancellationToken,
) -> runtime_api_sdk::Result<()> {
    match client.send_response(request_id, body, cancel).await {
        Err(e) if e.kind() == ErrorKind::Application => {
            warn!(request_id = %request_id, error = %e, "Response output failed, reporting it");
            client
                .report_invocation_error(
                    request_id,
                    &e,
                    Some("Runtime.ResponseStreamError"),
                    cancel,
                )
                .await
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_capped_within_limit() {
        let input = read_capped(&b"12345"[..], 5).await.unwrap();
        assert_eq!(input.as_deref(), Some(&b"12345"[..]));
    }

    #[tokio::test]
    async fn test_read_capped_over_limit() {
        assert!(read_capped(&b"123456"[..], 5).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_read_capped_stops_after_limit() {
        // Endless input: only a bounded read can finish.
        let endless = tokio::io::repeat(b'x');
        assert!(read_capped(endless, 1024).await.unwrap().is_none());
    }
}
