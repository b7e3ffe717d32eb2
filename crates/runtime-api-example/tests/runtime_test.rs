// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Invocation handling tests for the echo runtime, over the in-memory backend.

use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use runtime_api_example::{handle_invocation, respond};
use runtime_api_sdk::{
    CancellationToken, ErrorScope, InvocationMetadata, MemoryBackend, ResponseBody, RuntimeClient,
};
use tokio::io::{AsyncRead, ReadBuf};

/// Reader that fails on first read.
struct BrokenReader;

impl AsyncRead for BrokenReader {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        _buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Poll::Ready(Err(io::Error::new(io::ErrorKind::BrokenPipe, "producer went away")))
    }
}

fn client() -> (RuntimeClient, Arc<MemoryBackend>) {
    let backend = Arc::new(MemoryBackend::new());
    let client = RuntimeClient::with_backend(backend.clone(), false);
    (client, backend)
}

async fn next(
    client: &RuntimeClient,
    backend: &MemoryBackend,
    payload: &'static [u8],
) -> runtime_api_sdk::Invocation {
    backend
        .push_invocation(InvocationMetadata::new("req-1"), payload)
        .await;
    client.next_invocation(&CancellationToken::new()).await.unwrap()
}

// ============================================================================
// Payload limits
// ============================================================================

#[tokio::test]
async fn test_payload_at_limit_is_echoed() {
    let (client, backend) = client();
    let invocation = next(&client, &backend, b"[1,2]").await;

    handle_invocation(&client, 5, invocation, &CancellationToken::new())
        .await
        .unwrap();

    let responses = backend.responses().await;
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].request_id, "req-1");
    assert!(backend.errors().await.is_empty());
}

#[tokio::test]
async fn test_oversized_payload_is_reported() {
    let (client, backend) = client();
    let invocation = next(&client, &backend, b"[1,2,3]").await;

    handle_invocation(&client, 5, invocation, &CancellationToken::new())
        .await
        .unwrap();

    assert!(backend.responses().await.is_empty());
    let errors = backend.errors().await;
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].scope, ErrorScope::Invocation("req-1".to_string()));
    assert_eq!(errors[0].report.error_type, "Function.PayloadTooLarge");
}

#[tokio::test]
async fn test_invalid_payload_is_reported() {
    let (client, backend) = client();
    let invocation = next(&client, &backend, b"{nope").await;

    handle_invocation(&client, 1024, invocation, &CancellationToken::new())
        .await
        .unwrap();

    let errors = backend.errors().await;
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].report.error_type, "EchoError");
}

// ============================================================================
// Outcome on output failure
// ============================================================================

#[tokio::test]
async fn test_broken_output_stream_is_reported() {
    let (client, backend) = client();

    respond(
        &client,
        "req-1",
        ResponseBody::from_reader(BrokenReader),
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert!(backend.responses().await.is_empty());
    let errors = backend.errors().await;
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].scope, ErrorScope::Invocation("req-1".to_string()));
    assert_eq!(errors[0].report.error_type, "Runtime.ResponseStreamError");
    assert!(errors[0].report.error_message.contains("producer went away"));
}

#[tokio::test]
async fn test_cancelled_response_is_not_reported() {
    let (client, backend) = client();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = respond(&client, "req-1", ResponseBody::from("ok".to_string()), &cancel)
        .await
        .unwrap_err();

    assert!(err.is_cancelled());
    assert_eq!(backend.call_count(), 0);
}
