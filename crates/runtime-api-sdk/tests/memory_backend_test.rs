// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Driving-loop tests for runtime-api-sdk over the in-memory backend.

use std::sync::Arc;

use bytes::Bytes;
use runtime_api_sdk::{
    CancellationToken, ClientError, ErrorKind, ErrorScope, InvocationMetadata, MemoryBackend,
    ResponseBody, RuntimeClient,
};

#[derive(Debug)]
struct EmptyPayload;

impl std::fmt::Display for EmptyPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "payload was empty")
    }
}

impl std::error::Error for EmptyPayload {}

fn memory_client() -> (RuntimeClient, Arc<MemoryBackend>) {
    let backend = Arc::new(MemoryBackend::new());
    (RuntimeClient::with_backend(backend.clone(), false), backend)
}

/// Echo non-empty payloads, report empty ones, for `count` invocations.
async fn run_echo(client: &RuntimeClient, count: usize, cancel: &CancellationToken) {
    for _ in 0..count {
        let (metadata, payload) = client.next_invocation(cancel).await.unwrap().into_parts();
        let input = payload.into_bytes().await.unwrap();
        if input.is_empty() {
            client
                .report_invocation_error(metadata.request_id(), &EmptyPayload, None, cancel)
                .await
                .unwrap();
        } else {
            client
                .send_response(metadata.request_id(), ResponseBody::from(input), cancel)
                .await
                .unwrap();
        }
    }
}

#[tokio::test]
async fn test_echo_loop_responds_in_order() {
    let (client, backend) = memory_client();
    backend
        .push_invocation(InvocationMetadata::new("req-1"), &b"first"[..])
        .await;
    backend
        .push_invocation(InvocationMetadata::new("req-2"), &b"second"[..])
        .await;

    run_echo(&client, 2, &CancellationToken::new()).await;

    let responses = backend.responses().await;
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0].request_id, "req-1");
    assert_eq!(responses[0].body, Bytes::from_static(b"first"));
    assert_eq!(responses[1].request_id, "req-2");
    assert_eq!(responses[1].body, Bytes::from_static(b"second"));
}

#[tokio::test]
async fn test_invocation_error_does_not_stop_polling() {
    let (client, backend) = memory_client();
    backend
        .push_invocation(InvocationMetadata::new("bad"), Bytes::new())
        .await;
    backend
        .push_invocation(InvocationMetadata::new("good"), &b"ok"[..])
        .await;

    run_echo(&client, 2, &CancellationToken::new()).await;

    let errors = backend.errors().await;
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].scope, ErrorScope::Invocation("bad".to_string()));
    assert_eq!(errors[0].report.error_type, "EmptyPayload");
    assert_eq!(errors[0].report.error_message, "payload was empty");

    let responses = backend.responses().await;
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].request_id, "good");
}

#[tokio::test]
async fn test_poll_waits_for_pushed_invocation() {
    let (client, backend) = memory_client();
    let cancel = CancellationToken::new();

    let push = async {
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        backend
            .push_invocation(InvocationMetadata::new("late"), &b"x"[..])
            .await;
    };
    let (invocation, ()) = tokio::join!(client.next_invocation(&cancel), push);

    assert_eq!(invocation.unwrap().request_id(), "late");
}

#[tokio::test]
async fn test_scripted_transport_failure_is_retryable() {
    let (client, backend) = memory_client();
    backend
        .push_failure(ClientError::Connection("connection reset".to_string()))
        .await;
    backend
        .push_invocation(InvocationMetadata::new("after-retry"), &b"x"[..])
        .await;
    let cancel = CancellationToken::new();

    let err = client.next_invocation(&cancel).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(err.kind().is_retryable());

    let invocation = client.next_invocation(&cancel).await.unwrap();
    assert_eq!(invocation.request_id(), "after-retry");
}

#[tokio::test]
async fn test_init_error_is_recorded_with_initialization_scope() {
    let (client, backend) = memory_client();

    client
        .report_error_type(
            &ErrorScope::Initialization,
            "Function.ConfigError",
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    let errors = backend.errors().await;
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].scope, ErrorScope::Initialization);
    assert_eq!(errors[0].report.error_message, "Function.ConfigError");
    assert!(errors[0].report.stack_trace.is_empty());
}

#[tokio::test]
async fn test_metadata_survives_into_parts() {
    let (client, backend) = memory_client();
    let metadata = InvocationMetadata::new("req-meta")
        .with_trace_id("Root=1-abc")
        .with_deadline_ms(4_102_444_800_000);
    backend.push_invocation(metadata, &b""[..]).await;

    let invocation = client
        .next_invocation(&CancellationToken::new())
        .await
        .unwrap();
    assert!(invocation.remaining_time().is_some());

    let (metadata, _payload) = invocation.into_parts();
    assert_eq!(metadata.trace_id(), Some("Root=1-abc"));
    assert_eq!(metadata.deadline_epoch_millis(), Some(4_102_444_800_000));
}
