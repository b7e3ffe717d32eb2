// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! In-memory SDK backend for tests and local runs.
//!
//! Invocations are scripted up front and every call is recorded, so a driving
//! loop can be exercised without a host. An empty queue behaves like an idle
//! long-poll: the call waits until something is pushed.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use runtime_api_protocol::{ErrorReport, ErrorScope, InvocationMetadata};
use tokio::io::AsyncReadExt;
use tokio::sync::{Mutex, Notify};

use super::RuntimeBackend;
use crate::error::{ClientError, Result};
use crate::types::{Invocation, Payload, ResponseBody};

/// A response captured by [`MemoryBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedResponse {
    pub request_id: String,
    pub body: Bytes,
}

/// An error report captured by [`MemoryBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedError {
    pub scope: ErrorScope,
    pub report: ErrorReport,
}

#[derive(Default)]
struct State {
    invocations: VecDeque<Result<Invocation>>,
    responses: Vec<RecordedResponse>,
    errors: Vec<RecordedError>,
    restore_ready: bool,
}

/// Scriptable in-process backend.
#[derive(Default)]
pub struct MemoryBackend {
    state: Mutex<State>,
    /// Wakes waiting polls and restore waits when the script changes
    changed: Notify,
    /// Number of backend calls made, of any kind
    calls: AtomicUsize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an invocation for the next poll.
    pub async fn push_invocation(&self, metadata: InvocationMetadata, payload: impl Into<Bytes>) {
        let invocation = Invocation::new(metadata, Payload::from_bytes(payload));
        self.state.lock().await.invocations.push_back(Ok(invocation));
        self.changed.notify_waiters();
    }

    /// Make the next poll fail with `error`.
    pub async fn push_failure(&self, error: ClientError) {
        self.state.lock().await.invocations.push_back(Err(error));
        self.changed.notify_waiters();
    }

    /// Release a pending or future restore wait.
    pub async fn resume(&self) {
        self.state.lock().await.restore_ready = true;
        self.changed.notify_waiters();
    }

    /// Responses sent so far, in order.
    pub async fn responses(&self) -> Vec<RecordedResponse> {
        self.state.lock().await.responses.clone()
    }

    /// Error reports posted so far, in order.
    pub async fn errors(&self) -> Vec<RecordedError> {
        self.state.lock().await.errors.clone()
    }

    /// Total number of backend calls, including ones still waiting.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RuntimeBackend for MemoryBackend {
    async fn next_invocation(&self) -> Result<Invocation> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        loop {
            let changed = self.changed.notified();
            tokio::pin!(changed);
            changed.as_mut().enable();

            if let Some(next) = self.state.lock().await.invocations.pop_front() {
                return next;
            }
            changed.await;
        }
    }

    async fn send_response(&self, request_id: &str, body: ResponseBody) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let body = match body {
            ResponseBody::Bytes(bytes) => bytes,
            ResponseBody::Stream(mut reader) => {
                let mut buf = Vec::new();
                reader
                    .read_to_end(&mut buf)
                    .await
                    .map_err(|e| ClientError::OutputStream(e.to_string()))?;
                Bytes::from(buf)
            }
        };
        self.state.lock().await.responses.push(RecordedResponse {
            request_id: request_id.to_string(),
            body,
        });
        Ok(())
    }

    async fn post_error(&self, scope: &ErrorScope, report: &ErrorReport) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.state.lock().await.errors.push(RecordedError {
            scope: scope.clone(),
            report: report.clone(),
        });
        Ok(())
    }

    async fn await_restore(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        loop {
            let changed = self.changed.notified();
            tokio::pin!(changed);
            changed.as_mut().enable();

            {
                let mut state = self.state.lock().await;
                if state.restore_ready {
                    state.restore_ready = false;
                    return Ok(());
                }
            }
            changed.await;
        }
    }
}
