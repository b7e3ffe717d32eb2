// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! SDK backend implementations.
//!
//! This module provides different backends for runtime API operations:
//! - `http`: talks to the host over HTTP (production)
//! - `memory`: in-process double that scripts invocations and records calls

pub mod http;
pub mod memory;

use async_trait::async_trait;
use runtime_api_protocol::{ErrorReport, ErrorScope};

use crate::error::Result;
use crate::types::{Invocation, ResponseBody};

/// Backend trait for runtime API operations.
///
/// Implementations perform exactly one network exchange per call and know
/// nothing about cancellation: the client races every call against the
/// caller's token and drops the future to abort it. Dropping a future
/// returned here must abort the underlying request.
#[async_trait]
pub trait RuntimeBackend: Send + Sync {
    /// Block until the host delivers the next invocation.
    async fn next_invocation(&self) -> Result<Invocation>;

    /// Send the output of an invocation.
    async fn send_response(&self, request_id: &str, body: ResponseBody) -> Result<()>;

    /// Post an error report to the endpoint selected by `scope`.
    async fn post_error(&self, scope: &ErrorScope, report: &ErrorReport) -> Result<()>;

    /// Block until the process is resumed from a snapshot.
    async fn await_restore(&self) -> Result<()>;
}
