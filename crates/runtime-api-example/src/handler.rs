// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! The echo function: wraps a JSON payload with the id of its invocation.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Why an invocation could not be echoed.
#[derive(Debug, Error)]
pub enum EchoError {
    #[error("payload is empty")]
    Empty,

    #[error("payload is not valid JSON")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Echo<'a> {
    request_id: &'a str,
    echo: Value,
}

/// Echo `payload` back as `{"requestId": ..., "echo": <payload>}`.
pub fn echo(request_id: &str, payload: &[u8]) -> Result<Vec<u8>, EchoError> {
    if payload.is_empty() {
        return Err(EchoError::Empty);
    }
    let echo: Value = serde_json::from_slice(payload)?;
    Ok(serde_json::to_vec(&Echo { request_id, echo })?)
}
