// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Protocol-level error types.

use thiserror::Error;

/// The host violated the wire contract.
///
/// These errors are never retryable: they mean the host sent something the
/// runtime cannot act on, so the driving loop should escalate immediately.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// A required header was not present in the response.
    #[error("missing required header: {0}")]
    MissingHeader(&'static str),

    /// A required header was present but unusable.
    #[error("invalid header {name}: {reason}")]
    InvalidHeader {
        /// Header name
        name: &'static str,
        /// Why the value was rejected
        reason: String,
    },
}

/// Type alias for protocol results.
pub type Result<T> = std::result::Result<T, ProtocolError>;
