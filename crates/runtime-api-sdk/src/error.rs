// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! SDK-specific error types.

use runtime_api_protocol::ProtocolError;
use thiserror::Error;

/// Errors that can occur in the SDK.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Configuration error (missing or invalid environment variable)
    #[error("configuration error: {0}")]
    Config(String),

    /// HTTP transport failed (connection refused, reset, truncated body)
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Transport failure reported by a non-HTTP backend
    #[error("connection error: {0}")]
    Connection(String),

    /// The host broke the wire contract
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The host answered with a non-success status
    #[error("runtime API returned status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, as text
        body: String,
    },

    /// The cancellation token fired before the call completed
    #[error("operation cancelled")]
    Cancelled,

    /// A restore operation was called without the restore capability
    #[error("restore capability is not available in this runtime")]
    RestoreUnavailable,

    /// An invocation outcome was keyed by an empty request id
    #[error("request id must not be empty")]
    InvalidRequestId,

    /// The caller-supplied response stream failed while it was being sent
    #[error("response output stream failed: {0}")]
    OutputStream(String),
}

/// Broad class of a [`ClientError`], used by the driving loop to pick a policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad configuration; fix the environment
    Config,
    /// Network-level failure; the driving loop may retry
    Transport,
    /// Host contract violation; abort the process
    Protocol,
    /// Caller cancelled
    Cancelled,
    /// Operation misused or not available in this runtime; a programming error
    Capability,
    /// The function's own output failed; continue with the next invocation
    Application,
}

impl ErrorKind {
    /// Whether repeating the same call may succeed.
    pub fn is_retryable(self) -> bool {
        matches!(self, ErrorKind::Transport)
    }
}

impl ClientError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Config(_) => ErrorKind::Config,
            ClientError::Transport(_) | ClientError::Connection(_) => ErrorKind::Transport,
            ClientError::Protocol(_) | ClientError::Status { .. } => ErrorKind::Protocol,
            ClientError::Cancelled => ErrorKind::Cancelled,
            ClientError::RestoreUnavailable | ClientError::InvalidRequestId => {
                ErrorKind::Capability
            }
            ClientError::OutputStream(_) => ErrorKind::Application,
        }
    }

    /// Shorthand for `kind() == ErrorKind::Cancelled`.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ClientError::Cancelled)
    }
}

/// Type alias for SDK results.
pub type Result<T> = std::result::Result<T, ClientError>;
