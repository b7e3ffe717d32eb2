// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Runtime API SDK - client for a function runtime talking to its host.
//!
//! A function runtime runs inside a host sandbox and pulls work from it over a
//! long-poll HTTP API. This crate wraps that API in four operations and leaves
//! the driving loop (and its retry policy) to the caller.
//!
//! # Features
//!
//! - **Invocation Poller**: wait for the next invocation and its metadata
//! - **Error Reporter**: report init, per-invocation and restore faults
//! - **Response Sender**: send buffered or streamed output
//! - **Restore Controller**: wait for snapshot resume (when the host supports it)
//!
//! # Quick Start
//!
//! ```ignore
//! use runtime_api_sdk::{CancellationToken, ResponseBody, RuntimeClient};
//!
//! #[tokio::main]
//! async fn main() -> runtime_api_sdk::Result<()> {
//!     let client = RuntimeClient::from_env()?;
//!     let cancel = CancellationToken::new();
//!
//!     if client.restore_enabled() {
//!         client.await_restore(&cancel).await?;
//!         // Reopen connections and refresh credentials here
//!     }
//!
//!     loop {
//!         let (metadata, payload) = client.next_invocation(&cancel).await?.into_parts();
//!         // Echo the payload back without buffering it
//!         client
//!             .send_response(metadata.request_id(), ResponseBody::from(payload), &cancel)
//!             .await?;
//!     }
//! }
//! ```
//!
//! # Cancellation
//!
//! Every blocking operation takes a [`CancellationToken`]. Cancelling it aborts
//! the request in flight and the operation returns [`ClientError::Cancelled`],
//! which is distinct from a transport failure:
//!
//! ```ignore
//! match client.next_invocation(&cancel).await {
//!     Ok(invocation) => { /* ... */ }
//!     Err(e) if e.is_cancelled() => return Ok(()),
//!     Err(e) if e.kind().is_retryable() => { /* back off and poll again */ }
//!     Err(e) => return Err(e),
//! }
//! ```
//!
//! # Configuration
//!
//! ## Environment Variables
//!
//! | Variable | Required | Default | Description |
//! |----------|----------|---------|-------------|
//! | `RUNTIME_API` | Yes | - | Runtime API address (`host:port`) |
//! | `RUNTIME_API_VERSION` | No | `2018-06-01` | API version path segment |
//! | `RUNTIME_INITIALIZATION_TYPE` | No | - | `snap-start` enables restore |
//! | `RUNTIME_CONNECT_TIMEOUT_MS` | No | `10000` | Connect timeout |
//! | `RUNTIME_USER_AGENT` | No | `runtime-api-sdk/<version>` | User-Agent header |
//!
//! ## Programmatic Configuration
//!
//! ```ignore
//! use runtime_api_sdk::{ClientConfig, RuntimeClient};
//!
//! let config = ClientConfig::new("127.0.0.1:9001")
//!     .with_restore_enabled(true)
//!     .with_connect_timeout_ms(2_000);
//!
//! let client = RuntimeClient::new(config)?;
//! ```

pub mod backend;
mod client;
mod config;
mod error;
mod types;

// Main types
pub use client::RuntimeClient;
pub use config::{ClientConfig, DEFAULT_API_VERSION, SNAP_START_INITIALIZATION};
pub use error::{ClientError, ErrorKind, Result};
pub use types::{ByteReader, Invocation, Payload, ResponseBody};

// Backends
pub use backend::RuntimeBackend;
pub use backend::http::HttpBackend;
pub use backend::memory::{MemoryBackend, RecordedError, RecordedResponse};

// Wire types callers handle directly
pub use runtime_api_protocol::{
    ClientApplication, ClientContext, ErrorReport, ErrorScope, Identity, InvocationMetadata,
};

pub use tokio_util::sync::CancellationToken;
