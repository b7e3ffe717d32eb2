// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Runtime API Protocol - wire layer for the function runtime long-poll API
//!
//! This crate describes what travels over the wire between a function runtime
//! and its host sandbox. It does not perform any I/O; the transport lives in
//! `runtime-api-sdk`.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    runtime-api-protocol                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Endpoints: next / response / error / init / restore paths  │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Metadata: Request-Id, Deadline-Ms, Client-Context, ...     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Error schema: {errorMessage, errorType, stackTrace}        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use runtime_api_protocol::{InvocationMetadata, RuntimeEndpoint};
//!
//! let endpoint = RuntimeEndpoint::new("127.0.0.1:9001", "2018-06-01");
//! let url = endpoint.next_invocation();
//!
//! // ... issue GET url, then parse the response headers
//! let headers = [("Request-Id", "abc-123"), ("Deadline-Ms", "1700000000000")];
//! let metadata = InvocationMetadata::from_headers(&headers[..])?;
//! assert_eq!(metadata.request_id(), "abc-123");
//! ```

pub mod endpoint;
pub mod error;
pub mod error_report;
pub mod headers;
pub mod invocation;

pub use endpoint::{ErrorScope, RuntimeEndpoint};
pub use error::{ProtocolError, Result};
pub use error_report::{DEFAULT_ERROR_MESSAGE, DEFAULT_ERROR_TYPE, ErrorReport};
pub use headers::HeaderSource;
pub use invocation::{ClientApplication, ClientContext, Identity, InvocationMetadata};
