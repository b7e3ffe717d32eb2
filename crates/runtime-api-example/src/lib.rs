// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Building blocks of the example echo runtime.
//!
//! - [`lifecycle`]: the process phases and the transitions between them
//! - [`retry`]: backoff for transport failures
//! - [`handler`]: the echo function itself
//! - [`runtime`]: one invocation from payload to posted outcome

pub mod handler;
pub mod lifecycle;
pub mod retry;
pub mod runtime;

pub use handler::{EchoError, echo};
pub use lifecycle::{Event, Phase};
pub use retry::RetryConfig;
pub use runtime::{DEFAULT_MAX_PAYLOAD_BYTES, handle_invocation, read_capped, respond};
