// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error report schema posted to the error endpoints.
//!
//! Building a report never fails. Whatever the caller hands in, the result is a
//! valid report: a fault whose description cannot be captured degrades to
//! [`DEFAULT_ERROR_TYPE`] / [`DEFAULT_ERROR_MESSAGE`] with no frames.

use std::error::Error;
use std::panic::{AssertUnwindSafe, catch_unwind};

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Classification used when nothing better is known about a fault.
pub const DEFAULT_ERROR_TYPE: &str = "Runtime.Unknown";

/// Message used when a fault cannot describe itself.
pub const DEFAULT_ERROR_MESSAGE: &str = "An error occurred but no description was available";

/// Deepest `source()` chain that is copied into nested causes.
const MAX_CAUSE_DEPTH: usize = 16;

/// A failure as the host understands it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReport {
    pub error_message: String,
    pub error_type: String,
    pub stack_trace: Vec<String>,
    /// Underlying fault, taken from the `source()` chain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<Box<ErrorReport>>,
}

impl ErrorReport {
    /// A report consisting of a bare type string.
    ///
    /// The type doubles as the message and no frames are attached. Used for
    /// control-flow signalling where no fault object exists.
    pub fn from_type(error_type: &str) -> Self {
        let error_type = non_empty_or(error_type, DEFAULT_ERROR_TYPE);
        Self {
            error_message: error_type.clone(),
            error_type,
            stack_trace: Vec::new(),
            cause: None,
        }
    }

    /// Describe an arbitrary fault.
    ///
    /// `error_type` overrides the classification derived from the Rust type
    /// name of `E`; a blank override is ignored. The `source()` chain becomes
    /// nested causes.
    pub fn from_error<E>(error: &E, error_type: Option<&str>) -> Self
    where
        E: Error + ?Sized,
    {
        let error_type = match error_type.filter(|explicit| !explicit.trim().is_empty()) {
            Some(explicit) => explicit.to_string(),
            None => classify_type_name(std::any::type_name::<E>())
                .unwrap_or(DEFAULT_ERROR_TYPE)
                .to_string(),
        };

        Self {
            error_message: describe(error),
            error_type,
            stack_trace: Vec::new(),
            cause: error.source().and_then(|source| cause_chain(source, 1)),
        }
    }

    /// Attach stack frames, outermost first.
    pub fn with_stack_trace<I, S>(mut self, frames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stack_trace = frames.into_iter().map(Into::into).collect();
        self
    }

    /// JSON body for the error endpoints.
    pub fn to_json(&self) -> Vec<u8> {
        match serde_json::to_vec(self) {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "Failed to encode error report, sending minimal report");
                serde_json::json!({
                    "errorMessage": DEFAULT_ERROR_MESSAGE,
                    "errorType": DEFAULT_ERROR_TYPE,
                    "stackTrace": [],
                })
                .to_string()
                .into_bytes()
            }
        }
    }
}

fn cause_chain(error: &(dyn Error + 'static), depth: usize) -> Option<Box<ErrorReport>> {
    if depth > MAX_CAUSE_DEPTH {
        return None;
    }
    Some(Box::new(ErrorReport {
        error_message: describe(error),
        error_type: DEFAULT_ERROR_TYPE.to_string(),
        stack_trace: Vec::new(),
        cause: error
            .source()
            .and_then(|source| cause_chain(source, depth + 1)),
    }))
}

/// `Display` of the fault, or the default message when it panics or is empty.
fn describe<E>(error: &E) -> String
where
    E: Error + ?Sized,
{
    match catch_unwind(AssertUnwindSafe(|| error.to_string())) {
        Ok(message) if !message.trim().is_empty() => message,
        Ok(_) => DEFAULT_ERROR_MESSAGE.to_string(),
        Err(_) => {
            warn!("Error description panicked, using default message");
            DEFAULT_ERROR_MESSAGE.to_string()
        }
    }
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

/// Short name of a concrete error type.
///
/// `my_crate::config::ConfigError` becomes `ConfigError`. Trait objects and
/// smart pointers around them carry no useful name and yield `None`.
pub fn classify_type_name(type_name: &str) -> Option<&str> {
    if type_name.starts_with("dyn ") || type_name.starts_with('&') {
        return None;
    }
    let head = type_name.split('<').next().unwrap_or(type_name);
    let short = head.rsplit("::").next().unwrap_or(head).trim();
    match short {
        "" => None,
        "Box" | "Arc" | "Rc" if type_name.contains("dyn ") => None,
        short => Some(short),
    }
}
