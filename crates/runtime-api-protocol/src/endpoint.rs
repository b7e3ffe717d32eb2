// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Endpoint URLs of the runtime API.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

/// Characters escaped when a request id is used as a path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Lifecycle phase an error report applies to.
///
/// The scope selects the endpoint and how the host treats the failure.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorScope {
    /// Before the first poll; fatal to the process from the host's view.
    Initialization,
    /// A single invocation, keyed by its request id. Polling may continue.
    Invocation(String),
    /// During the resume hook after a snapshot restore.
    Restore,
}

impl ErrorScope {
    /// Short name used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorScope::Initialization => "initialization",
            ErrorScope::Invocation(_) => "invocation",
            ErrorScope::Restore => "restore",
        }
    }
}

/// Builds the URLs of every runtime API call from a fixed base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeEndpoint {
    base: String,
}

impl RuntimeEndpoint {
    /// Create an endpoint for `runtime_api` (`host:port`) and an API version.
    ///
    /// A leading scheme on `runtime_api` is dropped; the runtime API is always
    /// plain HTTP.
    pub fn new(runtime_api: &str, api_version: &str) -> Self {
        let host = runtime_api.trim().trim_end_matches('/');
        let host = host.split_once("://").map_or(host, |(_, rest)| rest);
        let version = api_version.trim_matches('/');
        Self {
            base: format!("http://{}/{}/runtime", host, version),
        }
    }

    /// Base URL all paths are appended to.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// `GET /invocation/next`
    pub fn next_invocation(&self) -> String {
        format!("{}/invocation/next", self.base)
    }

    /// `POST /invocation/{requestId}/response`
    pub fn invocation_response(&self, request_id: &str) -> String {
        format!(
            "{}/invocation/{}/response",
            self.base,
            utf8_percent_encode(request_id, PATH_SEGMENT)
        )
    }

    /// `POST /invocation/{requestId}/error`
    pub fn invocation_error(&self, request_id: &str) -> String {
        format!(
            "{}/invocation/{}/error",
            self.base,
            utf8_percent_encode(request_id, PATH_SEGMENT)
        )
    }

    /// `POST /init/error`
    pub fn init_error(&self) -> String {
        format!("{}/init/error", self.base)
    }

    /// `GET /restore/next`
    pub fn restore_next(&self) -> String {
        format!("{}/restore/next", self.base)
    }

    /// `POST /restore/error`
    pub fn restore_error(&self) -> String {
        format!("{}/restore/error", self.base)
    }

    /// Error endpoint for the given scope.
    pub fn error_for(&self, scope: &ErrorScope) -> String {
        match scope {
            ErrorScope::Initialization => self.init_error(),
            ErrorScope::Invocation(request_id) => self.invocation_error(request_id),
            ErrorScope::Restore => self.restore_error(),
        }
    }
}
