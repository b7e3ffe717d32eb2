// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Header names used by the runtime API and a transport-agnostic header lookup.

use std::borrow::Cow;

/// Unique id of the invocation (required on next-invocation responses).
pub const REQUEST_ID: &str = "Request-Id";
/// Absolute deadline of the invocation, in milliseconds since the Unix epoch.
pub const DEADLINE_MS: &str = "Deadline-Ms";
/// Identifier of the configured resource being invoked.
pub const INVOKED_RESOURCE_ID: &str = "Invoked-Resource-Id";
/// Distributed tracing correlation token.
pub const TRACE_ID: &str = "Trace-Id";
/// JSON document supplied by the calling client.
pub const CLIENT_CONTEXT: &str = "Client-Context";
/// JSON document describing the caller identity.
pub const IDENTITY: &str = "Identity";
/// Error classification attached to every error report.
pub const FUNCTION_ERROR_TYPE: &str = "Function-Error-Type";

/// Read access to response headers, independent of the HTTP library.
///
/// Lookups are case-insensitive. Values are raw bytes so that opaque values
/// such as request ids can be taken over byte-for-byte.
pub trait HeaderSource {
    /// Return the first value of the header `name`, if present.
    fn header(&self, name: &str) -> Option<&[u8]>;
}

impl<K, V> HeaderSource for [(K, V)]
where
    K: AsRef<str>,
    V: AsRef<[u8]>,
{
    fn header(&self, name: &str) -> Option<&[u8]> {
        self.iter()
            .find(|(k, _)| k.as_ref().eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_ref())
    }
}

impl<K, V> HeaderSource for Vec<(K, V)>
where
    K: AsRef<str>,
    V: AsRef<[u8]>,
{
    fn header(&self, name: &str) -> Option<&[u8]> {
        self.as_slice().header(name)
    }
}

/// Make `value` acceptable as an HTTP header value.
///
/// Visible ASCII, space and tab pass through; anything else (control
/// characters, non-ASCII) is replaced with `_`. An empty result is never
/// returned for a non-empty input.
pub fn sanitize_header_value(value: &str) -> Cow<'_, str> {
    let valid = |c: char| c == '\t' || c == ' ' || c.is_ascii_graphic();
    if value.chars().all(valid) {
        return Cow::Borrowed(value);
    }
    Cow::Owned(
        value
            .chars()
            .map(|c| if valid(c) { c } else { '_' })
            .collect(),
    )
}
