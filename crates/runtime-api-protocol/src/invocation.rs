// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Invocation metadata carried in next-invocation response headers.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::error::{ProtocolError, Result};
use crate::headers::{
    CLIENT_CONTEXT, DEADLINE_MS, HeaderSource, IDENTITY, INVOKED_RESOURCE_ID, REQUEST_ID,
    TRACE_ID,
};

/// Application that issued the invocation through a client SDK.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientApplication {
    #[serde(default)]
    pub installation_id: Option<String>,
    #[serde(default)]
    pub app_title: Option<String>,
    #[serde(default)]
    pub app_version_name: Option<String>,
    #[serde(default)]
    pub app_version_code: Option<String>,
    #[serde(default)]
    pub app_package_name: Option<String>,
}

/// Structured context supplied by a calling client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientContext {
    /// Calling application, if the client described itself
    #[serde(default)]
    pub client: Option<ClientApplication>,
    /// Free-form values set by the caller
    #[serde(default, deserialize_with = "null_as_default")]
    pub custom: HashMap<String, String>,
    /// Environment of the calling client (platform, locale, ...)
    #[serde(default, rename = "env", deserialize_with = "null_as_default")]
    pub environment: HashMap<String, String>,
}

/// Identity presented by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    #[serde(default, alias = "cognitoIdentityId")]
    pub identity_id: Option<String>,
    #[serde(default, alias = "cognitoIdentityPoolId")]
    pub identity_pool_id: Option<String>,
}

impl Identity {
    fn is_empty(&self) -> bool {
        self.identity_id.is_none() && self.identity_pool_id.is_none()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Everything the host says about one invocation, apart from its payload.
///
/// Instances are immutable once parsed. Only `request_id` is guaranteed to be
/// present; every other field is best-effort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationMetadata {
    request_id: String,
    deadline_ms: Option<i64>,
    invoked_resource_id: Option<String>,
    trace_id: Option<String>,
    client_context: Option<ClientContext>,
    identity: Option<Identity>,
}

impl InvocationMetadata {
    /// Create metadata with only a request id.
    ///
    /// Used by test doubles and by callers that construct invocations locally;
    /// responses from the host go through [`InvocationMetadata::from_headers`].
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            deadline_ms: None,
            invoked_resource_id: None,
            trace_id: None,
            client_context: None,
            identity: None,
        }
    }

    /// Set the deadline in epoch milliseconds.
    pub fn with_deadline_ms(mut self, deadline_ms: i64) -> Self {
        self.deadline_ms = Some(deadline_ms);
        self
    }

    /// Set the invoked resource id.
    pub fn with_invoked_resource_id(mut self, id: impl Into<String>) -> Self {
        self.invoked_resource_id = Some(id.into());
        self
    }

    /// Set the trace id.
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    /// Set the client context.
    pub fn with_client_context(mut self, context: ClientContext) -> Self {
        self.client_context = Some(context);
        self
    }

    /// Set the caller identity.
    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Parse next-invocation response headers.
    ///
    /// Fails only when `Request-Id` is missing, empty or not UTF-8. Malformed
    /// optional headers are logged and treated as absent.
    pub fn from_headers<H>(headers: &H) -> Result<Self>
    where
        H: HeaderSource + ?Sized,
    {
        let raw = headers
            .header(REQUEST_ID)
            .ok_or(ProtocolError::MissingHeader(REQUEST_ID))?;
        let request_id = std::str::from_utf8(raw)
            .map_err(|e| ProtocolError::InvalidHeader {
                name: REQUEST_ID,
                reason: e.to_string(),
            })?
            .to_string();
        if request_id.is_empty() {
            return Err(ProtocolError::InvalidHeader {
                name: REQUEST_ID,
                reason: "empty value".to_string(),
            });
        }

        let deadline_ms = optional_str(headers, DEADLINE_MS).and_then(|value| {
            match value.trim().parse::<i64>() {
                Ok(ms) => Some(ms),
                Err(e) => {
                    warn!(request_id = %request_id, header = DEADLINE_MS, error = %e, "Ignoring malformed deadline");
                    None
                }
            }
        });

        let client_context = optional_str(headers, CLIENT_CONTEXT).and_then(|value| {
            match serde_json::from_str::<ClientContext>(value) {
                Ok(context) => Some(context),
                Err(e) => {
                    warn!(request_id = %request_id, header = CLIENT_CONTEXT, error = %e, "Ignoring malformed client context");
                    None
                }
            }
        });

        let identity = optional_str(headers, IDENTITY).and_then(|value| {
            match serde_json::from_str::<Identity>(value) {
                Ok(identity) if identity.is_empty() => None,
                Ok(identity) => Some(identity),
                Err(e) => {
                    warn!(request_id = %request_id, header = IDENTITY, error = %e, "Ignoring malformed identity");
                    None
                }
            }
        });

        Ok(Self {
            invoked_resource_id: optional_str(headers, INVOKED_RESOURCE_ID).map(str::to_string),
            trace_id: optional_str(headers, TRACE_ID).map(str::to_string),
            request_id,
            deadline_ms,
            client_context,
            identity,
        })
    }

    /// Unique id of this invocation, exactly as the host sent it.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Deadline in milliseconds since the Unix epoch.
    pub fn deadline_epoch_millis(&self) -> Option<i64> {
        self.deadline_ms
    }

    /// Deadline as a timestamp.
    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline_ms.and_then(DateTime::from_timestamp_millis)
    }

    /// Time left until the deadline, saturating at zero.
    pub fn remaining_time(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.deadline()
            .map(|deadline| (deadline - now).to_std().unwrap_or(Duration::ZERO))
    }

    pub fn invoked_resource_id(&self) -> Option<&str> {
        self.invoked_resource_id.as_deref()
    }

    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    pub fn client_context(&self) -> Option<&ClientContext> {
        self.client_context.as_ref()
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }
}

/// Non-empty UTF-8 value of an optional header.
fn optional_str<'a, H>(headers: &'a H, name: &'static str) -> Option<&'a str>
where
    H: HeaderSource + ?Sized,
{
    let raw = headers.header(name)?;
    match std::str::from_utf8(raw) {
        Ok("") => None,
        Ok(value) => Some(value),
        Err(e) => {
            warn!(header = name, error = %e, "Ignoring non UTF-8 header");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remaining_time_saturates() {
        let metadata = InvocationMetadata::new("r").with_deadline_ms(1_000);
        let now = DateTime::from_timestamp_millis(5_000).unwrap();
        assert_eq!(metadata.remaining_time(now), Some(Duration::ZERO));
    }

    #[test]
    fn test_remaining_time() {
        let metadata = InvocationMetadata::new("r").with_deadline_ms(10_000);
        let now = DateTime::from_timestamp_millis(7_500).unwrap();
        assert_eq!(
            metadata.remaining_time(now),
            Some(Duration::from_millis(2_500))
        );
    }

    #[test]
    fn test_no_deadline() {
        let metadata = InvocationMetadata::new("r");
        assert!(metadata.deadline().is_none());
        assert!(metadata.remaining_time(Utc::now()).is_none());
    }

    #[test]
    fn test_null_maps_in_client_context() {
        let context: ClientContext =
            serde_json::from_str(r#"{"client":null,"custom":null,"env":null}"#).unwrap();
        assert_eq!(context, ClientContext::default());
    }
}
