// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! SDK configuration for connecting to the runtime API.

use std::env;

use crate::error::{ClientError, Result};

/// Default API version segment of the base URL.
pub const DEFAULT_API_VERSION: &str = "2018-06-01";

/// Initialization type that enables the restore capability.
pub const SNAP_START_INITIALIZATION: &str = "snap-start";

/// SDK configuration for connecting to the runtime API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Runtime API address as `host:port` (required)
    pub runtime_api: String,
    /// API version path segment (default: "2018-06-01")
    pub api_version: String,
    /// Whether snapshot restore is available (default: false)
    pub restore_enabled: bool,
    /// TCP connect timeout in milliseconds (default: 10_000).
    /// Requests themselves have no timeout; long-polls idle until the host answers.
    pub connect_timeout_ms: u64,
    /// User-Agent sent with every request
    pub user_agent: String,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// # Required Environment Variables
    /// - `RUNTIME_API` - Runtime API address (`host:port`)
    ///
    /// # Optional Environment Variables
    /// - `RUNTIME_API_VERSION` - API version segment (default: "2018-06-01")
    /// - `RUNTIME_INITIALIZATION_TYPE` - `snap-start` enables restore
    /// - `RUNTIME_CONNECT_TIMEOUT_MS` - Connect timeout (default: 10000)
    /// - `RUNTIME_USER_AGENT` - User-Agent override
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let runtime_api = lookup("RUNTIME_API")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ClientError::Config("RUNTIME_API is required".to_string()))?;

        let api_version =
            lookup("RUNTIME_API_VERSION").unwrap_or_else(|| DEFAULT_API_VERSION.to_string());

        let restore_enabled = lookup("RUNTIME_INITIALIZATION_TYPE")
            .map(|v| v.trim().eq_ignore_ascii_case(SNAP_START_INITIALIZATION))
            .unwrap_or(false);

        let connect_timeout_ms = match lookup("RUNTIME_CONNECT_TIMEOUT_MS") {
            Some(v) => v.trim().parse().map_err(|e| {
                ClientError::Config(format!("invalid RUNTIME_CONNECT_TIMEOUT_MS: {}", e))
            })?,
            None => 10_000,
        };

        let user_agent = lookup("RUNTIME_USER_AGENT").unwrap_or_else(default_user_agent);

        Ok(Self {
            runtime_api,
            api_version,
            restore_enabled,
            connect_timeout_ms,
            user_agent,
        })
    }

    /// Create a new configuration for the given `host:port`.
    pub fn new(runtime_api: impl Into<String>) -> Self {
        Self {
            runtime_api: runtime_api.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            restore_enabled: false,
            connect_timeout_ms: 10_000,
            user_agent: default_user_agent(),
        }
    }

    /// Set the API version segment.
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Enable or disable the restore capability.
    pub fn with_restore_enabled(mut self, enabled: bool) -> Self {
        self.restore_enabled = enabled;
        self
    }

    /// Set the connect timeout.
    pub fn with_connect_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.connect_timeout_ms = timeout_ms;
        self
    }

    /// Set the User-Agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

fn default_user_agent() -> String {
    format!("runtime-api-sdk/{}", env!("CARGO_PKG_VERSION"))
}
