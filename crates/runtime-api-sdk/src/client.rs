// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Main SDK client for a function runtime talking to its host.

use std::error::Error;
use std::future::Future;
use std::sync::Arc;

use runtime_api_protocol::{ErrorReport, ErrorScope};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument};

use crate::backend::RuntimeBackend;
use crate::backend::http::HttpBackend;
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::types::{Invocation, ResponseBody};

/// High-level client for the runtime API.
///
/// Wraps a backend (HTTP or in-memory) and adds cancellation and the restore
/// capability check. Cloning is cheap; clones share the backend and its
/// connection pool.
///
/// # Example
///
/// ```ignore
/// use runtime_api_sdk::{ResponseBody, RuntimeClient};
/// use tokio_util::sync::CancellationToken;
///
/// let client = RuntimeClient::from_env()?;
/// let cancel = CancellationToken::new();
///
/// loop {
///     let invocation = client.next_invocation(&cancel).await?;
///     let (metadata, payload) = invocation.into_parts();
///     match handle(payload).await {
///         Ok(output) => client.send_response(metadata.request_id(), output.into(), &cancel).await?,
///         Err(e) => client.report_invocation_error(metadata.request_id(), &e, None, &cancel).await?,
///     }
/// }
/// ```
#[derive(Clone)]
pub struct RuntimeClient {
    /// Backend implementation, shared between clones
    backend: Arc<dyn RuntimeBackend>,
    /// Whether the snapshot restore operations may be used
    restore_enabled: bool,
}

impl RuntimeClient {
    // ========== Construction ==========

    /// Create a client that talks HTTP to the configured runtime API.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let backend = HttpBackend::new(&config)?;
        info!(
            base = %backend.endpoint().base(),
            restore_enabled = config.restore_enabled,
            "Runtime API client created"
        );
        Ok(Self {
            backend: Arc::new(backend),
            restore_enabled: config.restore_enabled,
        })
    }

    /// Create a client from environment variables.
    ///
    /// See [`ClientConfig::from_env`] for required and optional environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Create a client over any backend.
    pub fn with_backend(backend: Arc<dyn RuntimeBackend>, restore_enabled: bool) -> Self {
        Self {
            backend,
            restore_enabled,
        }
    }

    /// Whether [`await_restore`](Self::await_restore) and
    /// [`report_restore_error`](Self::report_restore_error) are available.
    pub fn restore_enabled(&self) -> bool {
        self.restore_enabled
    }

    // ========== Invocations ==========

    /// Wait for the next invocation.
    ///
    /// Blocks for as long as the host holds the long-poll open. Fails with a
    /// protocol error when the host omits `Request-Id`.
    #[instrument(skip(self, cancel))]
    pub async fn next_invocation(&self, cancel: &CancellationToken) -> Result<Invocation> {
        let invocation = cancellable(cancel, self.backend.next_invocation()).await?;
        info!(
            request_id = %invocation.request_id(),
            deadline_ms = ?invocation.metadata().deadline_epoch_millis(),
            "Invocation received"
        );
        Ok(invocation)
    }

    /// Send the output of an invocation.
    ///
    /// Returning `Ok` means the host accepted the output and considers the
    /// invocation finished. An empty `request_id` fails without a request.
    #[instrument(skip(self, body, cancel), fields(request_id = %request_id))]
    pub async fn send_response(
        &self,
        request_id: &str,
        body: ResponseBody,
        cancel: &CancellationToken,
    ) -> Result<()> {
        require_request_id(request_id)?;
        debug!(known_len = ?body.known_len(), "Sending response");
        cancellable(cancel, self.backend.send_response(request_id, body)).await?;
        debug!("Response accepted");
        Ok(())
    }

    // ========== Error reporting ==========

    /// Report a fault for `scope`.
    ///
    /// The error type is `error_type` when given, otherwise the name of the
    /// Rust type of `error`. The `source()` chain is reported as causes.
    #[instrument(skip(self, error, cancel), fields(scope = %scope.as_str()))]
    pub async fn report_error<E>(
        &self,
        scope: &ErrorScope,
        error: &E,
        error_type: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<()>
    where
        E: Error + ?Sized,
    {
        self.report(scope, &ErrorReport::from_error(error, error_type), cancel)
            .await
    }

    /// Report a bare error type string as the whole error signal.
    #[instrument(skip(self, cancel), fields(scope = %scope.as_str()))]
    pub async fn report_error_type(
        &self,
        scope: &ErrorScope,
        error_type: &str,
        cancel: &CancellationToken,
    ) -> Result<()> {
        self.report(scope, &ErrorReport::from_type(error_type), cancel)
            .await
    }

    /// Post a prebuilt report for `scope`.
    ///
    /// Restore-scoped reports require the restore capability; invocation-scoped
    /// ones need a non-empty request id.
    #[instrument(skip(self, report, cancel), fields(scope = %scope.as_str(), error_type = %report.error_type))]
    pub async fn report(
        &self,
        scope: &ErrorScope,
        report: &ErrorReport,
        cancel: &CancellationToken,
    ) -> Result<()> {
        match scope {
            ErrorScope::Restore => self.require_restore()?,
            ErrorScope::Invocation(request_id) => require_request_id(request_id)?,
            ErrorScope::Initialization => {}
        }
        error!(
            error_type = %report.error_type,
            error_message = %report.error_message,
            "Reporting error to host"
        );
        cancellable(cancel, self.backend.post_error(scope, report)).await
    }

    /// Report a fault during initialization. The host treats it as fatal.
    pub async fn report_init_error<E>(
        &self,
        error: &E,
        error_type: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<()>
    where
        E: Error + ?Sized,
    {
        self.report_error(&ErrorScope::Initialization, error, error_type, cancel)
            .await
    }

    /// Report a fault for one invocation. Polling may continue afterwards.
    pub async fn report_invocation_error<E>(
        &self,
        request_id: &str,
        error: &E,
        error_type: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<()>
    where
        E: Error + ?Sized,
    {
        let scope = ErrorScope::Invocation(request_id.to_string());
        self.report_error(&scope, error, error_type, cancel).await
    }

    // ========== Restore ==========

    /// Wait until the process is resumed from a snapshot.
    ///
    /// Anything established before the snapshot (connections, credentials,
    /// caches) may be stale once this returns.
    #[instrument(skip(self, cancel))]
    pub async fn await_restore(&self, cancel: &CancellationToken) -> Result<()> {
        self.require_restore()?;
        debug!("Waiting for restore");
        cancellable(cancel, self.backend.await_restore()).await?;
        info!("Resumed from snapshot");
        Ok(())
    }

    /// Report a fault raised while resuming from a snapshot.
    pub async fn report_restore_error<E>(
        &self,
        error: &E,
        error_type: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<()>
    where
        E: Error + ?Sized,
    {
        self.report_error(&ErrorScope::Restore, error, error_type, cancel)
            .await
    }

    fn require_restore(&self) -> Result<()> {
        if self.restore_enabled {
            Ok(())
        } else {
            Err(ClientError::RestoreUnavailable)
        }
    }
}

/// Outcomes are keyed by request id; an empty one has no invocation to address.
fn require_request_id(request_id: &str) -> Result<()> {
    if request_id.is_empty() {
        Err(ClientError::InvalidRequestId)
    } else {
        Ok(())
    }
}

/// Race `fut` against `cancel`. Cancellation wins ties and drops `fut`.
async fn cancellable<T, F>(cancel: &CancellationToken, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    if cancel.is_cancelled() {
        return Err(ClientError::Cancelled);
    }
    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            debug!("Operation cancelled");
            Err(ClientError::Cancelled)
        }
        result = fut => result,
    }
}
