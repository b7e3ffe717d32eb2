// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Echo Runtime - a complete function runtime built on runtime-api-sdk.
//!
//! This example shows:
//! - The Init → Restoring → Ready lifecycle, with `Failed` as the escape
//! - Reporting init and restore failures before exiting
//! - Polling, echoing JSON payloads and reporting bad ones per invocation
//! - Retrying transport failures with backoff, aborting on protocol errors
//! - Ctrl-C cancelling whatever call is in flight
//!
//! Run with: RUNTIME_API=127.0.0.1:9001 cargo run -p runtime-api-example --bin echo_runtime

use std::process::ExitCode;

use runtime_api_example::{
    DEFAULT_MAX_PAYLOAD_BYTES, Event, Phase, RetryConfig, handle_invocation,
};
use runtime_api_sdk::{CancellationToken, ErrorKind, RuntimeClient};
use tracing::{error, info, warn};

/// Function settings, loaded during init and again after a restore.
#[derive(Debug, Clone)]
struct Settings {
    max_payload_bytes: usize,
}

fn load_settings() -> Result<Settings, std::num::ParseIntError> {
    let max_payload_bytes = match std::env::var("ECHO_MAX_PAYLOAD_BYTES") {
        Ok(value) => value.trim().parse()?,
        Err(_) => DEFAULT_MAX_PAYLOAD_BYTES,
    };
    Ok(Settings { max_payload_bytes })
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Shutdown requested");
                cancel.cancel();
            }
        });
    }

    let client = match RuntimeClient::from_env() {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "Cannot create runtime client");
            return ExitCode::FAILURE;
        }
    };

    let mut phase = Phase::Init;
    let mut settings = None;

    loop {
        info!(?phase, "Lifecycle phase");
        phase = match phase {
            Phase::Init => match load_settings() {
                Ok(loaded) => {
                    settings = Some(loaded);
                    step(phase, Event::InitOk {
                        restore: client.restore_enabled(),
                    })
                }
                Err(e) => {
                    if let Err(report_err) = client
                        .report_init_error(&e, Some("Function.ConfigError"), &cancel)
                        .await
                    {
                        error!(error = %report_err, "Failed to report init error");
                    }
                    step(phase, Event::InitFailed)
                }
            },
            Phase::Restoring => match client.await_restore(&cancel).await {
                // Settings may be stale after a snapshot; load them again.
                Ok(()) => match load_settings() {
                    Ok(loaded) => {
                        settings = Some(loaded);
                        step(phase, Event::Restored)
                    }
                    Err(e) => {
                        report_restore_failure(&client, &e, &cancel).await;
                        step(phase, Event::RestoreFailed)
                    }
                },
                Err(e) if e.is_cancelled() => return ExitCode::SUCCESS,
                Err(e) => {
                    report_restore_failure(&client, &e, &cancel).await;
                    step(phase, Event::RestoreFailed)
                }
            },
            Phase::Ready => {
                let Some(settings) = settings.take() else {
                    error!("Ready without settings");
                    return ExitCode::FAILURE;
                };
                return serve(&client, &settings, &RetryConfig::default(), &cancel).await;
            }
            Phase::Failed => {
                error!("Runtime failed before becoming ready");
                return ExitCode::FAILURE;
            }
        };
    }
}

fn step(phase: Phase, event: Event) -> Phase {
    phase.advance(event).unwrap_or_else(|| {
        error!(?phase, ?event, "Invalid lifecycle transition");
        Phase::Failed
    })
}

async fn report_restore_failure<E>(client: &RuntimeClient, e: &E, cancel: &CancellationToken)
where
    E: std::error::Error,
{
    if let Err(report_err) = client
        .report_restore_error(e, Some("Restore.Failed"), cancel)
        .await
    {
        error!(error = %report_err, "Failed to report restore error");
    }
}

/// Poll and handle invocations until cancelled or a fatal error.
async fn serve(
    client: &RuntimeClient,
    settings: &Settings,
    retry: &RetryConfig,
    cancel: &CancellationToken,
) -> ExitCode {
    let mut failures = 0u32;

    loop {
        let invocation = match client.next_invocation(cancel).await {
            Ok(invocation) => {
                failures = 0;
                invocation
            }
            Err(e) if e.is_cancelled() => {
                info!("Stopped polling");
                return ExitCode::SUCCESS;
            }
            Err(e) if e.kind().is_retryable() => {
                failures += 1;
                if !retry.allows(failures) {
                    error!(error = %e, failures, "Giving up on the runtime API");
                    return ExitCode::FAILURE;
                }
                let delay = retry.delay_for_attempt(failures);
                warn!(error = %e, failures, delay_ms = delay.as_millis() as u64, "Poll failed, retrying");
                tokio::select! {
                    _ = cancel.cancelled() => return ExitCode::SUCCESS,
                    _ = tokio::time::sleep(delay) => continue,
                }
            }
            Err(e) => {
                error!(error = %e, kind = ?e.kind(), "Unrecoverable poll failure");
                return ExitCode::FAILURE;
            }
        };

        if let Err(e) =
            handle_invocation(client, settings.max_payload_bytes, invocation, cancel).await
        {
            match e.kind() {
                ErrorKind::Cancelled => return ExitCode::SUCCESS,
                ErrorKind::Application | ErrorKind::Transport => {
                    warn!(error = %e, "Invocation not completed, continuing");
                }
                _ => {
                    error!(error = %e, kind = ?e.kind(), "Unrecoverable failure");
                    return ExitCode::FAILURE;
                }
            }
        }
    }
}
