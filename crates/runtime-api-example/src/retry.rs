// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Backoff for retryable client errors.

use std::time::Duration;

/// Exponential backoff between retries of a transport failure.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries allowed in a row before giving up (0 = fail on first error).
    pub max_retries: u32,
    /// Delay before the first retry, in milliseconds.
    pub delay_ms: u64,
    /// Upper bound for any single delay, in milliseconds.
    pub max_delay_ms: u64,
}

impl RetryConfig {
    pub fn new(max_retries: u32, delay_ms: u64, max_delay_ms: u64) -> Self {
        Self {
            max_retries,
            delay_ms,
            max_delay_ms,
        }
    }

    /// Delay before retry `attempt` (1-indexed): `delay * 2^(attempt-1)`, capped.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let multiplier = 2u64.saturating_pow(attempt.saturating_sub(1));
        Duration::from_millis(self.delay_ms.saturating_mul(multiplier).min(self.max_delay_ms))
    }

    /// Whether another retry is allowed after `attempt` retries.
    pub fn allows(&self, attempt: u32) -> bool {
        attempt <= self.max_retries
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            delay_ms: 100,
            max_delay_ms: 5_000,
        }
    }
}
