// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Process lifecycle of a function runtime.
//!
//! ```text
//! Init ─┬─ InitOk { restore: true } ──▶ Restoring ─┬─ Restored ──▶ Ready ⟲
//!       ├─ InitOk { restore: false } ────────────────────────────▶ Ready
//!       └─ InitFailed ──▶ Failed ◀──────── RestoreFailed ─┘
//! ```
//!
//! `Ready` never goes back to `Init`. `Failed` is terminal; the process
//! exits once it has reported why.

/// Phase of the runtime process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Loading configuration and warming up
    Init,
    /// Waiting for the host to resume a snapshot
    Restoring,
    /// Polling and handling invocations
    Ready,
    /// Initialization or restore failed
    Failed,
}

/// Something that moves the process between phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Initialization finished; `restore` is the host's restore capability
    InitOk { restore: bool },
    /// Initialization failed and was reported
    InitFailed,
    /// The process was resumed from a snapshot
    Restored,
    /// Resuming failed and was reported
    RestoreFailed,
}

impl Phase {
    /// Phase after `event`, or `None` when the event is not valid here.
    pub fn advance(self, event: Event) -> Option<Phase> {
        match (self, event) {
            (Phase::Init, Event::InitOk { restore: true }) => Some(Phase::Restoring),
            (Phase::Init, Event::InitOk { restore: false }) => Some(Phase::Ready),
            (Phase::Init, Event::InitFailed) => Some(Phase::Failed),
            (Phase::Restoring, Event::Restored) => Some(Phase::Ready),
            (Phase::Restoring, Event::RestoreFailed) => Some(Phase::Failed),
            _ => None,
        }
    }

    /// Whether the process should stop.
    pub fn is_terminal(self) -> bool {
        self == Phase::Failed
    }
}
