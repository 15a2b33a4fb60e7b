/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Errors that end an orchestration run.
//!
//! Every variant names the CPU (1-based submission position) it concerns.
//! [`OrchestratorError::Aborted`] is a consequence, never a cause: when a run
//! fails, [`run_ordered`](super::run_ordered) returns the root cause and
//! discards the `Aborted` errors of the workers it woke up.

use std::io;

use thiserror::Error;

use crate::scheduler::SchedulerError;

#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// The OS refused to create the worker thread.
    #[error("failed to spawn worker thread for CPU {cpu}")]
    WorkerSpawn {
        cpu: u64,
        #[source]
        source: io::Error,
    },

    /// Analysis or simulation failed inside the worker.
    #[error("worker for CPU {cpu} failed")]
    Worker {
        cpu: u64,
        #[source]
        source: SchedulerError,
    },

    /// Writing the report to the output sink failed.
    #[error("failed to write report for CPU {cpu}")]
    Output {
        cpu: u64,
        #[source]
        source: io::Error,
    },

    /// The worker thread panicked.
    #[error("worker for CPU {cpu} panicked")]
    WorkerPanicked { cpu: u64 },

    /// The run was aborted before this CPU's turn came.
    #[error("CPU {cpu} was not reported because the run was aborted")]
    Aborted { cpu: u64 },
}

impl OrchestratorError {
    /// `true` for errors that only follow from another worker's failure.
    pub fn is_consequence(&self) -> bool {
        matches!(self, OrchestratorError::Aborted { .. })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
