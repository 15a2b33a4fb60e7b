/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Structured error type for task-set construction, analysis and simulation.
//!
//! Every variant carries the offending id or value so the orchestrator can log
//! it with full context before aborting the run.
//!
//! **Do not** replace these with `anyhow::Error` in library paths; `anyhow` is
//! reserved for `main` and configuration loading.

use thiserror::Error;

use super::feasibility::Verdict;
use crate::hyperperiod::HyperperiodError;
use crate::task::TaskId;

/// Error returned by [`TaskSet::new`](crate::task::TaskSet::new),
/// [`analyze`](super::feasibility::analyze) and
/// [`RmsSimulator::run`](super::RmsSimulator::run).
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The task set has no tasks, so the Liu & Layland bound is undefined.
    #[error("task set is empty: at least one task is required")]
    EmptyTaskSet,

    /// A task carries a parameter the model cannot represent.
    #[error("task '{id}' is invalid: {reason}")]
    InvalidTask { id: TaskId, reason: &'static str },

    /// Two tasks in one set share an identifier.
    #[error("task id '{id}' appears more than once in the task set")]
    DuplicateTaskId { id: TaskId },

    /// The simulator was handed a task set the analyzer did not accept.
    #[error("only schedulable task sets are simulated (verdict: {verdict:?})")]
    NotSimulatable { verdict: Verdict },

    /// The hyperperiod could not be computed or is too large to simulate.
    #[error(transparent)]
    Hyperperiod(#[from] HyperperiodError),
}
