/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Core task data structures for the rate-monotonic simulator.
//!
//! Two types model one "processor" worth of input:
//!
//! ```text
//! input line ──(input::parse_line)──►  Vec<Task>  ──(TaskSet::new)──►  TaskSet
//!                                                                        │
//!                         analyzer (&TaskSet) ◄──────────────────────────┤
//!                         simulator (private copy of every Task) ◄───────┘
//! ```
//!
//! # Ownership model
//! A `TaskSet` is **owned** by exactly one orchestrator worker.  The simulator
//! never mutates it: it clones the tasks into its own run state, so the
//! per-tick `remaining` counter of one worker can never alias another worker's
//! (or the report's) copy.

use std::fmt;

use crate::scheduler::SchedulerError;

/// One unit of discrete virtual time.
///
/// Ticks are numbered from `1` to the hyperperiod (inclusive).
pub type Tick = u64;

/// Single printable symbol identifying a task within its task set.
pub type TaskId = char;

// ── Task ──────────────────────────────────────────────────────────────────────

/// A periodic task with an implicit deadline (deadline == period).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Identifier, unique within the owning task set.
    pub id: TaskId,

    /// Worst-case execution time per period, in ticks.
    pub wcet: Tick,

    /// Period in ticks.
    pub period: Tick,

    /// Execution still owed in the current period.
    ///
    /// Starts at `wcet`.  Only the simulator's private copy ever changes it.
    pub remaining: Tick,
}

impl Task {
    /// Create a task with its first allotment (`remaining == wcet`) in place.
    pub fn new(id: TaskId, wcet: Tick, period: Tick) -> Self {
        Self {
            id,
            wcet,
            period,
            remaining: wcet,
        }
    }

    /// CPU utilisation fraction: `wcet / period`.
    pub fn utilization(&self) -> f64 {
        self.wcet as f64 / self.period as f64
    }

    /// Returns `true` while the task still owes execution in this period.
    pub fn is_ready(&self) -> bool {
        self.remaining > 0
    }
}

impl fmt::Display for Task {
    /// Formats as `A (WCET: 2, Period: 10)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (WCET: {}, Period: {})",
            self.id, self.wcet, self.period
        )
    }
}

// ── TaskSet ───────────────────────────────────────────────────────────────────

/// The tasks of one processor, in input order.
///
/// Input order is only used for reporting; the simulator orders by priority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSet {
    tasks: Vec<Task>,
}

impl TaskSet {
    /// Validate and wrap `tasks`.
    ///
    /// # Errors
    /// * [`SchedulerError::EmptyTaskSet`] – no tasks (the L&L bound is undefined).
    /// * [`SchedulerError::InvalidTask`] – a zero `wcet` or `period`, or an id
    ///   that is not a printable symbol.
    /// * [`SchedulerError::DuplicateTaskId`] – two tasks share an id.
    pub fn new(tasks: Vec<Task>) -> Result<Self, SchedulerError> {
        if tasks.is_empty() {
            return Err(SchedulerError::EmptyTaskSet);
        }

        for (i, task) in tasks.iter().enumerate() {
            if task.id.is_whitespace() || task.id.is_control() {
                return Err(SchedulerError::InvalidTask {
                    id: task.id,
                    reason: "id must be a printable symbol",
                });
            }
            if task.wcet == 0 {
                return Err(SchedulerError::InvalidTask {
                    id: task.id,
                    reason: "WCET must be positive",
                });
            }
            if task.period == 0 {
                return Err(SchedulerError::InvalidTask {
                    id: task.id,
                    reason: "period must be positive",
                });
            }
            if tasks[..i].iter().any(|t| t.id == task.id) {
                return Err(SchedulerError::DuplicateTaskId { id: task.id });
            }
        }

        Ok(Self { tasks })
    }

    /// Tasks in input order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Number of tasks (always ≥ 1).
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Never `true` for a set built through [`TaskSet::new`].
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Total utilisation `Σ wcet_i / period_i`, summed in input order.
    pub fn utilization(&self) -> f64 {
        self.tasks.iter().map(Task::utilization).sum()
    }

    /// Periods in input order.
    pub fn periods(&self) -> Vec<Tick> {
        self.tasks.iter().map(|t| t.period).collect()
    }

    /// Deep copy of the tasks with every `remaining` reset to its `wcet`.
    ///
    /// This is the simulator's private working copy.
    pub fn fresh_copy(&self) -> Vec<Task> {
        self.tasks
            .iter()
            .map(|t| Task::new(t.id, t.wcet, t.period))
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
