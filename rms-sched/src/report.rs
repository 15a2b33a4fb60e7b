/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Per-CPU report: analysis + simulation + diagram, rendered as text.
//!
//! [`CpuReport::build`] is the whole per-worker pipeline.  The rendered block
//! looks like:
//!
//! ```text
//! CPU 1
//! Task scheduling information: A (WCET: 2, Period: 10), B (WCET: 4, Period: 15), C (WCET: 3, Period: 30)
//! Task set utilization: 0.57
//! Hyperperiod: 30
//! Rate Monotonic Algorithm execution for CPU 1:
//! Scheduling Diagram for CPU 1: A(2), B(4), C(3), Idle(1), ...
//!
//! ```
//!
//! followed by a blank line separating it from the next block.
//!
//! A schedulable set whose hyperperiod cannot be simulated (LCM overflow or
//! above the configured limit) still gets its block; the last line then
//! names the reason instead of a diagram.  The rest of the batch is not
//! affected.

use std::fmt::{self, Write as _};

use tracing::{debug, warn};

use crate::hyperperiod::{HyperperiodError, HyperperiodInfo};
use crate::scheduler::{analyze, Analysis, RmsSimulator, SchedulerError, Simulation, Verdict};
use crate::task::{TaskSet, Tick};
use crate::trace::{RunLengthDiagram, DEFAULT_IDLE_LABEL};

/// What the simulation phase produced for one CPU.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// `U > 1`; nothing was simulated.
    NotSchedulable,
    /// `bound < U ≤ 1`; nothing was simulated.
    Unknown,
    /// Schedulable, but the horizon is not representable or above the limit.
    HorizonTooLarge(HyperperiodError),
    /// Simulated over one hyperperiod.
    Scheduled {
        simulation: Simulation,
        diagram: RunLengthDiagram,
    },
}

/// Everything printed for one CPU.
#[derive(Debug, Clone)]
pub struct CpuReport {
    /// 1-based submission position.
    pub cpu: u64,
    /// Reporting copy of the tasks (the simulator works on its own copy).
    pub task_set: TaskSet,
    pub analysis: Analysis,
    /// `None` when the LCM of the periods overflows `u64`.
    pub hyperperiod: Option<Tick>,
    pub outcome: Outcome,
}

impl CpuReport {
    /// Analyze `task_set`, simulate it if schedulable and encode the trace.
    ///
    /// A hyperperiod that overflows or exceeds the simulator's limit is
    /// reported as [`Outcome::HorizonTooLarge`], not as an error.
    ///
    /// # Errors
    /// Only what [`analyze`] returns for a set it cannot analyze.
    pub fn build(
        cpu: u64,
        task_set: TaskSet,
        simulator: &RmsSimulator,
    ) -> Result<Self, SchedulerError> {
        let analysis = analyze(&task_set)?;
        let hyperperiod = HyperperiodInfo::calculate(&task_set);

        let outcome = match (analysis.verdict, &hyperperiod) {
            (Verdict::NotSchedulable, _) => Outcome::NotSchedulable,
            (Verdict::Unknown, _) => Outcome::Unknown,
            (Verdict::Schedulable, Err(e)) => {
                warn!(cpu, "not simulated: {e}");
                Outcome::HorizonTooLarge(e.clone())
            }
            (Verdict::Schedulable, Ok(info)) => {
                match simulator.run(&task_set, &analysis, info) {
                    Ok(simulation) => {
                        let diagram = RunLengthDiagram::encode(&simulation.trace);
                        debug!(
                            cpu,
                            runs = diagram.entries().len(),
                            ticks = diagram.total_ticks(),
                            "trace encoded"
                        );
                        Outcome::Scheduled {
                            simulation,
                            diagram,
                        }
                    }
                    Err(SchedulerError::Hyperperiod(e)) => {
                        warn!(cpu, "not simulated: {e}");
                        Outcome::HorizonTooLarge(e)
                    }
                    Err(e) => return Err(e),
                }
            }
        };

        Ok(Self {
            cpu,
            task_set,
            analysis,
            hyperperiod: hyperperiod.ok().map(|info| info.hyperperiod),
            outcome,
        })
    }

    /// Render the block, using `idle_label` for idle runs.
    pub fn render(&self, idle_label: &str) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_block(&mut out, idle_label);
        out
    }

    fn write_block(&self, out: &mut String, idle_label: &str) -> fmt::Result {
        let cpu = self.cpu;

        writeln!(out, "CPU {cpu}")?;

        out.push_str("Task scheduling information: ");
        for (i, task) in self.task_set.tasks().iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            write!(out, "{task}")?;
        }
        out.push('\n');

        writeln!(out, "Task set utilization: {:.2}", self.analysis.utilization)?;
        match self.hyperperiod {
            Some(h) => writeln!(out, "Hyperperiod: {h}")?,
            None => writeln!(out, "Hyperperiod: overflow")?,
        }
        writeln!(out, "Rate Monotonic Algorithm execution for CPU {cpu}:")?;

        match &self.outcome {
            Outcome::NotSchedulable => writeln!(out, "The task set is not schedulable")?,
            Outcome::Unknown => writeln!(out, "Task set schedulability is unknown")?,
            Outcome::HorizonTooLarge(e) => writeln!(out, "Schedule not simulated: {e}")?,
            Outcome::Scheduled { diagram, .. } => writeln!(
                out,
                "Scheduling Diagram for CPU {cpu}: {}",
                diagram.render(idle_label)
            )?,
        }

        out.push('\n');
        Ok(())
    }
}

impl fmt::Display for CpuReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(DEFAULT_IDLE_LABEL))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
