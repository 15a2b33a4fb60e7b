/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! One worker thread per task set, reports emitted in submission order.
//!
//! ```text
//!             spawn all (gate closed)          open gate
//! task sets ──► cpu-1 ─ analyze/simulate/encode ─► wait_turn(1) ─► publish ─► advance
//!           ──► cpu-2 ─ analyze/simulate/encode ─► wait_turn(2) ─► publish ─► advance
//!           ──► cpu-N ─ ...                                    (runs in parallel until here)
//! ```
//!
//! Sequence numbers are assigned `1..=N` from the input order before any
//! worker starts, so the turnstile can never wait on a missing number.  Each
//! worker owns its [`TaskSet`]; the only shared state is the [`Sequencer`].
//!
//! Failure handling:
//!
//! | Failure | Effect |
//! |---|---|
//! | thread spawn fails | gate never opens, run aborted, no output |
//! | pipeline error in a worker | run aborted, reports after it are not written |
//! | worker panics | same as a pipeline error |
//! | sink write fails | same as a pipeline error |

pub mod error;
pub mod sequencer;

pub use error::OrchestratorError;
pub use sequencer::{Sequencer, SequencerError, Turn};

use std::io::Write;
use std::thread;

use tracing::{debug, error, info};

use crate::config::RunConfig;
use crate::report::CpuReport;
use crate::scheduler::SchedulerError;
use crate::task::TaskSet;

// ── Orchestrator ──────────────────────────────────────────────────────────────

/// Runs the full per-CPU pipeline for a batch of task sets.
#[derive(Debug, Clone, Default)]
pub struct Orchestrator {
    config: RunConfig,
}

impl Orchestrator {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    /// Analyze, simulate and report every task set, writing the reports to
    /// `sink` in input order.  Returns the sink once every worker has joined.
    ///
    /// # Errors
    /// The first root-cause [`OrchestratorError`] of the run.
    pub fn run<W>(&self, task_sets: Vec<TaskSet>, sink: W) -> Result<W, OrchestratorError>
    where
        W: Write + Send,
    {
        let simulator = self.config.simulator();
        let idle_label = self.config.idle_label.as_str();

        run_ordered(task_sets, sink, |cpu, task_set| {
            CpuReport::build(cpu, task_set, &simulator).map(|report| report.render(idle_label))
        })
    }
}

// ── Generic ordered runner ────────────────────────────────────────────────────

/// Run `work` for every task set on its own thread and publish the returned
/// text to `sink` in input order.
///
/// `work` receives the 1-based sequence number and an owned task set.
///
/// # Errors
/// The first root-cause [`OrchestratorError`]; see the module docs.
pub fn run_ordered<W, F>(task_sets: Vec<TaskSet>, sink: W, work: F) -> Result<W, OrchestratorError>
where
    W: Write + Send,
    F: Fn(u64, TaskSet) -> Result<String, SchedulerError> + Sync,
{
    let sequencer = Sequencer::gated(sink);
    let worker_count = task_sets.len();

    info!(workers = worker_count, "=== Orchestrator start ===");

    let mut errors: Vec<OrchestratorError> = thread::scope(|scope| {
        let mut handles = Vec::with_capacity(worker_count);
        let mut spawn_error = None;

        for (seq, task_set) in (1u64..).zip(task_sets) {
            let sequencer = &sequencer;
            let work = &work;

            let spawned = thread::Builder::new()
                .name(format!("cpu-{seq}"))
                .spawn_scoped(scope, move || run_worker(seq, task_set, sequencer, work));

            match spawned {
                Ok(handle) => handles.push((seq, handle)),
                Err(source) => {
                    error!(cpu = seq, "failed to spawn worker: {source}");
                    sequencer.abort();
                    spawn_error = Some(OrchestratorError::WorkerSpawn { cpu: seq, source });
                    break;
                }
            }
        }

        if spawn_error.is_none() {
            debug!(workers = handles.len(), "all workers spawned, opening output gate");
            sequencer.open();
        }

        spawn_error
            .into_iter()
            .chain(handles.into_iter().filter_map(|(seq, handle)| {
                match handle.join() {
                    Ok(result) => result.err(),
                    Err(_) => Some(OrchestratorError::WorkerPanicked { cpu: seq }),
                }
            }))
            .collect()
    });

    if errors.is_empty() {
        info!(workers = worker_count, "=== Orchestrator complete ===");
        return Ok(sequencer.into_inner());
    }

    let root = errors
        .iter()
        .position(|e| !e.is_consequence())
        .unwrap_or(0);
    Err(errors.swap_remove(root))
}

/// Body of one worker thread.
fn run_worker<W, F>(
    seq: u64,
    task_set: TaskSet,
    sequencer: &Sequencer<W>,
    work: &F,
) -> Result<(), OrchestratorError>
where
    W: Write,
    F: Fn(u64, TaskSet) -> Result<String, SchedulerError>,
{
    let _abort_on_panic = AbortOnPanic(sequencer);

    debug!(cpu = seq, tasks = task_set.len(), "worker started");

    let text = match work(seq, task_set) {
        Ok(text) => text,
        Err(source) => {
            error!(cpu = seq, "worker failed: {source}");
            sequencer.abort();
            return Err(OrchestratorError::Worker { cpu: seq, source });
        }
    };

    let mut turn = sequencer
        .wait_turn(seq)
        .map_err(|_| OrchestratorError::Aborted { cpu: seq })?;

    // A failed write drops the turn un-advanced, which aborts the run.
    turn.publish(&text)
        .map_err(|source| OrchestratorError::Output { cpu: seq, source })?;
    turn.advance();

    debug!(cpu = seq, "report published");
    Ok(())
}

/// Aborts the sequencer if the worker unwinds before its turn.
struct AbortOnPanic<'a, W: Write>(&'a Sequencer<W>);

impl<W: Write> Drop for AbortOnPanic<'_, W> {
    fn drop(&mut self) {
        if thread::panicking() {
            self.0.abort();
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
