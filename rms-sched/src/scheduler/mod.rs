//! Tick-by-tick rate-monotonic simulation of one task set.
//!
//! [`RmsSimulator`] runs a task set the analyzer accepted over exactly one
//! hyperperiod and returns its [`Trace`]: one [`TraceSymbol`] per tick.
//!
//! # Per-tick rules
//!
//! | Step | Rule |
//! |---|---|
//! | select | highest task under [`rms_priority`] |
//! | execute | if it still owes work: emit its id, `remaining -= 1`; else emit idle |
//! | replenish | every task with `tick % period == 0` and `tick != 1` gets `remaining += wcet` |
//!
//! Tick 1 is exempt from replenishment because every task already starts with
//! `remaining == wcet`.  A task that still owes work at its replenishment point
//! has missed a deadline; the miss is recorded in [`Simulation`] and the
//! backlog carries over.
//!
//! # State
//! The simulator is stateless; each run clones the task set into a private
//! working copy, so one `RmsSimulator` can be shared by any number of threads.
//!
//! # Example
//! ```rust
//! use rms_sched::scheduler::{analyze, RmsSimulator};
//! use rms_sched::hyperperiod::HyperperiodInfo;
//! use rms_sched::task::{Task, TaskSet};
//!
//! let set = TaskSet::new(vec![Task::new('A', 1, 2), Task::new('B', 1, 4)]).unwrap();
//! let analysis = analyze(&set).unwrap();
//! let hp = HyperperiodInfo::calculate(&set).unwrap();
//! let sim = RmsSimulator::new().run(&set, &analysis, &hp).unwrap();
//! assert_eq!(sim.trace.len(), 4);
//! ```

pub mod error;
pub mod feasibility;

pub use error::SchedulerError;
pub use feasibility::{analyze, Analysis, Verdict};

use std::cmp::Ordering;

use tracing::{debug, info, warn};

use crate::hyperperiod::{HyperperiodInfo, DEFAULT_HYPERPERIOD_LIMIT};
use crate::task::{Task, TaskId, TaskSet, Tick};
use crate::trace::{Trace, TraceSymbol};

// ── Priority order ────────────────────────────────────────────────────────────

/// Total order over ready state; `Greater` means "runs first".
///
/// 1. A task that owes work outranks one that does not.
/// 2. Between two tasks that owe nothing, the larger period ranks higher.
///    Neither executes, so this only fixes which one is selected.
/// 3. Between two tasks that owe work, the smaller period wins (rate
///    monotonic); on equal periods the higher id wins.
pub fn rms_priority(a: &Task, b: &Task) -> Ordering {
    match (a.is_ready(), b.is_ready()) {
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.period.cmp(&b.period),
        (true, true) => b.period.cmp(&a.period).then_with(|| a.id.cmp(&b.id)),
    }
}

// ── Results ───────────────────────────────────────────────────────────────────

/// A job that was still unfinished when its task's next period began.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeadlineMiss {
    pub task: TaskId,
    /// Tick at whose end the next job was released.
    pub tick: Tick,
    /// Execution still owed when the new job arrived.
    pub backlog: Tick,
}

/// Output of one simulation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Simulation {
    /// Number of ticks simulated.
    pub horizon: Tick,
    /// One symbol per tick; `trace.len() == horizon`.
    pub trace: Trace,
    pub deadline_misses: Vec<DeadlineMiss>,
}

// ── RmsSimulator ──────────────────────────────────────────────────────────────

/// Rate-monotonic simulator with a cap on the simulated horizon.
#[derive(Debug, Clone, Copy)]
pub struct RmsSimulator {
    hyperperiod_limit: Tick,
}

impl RmsSimulator {
    /// Simulator with [`DEFAULT_HYPERPERIOD_LIMIT`].
    pub fn new() -> Self {
        Self {
            hyperperiod_limit: DEFAULT_HYPERPERIOD_LIMIT,
        }
    }

    /// Simulator refusing hyperperiods above `hyperperiod_limit` ticks.
    pub fn with_limit(hyperperiod_limit: Tick) -> Self {
        Self { hyperperiod_limit }
    }

    pub fn hyperperiod_limit(&self) -> Tick {
        self.hyperperiod_limit
    }

    /// Simulate `task_set` over its hyperperiod.
    ///
    /// # Errors
    /// * [`SchedulerError::NotSimulatable`] – the verdict is not
    ///   [`Verdict::Schedulable`].
    /// * [`SchedulerError::Hyperperiod`] – the hyperperiod exceeds the limit.
    pub fn run(
        &self,
        task_set: &TaskSet,
        analysis: &Analysis,
        hyperperiod: &HyperperiodInfo,
    ) -> Result<Simulation, SchedulerError> {
        if !analysis.verdict.should_simulate() {
            return Err(SchedulerError::NotSimulatable {
                verdict: analysis.verdict,
            });
        }

        let horizon = hyperperiod.horizon(self.hyperperiod_limit)?;
        Ok(simulate(task_set, horizon))
    }
}

impl Default for RmsSimulator {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the per-tick rules for ticks `1..=horizon`, whatever the verdict.
pub fn simulate(task_set: &TaskSet, horizon: Tick) -> Simulation {
    let mut tasks = task_set.fresh_copy();
    let mut trace = Trace::with_capacity(horizon as usize);
    let mut deadline_misses = Vec::new();

    info!(
        task_count = tasks.len(),
        horizon, "=== RMS simulation start ==="
    );

    for tick in 1..=horizon {
        trace.push(execute_one_tick(&mut tasks));

        if tick == 1 {
            continue;
        }
        for task in tasks.iter_mut().filter(|t| tick % t.period == 0) {
            if task.remaining > 0 {
                warn!(
                    task = %task.id,
                    tick,
                    backlog = task.remaining,
                    "deadline miss"
                );
                deadline_misses.push(DeadlineMiss {
                    task: task.id,
                    tick,
                    backlog: task.remaining,
                });
            }
            task.remaining += task.wcet;
        }
    }

    debug!(
        busy = trace.busy_ticks(),
        idle = trace.idle_ticks(),
        misses = deadline_misses.len(),
        "=== RMS simulation complete ==="
    );

    Simulation {
        horizon,
        trace,
        deadline_misses,
    }
}

/// Select the highest-priority task and let it run for one tick.
fn execute_one_tick(tasks: &mut [Task]) -> TraceSymbol {
    match tasks.iter_mut().max_by(|a, b| rms_priority(a, b)) {
        Some(task) if task.is_ready() => {
            task.remaining -= 1;
            TraceSymbol::Task(task.id)
        }
        _ => TraceSymbol::Idle,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::RunLengthDiagram;

    fn set(tasks: &[(char, u64, u64)]) -> TaskSet {
        TaskSet::new(
            tasks
                .iter()
                .map(|&(id, wcet, period)| Task::new(id, wcet, period))
                .collect(),
        )
        .unwrap()
    }

    fn run(tasks: &[(char, u64, u64)]) -> Simulation {
        let s = set(tasks);
        let analysis = analyze(&s).unwrap();
        let hp = HyperperiodInfo::calculate(&s).unwrap();
        RmsSimulator::new().run(&s, &analysis, &hp).unwrap()
    }

    fn diagram(sim: &Simulation) -> String {
        RunLengthDiagram::encode(&sim.trace).to_string()
    }

    // ── rms_priority ──────────────────────────────────────────────────────────

    fn task(id: char, period: u64, remaining: u64) -> Task {
        Task {
            id,
            wcet: 1,
            period,
            remaining,
        }
    }

    #[test]
    fn ready_task_outranks_finished_task_regardless_of_period() {
        let ready = task('A', 100, 1);
        let done = task('B', 1, 0);
        assert_eq!(rms_priority(&ready, &done), Ordering::Greater);
        assert_eq!(rms_priority(&done, &ready), Ordering::Less);
    }

    #[test]
    fn shorter_period_wins_among_ready_tasks() {
        assert_eq!(
            rms_priority(&task('Z', 5, 1), &task('A', 10, 1)),
            Ordering::Greater
        );
    }

    #[test]
    fn equal_periods_break_ties_by_higher_id() {
        assert_eq!(
            rms_priority(&task('B', 5, 1), &task('A', 5, 1)),
            Ordering::Greater
        );
    }

    #[test]
    fn finished_tasks_order_larger_period_first() {
        assert_eq!(
            rms_priority(&task('A', 30, 0), &task('B', 10, 0)),
            Ordering::Greater
        );
    }

    // ── run ───────────────────────────────────────────────────────────────────

    #[test]
    fn textbook_set_produces_expected_schedule() {
        let sim = run(&[('A', 2, 10), ('B', 4, 15), ('C', 3, 30)]);
        assert_eq!(sim.horizon, 30);
        assert_eq!(sim.trace.len(), 30);
        assert_eq!(
            diagram(&sim),
            "A(2), B(4), C(3), Idle(1), A(2), Idle(3), B(4), Idle(1), A(2), Idle(8)"
        );
        assert!(sim.deadline_misses.is_empty());
    }

    #[test]
    fn every_job_completes_within_the_hyperperiod() {
        let sim = run(&[('A', 2, 10), ('B', 4, 15), ('C', 3, 30)]);
        assert_eq!(sim.trace.executed_ticks('A'), 6);
        assert_eq!(sim.trace.executed_ticks('B'), 8);
        assert_eq!(sim.trace.executed_ticks('C'), 3);
        assert_eq!(sim.trace.idle_ticks(), 13);
    }

    #[test]
    fn higher_priority_release_preempts_running_task() {
        // A's second job arrives at the end of tick 2 and interrupts B.
        let sim = run(&[('A', 1, 2), ('B', 2, 8)]);
        assert_eq!(diagram(&sim), "A(1), B(1), A(1), B(1), A(1), Idle(1), A(1), Idle(1)");
    }

    #[test]
    fn equal_periods_run_higher_id_first() {
        let sim = run(&[('A', 1, 4), ('B', 1, 4)]);
        assert_eq!(diagram(&sim), "B(1), A(1), Idle(2)");
    }

    #[test]
    fn single_task_at_full_load_never_idles() {
        let sim = run(&[('A', 3, 3)]);
        assert_eq!(diagram(&sim), "A(3)");
    }

    #[test]
    fn period_one_task_skips_the_tick_one_replenishment() {
        let sim = simulate(&set(&[('A', 1, 1)]), 4);
        assert_eq!(diagram(&sim), "A(1), Idle(1), A(2)");
    }

    #[test]
    fn simulation_is_deterministic() {
        let tasks = [('C', 1, 6), ('A', 1, 3), ('B', 1, 6), ('D', 1, 12)];
        let first = run(&tasks);
        let second = run(&tasks);
        assert_eq!(first, second);
        assert_eq!(diagram(&first), diagram(&second));
    }

    #[test]
    fn run_leaves_the_task_set_untouched() {
        let s = set(&[('A', 2, 5)]);
        let before = s.clone();
        let _ = simulate(&s, 10);
        assert_eq!(s, before);
    }

    // ── errors ────────────────────────────────────────────────────────────────

    #[test]
    fn unknown_verdict_is_not_simulated() {
        let s = set(&[('A', 1, 2), ('B', 1, 3)]);
        let analysis = analyze(&s).unwrap();
        let hp = HyperperiodInfo::calculate(&s).unwrap();
        let err = RmsSimulator::new().run(&s, &analysis, &hp).unwrap_err();
        assert!(matches!(
            err,
            SchedulerError::NotSimulatable {
                verdict: Verdict::Unknown
            }
        ));
    }

    #[test]
    fn hyperperiod_above_limit_is_rejected() {
        let s = set(&[('A', 1, 7), ('B', 1, 11)]);
        let analysis = analyze(&s).unwrap();
        let hp = HyperperiodInfo::calculate(&s).unwrap();
        let err = RmsSimulator::with_limit(50)
            .run(&s, &analysis, &hp)
            .unwrap_err();
        assert!(matches!(err, SchedulerError::Hyperperiod(_)));
    }

    // ── deadline misses ───────────────────────────────────────────────────────

    #[test]
    fn overloaded_set_records_deadline_misses() {
        let sim = simulate(&set(&[('A', 3, 4), ('B', 2, 4)]), 8);
        assert!(!sim.deadline_misses.is_empty());
        // B wins the equal-period tie, so A is the one still owing at tick 4.
        let first = sim.deadline_misses[0];
        assert_eq!(first.task, 'A');
        assert_eq!(first.tick, 4);
        assert_eq!(first.backlog, 1);
    }
}
