/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Rate-monotonic schedulability analysis.
//!
//! # Theory
//! **Liu & Layland (1973)**: under Rate Monotonic scheduling (shorter period →
//! higher priority), a set of `n` independent periodic tasks is **guaranteed**
//! schedulable on one CPU if:
//!
//! $$U = \sum_{i=1}^{n} \frac{C_i}{T_i} \leq n \left(2^{1/n} - 1\right)$$
//!
//! The bound tightens as `n` grows, converging to `ln(2) ≈ 0.693`.
//!
//! | n | Bound |
//! |---|---|
//! | 1 | 1.000 |
//! | 2 | 0.828 |
//! | 3 | 0.780 |
//! | 5 | 0.743 |
//! | ∞ | ln(2) ≈ 0.693 |
//!
//! The test is sufficient only.  A set with `bound < U ≤ 1.0` is reported as
//! [`Verdict::Unknown`] and is not simulated; no exact (response-time) test is
//! run for it.

use tracing::info;

use super::SchedulerError;
use crate::task::TaskSet;

// ── Verdict ───────────────────────────────────────────────────────────────────

/// Outcome of the utilisation test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// `U ≤ bound`: guaranteed schedulable, the simulation runs.
    Schedulable,
    /// `U > 1`: no single CPU can carry the load.
    NotSchedulable,
    /// `bound < U ≤ 1`: the sufficient test does not decide.
    Unknown,
}

impl Verdict {
    /// Only [`Verdict::Schedulable`] sets are simulated.
    pub fn should_simulate(self) -> bool {
        self == Verdict::Schedulable
    }
}

/// Classify a utilisation against a bound.
///
/// Overload is checked first, then the inclusive bound comparison.
pub fn classify(utilization: f64, bound: f64) -> Verdict {
    if utilization > 1.0 {
        Verdict::NotSchedulable
    } else if utilization <= bound {
        Verdict::Schedulable
    } else {
        Verdict::Unknown
    }
}

// ── Bound ─────────────────────────────────────────────────────────────────────

/// Compute the Liu & Layland utilisation bound for `n` tasks.
///
/// `U_bound(n) = n × (2^(1/n) − 1)`
///
/// Returns `1.0` for `n = 1` and `0.0` for `n = 0` (callers reject empty sets
/// before getting here).
pub fn liu_layland_bound(n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let nf = n as f64;
    nf * (2.0_f64.powf(1.0 / nf) - 1.0)
}

// ── Analysis ──────────────────────────────────────────────────────────────────

/// Derived schedulability figures for one task set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Analysis {
    /// `Σ wcet_i / period_i`.
    pub utilization: f64,
    /// Liu & Layland bound for `task_count` tasks.
    pub bound: f64,
    /// Number of tasks the bound was computed for.
    pub task_count: usize,
    pub verdict: Verdict,
}

/// Run the utilisation test on `task_set`.
///
/// # Errors
/// [`SchedulerError::EmptyTaskSet`] if the set has no tasks.
pub fn analyze(task_set: &TaskSet) -> Result<Analysis, SchedulerError> {
    if task_set.is_empty() {
        return Err(SchedulerError::EmptyTaskSet);
    }

    let task_count = task_set.len();
    let utilization = task_set.utilization();
    let bound = liu_layland_bound(task_count);
    let verdict = classify(utilization, bound);

    info!(
        task_count,
        utilization,
        bound,
        verdict = ?verdict,
        "Schedulability analysis"
    );

    Ok(Analysis {
        utilization,
        bound,
        task_count,
        verdict,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Task;

    fn set(tasks: &[(char, u64, u64)]) -> TaskSet {
        TaskSet::new(
            tasks
                .iter()
                .map(|&(id, wcet, period)| Task::new(id, wcet, period))
                .collect(),
        )
        .unwrap()
    }

    // ── liu_layland_bound ─────────────────────────────────────────────────────

    #[test]
    fn bound_zero_tasks_is_zero() {
        assert_eq!(liu_layland_bound(0), 0.0);
    }

    #[test]
    fn bound_one_task_is_one() {
        let b = liu_layland_bound(1);
        assert!((b - 1.0).abs() < 1e-10, "bound(1) should be 1.0, got {b}");
    }

    #[test]
    fn bound_two_tasks_is_approximately_0_828() {
        let b = liu_layland_bound(2);
        assert!((b - 0.8284).abs() < 1e-3, "bound(2) ≈ 0.828, got {b}");
    }

    #[test]
    fn bound_converges_toward_ln2() {
        let b = liu_layland_bound(1000);
        assert!(
            (b - 2.0_f64.ln()).abs() < 1e-3,
            "bound(1000) should be close to ln(2) ≈ 0.6931, got {b}"
        );
    }

    // ── classify ──────────────────────────────────────────────────────────────

    #[test]
    fn utilization_above_one_is_not_schedulable() {
        assert_eq!(classify(1.0001, 1.0), Verdict::NotSchedulable);
    }

    #[test]
    fn utilization_exactly_at_bound_is_schedulable() {
        let b = liu_layland_bound(3);
        assert_eq!(classify(b, b), Verdict::Schedulable);
    }

    #[test]
    fn utilization_between_bound_and_one_is_unknown() {
        assert_eq!(classify(0.9, liu_layland_bound(2)), Verdict::Unknown);
    }

    #[test]
    fn full_utilization_with_several_tasks_is_unknown() {
        assert_eq!(classify(1.0, liu_layland_bound(2)), Verdict::Unknown);
    }

    // ── analyze ───────────────────────────────────────────────────────────────

    #[test]
    fn textbook_set_is_schedulable() {
        let a = analyze(&set(&[('A', 2, 10), ('B', 4, 15), ('C', 3, 30)])).unwrap();
        assert!((a.utilization - 0.5667).abs() < 1e-4);
        assert_eq!(a.task_count, 3);
        assert_eq!(a.verdict, Verdict::Schedulable);
        assert!(a.verdict.should_simulate());
    }

    #[test]
    fn single_task_at_full_load_meets_the_inclusive_bound() {
        let a = analyze(&set(&[('A', 3, 3)])).unwrap();
        assert_eq!(a.utilization, 1.0);
        assert_eq!(a.bound, 1.0);
        assert_eq!(a.verdict, Verdict::Schedulable);
    }

    #[test]
    fn overloaded_set_is_not_schedulable() {
        let a = analyze(&set(&[('A', 3, 4), ('B', 2, 4)])).unwrap();
        assert!((a.utilization - 1.25).abs() < 1e-12);
        assert_eq!(a.verdict, Verdict::NotSchedulable);
        assert!(!a.verdict.should_simulate());
    }

    #[test]
    fn set_between_bound_and_one_is_unknown() {
        // 1/2 + 1/3 = 0.833 > bound(2) ≈ 0.828
        let a = analyze(&set(&[('A', 1, 2), ('B', 1, 3)])).unwrap();
        assert_eq!(a.verdict, Verdict::Unknown);
        assert!(!a.verdict.should_simulate());
    }
}
