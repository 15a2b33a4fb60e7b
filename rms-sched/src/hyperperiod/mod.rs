//! Hyperperiod calculation.
//!
//! The hyperperiod of a set of periodic tasks is the Least Common Multiple
//! (LCM) of all their periods.  It is the smallest window after which the
//! whole schedule repeats, and therefore the simulation horizon.
//!
//! Periods are positive by construction of [`TaskSet`], so the only
//! failures are size-related, each with its own [`HyperperiodError`] variant:
//!
//! | Case | Result |
//! |------|--------|
//! | `(a / gcd) * b` does not fit in a `u64` | `Err(Overflow { a, b })` |
//! | horizon above the configured simulation limit | `Err(TooLarge { .. })` |

pub mod math;

use tracing::{debug, info, warn};

use crate::task::{Tick, TaskSet};
use math::lcm_of;

// ── Constants ─────────────────────────────────────────────────────────────────

/// Default upper limit on the number of ticks the simulator will run.
///
/// One trace symbol is stored per tick, so this also caps trace memory.
pub const DEFAULT_HYPERPERIOD_LIMIT: Tick = 10_000_000;

// ── Error type ────────────────────────────────────────────────────────────────

/// Errors that can occur during hyperperiod calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HyperperiodError {
    /// LCM calculation overflowed `u64`.
    ///
    /// Carries the two operands that caused the overflow.
    Overflow { a: Tick, b: Tick },

    /// The hyperperiod exceeds the simulation limit.
    TooLarge { value: Tick, limit: Tick },
}

impl std::fmt::Display for HyperperiodError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HyperperiodError::Overflow { a, b } => {
                write!(f, "LCM overflow computing lcm({a}, {b})")
            }
            HyperperiodError::TooLarge { value, limit } => write!(
                f,
                "hyperperiod of {value} ticks exceeds the simulation limit of {limit} ticks"
            ),
        }
    }
}

impl std::error::Error for HyperperiodError {}

// ── HyperperiodInfo ───────────────────────────────────────────────────────────

/// Calculated hyperperiod for one task set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HyperperiodInfo {
    /// Hyperperiod in ticks (LCM of all unique task periods).
    pub hyperperiod: Tick,

    /// Unique periods present in the task set (sorted, deduplicated).
    pub unique_periods: Vec<Tick>,

    /// Number of tasks that contributed to this hyperperiod.
    pub task_count: usize,
}

impl HyperperiodInfo {
    /// Calculate the hyperperiod of `task_set`.
    ///
    /// # Example
    /// ```rust
    /// use rms_sched::hyperperiod::HyperperiodInfo;
    /// use rms_sched::task::{Task, TaskSet};
    ///
    /// let set = TaskSet::new(vec![Task::new('A', 1, 25), Task::new('B', 1, 10), Task::new('C', 1, 20)]).unwrap();
    /// let info = HyperperiodInfo::calculate(&set).unwrap();
    /// assert_eq!(info.hyperperiod, 100);
    /// ```
    ///
    /// # Errors
    /// [`HyperperiodError::Overflow`] when the LCM exceeds `u64`.
    pub fn calculate(task_set: &TaskSet) -> Result<Self, HyperperiodError> {
        let mut unique_periods = task_set.periods();
        unique_periods.sort_unstable();
        unique_periods.dedup();

        let hyperperiod = lcm_of(unique_periods.iter().copied())?;

        info!(
            task_count = task_set.len(),
            unique_count = unique_periods.len(),
            hyperperiod,
            "Calculated hyperperiod"
        );
        for p in &unique_periods {
            debug!(period = p, "  unique period");
        }

        Ok(Self {
            hyperperiod,
            unique_periods,
            task_count: task_set.len(),
        })
    }

    /// Return the hyperperiod if it is a horizon the simulator may run.
    ///
    /// # Errors
    /// [`HyperperiodError::TooLarge`] when `hyperperiod > limit`.
    pub fn horizon(&self, limit: Tick) -> Result<Tick, HyperperiodError> {
        if self.hyperperiod > limit {
            warn!(
                hyperperiod = self.hyperperiod,
                limit, "Hyperperiod exceeds simulation limit"
            );
            return Err(HyperperiodError::TooLarge {
                value: self.hyperperiod,
                limit,
            });
        }
        Ok(self.hyperperiod)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Task;

    fn set_with_periods(periods: &[Tick]) -> TaskSet {
        let tasks = periods
            .iter()
            .zip('A'..)
            .map(|(&p, id)| Task::new(id, 1, p))
            .collect();
        TaskSet::new(tasks).unwrap()
    }

    #[test]
    fn hyperperiod_of_textbook_set() {
        let info = HyperperiodInfo::calculate(&set_with_periods(&[10, 15, 30])).unwrap();
        assert_eq!(info.hyperperiod, 30);
        assert_eq!(info.task_count, 3);
    }

    #[test]
    fn hyperperiod_is_order_independent() {
        let info = HyperperiodInfo::calculate(&set_with_periods(&[25, 10, 20])).unwrap();
        assert_eq!(info.hyperperiod, 100);
    }

    #[test]
    fn single_task_hyperperiod_is_its_period() {
        let info = HyperperiodInfo::calculate(&set_with_periods(&[7])).unwrap();
        assert_eq!(info.hyperperiod, 7);
    }

    #[test]
    fn unique_periods_are_sorted_and_deduped() {
        let info = HyperperiodInfo::calculate(&set_with_periods(&[5, 1, 5, 2])).unwrap();
        assert_eq!(info.unique_periods, vec![1, 2, 5]);
        assert_eq!(info.task_count, 4);
        assert_eq!(info.hyperperiod, 10);
    }

    #[test]
    fn overflow_is_reported() {
        let huge = Tick::MAX / 2 + 1;
        let result = HyperperiodInfo::calculate(&set_with_periods(&[huge, huge - 1]));
        assert!(matches!(result, Err(HyperperiodError::Overflow { .. })));
    }

    // ── horizon limit ─────────────────────────────────────────────────────────

    #[test]
    fn horizon_above_limit_is_too_large() {
        let info = HyperperiodInfo::calculate(&set_with_periods(&[3, 7])).unwrap();
        assert_eq!(
            info.horizon(20),
            Err(HyperperiodError::TooLarge {
                value: 21,
                limit: 20
            })
        );
    }

    #[test]
    fn horizon_exactly_at_limit_is_accepted() {
        let info = HyperperiodInfo::calculate(&set_with_periods(&[3, 7])).unwrap();
        assert_eq!(info.horizon(21), Ok(21));
    }

    #[test]
    fn too_large_display_names_both_values() {
        let msg = HyperperiodError::TooLarge {
            value: 21,
            limit: 20,
        }
        .to_string();
        assert!(msg.contains("21") && msg.contains("20"), "{msg}");
    }
}
