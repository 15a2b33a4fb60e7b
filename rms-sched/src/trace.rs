/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Execution traces and their run-length encoded diagram.
//!
//! ```text
//! Trace:    A A B B B B C C C ·  ...      (one symbol per tick, · = idle)
//! Diagram:  A(2), B(4), C(3), Idle(1), ...
//! ```
//!
//! The idle marker is its own [`TraceSymbol`] variant, so it can never collide
//! with a task id.  Its label only exists in the rendered text.

use std::fmt;

use thiserror::Error;

use crate::task::{TaskId, Tick};

/// Label used for idle runs unless the configuration overrides it.
pub const DEFAULT_IDLE_LABEL: &str = "Idle";

// ── Trace ─────────────────────────────────────────────────────────────────────

/// What the CPU did during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraceSymbol {
    /// The task with this id executed.
    Task(TaskId),
    /// No task had execution left.
    Idle,
}

impl TraceSymbol {
    fn write_label(self, f: &mut impl fmt::Write, idle_label: &str) -> fmt::Result {
        match self {
            TraceSymbol::Task(id) => f.write_char(id),
            TraceSymbol::Idle => f.write_str(idle_label),
        }
    }
}

/// Ordered per-tick record of a simulation; index `i` is tick `i + 1`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trace {
    symbols: Vec<TraceSymbol>,
}

impl Trace {
    /// Empty trace with room for `ticks` symbols.
    pub fn with_capacity(ticks: usize) -> Self {
        Self {
            symbols: Vec::with_capacity(ticks),
        }
    }

    pub(crate) fn push(&mut self, symbol: TraceSymbol) {
        self.symbols.push(symbol);
    }

    pub fn symbols(&self) -> &[TraceSymbol] {
        &self.symbols
    }

    /// Number of ticks recorded.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Ticks in which some task executed.
    pub fn busy_ticks(&self) -> Tick {
        self.symbols.len() as Tick - self.idle_ticks()
    }

    /// Ticks in which the CPU idled.
    pub fn idle_ticks(&self) -> Tick {
        self.symbols
            .iter()
            .filter(|s| **s == TraceSymbol::Idle)
            .count() as Tick
    }

    /// Ticks executed by task `id`.
    pub fn executed_ticks(&self, id: TaskId) -> Tick {
        self.symbols
            .iter()
            .filter(|s| **s == TraceSymbol::Task(id))
            .count() as Tick
    }
}

impl FromIterator<TraceSymbol> for Trace {
    fn from_iter<I: IntoIterator<Item = TraceSymbol>>(iter: I) -> Self {
        Self {
            symbols: iter.into_iter().collect(),
        }
    }
}

// ── Run-length diagram ────────────────────────────────────────────────────────

/// One maximal run of identical symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunLengthEntry {
    pub symbol: TraceSymbol,
    /// Length of the run, always ≥ 1.
    pub count: Tick,
}

/// Run-length encoding of a [`Trace`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunLengthDiagram {
    entries: Vec<RunLengthEntry>,
}

impl RunLengthDiagram {
    /// Compress `trace`; adjacent entries always carry different symbols.
    ///
    /// An empty trace gives an empty diagram.
    pub fn encode(trace: &Trace) -> Self {
        let mut entries: Vec<RunLengthEntry> = Vec::new();

        for &symbol in trace.symbols() {
            match entries.last_mut() {
                Some(run) if run.symbol == symbol => run.count += 1,
                _ => entries.push(RunLengthEntry { symbol, count: 1 }),
            }
        }

        Self { entries }
    }

    /// Expand every entry back into `count` repeated symbols.
    pub fn expand(&self) -> Trace {
        self.entries
            .iter()
            .flat_map(|e| std::iter::repeat(e.symbol).take(e.count as usize))
            .collect()
    }

    pub fn entries(&self) -> &[RunLengthEntry] {
        &self.entries
    }

    /// Sum of all run lengths; equals the length of the encoded trace.
    pub fn total_ticks(&self) -> Tick {
        self.entries.iter().map(|e| e.count).sum()
    }

    /// Render as `A(2), B(4), Idle(1)` with a custom idle label.
    pub fn render(&self, idle_label: &str) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_to(&mut out, idle_label);
        out
    }

    fn write_to(&self, f: &mut impl fmt::Write, idle_label: &str) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            entry.symbol.write_label(f, idle_label)?;
            write!(f, "({})", entry.count)?;
        }
        Ok(())
    }

    /// Parse the rendered form back into a diagram.
    ///
    /// A label equal to `idle_label` is an idle run; any other label must be a
    /// single character.  Empty (or all-whitespace) input is an empty diagram.
    ///
    /// # Errors
    /// [`DiagramParseError`] naming the first malformed entry.
    pub fn parse(text: &str, idle_label: &str) -> Result<Self, DiagramParseError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }

        let entries = text
            .split(", ")
            .map(|raw| parse_entry(raw, idle_label))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { entries })
    }
}

impl fmt::Display for RunLengthDiagram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f, DEFAULT_IDLE_LABEL)
    }
}

/// Error returned by [`RunLengthDiagram::parse`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiagramParseError {
    #[error("entry '{0}' is not of the form label(count)")]
    Malformed(String),

    #[error("entry '{0}' has a count that is not a positive integer")]
    BadCount(String),

    #[error("entry '{0}' has a label that is neither the idle label nor a single symbol")]
    BadLabel(String),
}

fn parse_entry(raw: &str, idle_label: &str) -> Result<RunLengthEntry, DiagramParseError> {
    let raw = raw.trim();
    let (label, rest) = raw
        .split_once('(')
        .ok_or_else(|| DiagramParseError::Malformed(raw.to_string()))?;
    let digits = rest
        .strip_suffix(')')
        .ok_or_else(|| DiagramParseError::Malformed(raw.to_string()))?;

    let count: Tick = digits
        .parse()
        .ok()
        .filter(|&n| n > 0)
        .ok_or_else(|| DiagramParseError::BadCount(raw.to_string()))?;

    let symbol = if label == idle_label {
        TraceSymbol::Idle
    } else {
        let mut chars = label.chars();
        match (chars.next(), chars.next()) {
            (Some(id), None) => TraceSymbol::Task(id),
            _ => return Err(DiagramParseError::BadLabel(raw.to_string())),
        }
    };

    Ok(RunLengthEntry { symbol, count })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use super::TraceSymbol::{Idle, Task};

    fn trace(spec: &str) -> Trace {
        spec.chars()
            .map(|c| if c == '.' { Idle } else { Task(c) })
            .collect()
    }

    // ── encode ────────────────────────────────────────────────────────────────

    #[test]
    fn empty_trace_encodes_to_empty_diagram() {
        let d = RunLengthDiagram::encode(&Trace::default());
        assert!(d.entries().is_empty());
        assert_eq!(d.to_string(), "");
        assert_eq!(d.total_ticks(), 0);
    }

    #[test]
    fn single_tick_trace() {
        let d = RunLengthDiagram::encode(&trace("A"));
        assert_eq!(
            d.entries(),
            &[RunLengthEntry {
                symbol: Task('A'),
                count: 1
            }]
        );
        assert_eq!(d.to_string(), "A(1)");
    }

    #[test]
    fn no_repeated_runs_gives_unit_counts() {
        let d = RunLengthDiagram::encode(&trace("AB.C"));
        assert!(d.entries().iter().all(|e| e.count == 1));
        assert_eq!(d.to_string(), "A(1), B(1), Idle(1), C(1)");
    }

    #[test]
    fn runs_are_not_merged_across_a_change() {
        let d = RunLengthDiagram::encode(&trace("AAB..AA"));
        assert_eq!(d.to_string(), "A(2), B(1), Idle(2), A(2)");
        assert_eq!(d.total_ticks(), 7);
    }

    #[test]
    fn idle_label_can_be_overridden() {
        let d = RunLengthDiagram::encode(&trace("A..."));
        assert_eq!(d.render("idle"), "A(1), idle(3)");
    }

    #[test]
    fn task_named_i_does_not_collide_with_idle() {
        let d = RunLengthDiagram::encode(&trace("II."));
        assert_eq!(d.to_string(), "I(2), Idle(1)");
    }

    // ── expand / parse round trip ─────────────────────────────────────────────

    #[test]
    fn expand_reconstructs_the_trace() {
        for spec in ["", "A", "AAB..AA", "ABCABC", "...."] {
            let t = trace(spec);
            assert_eq!(RunLengthDiagram::encode(&t).expand(), t, "trace {spec:?}");
        }
    }

    #[test]
    fn parsing_the_rendered_diagram_reconstructs_the_trace() {
        for spec in ["", "A", "AAB..AA", "I.I"] {
            let t = trace(spec);
            let text = RunLengthDiagram::encode(&t).to_string();
            let parsed = RunLengthDiagram::parse(&text, DEFAULT_IDLE_LABEL).unwrap();
            assert_eq!(parsed.expand(), t, "diagram {text:?}");
        }
    }

    #[test]
    fn parse_rejects_malformed_entries() {
        assert!(matches!(
            RunLengthDiagram::parse("A2", "Idle"),
            Err(DiagramParseError::Malformed(_))
        ));
        assert!(matches!(
            RunLengthDiagram::parse("A(0)", "Idle"),
            Err(DiagramParseError::BadCount(_))
        ));
        assert!(matches!(
            RunLengthDiagram::parse("AB(3)", "Idle"),
            Err(DiagramParseError::BadLabel(_))
        ));
    }

    // ── statistics ────────────────────────────────────────────────────────────

    #[test]
    fn tick_statistics() {
        let t = trace("AAB..A");
        assert_eq!(t.len(), 6);
        assert_eq!(t.idle_ticks(), 2);
        assert_eq!(t.busy_ticks(), 4);
        assert_eq!(t.executed_ticks('A'), 3);
        assert_eq!(t.executed_ticks('Z'), 0);
    }
}
