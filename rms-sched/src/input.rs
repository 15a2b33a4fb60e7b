/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Line-oriented task-set input.
//!
//! One line describes one processor as whitespace-separated
//! `<id> <wcet> <period>` triples:
//!
//! ```text
//! A 2 10 B 4 15 C 3 30
//! X 1 4 Y 1 4
//! exit
//! ```
//!
//! A line is consumed triple by triple and consumption stops at the first
//! malformed triple, so a bad token truncates the task set instead of
//! rejecting the line.  Lines that yield no task at all are skipped and get
//! no sequence number.

use std::collections::HashSet;
use std::io::{self, BufRead};

use tracing::{debug, warn};

use crate::task::{Task, TaskSet, Tick};

/// Input line that ends collection when no configuration overrides it.
pub const DEFAULT_EXIT_TOKEN: &str = "exit";

/// Tokenize one line into tasks, stopping at the first malformed triple.
///
/// A triple is malformed when the id is not exactly one character, when
/// `wcet` or `period` is not a positive integer, when the id repeats an
/// earlier one on the same line, or when fewer than three tokens remain.
pub fn parse_line(line: &str) -> Vec<Task> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let mut tasks = Vec::new();
    let mut seen = HashSet::new();

    for triple in tokens.chunks(3) {
        match parse_triple(triple) {
            Some(task) if seen.insert(task.id) => tasks.push(task),
            _ => {
                warn!(
                    tokens = ?triple,
                    parsed = tasks.len(),
                    "malformed task triple, ignoring the rest of the line"
                );
                break;
            }
        }
    }

    tasks
}

fn parse_triple(triple: &[&str]) -> Option<Task> {
    let [id, wcet, period] = triple else {
        return None;
    };

    let mut chars = id.chars();
    let id = match (chars.next(), chars.next()) {
        (Some(c), None) => c,
        _ => return None,
    };
    let wcet = parse_positive(wcet)?;
    let period = parse_positive(period)?;

    Some(Task::new(id, wcet, period))
}

fn parse_positive(token: &str) -> Option<Tick> {
    token.parse::<Tick>().ok().filter(|&v| v > 0)
}

/// Read task sets until `exit_token` or end of input.
///
/// The returned order is the submission order; position `k` (0-based) is
/// CPU `k + 1`.
///
/// # Errors
/// Propagates I/O errors from `reader`.
pub fn read_task_sets<R: BufRead>(reader: R, exit_token: &str) -> io::Result<Vec<TaskSet>> {
    let mut sets = Vec::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim() == exit_token {
            debug!(line = line_no + 1, "exit token reached");
            break;
        }

        match TaskSet::new(parse_line(&line)) {
            Ok(set) => {
                debug!(
                    line = line_no + 1,
                    cpu = sets.len() + 1,
                    tasks = set.len(),
                    "task set read"
                );
                sets.push(set);
            }
            Err(e) => warn!(line = line_no + 1, "skipping line: {e}"),
        }
    }

    Ok(sets)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
