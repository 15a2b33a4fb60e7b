/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! rms-sched – Rate-Monotonic scheduling analyzer and simulator
//!
//! Module layout:
//!
//! ```text
//! lib.rs
//! ├── task            – Task / TaskSet model
//! ├── input           – line tokenizer, task-set collection
//! ├── config/         – optional YAML run configuration
//! ├── hyperperiod/    – LCM / GCD helpers, hyperperiod limits
//! ├── scheduler/      – Liu–Layland analysis + preemptive RMS simulation
//! ├── trace           – execution trace, run-length diagram
//! ├── report          – per-CPU report block
//! └── orchestrator/   – one worker per task set, ordered output
//! ```

pub mod config;
pub mod hyperperiod;
pub mod input;
pub mod orchestrator;
pub mod report;
pub mod scheduler;
pub mod task;
pub mod trace;
