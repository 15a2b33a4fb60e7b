/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Turnstile that serialises report output in submission order.
//!
//! Each worker holds a sequence number `1..=N`.  The sequencer holds the next
//! expected number and the output sink behind one mutex:
//!
//! ```text
//! worker k:  wait_turn(k) ──► Turn ──► publish(text) ──► advance()
//!               │ blocks while next != k           │ next = k + 1, notify_all
//! ```
//!
//! Only the hand-off is serialised; workers compute before calling
//! [`Sequencer::wait_turn`].
//!
//! # Gate and abort
//! A sequencer created with [`Sequencer::gated`] admits nobody until
//! [`Sequencer::open`] is called, so the orchestrator can finish spawning
//! every worker before the first byte is written.  [`Sequencer::abort`] wakes
//! every waiter with [`SequencerError::Aborted`]; a [`Turn`] dropped without
//! [`Turn::advance`] (failed write, panic) aborts too, so no waiter is left
//! blocked on a number that will never come.

use std::io::{self, Write};
use std::sync::{Condvar, Mutex, MutexGuard};

use thiserror::Error;
use tracing::{debug, error};

/// Error returned to a worker whose turn will never come.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SequencerError {
    #[error("run aborted while sequence number {seq} was waiting for its turn")]
    Aborted { seq: u64 },
}

/// State protected by the mutex.
#[derive(Debug)]
struct State<W> {
    /// Sequence number allowed to publish next.
    next: u64,
    /// `false` until the orchestrator opens the gate.
    open: bool,
    aborted: bool,
    sink: W,
}

/// Ordered-output turnstile shared by reference between workers.
#[derive(Debug)]
pub struct Sequencer<W> {
    state: Mutex<State<W>>,
    turn_changed: Condvar,
}

impl<W: Write> Sequencer<W> {
    /// Open sequencer expecting sequence number 1 first.
    pub fn new(sink: W) -> Self {
        Self::with_gate(sink, true)
    }

    /// Closed sequencer; nobody publishes until [`open`](Self::open).
    pub fn gated(sink: W) -> Self {
        Self::with_gate(sink, false)
    }

    fn with_gate(sink: W, open: bool) -> Self {
        Self {
            state: Mutex::new(State {
                next: 1,
                open,
                aborted: false,
                sink,
            }),
            turn_changed: Condvar::new(),
        }
    }

    /// Lock state with poison recovery.
    ///
    /// A worker that panicked while holding the lock has already aborted the
    /// run through [`Turn`]'s drop; the state is still consistent.
    fn lock(&self) -> MutexGuard<'_, State<W>> {
        self.state
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
    }

    /// Let waiting workers through the gate.
    pub fn open(&self) {
        let mut st = self.lock();
        st.open = true;
        self.turn_changed.notify_all();
    }

    /// Abort the run: every current and future waiter gets
    /// [`SequencerError::Aborted`].
    pub fn abort(&self) {
        let mut st = self.lock();
        if !st.aborted {
            error!(next = st.next, "output sequence aborted");
        }
        st.aborted = true;
        self.turn_changed.notify_all();
    }

    pub fn is_aborted(&self) -> bool {
        self.lock().aborted
    }

    /// Sequence number that may publish next.
    pub fn next_expected(&self) -> u64 {
        self.lock().next
    }

    /// Block until the gate is open and `seq` is the next expected number.
    ///
    /// The lock is released while waiting and held by the returned [`Turn`].
    ///
    /// # Errors
    /// [`SequencerError::Aborted`] if the run is aborted before `seq` is
    /// admitted.
    pub fn wait_turn(&self, seq: u64) -> Result<Turn<'_, W>, SequencerError> {
        let guard = self.lock();
        let guard = self
            .turn_changed
            .wait_while(guard, |st| !st.aborted && !(st.open && st.next == seq))
            .unwrap_or_else(|poison| poison.into_inner());

        if guard.aborted {
            return Err(SequencerError::Aborted { seq });
        }

        debug!(seq, "turn acquired");
        Ok(Turn {
            guard: Some(guard),
            turn_changed: &self.turn_changed,
            seq,
        })
    }

    /// Consume the sequencer and return the sink.
    pub fn into_inner(self) -> W {
        self.state
            .into_inner()
            .unwrap_or_else(|poison| poison.into_inner())
            .sink
    }
}

// ── Turn ──────────────────────────────────────────────────────────────────────

/// Exclusive right to publish for one sequence number.
///
/// Holds the sequencer lock until [`advance`](Self::advance) or drop.
pub struct Turn<'a, W> {
    /// `None` only after `advance` has run.
    guard: Option<MutexGuard<'a, State<W>>>,
    turn_changed: &'a Condvar,
    seq: u64,
}

impl<W: Write> Turn<'_, W> {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Write `text` to the sink and flush it.
    pub fn publish(&mut self, text: &str) -> io::Result<()> {
        match self.guard.as_mut() {
            Some(st) => {
                st.sink.write_all(text.as_bytes())?;
                st.sink.flush()
            }
            None => Ok(()),
        }
    }

    /// Hand the turn to `seq + 1` and wake every waiter.
    pub fn advance(mut self) {
        if let Some(mut st) = self.guard.take() {
            st.next += 1;
            debug!(seq = self.seq, next = st.next, "turn advanced");
            drop(st);
            self.turn_changed.notify_all();
        }
    }
}

impl<W> Drop for Turn<'_, W> {
    fn drop(&mut self) {
        if let Some(mut st) = self.guard.take() {
            error!(seq = self.seq, "turn released without advancing, aborting");
            st.aborted = true;
            drop(st);
            self.turn_changed.notify_all();
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
