/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Pure arithmetic helpers: GCD and checked LCM over tick counts.

use super::HyperperiodError;
use crate::task::Tick;

/// Iterative Euclidean GCD.  `gcd(0, x) == x`.
pub fn gcd(mut a: Tick, mut b: Tick) -> Tick {
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}

/// Checked LCM: `Err(HyperperiodError::Overflow { a, b })` if the result does
/// not fit in a [`Tick`].
///
/// Divides before multiplying (`(a / gcd) * b`); the multiplication is still
/// checked.  `lcm(0, x) == 0`.
pub fn lcm(a: Tick, b: Tick) -> Result<Tick, HyperperiodError> {
    if a == 0 || b == 0 {
        return Ok(0);
    }

    let reduced = a / gcd(a, b);

    reduced
        .checked_mul(b)
        .ok_or(HyperperiodError::Overflow { a, b })
}

/// Fold any sequence of periods into their overall LCM.
///
/// Returns `Ok(0)` for an empty sequence and the first overflow otherwise.
pub fn lcm_of<I>(periods: I) -> Result<Tick, HyperperiodError>
where
    I: IntoIterator<Item = Tick>,
{
    let mut iter = periods.into_iter();
    match iter.next() {
        None => Ok(0),
        Some(first) => iter.try_fold(first, lcm),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
