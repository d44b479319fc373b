// Copyright 2026 the Tracematch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resampling two polylines onto a common cardinality.

use crate::Polyline;

// Guards the index mapping against division by zero for single-point inputs.
const PROJECTION_EPSILON: f64 = 1e-8;

/// Project the shorter of two polylines onto the longer, producing a pair of
/// equal length.
///
/// Returns `(smaller, projected)`: `smaller` is whichever input has fewer
/// points (ties prefer `a`), and `projected` has exactly `smaller.len()`
/// points, all drawn from the longer input by nearest-index projection
/// `larger[min(floor(i * larger.len() / (smaller.len() - 1 + ε)), larger.len() - 1)]`.
///
/// The projected indices are monotonically non-decreasing; the first maps to
/// index 0 and, when `smaller` has more than one point, the last maps to the
/// longer input's final index. When the lengths match the projection is the
/// identity. A single-point `smaller` maps to index 0; the `ε` term is what
/// keeps that case free of a division by zero, so it must stay in place.
///
/// # Panics
///
/// Panics if either polyline is empty.
pub fn resample(a: &Polyline, b: &Polyline) -> (Polyline, Polyline) {
    assert!(!a.is_empty() && !b.is_empty(), "resample requires non-empty polylines");
    let (smaller, larger) = if a.len() <= b.len() { (a, b) } else { (b, a) };

    let last = larger.len() - 1;
    let denom = smaller.len() as f64 - 1.0 + PROJECTION_EPSILON;
    let mut projected = Vec::with_capacity(smaller.len());
    for i in 0..smaller.len() {
        let ix = ((i * larger.len()) as f64 / denom) as usize;
        projected.push(larger.points()[ix.min(last)]);
    }
    (smaller.clone(), Polyline::from_vec(projected))
}
