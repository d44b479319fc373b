// Copyright 2026 the Tracematch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simplification of a captured stroke.
//!
//! Pointer capture produces many near-duplicate samples; comparing them
//! against a flattened reference at native density would bias the score with
//! sampling jitter. Simplification thins the stroke to points at least a
//! minimum spacing apart, bounding comparison cost.

use crate::{Point, Polyline};

/// The default minimum spacing between retained stroke points.
pub const DEFAULT_MIN_SPACING: f64 = 5.0;

/// Thin a raw captured stroke to points spaced more than `min_spacing` apart.
///
/// The first point is kept unconditionally; each subsequent point is kept
/// only if its Euclidean distance to the last retained point exceeds
/// `min_spacing`. Order is preserved, so the output length is between 1 and
/// the input length for any non-empty input. An empty input yields an empty
/// polyline.
pub fn simplify_stroke(points: &[Point], min_spacing: f64) -> Polyline {
    let mut out = Vec::with_capacity(points.len());
    let mut iter = points.iter();
    if let Some(&first) = iter.next() {
        out.push(first);
        let mut last = first;
        for &p in iter {
            if last.distance(p) > min_spacing {
                out.push(p);
                last = p;
            }
        }
    }
    Polyline::from_vec(out)
}
