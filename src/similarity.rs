// Copyright 2026 the Tracematch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The weighted geometric similarity score.
//!
//! The score blends three sub-metrics over a pair of equal-length polylines:
//! positional distance (normalized by half the frame diagonal), segment
//! scale ratio, and segment direction. Position alone would reward only a
//! literal overlay; the scale and direction terms credit a stroke that is
//! geometrically similar but offset or scaled, which tracks the human sense
//! of "shape correctness" rather than pixel overlap.

use crate::{Polyline, Size};

/// The default similarity threshold above which a reference counts as drawn.
pub const DEFAULT_CUTOFF_SCORE: f64 = 0.7;

// Guards the direction cosine against zero-length segment vectors.
const DIRECTION_EPSILON: f64 = 1e-8;

// Tolerance for the weights-sum-to-one precondition.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Weights for the three similarity sub-metrics.
///
/// The weights must be non-negative and sum to 1.0 for the score to stay
/// bounded in `[0, 1]`; [`SimilarityWeights::is_valid`] reports the
/// precondition and session setup enforces it.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimilarityWeights {
    /// Weight of the positional distance term.
    pub distance: f64,
    /// Weight of the segment scale term.
    pub scale: f64,
    /// Weight of the segment direction term.
    pub direction: f64,
}

impl SimilarityWeights {
    /// Create a new set of weights.
    #[inline]
    pub const fn new(distance: f64, scale: f64, direction: f64) -> SimilarityWeights {
        SimilarityWeights {
            distance,
            scale,
            direction,
        }
    }

    /// Whether the weights are non-negative and sum to 1.0 (within a small
    /// tolerance).
    pub fn is_valid(self) -> bool {
        self.distance >= 0.0
            && self.scale >= 0.0
            && self.direction >= 0.0
            && (self.distance + self.scale + self.direction - 1.0).abs() <= WEIGHT_SUM_TOLERANCE
    }
}

impl Default for SimilarityWeights {
    #[inline]
    fn default() -> SimilarityWeights {
        SimilarityWeights::new(0.4, 0.2, 0.4)
    }
}

/// Score the similarity of two equal-length polylines within a bounding
/// frame.
///
/// `p2` is expected to be the resampled counterpart of `p1` (see
/// [`resample`](crate::resample)); `frame` is the drawing surface whose
/// half-diagonal `k` normalizes positional distance.
///
/// Three terms are averaged over the `n` points:
/// - distance: mean of `1 - distance(p1[i], p2[i]) / k`. Deliberately
///   unclamped: two points farther apart than `k` contribute a negative
///   value, so a very distant stroke can push the total below 0.
/// - scale: mean ratio of corresponding segment lengths,
///   `min(s1, s2) / max(s1, s2)`, counting a pair of zero-length segments
///   as 1.
/// - direction: mean of `(cos + 1) / 2` over corresponding segment vectors,
///   remapping cosine similarity to `[0, 1]`.
///
/// The `n - 1` segment terms are averaged over `n`, matching the distance
/// term's denominator; identical polylines therefore score
/// `w_distance + (w_scale + w_direction) * (n - 1) / n`, which approaches 1
/// as `n` grows.
///
/// # Panics
///
/// Panics if the polylines have different lengths or are empty.
///
/// # Examples
///
/// ```
/// use tracematch::{score, Point, Polyline, SimilarityWeights, Size};
///
/// let p: Polyline = vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)].into();
/// let sim = score(&p, &p, Size::new(100.0, 100.0), SimilarityWeights::default());
/// // Two points: 0.4 * 1 + (0.2 + 0.4) * 1/2.
/// assert!((sim - 0.7).abs() < 1e-9);
/// ```
pub fn score(p1: &Polyline, p2: &Polyline, frame: Size, weights: SimilarityWeights) -> f64 {
    assert_eq!(p1.len(), p2.len(), "score requires equal-length polylines");
    assert!(!p1.is_empty(), "score requires non-empty polylines");
    let a = p1.points();
    let b = p2.points();
    let n = a.len();
    let k = frame.to_vec2().hypot() / 2.0;

    let mut sim_distance = 0.0;
    let mut sim_scale = 0.0;
    let mut sim_direction = 0.0;
    for i in 0..n {
        sim_distance += 1.0 - a[i].distance(b[i]) / k;

        if i > 0 {
            let s1 = a[i - 1].distance(a[i]);
            let s2 = b[i - 1].distance(b[i]);
            sim_scale += if s1 == 0.0 && s2 == 0.0 {
                1.0
            } else {
                s1.min(s2) / s1.max(s2)
            };

            let v1 = a[i] - a[i - 1];
            let v2 = b[i] - b[i - 1];
            let cos = v1.dot(v2) / (v1.hypot() * v2.hypot() + DIRECTION_EPSILON);
            sim_direction += (cos + 1.0) / 2.0;
        }
    }
    let n = n as f64;
    weights.distance * (sim_distance / n)
        + weights.scale * (sim_scale / n)
        + weights.direction * (sim_direction / n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Point;

    const FRAME: Size = Size::new(100.0, 100.0);

    fn horizontal(y: f64, n: usize) -> Polyline {
        (0..n)
            .map(|i| Point::new(100.0 * i as f64 / (n - 1) as f64, y))
            .collect()
    }

    #[test]
    fn default_weights_are_valid() {
        assert!(SimilarityWeights::default().is_valid());
        assert!(!SimilarityWeights::new(0.5, 0.5, 0.5).is_valid());
        assert!(!SimilarityWeights::new(1.5, -0.25, -0.25).is_valid());
    }

    #[test]
    fn identical_two_point_lines() {
        let p = horizontal(0.0, 2);
        let sim = score(&p, &p, FRAME, SimilarityWeights::default());
        // One segment pair averaged over two samples: 0.4 + 0.6 * 1/2.
        assert!((sim - 0.7).abs() < 1e-9);
    }

    #[test]
    fn score_of_identical_polylines_approaches_one() {
        let w = SimilarityWeights::default();
        for n in [2, 11, 101, 1001] {
            let p = horizontal(25.0, n);
            let sim = score(&p, &p, FRAME, w);
            let expected =
                w.distance + (w.scale + w.direction) * (n as f64 - 1.0) / n as f64;
            assert!((sim - expected).abs() < 1e-9);
        }
        let p = horizontal(25.0, 1001);
        assert!(score(&p, &p, FRAME, w) > 0.999);
    }

    #[test]
    fn offset_parallel_line_scores_low() {
        let reference = horizontal(0.0, 2);
        let stroke = horizontal(100.0, 2);
        let sim = score(&stroke, &reference, FRAME, SimilarityWeights::default());
        // k is half the 100x100 diagonal; both points sit a full 100 away, so
        // the unclamped distance term goes negative.
        let k = 100.0 * std::f64::consts::SQRT_2 / 2.0;
        let expected = 0.4 * (1.0 - 100.0 / k) + 0.2 * 0.5 + 0.4 * 0.5;
        assert!((sim - expected).abs() < 1e-9);
        assert!(sim < DEFAULT_CUTOFF_SCORE);
    }

    #[test]
    fn distance_term_is_unclamped() {
        let reference = horizontal(0.0, 2);
        let stroke = horizontal(10_000.0, 2);
        let sim = score(&stroke, &reference, FRAME, SimilarityWeights::default());
        assert!(sim < 0.0);
    }

    #[test]
    fn zero_length_segments_do_not_produce_nan() {
        let p = Point::new(5.0, 5.0);
        let still: Polyline = vec![p, p, p].into();
        let sim = score(&still, &still, FRAME, SimilarityWeights::default());
        assert!(sim.is_finite());
        // Distance 1, scale pairs count as 1, direction cosine collapses to
        // the epsilon-guarded 0 and remaps to 1/2.
        let expected = 0.4 + 0.2 * (2.0 / 3.0) + 0.4 * (0.5 * 2.0 / 3.0);
        assert!((sim - expected).abs() < 1e-9);
    }

    #[test]
    fn single_point_polylines() {
        let a: Polyline = vec![Point::new(0.0, 0.0)].into();
        let b: Polyline = vec![Point::new(0.0, 0.0)].into();
        let sim = score(&a, &b, FRAME, SimilarityWeights::default());
        // Only the distance term is populated.
        assert!((sim - 0.4).abs() < 1e-9);
    }

    #[test]
    fn mirrored_direction_scores_lower_than_parallel() {
        let reference = horizontal(0.0, 11);
        let stroke = horizontal(5.0, 11);
        let reversed: Polyline = stroke.points().iter().rev().copied().collect();
        let w = SimilarityWeights::default();
        let forward = score(&stroke, &reference, FRAME, w);
        let backward = score(&reversed, &reference, FRAME, w);
        assert!(forward > backward);
    }
}
