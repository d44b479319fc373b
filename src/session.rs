// Copyright 2026 the Tracematch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing sessions: per-reference match state and stroke selection.
//!
//! A [`TraceSession`] owns a set of reference shapes and decides, for every
//! completed stroke, which reference it was traced against and how well. In
//! free mode the best-scoring reference wins; in sequential mode strokes are
//! compared only against the current reference, advancing when it passes the
//! cutoff. All mutation flows through `&mut self`, so stroke processing is
//! serialized by construction and the reference set is never shared.

use std::fmt;

use crate::{
    resample, score, simplify_stroke, Point, Polyline, Size, TracePath, DEFAULT_CUTOFF_SCORE,
    DEFAULT_FLATTEN_STEPS, DEFAULT_MIN_SPACING, SimilarityWeights,
};

/// One target shape to be traced.
///
/// Holds the vector path, the polyline lookup table it flattens to (computed
/// once, read-only afterwards), and the similarity of the best stroke
/// recorded against it so far.
#[derive(Clone, Debug)]
pub struct ReferenceCurve {
    path: TracePath,
    lookup: Polyline,
    similarity: f64,
}

impl ReferenceCurve {
    /// Create a reference curve, flattening the path at the given step count.
    pub fn new(path: TracePath, flatten_steps: usize) -> ReferenceCurve {
        let lookup = path.flatten(flatten_steps);
        ReferenceCurve {
            path,
            lookup,
            similarity: 0.0,
        }
    }

    /// The reference's vector path.
    pub fn path(&self) -> &TracePath {
        &self.path
    }

    /// The flattened lookup polyline.
    pub fn flattened(&self) -> &Polyline {
        &self.lookup
    }

    /// The similarity recorded for this reference, 0 until a stroke matches.
    pub fn similarity(&self) -> f64 {
        self.similarity
    }

    /// Whether the reference counts as drawn at the given cutoff.
    pub fn is_drawn(&self, cutoff: f64) -> bool {
        self.similarity > cutoff
    }
}

/// How strokes are matched against the reference set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TraceMode {
    /// Every stroke is compared against all references; the best score wins.
    Free,
    /// Strokes are compared only against the current reference, in order.
    Sequential,
}

/// Progress through the reference set in sequential mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequenceState {
    /// The reference at this index is the current tracing target.
    Active(usize),
    /// Every reference has been passed; no further strokes can be recorded.
    Exhausted,
}

#[derive(Clone, Copy, Debug)]
enum MatchState {
    Free,
    Sequential(SequenceState),
}

impl MatchState {
    fn sequential_start(count: usize) -> MatchState {
        if count == 0 {
            MatchState::Sequential(SequenceState::Exhausted)
        } else {
            MatchState::Sequential(SequenceState::Active(0))
        }
    }
}

/// Configuration for a tracing session.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionConfig {
    /// Similarity threshold above which a reference counts as drawn, in
    /// `[0, 1]`.
    pub cutoff_score: f64,
    /// Weights of the similarity sub-metrics; must be valid per
    /// [`SimilarityWeights::is_valid`].
    pub weights: SimilarityWeights,
    /// Minimum spacing between retained stroke points; must be positive.
    pub min_spacing: f64,
    /// Flattening steps per reference path segment (clamped to at least 1).
    pub flatten_steps: usize,
}

impl SessionConfig {
    /// Check the configuration preconditions.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.weights.is_valid() {
            return Err(ConfigError::InvalidWeights);
        }
        if !(0.0..=1.0).contains(&self.cutoff_score) {
            return Err(ConfigError::InvalidCutoff);
        }
        if self.min_spacing.is_nan() || self.min_spacing <= 0.0 {
            return Err(ConfigError::InvalidMinSpacing);
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> SessionConfig {
        SessionConfig {
            cutoff_score: DEFAULT_CUTOFF_SCORE,
            weights: SimilarityWeights::default(),
            min_spacing: DEFAULT_MIN_SPACING,
            flatten_steps: DEFAULT_FLATTEN_STEPS,
        }
    }
}

/// A configuration error, surfaced at session setup rather than per stroke.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The similarity weights are negative or do not sum to 1.
    InvalidWeights,
    /// The cutoff score is outside `[0, 1]`.
    InvalidCutoff,
    /// The minimum spacing is not positive.
    InvalidMinSpacing,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::InvalidWeights => {
                write!(f, "similarity weights must be non-negative and sum to 1")
            }
            ConfigError::InvalidCutoff => write!(f, "cutoff score must be within [0, 1]"),
            ConfigError::InvalidMinSpacing => write!(f, "minimum spacing must be positive"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// An error recording a stroke.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordError {
    /// The stroke contained no points; no score can be defined for it.
    EmptyStroke,
    /// The sequential session has passed its last reference; check
    /// [`TraceSession::is_exhausted`] before recording.
    SequenceExhausted,
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RecordError::EmptyStroke => write!(f, "stroke has no points"),
            RecordError::SequenceExhausted => {
                write!(f, "sequential session has no remaining reference")
            }
        }
    }
}

impl std::error::Error for RecordError {}

/// The outcome of recording one completed stroke.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeRecord {
    /// Index of the reference whose similarity was updated; `None` when no
    /// reference scored above zero in free mode.
    pub updated: Option<usize>,
    /// The similarity stored for the updated reference (0 when none was).
    pub similarity: f64,
    /// Whether every reference in the set is now drawn.
    pub is_set_complete: bool,
}

/// A tracing session over a set of reference shapes.
///
/// The session exclusively owns its [`ReferenceCurve`]s; recording a stroke
/// mutates their similarity through `&mut self` only. Reference lookup
/// tables are flattened once at construction. The bounding frame must be
/// non-degenerate (a zero diagonal leaves the distance normalization
/// undefined).
pub struct TraceSession {
    references: Vec<ReferenceCurve>,
    frame: Size,
    config: SessionConfig,
    state: MatchState,
}

impl TraceSession {
    /// Create a session from reference paths, validating the configuration.
    ///
    /// The paths are expected to be already scaled to `frame`.
    pub fn new(
        paths: Vec<TracePath>,
        frame: Size,
        mode: TraceMode,
        config: SessionConfig,
    ) -> Result<TraceSession, ConfigError> {
        config.validate()?;
        let references: Vec<ReferenceCurve> = paths
            .into_iter()
            .map(|path| ReferenceCurve::new(path, config.flatten_steps))
            .collect();
        let state = match mode {
            TraceMode::Free => MatchState::Free,
            TraceMode::Sequential => MatchState::sequential_start(references.len()),
        };
        Ok(TraceSession {
            references,
            frame,
            config,
            state,
        })
    }

    /// The reference curves, in load order.
    pub fn references(&self) -> &[ReferenceCurve] {
        &self.references
    }

    /// The bounding frame.
    pub fn frame(&self) -> Size {
        self.frame
    }

    /// The session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The matching mode.
    pub fn mode(&self) -> TraceMode {
        match self.state {
            MatchState::Free => TraceMode::Free,
            MatchState::Sequential(_) => TraceMode::Sequential,
        }
    }

    /// The sequential progress, or `None` in free mode.
    pub fn sequence(&self) -> Option<SequenceState> {
        match self.state {
            MatchState::Free => None,
            MatchState::Sequential(seq) => Some(seq),
        }
    }

    /// The index of the current sequential target, if one remains.
    pub fn sequence_index(&self) -> Option<usize> {
        match self.state {
            MatchState::Sequential(SequenceState::Active(index)) => Some(index),
            _ => None,
        }
    }

    /// Whether a sequential session has passed its last reference.
    pub fn is_exhausted(&self) -> bool {
        matches!(
            self.state,
            MatchState::Sequential(SequenceState::Exhausted)
        )
    }

    /// Whether every reference is drawn.
    pub fn is_set_complete(&self) -> bool {
        let cutoff = self.config.cutoff_score;
        self.references.iter().all(|r| r.is_drawn(cutoff))
    }

    /// Record one completed stroke and update the matching reference.
    ///
    /// The stroke is simplified, then resampled and scored against either the
    /// current sequential target or, in free mode, every reference (drawn
    /// or not), keeping the best score strictly greater than zero. The
    /// winner's similarity is overwritten with the new score, even when that
    /// lowers an already-drawn reference. In sequential mode a passing score
    /// advances the target; past the last reference the session is
    /// exhausted and further recording reports
    /// [`RecordError::SequenceExhausted`].
    pub fn record_stroke(&mut self, stroke: &[Point]) -> Result<StrokeRecord, RecordError> {
        if stroke.is_empty() {
            return Err(RecordError::EmptyStroke);
        }
        let stroke = simplify_stroke(stroke, self.config.min_spacing);

        match self.state {
            MatchState::Sequential(SequenceState::Exhausted) => {
                Err(RecordError::SequenceExhausted)
            }
            MatchState::Sequential(SequenceState::Active(index)) => {
                let similarity = self.similarity_to(&stroke, &self.references[index]);
                self.references[index].similarity = similarity;
                if self.references[index].is_drawn(self.config.cutoff_score) {
                    self.state = if index + 1 < self.references.len() {
                        MatchState::Sequential(SequenceState::Active(index + 1))
                    } else {
                        MatchState::Sequential(SequenceState::Exhausted)
                    };
                }
                Ok(StrokeRecord {
                    updated: Some(index),
                    similarity,
                    is_set_complete: self.is_set_complete(),
                })
            }
            MatchState::Free => {
                let mut best: Option<(usize, f64)> = None;
                for (index, reference) in self.references.iter().enumerate() {
                    let similarity = self.similarity_to(&stroke, reference);
                    if similarity > best.map_or(0.0, |(_, s)| s) {
                        best = Some((index, similarity));
                    }
                }
                if let Some((index, similarity)) = best {
                    self.references[index].similarity = similarity;
                }
                Ok(StrokeRecord {
                    updated: best.map(|(index, _)| index),
                    similarity: best.map_or(0.0, |(_, s)| s),
                    is_set_complete: self.is_set_complete(),
                })
            }
        }
    }

    /// Reset every similarity to zero and rewind sequential progress.
    pub fn clear(&mut self) {
        for reference in &mut self.references {
            reference.similarity = 0.0;
        }
        self.state = match self.state {
            MatchState::Free => MatchState::Free,
            MatchState::Sequential(_) => MatchState::sequential_start(self.references.len()),
        };
    }

    fn similarity_to(&self, stroke: &Polyline, reference: &ReferenceCurve) -> f64 {
        let (smaller, projected) = resample(stroke, reference.flattened());
        score(&smaller, &projected, self.frame, self.config.weights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Size = Size::new(100.0, 100.0);

    fn line_path(y: f64) -> TracePath {
        let mut path = TracePath::new();
        path.move_to((0.0, y));
        path.line_to((100.0, y));
        path
    }

    fn trace(y: f64) -> Vec<Point> {
        (0..=10).map(|i| Point::new(10.0 * i as f64, y)).collect()
    }

    fn session(paths: Vec<TracePath>, mode: TraceMode) -> TraceSession {
        TraceSession::new(paths, FRAME, mode, SessionConfig::default()).unwrap()
    }

    #[test]
    fn sequential_progression() {
        let mut s = session(
            vec![line_path(20.0), line_path(50.0), line_path(80.0)],
            TraceMode::Sequential,
        );
        assert_eq!(s.sequence_index(), Some(0));

        let r = s.record_stroke(&trace(20.0)).unwrap();
        assert_eq!(r.updated, Some(0));
        assert!(r.similarity > s.config().cutoff_score);
        assert!(!r.is_set_complete);
        assert_eq!(s.sequence_index(), Some(1));

        let r = s.record_stroke(&trace(50.0)).unwrap();
        assert_eq!(r.updated, Some(1));
        assert!(!r.is_set_complete);
        assert_eq!(s.sequence_index(), Some(2));

        let r = s.record_stroke(&trace(80.0)).unwrap();
        assert_eq!(r.updated, Some(2));
        assert!(r.is_set_complete);
        assert!(s.is_exhausted());
        assert_eq!(s.sequence_index(), None);
        assert_eq!(s.sequence(), Some(SequenceState::Exhausted));

        assert_eq!(
            s.record_stroke(&trace(20.0)),
            Err(RecordError::SequenceExhausted)
        );
    }

    #[test]
    fn sequential_does_not_advance_below_cutoff() {
        let mut s = session(
            vec![line_path(20.0), line_path(80.0)],
            TraceMode::Sequential,
        );
        // Tracing the second shape while the first is the target scores
        // against the first only, and poorly.
        let r = s.record_stroke(&trace(80.0)).unwrap();
        assert_eq!(r.updated, Some(0));
        assert!(r.similarity < s.config().cutoff_score);
        assert_eq!(s.sequence_index(), Some(0));
        assert!(!s.references()[0].is_drawn(s.config().cutoff_score));
    }

    #[test]
    fn free_mode_picks_best_reference() {
        let mut s = session(vec![line_path(0.0), line_path(40.0)], TraceMode::Free);
        let r = s.record_stroke(&trace(40.0)).unwrap();
        assert_eq!(r.updated, Some(1));
        assert!(s.references()[1].is_drawn(s.config().cutoff_score));
        assert!(!s.references()[0].is_drawn(s.config().cutoff_score));
        assert!(!r.is_set_complete);
    }

    #[test]
    fn free_mode_rescores_drawn_reference() {
        let mut s = session(vec![line_path(0.0), line_path(40.0)], TraceMode::Free);
        let first = s.record_stroke(&trace(40.0)).unwrap();
        assert_eq!(first.updated, Some(1));
        let drawn_similarity = s.references()[1].similarity();

        // A sloppier stroke still matches the drawn reference best, and its
        // lower score overwrites the stored similarity.
        let second = s.record_stroke(&trace(42.0)).unwrap();
        assert_eq!(second.updated, Some(1));
        assert!(second.similarity < drawn_similarity);
        assert!((s.references()[1].similarity() - second.similarity).abs() < 1e-12);
        assert!(s.references()[1].is_drawn(s.config().cutoff_score));
    }

    #[test]
    fn free_mode_ignores_nonpositive_scores() {
        let mut s = session(vec![line_path(0.0), line_path(40.0)], TraceMode::Free);
        // A stroke far outside the frame scores negative against everything.
        let r = s.record_stroke(&trace(100_000.0)).unwrap();
        assert_eq!(r.updated, None);
        assert_eq!(r.similarity, 0.0);
        assert_eq!(s.references()[0].similarity(), 0.0);
        assert_eq!(s.references()[1].similarity(), 0.0);
    }

    #[test]
    fn empty_stroke_is_rejected() {
        let mut s = session(vec![line_path(0.0)], TraceMode::Free);
        assert_eq!(s.record_stroke(&[]), Err(RecordError::EmptyStroke));
    }

    #[test]
    fn single_point_stroke_is_tolerated() {
        let mut s = session(vec![line_path(0.0)], TraceMode::Free);
        let r = s.record_stroke(&[Point::new(0.0, 0.0)]).unwrap();
        // One point projects onto the lookup table's start; only the distance
        // term contributes, and nothing faults.
        assert!(r.similarity.is_finite());
    }

    #[test]
    fn clear_resets_similarities_and_sequence() {
        let mut s = session(
            vec![line_path(20.0), line_path(50.0)],
            TraceMode::Sequential,
        );
        s.record_stroke(&trace(20.0)).unwrap();
        assert_eq!(s.sequence_index(), Some(1));

        s.clear();
        assert_eq!(s.sequence_index(), Some(0));
        assert!(!s.is_set_complete());
        for reference in s.references() {
            assert_eq!(reference.similarity(), 0.0);
        }
    }

    #[test]
    fn empty_sequential_set_starts_exhausted() {
        let mut s = session(vec![], TraceMode::Sequential);
        assert!(s.is_exhausted());
        assert!(s.is_set_complete());
        assert_eq!(
            s.record_stroke(&trace(0.0)),
            Err(RecordError::SequenceExhausted)
        );
    }

    #[test]
    fn config_is_validated_at_setup() {
        let config = SessionConfig {
            weights: SimilarityWeights::new(0.5, 0.5, 0.5),
            ..Default::default()
        };
        assert_eq!(
            TraceSession::new(vec![], FRAME, TraceMode::Free, config).err(),
            Some(ConfigError::InvalidWeights)
        );

        let config = SessionConfig {
            cutoff_score: 1.5,
            ..Default::default()
        };
        assert_eq!(
            TraceSession::new(vec![], FRAME, TraceMode::Free, config).err(),
            Some(ConfigError::InvalidCutoff)
        );

        let config = SessionConfig {
            min_spacing: 0.0,
            ..Default::default()
        };
        assert_eq!(
            TraceSession::new(vec![], FRAME, TraceMode::Free, config).err(),
            Some(ConfigError::InvalidMinSpacing)
        );
    }

    #[test]
    fn mode_accessor_tracks_state() {
        let s = session(vec![line_path(0.0)], TraceMode::Sequential);
        assert_eq!(s.mode(), TraceMode::Sequential);
        let s = session(vec![line_path(0.0)], TraceMode::Free);
        assert_eq!(s.mode(), TraceMode::Free);
        assert_eq!(s.sequence(), None);
    }
}
