// Copyright 2026 the Tracematch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stroke matching and trace scoring for 2D curves.
//!
//! The tracematch library contains data structures and algorithms for scoring
//! how closely a free-hand traced stroke matches a reference vector shape.
//! Reference shapes are described as Bézier paths, flattened once into
//! polyline lookup tables; captured strokes are simplified, resampled against
//! a reference, and scored with a weighted blend of positional, scale and
//! direction similarity. A [`TraceSession`] tracks per-reference pass/fail
//! state over a whole shape set, optionally enforcing that the shapes be
//! traced in order.
//!
//! The library does not render, capture input, or persist anything; it
//! consumes completed point sequences and produces scores and match state.
//!
//! # Examples
//!
//! Scoring one stroke against a single reference line:
//! ```
//! use tracematch::{
//!     Point, SessionConfig, Size, TraceMode, TracePath, TraceSession,
//! };
//!
//! let mut path = TracePath::new();
//! path.move_to((0.0, 0.0));
//! path.line_to((100.0, 0.0));
//!
//! let mut session = TraceSession::new(
//!     vec![path],
//!     Size::new(100.0, 100.0),
//!     TraceMode::Free,
//!     SessionConfig::default(),
//! )
//! .unwrap();
//!
//! // A slightly wobbly trace of the reference line.
//! let stroke = [
//!     Point::new(0.0, 0.0),
//!     Point::new(50.0, 1.0),
//!     Point::new(100.0, 0.0),
//! ];
//! let record = session.record_stroke(&stroke).unwrap();
//! assert_eq!(record.updated, Some(0));
//! assert!(record.is_set_complete);
//! ```
//!
//! The lower-level pieces compose directly as well:
//! ```
//! use tracematch::{resample, score, simplify_stroke, Point, SimilarityWeights, Size};
//!
//! let reference = simplify_stroke(
//!     &[Point::new(0.0, 0.0), Point::new(60.0, 0.0), Point::new(120.0, 0.0)],
//!     5.0,
//! );
//! let stroke = simplify_stroke(&[Point::new(0.0, 2.0), Point::new(120.0, 2.0)], 5.0);
//! let (smaller, projected) = resample(&stroke, &reference);
//! let sim = score(
//!     &smaller,
//!     &projected,
//!     Size::new(120.0, 120.0),
//!     SimilarityWeights::default(),
//! );
//! assert!(sim > 0.0 && sim < 1.0);
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs, clippy::trivially_copy_pass_by_ref)]
#![warn(clippy::doc_markdown, rustdoc::broken_intra_doc_links)]
#![warn(clippy::semicolon_if_nothing_returned)]
#![warn(unused_qualifications)]
#![allow(clippy::unreadable_literal, clippy::many_single_char_names)]

mod cubicbez;
mod line;
mod param_curve;
mod path;
mod point;
mod polyline;
mod quadbez;
mod resample;
mod session;
mod similarity;
mod simplify;
mod size;
mod vec2;

pub use crate::cubicbez::*;
pub use crate::line::*;
pub use crate::param_curve::*;
pub use crate::path::*;
pub use crate::point::*;
pub use crate::polyline::*;
pub use crate::quadbez::*;
pub use crate::resample::*;
pub use crate::session::*;
pub use crate::similarity::*;
pub use crate::simplify::*;
pub use crate::size::*;
pub use crate::vec2::*;
