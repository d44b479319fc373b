// Copyright 2026 the Tracematch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reference shapes as Bézier paths (up to cubic).

use crate::{CubicBez, Line, ParamCurve, Point, Polyline, QuadBez};

/// The default number of flattening steps per path segment.
///
/// This is the lookup-table density used when a reference shape is flattened
/// for comparison; any fixed value works as long as it is consistent
/// run-to-run.
pub const DEFAULT_FLATTEN_STEPS: usize = 100;

/// A reference shape described as Bézier segments, possibly with multiple
/// subpaths.
///
/// Shapes are expected to arrive already scaled to the drawing frame; this
/// type holds the geometry and converts it into a [`Polyline`] lookup table
/// for matching.
#[derive(Clone, Default, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TracePath(Vec<PathEl>);

/// The element of a Bézier path.
///
/// A valid path has `MoveTo` at the beginning of each subpath.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathEl {
    /// Move directly to the point without drawing anything, starting a new
    /// subpath.
    MoveTo(Point),
    /// Draw a line from the current location to the point.
    LineTo(Point),
    /// Draw a quadratic bezier using the current location and the two points.
    QuadTo(Point, Point),
    /// Draw a cubic bezier using the current location and the three points.
    CurveTo(Point, Point, Point),
    /// Close off the path.
    ClosePath,
}

/// A segment of a Bézier path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathSeg {
    /// A line segment.
    Line(Line),
    /// A quadratic bezier segment.
    Quad(QuadBez),
    /// A cubic bezier segment.
    Cubic(CubicBez),
}

impl TracePath {
    /// Create a new, empty path.
    pub fn new() -> TracePath {
        Default::default()
    }

    /// Create a path from a vector of path elements.
    pub fn from_vec(v: Vec<PathEl>) -> TracePath {
        TracePath(v)
    }

    /// Push a generic path element onto the path.
    pub fn push(&mut self, el: PathEl) {
        self.0.push(el);
    }

    /// Push a "move to" element onto the path.
    pub fn move_to<P: Into<Point>>(&mut self, p: P) {
        self.push(PathEl::MoveTo(p.into()));
    }

    /// Push a "line to" element onto the path.
    pub fn line_to<P: Into<Point>>(&mut self, p: P) {
        self.push(PathEl::LineTo(p.into()));
    }

    /// Push a "quad to" element onto the path.
    pub fn quad_to<P: Into<Point>>(&mut self, p1: P, p2: P) {
        self.push(PathEl::QuadTo(p1.into(), p2.into()));
    }

    /// Push a "curve to" element onto the path.
    pub fn curve_to<P: Into<Point>>(&mut self, p1: P, p2: P, p3: P) {
        self.push(PathEl::CurveTo(p1.into(), p2.into(), p3.into()));
    }

    /// Push a "close path" element onto the path.
    pub fn close_path(&mut self) {
        self.push(PathEl::ClosePath);
    }

    /// Get the path elements.
    pub fn elements(&self) -> &[PathEl] {
        &self.0
    }

    /// Iterate over the path segments.
    ///
    /// # Panics
    ///
    /// Panics if the path's first element is not `MoveTo`.
    pub fn segments(&self) -> Segments<'_> {
        let first = match self.0.first() {
            Some(PathEl::MoveTo(p)) => *p,
            Some(_) => panic!("path must begin with MoveTo"),
            None => Default::default(),
        };

        Segments {
            c: self.0.iter(),
            start: first,
            last: first,
        }
    }

    /// Returns `true` if the path contains no segments.
    pub fn is_empty(&self) -> bool {
        !self
            .0
            .iter()
            .any(|el| matches!(el, PathEl::LineTo(..) | PathEl::QuadTo(..) | PathEl::CurveTo(..)))
    }

    /// Flatten the path into a polyline lookup table.
    ///
    /// Each segment is sampled at `steps` uniform parameter steps (clamped to
    /// at least 1), concatenated in path order, with the first segment's
    /// start point prepended. The output length for a path of `S` segments is
    /// exactly `1 + S * steps`, deterministic for a given path and step
    /// count.
    ///
    /// A path with no drawable segment flattens to a single-point polyline:
    /// the point of its initial `MoveTo`, or the origin for an entirely empty
    /// path.
    pub fn flatten(&self, steps: usize) -> Polyline {
        let steps = steps.max(1);
        let mut lookup = Polyline::new();
        for (i, seg) in self.segments().enumerate() {
            if i == 0 {
                lookup.push(seg.start());
            }
            for j in 1..=steps {
                lookup.push(seg.eval(j as f64 / steps as f64));
            }
        }
        if lookup.is_empty() {
            let p = match self.0.first() {
                Some(PathEl::MoveTo(p)) => *p,
                _ => Point::ZERO,
            };
            lookup.push(p);
        }
        lookup
    }
}

impl FromIterator<PathEl> for TracePath {
    fn from_iter<T: IntoIterator<Item = PathEl>>(iter: T) -> TracePath {
        TracePath(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a TracePath {
    type Item = PathEl;
    type IntoIter = std::iter::Cloned<std::slice::Iter<'a, PathEl>>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements().iter().cloned()
    }
}

/// An iterator over a path's segments.
pub struct Segments<'a> {
    c: std::slice::Iter<'a, PathEl>,
    start: Point,
    last: Point,
}

impl<'a> Iterator for Segments<'a> {
    type Item = PathSeg;

    fn next(&mut self) -> Option<PathSeg> {
        for el in &mut self.c {
            let (ret, last) = match *el {
                PathEl::MoveTo(p) => {
                    self.start = p;
                    self.last = p;
                    continue;
                }
                PathEl::LineTo(p) => (PathSeg::Line(Line::new(self.last, p)), p),
                PathEl::QuadTo(p1, p2) => (PathSeg::Quad(QuadBez::new(self.last, p1, p2)), p2),
                PathEl::CurveTo(p1, p2, p3) => {
                    (PathSeg::Cubic(CubicBez::new(self.last, p1, p2, p3)), p3)
                }
                PathEl::ClosePath => {
                    if self.last != self.start {
                        (PathSeg::Line(Line::new(self.last, self.start)), self.start)
                    } else {
                        continue;
                    }
                }
            };

            self.last = last;
            return Some(ret);
        }
        None
    }
}

impl ParamCurve for PathSeg {
    fn eval(&self, t: f64) -> Point {
        match *self {
            PathSeg::Line(line) => line.eval(t),
            PathSeg::Quad(quad) => quad.eval(t),
            PathSeg::Cubic(cubic) => cubic.eval(t),
        }
    }

    fn start(&self) -> Point {
        match *self {
            PathSeg::Line(line) => line.start(),
            PathSeg::Quad(quad) => quad.start(),
            PathSeg::Cubic(cubic) => cubic.start(),
        }
    }

    fn end(&self) -> Point {
        match *self {
            PathSeg::Line(line) => line.end(),
            PathSeg::Quad(quad) => quad.end(),
            PathSeg::Cubic(cubic) => cubic.end(),
        }
    }
}
