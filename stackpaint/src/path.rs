// Copyright 2025 the Stackpaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Path-in-progress with canvas construction rules.

use kurbo::{BezPath, PathEl, Point, Rect};

use crate::PathOp;

/// A path under construction, following canvas 2D rules.
///
/// Unlike building a [`BezPath`] directly, segments added while there is no
/// current point start a new subpath at their first point instead of being
/// rejected, matching `lineTo`/`bezierCurveTo` on an empty canvas path.
#[derive(Clone, Debug, Default)]
pub struct CanvasPath {
    path: BezPath,
    start: Option<Point>,
}

impl CanvasPath {
    /// Create an empty path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard all subpaths.
    pub fn clear(&mut self) {
        self.path = BezPath::new();
        self.start = None;
    }

    /// Start a new subpath at `p`.
    pub fn move_to(&mut self, p: Point) {
        self.path.push(PathEl::MoveTo(p));
        self.start = Some(p);
    }

    /// Add a line to `p`.
    pub fn line_to(&mut self, p: Point) {
        if self.ensure_subpath(p) {
            self.path.push(PathEl::LineTo(p));
        }
    }

    /// Add a cubic Bézier ending at `p3`.
    pub fn curve_to(&mut self, p1: Point, p2: Point, p3: Point) {
        self.ensure_subpath(p1);
        self.path.push(PathEl::CurveTo(p1, p2, p3));
    }

    /// Close the current subpath. Does nothing on an empty path.
    pub fn close_path(&mut self) {
        if self.start.is_some() {
            self.path.push(PathEl::ClosePath);
        }
    }

    /// Add a closed rectangular subpath starting at `(x0, y0)`.
    ///
    /// The corners are visited in the order origin, `+x`, `+x+y`, `+y`, so the
    /// rectangle's sign determines the winding direction.
    pub fn rect(&mut self, rect: Rect) {
        self.move_to(Point::new(rect.x0, rect.y0));
        self.path.push(PathEl::LineTo(Point::new(rect.x1, rect.y0)));
        self.path.push(PathEl::LineTo(Point::new(rect.x1, rect.y1)));
        self.path.push(PathEl::LineTo(Point::new(rect.x0, rect.y1)));
        self.path.push(PathEl::ClosePath);
    }

    /// Apply one decoded path operation.
    pub fn push_op(&mut self, op: PathOp) {
        match op {
            PathOp::MoveTo(p) => self.move_to(p),
            PathOp::LineTo(p) => self.line_to(p),
            PathOp::CurveTo(p1, p2, p3) => self.curve_to(p1, p2, p3),
            PathOp::Close => self.close_path(),
        }
    }

    /// Returns `true` if no elements have been added.
    pub fn is_empty(&self) -> bool {
        self.path.elements().is_empty()
    }

    /// Borrow the built geometry.
    pub fn as_bez_path(&self) -> &BezPath {
        &self.path
    }

    /// Take the built geometry.
    pub fn into_bez_path(self) -> BezPath {
        self.path
    }

    /// Begin a subpath at `p` if there is no current point.
    ///
    /// Returns `false` when `p` itself became the new start point.
    fn ensure_subpath(&mut self, p: Point) -> bool {
        if self.start.is_some() {
            return true;
        }
        self.move_to(p);
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_on_empty_path_starts_subpath() {
        let mut path = CanvasPath::new();
        path.line_to(Point::new(3.0, 4.0));
        path.line_to(Point::new(5.0, 6.0));
        assert_eq!(
            path.as_bez_path().elements(),
            &[
                PathEl::MoveTo(Point::new(3.0, 4.0)),
                PathEl::LineTo(Point::new(5.0, 6.0)),
            ]
        );
    }

    #[test]
    fn curve_on_empty_path_starts_at_first_control_point() {
        let mut path = CanvasPath::new();
        let (p1, p2, p3) = (Point::new(1.0, 1.0), Point::new(2.0, 2.0), Point::new(3.0, 1.0));
        path.curve_to(p1, p2, p3);
        assert_eq!(
            path.as_bez_path().elements(),
            &[PathEl::MoveTo(p1), PathEl::CurveTo(p1, p2, p3)]
        );
    }

    #[test]
    fn close_on_empty_path_is_ignored_and_clear_resets() {
        let mut path = CanvasPath::new();
        path.close_path();
        assert!(path.is_empty());

        path.rect(Rect::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(path.as_bez_path().elements().len(), 5);
        path.clear();
        assert!(path.is_empty());
        path.line_to(Point::new(1.0, 1.0));
        assert_eq!(
            path.as_bez_path().elements(),
            &[PathEl::MoveTo(Point::new(1.0, 1.0))]
        );
    }
}
