// Copyright 2025 the Stackpaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decoded paint operations.
//!
//! A [`PaintOp`] is the typed form of one instruction plus all of its
//! operands. Decoding a stream yields these records in order; replaying them
//! is a plain `match` with no access to the operand stacks.

use alloc::vec::Vec;

use kurbo::{Affine, BezPath, Cap, Join, Point, Rect};
use peniko::ImageQuality;
use smallvec::SmallVec;

use crate::{CanvasPath, Opcode};

/// Dash lengths, alternating on/off.
pub type DashPattern = SmallVec<[f64; 4]>;

/// Stroke attributes carried by one set-stroke instruction.
#[derive(Clone, Debug, PartialEq)]
pub struct StrokeAttrs {
    /// Line width.
    pub width: f64,
    /// Dash lengths; empty for a solid line.
    pub dash: DashPattern,
    /// Offset into the dash pattern. Always `0.0` when `dash` is empty.
    pub dash_offset: f64,
    /// Cap style for both ends of open subpaths.
    pub cap: Cap,
    /// Join style.
    pub join: Join,
    /// Miter limit, present only when `join` is [`Join::Miter`].
    ///
    /// A tolerated out-of-range join decodes as miter without a limit.
    ///
    /// `None` leaves the surface's current miter limit unchanged.
    pub miter_limit: Option<f64>,
}

impl StrokeAttrs {
    /// A solid stroke of the given width with round caps and joins.
    pub fn solid(width: f64) -> Self {
        Self {
            width,
            dash: DashPattern::new(),
            dash_offset: 0.0,
            cap: Cap::Round,
            join: Join::Round,
            miter_limit: None,
        }
    }

    /// Apply these attributes to a kurbo stroke.
    ///
    /// The miter limit is only written when it was present on the wire.
    pub fn apply_to(&self, stroke: &mut kurbo::Stroke) {
        stroke.width = self.width;
        stroke.dash_pattern.clear();
        stroke.dash_pattern.extend(self.dash.iter().copied());
        stroke.dash_offset = self.dash_offset;
        stroke.start_cap = self.cap;
        stroke.end_cap = self.cap;
        stroke.join = self.join;
        if let Some(limit) = self.miter_limit {
            stroke.miter_limit = limit;
        }
    }
}

/// Wire value for a cap style.
pub(crate) fn cap_from_wire(value: i32) -> Option<Cap> {
    match value {
        0 => Some(Cap::Round),
        1 => Some(Cap::Butt),
        2 => Some(Cap::Square),
        _ => None,
    }
}

pub(crate) fn cap_to_wire(cap: Cap) -> i32 {
    match cap {
        Cap::Round => 0,
        Cap::Butt => 1,
        Cap::Square => 2,
    }
}

/// The one join value that is followed by a miter limit.
pub(crate) const JOIN_MITER: i32 = 2;

/// Wire value for a join style.
pub(crate) fn join_from_wire(value: i32) -> Option<Join> {
    match value {
        0 => Some(Join::Round),
        1 => Some(Join::Bevel),
        JOIN_MITER => Some(Join::Miter),
        _ => None,
    }
}

pub(crate) fn join_to_wire(join: Join) -> i32 {
    match join {
        Join::Round => 0,
        Join::Bevel => 1,
        Join::Miter => JOIN_MITER,
    }
}

/// Image smoothing state derived from a scalar quality in `0..=1`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ImageSmoothing {
    /// Whether smoothing is applied at all.
    pub enabled: bool,
    /// Filter quality used while smoothing.
    pub quality: ImageQuality,
}

impl ImageSmoothing {
    /// Map a scalar quality onto three levels.
    ///
    /// Above `0.67` is high, above `0.33` is medium, anything else is low with
    /// smoothing disabled.
    pub fn from_quality(quality: f64) -> Self {
        let level = if quality > 0.67 {
            ImageQuality::High
        } else if quality > 0.33 {
            ImageQuality::Medium
        } else {
            ImageQuality::Low
        };
        Self {
            enabled: quality > 0.33,
            quality: level,
        }
    }
}

impl Default for ImageSmoothing {
    /// Canvas default: enabled at low quality.
    fn default() -> Self {
        Self {
            enabled: true,
            quality: ImageQuality::Low,
        }
    }
}

/// One operation of a path sub-stream.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PathOp {
    /// Start a new subpath.
    MoveTo(Point),
    /// Straight line from the current point.
    LineTo(Point),
    /// Cubic Bézier from the current point through two control points.
    CurveTo(Point, Point, Point),
    /// Close the current subpath.
    Close,
}

/// Geometry built by a shape sub-stream.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    /// Rectangle shortcut.
    ///
    /// The rectangle keeps the sign of its width and height: `x0, y0` is the
    /// origin and `x1, y1` is `origin + size`.
    Rect(Rect),
    /// Explicit path operations.
    Path(Vec<PathOp>),
}

impl Shape {
    /// Rectangle from an origin and a (possibly negative) size.
    #[inline]
    pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::Rect(Rect::new(x, y, x + width, y + height))
    }

    /// The geometry of this shape as a path, using canvas path semantics.
    pub fn to_bez_path(&self) -> BezPath {
        let mut path = CanvasPath::new();
        match self {
            Self::Rect(rect) => path.rect(*rect),
            Self::Path(ops) => {
                for op in ops {
                    path.push_op(*op);
                }
            }
        }
        path.into_bez_path()
    }
}

/// Text drawn at a position with optional extra per-character advance.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TextRun<'a> {
    /// Text to draw.
    pub text: &'a str,
    /// Pen position of the first character.
    pub origin: Point,
    /// Extra advance after each character. Exactly `0.0` draws the whole run
    /// with a single primitive.
    pub char_spacing: f64,
}

/// A decoded instruction with its operands.
///
/// `N` is the surface's native reference type; natives are borrowed from the
/// native stack and `None` stands for a null reference.
#[derive(Clone, Debug, PartialEq)]
pub enum PaintOp<'a, N> {
    /// Set the current font.
    SetFont(Option<&'a N>),
    /// Set both fill and stroke paint.
    SetPaint(Option<&'a N>),
    /// Set stroke attributes.
    SetStroke(StrokeAttrs),
    /// Set global opacity.
    SetOpacity(f64),
    /// Stroke a shape.
    StrokeShape(Shape),
    /// Fill a shape.
    FillShape(Shape),
    /// Clip to a shape.
    ClipShape(Shape),
    /// Draw `src` (image pixels) of an image into `dst` (local coordinates).
    DrawImageRect {
        /// Image to draw; `None` draws nothing.
        image: Option<&'a N>,
        /// Source rectangle.
        src: Rect,
        /// Destination rectangle.
        dst: Rect,
    },
    /// Draw an image at the origin of `transform`.
    ///
    /// `transform` is the raw wire matrix; the device scale is applied when
    /// the op is replayed.
    DrawImage {
        /// Image to draw; `None` draws nothing.
        image: Option<&'a N>,
        /// Absolute transform for the image.
        transform: Affine,
    },
    /// Fill text.
    FillText(TextRun<'a>),
    /// Stroke text.
    StrokeText(TextRun<'a>),
    /// Compose onto the current transform.
    Transform(Affine),
    /// Replace the current transform (raw wire matrix, unscaled).
    SetTransform(Affine),
    /// Push surface state.
    Save,
    /// Pop surface state.
    Restore,
    /// Clear a rectangle.
    ClearRect(Rect),
    /// Set image smoothing from the raw scalar quality.
    SetImageQuality(f64),
}

impl<N> PaintOp<'_, N> {
    /// The instruction this op was decoded from.
    pub fn opcode(&self) -> Opcode {
        match self {
            Self::SetFont(_) => Opcode::SetFont,
            Self::SetPaint(_) => Opcode::SetPaint,
            Self::SetStroke(_) => Opcode::SetStroke,
            Self::SetOpacity(_) => Opcode::SetOpacity,
            Self::StrokeShape(_) => Opcode::StrokeShape,
            Self::FillShape(_) => Opcode::FillShape,
            Self::ClipShape(_) => Opcode::ClipShape,
            Self::DrawImageRect { .. } => Opcode::DrawImageRect,
            Self::DrawImage { .. } => Opcode::DrawImage,
            Self::FillText(_) => Opcode::FillText,
            Self::StrokeText(_) => Opcode::StrokeText,
            Self::Transform(_) => Opcode::Transform,
            Self::SetTransform(_) => Opcode::SetTransform,
            Self::Save => Opcode::Save,
            Self::Restore => Opcode::Restore,
            Self::ClearRect(_) => Opcode::ClearRect,
            Self::SetImageQuality(_) => Opcode::SetImageQuality,
        }
    }
}

/// Apply the device scale to the two diagonal terms of a wire matrix.
///
/// Translation and skew terms are left as-is.
#[inline]
pub fn scale_diagonal(matrix: Affine, device_scale: f64) -> Affine {
    let [a, b, c, d, e, f] = matrix.as_coeffs();
    Affine::new([a * device_scale, b, c, d * device_scale, e, f])
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use kurbo::{PathEl, Shape as _};

    #[test]
    fn smoothing_thresholds() {
        let low = ImageSmoothing::from_quality(0.33);
        assert!(!low.enabled);
        assert_eq!(low.quality, ImageQuality::Low);

        let medium = ImageSmoothing::from_quality(0.5);
        assert!(medium.enabled);
        assert_eq!(medium.quality, ImageQuality::Medium);

        let still_medium = ImageSmoothing::from_quality(0.67);
        assert_eq!(still_medium.quality, ImageQuality::Medium);

        let high = ImageSmoothing::from_quality(1.0);
        assert!(high.enabled);
        assert_eq!(high.quality, ImageQuality::High);

        assert!(!ImageSmoothing::from_quality(f64::NAN).enabled);
    }

    #[test]
    fn missing_miter_limit_keeps_previous() {
        let mut stroke = kurbo::Stroke::new(1.0).with_miter_limit(7.0);
        let mut attrs = StrokeAttrs::solid(3.0);
        attrs.dash.extend([2.0, 1.0]);
        attrs.dash_offset = 0.5;
        attrs.apply_to(&mut stroke);
        assert_eq!(stroke.width, 3.0);
        assert_eq!(stroke.miter_limit, 7.0);
        assert_eq!(stroke.dash_pattern.as_slice(), &[2.0, 1.0]);
        assert_eq!(stroke.dash_offset, 0.5);

        attrs.join = Join::Miter;
        attrs.miter_limit = Some(2.5);
        attrs.apply_to(&mut stroke);
        assert_eq!(stroke.miter_limit, 2.5);
        assert_eq!(stroke.join, Join::Miter);
    }

    #[test]
    fn rect_shape_matches_explicit_path() {
        let rect = Shape::rect(10.0, 20.0, 30.0, 40.0);
        let path = Shape::Path(vec![
            PathOp::MoveTo(Point::new(10.0, 20.0)),
            PathOp::LineTo(Point::new(40.0, 20.0)),
            PathOp::LineTo(Point::new(40.0, 60.0)),
            PathOp::LineTo(Point::new(10.0, 60.0)),
            PathOp::Close,
        ]);
        let a = rect.to_bez_path();
        let b = path.to_bez_path();
        assert_eq!(a.elements(), b.elements());
        assert_eq!(a.bounding_box(), Rect::new(10.0, 20.0, 40.0, 60.0));
    }

    #[test]
    fn negative_rect_keeps_its_origin() {
        let Shape::Rect(rect) = Shape::rect(10.0, 10.0, -4.0, 6.0) else {
            panic!("expected a rect shape");
        };
        assert_eq!(rect.x0, 10.0);
        assert_eq!(rect.x1, 6.0);
        let path = Shape::rect(10.0, 10.0, -4.0, 6.0).to_bez_path();
        assert_eq!(
            path.elements().first(),
            Some(&PathEl::MoveTo(Point::new(10.0, 10.0)))
        );
    }

    #[test]
    fn diagonal_scale_leaves_translation() {
        let m = Affine::new([1.0, 0.5, 0.25, 1.0, 7.0, 9.0]);
        assert_eq!(
            scale_diagonal(m, 2.0).as_coeffs(),
            [2.0, 0.5, 0.25, 2.0, 7.0, 9.0]
        );
        assert_eq!(scale_diagonal(Affine::IDENTITY, 3.0), Affine::scale(3.0));
    }
}
