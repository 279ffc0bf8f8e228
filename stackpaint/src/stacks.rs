// Copyright 2025 the Stackpaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The five wire sequences: instructions plus four typed operand stacks.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Affine, Rect};

use crate::op::{cap_to_wire, join_to_wire};
use crate::opcode::RECT_SHORTCUT;
use crate::{PaintError, PaintOp, PathOp, PathTag, Shape, TextRun};

/// Borrowed view of one frame's instruction stream and operand stacks.
///
/// `instructions` is already cut to its logical length; see [`Stacks::new`].
#[derive(Debug)]
pub struct Stacks<'a, N> {
    /// Instruction tags, in execution order.
    pub instructions: &'a [i32],
    /// Integer operands.
    pub ints: &'a [i32],
    /// Real operands.
    pub reals: &'a [f64],
    /// Text operands.
    pub texts: &'a [String],
    /// Native operands; `None` is a null reference.
    pub natives: &'a [Option<N>],
}

impl<N> Clone for Stacks<'_, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N> Copy for Stacks<'_, N> {}

impl<'a, N> Stacks<'a, N> {
    /// Build a view from host buffers.
    ///
    /// Hosts typically hand over a grown buffer together with the number of
    /// instructions actually written; only the first `instruction_count`
    /// tags are executed.
    pub fn new(
        instructions: &'a [i32],
        instruction_count: usize,
        ints: &'a [i32],
        reals: &'a [f64],
        texts: &'a [String],
        natives: &'a [Option<N>],
    ) -> Result<Self, PaintError> {
        let instructions =
            instructions
                .get(..instruction_count)
                .ok_or(PaintError::InstructionCountOutOfRange {
                    count: instruction_count,
                    len: instructions.len(),
                })?;
        Ok(Self {
            instructions,
            ints,
            reals,
            texts,
            natives,
        })
    }

    /// Sizes of each sequence.
    pub fn lens(&self) -> StackPositions {
        StackPositions {
            instructions: self.instructions.len(),
            ints: self.ints.len(),
            reals: self.reals.len(),
            texts: self.texts.len(),
            natives: self.natives.len(),
        }
    }
}

/// A count per wire sequence.
///
/// Used both for how far each cursor advanced and for what was left unread.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct StackPositions {
    /// Instruction tags.
    pub instructions: usize,
    /// Integer operands.
    pub ints: usize,
    /// Real operands.
    pub reals: usize,
    /// Text operands.
    pub texts: usize,
    /// Native operands.
    pub natives: usize,
}

impl StackPositions {
    /// Returns `true` if every count is zero.
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// Owned, growable wire buffers.
///
/// This writes [`PaintOp`]s in exactly the layout the decoder reads, so a
/// Rust host can produce streams without hand-placing operands. Buffers keep
/// their capacity across [`PaintStacks::clear`] for reuse frame after frame.
#[derive(Clone, Debug)]
pub struct PaintStacks<N> {
    instructions: Vec<i32>,
    ints: Vec<i32>,
    reals: Vec<f64>,
    texts: Vec<String>,
    natives: Vec<Option<N>>,
}

impl<N> Default for PaintStacks<N> {
    fn default() -> Self {
        Self {
            instructions: Vec::new(),
            ints: Vec::new(),
            reals: Vec::new(),
            texts: Vec::new(),
            natives: Vec::new(),
        }
    }
}

impl<N> PaintStacks<N> {
    /// Create empty buffers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all recorded instructions and operands, keeping allocations.
    pub fn clear(&mut self) {
        self.instructions.clear();
        self.ints.clear();
        self.reals.clear();
        self.texts.clear();
        self.natives.clear();
    }

    /// Number of recorded instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Borrow the buffers as a decodable view.
    pub fn as_stacks(&self) -> Stacks<'_, N> {
        Stacks {
            instructions: &self.instructions,
            ints: &self.ints,
            reals: &self.reals,
            texts: &self.texts,
            natives: &self.natives,
        }
    }

    /// Append a raw instruction tag without operands.
    ///
    /// Mainly useful for exercising how consumers treat tags they do not know.
    pub fn push_raw_instruction(&mut self, tag: i32) {
        self.instructions.push(tag);
    }

    /// Append one operation and its operands.
    ///
    /// Rectangles go on the wire as origin and size and are rebuilt as
    /// origin plus size, so a decoded `x1`/`y1` can differ from the pushed
    /// one in the last bit. Integer coordinates come back exactly.
    pub fn push(&mut self, op: &PaintOp<'_, N>)
    where
        N: Clone,
    {
        self.instructions.push(op.opcode().tag());
        match op {
            PaintOp::SetFont(native) | PaintOp::SetPaint(native) => {
                self.natives.push(native.cloned());
            }
            PaintOp::SetStroke(attrs) => {
                self.reals.push(attrs.width);
                let dash_len = i32::try_from(attrs.dash.len()).unwrap_or(i32::MAX);
                self.ints.push(dash_len);
                self.reals.extend(attrs.dash.iter().copied());
                if !attrs.dash.is_empty() {
                    self.reals.push(attrs.dash_offset);
                }
                self.ints.push(cap_to_wire(attrs.cap));
                self.ints.push(join_to_wire(attrs.join));
                if attrs.join == kurbo::Join::Miter {
                    self.reals.push(attrs.miter_limit.unwrap_or(10.0));
                }
            }
            PaintOp::SetOpacity(alpha) => self.reals.push(*alpha),
            PaintOp::StrokeShape(shape) | PaintOp::FillShape(shape) | PaintOp::ClipShape(shape) => {
                self.push_shape(shape);
            }
            PaintOp::DrawImageRect { image, src, dst } => {
                self.natives.push(image.cloned());
                self.push_rect(*src);
                self.push_rect(*dst);
            }
            PaintOp::DrawImage { image, transform } => {
                self.natives.push(image.cloned());
                self.push_affine(*transform);
            }
            PaintOp::FillText(run) | PaintOp::StrokeText(run) => self.push_text(run),
            PaintOp::Transform(xf) | PaintOp::SetTransform(xf) => self.push_affine(*xf),
            PaintOp::Save | PaintOp::Restore => {}
            PaintOp::ClearRect(rect) => self.push_rect(*rect),
            PaintOp::SetImageQuality(quality) => self.reals.push(*quality),
        }
    }

    fn push_rect(&mut self, rect: Rect) {
        self.reals
            .extend([rect.x0, rect.y0, rect.x1 - rect.x0, rect.y1 - rect.y0]);
    }

    fn push_affine(&mut self, xf: Affine) {
        self.reals.extend(xf.as_coeffs());
    }

    fn push_text(&mut self, run: &TextRun<'_>) {
        self.texts.push(String::from(run.text));
        self.reals
            .extend([run.origin.x, run.origin.y, run.char_spacing]);
    }

    fn push_shape(&mut self, shape: &Shape) {
        match shape {
            Shape::Rect(rect) => {
                self.ints.push(RECT_SHORTCUT);
                self.push_rect(*rect);
            }
            Shape::Path(ops) => {
                let count = i32::try_from(ops.len()).unwrap_or(i32::MAX);
                self.ints.push(count);
                for op in ops {
                    match *op {
                        PathOp::MoveTo(p) => {
                            self.ints.push(PathTag::MoveTo.tag());
                            self.reals.extend([p.x, p.y]);
                        }
                        PathOp::LineTo(p) => {
                            self.ints.push(PathTag::LineTo.tag());
                            self.reals.extend([p.x, p.y]);
                        }
                        PathOp::CurveTo(p1, p2, p3) => {
                            self.ints.push(PathTag::CubicTo.tag());
                            self.reals.extend([p1.x, p1.y, p2.x, p2.y, p3.x, p3.y]);
                        }
                        PathOp::Close => self.ints.push(PathTag::Close.tag()),
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{StrokeAttrs, UnknownTagPolicy, decode};
    use alloc::vec;
    use kurbo::{Join, Point};

    #[test]
    fn count_beyond_buffer_is_rejected() {
        let natives: [Option<()>; 0] = [];
        let err = Stacks::new(&[1, 2], 3, &[], &[], &[], &natives).unwrap_err();
        assert_eq!(err, PaintError::InstructionCountOutOfRange { count: 3, len: 2 });
    }

    #[test]
    fn count_truncates_spare_capacity() {
        let natives: [Option<()>; 0] = [];
        let stacks = Stacks::new(&[14, 15, 0, 0], 2, &[], &[], &[], &natives).unwrap();
        assert_eq!(stacks.instructions, &[14, 15]);
    }

    #[test]
    fn stroke_layout_matches_wire() {
        let mut stacks = PaintStacks::<()>::new();
        let mut attrs = StrokeAttrs::solid(2.0);
        stacks.push(&PaintOp::SetStroke(attrs.clone()));
        assert_eq!(stacks.ints, vec![0, 0, 0]);
        assert_eq!(stacks.reals, vec![2.0]);

        stacks.clear();
        attrs.dash.extend([4.0, 2.0]);
        attrs.dash_offset = 1.0;
        attrs.join = Join::Miter;
        attrs.miter_limit = Some(3.0);
        stacks.push(&PaintOp::SetStroke(attrs));
        assert_eq!(stacks.instructions, vec![3]);
        assert_eq!(stacks.ints, vec![2, 0, 2]);
        assert_eq!(stacks.reals, vec![2.0, 4.0, 2.0, 1.0, 3.0]);
    }

    #[test]
    fn rects_come_back_within_rounding() {
        let fractional = Rect::new(0.1, 0.2, 0.7, 1.3);
        let whole = Rect::new(-3.0, 4.0, 10.0, 2.0);
        let mut stacks = PaintStacks::<()>::new();
        stacks.push(&PaintOp::ClearRect(fractional));
        stacks.push(&PaintOp::ClearRect(whole));

        let program = decode(&stacks.as_stacks(), UnknownTagPolicy::Reject).unwrap();
        let PaintOp::ClearRect(decoded) = program.ops[0] else {
            panic!("expected clear-rect");
        };
        let near = |a: f64, b: f64| (a - b) * (a - b) < 1e-24;
        assert_eq!((decoded.x0, decoded.y0), (fractional.x0, fractional.y0));
        assert!(near(decoded.x1, fractional.x1));
        assert!(near(decoded.y1, fractional.y1));
        assert_eq!(program.ops[1], PaintOp::ClearRect(whole));
    }

    #[test]
    fn path_shape_writes_count_then_tags() {
        let mut stacks = PaintStacks::<()>::new();
        stacks.push(&PaintOp::FillShape(Shape::Path(vec![
            PathOp::MoveTo(Point::new(1.0, 2.0)),
            PathOp::LineTo(Point::new(3.0, 4.0)),
            PathOp::Close,
        ])));
        stacks.push(&PaintOp::ClipShape(Shape::rect(0.0, 0.0, 5.0, 6.0)));
        assert_eq!(stacks.instructions, vec![6, 7]);
        assert_eq!(stacks.ints, vec![3, 0, 1, 3, -1]);
        assert_eq!(stacks.reals, vec![1.0, 2.0, 3.0, 4.0, 0.0, 0.0, 5.0, 6.0]);
    }
}
