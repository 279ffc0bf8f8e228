// Copyright 2025 the Stackpaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decoding the instruction stream into [`PaintOp`]s.

use alloc::vec::Vec;

use kurbo::{Affine, Cap, Join, Point, Rect};

use crate::cursor::{Cursor, Underflow};
use crate::op::{JOIN_MITER, cap_from_wire, join_from_wire};
use crate::opcode::RECT_SHORTCUT;
use crate::{
    DashPattern, Opcode, OperandKind, PaintError, PaintOp, PathOp, PathTag, Shape, StackPositions,
    Stacks, StrokeAttrs, TextRun,
};

/// What to do with an instruction or path tag that has no meaning.
///
/// The same choice covers out-of-range caps, joins and negative counts: under
/// `Skip` they fall back to square, miter and zero.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum UnknownTagPolicy {
    /// Log it, read no operands for it, and continue.
    ///
    /// If the producer did write operands for the tag, every later
    /// instruction in the pass reads the wrong values.
    #[default]
    Skip,
    /// Fail the pass.
    Reject,
}

/// Counters gathered while decoding.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DecodeStats {
    /// Unknown instruction tags that were skipped.
    pub skipped_opcodes: usize,
    /// Unknown path tags that were skipped inside shapes.
    pub skipped_path_ops: usize,
    /// How far each cursor advanced.
    pub consumed: StackPositions,
    /// Values left unread on each sequence.
    pub remaining: StackPositions,
}

/// A fully decoded stream.
#[derive(Clone, Debug)]
pub struct Program<'a, N> {
    /// Operations in execution order.
    pub ops: Vec<PaintOp<'a, N>>,
    /// Decode counters.
    pub stats: DecodeStats,
}

/// Decode a whole stream.
///
/// Nothing is drawn here; any wire error surfaces before a surface sees a
/// single call.
pub fn decode<'a, N>(
    stacks: &Stacks<'a, N>,
    policy: UnknownTagPolicy,
) -> Result<Program<'a, N>, PaintError> {
    let mut decoder = Decoder::new(stacks, policy);
    let ops = decoder.by_ref().collect::<Result<Vec<_>, _>>()?;
    Ok(Program {
        ops,
        stats: decoder.stats(),
    })
}

/// Streaming decoder over one set of stacks.
///
/// Yields one [`PaintOp`] per known instruction. After an error the iterator
/// is fused and yields nothing more.
#[derive(Debug)]
pub struct Decoder<'a, N> {
    instructions: Cursor<'a, i32>,
    ints: Cursor<'a, i32>,
    reals: Cursor<'a, f64>,
    texts: Cursor<'a, alloc::string::String>,
    natives: Cursor<'a, Option<N>>,
    policy: UnknownTagPolicy,
    /// Index and opcode of the instruction being decoded.
    current: (usize, Opcode),
    skipped_opcodes: usize,
    skipped_path_ops: usize,
    failed: bool,
}

impl<'a, N> Decoder<'a, N> {
    /// Start decoding with all cursors at zero.
    pub fn new(stacks: &Stacks<'a, N>, policy: UnknownTagPolicy) -> Self {
        Self {
            instructions: Cursor::new(stacks.instructions, OperandKind::Int),
            ints: Cursor::new(stacks.ints, OperandKind::Int),
            reals: Cursor::new(stacks.reals, OperandKind::Real),
            texts: Cursor::new(stacks.texts, OperandKind::Text),
            natives: Cursor::new(stacks.natives, OperandKind::Native),
            policy,
            current: (0, Opcode::Save),
            skipped_opcodes: 0,
            skipped_path_ops: 0,
            failed: false,
        }
    }

    /// Counters for what has been decoded so far.
    pub fn stats(&self) -> DecodeStats {
        DecodeStats {
            skipped_opcodes: self.skipped_opcodes,
            skipped_path_ops: self.skipped_path_ops,
            consumed: StackPositions {
                instructions: self.instructions.position(),
                ints: self.ints.position(),
                reals: self.reals.position(),
                texts: self.texts.position(),
                natives: self.natives.position(),
            },
            remaining: StackPositions {
                instructions: self.instructions.remaining(),
                ints: self.ints.remaining(),
                reals: self.reals.remaining(),
                texts: self.texts.remaining(),
                natives: self.natives.remaining(),
            },
        }
    }

    fn underflow(&self, err: Underflow) -> PaintError {
        PaintError::StackUnderflow {
            kind: err.kind,
            index: err.index,
            instruction: self.current.0,
            opcode: self.current.1,
        }
    }

    fn int(&mut self) -> Result<i32, PaintError> {
        self.ints.read_copied().map_err(|e| self.underflow(e))
    }

    fn real(&mut self) -> Result<f64, PaintError> {
        self.reals.read_copied().map_err(|e| self.underflow(e))
    }

    fn point(&mut self) -> Result<Point, PaintError> {
        Ok(Point::new(self.real()?, self.real()?))
    }

    /// `x, y, w, h` as a sign-preserving rectangle.
    fn rect(&mut self) -> Result<Rect, PaintError> {
        let (x, y) = (self.real()?, self.real()?);
        let (w, h) = (self.real()?, self.real()?);
        Ok(Rect::new(x, y, x + w, y + h))
    }

    fn affine(&mut self) -> Result<Affine, PaintError> {
        let mut coeffs = [0.0; 6];
        for c in &mut coeffs {
            *c = self.real()?;
        }
        Ok(Affine::new(coeffs))
    }

    fn text(&mut self) -> Result<&'a str, PaintError> {
        match self.texts.read() {
            Ok(text) => Ok(text.as_str()),
            Err(e) => Err(self.underflow(e)),
        }
    }

    fn native(&mut self) -> Result<Option<&'a N>, PaintError> {
        match self.natives.read() {
            Ok(native) => Ok(native.as_ref()),
            Err(e) => Err(self.underflow(e)),
        }
    }

    fn invalid(&self, what: &'static str, value: i32) -> PaintError {
        PaintError::InvalidOperand {
            what,
            value,
            instruction: self.current.0,
        }
    }

    /// Accept an out-of-range enumeration or count under [`UnknownTagPolicy::Skip`].
    ///
    /// The caller substitutes its fallback after this returns `Ok`.
    fn out_of_range(&self, what: &'static str, value: i32) -> Result<(), PaintError> {
        if self.policy == UnknownTagPolicy::Reject {
            return Err(self.invalid(what, value));
        }
        tracing::warn!(
            what,
            value,
            instruction = self.current.0,
            "out-of-range operand; using fallback"
        );
        Ok(())
    }

    /// A count that reads zero items when negative.
    fn count(&mut self, what: &'static str) -> Result<usize, PaintError> {
        let value = self.int()?;
        match usize::try_from(value) {
            Ok(count) => Ok(count),
            Err(_) => self.out_of_range(what, value).map(|()| 0),
        }
    }

    fn stroke(&mut self) -> Result<StrokeAttrs, PaintError> {
        let width = self.real()?;
        let dash_len = self.count("dash count")?;
        // Cap the preallocation by what the real stack can still supply.
        let mut dash = DashPattern::with_capacity(dash_len.min(self.reals.remaining()));
        for _ in 0..dash_len {
            dash.push(self.real()?);
        }
        let dash_offset = if dash_len > 0 { self.real()? } else { 0.0 };
        let cap_value = self.int()?;
        let cap = match cap_from_wire(cap_value) {
            Some(cap) => cap,
            None => self.out_of_range("line cap", cap_value).map(|()| Cap::Square)?,
        };
        let join_value = self.int()?;
        let join = match join_from_wire(join_value) {
            Some(join) => join,
            None => self.out_of_range("line join", join_value).map(|()| Join::Miter)?,
        };
        // Only an explicit miter join carries a limit on the wire.
        let miter_limit = if join_value == JOIN_MITER {
            Some(self.real()?)
        } else {
            None
        };
        Ok(StrokeAttrs {
            width,
            dash,
            dash_offset,
            cap,
            join,
            miter_limit,
        })
    }

    /// The shape sub-stream: a rect shortcut or a counted list of path ops.
    fn shape(&mut self) -> Result<Shape, PaintError> {
        let count = self.int()?;
        if count == RECT_SHORTCUT {
            return Ok(Shape::Rect(self.rect()?));
        }
        let count = match usize::try_from(count) {
            Ok(count) => count,
            Err(_) => self.out_of_range("path op count", count).map(|()| 0)?,
        };
        // Cap the preallocation by what the int stack can still supply.
        let mut ops = Vec::with_capacity(count.min(self.ints.remaining()));
        for _ in 0..count {
            let tag = self.int()?;
            let op = match PathTag::from_tag(tag) {
                Some(PathTag::MoveTo) => PathOp::MoveTo(self.point()?),
                Some(PathTag::LineTo) => PathOp::LineTo(self.point()?),
                Some(PathTag::CubicTo) => {
                    PathOp::CurveTo(self.point()?, self.point()?, self.point()?)
                }
                Some(PathTag::Close) => PathOp::Close,
                None => {
                    if self.policy == UnknownTagPolicy::Reject {
                        return Err(PaintError::UnknownPathOp {
                            tag,
                            instruction: self.current.0,
                        });
                    }
                    tracing::warn!(
                        tag,
                        instruction = self.current.0,
                        "unknown path operation; skipping"
                    );
                    self.skipped_path_ops += 1;
                    continue;
                }
            };
            ops.push(op);
        }
        Ok(Shape::Path(ops))
    }

    fn text_run(&mut self) -> Result<TextRun<'a>, PaintError> {
        let text = self.text()?;
        let origin = self.point()?;
        let char_spacing = self.real()?;
        Ok(TextRun {
            text,
            origin,
            char_spacing,
        })
    }

    fn decode_op(&mut self, opcode: Opcode) -> Result<PaintOp<'a, N>, PaintError> {
        Ok(match opcode {
            Opcode::SetFont => PaintOp::SetFont(self.native()?),
            Opcode::SetPaint => PaintOp::SetPaint(self.native()?),
            Opcode::SetStroke => PaintOp::SetStroke(self.stroke()?),
            Opcode::SetOpacity => PaintOp::SetOpacity(self.real()?),
            Opcode::StrokeShape => PaintOp::StrokeShape(self.shape()?),
            Opcode::FillShape => PaintOp::FillShape(self.shape()?),
            Opcode::ClipShape => PaintOp::ClipShape(self.shape()?),
            Opcode::DrawImageRect => {
                let image = self.native()?;
                let src = self.rect()?;
                let dst = self.rect()?;
                PaintOp::DrawImageRect { image, src, dst }
            }
            Opcode::DrawImage => {
                let image = self.native()?;
                let transform = self.affine()?;
                PaintOp::DrawImage { image, transform }
            }
            Opcode::FillText => PaintOp::FillText(self.text_run()?),
            Opcode::StrokeText => PaintOp::StrokeText(self.text_run()?),
            Opcode::Transform => PaintOp::Transform(self.affine()?),
            Opcode::SetTransform => PaintOp::SetTransform(self.affine()?),
            Opcode::Save => PaintOp::Save,
            Opcode::Restore => PaintOp::Restore,
            Opcode::ClearRect => PaintOp::ClearRect(self.rect()?),
            Opcode::SetImageQuality => PaintOp::SetImageQuality(self.real()?),
        })
    }
}

impl<'a, N> Iterator for Decoder<'a, N> {
    type Item = Result<PaintOp<'a, N>, PaintError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            let index = self.instructions.position();
            let tag = self.instructions.read_copied().ok()?;
            let Some(opcode) = Opcode::from_tag(tag) else {
                if self.policy == UnknownTagPolicy::Reject {
                    self.failed = true;
                    return Some(Err(PaintError::UnknownOpcode {
                        tag,
                        instruction: index,
                    }));
                }
                tracing::warn!(tag, instruction = index, "unknown instruction; skipping");
                self.skipped_opcodes += 1;
                continue;
            };
            self.current = (index, opcode);
            let result = self.decode_op(opcode);
            self.failed = result.is_err();
            return Some(result);
        }
    }
}

impl<N> core::iter::FusedIterator for Decoder<'_, N> {}
