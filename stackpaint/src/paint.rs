// Copyright 2025 the Stackpaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Replaying paint streams onto a [`Surface2d`].

use kurbo::{Affine, Point};

use crate::decode::{DecodeStats, decode};
use crate::{
    ImageSmoothing, PaintError, PaintOp, PathOp, Shape, StackPositions, Stacks, Surface2d, TextRun,
    UnknownTagPolicy, scale_diagonal,
};

/// Per-pass configuration.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PaintOptions {
    /// Ratio of surface pixels to logical units.
    pub device_scale: f64,
    /// Handling of unknown instruction and path tags.
    pub unknown_tags: UnknownTagPolicy,
}

impl Default for PaintOptions {
    fn default() -> Self {
        Self {
            device_scale: 1.0,
            unknown_tags: UnknownTagPolicy::Skip,
        }
    }
}

impl PaintOptions {
    /// Options with the given device scale and default tag handling.
    pub fn with_scale(device_scale: f64) -> Self {
        Self {
            device_scale,
            ..Self::default()
        }
    }
}

/// Summary of a finished pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Operations replayed onto the surface.
    pub ops: usize,
    /// Unknown instruction tags that were skipped.
    pub skipped_opcodes: usize,
    /// Unknown path tags that were skipped.
    pub skipped_path_ops: usize,
    /// Values read from each sequence.
    pub consumed: StackPositions,
    /// Values left unread on each sequence.
    pub remaining: StackPositions,
}

impl PassReport {
    fn new(ops: usize, stats: DecodeStats) -> Self {
        Self {
            ops,
            skipped_opcodes: stats.skipped_opcodes,
            skipped_path_ops: stats.skipped_path_ops,
            consumed: stats.consumed,
            remaining: stats.remaining,
        }
    }

    /// Returns `true` if every sequence was read to its end and nothing was
    /// skipped.
    pub fn is_exact(&self) -> bool {
        self.remaining.is_zero() && self.skipped_opcodes == 0 && self.skipped_path_ops == 0
    }
}

/// Decode a stream and replay it onto `surface`.
///
/// Decoding runs to completion first, so on error the surface has not been
/// touched.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(device_scale = options.device_scale, instructions = stacks.instructions.len())
)]
pub fn paint_stacks<S: Surface2d>(
    surface: &mut S,
    stacks: &Stacks<'_, S::Native>,
    options: &PaintOptions,
) -> Result<PassReport, PaintError> {
    let program = decode(stacks, options.unknown_tags)?;
    replay(surface, &program.ops, options.device_scale);
    let report = PassReport::new(program.ops.len(), program.stats);
    tracing::debug!(
        ops = report.ops,
        skipped_opcodes = report.skipped_opcodes,
        skipped_path_ops = report.skipped_path_ops,
        leftover_ints = report.remaining.ints,
        leftover_reals = report.remaining.reals,
        leftover_texts = report.remaining.texts,
        leftover_natives = report.remaining.natives,
        "paint pass finished"
    );
    Ok(report)
}

/// Replay decoded operations.
///
/// The surface transform is first reset to a uniform `device_scale`; each op
/// is then applied in order.
pub fn replay<S: Surface2d>(surface: &mut S, ops: &[PaintOp<'_, S::Native>], device_scale: f64) {
    surface.set_transform(Affine::scale(device_scale));
    for (index, op) in ops.iter().enumerate() {
        tracing::trace!(index, opcode = %op.opcode(), "replay");
        apply(surface, op, device_scale);
    }
}

fn apply<S: Surface2d>(surface: &mut S, op: &PaintOp<'_, S::Native>, device_scale: f64) {
    match op {
        PaintOp::SetFont(font) => {
            if let Some(font) = font {
                surface.set_font(font);
            }
        }
        PaintOp::SetPaint(paint) => {
            if let Some(paint) = paint {
                surface.set_paint(paint);
            }
        }
        PaintOp::SetStroke(attrs) => surface.set_stroke(attrs),
        PaintOp::SetOpacity(alpha) => surface.set_opacity(*alpha),
        PaintOp::StrokeShape(shape) => {
            build_shape(surface, shape);
            surface.stroke();
        }
        PaintOp::FillShape(shape) => {
            build_shape(surface, shape);
            surface.fill();
        }
        PaintOp::ClipShape(shape) => {
            build_shape(surface, shape);
            surface.clip();
        }
        PaintOp::DrawImageRect { image, src, dst } => {
            if let Some(image) = image {
                surface.draw_image_rect(image, *src, *dst);
            }
        }
        PaintOp::DrawImage { image, transform } => {
            surface.save();
            surface.set_transform(scale_diagonal(*transform, device_scale));
            if let Some(image) = image {
                surface.draw_image(image, Point::ORIGIN);
            }
            surface.restore();
        }
        PaintOp::FillText(run) => draw_text(surface, run, S::fill_text),
        PaintOp::StrokeText(run) => draw_text(surface, run, S::stroke_text),
        PaintOp::Transform(xf) => surface.transform(*xf),
        PaintOp::SetTransform(xf) => surface.set_transform(scale_diagonal(*xf, device_scale)),
        PaintOp::Save => surface.save(),
        PaintOp::Restore => surface.restore(),
        PaintOp::ClearRect(rect) => surface.clear_rect(*rect),
        PaintOp::SetImageQuality(quality) => {
            surface.set_image_smoothing(ImageSmoothing::from_quality(*quality));
        }
    }
}

fn build_shape<S: Surface2d>(surface: &mut S, shape: &Shape) {
    surface.begin_path();
    match shape {
        Shape::Rect(rect) => surface.rect(*rect),
        Shape::Path(ops) => {
            for op in ops {
                match *op {
                    PathOp::MoveTo(p) => surface.move_to(p),
                    PathOp::LineTo(p) => surface.line_to(p),
                    PathOp::CurveTo(p1, p2, p3) => surface.curve_to(p1, p2, p3),
                    PathOp::Close => surface.close_path(),
                }
            }
        }
    }
}

/// Draw a run whole, or one character at a time when it has extra spacing.
fn draw_text<S: Surface2d>(surface: &mut S, run: &TextRun<'_>, draw: fn(&mut S, &str, Point)) {
    if run.char_spacing == 0.0 {
        draw(surface, run.text, run.origin);
        return;
    }
    let mut pen = run.origin;
    let mut buf = [0_u8; 4];
    for c in run.text.chars() {
        let glyph: &str = c.encode_utf8(&mut buf);
        draw(surface, glyph, pen);
        pen.x += surface.measure_text(glyph) + run.char_spacing;
    }
}
