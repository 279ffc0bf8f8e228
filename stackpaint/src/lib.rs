// Copyright 2025 the Stackpaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stackpaint: batched 2D drawing over typed operand stacks.
//!
//! A host that owns fonts, paints and images as opaque handles can describe a
//! whole frame of drawing without one boundary crossing per primitive. It
//! writes an instruction list plus four typed operand stacks (integers, reals,
//! text and native references) and hands them over once; this crate decodes
//! them and replays them onto a retained 2D surface.
//!
//! # Position in the stack
//!
//! - **Producers** write instruction tags and operands, either by hand across
//!   an FFI boundary or with [`PaintStacks`] from Rust.
//! - **This crate** decodes the stream into typed [`PaintOp`]s and replays
//!   them in order against any [`Surface2d`].
//! - **Surfaces** own drawing state and the save/restore stack. See
//!   `stackpaint_ref` for a recording surface and `stackpaint_web_canvas` for
//!   an HTML canvas.
//!
//! # Wire format
//!
//! Each instruction is a small integer ([`Opcode`]) that consumes a fixed
//! arity of operands from the typed stacks, in a fixed order. Shapes use a
//! nested sub-stream: an integer count followed by that many path tags
//! ([`PathTag`]), or [`RECT_SHORTCUT`] followed by four reals.
//!
//! A pass is decoded completely before anything is drawn, so a malformed
//! stream fails with a [`PaintError`] and leaves the surface untouched.
//! Unknown tags are skipped by default; [`UnknownTagPolicy::Reject`] turns
//! them into errors.
//!
//! # Example
//!
//! ```
//! use stackpaint::{
//!     Affine, ImageSmoothing, PaintOp, PaintOptions, PaintStacks, Point, Rect, Shape,
//!     StrokeAttrs, Surface2d, paint_stacks,
//! };
//!
//! /// Remembers the paint and counts fills.
//! #[derive(Default)]
//! struct Fills {
//!     paint: Option<u32>,
//!     count: usize,
//! }
//!
//! impl Surface2d for Fills {
//!     type Native = u32;
//!     fn set_paint(&mut self, paint: &u32) {
//!         self.paint = Some(*paint);
//!     }
//!     fn fill(&mut self) {
//!         self.count += 1;
//!     }
//! #   fn set_font(&mut self, _: &u32) {}
//! #   fn set_stroke(&mut self, _: &StrokeAttrs) {}
//! #   fn set_opacity(&mut self, _: f64) {}
//! #   fn set_image_smoothing(&mut self, _: ImageSmoothing) {}
//! #   fn set_transform(&mut self, _: Affine) {}
//! #   fn transform(&mut self, _: Affine) {}
//! #   fn save(&mut self) {}
//! #   fn restore(&mut self) {}
//! #   fn begin_path(&mut self) {}
//! #   fn move_to(&mut self, _: Point) {}
//! #   fn line_to(&mut self, _: Point) {}
//! #   fn curve_to(&mut self, _: Point, _: Point, _: Point) {}
//! #   fn close_path(&mut self) {}
//! #   fn rect(&mut self, _: Rect) {}
//! #   fn stroke(&mut self) {}
//! #   fn clip(&mut self) {}
//! #   fn clear_rect(&mut self, _: Rect) {}
//! #   fn draw_image(&mut self, _: &u32, _: Point) {}
//! #   fn draw_image_rect(&mut self, _: &u32, _: Rect, _: Rect) {}
//! #   fn fill_text(&mut self, _: &str, _: Point) {}
//! #   fn stroke_text(&mut self, _: &str, _: Point) {}
//! #   fn measure_text(&mut self, _: &str) -> f64 { 0.0 }
//!     // ...the remaining drawing calls are no-ops here.
//! }
//!
//! let red = 0xff_0000_u32;
//! let mut stacks = PaintStacks::new();
//! stacks.push(&PaintOp::SetPaint(Some(&red)));
//! stacks.push(&PaintOp::FillShape(Shape::rect(0.0, 0.0, 100.0, 50.0)));
//!
//! let mut surface = Fills::default();
//! let report = paint_stacks(&mut surface, &stacks.as_stacks(), &PaintOptions::with_scale(2.0))?;
//! assert!(report.is_exact());
//! assert_eq!((surface.paint, surface.count), (Some(red), 1));
//! # Ok::<(), stackpaint::PaintError>(())
//! ```

#![no_std]

extern crate alloc;

mod cursor;
mod decode;
mod error;
mod op;
mod opcode;
mod paint;
mod path;
mod stacks;
mod surface;

pub use decode::{DecodeStats, Decoder, Program, UnknownTagPolicy, decode};
pub use error::{OperandKind, PaintError};
pub use op::{
    DashPattern, ImageSmoothing, PaintOp, PathOp, Shape, StrokeAttrs, TextRun, scale_diagonal,
};
pub use opcode::{Opcode, PathTag, RECT_SHORTCUT};
pub use paint::{PaintOptions, PassReport, paint_stacks, replay};
pub use path::CanvasPath;
pub use stacks::{PaintStacks, StackPositions, Stacks};
pub use surface::Surface2d;

pub use kurbo::{Affine, BezPath, Cap, Join, Point, Rect};
pub use peniko::ImageQuality;
