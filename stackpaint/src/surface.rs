// Copyright 2025 the Stackpaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The immediate-mode drawing surface that paint passes replay onto.

use kurbo::{Affine, Point, Rect};

use crate::{ImageSmoothing, StrokeAttrs};

/// A stateful 2D drawing surface in the style of a canvas context.
///
/// The surface owns a current transform, paint, font, stroke attributes,
/// opacity, clip and a path in progress, plus a save/restore stack of all of
/// these except the path. Replay drives it through the methods below and
/// never inspects native references; `Native` is whatever the host uses for
/// fonts, paints and images.
///
/// Implementations decide what an unsuitable native means (a paint passed
/// where an image is expected, say). Replay only guarantees that null
/// natives never reach the surface.
pub trait Surface2d {
    /// Host handle for fonts, paints and images.
    type Native;

    /// Set the current font.
    fn set_font(&mut self, font: &Self::Native);
    /// Set the paint used by both fills and strokes.
    fn set_paint(&mut self, paint: &Self::Native);
    /// Set stroke attributes.
    fn set_stroke(&mut self, stroke: &StrokeAttrs);
    /// Set global opacity.
    fn set_opacity(&mut self, alpha: f64);
    /// Set image smoothing.
    fn set_image_smoothing(&mut self, smoothing: ImageSmoothing);

    /// Replace the current transform.
    fn set_transform(&mut self, transform: Affine);
    /// Post-multiply the current transform (`current * transform`).
    fn transform(&mut self, transform: Affine);
    /// Push the current state.
    fn save(&mut self);
    /// Pop the most recently saved state. Does nothing if the stack is empty.
    fn restore(&mut self);

    /// Discard the path in progress.
    fn begin_path(&mut self);
    /// Start a new subpath.
    fn move_to(&mut self, p: Point);
    /// Add a line.
    fn line_to(&mut self, p: Point);
    /// Add a cubic Bézier.
    fn curve_to(&mut self, p1: Point, p2: Point, p3: Point);
    /// Close the current subpath.
    fn close_path(&mut self);
    /// Add a closed rectangular subpath.
    ///
    /// Rectangles keep the sign of their size; see [`crate::Shape::Rect`].
    fn rect(&mut self, rect: Rect);

    /// Stroke the path in progress.
    fn stroke(&mut self);
    /// Fill the path in progress with the nonzero rule.
    fn fill(&mut self);
    /// Intersect the clip with the path in progress.
    fn clip(&mut self);
    /// Clear a rectangle to transparent.
    fn clear_rect(&mut self, rect: Rect);

    /// Draw an image with its top-left corner at `origin`.
    fn draw_image(&mut self, image: &Self::Native, origin: Point);
    /// Draw `src` (in image pixels) of an image into `dst`.
    fn draw_image_rect(&mut self, image: &Self::Native, src: Rect, dst: Rect);
    /// Fill text with its pen origin at `origin`.
    fn fill_text(&mut self, text: &str, origin: Point);
    /// Stroke text with its pen origin at `origin`.
    fn stroke_text(&mut self, text: &str, origin: Point);
    /// Advance width of `text` in the current font.
    fn measure_text(&mut self, text: &str) -> f64;
}
