// Copyright 2025 the Stackpaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! HTML canvas (2D) surface for stackpaint streams.
//!
//! This crate provides a [`Surface2d`] implementation backed by
//! `web_sys::CanvasRenderingContext2d`, plus a `paintStacks` export that takes
//! the raw instruction and operand buffers exactly as a JavaScript host fills
//! them, when targeting `wasm32`.
//!
//! # Usage
//!
//! ```no_run
//! #[cfg(target_arch = "wasm32")]
//! fn draw(
//!     canvas: web_sys::HtmlCanvasElement,
//!     stacks: &stackpaint::PaintStacks<wasm_bindgen::JsValue>,
//! ) -> Result<(), wasm_bindgen::JsValue> {
//!     let mut surface = stackpaint_web_canvas::WebCanvasSurface::new_html_canvas(canvas)?;
//!     let options = stackpaint::PaintOptions::with_scale(2.0);
//!     stackpaint::paint_stacks(&mut surface, &stacks.as_stacks(), &options)
//!         .map_err(|err| wasm_bindgen::JsValue::from_str(&err.to_string()))?;
//!     Ok(())
//! }
//! ```
//!
//! Notes:
//! - Natives are plain `JsValue`s. Fonts are CSS font strings. Paints are CSS
//!   color strings, `CanvasGradient`s or `CanvasPattern`s. Images are
//!   `HtmlImageElement`s, `HtmlCanvasElement`s or `ImageBitmap`s.
//! - Natives of any other type are ignored with a warning.
//! - Paint applies to both fill and stroke style.

#![no_std]
#![cfg_attr(
    not(target_arch = "wasm32"),
    allow(dead_code, reason = "Canvas helpers are only called by the wasm32 surface.")
)]

extern crate alloc;

use stackpaint::{Cap, ImageQuality, Join, Rect};

#[cfg(target_arch = "wasm32")]
use alloc::{
    string::{String, ToString},
    vec::Vec,
};
#[cfg(target_arch = "wasm32")]
use core::fmt;
#[cfg(target_arch = "wasm32")]
use stackpaint::{
    Affine, ImageSmoothing, PaintOptions, Point, Stacks, StrokeAttrs, Surface2d, paint_stacks,
};

#[cfg(target_arch = "wasm32")]
use js_sys::{Array, Reflect};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::wasm_bindgen;
#[cfg(target_arch = "wasm32")]
use web_sys::{
    CanvasGradient, CanvasPattern, CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement,
    ImageBitmap,
};

fn cap_to_canvas(cap: Cap) -> &'static str {
    match cap {
        Cap::Butt => "butt",
        Cap::Round => "round",
        Cap::Square => "square",
    }
}

fn join_to_canvas(join: Join) -> &'static str {
    match join {
        Join::Bevel => "bevel",
        Join::Miter => "miter",
        Join::Round => "round",
    }
}

/// Value for the context's `imageSmoothingQuality` property.
fn smoothing_quality_to_canvas(quality: ImageQuality) -> &'static str {
    match quality {
        ImageQuality::Low => "low",
        ImageQuality::Medium => "medium",
        ImageQuality::High => "high",
    }
}

/// `x, y, width, height` with the sign of the extents preserved.
fn rect_to_canvas(rect: Rect) -> [f64; 4] {
    [rect.x0, rect.y0, rect.x1 - rect.x0, rect.y1 - rect.y0]
}

#[cfg(target_arch = "wasm32")]
fn apply_stroke_style(ctx: &CanvasRenderingContext2d, stroke: &StrokeAttrs) {
    ctx.set_line_width(stroke.width);
    ctx.set_line_cap(cap_to_canvas(stroke.cap));
    ctx.set_line_join(join_to_canvas(stroke.join));
    if let Some(limit) = stroke.miter_limit {
        ctx.set_miter_limit(limit);
    }

    let dash = Array::new();
    for v in stroke.dash.iter().copied() {
        dash.push(&JsValue::from_f64(v));
    }
    let _ = ctx.set_line_dash(&dash);
    ctx.set_line_dash_offset(stroke.dash_offset);
}

/// Canvas 2D surface (only available on `wasm32`).
#[cfg(target_arch = "wasm32")]
pub struct WebCanvasSurface {
    ctx: CanvasRenderingContext2d,
}

#[cfg(target_arch = "wasm32")]
impl fmt::Debug for WebCanvasSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WebCanvasSurface { .. }")
    }
}

#[cfg(target_arch = "wasm32")]
impl WebCanvasSurface {
    /// Create a surface that draws into the given canvas 2D context.
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }

    /// Create a surface for a DOM canvas element.
    pub fn new_html_canvas(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("missing 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { ctx })
    }

    /// The underlying context.
    pub fn context(&self) -> &CanvasRenderingContext2d {
        &self.ctx
    }
}

#[cfg(target_arch = "wasm32")]
impl Surface2d for WebCanvasSurface {
    type Native = JsValue;

    fn set_font(&mut self, font: &JsValue) {
        match font.as_string() {
            Some(css) => self.ctx.set_font(&css),
            None => tracing::warn!("font native is not a CSS font string"),
        }
    }

    fn set_paint(&mut self, paint: &JsValue) {
        if let Some(css) = paint.as_string() {
            self.ctx.set_fill_style_str(&css);
            self.ctx.set_stroke_style_str(&css);
        } else if let Some(gradient) = paint.dyn_ref::<CanvasGradient>() {
            self.ctx.set_fill_style_canvas_gradient(gradient);
            self.ctx.set_stroke_style_canvas_gradient(gradient);
        } else if let Some(pattern) = paint.dyn_ref::<CanvasPattern>() {
            self.ctx.set_fill_style_canvas_pattern(pattern);
            self.ctx.set_stroke_style_canvas_pattern(pattern);
        } else {
            tracing::warn!("paint native is not a color, gradient or pattern");
        }
    }

    fn set_stroke(&mut self, stroke: &StrokeAttrs) {
        apply_stroke_style(&self.ctx, stroke);
    }

    fn set_opacity(&mut self, alpha: f64) {
        self.ctx.set_global_alpha(alpha);
    }

    fn set_image_smoothing(&mut self, smoothing: ImageSmoothing) {
        self.ctx.set_image_smoothing_enabled(smoothing.enabled);
        // Not every engine exposes this property through the bindings.
        let _ = Reflect::set(
            &self.ctx,
            &JsValue::from_str("imageSmoothingQuality"),
            &JsValue::from_str(smoothing_quality_to_canvas(smoothing.quality)),
        );
    }

    fn set_transform(&mut self, transform: Affine) {
        let [a, b, c, d, e, f] = transform.as_coeffs();
        let _ = self.ctx.set_transform(a, b, c, d, e, f);
    }

    fn transform(&mut self, transform: Affine) {
        let [a, b, c, d, e, f] = transform.as_coeffs();
        let _ = self.ctx.transform(a, b, c, d, e, f);
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, p: Point) {
        self.ctx.move_to(p.x, p.y);
    }

    fn line_to(&mut self, p: Point) {
        self.ctx.line_to(p.x, p.y);
    }

    fn curve_to(&mut self, p1: Point, p2: Point, p3: Point) {
        self.ctx.bezier_curve_to(p1.x, p1.y, p2.x, p2.y, p3.x, p3.y);
    }

    fn close_path(&mut self) {
        self.ctx.close_path();
    }

    fn rect(&mut self, rect: Rect) {
        let [x, y, w, h] = rect_to_canvas(rect);
        self.ctx.rect(x, y, w, h);
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }

    fn fill(&mut self) {
        self.ctx.fill();
    }

    fn clip(&mut self) {
        self.ctx.clip();
    }

    fn clear_rect(&mut self, rect: Rect) {
        let [x, y, w, h] = rect_to_canvas(rect);
        self.ctx.clear_rect(x, y, w, h);
    }

    fn draw_image(&mut self, image: &JsValue, origin: Point) {
        let (x, y) = (origin.x, origin.y);
        let result = if let Some(img) = image.dyn_ref::<HtmlImageElement>() {
            self.ctx.draw_image_with_html_image_element(img, x, y)
        } else if let Some(canvas) = image.dyn_ref::<HtmlCanvasElement>() {
            self.ctx.draw_image_with_html_canvas_element(canvas, x, y)
        } else if let Some(bitmap) = image.dyn_ref::<ImageBitmap>() {
            self.ctx.draw_image_with_image_bitmap(bitmap, x, y)
        } else {
            tracing::warn!("image native is not an image, canvas or bitmap");
            return;
        };
        if result.is_err() {
            tracing::warn!("drawImage failed");
        }
    }

    fn draw_image_rect(&mut self, image: &JsValue, src: Rect, dst: Rect) {
        let [sx, sy, sw, sh] = rect_to_canvas(src);
        let [dx, dy, dw, dh] = rect_to_canvas(dst);
        let result = if let Some(img) = image.dyn_ref::<HtmlImageElement>() {
            self.ctx
                .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                    img, sx, sy, sw, sh, dx, dy, dw, dh,
                )
        } else if let Some(canvas) = image.dyn_ref::<HtmlCanvasElement>() {
            self.ctx
                .draw_image_with_html_canvas_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                    canvas, sx, sy, sw, sh, dx, dy, dw, dh,
                )
        } else if let Some(bitmap) = image.dyn_ref::<ImageBitmap>() {
            self.ctx
                .draw_image_with_image_bitmap_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                    bitmap, sx, sy, sw, sh, dx, dy, dw, dh,
                )
        } else {
            tracing::warn!("image native is not an image, canvas or bitmap");
            return;
        };
        if result.is_err() {
            tracing::warn!("drawImage failed");
        }
    }

    fn fill_text(&mut self, text: &str, origin: Point) {
        let _ = self.ctx.fill_text(text, origin.x, origin.y);
    }

    fn stroke_text(&mut self, text: &str, origin: Point) {
        let _ = self.ctx.stroke_text(text, origin.x, origin.y);
    }

    fn measure_text(&mut self, text: &str) -> f64 {
        self.ctx
            .measure_text(text)
            .map(|metrics| metrics.width())
            .unwrap_or(0.0)
    }
}

/// Replay one frame from raw host buffers.
///
/// `natives` may contain `null` or `undefined` entries; those are null
/// references. Only the first `instruction_count` instructions are run.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = paintStacks)]
pub fn paint_stacks_js(
    ctx: CanvasRenderingContext2d,
    device_scale: f64,
    instructions: &[i32],
    instruction_count: usize,
    ints: &[i32],
    reals: &[f64],
    texts: Vec<String>,
    natives: &Array,
) -> Result<(), JsValue> {
    let natives: Vec<Option<JsValue>> = natives
        .iter()
        .map(|value| (!value.is_null() && !value.is_undefined()).then_some(value))
        .collect();
    let to_js = |err: stackpaint::PaintError| JsValue::from_str(&err.to_string());
    let stacks = Stacks::new(instructions, instruction_count, ints, reals, &texts, &natives)
        .map_err(to_js)?;
    let mut surface = WebCanvasSurface::new(ctx);
    paint_stacks(&mut surface, &stacks, &PaintOptions::with_scale(device_scale)).map_err(to_js)?;
    Ok(())
}

/// Stub type for non-wasm targets so the crate can be included in the workspace.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct WebCanvasSurface;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stroke_keywords() {
        assert_eq!(cap_to_canvas(Cap::Butt), "butt");
        assert_eq!(cap_to_canvas(Cap::Square), "square");
        assert_eq!(join_to_canvas(Join::Miter), "miter");
        assert_eq!(join_to_canvas(Join::Round), "round");
    }

    #[test]
    fn smoothing_keywords() {
        assert_eq!(smoothing_quality_to_canvas(ImageQuality::Low), "low");
        assert_eq!(smoothing_quality_to_canvas(ImageQuality::Medium), "medium");
        assert_eq!(smoothing_quality_to_canvas(ImageQuality::High), "high");
    }

    #[test]
    fn rect_keeps_negative_extent() {
        assert_eq!(
            rect_to_canvas(Rect::new(10.0, 10.0, 6.0, 16.0)),
            [10.0, 10.0, -4.0, 6.0]
        );
    }
}
