// Copyright 2025 the Stackpaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stackpaint reference surface.
//!
//! This crate provides [`RefSurface`], a small, stateful implementation of
//! [`Surface2d`] for **call recording and state tracing**.
//!
//! It is intentionally *not* a renderer:
//! - It does **not** rasterize to pixels.
//! - It keeps canvas-like drawing state with an explicit save stack and the
//!   path in progress as a [`BezPath`].
//! - Every surface call is logged together with the state it left behind,
//!   so tests can assert on both the emitted geometry and the state at the
//!   time it was drawn.
//!
//! Natives are [`RefNative`] values: fonts with a family and size, paints as
//! [`Brush`]es, and images with just a pixel size. Text measurement is a
//! fixed-pitch approximation of half the font size per character.

#![no_std]

extern crate alloc;

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use peniko::{Brush, Color};
use stackpaint::{
    Affine, BezPath, CanvasPath, Cap, ImageSmoothing, Join, Point, Rect, StrokeAttrs, Surface2d,
};

/// A font handle.
#[derive(Clone, Debug, PartialEq)]
pub struct RefFont {
    /// Family name.
    pub family: String,
    /// Size in logical units.
    pub size: f64,
}

impl RefFont {
    /// A font of the given family and size.
    pub fn new(family: impl Into<String>, size: f64) -> Self {
        Self {
            family: family.into(),
            size,
        }
    }
}

impl Default for RefFont {
    /// Canvas default, `10px sans-serif`.
    fn default() -> Self {
        Self::new("sans-serif", 10.0)
    }
}

/// An image handle; only its size is tracked.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RefImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Native values understood by [`RefSurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum RefNative {
    /// A font.
    Font(RefFont),
    /// A paint.
    Paint(Brush),
    /// An image.
    Image(RefImage),
}

impl RefNative {
    fn kind(&self) -> &'static str {
        match self {
            Self::Font(_) => "font",
            Self::Paint(_) => "paint",
            Self::Image(_) => "image",
        }
    }
}

/// Drawing state saved and restored as a unit.
///
/// The path in progress is not part of this state.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawState {
    /// Current transform.
    pub transform: Affine,
    /// Current font.
    pub font: RefFont,
    /// Paint for fills and strokes.
    pub paint: Brush,
    /// Stroke attributes.
    pub stroke: kurbo::Stroke,
    /// Global opacity.
    pub opacity: f64,
    /// Image smoothing.
    pub smoothing: ImageSmoothing,
    /// Number of clips intersected since the state was created.
    pub clip_depth: u32,
}

impl Default for DrawState {
    /// Canvas defaults: black paint, 1-unit butt-capped stroke with miter
    /// joins and a miter limit of 10.
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            font: RefFont::default(),
            paint: Brush::Solid(Color::BLACK),
            stroke: kurbo::Stroke::new(1.0)
                .with_join(Join::Miter)
                .with_caps(Cap::Butt)
                .with_miter_limit(10.0),
            opacity: 1.0,
            smoothing: ImageSmoothing::default(),
            clip_depth: 0,
        }
    }
}

/// One recorded surface call.
///
/// Path construction is not recorded call by call; the built path is carried
/// by the call that consumes it.
#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    /// Font changed.
    SetFont,
    /// Paint changed.
    SetPaint,
    /// Stroke attributes changed.
    SetStroke,
    /// Opacity changed.
    SetOpacity,
    /// Image smoothing changed.
    SetImageSmoothing,
    /// Transform replaced.
    SetTransform(Affine),
    /// Transform composed.
    Transform(Affine),
    /// State pushed.
    Save,
    /// State popped. `false` if there was nothing to pop.
    Restore(bool),
    /// Path filled.
    Fill(BezPath),
    /// Path stroked.
    Stroke(BezPath),
    /// Clip intersected with a path.
    Clip(BezPath),
    /// Rectangle cleared.
    ClearRect(Rect),
    /// Whole image drawn.
    DrawImage {
        /// The image.
        image: RefImage,
        /// Top-left corner.
        origin: Point,
    },
    /// Part of an image drawn into a rectangle.
    DrawImageRect {
        /// The image.
        image: RefImage,
        /// Source rectangle in image pixels.
        src: Rect,
        /// Destination rectangle.
        dst: Rect,
    },
    /// Text filled.
    FillText {
        /// The text.
        text: String,
        /// Pen origin.
        origin: Point,
    },
    /// Text stroked.
    StrokeText {
        /// The text.
        text: String,
        /// Pen origin.
        origin: Point,
    },
}

impl Call {
    /// Returns `true` for calls that put marks on the surface.
    pub fn is_draw(&self) -> bool {
        matches!(
            self,
            Self::Fill(_)
                | Self::Stroke(_)
                | Self::ClearRect(_)
                | Self::DrawImage { .. }
                | Self::DrawImageRect { .. }
                | Self::FillText { .. }
                | Self::StrokeText { .. }
        )
    }
}

/// A recorded call and the state after it was applied.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    /// The call.
    pub call: Call,
    /// Snapshot after the call.
    pub state: DrawState,
}

/// Recording implementation of [`Surface2d`].
///
/// Natives of the wrong kind (an image passed as a font, say) are ignored
/// with a warning and leave no event.
#[derive(Debug, Default)]
pub struct RefSurface {
    state: DrawState,
    saved: Vec<DrawState>,
    path: CanvasPath,
    events: Vec<Event>,
}

impl RefSurface {
    /// A surface in the default state with an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current drawing state.
    pub fn state(&self) -> &DrawState {
        &self.state
    }

    /// Number of saved states.
    pub fn save_depth(&self) -> usize {
        self.saved.len()
    }

    /// The path in progress.
    pub fn path(&self) -> &BezPath {
        self.path.as_bez_path()
    }

    /// Recorded events, in order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Iterate over the recorded calls.
    pub fn calls(&self) -> impl Iterator<Item = &Call> + '_ {
        self.events.iter().map(|event| &event.call)
    }

    /// Clears the event log but keeps state and the path in progress.
    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    fn record(&mut self, call: Call) {
        self.events.push(Event {
            call,
            state: self.state.clone(),
        });
    }

    fn image_of(native: &RefNative) -> Option<RefImage> {
        match native {
            RefNative::Image(image) => Some(*image),
            other => {
                tracing::warn!(kind = other.kind(), "expected an image native");
                None
            }
        }
    }
}

impl Surface2d for RefSurface {
    type Native = RefNative;

    fn set_font(&mut self, font: &RefNative) {
        let RefNative::Font(font) = font else {
            tracing::warn!(kind = font.kind(), "expected a font native");
            return;
        };
        self.state.font = font.clone();
        self.record(Call::SetFont);
    }

    fn set_paint(&mut self, paint: &RefNative) {
        let RefNative::Paint(brush) = paint else {
            tracing::warn!(kind = paint.kind(), "expected a paint native");
            return;
        };
        self.state.paint = brush.clone();
        self.record(Call::SetPaint);
    }

    fn set_stroke(&mut self, stroke: &StrokeAttrs) {
        stroke.apply_to(&mut self.state.stroke);
        self.record(Call::SetStroke);
    }

    fn set_opacity(&mut self, alpha: f64) {
        self.state.opacity = alpha;
        self.record(Call::SetOpacity);
    }

    fn set_image_smoothing(&mut self, smoothing: ImageSmoothing) {
        self.state.smoothing = smoothing;
        self.record(Call::SetImageSmoothing);
    }

    fn set_transform(&mut self, transform: Affine) {
        self.state.transform = transform;
        self.record(Call::SetTransform(transform));
    }

    fn transform(&mut self, transform: Affine) {
        self.state.transform *= transform;
        self.record(Call::Transform(transform));
    }

    fn save(&mut self) {
        self.saved.push(self.state.clone());
        self.record(Call::Save);
    }

    fn restore(&mut self) {
        let popped = match self.saved.pop() {
            Some(state) => {
                self.state = state;
                true
            }
            None => false,
        };
        self.record(Call::Restore(popped));
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn move_to(&mut self, p: Point) {
        self.path.move_to(p);
    }

    fn line_to(&mut self, p: Point) {
        self.path.line_to(p);
    }

    fn curve_to(&mut self, p1: Point, p2: Point, p3: Point) {
        self.path.curve_to(p1, p2, p3);
    }

    fn close_path(&mut self) {
        self.path.close_path();
    }

    fn rect(&mut self, rect: Rect) {
        self.path.rect(rect);
    }

    fn stroke(&mut self) {
        let path = self.path.as_bez_path().clone();
        self.record(Call::Stroke(path));
    }

    fn fill(&mut self) {
        let path = self.path.as_bez_path().clone();
        self.record(Call::Fill(path));
    }

    fn clip(&mut self) {
        let path = self.path.as_bez_path().clone();
        self.state.clip_depth += 1;
        self.record(Call::Clip(path));
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.record(Call::ClearRect(rect));
    }

    fn draw_image(&mut self, image: &RefNative, origin: Point) {
        if let Some(image) = Self::image_of(image) {
            self.record(Call::DrawImage { image, origin });
        }
    }

    fn draw_image_rect(&mut self, image: &RefNative, src: Rect, dst: Rect) {
        if let Some(image) = Self::image_of(image) {
            self.record(Call::DrawImageRect { image, src, dst });
        }
    }

    fn fill_text(&mut self, text: &str, origin: Point) {
        self.record(Call::FillText {
            text: text.to_string(),
            origin,
        });
    }

    fn stroke_text(&mut self, text: &str, origin: Point) {
        self.record(Call::StrokeText {
            text: text.to_string(),
            origin,
        });
    }

    fn measure_text(&mut self, text: &str) -> f64 {
        let chars = u32::try_from(text.chars().count()).unwrap_or(u32::MAX);
        f64::from(chars) * self.state.font.size * 0.5
    }
}
