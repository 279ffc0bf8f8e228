// Copyright 2025 the Stackpaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wire tags for instructions and path operations.

use core::fmt;

/// Instruction tags understood by the interpreter.
///
/// The numeric values are the wire contract with the producing host and must
/// never be renumbered.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// Set the current font from one native reference.
    SetFont = 1,
    /// Set the fill and stroke paint from one native reference.
    SetPaint = 2,
    /// Set line width, dashes, cap, join and miter limit.
    SetStroke = 3,
    /// Set the global opacity.
    SetOpacity = 4,
    /// Build a shape and stroke it.
    StrokeShape = 5,
    /// Build a shape and fill it.
    FillShape = 6,
    /// Build a shape and intersect the clip with it.
    ClipShape = 7,
    /// Draw a source rectangle of an image into a destination rectangle.
    DrawImageRect = 8,
    /// Draw an image at the origin of an absolute transform.
    DrawImage = 9,
    /// Fill a run of text.
    FillText = 10,
    /// Stroke a run of text.
    StrokeText = 11,
    /// Compose a matrix onto the current transform.
    Transform = 12,
    /// Replace the current transform, re-applying the device scale.
    SetTransform = 13,
    /// Push the surface state.
    Save = 14,
    /// Pop the surface state.
    Restore = 15,
    /// Clear a rectangle to transparent.
    ClearRect = 16,
    /// Set image smoothing from a scalar quality.
    SetImageQuality = 17,
}

impl Opcode {
    /// Every opcode, in tag order.
    pub const ALL: [Self; 17] = [
        Self::SetFont,
        Self::SetPaint,
        Self::SetStroke,
        Self::SetOpacity,
        Self::StrokeShape,
        Self::FillShape,
        Self::ClipShape,
        Self::DrawImageRect,
        Self::DrawImage,
        Self::FillText,
        Self::StrokeText,
        Self::Transform,
        Self::SetTransform,
        Self::Save,
        Self::Restore,
        Self::ClearRect,
        Self::SetImageQuality,
    ];

    /// Look up the opcode for a wire tag.
    #[inline]
    pub fn from_tag(tag: i32) -> Option<Self> {
        let idx = usize::try_from(tag).ok()?.checked_sub(1)?;
        Self::ALL.get(idx).copied()
    }

    /// The wire tag of this opcode.
    #[inline]
    pub const fn tag(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SetFont => "set-font",
            Self::SetPaint => "set-paint",
            Self::SetStroke => "set-stroke",
            Self::SetOpacity => "set-opacity",
            Self::StrokeShape => "stroke-shape",
            Self::FillShape => "fill-shape",
            Self::ClipShape => "clip-shape",
            Self::DrawImageRect => "draw-image-rect",
            Self::DrawImage => "draw-image",
            Self::FillText => "fill-text",
            Self::StrokeText => "stroke-text",
            Self::Transform => "transform",
            Self::SetTransform => "set-transform",
            Self::Save => "save",
            Self::Restore => "restore",
            Self::ClearRect => "clear-rect",
            Self::SetImageQuality => "set-image-quality",
        };
        f.write_str(name)
    }
}

/// Path operation tags used inside a shape sub-stream.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathTag {
    /// Start a new subpath (2 reals).
    MoveTo = 0,
    /// Straight segment (2 reals).
    LineTo = 1,
    /// Cubic Bézier segment (6 reals).
    CubicTo = 2,
    /// Close the current subpath (no operands).
    Close = 3,
}

impl PathTag {
    /// Look up the path tag for a wire value.
    #[inline]
    pub fn from_tag(tag: i32) -> Option<Self> {
        match tag {
            0 => Some(Self::MoveTo),
            1 => Some(Self::LineTo),
            2 => Some(Self::CubicTo),
            3 => Some(Self::Close),
            _ => None,
        }
    }

    /// The wire value of this tag.
    #[inline]
    pub const fn tag(self) -> i32 {
        self as i32
    }
}

/// Operation count that marks a shape as a rectangle shortcut.
pub const RECT_SHORTCUT: i32 = -1;
