// Copyright 2025 the Stackpaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end tests: streams written with `PaintStacks`, replayed with
//! `paint_stacks` onto a `RefSurface`.

use peniko::Brush;
use peniko::color::palette;
use stackpaint::{
    Affine, Cap, ImageQuality, Join, PaintError, PaintOp, PaintOptions, PaintStacks, PathOp, Point,
    Rect, Shape, Stacks, StrokeAttrs, TextRun, UnknownTagPolicy, paint_stacks,
};
use stackpaint_ref::{Call, RefFont, RefImage, RefNative, RefSurface};

fn paint(stacks: &PaintStacks<RefNative>, scale: f64) -> (RefSurface, stackpaint::PassReport) {
    let mut surface = RefSurface::new();
    let report = paint_stacks(
        &mut surface,
        &stacks.as_stacks(),
        &PaintOptions::with_scale(scale),
    )
    .unwrap();
    (surface, report)
}

fn dashed_miter() -> StrokeAttrs {
    let mut attrs = StrokeAttrs::solid(3.0);
    attrs.dash.extend([4.0, 2.0]);
    attrs.dash_offset = 1.0;
    attrs.cap = Cap::Square;
    attrs.join = Join::Miter;
    attrs.miter_limit = Some(6.0);
    attrs
}

#[test]
fn full_stream_consumes_every_operand() {
    let font = RefNative::Font(RefFont::new("serif", 12.0));
    let red = RefNative::Paint(Brush::Solid(palette::css::RED));
    let image = RefNative::Image(RefImage {
        width: 8,
        height: 8,
    });

    let mut stacks = PaintStacks::new();
    let ops = [
        PaintOp::SetFont(Some(&font)),
        PaintOp::SetPaint(Some(&red)),
        PaintOp::SetStroke(dashed_miter()),
        PaintOp::SetStroke(StrokeAttrs::solid(1.0)),
        PaintOp::SetOpacity(0.75),
        PaintOp::Save,
        PaintOp::ClipShape(Shape::rect(0.0, 0.0, 50.0, 50.0)),
        PaintOp::FillShape(Shape::Path(vec![
            PathOp::MoveTo(Point::new(0.0, 0.0)),
            PathOp::CurveTo(
                Point::new(1.0, 2.0),
                Point::new(3.0, 4.0),
                Point::new(5.0, 6.0),
            ),
            PathOp::LineTo(Point::new(0.0, 6.0)),
            PathOp::Close,
        ])),
        PaintOp::StrokeShape(Shape::rect(1.0, 1.0, -2.0, 3.0)),
        PaintOp::DrawImageRect {
            image: Some(&image),
            src: Rect::new(0.0, 0.0, 8.0, 8.0),
            dst: Rect::new(10.0, 10.0, 26.0, 26.0),
        },
        PaintOp::DrawImage {
            image: Some(&image),
            transform: Affine::translate((4.0, 4.0)),
        },
        PaintOp::FillText(TextRun {
            text: "hello",
            origin: Point::new(2.0, 20.0),
            char_spacing: 0.0,
        }),
        PaintOp::StrokeText(TextRun {
            text: "hi",
            origin: Point::new(2.0, 40.0),
            char_spacing: 2.0,
        }),
        PaintOp::Transform(Affine::rotate(0.5)),
        PaintOp::SetTransform(Affine::IDENTITY),
        PaintOp::Restore,
        PaintOp::ClearRect(Rect::new(0.0, 0.0, 5.0, 5.0)),
        PaintOp::SetImageQuality(0.9),
    ];
    for op in &ops {
        stacks.push(op);
    }

    let (surface, report) = paint(&stacks, 2.0);
    assert!(report.is_exact());
    assert_eq!(report.ops, ops.len());
    assert_eq!(report.consumed, stacks.as_stacks().lens());

    let state = surface.state();
    assert_eq!(state.font, RefFont::new("serif", 12.0));
    assert_eq!(state.paint, Brush::Solid(palette::css::RED));
    assert_eq!(state.opacity, 0.75);
    assert_eq!(state.transform, Affine::scale(2.0));
    assert_eq!(state.clip_depth, 0);
    assert_eq!(state.smoothing.quality, ImageQuality::High);
    assert_eq!(surface.save_depth(), 0);
}

#[test]
fn rect_shortcut_matches_explicit_path() {
    let explicit = Shape::Path(vec![
        PathOp::MoveTo(Point::new(10.0, 20.0)),
        PathOp::LineTo(Point::new(40.0, 20.0)),
        PathOp::LineTo(Point::new(40.0, 60.0)),
        PathOp::LineTo(Point::new(10.0, 60.0)),
        PathOp::Close,
    ]);
    let shortcut = Shape::rect(10.0, 20.0, 30.0, 40.0);

    let draw = |shape: &Shape| {
        let mut stacks = PaintStacks::new();
        stacks.push(&PaintOp::FillShape(shape.clone()));
        stacks.push(&PaintOp::StrokeShape(shape.clone()));
        stacks.push(&PaintOp::ClipShape(shape.clone()));
        let (surface, _) = paint(&stacks, 1.0);
        surface.calls().cloned().collect::<Vec<_>>()
    };

    let a = draw(&shortcut);
    let b = draw(&explicit);
    assert_eq!(a, b);
    assert!(matches!(a[1], Call::Fill(_)));
    assert!(matches!(a[3], Call::Clip(_)));
}

#[test]
fn identity_set_transform_equals_reset_transform() {
    for scale in [1.0, 1.5, 2.0, 3.0] {
        let mut stacks = PaintStacks::new();
        stacks.push(&PaintOp::SetTransform(Affine::IDENTITY));
        let (surface, _) = paint(&stacks, scale);
        let transforms: Vec<_> = surface
            .calls()
            .filter_map(|call| match call {
                Call::SetTransform(xf) => Some(*xf),
                _ => None,
            })
            .collect();
        assert_eq!(transforms, vec![Affine::scale(scale), Affine::scale(scale)]);
    }
}

#[test]
fn relative_transform_is_not_rescaled() {
    let mut stacks = PaintStacks::new();
    stacks.push(&PaintOp::Transform(Affine::translate((10.0, 0.0))));
    let (surface, _) = paint(&stacks, 2.0);
    assert_eq!(
        surface.state().transform * Point::ORIGIN,
        Point::new(20.0, 0.0)
    );
}

#[test]
fn char_spacing_splits_text() {
    let font = RefNative::Font(RefFont::new("mono", 10.0));
    let mut stacks = PaintStacks::new();
    stacks.push(&PaintOp::SetFont(Some(&font)));
    stacks.push(&PaintOp::FillText(TextRun {
        text: "AB",
        origin: Point::new(5.0, 9.0),
        char_spacing: 0.0,
    }));
    let (surface, _) = paint(&stacks, 1.0);
    let texts: Vec<_> = surface
        .calls()
        .filter(|call| matches!(call, Call::FillText { .. }))
        .collect();
    assert_eq!(texts.len(), 1);

    let mut stacks = PaintStacks::new();
    stacks.push(&PaintOp::SetFont(Some(&font)));
    stacks.push(&PaintOp::FillText(TextRun {
        text: "AB",
        origin: Point::new(5.0, 9.0),
        char_spacing: 3.0,
    }));
    let (surface, _) = paint(&stacks, 1.0);
    let origins: Vec<_> = surface
        .calls()
        .filter_map(|call| match call {
            Call::FillText { text, origin } => Some((text.as_str(), *origin)),
            _ => None,
        })
        .collect();
    // "A" measures 5.0 at size 10.
    assert_eq!(
        origins,
        vec![("A", Point::new(5.0, 9.0)), ("B", Point::new(13.0, 9.0))]
    );
}

#[test]
fn zero_dash_count_reads_no_offset() {
    // set-stroke then set-opacity; 0.4 must land in opacity, not the dash offset.
    let instructions = [3, 4];
    let ints = [0, 1, 0];
    let reals = [2.5, 0.4];
    let natives: [Option<RefNative>; 0] = [];
    let stacks = Stacks::new(&instructions, 2, &ints, &reals, &[], &natives).unwrap();

    let mut surface = RefSurface::new();
    let report = paint_stacks(&mut surface, &stacks, &PaintOptions::default()).unwrap();
    assert!(report.is_exact());
    let state = surface.state();
    assert_eq!(state.stroke.width, 2.5);
    assert!(state.stroke.dash_pattern.is_empty());
    assert_eq!(state.stroke.dash_offset, 0.0);
    assert_eq!(state.stroke.start_cap, Cap::Butt);
    assert_eq!(state.stroke.join, Join::Round);
    assert_eq!(state.opacity, 0.4);
}

#[test]
fn save_restore_round_trips_state() {
    let font = RefNative::Font(RefFont::new("serif", 14.0));
    let blue = RefNative::Paint(Brush::Solid(palette::css::BLUE));
    let green = RefNative::Paint(Brush::Solid(palette::css::GREEN));

    let mut stacks = PaintStacks::new();
    stacks.push(&PaintOp::SetFont(Some(&font)));
    stacks.push(&PaintOp::SetPaint(Some(&blue)));
    stacks.push(&PaintOp::SetStroke(dashed_miter()));
    stacks.push(&PaintOp::SetOpacity(0.5));
    stacks.push(&PaintOp::SetImageQuality(0.5));
    stacks.push(&PaintOp::Transform(Affine::translate((3.0, 3.0))));
    let (before, _) = paint(&stacks, 2.0);

    stacks.push(&PaintOp::Save);
    stacks.push(&PaintOp::Restore);
    let (unchanged, _) = paint(&stacks, 2.0);
    assert_eq!(unchanged.state(), before.state());

    stacks.push(&PaintOp::Save);
    stacks.push(&PaintOp::SetPaint(Some(&green)));
    stacks.push(&PaintOp::SetStroke(StrokeAttrs::solid(9.0)));
    stacks.push(&PaintOp::SetOpacity(0.1));
    stacks.push(&PaintOp::SetImageQuality(0.0));
    stacks.push(&PaintOp::SetTransform(Affine::rotate(1.0)));
    stacks.push(&PaintOp::Restore);
    let (restored, _) = paint(&stacks, 2.0);
    assert_eq!(restored.state(), before.state());
}

#[test]
fn unknown_tag_does_not_disturb_neighbours() {
    let mut with_unknown = PaintStacks::new();
    let mut without = PaintStacks::new();
    for stacks in [&mut with_unknown, &mut without] {
        stacks.push(&PaintOp::SetOpacity(0.3));
        stacks.push(&PaintOp::FillShape(Shape::rect(0.0, 0.0, 1.0, 1.0)));
    }
    with_unknown.push_raw_instruction(250);
    for stacks in [&mut with_unknown, &mut without] {
        stacks.push(&PaintOp::ClearRect(Rect::new(1.0, 2.0, 3.0, 4.0)));
        stacks.push(&PaintOp::SetImageQuality(1.0));
    }

    let (a, report) = paint(&with_unknown, 1.0);
    let (b, _) = paint(&without, 1.0);
    assert_eq!(a.events(), b.events());
    assert_eq!(report.skipped_opcodes, 1);
    assert!(report.remaining.is_zero());

    let mut surface = RefSurface::new();
    let options = PaintOptions {
        unknown_tags: UnknownTagPolicy::Reject,
        ..PaintOptions::default()
    };
    let err = paint_stacks(&mut surface, &with_unknown.as_stacks(), &options).unwrap_err();
    assert_eq!(
        err,
        PaintError::UnknownOpcode {
            tag: 250,
            instruction: 2,
        }
    );
    assert!(surface.events().is_empty());
}

#[test]
fn null_natives_draw_nothing() {
    let mut stacks = PaintStacks::<RefNative>::new();
    stacks.push(&PaintOp::SetFont(None));
    stacks.push(&PaintOp::SetPaint(None));
    stacks.push(&PaintOp::DrawImageRect {
        image: None,
        src: Rect::new(0.0, 0.0, 1.0, 1.0),
        dst: Rect::new(0.0, 0.0, 1.0, 1.0),
    });
    stacks.push(&PaintOp::DrawImage {
        image: None,
        transform: Affine::IDENTITY,
    });
    let (surface, report) = paint(&stacks, 1.0);
    assert!(report.is_exact());
    assert!(!surface.calls().any(Call::is_draw));
    assert_eq!(surface.state(), RefSurface::new().state());
}

#[test]
fn truncated_stream_leaves_surface_untouched() {
    let mut stacks = PaintStacks::<RefNative>::new();
    stacks.push(&PaintOp::FillShape(Shape::rect(0.0, 0.0, 1.0, 1.0)));
    // Draw-image with no native or matrix behind it.
    stacks.push_raw_instruction(9);

    let mut surface = RefSurface::new();
    let err = paint_stacks(&mut surface, &stacks.as_stacks(), &PaintOptions::default());
    assert!(matches!(err, Err(PaintError::StackUnderflow { .. })));
    assert!(surface.events().is_empty());
}
