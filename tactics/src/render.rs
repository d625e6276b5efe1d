//! Rendering: draws the pitch, annotations, and tokens to a 2D context.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! It receives read-only views of the scene and camera and produces pixels;
//! it does not mutate any application state.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level caller ([`crate::engine::Engine::render`]) handles the result.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::camera::{Camera, Point};
use crate::consts::{ANNOTATION_STROKE_WIDTH, ARROWHEAD_LENGTH, ARROWHEAD_WIDTH, TOKEN_RADIUS};
use crate::pitch::{self, LINE_COLOR, LINE_WIDTH, Marking};
use crate::scene::{Annotation, AnnotationKind, PlayerToken, Scene};

const TOKEN_OUTLINE_WIDTH: f64 = 2.0;
const TOKEN_SHADOW_BLUR: f64 = 10.0;
const TOKEN_FONT: &str = "bold 12px sans-serif";
const GLOW_BLUR: f64 = 50.0;

/// Draw the full board: pitch, then annotations, then tokens on top.
///
/// `viewport_w` and `viewport_h` are in CSS pixels. `dpr` is the device pixel ratio.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(
    ctx: &CanvasRenderingContext2d,
    scene: &Scene,
    camera: &Camera,
    viewport_w: f64,
    viewport_h: f64,
    dpr: f64,
) -> Result<(), JsValue> {
    // Layer 1: clear and set up transforms.
    ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, viewport_w, viewport_h);
    ctx.translate(camera.pan_x, camera.pan_y)?;
    ctx.scale(camera.zoom, camera.zoom)?;

    // Layer 2: pitch.
    for marking in pitch::markings() {
        draw_marking(ctx, marking)?;
    }

    // Layer 3: annotations in creation order.
    for ann in &scene.annotations {
        draw_annotation(ctx, ann)?;
    }

    // Layer 4: tokens; later tokens sit on top.
    for token in &scene.tokens {
        draw_token(ctx, token)?;
    }

    Ok(())
}

// =============================================================
// Pitch
// =============================================================

fn draw_marking(ctx: &CanvasRenderingContext2d, marking: Marking) -> Result<(), JsValue> {
    ctx.save();
    ctx.set_stroke_style_str(LINE_COLOR);
    ctx.set_line_width(LINE_WIDTH);

    match marking {
        Marking::Fill { x, y, w, h, color, alpha, glow } => {
            ctx.set_global_alpha(alpha);
            if let Some(glow) = glow {
                ctx.set_shadow_color(glow);
                ctx.set_shadow_blur(GLOW_BLUR);
            }
            ctx.set_fill_style_str(color);
            ctx.fill_rect(x, y, w, h);
        }
        Marking::Outline { x, y, w, h } => ctx.stroke_rect(x, y, w, h),
        Marking::Line { from, to } => {
            ctx.begin_path();
            ctx.move_to(from.x, from.y);
            ctx.line_to(to.x, to.y);
            ctx.stroke();
        }
        Marking::Circle { center, radius } => {
            ctx.begin_path();
            ctx.arc(center.x, center.y, radius, 0.0, 2.0 * PI)?;
            ctx.stroke();
        }
        Marking::Spot { center, radius, color } => {
            ctx.set_fill_style_str(color);
            ctx.begin_path();
            ctx.arc(center.x, center.y, radius, 0.0, 2.0 * PI)?;
            ctx.fill();
        }
        Marking::Arc { center, radius, start_deg, end_deg } => {
            ctx.begin_path();
            ctx.arc(center.x, center.y, radius, start_deg.to_radians(), end_deg.to_radians())?;
            ctx.stroke();
        }
    }

    ctx.restore();
    Ok(())
}

// =============================================================
// Annotations
// =============================================================

fn draw_annotation(ctx: &CanvasRenderingContext2d, ann: &Annotation) -> Result<(), JsValue> {
    let path: Vec<Point> = ann.path().collect();
    let Some(&first) = path.first() else {
        return Ok(());
    };

    ctx.save();
    ctx.set_stroke_style_str(&ann.color);
    ctx.set_fill_style_str(&ann.color);
    ctx.set_line_width(ANNOTATION_STROKE_WIDTH);
    ctx.set_line_cap("round");
    ctx.set_line_join("round");

    match ann.kind {
        AnnotationKind::Freehand if path.len() == 1 => {
            // A tap with the pen leaves a dot.
            ctx.begin_path();
            ctx.arc(first.x, first.y, ANNOTATION_STROKE_WIDTH / 2.0, 0.0, 2.0 * PI)?;
            ctx.fill();
        }
        AnnotationKind::Freehand => {
            ctx.begin_path();
            ctx.move_to(first.x, first.y);
            for (control, end) in smooth_segments(&path) {
                ctx.quadratic_curve_to(control.x, control.y, end.x, end.y);
            }
            ctx.stroke();
        }
        AnnotationKind::Arrow => {
            let tip = path.last().copied().unwrap_or(first);
            ctx.begin_path();
            ctx.move_to(first.x, first.y);
            ctx.line_to(tip.x, tip.y);
            ctx.stroke();

            if let Some([a, b, c]) = arrowhead(first, tip) {
                ctx.begin_path();
                ctx.move_to(a.x, a.y);
                ctx.line_to(b.x, b.y);
                ctx.line_to(c.x, c.y);
                ctx.close_path();
                ctx.fill();
            }
        }
    }

    ctx.restore();
    Ok(())
}

/// Quadratic segments `(control, end)` that smooth a polyline starting at
/// `path[0]`: each interior vertex becomes a control point and the curve
/// passes through the midpoints between vertices, ending on the last vertex.
#[must_use]
pub fn smooth_segments(path: &[Point]) -> Vec<(Point, Point)> {
    if path.len() < 2 {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(path.len() - 1);
    for pair in path[1..].windows(2) {
        let (control, next) = (pair[0], pair[1]);
        let mid = Point::new((control.x + next.x) / 2.0, (control.y + next.y) / 2.0);
        out.push((control, mid));
    }
    let last = path[path.len() - 1];
    out.push((last, last));
    out
}

/// Triangle for an arrowhead pointing from `tail` to `tip`: the tip and the
/// two base corners. `None` for a zero-length arrow.
#[must_use]
pub fn arrowhead(tail: Point, tip: Point) -> Option<[Point; 3]> {
    let len = tail.distance(tip);
    if len <= f64::EPSILON {
        return None;
    }
    let (ux, uy) = ((tip.x - tail.x) / len, (tip.y - tail.y) / len);
    let base = Point::new(tip.x - ux * ARROWHEAD_LENGTH, tip.y - uy * ARROWHEAD_LENGTH);
    let half = ARROWHEAD_WIDTH / 2.0;
    Some([
        tip,
        Point::new(base.x - uy * half, base.y + ux * half),
        Point::new(base.x + uy * half, base.y - ux * half),
    ])
}

// =============================================================
// Tokens
// =============================================================

fn draw_token(ctx: &CanvasRenderingContext2d, token: &PlayerToken) -> Result<(), JsValue> {
    ctx.save();

    ctx.set_shadow_color("rgba(0, 0, 0, 0.4)");
    ctx.set_shadow_blur(TOKEN_SHADOW_BLUR);
    ctx.set_fill_style_str(token.side.color());
    ctx.begin_path();
    ctx.arc(token.x, token.y, TOKEN_RADIUS, 0.0, 2.0 * PI)?;
    ctx.fill();

    ctx.set_shadow_blur(0.0);
    ctx.set_stroke_style_str("#fff");
    ctx.set_line_width(TOKEN_OUTLINE_WIDTH);
    ctx.stroke();

    ctx.set_fill_style_str("#fff");
    ctx.set_font(TOKEN_FONT);
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    ctx.fill_text(&token.label, token.x, token.y)?;

    ctx.restore();
    Ok(())
}
