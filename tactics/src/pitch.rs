//! Pitch markings as plain data.
//!
//! The renderer walks [`markings`] in order; keeping the layout here lets it
//! be checked without a canvas.

#[cfg(test)]
#[path = "pitch_test.rs"]
mod pitch_test;

use crate::camera::Point;
use crate::consts::{BOARD_HEIGHT, BOARD_WIDTH, PITCH_MARGIN};

/// Colour of all painted lines.
pub const LINE_COLOR: &str = "rgba(255, 255, 255, 0.2)";

/// Width of all painted lines in board units.
pub const LINE_WIDTH: f64 = 1.5;

const SURROUND_COLOR: &str = "#0d2b1d";
const GRASS_COLOR: &str = "#14532d";
const GLOW_COLOR: &str = "#10b981";
const STRIPE_COLOR: &str = "#064e3b";
const STRIPE_COUNT: u32 = 12;

const CENTRE_CIRCLE_RADIUS: f64 = 60.0;
const PENALTY_AREA: (f64, f64) = (120.0, 250.0);
const GOAL_AREA: (f64, f64) = (45.0, 120.0);
/// Distance of the penalty spot from the goal line.
const PENALTY_SPOT_DISTANCE: f64 = 90.0;
const CORNER_ARC_RADIUS: f64 = 15.0;

/// One drawable element of the pitch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Marking {
    /// Filled rectangle, optionally with a soft glow.
    Fill { x: f64, y: f64, w: f64, h: f64, color: &'static str, alpha: f64, glow: Option<&'static str> },
    /// Outlined rectangle in line colour.
    Outline { x: f64, y: f64, w: f64, h: f64 },
    /// Straight line in line colour.
    Line { from: Point, to: Point },
    /// Outlined circle in line colour.
    Circle { center: Point, radius: f64 },
    /// Filled dot (centre and penalty spots).
    Spot { center: Point, radius: f64, color: &'static str },
    /// Quarter-circle at a corner flag, angles in degrees clockwise from +x.
    Arc { center: Point, radius: f64, start_deg: f64, end_deg: f64 },
}

/// The full pitch, back to front.
#[must_use]
pub fn markings() -> Vec<Marking> {
    let left = PITCH_MARGIN;
    let top = PITCH_MARGIN;
    let right = BOARD_WIDTH - PITCH_MARGIN;
    let bottom = BOARD_HEIGHT - PITCH_MARGIN;
    let width = right - left;
    let height = bottom - top;
    let mid_x = BOARD_WIDTH / 2.0;
    let mid_y = BOARD_HEIGHT / 2.0;

    let mut out = vec![
        Marking::Fill { x: 0.0, y: 0.0, w: BOARD_WIDTH, h: BOARD_HEIGHT, color: SURROUND_COLOR, alpha: 1.0, glow: None },
        Marking::Fill { x: left, y: top, w: width, h: height, color: GRASS_COLOR, alpha: 1.0, glow: Some(GLOW_COLOR) },
    ];

    // Mown stripes: every other band of 2 * STRIPE_COUNT equal bands.
    let band = width / f64::from(STRIPE_COUNT * 2);
    for i in 0..STRIPE_COUNT {
        out.push(Marking::Fill {
            x: left + f64::from(i * 2) * band,
            y: top,
            w: band,
            h: height,
            color: STRIPE_COLOR,
            alpha: 0.2,
            glow: None,
        });
    }

    out.extend([
        Marking::Outline { x: left, y: top, w: width, h: height },
        Marking::Line { from: Point::new(mid_x, top), to: Point::new(mid_x, bottom) },
        Marking::Circle { center: Point::new(mid_x, mid_y), radius: CENTRE_CIRCLE_RADIUS },
        Marking::Spot { center: Point::new(mid_x, mid_y), radius: 3.0, color: "rgba(255, 255, 255, 0.5)" },
    ]);

    // Penalty and goal areas, home on the left and away on the right.
    for (goal_line, inward) in [(left, 1.0_f64), (right, -1.0)] {
        let area_x = if inward > 0.0 { goal_line } else { goal_line - PENALTY_AREA.0 };
        let goal_x = if inward > 0.0 { goal_line } else { goal_line - GOAL_AREA.0 };
        out.extend([
            Marking::Outline { x: area_x, y: mid_y - PENALTY_AREA.1 / 2.0, w: PENALTY_AREA.0, h: PENALTY_AREA.1 },
            Marking::Outline { x: goal_x, y: mid_y - GOAL_AREA.1 / 2.0, w: GOAL_AREA.0, h: GOAL_AREA.1 },
            Marking::Spot {
                center: Point::new(inward.mul_add(PENALTY_SPOT_DISTANCE, goal_line), mid_y),
                radius: 2.0,
                color: "rgba(255, 255, 255, 0.4)",
            },
        ]);
    }

    for (center, start_deg) in [
        (Point::new(left, top), 0.0),
        (Point::new(right, top), 90.0),
        (Point::new(right, bottom), 180.0),
        (Point::new(left, bottom), 270.0),
    ] {
        out.push(Marking::Arc { center, radius: CORNER_ARC_RADIUS, start_deg, end_deg: start_deg + 90.0 });
    }

    out
}
