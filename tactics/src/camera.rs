#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use crate::consts::{BOARD_HEIGHT, BOARD_WIDTH};

/// A point in either screen or board space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Maps the fixed-size board into the host viewport.
///
/// `pan_x` / `pan_y` are in CSS pixels.
/// `zoom` is a scale factor (1.0 = one board unit per CSS pixel).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: 1.0 }
    }
}

impl Camera {
    /// Letterbox the board into a `viewport_w` x `viewport_h` viewport,
    /// preserving aspect ratio and centring it.
    ///
    /// Returns the identity camera for empty or non-finite viewports.
    #[must_use]
    pub fn fit(viewport_w: f64, viewport_h: f64) -> Self {
        if !(viewport_w.is_finite() && viewport_h.is_finite()) || viewport_w <= 0.0 || viewport_h <= 0.0 {
            return Self::default();
        }
        let zoom = (viewport_w / BOARD_WIDTH).min(viewport_h / BOARD_HEIGHT);
        Self {
            pan_x: (viewport_w - BOARD_WIDTH * zoom) / 2.0,
            pan_y: (viewport_h - BOARD_HEIGHT * zoom) / 2.0,
            zoom,
        }
    }

    /// Convert a screen-space point (CSS pixels) to board coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.pan_x) / self.zoom,
            y: (screen.y - self.pan_y) / self.zoom,
        }
    }

    /// Convert a board-space point to screen coordinates (CSS pixels).
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point {
            x: world.x * self.zoom + self.pan_x,
            y: world.y * self.zoom + self.pan_y,
        }
    }
}

/// Clamp a board-space point into the board rectangle.
#[must_use]
pub fn clamp_to_board(pt: Point) -> Point {
    Point {
        x: pt.x.clamp(0.0, BOARD_WIDTH),
        y: pt.y.clamp(0.0, BOARD_HEIGHT),
    }
}
