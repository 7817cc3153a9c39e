//! Scroll region and vertical zoom

use serde::{Deserialize, Serialize};

/// Largest extent, in device units, the canvas can draw in one item.
pub const MAX_WINDOW_SIZE: f64 = 32000.0;

/// The scrollable world area of a window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollRegion {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl ScrollRegion {
    /// Corners may be given in either order.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            x1: x1.min(x2),
            y1: y1.min(y2),
            x2: x1.max(x2),
            y2: y1.max(y2),
        }
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1 + 1.0
    }

    pub fn contains_y(&self, y: f64) -> bool {
        y >= self.y1 && y <= self.y2
    }

    pub fn same_rows(&self, other: &ScrollRegion) -> bool {
        self.y1 == other.y1 && self.y2 == other.y2
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zoom {
    pub pixels_per_unit_y: f64,
    pub max_zoom_y: f64,
}

impl Zoom {
    pub fn new(pixels_per_unit_y: f64, max_zoom_y: f64) -> Self {
        Self {
            pixels_per_unit_y: pixels_per_unit_y.min(max_zoom_y),
            max_zoom_y,
        }
    }

    /// Zooming past `max_zoom_y` is clamped.
    pub fn set_pixels_per_unit(&mut self, pixels_per_unit_y: f64) {
        self.pixels_per_unit_y = pixels_per_unit_y.min(self.max_zoom_y);
    }

    pub fn world_to_device_y(&self, region: &ScrollRegion, y: f64) -> f64 {
        (y - region.y1) * self.pixels_per_unit_y
    }

    pub fn device_to_world_y(&self, region: &ScrollRegion, y: f64) -> f64 {
        region.y1 + y / self.pixels_per_unit_y
    }

    /// Device height of the closed world extent `[y1, y2]` at the current zoom.
    pub fn extent_pixels(&self, y1: f64, y2: f64) -> f64 {
        (y2 - y1 + 1.0) * self.pixels_per_unit_y
    }
}
