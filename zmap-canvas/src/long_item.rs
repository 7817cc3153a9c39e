//! Long item cropping
//!
//! The canvas cannot draw an item taller than [`MAX_WINDOW_SIZE`] device
//! units. Items that could exceed it at maximum zoom are registered here
//! with their true geometry; on every scroll region change their displayed
//! geometry is re-derived from the stored original and clipped to just
//! outside the region. Clipping always starts from the original, so zooming
//! back in shows the full shape again and repeated crops never drift.

use crate::zoom::{ScrollRegion, MAX_WINDOW_SIZE};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Caller's handle for a canvas item.
pub type ItemId = u64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Box { x1: f64, y1: f64, x2: f64, y2: f64 },
    /// Polyline or polygon vertices as `(x, y)`.
    Points(Vec<(f64, f64)>),
}

impl Shape {
    /// Vertical extent as `(min, max)`.
    pub fn y_extent(&self) -> (f64, f64) {
        match self {
            Shape::Box { y1, y2, .. } => (y1.min(*y2), y1.max(*y2)),
            Shape::Points(points) => points.iter().fold((f64::MAX, f64::MIN), |(lo, hi), &(_, y)| {
                (lo.min(y), hi.max(y))
            }),
        }
    }

    /// Clamp y coordinates into `[lo, hi]`; x is never touched.
    fn clip_y(&mut self, lo: f64, hi: f64) {
        match self {
            Shape::Box { y1, y2, .. } => {
                *y1 = y1.clamp(lo, hi);
                *y2 = y2.clamp(lo, hi);
            }
            Shape::Points(points) => {
                for (_, y) in points.iter_mut() {
                    *y = y.clamp(lo, hi);
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
struct LongItem {
    original: Shape,
    extent: (f64, f64),
    displayed: Shape,
}

#[derive(Debug, Clone)]
pub struct LongItems {
    items: HashMap<ItemId, LongItem>,
    max_zoom: f64,
    max_window_size: f64,
    last_region: Option<ScrollRegion>,
    force_crop: bool,
    cropped: usize,
}

impl LongItems {
    pub fn new(max_zoom: f64) -> Self {
        Self::with_window_size(max_zoom, MAX_WINDOW_SIZE)
    }

    pub fn with_window_size(max_zoom: f64, max_window_size: f64) -> Self {
        Self {
            items: HashMap::new(),
            max_zoom,
            max_window_size,
            last_region: None,
            force_crop: false,
            cropped: 0,
        }
    }

    fn exceeds(&self, (y1, y2): (f64, f64)) -> bool {
        (y2 - y1 + 1.0) * self.max_zoom > self.max_window_size
    }

    /// Register `shape` if it could be too long to draw at maximum zoom.
    ///
    /// Re-checking a registered item replaces its stored geometry, or drops
    /// it if it is no longer long. Returns whether the item is registered.
    pub fn check(&mut self, id: ItemId, shape: Shape) -> bool {
        let extent = shape.y_extent();
        if !self.exceeds(extent) {
            if self.items.remove(&id).is_some() {
                self.force_crop = true;
            }
            return false;
        }

        log::trace!("long item {} spans {} -> {}", id, extent.0, extent.1);
        self.items.insert(
            id,
            LongItem {
                displayed: shape.clone(),
                original: shape,
                extent,
            },
        );
        self.force_crop = true;
        true
    }

    /// Re-derive every displayed shape for `region`. Returns how many
    /// items are shown clipped.
    pub fn crop(&mut self, region: &ScrollRegion) -> usize {
        let unchanged = self
            .last_region
            .as_ref()
            .map_or(false, |last| last.same_rows(region));
        if unchanged && !self.force_crop {
            return self.cropped;
        }

        let (lo, hi) = (region.y1 - 1.0, region.y2 + 1.0);
        let mut cropped = 0;
        for (id, item) in self.items.iter_mut() {
            item.displayed = item.original.clone();

            let (start, end) = item.extent;
            let overlaps = !(end < region.y1 || start > region.y2);
            let sticks_out = start < region.y1 || end > region.y2;
            if overlaps && sticks_out {
                item.displayed.clip_y(lo, hi);
                cropped += 1;
                log::trace!("cropped long item {} to {} -> {}", id, lo.max(start), hi.min(end));
            }
        }

        log::debug!(
            "cropped {} of {} long items to {} -> {}",
            cropped,
            self.items.len(),
            region.y1,
            region.y2
        );
        self.last_region = Some(*region);
        self.force_crop = false;
        self.cropped = cropped;
        cropped
    }

    /// Show every item with its true geometry.
    pub fn restore(&mut self) {
        for item in self.items.values_mut() {
            item.displayed = item.original.clone();
        }
        self.last_region = None;
        self.cropped = 0;
    }

    pub fn original(&self, id: ItemId) -> Option<&Shape> {
        self.items.get(&id).map(|item| &item.original)
    }

    /// True vertical extent of a registered item.
    pub fn original_extent(&self, id: ItemId) -> Option<(f64, f64)> {
        self.items.get(&id).map(|item| item.extent)
    }

    pub fn displayed(&self, id: ItemId) -> Option<&Shape> {
        self.items.get(&id).map(|item| &item.displayed)
    }

    pub fn remove(&mut self, id: ItemId) -> bool {
        let removed = self.items.remove(&id).is_some();
        if removed {
            self.force_crop = true;
        }
        removed
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.last_region = None;
        self.cropped = 0;
    }

    pub fn max_zoom(&self) -> f64 {
        self.max_zoom
    }

    /// Change the zoom limit and drop items that can no longer get too long.
    pub fn set_max_zoom(&mut self, max_zoom: f64) {
        self.max_zoom = max_zoom;
        let before = self.items.len();
        let (limit, zoom) = (self.max_window_size, max_zoom);
        self.items
            .retain(|_, item| (item.extent.1 - item.extent.0 + 1.0) * zoom > limit);
        if self.items.len() != before {
            log::debug!("max zoom {} released {} long items", max_zoom, before - self.items.len());
        }
        self.force_crop = true;
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
