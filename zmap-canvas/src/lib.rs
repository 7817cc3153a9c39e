//! ZMap Canvas Geometry
//!
//! Turns bumped columns into world coordinates and keeps items that are too
//! long for the canvas clipped to the scroll region.

pub mod zoom;
pub mod long_item;
pub mod placement;

pub use zoom::{ScrollRegion, Zoom, MAX_WINDOW_SIZE};
pub use long_item::{ItemId, LongItems, Shape};
pub use placement::{ColumnPlacement, FeaturePlacement};
