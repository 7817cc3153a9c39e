//! ZMap Core Library
//!
//! Interval index, packing range pool, interval packer and bump controller
//! for the feature columns of a ZMap window.

pub mod types;
pub mod skiplist;
pub mod pool;
pub mod packer;
pub mod featureset;
pub mod bump;

// Re-export commonly used types
pub use types::{FeatureError, FeatureId, FeatureInterval, GenomicPos, GroupKey, HiddenFlags, Interval, Span};
pub use skiplist::{Cursor, IntervalIndex, PayloadDisposal};
pub use pool::{RangePool, PackingRange};
pub use packer::{Lane, LaneTable, OpenLanes, PackStats};
pub use featureset::{ColumnStyle, FeatureSet};
pub use bump::{
    BumpContext, BumpError, BumpListener, BumpMode, BumpOutcome, BumpSettings, BumpState,
    CompressionScope, NoopListener, SubColumn,
};

/// Version information for the ZMap core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
