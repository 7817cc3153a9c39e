use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Genomic coordinate. Spans are closed and 1-based: `[start, end]`.
pub type GenomicPos = u64;

/// Index of a feature within its column's feature arena.
pub type FeatureId = usize;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FeatureError {
    #[error("Invalid span: start {start} is after end {end}")]
    InvalidSpan { start: GenomicPos, end: GenomicPos },

    #[error("Unknown feature id: {0}")]
    UnknownFeature(FeatureId),

    #[error("Feature {0} is already linked into a composite feature")]
    AlreadyLinked(FeatureId),

    #[error("Cannot link {right} after {left}: it starts before it")]
    LinkOutOfOrder { left: FeatureId, right: FeatureId },

    #[error("Linking {left} to {right} would close a loop")]
    CyclicLink { left: FeatureId, right: FeatureId },

    #[error("Composite feature has no parts")]
    EmptyComposite,
}

pub type FeatureResult<T> = Result<T, FeatureError>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    pub start: GenomicPos,
    pub end: GenomicPos,
}

impl Span {
    pub fn new(start: GenomicPos, end: GenomicPos) -> FeatureResult<Self> {
        if start > end {
            return Err(FeatureError::InvalidSpan { start, end });
        }
        Ok(Self { start, end })
    }

    /// Closed-interval overlap: touching ends overlap.
    pub fn overlaps(&self, other: &Span) -> bool {
        !(self.start > other.end || self.end < other.start)
    }

    pub fn contains(&self, pos: GenomicPos) -> bool {
        pos >= self.start && pos <= self.end
    }

    /// Number of bases covered.
    pub fn len(&self) -> GenomicPos {
        self.end - self.start + 1
    }

    pub fn union(&self, other: &Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// Interned group name (source featureset or feature name), see
/// [`crate::featureset::FeatureSet::intern_group`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupKey(pub u32);

bitflags! {
    /// Why a feature is not drawn. Several collaborators own different bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct HiddenFlags: u16 {
        /// Not drawn, for whatever reason.
        const HIDDEN         = 0x0100;
        /// Hidden by user request.
        const USER_HIDE      = 0x0200;
        /// Outside the bump scope (mark or visible window). Undone by unbumping.
        const MARK_HIDE      = 0x0400;
        /// Collapsed by summarising.
        const SUMMARISED     = 0x0800;
        /// Masked feature hidden by user.
        const MASK_HIDE      = 0x1000;
        /// Filtered by score, locus prefix etc.
        const HIDE_FILTER    = 0x2000;
        /// Squashed or collapsed composite.
        const HIDE_COMPOSITE = 0x4000;
        /// Compressed feature got bumped.
        const HIDE_EXPAND    = 0x8000;

        const HIDE_REASON = Self::USER_HIDE.bits()
            | Self::MARK_HIDE.bits()
            | Self::SUMMARISED.bits()
            | Self::MASK_HIDE.bits()
            | Self::HIDE_FILTER.bits()
            | Self::HIDE_COMPOSITE.bits()
            | Self::HIDE_EXPAND.bits();
    }
}

impl HiddenFlags {
    pub fn is_hidden(&self) -> bool {
        self.contains(HiddenFlags::HIDDEN)
    }

    /// The reason bits, without the bare `HIDDEN` marker.
    pub fn reasons(&self) -> HiddenFlags {
        *self & HiddenFlags::HIDE_REASON
    }
}

/// One feature as displayed in a column.
///
/// `left`/`right` chain the parts of a composite feature (transcript exons,
/// gapped alignment blocks). They are plain arena indices owned by the
/// column, so dropping the column cannot leave dangling links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureInterval {
    pub span: Span,
    #[serde(default)]
    pub group_key: Option<GroupKey>,
    #[serde(default)]
    pub left: Option<FeatureId>,
    #[serde(default)]
    pub right: Option<FeatureId>,
    /// Drawn width in world units.
    pub width: f64,
    #[serde(default)]
    pub lane: u32,
    #[serde(default)]
    pub lane_offset: f64,
    #[serde(default)]
    pub hidden: HiddenFlags,
}

impl FeatureInterval {
    pub fn new(start: GenomicPos, end: GenomicPos, width: f64) -> FeatureResult<Self> {
        Ok(Self {
            span: Span::new(start, end)?,
            group_key: None,
            left: None,
            right: None,
            width,
            lane: 0,
            lane_offset: 0.0,
            hidden: HiddenFlags::empty(),
        })
    }

    pub fn with_group(mut self, key: GroupKey) -> Self {
        self.group_key = Some(key);
        self
    }

    pub fn start(&self) -> GenomicPos {
        self.span.start
    }

    pub fn end(&self) -> GenomicPos {
        self.span.end
    }

    /// True for the first part of a composite and for simple features.
    pub fn is_chain_head(&self) -> bool {
        self.left.is_none()
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden.is_hidden()
    }
}

/// Anything with a closed genomic extent.
pub trait Interval {
    fn span(&self) -> Span;
}

impl Interval for Span {
    fn span(&self) -> Span {
        *self
    }
}

impl Interval for FeatureInterval {
    fn span(&self) -> Span {
        self.span
    }
}
