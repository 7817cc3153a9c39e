//! Bump mode controller
//!
//! Bumping spreads the features of one column sideways into lanes so that
//! overlapping features stay readable. A pass walks the column index in
//! `(start, end)` order, decides which features take part (scope, hide
//! flags, composite heads), assigns a lane to each, lays the lanes out and
//! finally checks the result fits the window.
//!
//! Every pass is computed into a scratch layout first. Nothing on the
//! column changes unless the whole pass succeeds, so a refused bump leaves
//! the previous layout on screen.

use crate::featureset::FeatureSet;
use crate::packer::{Lane, LaneTable, OpenLanes, PackStats};
use crate::pool::{RangePool, DEFAULT_CHUNK_SIZE};
use crate::types::{FeatureId, GenomicPos, HiddenFlags, Span};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Widest column the canvas can draw, in world units.
pub const DEFAULT_MAX_WINDOW: f64 = 30000.0;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BumpError {
    #[error(
        "Cannot bump featureset {featureset} - too many features to fit into the window \
         ({width} > {limit}). Try setting the mark to a smaller region!"
    )]
    WidthExceeded {
        featureset: String,
        width: f64,
        limit: f64,
    },

    #[error("Unknown bump mode: {0}")]
    UnknownMode(String),
}

pub type BumpResult<T> = Result<T, BumpError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BumpMode {
    /// Every feature at offset 0.
    Unbumped,
    /// One lane per feature.
    StackAll,
    /// Lowest lane free of overlap.
    PackByOverlap,
    /// One lane per group key.
    PackByGroupKey,
    /// Two lanes, taken in turn.
    Alternating,
}

impl BumpMode {
    pub const ALL: [BumpMode; 5] = [
        BumpMode::Unbumped,
        BumpMode::StackAll,
        BumpMode::PackByOverlap,
        BumpMode::PackByGroupKey,
        BumpMode::Alternating,
    ];

    /// Map a style-file mode name, including retired names, to a mode.
    pub fn from_style_name(name: &str) -> Option<BumpMode> {
        let mode = match name.trim().to_ascii_lowercase().as_str() {
            "unbump" | "unbumped" | "none" => BumpMode::Unbumped,
            "all" | "stack_all" | "start_position" | "name_colinear" | "name_best_ends" => {
                BumpMode::StackAll
            }
            "overlap" | "pack_by_overlap" | "name_interleave" | "name_no_interleave" => {
                BumpMode::PackByOverlap
            }
            "featureset_name" | "group" | "pack_by_group_key" => BumpMode::PackByGroupKey,
            "alternating" | "alternate" => BumpMode::Alternating,
            _ => return None,
        };
        Some(mode)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BumpMode::Unbumped => "unbumped",
            BumpMode::StackAll => "stack_all",
            BumpMode::PackByOverlap => "pack_by_overlap",
            BumpMode::PackByGroupKey => "pack_by_group_key",
            BumpMode::Alternating => "alternating",
        }
    }
}

impl fmt::Display for BumpMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BumpMode {
    type Err = BumpError;

    fn from_str(s: &str) -> BumpResult<Self> {
        BumpMode::from_style_name(s).ok_or_else(|| BumpError::UnknownMode(s.to_string()))
    }
}

/// Which part of the sequence takes part in a bump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompressionScope {
    /// Only what is on screen.
    VisibleWindow(Span),
    /// Only the user's marked region.
    MarkedRegion(Span),
    WholeSequence,
}

impl CompressionScope {
    pub fn bounds(&self) -> Option<Span> {
        match self {
            CompressionScope::VisibleWindow(span) | CompressionScope::MarkedRegion(span) => {
                Some(*span)
            }
            CompressionScope::WholeSequence => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BumpState {
    Unbumped,
    Bumped(BumpMode),
}

/// A named lane of a column bumped by group key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubColumn {
    pub name: Option<String>,
    pub offset: f64,
    /// Lane width plus spacing.
    pub width: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BumpSettings {
    /// Gap between lanes, in world units.
    #[serde(default = "default_spacing")]
    pub spacing: f64,

    #[serde(default = "default_max_window")]
    pub max_window: f64,

    /// Records added to the range pool each time it runs dry.
    #[serde(default = "default_pool_chunk")]
    pub pool_chunk: usize,

    #[serde(default = "default_mode")]
    pub default_mode: BumpMode,

    /// Scope used when a bump does not name one.
    #[serde(default = "default_scope")]
    pub default_scope: CompressionScope,

    /// Longest composite chain followed before it is treated as broken.
    #[serde(default = "default_max_chain_len")]
    pub max_chain_len: usize,
}

fn default_spacing() -> f64 {
    2.0
}

fn default_max_window() -> f64 {
    DEFAULT_MAX_WINDOW
}

fn default_pool_chunk() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_mode() -> BumpMode {
    BumpMode::PackByOverlap
}

fn default_scope() -> CompressionScope {
    CompressionScope::WholeSequence
}

fn default_max_chain_len() -> usize {
    100_000
}

impl Default for BumpSettings {
    fn default() -> Self {
        Self {
            spacing: default_spacing(),
            max_window: default_max_window(),
            pool_chunk: default_pool_chunk(),
            default_mode: default_mode(),
            default_scope: default_scope(),
            max_chain_len: default_max_chain_len(),
        }
    }
}

/// State shared by every bump in one window.
#[derive(Debug)]
pub struct BumpContext {
    pub settings: BumpSettings,
    pool: RangePool,
}

impl Default for BumpContext {
    fn default() -> Self {
        Self::new(BumpSettings::default())
    }
}

impl BumpContext {
    pub fn new(settings: BumpSettings) -> Self {
        let pool = RangePool::new(settings.pool_chunk);
        Self { settings, pool }
    }

    pub fn pool(&self) -> &RangePool {
        &self.pool
    }
}

/// Told about things the user should hear of.
pub trait BumpListener {
    /// A bump was refused because the result would not fit the window.
    fn width_exceeded(&mut self, _error: &BumpError) {}

    /// The set of features hidden by the bump scope changed; the display
    /// should refresh its hidden-feature summary.
    fn hidden_by_bump_changed(&mut self, _featureset: &str, _hidden: usize) {}
}

pub struct NoopListener;

impl BumpListener for NoopListener {}

#[derive(Debug, Clone, Serialize)]
pub struct BumpOutcome {
    pub mode: BumpMode,
    pub lanes: usize,
    pub bump_width: f64,
    /// Features currently hidden by the bump scope.
    pub hidden_by_bump: usize,
    /// Whether any feature entered or left the bump-hidden set.
    pub hidden_changed: bool,
    /// Composites left unlaid because their chain was inconsistent.
    pub skipped_chains: usize,
    pub stats: PackStats,
}

#[derive(Clone, Copy)]
struct Placement {
    lane: u32,
    offset: f64,
    flags: HiddenFlags,
}

struct Scratch {
    placements: Vec<Placement>,
    lanes: Vec<Lane>,
    sub_columns: Vec<SubColumn>,
    width: f64,
    overlap: GenomicPos,
    skipped_chains: usize,
    stats: PackStats,
}

/// Drop the bump-scope hide, restoring whatever other reasons say.
fn release_mark_hide(flags: &mut HiddenFlags) {
    if flags.contains(HiddenFlags::SUMMARISED) {
        flags.insert(HiddenFlags::HIDDEN);
    }
    flags.remove(HiddenFlags::MARK_HIDE);
    if flags.reasons().is_empty() {
        flags.remove(HiddenFlags::HIDDEN);
    }
}

/// Follow a composite from its head, checking each back link.
///
/// Returns `false` for a chain that points outside the column, whose links
/// disagree, or that is longer than `max_len` (which is how cycles show up).
fn walk_chain(set: &FeatureSet, head: FeatureId, max_len: usize, members: &mut Vec<FeatureId>) -> bool {
    members.clear();
    members.push(head);
    let mut cur = head;
    while let Some(next) = set.features[cur].right {
        if next >= set.features.len() || set.features[next].left != Some(cur) {
            return false;
        }
        if members.len() >= max_len {
            return false;
        }
        members.push(next);
        cur = next;
    }
    true
}

impl FeatureSet {
    /// Lay the column out in `mode`.
    ///
    /// On error the column keeps its previous layout and flags.
    pub fn bump(
        &mut self,
        ctx: &mut BumpContext,
        mode: BumpMode,
        scope: CompressionScope,
        listener: &mut dyn BumpListener,
    ) -> BumpResult<BumpOutcome> {
        if self.style.decoration {
            log::debug!("{} is a decoration column, not bumping", self.name);
            return Ok(BumpOutcome {
                mode,
                lanes: self.lanes.len(),
                bump_width: self.bump_width,
                hidden_by_bump: self.hidden_by_bump(),
                hidden_changed: false,
                skipped_chains: 0,
                stats: PackStats::default(),
            });
        }

        let before: Vec<bool> = self
            .features
            .iter()
            .map(|f| f.hidden.contains(HiddenFlags::MARK_HIDE))
            .collect();

        let scratch = if mode == BumpMode::Unbumped {
            self.unbump_layout()
        } else {
            let scratch = self.pack(ctx, mode, scope);
            let needed = scratch.width + self.style.dx;
            if needed > ctx.settings.max_window {
                let error = BumpError::WidthExceeded {
                    featureset: self.name.clone(),
                    width: needed,
                    limit: ctx.settings.max_window,
                };
                log::warn!("{}", error);
                listener.width_exceeded(&error);
                return Err(error);
            }
            scratch
        };

        // commit
        for (feature, placement) in self.features.iter_mut().zip(&scratch.placements) {
            feature.lane = placement.lane;
            feature.lane_offset = placement.offset;
            feature.hidden = placement.flags;
        }
        self.state = match mode {
            BumpMode::Unbumped => BumpState::Unbumped,
            other => BumpState::Bumped(other),
        };
        self.bump_width = scratch.width;
        self.bump_overlap = scratch.overlap;
        self.lanes = scratch.lanes;
        self.sub_columns = scratch.sub_columns;

        let hidden_changed = self
            .features
            .iter()
            .zip(&before)
            .any(|(f, &was)| f.hidden.contains(HiddenFlags::MARK_HIDE) != was);
        let hidden_by_bump = self.hidden_by_bump();
        if hidden_changed {
            listener.hidden_by_bump_changed(&self.name, hidden_by_bump);
        }

        log::debug!(
            "bumped {} as {}: {} features, {} lanes, width {}, {} comparisons",
            self.name,
            mode,
            scratch.stats.features,
            self.lanes.len(),
            self.bump_width,
            scratch.stats.comparisons
        );

        Ok(BumpOutcome {
            mode,
            lanes: self.lanes.len(),
            bump_width: self.bump_width,
            hidden_by_bump,
            hidden_changed,
            skipped_chains: scratch.skipped_chains,
            stats: scratch.stats,
        })
    }

    /// Bump with the context's default mode over the whole sequence.
    pub fn bump_default(&mut self, ctx: &mut BumpContext) -> BumpResult<BumpOutcome> {
        let (mode, scope) = (ctx.settings.default_mode, ctx.settings.default_scope);
        self.bump(ctx, mode, scope, &mut NoopListener)
    }

    pub fn unbump(&mut self, ctx: &mut BumpContext) -> BumpResult<BumpOutcome> {
        self.bump(ctx, BumpMode::Unbumped, CompressionScope::WholeSequence, &mut NoopListener)
    }

    /// Features currently hidden by the bump scope.
    pub fn hidden_by_bump(&self) -> usize {
        self.features
            .iter()
            .filter(|f| f.hidden.contains(HiddenFlags::MARK_HIDE))
            .count()
    }

    fn unbump_layout(&self) -> Scratch {
        let placements = self
            .features
            .iter()
            .map(|f| {
                let mut flags = f.hidden;
                release_mark_hide(&mut flags);
                Placement {
                    lane: 0,
                    offset: 0.0,
                    flags,
                }
            })
            .collect();
        Scratch {
            placements,
            lanes: Vec::new(),
            sub_columns: Vec::new(),
            width: 0.0,
            overlap: 0,
            skipped_chains: 0,
            stats: PackStats::default(),
        }
    }

    fn pack(&mut self, ctx: &mut BumpContext, mode: BumpMode, scope: CompressionScope) -> Scratch {
        let index = self.take_index();

        let spacing = ctx.settings.spacing;
        let max_chain = ctx.settings.max_chain_len.min(self.features.len()).max(1);
        let complex = !self.style.unique;
        let bounds = scope.bounds();

        // start from scratch: earlier scope hides do not carry over
        let mut placements: Vec<Placement> = self
            .features
            .iter()
            .map(|f| {
                let mut flags = f.hidden;
                if flags.contains(HiddenFlags::MARK_HIDE) {
                    flags.remove(HiddenFlags::MARK_HIDE);
                    if flags.reasons().is_empty() {
                        flags.remove(HiddenFlags::HIDDEN);
                    }
                }
                Placement {
                    lane: 0,
                    offset: 0.0,
                    flags,
                }
            })
            .collect();

        let mut open = OpenLanes::new(&mut ctx.pool);
        let mut table = LaneTable::new();
        let mut members: Vec<FeatureId> = Vec::new();
        let mut laid: Vec<FeatureId> = Vec::new();
        let mut overlap: GenomicPos = 0;
        let mut skipped_chains = 0;
        let mut placed = 0;
        let mut next_stack_lane = 0u32;
        let mut alternate = 0u32;

        for (_, &id) in index.iter() {
            let feature = &self.features[id];

            if complex && !feature.is_chain_head() {
                continue;
            }

            let (extent, width) = if complex {
                if !walk_chain(self, id, max_chain, &mut members) {
                    log::warn!(
                        "{}: composite feature starting at {} has an inconsistent chain, not bumped",
                        self.name,
                        feature.start()
                    );
                    skipped_chains += 1;
                    continue;
                }
                members.iter().fold((feature.span, feature.width), |(span, width), &m| {
                    let part = &self.features[m];
                    (span.union(&part.span), width.max(part.width))
                })
            } else {
                members.clear();
                members.push(id);
                (feature.span, feature.width)
            };

            if let Some(bounds) = bounds {
                let outside = extent.end < bounds.start || extent.start > bounds.end;
                let touches = members.iter().any(|&m| self.features[m].span.overlaps(&bounds));
                if outside || !touches {
                    for &m in &members {
                        placements[m].flags |= HiddenFlags::MARK_HIDE | HiddenFlags::HIDDEN;
                    }
                    continue;
                }
            }

            // bumping shows summarised features
            for &m in &members {
                let flags = &mut placements[m].flags;
                if flags.reasons() == HiddenFlags::SUMMARISED {
                    flags.remove(HiddenFlags::HIDDEN);
                }
            }

            if placements[id].flags.is_hidden() {
                continue;
            }

            overlap = overlap.max(extent.end - extent.start);

            let lane = match mode {
                BumpMode::StackAll => {
                    let lane = next_stack_lane;
                    next_stack_lane += 1;
                    lane
                }
                BumpMode::PackByOverlap => open.place_by_overlap(extent, width),
                BumpMode::PackByGroupKey => {
                    let key = feature.group_key;
                    let (lane, opened) = open.place_by_group(key, extent, width);
                    if opened {
                        table.set_group(lane, key);
                    }
                    lane
                }
                BumpMode::Alternating => {
                    let lane = alternate;
                    alternate ^= 1;
                    lane
                }
                BumpMode::Unbumped => 0,
            };
            table.record(lane, width);

            for &m in &members {
                placements[m].lane = lane;
            }
            laid.extend_from_slice(&members);
            placed += 1;
        }
        self.index = Some(index);

        let mut stats = open.finish();
        if mode == BumpMode::StackAll || mode == BumpMode::Alternating {
            stats.features = placed;
            stats.lanes = table.len();
        }

        let (lanes, width) = if mode == BumpMode::Alternating {
            alternating_layout(&table, self.style.width, spacing)
        } else {
            table.layout(spacing)
        };

        for &m in &laid {
            let lane = placements[m].lane as usize;
            placements[m].offset = lanes.get(lane).map_or(0.0, |l| l.offset);
        }

        let sub_columns = if mode == BumpMode::PackByGroupKey {
            lanes
                .iter()
                .map(|lane| SubColumn {
                    name: lane
                        .group_key
                        .and_then(|key| self.group_name(key))
                        .map(str::to_string),
                    offset: lane.offset,
                    width: lane.width + spacing,
                })
                .collect()
        } else {
            Vec::new()
        };

        Scratch {
            placements,
            lanes,
            sub_columns,
            width,
            overlap,
            skipped_chains,
            stats,
        }
    }
}

/// Two lanes of the column's own width; the second starts one column width
/// plus spacing over.
fn alternating_layout(table: &LaneTable, column_width: f64, spacing: f64) -> (Vec<Lane>, f64) {
    if table.is_empty() {
        return (Vec::new(), 0.0);
    }
    let incr = column_width + spacing;
    let lanes = (0..2)
        .map(|i| Lane {
            index: i,
            offset: incr * i as f64,
            width: column_width,
            group_key: None,
        })
        .collect();
    (lanes, incr * 2.0 - spacing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::featureset::ColumnStyle;
    use crate::types::FeatureInterval;

    fn feature(start: GenomicPos, end: GenomicPos, width: f64) -> FeatureInterval {
        FeatureInterval::new(start, end, width).unwrap()
    }

    fn context(spacing: f64) -> BumpContext {
        BumpContext::new(BumpSettings {
            spacing,
            ..BumpSettings::default()
        })
    }

    #[test]
    fn test_style_names() {
        assert_eq!(BumpMode::from_style_name("overlap"), Some(BumpMode::PackByOverlap));
        assert_eq!(BumpMode::from_style_name("name_interleave"), Some(BumpMode::PackByOverlap));
        assert_eq!(BumpMode::from_style_name("start_position"), Some(BumpMode::StackAll));
        assert_eq!(BumpMode::from_style_name("featureset_name"), Some(BumpMode::PackByGroupKey));
        assert_eq!(BumpMode::from_style_name("Alternating"), Some(BumpMode::Alternating));
        assert_eq!(BumpMode::from_style_name("sideways"), None);
        assert!("sideways".parse::<BumpMode>().is_err());
        for mode in BumpMode::ALL {
            assert_eq!(mode.as_str().parse::<BumpMode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_settings_defaults_from_empty_json() {
        let settings: BumpSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.max_window, DEFAULT_MAX_WINDOW);
        assert_eq!(settings.default_mode, BumpMode::PackByOverlap);
        assert_eq!(settings.pool_chunk, DEFAULT_CHUNK_SIZE);
        assert_eq!(settings.default_scope, CompressionScope::WholeSequence);
    }

    #[test]
    fn test_bump_default_uses_configured_scope() {
        let settings: BumpSettings = serde_json::from_str(
            r#"{ "default_mode": "stack_all", "default_scope": { "marked_region": { "start": 100, "end": 500 } } }"#,
        )
        .unwrap();
        let mut set = FeatureSet::new("genes", ColumnStyle::default());
        set.add_features(vec![
            FeatureInterval::new(10, 20, 1.0).unwrap(),
            FeatureInterval::new(300, 400, 1.0).unwrap(),
        ]);

        let outcome = set.bump_default(&mut BumpContext::new(settings)).unwrap();
        assert_eq!(set.state(), BumpState::Bumped(BumpMode::StackAll));
        assert_eq!(outcome.lanes, 1);
        assert_eq!(set.hidden_by_bump(), 1);
        assert!(set.feature(0).unwrap().hidden.contains(HiddenFlags::MARK_HIDE));
    }

    #[test]
    fn test_alternating_layout() {
        let mut set = FeatureSet::new("alt", ColumnStyle { width: 6.0, ..ColumnStyle::default() });
        set.add_features((0..5).map(|i| feature(i * 10 + 1, i * 10 + 5, 6.0)));
        let mut ctx = context(2.0);

        let outcome = set
            .bump(&mut ctx, BumpMode::Alternating, CompressionScope::WholeSequence, &mut NoopListener)
            .unwrap();
        assert_eq!(outcome.bump_width, 14.0);
        let offsets: Vec<f64> = set.features().iter().map(|f| f.lane_offset).collect();
        assert_eq!(offsets, vec![0.0, 8.0, 0.0, 8.0, 0.0]);
        assert_eq!(set.feature(0).unwrap().lane, 0);
    }

    #[test]
    fn test_decoration_column_is_left_alone() {
        let mut set = FeatureSet::new(
            "3 frame",
            ColumnStyle {
                decoration: true,
                ..ColumnStyle::default()
            },
        );
        set.add_features(vec![feature(1, 10, 1.0), feature(5, 15, 1.0)]);
        let outcome = set
            .bump(&mut context(2.0), BumpMode::StackAll, CompressionScope::WholeSequence, &mut NoopListener)
            .unwrap();
        assert_eq!(outcome.lanes, 0);
        assert!(!set.is_bumped());
    }

    #[test]
    fn test_release_mark_hide_restores_summarised() {
        let mut flags = HiddenFlags::MARK_HIDE | HiddenFlags::SUMMARISED;
        release_mark_hide(&mut flags);
        assert_eq!(flags, HiddenFlags::SUMMARISED | HiddenFlags::HIDDEN);

        let mut flags = HiddenFlags::MARK_HIDE | HiddenFlags::HIDDEN;
        release_mark_hide(&mut flags);
        assert!(flags.is_empty());
    }

    #[test]
    fn test_broken_chains_are_skipped() {
        let mut set = FeatureSet::new("broken", ColumnStyle::default());
        let ids = set.add_features(vec![
            feature(10, 20, 2.0),
            feature(30, 40, 2.0),
            feature(15, 25, 2.0),
        ]);
        // forward link without the matching back link
        set.features[ids[0]].right = Some(ids[1]);
        // points past the end of the column
        set.features[ids[2]].right = Some(99);

        let outcome = set
            .bump(&mut context(1.0), BumpMode::PackByOverlap, CompressionScope::WholeSequence, &mut NoopListener)
            .unwrap();
        assert_eq!(outcome.skipped_chains, 2);
        // the orphaned part is laid out as a feature of its own
        assert_eq!(outcome.lanes, 1);
        assert_eq!(outcome.stats.features, 1);
    }

    #[test]
    fn test_overlong_chain_is_skipped() {
        let mut set = FeatureSet::new("long", ColumnStyle::default());
        let ids = set.add_composite((0..6).map(|i| feature(i * 10 + 1, i * 10 + 5, 1.0)).collect()).unwrap();
        let mut ctx = BumpContext::new(BumpSettings {
            max_chain_len: 4,
            ..BumpSettings::default()
        });
        let outcome = set
            .bump(&mut ctx, BumpMode::StackAll, CompressionScope::WholeSequence, &mut NoopListener)
            .unwrap();
        assert_eq!(outcome.skipped_chains, 1);
        assert_eq!(outcome.lanes, 0);

        ctx.settings.max_chain_len = 6;
        let outcome = set
            .bump(&mut ctx, BumpMode::StackAll, CompressionScope::WholeSequence, &mut NoopListener)
            .unwrap();
        assert_eq!(outcome.skipped_chains, 0);
        assert!(ids.iter().all(|&id| set.feature(id).unwrap().lane == 0));
    }

    #[test]
    fn test_group_sub_columns_are_named() {
        let mut set = FeatureSet::new("est", ColumnStyle::default());
        let human = set.intern_group("human");
        let mouse = set.intern_group("mouse");
        set.add_features(vec![
            feature(1, 10, 4.0).with_group(human),
            feature(5, 20, 3.0).with_group(mouse),
            feature(30, 40, 6.0).with_group(human),
        ]);
        let outcome = set
            .bump(&mut context(1.0), BumpMode::PackByGroupKey, CompressionScope::WholeSequence, &mut NoopListener)
            .unwrap();
        assert_eq!(outcome.lanes, 2);
        let names: Vec<Option<&str>> = set.sub_columns().iter().map(|s| s.name.as_deref()).collect();
        assert_eq!(names, vec![Some("human"), Some("mouse")]);
        assert_eq!(set.sub_columns()[1].offset, 7.0);
        assert_eq!(set.sub_columns()[1].width, 4.0);
        assert_eq!(outcome.bump_width, 10.0);
    }
}
