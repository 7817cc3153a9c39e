//! One displayed column of features
//!
//! A [`FeatureSet`] owns its features in an arena; composite features are
//! stored as contiguous runs so that `left`/`right` are neighbouring indices.
//! The interval index over the arena is built lazily on first use and
//! dropped whenever a bulk change makes incremental maintenance pointless.

use crate::bump::{BumpState, SubColumn};
use crate::packer::Lane;
use crate::skiplist::IntervalIndex;
use crate::types::{
    FeatureError, FeatureId, FeatureInterval, FeatureResult, GenomicPos, GroupKey, HiddenFlags,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How the column is drawn, as far as bumping cares.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnStyle {
    /// Unbumped column width in world units.
    #[serde(default = "default_column_width")]
    pub width: f64,
    /// Horizontal offset of the column within its container.
    #[serde(default)]
    pub dx: f64,
    /// Features are never joined into composites when bumping.
    #[serde(default)]
    pub unique: bool,
    /// Graph columns are not centred within their lanes.
    #[serde(default)]
    pub graph: bool,
    /// Background decoration rather than features: never bumped.
    #[serde(default)]
    pub decoration: bool,
}

fn default_column_width() -> f64 {
    8.0
}

impl Default for ColumnStyle {
    fn default() -> Self {
        Self {
            width: default_column_width(),
            dx: 0.0,
            unique: false,
            graph: false,
            decoration: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FeatureSet {
    pub(crate) name: String,
    pub(crate) style: ColumnStyle,
    pub(crate) features: Vec<FeatureInterval>,
    pub(crate) index: Option<IntervalIndex<FeatureId>>,
    groups: Vec<String>,
    group_lookup: HashMap<String, GroupKey>,
    pub(crate) state: BumpState,
    pub(crate) bump_width: f64,
    pub(crate) bump_overlap: GenomicPos,
    longest: GenomicPos,
    pub(crate) lanes: Vec<Lane>,
    pub(crate) sub_columns: Vec<SubColumn>,
}

impl FeatureSet {
    pub fn new<S: Into<String>>(name: S, style: ColumnStyle) -> Self {
        Self {
            name: name.into(),
            style,
            features: Vec::new(),
            index: None,
            groups: Vec::new(),
            group_lookup: HashMap::new(),
            state: BumpState::Unbumped,
            bump_width: 0.0,
            bump_overlap: 0,
            longest: 0,
            lanes: Vec::new(),
            sub_columns: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn style(&self) -> &ColumnStyle {
        &self.style
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn feature(&self, id: FeatureId) -> Option<&FeatureInterval> {
        self.features.get(id)
    }

    pub fn features(&self) -> &[FeatureInterval] {
        &self.features
    }

    pub fn state(&self) -> BumpState {
        self.state
    }

    pub fn is_bumped(&self) -> bool {
        matches!(self.state, BumpState::Bumped(_))
    }

    /// Width of the bumped column, 0 when unbumped.
    pub fn bump_width(&self) -> f64 {
        self.bump_width
    }

    /// Width the column currently occupies on screen.
    pub fn display_width(&self) -> f64 {
        if self.is_bumped() {
            self.bump_width
        } else {
            self.style.width
        }
    }

    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    pub fn sub_columns(&self) -> &[SubColumn] {
        &self.sub_columns
    }

    /// Longest feature extent, in bases minus one.
    pub fn longest(&self) -> GenomicPos {
        self.longest
    }

    pub fn intern_group(&mut self, name: &str) -> GroupKey {
        if let Some(key) = self.group_lookup.get(name) {
            return *key;
        }
        let key = GroupKey(self.groups.len() as u32);
        self.groups.push(name.to_string());
        self.group_lookup.insert(name.to_string(), key);
        key
    }

    pub fn group_name(&self, key: GroupKey) -> Option<&str> {
        self.groups.get(key.0 as usize).map(String::as_str)
    }

    fn push(&mut self, mut feature: FeatureInterval) -> FeatureId {
        feature.left = None;
        feature.right = None;
        self.longest = self.longest.max(feature.end() - feature.start());
        self.features.push(feature);
        self.features.len() - 1
    }

    /// Add one feature, updating the index in place if it has been built.
    pub fn add_feature(&mut self, feature: FeatureInterval) -> FeatureId {
        let span = feature.span;
        let id = self.push(feature);
        if let Some(index) = self.index.as_mut() {
            index.insert(span, id);
        }
        id
    }

    /// Add many features; the index is rebuilt on next use.
    pub fn add_features<I>(&mut self, features: I) -> Vec<FeatureId>
    where
        I: IntoIterator<Item = FeatureInterval>,
    {
        let ids = features.into_iter().map(|f| self.push(f)).collect();
        self.index = None;
        ids
    }

    /// Add the parts of one composite feature, chained in start order.
    pub fn add_composite(&mut self, mut parts: Vec<FeatureInterval>) -> FeatureResult<Vec<FeatureId>> {
        if parts.is_empty() {
            return Err(FeatureError::EmptyComposite);
        }
        parts.sort_by_key(|p| (p.start(), p.end()));

        let ids: Vec<FeatureId> = parts.into_iter().map(|p| self.push(p)).collect();
        for pair in ids.windows(2) {
            self.features[pair[0]].right = Some(pair[1]);
            self.features[pair[1]].left = Some(pair[0]);
        }
        self.index = None;
        Ok(ids)
    }

    /// Chain `right` after `left`, for callers that resolve composites
    /// themselves. Parts must be linked in start order so that a chain's
    /// head is also its leftmost part.
    pub fn link(&mut self, left: FeatureId, right: FeatureId) -> FeatureResult<()> {
        let n = self.features.len();
        if left >= n {
            return Err(FeatureError::UnknownFeature(left));
        }
        if right >= n {
            return Err(FeatureError::UnknownFeature(right));
        }
        if self.features[left].right.is_some() {
            return Err(FeatureError::AlreadyLinked(left));
        }
        if self.features[right].left.is_some() {
            return Err(FeatureError::AlreadyLinked(right));
        }
        if self.features[right].start() < self.features[left].start() {
            return Err(FeatureError::LinkOutOfOrder { left, right });
        }
        // `right` is a chain head here, so walking its chain terminates
        let mut cur = Some(right);
        while let Some(id) = cur {
            if id == left {
                return Err(FeatureError::CyclicLink { left, right });
            }
            cur = self.features[id].right;
        }
        self.features[left].right = Some(right);
        self.features[right].left = Some(left);
        Ok(())
    }

    /// Hide a feature for `reason`.
    pub fn set_hidden(&mut self, id: FeatureId, reason: HiddenFlags) -> FeatureResult<()> {
        let feature = self.features.get_mut(id).ok_or(FeatureError::UnknownFeature(id))?;
        feature.hidden |= reason.reasons() | HiddenFlags::HIDDEN;
        Ok(())
    }

    /// Drop `reason`; the feature shows again once no reason is left.
    pub fn clear_hidden(&mut self, id: FeatureId, reason: HiddenFlags) -> FeatureResult<()> {
        let feature = self.features.get_mut(id).ok_or(FeatureError::UnknownFeature(id))?;
        feature.hidden.remove(reason.reasons());
        if feature.hidden.reasons().is_empty() {
            feature.hidden.remove(HiddenFlags::HIDDEN);
        }
        Ok(())
    }

    /// Build the index if it is missing.
    pub fn ensure_index(&mut self) -> &IntervalIndex<FeatureId> {
        let (name, features) = (&self.name, &self.features);
        self.index.get_or_insert_with(|| build_index(name, features))
    }

    /// Move the index out, building it if missing. The caller puts it back.
    pub(crate) fn take_index(&mut self) -> IntervalIndex<FeatureId> {
        match self.index.take() {
            Some(index) => index,
            None => build_index(&self.name, &self.features),
        }
    }

    pub fn index(&self) -> Option<&IntervalIndex<FeatureId>> {
        self.index.as_ref()
    }

    /// Drop the index, e.g. after restyling.
    pub fn invalidate_index(&mut self) {
        self.index = None;
    }

    /// Features overlapping `[y1, y2]`, in index order.
    ///
    /// The search starts `extra` bases before `y1` so that long features
    /// beginning above the region are found: `extra` is the longest bumped
    /// extent when bumped (composites can be much longer than their parts)
    /// and the longest single feature otherwise.
    pub fn features_in_range(&self, y1: GenomicPos, y2: GenomicPos) -> Vec<FeatureId> {
        let Some(index) = self.index.as_ref() else {
            let mut ids: Vec<FeatureId> = (0..self.features.len())
                .filter(|&id| {
                    let f = &self.features[id];
                    f.start() <= y2 && f.end() >= y1
                })
                .collect();
            ids.sort_by_key(|&id| (self.features[id].start(), self.features[id].end()));
            return ids;
        };

        let extra = if self.is_bumped() {
            self.bump_overlap.max(self.longest)
        } else {
            self.longest
        };
        let cursor = index.find_first_at_or_after(y1.saturating_sub(extra));

        index
            .iter_from(cursor)
            .take_while(|(span, _)| span.start <= y2)
            .filter(|(span, _)| span.end >= y1)
            .map(|(_, &id)| id)
            .collect()
    }
}

fn build_index(name: &str, features: &[FeatureInterval]) -> IntervalIndex<FeatureId> {
    log::debug!("indexing {} features in {}", features.len(), name);
    IntervalIndex::build(features.iter().enumerate().map(|(id, f)| (f.span, id)))
}
