//! Greedy interval packing
//!
//! Features arrive in ascending start order. [`OpenLanes`] keeps one open
//! [`PackingRange`](crate::pool::PackingRange) per occupied lane, ordered by
//! lane number, and each new feature takes the lowest lane whose occupant
//! does not overlap it. Lanes whose occupant has ended are dropped lazily,
//! when a later walk reaches them, rather than by scanning for them.
//!
//! Greedy-by-start is optimal for interval graphs: the number of lanes equals
//! the deepest overlap. The walk itself is not linear though. A feature
//! visits every open lane below the one it lands in, so a pass costs
//! O(n * k) comparisons for k concurrently open lanes, which degenerates to
//! O(n^2) when everything overlaps everything (one lane per feature).
//! Measured on real columns the growth is closer to n^1.33 but nothing
//! bounds it; [`PackStats`] records the comparison count per pass.

use crate::pool::{RangeId, RangePool};
use crate::types::{GroupKey, Span};
use serde::Serialize;

/// Counters for one packing pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PackStats {
    pub features: usize,
    pub comparisons: usize,
    pub lanes: usize,
    /// Open ranges still on the working list when the pass finished.
    pub residual: usize,
}

/// Working list of open lanes, borrowing its records from a [`RangePool`].
pub struct OpenLanes<'p> {
    pool: &'p mut RangePool,
    head: Option<RangeId>,
    stats: PackStats,
}

impl<'p> OpenLanes<'p> {
    pub fn new(pool: &'p mut RangePool) -> Self {
        Self {
            pool,
            head: None,
            stats: PackStats::default(),
        }
    }

    fn unlink(&mut self, id: RangeId) {
        let (prev, next) = {
            let r = self.pool.get(id);
            (r.prev, r.next)
        };
        match prev {
            Some(p) => self.pool.get_mut(p).next = next,
            None => self.head = next,
        }
        if let Some(n) = next {
            self.pool.get_mut(n).prev = prev;
        }
    }

    fn insert_before(&mut self, before: RangeId, id: RangeId) {
        let prev = self.pool.get(before).prev;
        {
            let r = self.pool.get_mut(id);
            r.prev = prev;
            r.next = Some(before);
        }
        self.pool.get_mut(before).prev = Some(id);
        match prev {
            Some(p) => self.pool.get_mut(p).next = Some(id),
            None => self.head = Some(id),
        }
    }

    fn append_after(&mut self, last: Option<RangeId>, id: RangeId) {
        {
            let r = self.pool.get_mut(id);
            r.prev = last;
            r.next = None;
        }
        match last {
            Some(l) => self.pool.get_mut(l).next = Some(id),
            None => self.head = Some(id),
        }
    }

    fn note_lane(&mut self, lane: u32) {
        let count = lane as usize + 1;
        if count > self.stats.lanes {
            self.stats.lanes = count;
        }
    }

    /// Put `span` in the lowest lane whose open range does not overlap it.
    pub fn place_by_overlap(&mut self, span: Span, width: f64) -> u32 {
        let new_range = self.pool.acquire();
        self.stats.features += 1;

        let mut lane = 0u32;
        let mut last = None;
        let mut cur = self.head;

        while let Some(id) = cur {
            let (r_span, r_lane, next) = {
                let r = self.pool.get(id);
                (r.span, r.lane, r.next)
            };

            if r_span.end < span.start {
                // occupant has ended: this lane is free from here on
                self.unlink(id);
                self.pool.release(id);
                cur = next;
                continue;
            }

            if lane < r_lane {
                break;
            }

            if lane == r_lane {
                self.stats.comparisons += 1;
                if r_span.overlaps(&span) {
                    lane += 1;
                }
            }

            last = Some(id);
            cur = next;
        }

        {
            let r = self.pool.get_mut(new_range);
            r.span = span;
            r.lane = lane;
            r.max_width_in_lane = width;
        }
        match cur {
            Some(before) => self.insert_before(before, new_range),
            None => self.append_after(last, new_range),
        }

        self.note_lane(lane);
        lane
    }

    /// Put every feature sharing `key` in one lane, opening a new lane for
    /// each key not seen before in this pass. Returns the lane and whether
    /// it was newly opened.
    pub fn place_by_group(&mut self, key: Option<GroupKey>, span: Span, width: f64) -> (u32, bool) {
        self.stats.features += 1;

        let mut last = None;
        let mut cur = self.head;
        while let Some(id) = cur {
            self.stats.comparisons += 1;
            let r = self.pool.get_mut(id);
            if r.group_key == key {
                r.span = r.span.union(&span);
                r.max_width_in_lane = r.max_width_in_lane.max(width);
                return (r.lane, false);
            }
            last = Some(id);
            cur = r.next;
        }

        let lane = match last {
            Some(l) => self.pool.get(l).lane + 1,
            None => 0,
        };
        let new_range = self.pool.acquire();
        {
            let r = self.pool.get_mut(new_range);
            r.span = span;
            r.lane = lane;
            r.group_key = key;
            r.max_width_in_lane = width;
        }
        self.append_after(last, new_range);
        self.note_lane(lane);
        (lane, true)
    }

    /// Lanes currently on the working list, in lane order.
    pub fn open_lanes(&self) -> Vec<u32> {
        let mut lanes = Vec::new();
        let mut cur = self.head;
        while let Some(id) = cur {
            let r = self.pool.get(id);
            lanes.push(r.lane);
            cur = r.next;
        }
        lanes
    }

    /// Give every remaining record back to the pool.
    pub fn finish(mut self) -> PackStats {
        let mut cur = self.head.take();
        while let Some(id) = cur {
            cur = self.pool.get(id).next;
            self.pool.release(id);
            self.stats.residual += 1;
        }
        self.stats
    }
}

/// Final geometry of one lane.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lane {
    pub index: u32,
    pub offset: f64,
    pub width: f64,
    pub group_key: Option<GroupKey>,
}

/// Per-lane widths gathered during a pass.
#[derive(Debug, Clone, Default)]
pub struct LaneTable {
    widths: Vec<f64>,
    groups: Vec<Option<GroupKey>>,
}

impl LaneTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure(&mut self, lane: u32) {
        let needed = lane as usize + 1;
        if self.widths.len() < needed {
            self.widths.resize(needed, 0.0);
            self.groups.resize(needed, None);
        }
    }

    /// Widen `lane` to at least `width`.
    pub fn record(&mut self, lane: u32, width: f64) {
        self.ensure(lane);
        let slot = &mut self.widths[lane as usize];
        if *slot < width {
            *slot = width;
        }
    }

    pub fn set_group(&mut self, lane: u32, key: Option<GroupKey>) {
        self.ensure(lane);
        self.groups[lane as usize] = key;
    }

    pub fn len(&self) -> usize {
        self.widths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }

    /// Offsets are a running sum of `width + spacing`; the total drops the
    /// spacing after the last lane.
    pub fn layout(&self, spacing: f64) -> (Vec<Lane>, f64) {
        let mut offset = 0.0;
        let lanes: Vec<Lane> = self
            .widths
            .iter()
            .zip(&self.groups)
            .enumerate()
            .map(|(i, (&width, &group_key))| {
                let lane = Lane {
                    index: i as u32,
                    offset,
                    width,
                    group_key,
                };
                offset += width + spacing;
                lane
            })
            .collect();

        let total = if lanes.is_empty() { 0.0 } else { offset - spacing };
        (lanes, total)
    }
}
