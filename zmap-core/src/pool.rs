//! Free-list allocator for packing ranges
//!
//! Bumping runs on every redraw over tens to hundreds of thousands of
//! features, so the bookkeeping records are recycled through a free list
//! instead of being allocated per feature. The slab grows a chunk at a time
//! and is never shrunk; the number of live records is bounded by the number
//! of concurrently open lanes, not by the number of features.

use crate::types::{GroupKey, Span};

/// Records added to the slab each time the free list runs dry.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Handle to a record in a [`RangePool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RangeId(u32);

impl RangeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// One lane's currently open interval during a packing pass.
///
/// `prev`/`next` link the record into the packer's open-lane list while it
/// is live and into the pool's free list (`next` only) once released.
#[derive(Debug, Clone, Default)]
pub struct PackingRange {
    pub span: Span,
    pub lane: u32,
    pub group_key: Option<GroupKey>,
    pub max_width_in_lane: f64,
    pub(crate) prev: Option<RangeId>,
    pub(crate) next: Option<RangeId>,
    in_use: bool,
}

#[derive(Debug)]
pub struct RangePool {
    slab: Vec<PackingRange>,
    free: Option<RangeId>,
    chunk_size: usize,
    chunks: usize,
    in_use: usize,
}

impl Default for RangePool {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }
}

impl RangePool {
    pub fn new(chunk_size: usize) -> Self {
        Self {
            slab: Vec::new(),
            free: None,
            chunk_size: chunk_size.max(1),
            chunks: 0,
            in_use: 0,
        }
    }

    /// Add a chunk and return the head of the refilled free list.
    fn grow(&mut self) -> RangeId {
        let base = self.slab.len();
        self.slab.reserve_exact(self.chunk_size);
        self.slab.resize_with(base + self.chunk_size, PackingRange::default);

        // thread the new records onto the free list, lowest index first out
        for i in (base..base + self.chunk_size).rev() {
            self.slab[i].next = self.free;
            self.free = Some(RangeId(i as u32));
        }
        self.chunks += 1;
        log::trace!("range pool grown to {} records", self.slab.len());
        RangeId(base as u32)
    }

    /// Hand out a zeroed record.
    pub fn acquire(&mut self) -> RangeId {
        let id = match self.free {
            Some(id) => id,
            None => self.grow(),
        };
        let record = &mut self.slab[id.index()];
        self.free = record.next;
        *record = PackingRange::default();
        record.in_use = true;
        self.in_use += 1;
        id
    }

    /// Return a record to the free list.
    pub fn release(&mut self, id: RangeId) {
        let free = self.free;
        let record = &mut self.slab[id.index()];
        debug_assert!(record.in_use, "packing range {:?} released twice", id);
        record.in_use = false;
        record.prev = None;
        record.next = free;
        self.free = Some(id);
        self.in_use = self.in_use.saturating_sub(1);
    }

    pub fn get(&self, id: RangeId) -> &PackingRange {
        &self.slab[id.index()]
    }

    pub fn get_mut(&mut self, id: RangeId) -> &mut PackingRange {
        &mut self.slab[id.index()]
    }

    /// Total records ever allocated.
    pub fn capacity(&self) -> usize {
        self.slab.len()
    }

    pub fn in_use(&self) -> usize {
        self.in_use
    }

    pub fn chunks(&self) -> usize {
        self.chunks
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }
}
