//! Interval index over the features of one column
//!
//! A skip list ordered by `(start, end)`. The leaf level is a doubly linked
//! list kept in an arena so that single inserts are cheap; the express levels
//! above it are sampled every [`SKIP`] nodes when the index is built.
//!
//! The index is meant to be built once and queried many times: `insert` only
//! touches the leaf level and never rebalances, bulk loads should go through
//! [`IntervalIndex::build`].

use crate::types::{GenomicPos, Interval, Span};

/// Express level sampling distance.
pub const SKIP: usize = 4;

#[derive(Debug, Clone)]
struct Leaf<T> {
    span: Span,
    payload: Option<T>,
    prev: Option<usize>,
    next: Option<usize>,
    /// Referenced from the lowest express level.
    pillar: bool,
}

#[derive(Debug, Clone, Copy)]
struct Express {
    leaf: usize,
    /// Position in the level below, or the leaf id for the lowest level.
    down: usize,
}

/// Position of one node in the leaf level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cursor(usize);

/// What `destroy` does with the payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadDisposal {
    /// Drop the payloads together with the nodes.
    Release,
    /// Hand the payloads back to the caller in index order.
    Retain,
}

#[derive(Debug, Clone)]
pub struct IntervalIndex<T> {
    leaves: Vec<Leaf<T>>,
    vacant: Vec<usize>,
    levels: Vec<Vec<Express>>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<T> Default for IntervalIndex<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> IntervalIndex<T> {
    pub fn new() -> Self {
        Self {
            leaves: Vec::new(),
            vacant: Vec::new(),
            levels: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// Build from unsorted items. Equal keys keep their input order.
    pub fn build<I>(items: I) -> Self
    where
        I: IntoIterator<Item = (Span, T)>,
    {
        let mut items: Vec<(Span, T)> = items.into_iter().collect();
        items.sort_by_key(|(span, _)| (span.start, span.end));

        let n = items.len();
        let mut leaves = Vec::with_capacity(n);
        for (i, (span, payload)) in items.into_iter().enumerate() {
            leaves.push(Leaf {
                span,
                payload: Some(payload),
                prev: i.checked_sub(1),
                next: if i + 1 < n { Some(i + 1) } else { None },
                pillar: false,
            });
        }

        let mut index = Self {
            leaves,
            vacant: Vec::new(),
            levels: Vec::new(),
            head: if n > 0 { Some(0) } else { None },
            tail: n.checked_sub(1),
            len: n,
        };
        index.build_levels();
        index
    }

    /// Build from items that know their own extent.
    pub fn build_from<I>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Interval,
    {
        Self::build(items.into_iter().map(|item| (item.span(), item)))
    }

    fn build_levels(&mut self) {
        for leaf in &mut self.leaves {
            leaf.pillar = false;
        }
        self.levels.clear();

        if self.len <= SKIP {
            return;
        }

        let mut lowest = Vec::with_capacity(self.len / SKIP + 1);
        let mut cur = self.head;
        let mut i = 0;
        while let Some(id) = cur {
            if i % SKIP == 0 {
                lowest.push(Express { leaf: id, down: id });
                self.leaves[id].pillar = true;
            }
            i += 1;
            cur = self.leaves[id].next;
        }

        let mut below_len = lowest.len();
        self.levels.push(lowest);

        while below_len > SKIP {
            let below = &self.levels[self.levels.len() - 1];
            let upper: Vec<Express> = below
                .iter()
                .enumerate()
                .step_by(SKIP)
                .map(|(pos, entry)| Express { leaf: entry.leaf, down: pos })
                .collect();
            below_len = upper.len();
            self.levels.push(upper);
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of express levels above the leaves.
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    pub fn first(&self) -> Option<Cursor> {
        self.head.map(Cursor)
    }

    pub fn last(&self) -> Option<Cursor> {
        self.tail.map(Cursor)
    }

    pub fn next(&self, cursor: Cursor) -> Option<Cursor> {
        self.leaves[cursor.0].next.map(Cursor)
    }

    pub fn prev(&self, cursor: Cursor) -> Option<Cursor> {
        self.leaves[cursor.0].prev.map(Cursor)
    }

    pub fn span(&self, cursor: Cursor) -> Span {
        self.leaves[cursor.0].span
    }

    pub fn get(&self, cursor: Cursor) -> Option<&T> {
        self.leaves.get(cursor.0).and_then(|leaf| leaf.payload.as_ref())
    }

    /// First leaf with `start >= key`, or `None` if every start is smaller.
    fn seek(&self, key: GenomicPos) -> Option<usize> {
        let mut leaf = self.head?;

        if !self.levels.is_empty() {
            let mut pos = 0;
            for depth in (0..self.levels.len()).rev() {
                let level = &self.levels[depth];
                while pos + 1 < level.len() && self.leaves[level[pos + 1].leaf].span.start < key {
                    pos += 1;
                }
                if depth == 0 {
                    leaf = level[pos].leaf;
                } else {
                    pos = level[pos].down;
                }
            }
        }

        // leaves inserted since the build may sit either side of the pillar
        while let Some(prev) = self.leaves[leaf].prev {
            if self.leaves[prev].span.start >= key {
                leaf = prev;
            } else {
                break;
            }
        }
        while self.leaves[leaf].span.start < key {
            leaf = self.leaves[leaf].next?;
        }
        Some(leaf)
    }

    /// Cursor at the first node with `start >= y`.
    ///
    /// When no node starts exactly at `y` the cursor is moved one node back
    /// so that callers walking forward do not miss a feature that begins
    /// before `y`. If nothing starts at or after `y` the last node is
    /// returned. An empty index gives `None`.
    pub fn find_first_at_or_after(&self, y: GenomicPos) -> Option<Cursor> {
        if self.is_empty() {
            return None;
        }
        match self.seek(y) {
            None => self.last(),
            Some(leaf) => {
                let node = &self.leaves[leaf];
                match node.prev {
                    Some(prev) if node.span.start != y => Some(Cursor(prev)),
                    _ => Some(Cursor(leaf)),
                }
            }
        }
    }

    /// Insert one node after every node with a key `<=` its own.
    pub fn insert(&mut self, span: Span, payload: T) -> Cursor {
        let key = (span.start, span.end);

        let after = match self.seek(span.start) {
            None => self.tail,
            Some(mut cur) => {
                let mut after = self.leaves[cur].prev;
                loop {
                    let s = self.leaves[cur].span;
                    if (s.start, s.end) > key {
                        break;
                    }
                    after = Some(cur);
                    match self.leaves[cur].next {
                        Some(next) => cur = next,
                        None => break,
                    }
                }
                after
            }
        };

        let next = match after {
            Some(a) => self.leaves[a].next,
            None => self.head,
        };

        let leaf = Leaf {
            span,
            payload: Some(payload),
            prev: after,
            next,
            pillar: false,
        };
        let id = match self.vacant.pop() {
            Some(slot) => {
                self.leaves[slot] = leaf;
                slot
            }
            None => {
                self.leaves.push(leaf);
                self.leaves.len() - 1
            }
        };

        match after {
            Some(a) => self.leaves[a].next = Some(id),
            None => self.head = Some(id),
        }
        match next {
            Some(n) => self.leaves[n].prev = Some(id),
            None => self.tail = Some(id),
        }
        self.len += 1;
        Cursor(id)
    }

    /// Unlink one node and return its payload.
    pub fn remove(&mut self, cursor: Cursor) -> Option<T> {
        let id = cursor.0;
        let payload = self.leaves.get_mut(id)?.payload.take()?;
        let (prev, next, pillar) = {
            let leaf = &self.leaves[id];
            (leaf.prev, leaf.next, leaf.pillar)
        };

        match prev {
            Some(p) => self.leaves[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.leaves[n].prev = prev,
            None => self.tail = prev,
        }

        let leaf = &mut self.leaves[id];
        leaf.prev = None;
        leaf.next = None;
        leaf.pillar = false;
        self.vacant.push(id);
        self.len -= 1;

        if pillar {
            self.build_levels();
        }
        Some(payload)
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter { index: self, cur: self.head }
    }

    pub fn iter_from(&self, cursor: Option<Cursor>) -> Iter<'_, T> {
        Iter { index: self, cur: cursor.map(|c| c.0) }
    }

    /// Tear the index down.
    pub fn destroy(self, disposal: PayloadDisposal) -> Vec<T> {
        match disposal {
            PayloadDisposal::Release => Vec::new(),
            PayloadDisposal::Retain => {
                let mut leaves = self.leaves;
                let mut out = Vec::with_capacity(self.len);
                let mut cur = self.head;
                while let Some(id) = cur {
                    cur = leaves[id].next;
                    if let Some(payload) = leaves[id].payload.take() {
                        out.push(payload);
                    }
                }
                out
            }
        }
    }
}

pub struct Iter<'a, T> {
    index: &'a IntervalIndex<T>,
    cur: Option<usize>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (Span, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cur?;
        let leaf = &self.index.leaves[id];
        self.cur = leaf.next;
        leaf.payload.as_ref().map(|payload| (leaf.span, payload))
    }
}
