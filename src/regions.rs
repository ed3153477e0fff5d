//! Union-find arena of merged regions.
//!
//! Regions are addressed by [`RegionId`] handles into flat vectors, so merging
//! never builds a pointer graph. `find` uses path halving and `union` merges by
//! rank, which keeps every operation effectively constant time.

/// Handle to a region record in a [`RegionArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegionId(usize);

/// Disjoint-set forest where every root carries a representative payload
#[derive(Debug, Clone, Default)]
pub struct RegionArena {
    parent: Vec<usize>,
    rank: Vec<u8>,
    /// Representative sample index, meaningful only at roots
    representative: Vec<usize>,
    live: usize,
}

impl RegionArena {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            parent: Vec::with_capacity(capacity),
            rank: Vec::with_capacity(capacity),
            representative: Vec::with_capacity(capacity),
            live: 0,
        }
    }

    /// Open a singleton region owned by `representative`
    pub fn open(&mut self, representative: usize) -> RegionId {
        let id = self.parent.len();
        self.parent.push(id);
        self.rank.push(0);
        self.representative.push(representative);
        self.live += 1;
        RegionId(id)
    }

    /// Root of the region containing `id`
    pub fn find(&mut self, id: RegionId) -> RegionId {
        let mut x = id.0;
        while self.parent[x] != x {
            let grandparent = self.parent[self.parent[x]];
            self.parent[x] = grandparent;
            x = grandparent;
        }
        RegionId(x)
    }

    /// Representative of the region containing `id`
    pub fn representative(&mut self, id: RegionId) -> usize {
        let root = self.find(id);
        self.representative[root.0]
    }

    /// Merge the regions of `a` and `b`; the merged root takes `representative`.
    ///
    /// Returns the surviving root. Merging a region with itself is a no-op.
    pub fn union(&mut self, a: RegionId, b: RegionId, representative: usize) -> RegionId {
        let ra = self.find(a).0;
        let rb = self.find(b).0;
        if ra == rb {
            self.representative[ra] = representative;
            return RegionId(ra);
        }

        let (root, child) = match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => (rb, ra),
            std::cmp::Ordering::Greater => (ra, rb),
            std::cmp::Ordering::Equal => {
                self.rank[ra] = self.rank[ra].saturating_add(1);
                (ra, rb)
            }
        };
        self.parent[child] = root;
        self.representative[root] = representative;
        self.live -= 1;
        RegionId(root)
    }

    /// Number of regions not yet merged into another
    #[inline]
    pub fn live_regions(&self) -> usize {
        self.live
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }
}
