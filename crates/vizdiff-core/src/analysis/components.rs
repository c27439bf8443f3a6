use std::collections::BTreeMap;

use ndarray::Array2;

use super::regions::BoundingBox;

/// A 4-connected group of set pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Component {
    pub area: usize,
    pub bbox: BoundingBox,
}

/// Pixel extent grown one pixel at a time.
#[derive(Clone, Copy, Debug)]
pub(super) struct Extent {
    top: usize,
    bottom: usize,
    left: usize,
    right: usize,
    area: usize,
}

impl Extent {
    pub(super) fn at(row: usize, col: usize) -> Self {
        Self {
            top: row,
            bottom: row,
            left: col,
            right: col,
            area: 1,
        }
    }

    pub(super) fn include(&mut self, row: usize, col: usize) {
        self.top = self.top.min(row);
        self.bottom = self.bottom.max(row);
        self.left = self.left.min(col);
        self.right = self.right.max(col);
        self.area += 1;
    }

    pub(super) fn bbox(&self) -> BoundingBox {
        BoundingBox {
            x: self.left as u32,
            y: self.top as u32,
            width: (self.right - self.left + 1) as u32,
            height: (self.bottom - self.top + 1) as u32,
        }
    }
}

/// Disjoint-set forest over flat pixel indices (path halving, union by size).
struct PixelSets {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl PixelSets {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            size: vec![1; len],
        }
    }

    fn root(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    fn join(&mut self, a: usize, b: usize) {
        let (mut ra, mut rb) = (self.root(a), self.root(b));
        if ra == rb {
            return;
        }
        if self.size[ra] < self.size[rb] {
            std::mem::swap(&mut ra, &mut rb);
        }
        self.parent[rb] = ra;
        self.size[ra] += self.size[rb];
    }
}

/// Label the 4-connected groups of `true` pixels in `mask`.
///
/// Largest first; equal areas are ordered by bounding box (top, then left).
pub fn label_components(mask: &Array2<bool>) -> Vec<Component> {
    let (h, w) = mask.dim();
    let mut sets = PixelSets::new(h * w);

    for ((row, col), &on) in mask.indexed_iter() {
        if !on {
            continue;
        }
        let idx = row * w + col;
        if col > 0 && mask[[row, col - 1]] {
            sets.join(idx, idx - 1);
        }
        if row > 0 && mask[[row - 1, col]] {
            sets.join(idx, idx - w);
        }
    }

    let mut extents: BTreeMap<usize, Extent> = BTreeMap::new();
    for ((row, col), &on) in mask.indexed_iter() {
        if !on {
            continue;
        }
        extents
            .entry(sets.root(row * w + col))
            .and_modify(|e| e.include(row, col))
            .or_insert_with(|| Extent::at(row, col));
    }

    let mut components: Vec<Component> = extents
        .values()
        .map(|e| Component {
            area: e.area,
            bbox: e.bbox(),
        })
        .collect();
    components.sort_by(|a, b| {
        b.area
            .cmp(&a.area)
            .then(a.bbox.y.cmp(&b.bbox.y))
            .then(a.bbox.x.cmp(&b.bbox.x))
    });
    components
}
