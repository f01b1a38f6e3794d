use rstar::{RTree, RTreeObject, AABB};

use crate::geometry::Rect;
use crate::grid::CellCoord;

/// An entry in the R-tree spatial index: one grid cell and its wall rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct CellEntry {
    pub cell: CellCoord,
    pub rect: Rect,
}

impl RTreeObject for CellEntry {
    type Envelope = AABB<[i32; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners([self.rect.x, self.rect.y], [self.rect.x2(), self.rect.y2()])
    }
}

/// Spatial index over the wall's cell rectangles, for viewport culling.
pub struct CellIndex {
    tree: RTree<CellEntry>,
}

impl CellIndex {
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Build the index from a list of cells. Cells with an empty rectangle
    /// can never be visible and are left out.
    pub fn build(entries: Vec<CellEntry>) -> Self {
        let entries: Vec<CellEntry> = entries.into_iter().filter(|e| !e.rect.is_empty()).collect();
        log::trace!("Indexing {} wall cells", entries.len());
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Cells whose rectangle shares a positive area with `viewport`, sorted
    /// by coordinate. Cells that only touch the viewport's edge are excluded.
    pub fn query_viewport(&self, viewport: &Rect) -> Vec<CellCoord> {
        if viewport.is_empty() {
            return Vec::new();
        }
        let envelope = AABB::from_corners([viewport.x, viewport.y], [viewport.x2(), viewport.y2()]);
        let mut cells: Vec<CellCoord> = self
            .tree
            .locate_in_envelope_intersecting(&envelope)
            .filter(|entry| entry.rect.intersects(viewport))
            .map(|entry| entry.cell)
            .collect();
        cells.sort();
        cells
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl std::fmt::Debug for CellIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CellIndex").field("len", &self.len()).finish()
    }
}

impl Default for CellIndex {
    fn default() -> Self {
        Self::new()
    }
}
