//! Damage accumulation for a node with a fixed bounding box.
//!
//! Damage is collected between frames and handed to the scene graph in one
//! piece. Everything is clipped to the node's bounds, so a zoomed-in cell
//! whose projection overflows the output cannot report pixels the node does
//! not own.

use crate::geometry::Rect;
use crate::region::Region;

/// Callback through which a content stream reports damage in its own space.
pub type DamageCallback = Box<dyn FnMut(&Region)>;

#[derive(Debug, Clone, Default)]
pub struct DamageTracker {
    bounds: Rect,
    pending: Region,
}

impl DamageTracker {
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            pending: Region::new(),
        }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
        self.pending = self.pending.intersect_rect(&bounds);
    }

    /// Damage the whole bounding box.
    pub fn damage_all(&mut self) {
        self.pending = Region::from(self.bounds);
    }

    /// Add damage. Returns `false` when nothing inside the bounds was added.
    pub fn damage_region(&mut self, region: &Region) -> bool {
        let clipped = region.intersect_rect(&self.bounds);
        if clipped.is_empty() {
            return false;
        }
        self.pending.union(&clipped);
        true
    }

    pub fn damage_rect(&mut self, rect: Rect) -> bool {
        self.damage_region(&Region::from(rect))
    }

    pub fn is_dirty(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn pending(&self) -> &Region {
        &self.pending
    }

    /// Hand out the accumulated damage and start a new frame.
    pub fn take(&mut self) -> Region {
        std::mem::take(&mut self.pending)
    }
}
