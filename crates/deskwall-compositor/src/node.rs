//! The scene node that owns one content stream per workspace.

use std::cell::RefCell;
use std::collections::btree_map::IterMut;
use std::collections::BTreeMap;
use std::rc::Rc;

use deskwall_core::{
    scale_box, scale_region, CellCoord, DamageCallback, DamageTracker, GridSize, Rect, Region,
};
use uuid::Uuid;

use crate::config::WallConfig;
use crate::instruction::SessionId;
use crate::stream::{ContentStream, StreamFactory};

/// Cell-local damage reported by streams, waiting to be lifted. One merged
/// region per cell.
type ChildDamageQueue = Rc<RefCell<BTreeMap<CellCoord, Region>>>;

/// Lives exactly as long as one compositing session.
pub struct GridCompositorNode {
    session: SessionId,
    bounding_box: Rect,
    grid: GridSize,
    streams: BTreeMap<CellCoord, Box<dyn ContentStream>>,
    child_damage: ChildDamageQueue,
    damage: DamageTracker,
}

impl GridCompositorNode {
    /// Start a session: one stream for every cell of `grid`.
    pub fn new(bounding_box: Rect, grid: GridSize, factory: &mut dyn StreamFactory) -> Self {
        let mut node = Self {
            session: Uuid::new_v4(),
            bounding_box,
            grid,
            streams: BTreeMap::new(),
            child_damage: Rc::new(RefCell::new(BTreeMap::new())),
            damage: DamageTracker::new(bounding_box),
        };
        for cell in grid.cells() {
            node.spawn_stream(cell, factory);
        }
        log::info!(
            "Started wall session {} ({}x{} workspaces)",
            node.session,
            grid.width,
            grid.height
        );
        node
    }

    pub fn session_id(&self) -> SessionId {
        self.session
    }

    /// Fixed external geometry; independent of the viewport.
    pub fn bounding_box(&self) -> Rect {
        self.bounding_box
    }

    pub fn grid_size(&self) -> GridSize {
        self.grid
    }

    pub fn stream_count(&self) -> usize {
        self.streams.len()
    }

    pub fn stream_mut(&mut self, cell: CellCoord) -> Option<&mut (dyn ContentStream + 'static)> {
        self.streams.get_mut(&cell).map(|stream| stream.as_mut())
    }

    pub(crate) fn streams_mut(&mut self) -> IterMut<'_, CellCoord, Box<dyn ContentStream>> {
        self.streams.iter_mut()
    }

    /// Follow a change of the workspace grid. Streams of cells that remain in
    /// the grid keep running; only added cells get new streams.
    pub fn resize(&mut self, grid: GridSize, factory: &mut dyn StreamFactory) {
        if grid == self.grid {
            return;
        }
        let before = self.streams.len();
        self.streams.retain(|cell, _| grid.contains(*cell));
        let removed = before - self.streams.len();

        let missing: Vec<CellCoord> = grid
            .cells()
            .filter(|cell| !self.streams.contains_key(cell))
            .collect();
        for cell in &missing {
            self.spawn_stream(*cell, factory);
        }

        log::info!(
            "Wall session {} resized to {}x{}: {} streams removed, {} created",
            self.session,
            grid.width,
            grid.height,
            removed,
            missing.len()
        );
        self.grid = grid;
        self.damage.damage_all();
    }

    pub fn damage_all(&mut self) {
        self.damage.damage_all();
    }

    /// Project damage reported by a cell's stream into the node's space:
    /// cell-local → wall (cell origin) → bounding box (through the viewport).
    pub fn lift_cell_damage(&self, config: &WallConfig, cell: CellCoord, local: &Region) -> Region {
        let origin = config.cell_rectangle(cell).origin();
        let wall = local.translate(origin.x, origin.y);
        scale_region(config.viewport(), self.bounding_box, &wall)
    }

    /// All damage since the last call, in bounding-box coordinates.
    ///
    /// Damage reported by streams is held per cell until this is called; it
    /// is merged, so repeated reports of the same pixels do not pile up.
    pub fn take_damage(&mut self, config: &WallConfig) -> Region {
        let queued = std::mem::take(&mut *self.child_damage.borrow_mut());
        for (cell, local) in queued {
            if !self.streams.contains_key(&cell) {
                log::trace!("Dropping damage from removed workspace {:?}", cell);
                continue;
            }
            let lifted = self.lift_cell_damage(config, cell, &local);
            self.damage.damage_region(&lifted);
        }
        self.damage.take()
    }

    /// Forward the visible part of each cell, in cell-local coordinates, to
    /// its stream. `visible` is in bounding-box coordinates.
    pub fn compute_visibility(&mut self, config: &WallConfig, visible: &Region) {
        let viewport = config.viewport();
        for (cell, stream) in self.streams.iter_mut() {
            let cell_rect = config.cell_rectangle(*cell);
            let projected = scale_box(viewport, self.bounding_box, cell_rect);
            let on_output = visible.intersect_rect(&projected);
            let mut local = scale_region(projected, Rect::from_size(cell_rect.size()), &on_output);
            stream.compute_visibility(&mut local);
        }
    }

    fn spawn_stream(&mut self, cell: CellCoord, factory: &mut dyn StreamFactory) {
        let queue = Rc::clone(&self.child_damage);
        let on_damage: DamageCallback = Box::new(move |region: &Region| {
            if !region.is_empty() {
                queue.borrow_mut().entry(cell).or_default().union(region);
            }
        });
        let stream = factory.create_stream(cell, on_damage);
        log::debug!("Created content stream for workspace {:?}", cell);
        self.streams.insert(cell, stream);
    }
}

impl Drop for GridCompositorNode {
    fn drop(&mut self) {
        log::info!(
            "Stopped wall session {} ({} streams released)",
            self.session,
            self.streams.len()
        );
    }
}
