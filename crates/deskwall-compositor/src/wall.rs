//! The workspace wall as seen by the hosting plugin.

use deskwall_core::{CellCoord, Color, GridSize, Rect, Region};

use crate::config::WallConfig;
use crate::instruction::{FrameEvent, FrameObserver, RenderInstruction, SessionId};
use crate::node::GridCompositorNode;
use crate::options::{WallOptions, WallStyle};
use crate::render::RenderPass;
use crate::scheduler::InstructionScheduler;
use crate::stream::{GpuBackend, StreamFactory, WallOutput};
use crate::target::RenderTarget;

/// Shows every workspace of an output side by side, in a grid, through a
/// movable viewport.
///
/// Configuration can change at any time between frames. While a session is
/// active every change damages the whole bounding box.
pub struct WorkspaceWall {
    output: Box<dyn WallOutput>,
    factory: Box<dyn StreamFactory>,
    config: WallConfig,
    style: WallStyle,
    node: Option<GridCompositorNode>,
    frame_observers: Vec<FrameObserver>,
}

impl WorkspaceWall {
    pub fn new(
        output: Box<dyn WallOutput>,
        factory: Box<dyn StreamFactory>,
        options: &WallOptions,
    ) -> Self {
        let config = WallConfig::new(output.grid_size(), output.screen_size(), options);
        log::debug!(
            "Created workspace wall for {:?} ({}x{} workspaces)",
            output.layout_geometry(),
            config.grid_size().width,
            config.grid_size().height
        );
        Self {
            output,
            factory,
            config,
            style: options.style(),
            node: None,
            frame_observers: Vec::new(),
        }
    }

    pub fn config(&self) -> &WallConfig {
        &self.config
    }

    pub fn style(&self) -> &WallStyle {
        &self.style
    }

    // ========== Configuration ==========

    pub fn set_background_color(&mut self, color: Color) {
        self.config.set_background_color(color);
        self.damage_all();
    }

    pub fn set_gap_size(&mut self, gap: i32) {
        self.config.set_gap_size(gap);
        self.damage_all();
    }

    pub fn set_transparent_background(&mut self, transparent: bool) {
        self.config.set_transparent_background(transparent);
        self.damage_all();
    }

    pub fn set_style(&mut self, style: WallStyle) {
        self.style = style;
        self.damage_all();
    }

    /// Apply a whole set of options at once.
    pub fn apply_options(&mut self, options: &WallOptions) {
        self.config.set_gap_size(options.gap_size);
        self.config.set_background_color(options.background_color);
        self.config.set_transparent_background(options.transparent_background);
        self.style = options.style();
        self.damage_all();
    }

    /// Panning or zooming moves every cell, so the whole output is damaged.
    pub fn set_viewport(&mut self, viewport: Rect) {
        self.config.set_viewport(viewport);
        self.damage_all();
    }

    pub fn viewport(&self) -> Rect {
        self.config.viewport()
    }

    pub fn set_dim(&mut self, cell: CellCoord, value: f32) {
        self.config.set_dim(cell, value);
        self.damage_all();
    }

    pub fn dim(&self, cell: CellCoord) -> f32 {
        self.config.dim(cell)
    }

    pub fn cell_rectangle(&self, cell: CellCoord) -> Rect {
        self.config.cell_rectangle(cell)
    }

    pub fn wall_rectangle(&self) -> Rect {
        self.config.wall_rectangle()
    }

    pub fn visible_cells(&self, viewport: &Rect) -> Vec<CellCoord> {
        self.config.visible_cells(viewport)
    }

    /// Follow a change of the number of workspaces. Streams of cells that
    /// stay in the grid keep running. Dim entries of removed cells are kept
    /// until [`WallConfig::prune_dims`] is called through [`Self::prune_dims`].
    pub fn resize_grid(&mut self, grid: GridSize) {
        if grid == self.config.grid_size() {
            return;
        }
        self.config.set_grid_size(grid);
        if let Some(node) = self.node.as_mut() {
            node.resize(grid, self.factory.as_mut());
        }
    }

    /// Re-read the grid size from the output.
    pub fn sync_grid_size(&mut self) {
        let grid = self.output.grid_size();
        self.resize_grid(grid);
    }

    pub fn prune_dims(&mut self) -> usize {
        let removed = self.config.prune_dims();
        if removed > 0 {
            log::debug!("Pruned {} dim entries outside the workspace grid", removed);
        }
        removed
    }

    // ========== Session lifecycle ==========

    /// Create a content stream for every workspace. The first frame of a
    /// session redraws the whole bounding box.
    ///
    /// # Panics
    ///
    /// If a session is already active.
    pub fn start_session(&mut self) {
        assert!(
            self.node.is_none(),
            "start_session called while a wall session is already active"
        );
        let mut node = GridCompositorNode::new(
            self.output.layout_geometry(),
            self.config.grid_size(),
            self.factory.as_mut(),
        );
        node.damage_all();
        self.node = Some(node);
    }

    /// Release every content stream. With `reset_viewport` the viewport
    /// becomes empty, which leaves no cell visible.
    pub fn stop_session(&mut self, reset_viewport: bool) {
        if reset_viewport {
            self.config.set_viewport(Rect::new(0, 0, 0, 0));
        }
        if self.node.take().is_none() {
            log::debug!("stop_session called without an active wall session");
        }
    }

    pub fn is_active(&self) -> bool {
        self.node.is_some()
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.node.as_ref().map(|node| node.session_id())
    }

    /// The node's fixed geometry: the output's layout rectangle.
    pub fn bounding_box(&self) -> Rect {
        self.output.layout_geometry()
    }

    // ========== Frame ==========

    /// Register a callback invoked once per composed frame.
    pub fn connect_frame<F>(&mut self, observer: F)
    where
        F: FnMut(&FrameEvent) + 'static,
    {
        self.frame_observers.push(Box::new(observer));
    }

    /// Damage accumulated since the last call, in bounding-box coordinates.
    /// Empty when no session is active.
    pub fn take_damage(&mut self) -> Region {
        match self.node.as_mut() {
            Some(node) => node.take_damage(&self.config),
            None => Region::new(),
        }
    }

    /// # Panics
    ///
    /// If no session is active.
    pub fn schedule_instructions(
        &mut self,
        instructions: &mut Vec<RenderInstruction>,
        target: &RenderTarget,
        damage: &mut Region,
    ) {
        let node = active_node(&mut self.node, "schedule_instructions");
        InstructionScheduler::new(&self.config).schedule(node, instructions, target, damage);
    }

    /// Execute `instructions` as scheduled by [`Self::schedule_instructions`].
    ///
    /// # Panics
    ///
    /// If no session is active.
    pub fn render(&mut self, instructions: &[RenderInstruction], backend: &mut dyn GpuBackend) {
        let node = active_node(&mut self.node, "render");
        let mut pass = RenderPass {
            config: &self.config,
            style: &self.style,
            session: node.session_id(),
            observers: &mut self.frame_observers,
        };
        pass.execute(node, instructions, backend);
    }

    /// # Panics
    ///
    /// If no session is active.
    pub fn compute_visibility(&mut self, visible: &Region) {
        let node = active_node(&mut self.node, "compute_visibility");
        node.compute_visibility(&self.config, visible);
    }

    fn damage_all(&mut self) {
        if let Some(node) = self.node.as_mut() {
            node.damage_all();
        }
    }
}

fn active_node<'a>(
    node: &'a mut Option<GridCompositorNode>,
    operation: &str,
) -> &'a mut GridCompositorNode {
    match node.as_mut() {
        Some(node) => node,
        None => panic!("{} called without an active wall session", operation),
    }
}

impl Drop for WorkspaceWall {
    fn drop(&mut self) {
        if self.is_active() {
            self.stop_session(false);
        }
    }
}
