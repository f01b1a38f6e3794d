//! Collaborators the wall drives but does not implement.

use deskwall_core::{CellCoord, Color, DamageCallback, GridSize, Rect, Region, Size};

use crate::instruction::RenderInstruction;
use crate::target::RenderTarget;

/// The rendered contents of a single workspace.
///
/// All coordinates a stream sees are cell-local: `{0, 0}` is the top-left
/// corner of its workspace and the sub-target geometry is the cell's size.
pub trait ContentStream {
    fn cell(&self) -> CellCoord;

    /// Append this stream's instructions. The stream removes from `damage`
    /// whatever it fully covers.
    fn schedule_instructions(
        &mut self,
        instructions: &mut Vec<RenderInstruction>,
        target: &RenderTarget,
        damage: &mut Region,
    );

    /// Execute one of this stream's own `CellContent` instructions.
    fn render(
        &mut self,
        target: &RenderTarget,
        region: &Region,
        payload: u64,
        backend: &mut dyn GpuBackend,
    );

    /// Narrow `visible` to what this stream leaves uncovered.
    fn compute_visibility(&mut self, visible: &mut Region);
}

/// Creates the content stream of a cell. The stream reports its damage in
/// cell-local coordinates through `on_damage`.
pub trait StreamFactory {
    fn create_stream(&mut self, cell: CellCoord, on_damage: DamageCallback)
        -> Box<dyn ContentStream>;
}

/// The output the wall is shown on.
pub trait WallOutput {
    /// Effective resolution; the size of one workspace cell.
    fn screen_size(&self) -> Size;
    /// The output's rectangle in the global layout; the node's bounding box.
    fn layout_geometry(&self) -> Rect;
    /// Current number of workspace columns and rows.
    fn grid_size(&self) -> GridSize;
}

/// Fixed output description, for hosts that track output changes themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticOutput {
    pub layout_geometry: Rect,
    pub grid: GridSize,
}

impl WallOutput for StaticOutput {
    fn screen_size(&self) -> Size {
        self.layout_geometry.size()
    }

    fn layout_geometry(&self) -> Rect {
        self.layout_geometry
    }

    fn grid_size(&self) -> GridSize {
        self.grid
    }
}

/// GPU primitives. Draw calls are only issued between `render_begin` and
/// `render_end`; boxes are framebuffer pixels.
pub trait GpuBackend {
    fn render_begin(&mut self, target: &RenderTarget);
    /// Restrict subsequent draws to `framebuffer_box`.
    fn scissor(&mut self, framebuffer_box: Rect);
    fn clear(&mut self, color: Color);
    fn fill_rect(&mut self, framebuffer_box: Rect, color: Color);
    fn render_end(&mut self);
}
