//! Turns one frame's damage into ordered render instructions.
//!
//! Instructions are executed last-appended-first. Per cell, the dim overlay is
//! appended before the stream's own instructions so it ends up on top of the
//! cell's content, and the background is appended after every cell so it is
//! drawn first, beneath everything.

use deskwall_core::{scale_box, Rect, Region};

use crate::config::WallConfig;
use crate::instruction::{InstructionKind, RenderInstruction};
use crate::node::GridCompositorNode;
use crate::target::RenderTarget;

pub struct InstructionScheduler<'a> {
    config: &'a WallConfig,
}

impl<'a> InstructionScheduler<'a> {
    pub fn new(config: &'a WallConfig) -> Self {
        Self { config }
    }

    /// Schedule one frame.
    ///
    /// `damage` is in the node's bounding-box coordinates, the same space as
    /// `target.geometry`. Every damaged pixel inside the bounding box goes to
    /// exactly one place: the first cell whose projection covers it, or the
    /// background. That part is removed from `damage` before returning.
    ///
    /// A cell is handed the smallest cell-local region whose drawing reaches
    /// every framebuffer pixel assigned to it, so nothing assigned to a cell
    /// is left undrawn at fractional zoom levels.
    pub fn schedule(
        &self,
        node: &mut GridCompositorNode,
        instructions: &mut Vec<RenderInstruction>,
        target: &RenderTarget,
        damage: &mut Region,
    ) {
        instructions.push(RenderInstruction::new(
            target.clone(),
            Region::new(),
            InstructionKind::FrameEvent,
        ));

        let bbox = node.bounding_box();
        let viewport = self.config.viewport();
        if viewport.is_empty() {
            log::trace!("Scheduling wall session {} with an empty viewport", node.session_id());
        }

        // Damage not yet handed to any cell; what is left is background.
        let mut remaining = damage.intersect_rect(&bbox);

        for (cell, stream) in node.streams_mut() {
            let cell_rect = self.config.cell_rectangle(*cell);
            let projected = scale_box(viewport, target.geometry, cell_rect);
            let cell_target = self.cell_target(target, cell_rect, projected);

            let on_output = remaining.intersect_rect(&projected);
            remaining.subtract(&on_output);

            let pixels = target
                .framebuffer_region_from_geometry_region(&on_output)
                .intersect_rect(&cell_target.framebuffer_box());
            let mut local_damage = cell_target.geometry_region_covering(&pixels);

            instructions.push(RenderInstruction::new(
                cell_target.clone(),
                local_damage.clone(),
                InstructionKind::DimOverlay {
                    cell: *cell,
                    value: self.config.dim(*cell),
                },
            ));
            stream.schedule_instructions(instructions, &cell_target, &mut local_damage);
        }

        instructions.push(RenderInstruction::new(
            target.clone(),
            remaining,
            InstructionKind::Background,
        ));
        damage.subtract_rect(&bbox);
    }

    /// Sub-target for one cell: the framebuffer pixels its projection covers,
    /// showing the cell in cell-local coordinates.
    fn cell_target(&self, target: &RenderTarget, cell_rect: Rect, projected: Rect) -> RenderTarget {
        let pixels = target.framebuffer_box_from_geometry_box(projected);
        target.subtarget(Rect::from_size(cell_rect.size()), pixels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::WallOptions;
    use crate::testing::{RecordingFactory, STREAM_PAYLOAD};
    use deskwall_core::{CellCoord, GridSize, Size};

    const BBOX: Rect = Rect {
        x: 0,
        y: 0,
        width: 100,
        height: 100,
    };

    fn setup(grid: GridSize, gap: i32) -> (WallConfig, GridCompositorNode, RecordingFactory) {
        let options = WallOptions {
            gap_size: gap,
            ..Default::default()
        };
        let config = WallConfig::new(grid, Size::new(100, 100), &options);
        let mut factory = RecordingFactory::default();
        let node = GridCompositorNode::new(BBOX, grid, &mut factory);
        (config, node, factory)
    }

    fn target() -> RenderTarget {
        RenderTarget::new(1, BBOX, Size::new(100, 100))
    }

    fn schedule(
        config: &WallConfig,
        node: &mut GridCompositorNode,
        damage: &mut Region,
    ) -> Vec<RenderInstruction> {
        let mut instructions = Vec::new();
        InstructionScheduler::new(config).schedule(node, &mut instructions, &target(), damage);
        instructions
    }

    /// Framebuffer pixels drawn by the background, and by each cell. A cell's
    /// dim overlay covers the same pixels as its content.
    fn drawn_pixels(instructions: &[RenderInstruction]) -> (Region, Vec<Region>) {
        let mut background = Region::new();
        let mut cells = Vec::new();
        for instruction in instructions {
            let pixels = instruction
                .target
                .framebuffer_region_from_geometry_region(&instruction.damage);
            match instruction.kind {
                InstructionKind::Background => background.union(&pixels),
                InstructionKind::DimOverlay { .. } => cells.push(pixels),
                _ => {}
            }
        }
        (background, cells)
    }

    /// Every damaged pixel is drawn, and the background never clears a pixel
    /// a cell draws.
    fn assert_pixels_partitioned(target: &RenderTarget, original: &Region, instructions: &[RenderInstruction]) {
        let (background, cells) = drawn_pixels(instructions);
        let mut missing = target.framebuffer_region_from_geometry_region(original);
        missing.subtract(&background);
        for cell in &cells {
            missing.subtract(cell);
            assert_eq!(background.intersect(cell).area(), 0, "background overlaps a cell");
        }
        assert!(missing.is_empty(), "pixels never drawn: {:?}", missing);
    }

    #[test]
    fn test_instruction_order() {
        let (config, mut node, _factory) = setup(GridSize::new(2, 1), 0);
        let mut damage = Region::from(BBOX);
        let instructions = schedule(&config, &mut node, &mut damage);

        let kinds: Vec<InstructionKind> = instructions.iter().map(|i| i.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                InstructionKind::FrameEvent,
                InstructionKind::DimOverlay {
                    cell: CellCoord::new(0, 0),
                    value: 1.0
                },
                InstructionKind::CellContent {
                    cell: CellCoord::new(0, 0),
                    payload: STREAM_PAYLOAD
                },
                InstructionKind::DimOverlay {
                    cell: CellCoord::new(1, 0),
                    value: 1.0
                },
                InstructionKind::CellContent {
                    cell: CellCoord::new(1, 0),
                    payload: STREAM_PAYLOAD
                },
                InstructionKind::Background,
            ]
        );
        assert!(damage.is_empty());
    }

    #[test]
    fn test_frame_event_without_damage() {
        let (config, mut node, _factory) = setup(GridSize::new(2, 2), 10);
        let mut damage = Region::new();
        let instructions = schedule(&config, &mut node, &mut damage);
        assert_eq!(instructions[0].kind, InstructionKind::FrameEvent);
        assert_eq!(instructions[0].target, target());
        assert!(instructions.iter().all(|i| i.damage.is_empty()));
    }

    #[test]
    fn test_single_workspace_viewport() {
        let (mut config, mut node, factory) = setup(GridSize::new(2, 2), 10);
        config.set_viewport(config.cell_rectangle(CellCoord::new(1, 1)));
        let mut damage = Region::from(Rect::new(10, 20, 30, 40));
        let instructions = schedule(&config, &mut node, &mut damage);

        let scheduled = factory.scheduled();
        let (_, cell_target, cell_damage) = scheduled
            .iter()
            .find(|(cell, _, _)| *cell == CellCoord::new(1, 1))
            .unwrap();
        assert_eq!(cell_target.geometry, Rect::new(0, 0, 100, 100));
        assert_eq!(cell_target.subbuffer, Some(Rect::new(0, 0, 100, 100)));
        assert_eq!(cell_damage, &Region::from(Rect::new(10, 20, 30, 40)));

        let background = instructions.last().unwrap();
        assert_eq!(background.kind, InstructionKind::Background);
        assert!(background.damage.is_empty());
    }

    #[test]
    fn test_damage_is_partitioned_at_whole_wall_scale() {
        let (mut config, mut node, _factory) = setup(GridSize::new(2, 2), 10);
        // 1:1 viewport over the gap between all four workspaces.
        config.set_viewport(Rect::new(60, 60, 100, 100));
        let original = Region::from(BBOX);
        let mut damage = original.clone();
        let instructions = schedule(&config, &mut node, &mut damage);

        assert_pixels_partitioned(&target(), &original, &instructions);
        // Only the cross-shaped gap is left for the background.
        let background = &instructions.last().unwrap().damage;
        assert_eq!(background.area(), 10 * 100 + 10 * 100 - 10 * 10);
    }

    #[test]
    fn test_damage_is_partitioned_when_zoomed_in() {
        let (mut config, mut node, _factory) = setup(GridSize::new(2, 1), 10);
        // 50x50 of wall stretched over the 100x100 output, straddling the gap.
        config.set_viewport(Rect::new(80, 20, 50, 50));
        let original = Region::from_rects([Rect::new(0, 0, 70, 30), Rect::new(30, 50, 70, 50)]);
        let mut damage = original.clone();
        let instructions = schedule(&config, &mut node, &mut damage);
        assert_pixels_partitioned(&target(), &original, &instructions);
    }

    #[test]
    fn test_drawn_pixels_cover_damage_at_fractional_zoom() {
        let viewports = [
            Rect::new(80, 20, 30, 30),
            Rect::new(83, 7, 37, 41),
            Rect::new(95, 0, 23, 23),
            Rect::new(-3, -3, 117, 117),
            Rect::new(50, 13, 77, 61),
        ];
        for viewport in viewports {
            let (mut config, mut node, _factory) = setup(GridSize::new(2, 1), 10);
            config.set_viewport(viewport);
            let original = Region::from(BBOX);
            let mut damage = original.clone();
            let instructions = schedule(&config, &mut node, &mut damage);
            assert_pixels_partitioned(&target(), &original, &instructions);
        }
    }

    #[test]
    fn test_drawn_pixels_cover_damage_on_scaled_framebuffer() {
        // Output rendered at 2.5x into its framebuffer.
        let scaled = RenderTarget::new(1, BBOX, Size::new(250, 250));
        for viewport in [Rect::new(83, 7, 37, 41), Rect::new(-7, -7, 328, 328)] {
            let (mut config, mut node, _factory) = setup(GridSize::new(3, 3), 7);
            config.set_viewport(viewport);
            let original = Region::from_rects([Rect::new(3, 3, 61, 17), Rect::new(40, 40, 60, 60)]);
            let mut damage = original.clone();
            let mut instructions = Vec::new();
            InstructionScheduler::new(&config).schedule(&mut node, &mut instructions, &scaled, &mut damage);
            assert_pixels_partitioned(&scaled, &original, &instructions);
        }
    }

    #[test]
    fn test_zoomed_out_wall_is_partitioned() {
        let (config, mut node, _factory) = setup(GridSize::new(3, 3), 7);
        let original = Region::from_rects([Rect::new(3, 3, 61, 17), Rect::new(40, 40, 60, 60)]);
        let mut damage = original.clone();
        let instructions = schedule(&config, &mut node, &mut damage);
        assert_pixels_partitioned(&target(), &original, &instructions);
    }

    #[test]
    fn test_damage_outside_bounding_box_is_left_to_caller() {
        let (config, mut node, _factory) = setup(GridSize::new(1, 1), 0);
        let mut damage = Region::from_rects([Rect::new(50, 50, 100, 100)]);
        schedule(&config, &mut node, &mut damage);
        assert_eq!(
            damage,
            Region::from_rects([Rect::new(100, 50, 50, 100), Rect::new(50, 100, 50, 50)])
        );
    }

    #[test]
    fn test_empty_viewport_sends_everything_to_background() {
        let (mut config, mut node, factory) = setup(GridSize::new(2, 2), 10);
        config.set_viewport(Rect::new(0, 0, 0, 0));
        let mut damage = Region::from(BBOX);
        let instructions = schedule(&config, &mut node, &mut damage);

        assert!(factory.scheduled().iter().all(|(_, _, d)| d.is_empty()));
        assert_eq!(instructions.last().unwrap().damage, Region::from(BBOX));
    }

    #[test]
    fn test_dim_value_is_carried() {
        let (mut config, mut node, _factory) = setup(GridSize::new(2, 1), 0);
        config.set_dim(CellCoord::new(1, 0), 0.25);
        let mut damage = Region::from(BBOX);
        let instructions = schedule(&config, &mut node, &mut damage);
        assert!(instructions.iter().any(|i| i.kind
            == InstructionKind::DimOverlay {
                cell: CellCoord::new(1, 0),
                value: 0.25
            }));
    }
}
