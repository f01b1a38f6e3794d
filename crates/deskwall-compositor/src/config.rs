use std::collections::HashMap;

use deskwall_core::{CellCoord, CellEntry, CellIndex, Color, GridSize, Rect, Size};

use crate::options::WallOptions;

/// Brightness of a cell that was never dimmed.
pub const FULL_BRIGHTNESS: f32 = 1.0;

/// Geometry and styling state of the wall. Pure state: it never renders and
/// never damages anything by itself.
///
/// A workspace with coordinates `(i, j)` occupies
/// `{ i * (cellW + gap), j * (cellH + gap), cellW, cellH }` in wall space; the
/// wall rectangle adds a one-gap border around the whole grid.
#[derive(Debug)]
pub struct WallConfig {
    grid: GridSize,
    cell_size: Size,
    gap_size: i32,
    background_color: Color,
    transparent_background: bool,
    viewport: Rect,
    /// Entries for cells outside the grid are kept but never read.
    dim: HashMap<CellCoord, f32>,
    index: CellIndex,
}

impl WallConfig {
    /// The viewport starts out showing the whole wall.
    pub fn new(grid: GridSize, cell_size: Size, options: &WallOptions) -> Self {
        let mut config = Self {
            grid,
            cell_size,
            gap_size: options.gap_size.max(0),
            background_color: options.background_color,
            transparent_background: options.transparent_background,
            viewport: Rect::default(),
            dim: HashMap::new(),
            index: CellIndex::new(),
        };
        config.rebuild_index();
        config.viewport = config.wall_rectangle();
        config
    }

    // ── Styling ──────────────────────────────────────────────────────

    pub fn set_gap_size(&mut self, gap: i32) {
        debug_assert!(gap >= 0, "gap size must not be negative");
        self.gap_size = gap.max(0);
        self.rebuild_index();
    }

    pub fn set_background_color(&mut self, color: Color) {
        self.background_color = color;
    }

    pub fn set_transparent_background(&mut self, transparent: bool) {
        self.transparent_background = transparent;
    }

    pub fn gap_size(&self) -> i32 {
        self.gap_size
    }

    pub fn background_color(&self) -> Color {
        self.background_color
    }

    pub fn transparent_background(&self) -> bool {
        self.transparent_background
    }

    // ── Viewport & dimming ───────────────────────────────────────────

    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Non-finite values are ignored and leave the previous factor in place.
    pub fn set_dim(&mut self, cell: CellCoord, value: f32) {
        if !value.is_finite() {
            log::warn!("Ignoring non-finite dim value {} for workspace {:?}", value, cell);
            return;
        }
        self.dim.insert(cell, value);
    }

    /// Brightness factor for `cell`; `1.0` unless set. Out-of-grid entries
    /// read as full brightness.
    pub fn dim(&self, cell: CellCoord) -> f32 {
        if !self.grid.contains(cell) {
            return FULL_BRIGHTNESS;
        }
        self.dim.get(&cell).copied().unwrap_or(FULL_BRIGHTNESS)
    }

    /// Drop dim entries for cells outside the current grid. Returns how many
    /// were removed.
    pub fn prune_dims(&mut self) -> usize {
        let grid = self.grid;
        let before = self.dim.len();
        self.dim.retain(|cell, _| grid.contains(*cell));
        before - self.dim.len()
    }

    pub fn dim_entry_count(&self) -> usize {
        self.dim.len()
    }

    // ── Grid geometry ────────────────────────────────────────────────

    pub fn set_grid_size(&mut self, grid: GridSize) {
        self.grid = grid;
        self.rebuild_index();
    }

    pub fn set_cell_size(&mut self, cell_size: Size) {
        self.cell_size = cell_size;
        self.rebuild_index();
    }

    pub fn grid_size(&self) -> GridSize {
        self.grid
    }

    pub fn cell_size(&self) -> Size {
        self.cell_size
    }

    pub fn cell_rectangle(&self, cell: CellCoord) -> Rect {
        Rect::new(
            cell.x * (self.cell_size.width + self.gap_size),
            cell.y * (self.cell_size.height + self.gap_size),
            self.cell_size.width,
            self.cell_size.height,
        )
    }

    pub fn wall_rectangle(&self) -> Rect {
        Rect::new(
            -self.gap_size,
            -self.gap_size,
            self.grid.width * (self.cell_size.width + self.gap_size) + self.gap_size,
            self.grid.height * (self.cell_size.height + self.gap_size) + self.gap_size,
        )
    }

    /// Cells whose rectangle overlaps `viewport` with a positive area.
    pub fn visible_cells(&self, viewport: &Rect) -> Vec<CellCoord> {
        self.index.query_viewport(viewport)
    }

    fn rebuild_index(&mut self) {
        let entries = self
            .grid
            .cells()
            .map(|cell| CellEntry {
                cell,
                rect: self.cell_rectangle(cell),
            })
            .collect();
        self.index = CellIndex::build(entries);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_2x2() -> WallConfig {
        let options = WallOptions {
            gap_size: 10,
            ..Default::default()
        };
        WallConfig::new(GridSize::new(2, 2), Size::new(100, 100), &options)
    }

    #[test]
    fn test_reference_geometry() {
        let config = config_2x2();
        assert_eq!(config.wall_rectangle(), Rect::new(-10, -10, 220, 220));
        assert_eq!(
            config.cell_rectangle(CellCoord::new(1, 1)),
            Rect::new(110, 110, 100, 100)
        );
        assert_eq!(config.viewport(), config.wall_rectangle());
    }

    #[test]
    fn test_cell_rectangles_are_disjoint() {
        for gap in [0, 1, 7, 40] {
            let options = WallOptions {
                gap_size: gap,
                ..Default::default()
            };
            let config = WallConfig::new(GridSize::new(3, 4), Size::new(64, 48), &options);
            let rects: Vec<Rect> = config
                .grid_size()
                .cells()
                .map(|c| config.cell_rectangle(c))
                .collect();
            for (i, a) in rects.iter().enumerate() {
                for b in &rects[i + 1..] {
                    assert!(!a.intersects(b), "gap {gap}: {a:?} overlaps {b:?}");
                }
            }
        }
    }

    #[test]
    fn test_whole_wall_sees_every_cell() {
        let config = config_2x2();
        let visible = config.visible_cells(&config.wall_rectangle());
        assert_eq!(visible.len(), 4);
    }

    #[test]
    fn test_visible_cells_in_gap_only() {
        let config = config_2x2();
        assert!(config.visible_cells(&Rect::new(100, 0, 10, 210)).is_empty());
        assert_eq!(
            config.visible_cells(&Rect::new(105, 105, 10, 10)),
            vec![CellCoord::new(1, 1)]
        );
    }

    #[test]
    fn test_empty_viewport_has_no_visible_cells() {
        let config = config_2x2();
        assert!(config.visible_cells(&Rect::new(0, 0, 0, 0)).is_empty());
    }

    #[test]
    fn test_dim_defaults_to_full_brightness() {
        let mut config = config_2x2();
        config.set_dim(CellCoord::new(0, 0), 0.5);
        assert_eq!(config.dim(CellCoord::new(0, 0)), 0.5);
        assert_eq!(config.dim(CellCoord::new(1, 1)), 1.0);
    }

    #[test]
    fn test_non_finite_dim_is_ignored() {
        let mut config = WallConfig::new(GridSize::new(2, 2), Size::new(100, 100), &WallOptions::default());
        config.set_dim(CellCoord::new(0, 0), f32::NAN);
        assert_eq!(config.dim(CellCoord::new(0, 0)), 1.0);
        assert_eq!(config.dim_entry_count(), 0);

        config.set_dim(CellCoord::new(0, 0), 0.5);
        config.set_dim(CellCoord::new(0, 0), f32::INFINITY);
        assert_eq!(config.dim(CellCoord::new(0, 0)), 0.5);
    }

    #[test]
    fn test_out_of_range_dim_is_inert_until_pruned() {
        let mut config = config_2x2();
        config.set_dim(CellCoord::new(5, 0), 0.2);
        assert_eq!(config.dim(CellCoord::new(5, 0)), 1.0);

        config.set_grid_size(GridSize::new(6, 1));
        assert_eq!(config.dim(CellCoord::new(5, 0)), 0.2);

        config.set_grid_size(GridSize::new(2, 2));
        assert_eq!(config.dim_entry_count(), 1);
        assert_eq!(config.prune_dims(), 1);
        assert_eq!(config.dim_entry_count(), 0);
    }

    #[test]
    fn test_gap_change_moves_cells() {
        let mut config = config_2x2();
        config.set_gap_size(0);
        assert_eq!(
            config.cell_rectangle(CellCoord::new(1, 0)),
            Rect::new(100, 0, 100, 100)
        );
        assert_eq!(
            config.visible_cells(&Rect::new(100, 0, 10, 10)),
            vec![CellCoord::new(1, 0)]
        );
    }
}
