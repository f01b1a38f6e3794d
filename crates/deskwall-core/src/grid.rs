use serde::{Deserialize, Serialize};

/// Grid coordinate of one workspace in the wall: column `x`, row `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct CellCoord {
    pub x: i32,
    pub y: i32,
}

impl CellCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for CellCoord {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Number of workspace columns and rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridSize {
    pub width: i32,
    pub height: i32,
}

impl GridSize {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, cell: CellCoord) -> bool {
        cell.x >= 0 && cell.x < self.width && cell.y >= 0 && cell.y < self.height
    }

    pub fn cell_count(&self) -> usize {
        (self.width.max(0) as usize) * (self.height.max(0) as usize)
    }

    /// Every cell of the grid, column by column.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let height = self.height.max(0);
        (0..self.width.max(0)).flat_map(move |x| (0..height).map(move |y| CellCoord::new(x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_contains() {
        let grid = GridSize::new(3, 2);
        assert!(grid.contains(CellCoord::new(0, 0)));
        assert!(grid.contains(CellCoord::new(2, 1)));
        assert!(!grid.contains(CellCoord::new(3, 0)));
        assert!(!grid.contains(CellCoord::new(0, -1)));
    }

    #[test]
    fn test_grid_cells_cover_every_coordinate_once() {
        let grid = GridSize::new(3, 2);
        let cells: Vec<_> = grid.cells().collect();
        assert_eq!(cells.len(), grid.cell_count());
        assert_eq!(cells[0], CellCoord::new(0, 0));
        assert_eq!(cells[1], CellCoord::new(0, 1));
        assert_eq!(cells[5], CellCoord::new(2, 1));
    }

    #[test]
    fn test_degenerate_grid_is_empty() {
        assert_eq!(GridSize::new(0, 4).cells().count(), 0);
        assert_eq!(GridSize::new(-1, 4).cell_count(), 0);
    }
}
