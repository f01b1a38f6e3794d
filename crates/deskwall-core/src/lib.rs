//! # Deskwall Core
//!
//! Integer geometry for the workspace-wall compositor: rectangles and pixel
//! regions, the box transform used to move damage between coordinate spaces,
//! damage accumulation, grid coordinates, and an R-tree index over the cells
//! of the wall.
//!
//! Everything here is a total function over well-formed integer rectangles.

pub mod color;
pub mod damage;
pub mod geometry;
pub mod grid;
pub mod region;
pub mod spatial;
pub mod transform;

pub use color::Color;
pub use damage::{DamageCallback, DamageTracker};
pub use geometry::{Point, Rect, Size};
pub use grid::{CellCoord, GridSize};
pub use region::Region;
pub use spatial::{CellEntry, CellIndex};
pub use transform::{cover_box, cover_region, scale_box, scale_region};
