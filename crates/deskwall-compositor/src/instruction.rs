use deskwall_core::{CellCoord, Region};
use uuid::Uuid;

use crate::target::RenderTarget;

/// Identifies one compositing session, from start to stop.
pub type SessionId = Uuid;

#[derive(Debug, Clone, PartialEq)]
pub enum InstructionKind {
    /// Clear the damage to the background color.
    Background,
    /// Drawn by the content stream of `cell`; `payload` is private to it.
    CellContent { cell: CellCoord, payload: u64 },
    /// Black overlay with alpha `1 - value` over the cell.
    DimOverlay { cell: CellCoord, value: f32 },
    /// Per-frame notification; draws nothing.
    FrameEvent,
}

/// One unit of scheduled work.
///
/// Instructions are built fresh every frame. The render pass executes them in
/// reverse order of appending: the first one appended is drawn last, on top.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderInstruction {
    pub target: RenderTarget,
    /// Region to draw, in `target.geometry` coordinates.
    pub damage: Region,
    pub kind: InstructionKind,
}

impl RenderInstruction {
    pub fn new(target: RenderTarget, damage: Region, kind: InstructionKind) -> Self {
        Self {
            target,
            damage,
            kind,
        }
    }
}

/// Delivered to frame observers once per composed frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameEvent {
    pub session: SessionId,
    pub target: RenderTarget,
}

pub type FrameObserver = Box<dyn FnMut(&FrameEvent)>;
