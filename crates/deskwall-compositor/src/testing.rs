//! Recording fakes for the wall's collaborators.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use deskwall_core::{CellCoord, Color, DamageCallback, GridSize, Rect, Region};

use crate::instruction::{InstructionKind, RenderInstruction};
use crate::stream::{ContentStream, GpuBackend, StreamFactory};
use crate::target::RenderTarget;

/// Payload every recording stream tags its instruction with.
pub const STREAM_PAYLOAD: u64 = 7;

#[derive(Default)]
struct Shared {
    created: Vec<CellCoord>,
    callbacks: BTreeMap<CellCoord, DamageCallback>,
    visibility: BTreeMap<CellCoord, Region>,
    scheduled: Vec<(CellCoord, RenderTarget, Region)>,
    rendered: Vec<(CellCoord, u64, Region)>,
}

#[derive(Default, Clone)]
pub struct RecordingFactory {
    shared: Rc<RefCell<Shared>>,
}

impl RecordingFactory {
    pub fn created(&self) -> Vec<CellCoord> {
        self.shared.borrow().created.clone()
    }

    /// Report damage as the stream of `cell` would.
    pub fn emit_damage(&self, cell: CellCoord, region: Region) {
        let callback = self.shared.borrow_mut().callbacks.remove(&cell);
        if let Some(mut callback) = callback {
            callback(&region);
            self.shared.borrow_mut().callbacks.insert(cell, callback);
        }
    }

    pub fn visibility(&self, cell: CellCoord) -> Option<Region> {
        self.shared.borrow().visibility.get(&cell).cloned()
    }

    pub fn scheduled(&self) -> Vec<(CellCoord, RenderTarget, Region)> {
        self.shared.borrow().scheduled.clone()
    }

    pub fn rendered(&self) -> Vec<(CellCoord, u64, Region)> {
        self.shared.borrow().rendered.clone()
    }
}

impl StreamFactory for RecordingFactory {
    fn create_stream(
        &mut self,
        cell: CellCoord,
        on_damage: DamageCallback,
    ) -> Box<dyn ContentStream> {
        let mut shared = self.shared.borrow_mut();
        shared.created.push(cell);
        shared.callbacks.insert(cell, on_damage);
        Box::new(RecordingStream {
            cell,
            shared: Rc::clone(&self.shared),
        })
    }
}

struct RecordingStream {
    cell: CellCoord,
    shared: Rc<RefCell<Shared>>,
}

impl ContentStream for RecordingStream {
    fn cell(&self) -> CellCoord {
        self.cell
    }

    fn schedule_instructions(
        &mut self,
        instructions: &mut Vec<RenderInstruction>,
        target: &RenderTarget,
        damage: &mut Region,
    ) {
        self.shared
            .borrow_mut()
            .scheduled
            .push((self.cell, target.clone(), damage.clone()));
        instructions.push(RenderInstruction::new(
            target.clone(),
            damage.clone(),
            InstructionKind::CellContent {
                cell: self.cell,
                payload: STREAM_PAYLOAD,
            },
        ));
        damage.clear();
    }

    fn render(
        &mut self,
        _target: &RenderTarget,
        region: &Region,
        payload: u64,
        _backend: &mut dyn GpuBackend,
    ) {
        self.shared
            .borrow_mut()
            .rendered
            .push((self.cell, payload, region.clone()));
    }

    fn compute_visibility(&mut self, visible: &mut Region) {
        self.shared
            .borrow_mut()
            .visibility
            .insert(self.cell, visible.clone());
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GpuOp {
    Begin(Rect),
    Scissor(Rect),
    Clear(Color),
    Fill(Rect, Color),
    End,
}

#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub ops: Vec<GpuOp>,
}

impl GpuBackend for RecordingBackend {
    fn render_begin(&mut self, target: &RenderTarget) {
        self.ops.push(GpuOp::Begin(target.framebuffer_box()));
    }

    fn scissor(&mut self, framebuffer_box: Rect) {
        self.ops.push(GpuOp::Scissor(framebuffer_box));
    }

    fn clear(&mut self, color: Color) {
        self.ops.push(GpuOp::Clear(color));
    }

    fn fill_rect(&mut self, framebuffer_box: Rect, color: Color) {
        self.ops.push(GpuOp::Fill(framebuffer_box, color));
    }

    fn render_end(&mut self) {
        self.ops.push(GpuOp::End);
    }
}

/// 100x100 output at the layout origin.
pub fn output(grid: GridSize) -> crate::stream::StaticOutput {
    crate::stream::StaticOutput {
        layout_geometry: Rect::new(0, 0, 100, 100),
        grid,
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
