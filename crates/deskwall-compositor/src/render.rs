use deskwall_core::Color;

use crate::config::WallConfig;
use crate::instruction::{FrameEvent, FrameObserver, InstructionKind, RenderInstruction, SessionId};
use crate::node::GridCompositorNode;
use crate::options::WallStyle;
use crate::stream::GpuBackend;

/// Alpha of the black overlay for a brightness `value`: `1.0` leaves the
/// cell untouched, `0.0` blacks it out. Non-finite values draw nothing.
pub fn overlay_alpha(value: f32) -> f32 {
    if !value.is_finite() {
        return 0.0;
    }
    (1.0 - value).clamp(0.0, 1.0)
}

/// Executes scheduled instructions against a GPU backend.
pub struct RenderPass<'a> {
    pub config: &'a WallConfig,
    pub style: &'a WallStyle,
    pub session: SessionId,
    pub observers: &'a mut [FrameObserver],
}

impl RenderPass<'_> {
    /// Run `instructions` last-appended-first.
    pub fn execute(
        &mut self,
        node: &mut GridCompositorNode,
        instructions: &[RenderInstruction],
        backend: &mut dyn GpuBackend,
    ) {
        for instruction in instructions.iter().rev() {
            self.render(node, instruction, backend);
        }
    }

    pub fn render(
        &mut self,
        node: &mut GridCompositorNode,
        instruction: &RenderInstruction,
        backend: &mut dyn GpuBackend,
    ) {
        let target = &instruction.target;
        match &instruction.kind {
            InstructionKind::Background => {
                if instruction.damage.is_empty() {
                    return;
                }
                let color = self.style.background_color(
                    self.config.background_color(),
                    self.config.transparent_background(),
                );
                backend.render_begin(target);
                for rect in instruction.damage.iter() {
                    backend.scissor(target.framebuffer_box_from_geometry_box(*rect));
                    backend.clear(color);
                }
                backend.render_end();
            }
            InstructionKind::DimOverlay { value, .. } => {
                let alpha = overlay_alpha(*value);
                if instruction.damage.is_empty() || alpha <= 0.0 {
                    return;
                }
                let fb_region = target.framebuffer_region_from_geometry_region(&instruction.damage);
                let overlay = Color::BLACK.with_alpha(alpha);
                backend.render_begin(target);
                for rect in fb_region.iter() {
                    backend.scissor(*rect);
                    backend.fill_rect(target.framebuffer_box(), overlay);
                }
                backend.render_end();
            }
            InstructionKind::FrameEvent => {
                let event = FrameEvent {
                    session: self.session,
                    target: target.clone(),
                };
                for observer in self.observers.iter_mut() {
                    observer(&event);
                }
            }
            InstructionKind::CellContent { cell, payload } => match node.stream_mut(*cell) {
                Some(stream) => stream.render(target, &instruction.damage, *payload, backend),
                None => log::warn!("No content stream for workspace {:?}; skipping", cell),
            },
        }
    }
}
