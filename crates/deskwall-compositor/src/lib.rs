//! # Deskwall Compositor
//!
//! Composes every workspace of an output into one grid, the "wall", and shows
//! it through a movable viewport. The host drives it one frame at a time:
//!
//! 1. [`WorkspaceWall::take_damage`] collects what changed since the last frame.
//! 2. [`WorkspaceWall::schedule_instructions`] turns that damage into ordered
//!    [`RenderInstruction`]s: background, per-workspace content and dim overlays.
//! 3. [`WorkspaceWall::render`] executes them against a [`GpuBackend`].
//!
//! Workspace contents are supplied by [`ContentStream`]s, one per cell, created
//! through the host's [`StreamFactory`] when a session starts.

pub mod config;
pub mod instruction;
pub mod node;
pub mod options;
pub mod render;
pub mod scheduler;
pub mod stream;
pub mod target;
pub mod wall;

#[cfg(test)]
mod testing;

pub use config::WallConfig;
pub use instruction::{FrameEvent, FrameObserver, InstructionKind, RenderInstruction, SessionId};
pub use node::GridCompositorNode;
pub use options::{OptionsError, TransparencyPolicy, WallOptions, WallPreset, WallStyle};
pub use render::{overlay_alpha, RenderPass};
pub use scheduler::InstructionScheduler;
pub use stream::{ContentStream, GpuBackend, StaticOutput, StreamFactory, WallOutput};
pub use target::RenderTarget;
pub use wall::WorkspaceWall;
