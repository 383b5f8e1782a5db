//! GPU plumbing shared by the scene renderer and the overlay.

pub mod gpu;
pub mod pass;

pub use gpu::GpuContext;
pub use pass::{ClearColor, FrameContext, render_frame};
