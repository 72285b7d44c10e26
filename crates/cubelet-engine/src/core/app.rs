use anyhow::Result;
use winit::dpi::PhysicalSize;

use super::ctx::{FrameCtx, LoadCtx};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application lifecycle driven by the runtime.
///
/// Call order for one window:
/// `on_load` once, then any interleaving of `on_resize` and `on_frame`,
/// then `on_unload` once. If `on_load` fails neither `on_frame` nor
/// `on_unload` is called.
pub trait App {
    /// Called once after the GPU device exists and before the first frame.
    ///
    /// Device resources (buffers, shaders, pipelines) are created here.
    fn on_load(&mut self, ctx: &LoadCtx<'_>) -> Result<()>;

    /// Called after the surface was resized to `size` (physical pixels).
    fn on_resize(&mut self, size: PhysicalSize<u32>) {
        let _ = size;
    }

    /// Called once per rendered frame.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Called once before the GPU device is dropped.
    fn on_unload(&mut self) {}
}
