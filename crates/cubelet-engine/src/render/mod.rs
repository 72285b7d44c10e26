//! GPU rendering subsystem.
//!
//! Everything needed to put the one cube on screen: fixed geometry, the
//! model/view/projection transforms, the WGSL shader and its compile-log
//! helper, and the renderer owning the device handles.
//!
//! Convention:
//! - right-handed world space, +Y up, camera looking down -Z
//! - clip-space depth in [0, 1] (wgpu)

mod ctx;
pub mod cube;
pub mod mesh;
pub mod shader;
pub mod transform;

pub use ctx::{RenderCtx, RenderTarget};
