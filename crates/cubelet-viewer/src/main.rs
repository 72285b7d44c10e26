//! cubelet-viewer: opens a window and draws one red cube at a fixed rotation.

mod cube_app;

use anyhow::Result;

use cubelet_engine::device::GpuInit;
use cubelet_engine::logging::{LoggingConfig, init_logging};
use cubelet_engine::window::{Runtime, RuntimeConfig};

use cube_app::CubeApp;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    log::info!("cubelet-viewer {}", env!("CARGO_PKG_VERSION"));

    Runtime::run(RuntimeConfig::default(), GpuInit::default(), CubeApp::new())
}
