use anyhow::Result;
use winit::dpi::PhysicalSize;

use cubelet_engine::core::{App, AppControl, FrameCtx, LoadCtx};
use cubelet_engine::paint::Color;
use cubelet_engine::render::cube::CubeRenderer;
use cubelet_engine::render::transform::{SceneParams, Transforms};
use cubelet_engine::time::FrameRate;

/// Background behind the cube (dark teal).
pub const CLEAR_COLOR: Color = Color::rgb(0.2, 0.3, 0.3);

/// The viewer: one cube, fixed camera, redrawn every frame.
pub struct CubeApp {
    params: SceneParams,
    aspect: f32,
    renderer: Option<CubeRenderer>,
    frame_rate: FrameRate,
}

impl CubeApp {
    pub fn new() -> Self {
        Self {
            params: SceneParams::default(),
            aspect: 1.0,
            renderer: None,
            frame_rate: FrameRate::new(5.0),
        }
    }

    /// Transforms uploaded this frame.
    fn transforms(&self) -> Transforms {
        Transforms::new(&self.params, self.aspect)
    }
}

impl Default for CubeApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Width over height; a minimized window keeps the previous aspect.
fn aspect_of(size: PhysicalSize<u32>, previous: f32) -> f32 {
    if size.width == 0 || size.height == 0 {
        previous
    } else {
        size.width as f32 / size.height as f32
    }
}

impl App for CubeApp {
    fn on_load(&mut self, ctx: &LoadCtx<'_>) -> Result<()> {
        self.aspect = ctx.viewport.aspect();
        self.renderer = Some(CubeRenderer::new(ctx)?);
        log::info!("cube loaded");
        Ok(())
    }

    fn on_resize(&mut self, size: PhysicalSize<u32>) {
        self.aspect = aspect_of(size, self.aspect);
        log::debug!("resized to {}x{}", size.width, size.height);
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if let Some(fps) = self.frame_rate.record(&ctx.time) {
            log::debug!("frame {}: {fps:.1} fps", ctx.time.frame_index);
        }

        let Some(renderer) = self.renderer.as_ref() else {
            log::warn!("frame requested without loaded resources");
            return AppControl::Continue;
        };

        let transforms = self.transforms();
        ctx.render(CLEAR_COLOR, |rctx, target| {
            renderer.render(rctx, target, &transforms);
        })
    }

    fn on_unload(&mut self) {
        if let Some(renderer) = self.renderer.take() {
            renderer.release();
        }
        log::info!("cube unloaded");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_app_has_no_device_resources() {
        let app = CubeApp::new();
        assert!(app.renderer.is_none());
        assert_eq!(app.params, SceneParams::default());
    }

    #[test]
    fn aspect_tracks_window_size() {
        assert_eq!(aspect_of(PhysicalSize::new(800, 600), 1.0), 800.0 / 600.0);
        assert_eq!(aspect_of(PhysicalSize::new(600, 600), 2.0), 1.0);
    }

    #[test]
    fn minimized_window_keeps_previous_aspect() {
        assert_eq!(aspect_of(PhysicalSize::new(0, 0), 1.5), 1.5);
        assert_eq!(aspect_of(PhysicalSize::new(800, 0), 1.5), 1.5);
    }

    #[test]
    fn transforms_are_stable_across_frames() {
        let mut app = CubeApp::new();
        app.on_resize(PhysicalSize::new(1024, 768));
        assert_eq!(app.transforms(), app.transforms());
        assert_eq!(app.transforms(), Transforms::new(&SceneParams::default(), 1024.0 / 768.0));
    }

    #[test]
    fn unload_without_load_is_harmless() {
        let mut app = CubeApp::new();
        app.on_unload();
        assert!(app.renderer.is_none());
    }

    #[test]
    fn clear_color_differs_from_cube_color() {
        assert_ne!(CLEAR_COLOR.to_rgb_array(), Color::RED.to_rgb_array());
    }
}
