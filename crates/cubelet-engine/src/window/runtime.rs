use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App as CoreApp, AppControl, FrameCtx, LoadCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::time::FrameClock;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "cubelet".to_string(),
            initial_size: LogicalSize::new(800.0, 600.0),
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window and blocks until it is closed.
    ///
    /// Returns the error that stopped the loop, if any (window/GPU creation
    /// or `App::on_load` failure).
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        state.finish()
    }
}

#[self_referencing]
struct WindowEntry {
    clock: FrameClock,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    entry: Option<WindowEntry>,
    loaded: bool,
    error: Option<anyhow::Error>,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app,
            entry: None,
            loaded: false,
            error: None,
        }
    }

    fn create_window_entry(&self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();

        WindowEntryTryBuilder {
            clock: FrameClock::default(),
            window,
            gpu_builder: |w| {
                pollster::block_on(Gpu::new(w, gpu_init))
                    .context("GPU initialization failed for window")
            },
        }
        .try_build()
    }

    /// Creates the window and GPU, then runs `App::on_load`.
    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let entry = self.create_window_entry(event_loop)?;

        entry.with_gpu(|gpu| self.load_with(|app| app.on_load(&LoadCtx::from_gpu(gpu))))?;

        entry.with_window(|w| w.request_redraw());
        self.entry = Some(entry);

        log::info!("window \"{}\" ready", self.config.title);
        Ok(())
    }

    /// Runs `load` against the app; only a successful load arms `on_unload`.
    fn load_with<F>(&mut self, load: F) -> Result<()>
    where
        F: FnOnce(&mut A) -> Result<()>,
    {
        load(&mut self.app).context("application failed to load")?;
        self.loaded = true;
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        self.record_failure(err);
        event_loop.exit();
    }

    /// Keeps the error for `Runtime::run` and tears down what was built.
    fn record_failure(&mut self, err: anyhow::Error) {
        log::error!("{err:#}");
        self.error = Some(err);
        self.teardown();
    }

    /// Outcome of the loop: the first recorded failure, if any.
    fn finish(mut self) -> Result<()> {
        match self.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Unloads the app (once) and releases the GPU before the window.
    fn teardown(&mut self) {
        if self.loaded {
            self.loaded = false;
            self.app.on_unload();
            log::debug!("application unloaded");
        }

        // ouroboros drops the borrowing `gpu` field before `window`.
        self.entry = None;
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        self.teardown();
        event_loop.exit();
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        let Some(entry) = self.entry.as_mut() else { return };

        entry.with_mut(|fields| {
            fields.gpu.resize(size);
            fields.clock.reset();
            fields.window.request_redraw();
        });

        self.app.on_resize(size);
    }

    fn redraw(&mut self) -> AppControl {
        if !self.loaded {
            return AppControl::Continue;
        }

        let (app, entry) = (&mut self.app, &mut self.entry);
        let Some(entry) = entry.as_mut() else {
            return AppControl::Continue;
        };

        entry.with_mut(|fields| {
            let mut ctx = FrameCtx {
                window: WindowCtx {
                    window: fields.window,
                },
                gpu: fields.gpu,
                time: fields.clock.tick(),
            };

            app.on_frame(&mut ctx)
        })
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            return;
        }

        if let Err(e) = self.start(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);

        // The scene is static, but the program redraws it every frame while
        // visible. A minimized surface never presents, so FIFO would not
        // throttle the loop; `Resized` requests the next redraw instead.
        let Some(entry) = self.entry.as_ref() else { return };
        if redraw_wanted(self.loaded, entry.with_gpu(|gpu| gpu.is_presentable())) {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let is_ours = self
            .entry
            .as_ref()
            .is_some_and(|e| e.with_window(|w| w.id()) == window_id);
        if !is_ours {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                log::info!("close requested");
                self.shutdown(event_loop);
            }

            WindowEvent::Resized(new_size) => self.resize(new_size),

            WindowEvent::ScaleFactorChanged { .. } => {
                let new_size = self
                    .entry
                    .as_ref()
                    .map(|e| e.with_window(|w| w.inner_size()));
                if let Some(size) = new_size {
                    self.resize(size);
                }
            }

            WindowEvent::RedrawRequested => {
                if self.redraw() == AppControl::Exit {
                    self.shutdown(event_loop);
                }
            }

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.teardown();
    }
}

/// Continuous redraw is requested only for a loaded app on a visible surface.
fn redraw_wanted(loaded: bool, presentable: bool) -> bool {
    loaded && presentable
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingApp {
        loads: u32,
        frames: u32,
        unloads: u32,
    }

    impl CoreApp for CountingApp {
        fn on_load(&mut self, _ctx: &LoadCtx<'_>) -> Result<()> {
            self.loads += 1;
            Ok(())
        }

        fn on_frame(&mut self, _ctx: &mut FrameCtx<'_, '_>) -> AppControl {
            self.frames += 1;
            AppControl::Continue
        }

        fn on_unload(&mut self) {
            self.unloads += 1;
        }
    }

    fn state() -> AppState<CountingApp> {
        AppState::new(RuntimeConfig::default(), GpuInit::default(), CountingApp::default())
    }

    #[test]
    fn close_then_exiting_unloads_once() {
        let mut st = state();
        st.load_with(|_| Ok(())).unwrap();
        assert!(st.loaded);

        // `CloseRequested` tears down, then winit calls `exiting`.
        st.teardown();
        st.teardown();

        assert_eq!(st.app.unloads, 1);
        assert!(!st.loaded);
    }

    #[test]
    fn failed_load_never_unloads() {
        let mut st = state();
        let err = st
            .load_with(|_| Err(anyhow::anyhow!("pipeline rejected")))
            .unwrap_err();
        assert!(!st.loaded);

        st.record_failure(err);
        st.teardown();

        assert_eq!(st.app.unloads, 0);
    }

    #[test]
    fn no_frame_before_load() {
        let mut st = state();
        assert_eq!(st.redraw(), AppControl::Continue);
        assert_eq!(st.app.frames, 0);
    }

    #[test]
    fn no_frame_after_unload() {
        let mut st = state();
        st.load_with(|_| Ok(())).unwrap();
        st.teardown();
        assert_eq!(st.redraw(), AppControl::Continue);
        assert_eq!(st.app.frames, 0);
    }

    #[test]
    fn load_error_is_returned_from_run() {
        let mut st = state();
        let err = st
            .load_with(|_| Err(anyhow::anyhow!("pipeline rejected")))
            .unwrap_err();
        st.record_failure(err);

        let msg = format!("{:#}", st.finish().unwrap_err());
        assert!(msg.contains("application failed to load"), "{msg}");
        assert!(msg.contains("pipeline rejected"), "{msg}");
    }

    #[test]
    fn clean_run_returns_ok() {
        let mut st = state();
        st.load_with(|_| Ok(())).unwrap();
        st.teardown();
        assert!(st.finish().is_ok());
    }

    #[test]
    fn minimized_surface_does_not_request_redraws() {
        assert!(redraw_wanted(true, true));
        assert!(!redraw_wanted(true, false));
        assert!(!redraw_wanted(false, true));
    }
}
