//! The engine lifecycle: `init`, then `frame` while `is_running`, then `finish`.
//!
//! winit normally owns the main loop. Here the event loop is pumped once per
//! [`Engine::frame`] instead, so the caller drives the loop and decides when
//! to stop.
//!
//! ```no_run
//! use nostalgia::{config::Config, engine::Engine};
//!
//! let mut engine = Engine::new(Config::from_env())?;
//! engine.init()?;
//! while engine.is_running() {
//!     engine.frame();
//! }
//! engine.finish();
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::time::Duration;

use anyhow::{bail, Context as _};
use instant::Instant;
use tokio::runtime::Runtime;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::WindowId,
};

use crate::{config::Config, context::Context, render::Scene};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Lifecycle {
    Uninitialized,
    Initialized,
    Finished,
}

/// Everything that exists between a successful `init` and `finish`.
#[derive(Debug)]
struct Renderer {
    // The scene holds GPU objects of the context's device, so it goes first.
    scene: Scene,
    ctx: Context,
}

impl Renderer {
    fn new(event_loop: &ActiveEventLoop, config: &Config, runtime: &Runtime) -> anyhow::Result<Self> {
        let ctx = Context::new(event_loop, config, runtime)?;
        let scene = Scene::new(
            &ctx.device,
            &ctx.queue,
            runtime,
            ctx.config.format,
            (ctx.config.width, ctx.config.height),
            config,
        )?;
        Ok(Self { scene, ctx })
    }

    fn frame(&mut self, time: f32, clear_colour: wgpu::Color) {
        self.scene.write_time(&self.ctx.queue, time);
        match self.scene.render(&self.ctx, clear_colour) {
            Ok(()) => {}
            // Reconfigure the surface if it's lost or outdated
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::error!("Surface lost or outdated, reconfiguring");
                self.ctx.reconfigure();
            }
            Err(e) => {
                log::error!("Unable to render {}", e);
            }
        }
        // Lets the device report errors and run completion callbacks.
        if let Err(e) = self.ctx.device.poll(wgpu::PollType::Poll) {
            log::error!("Device poll failed: {}", e);
        }
    }

    fn finish(self) {
        let Self { scene, ctx } = self;
        log::info!("Releasing scene resources");
        drop(scene);
        log::info!("Releasing device and window");
        drop(ctx);
    }
}

struct App {
    config: Config,
    runtime: Runtime,
    renderer: Option<Renderer>,
    init_error: Option<anyhow::Error>,
    close_requested: bool,
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.is_some() || self.init_error.is_some() {
            return;
        }
        match Renderer::new(event_loop, &self.config, &self.runtime) {
            Ok(renderer) => self.renderer = Some(renderer),
            Err(e) => {
                self.init_error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested");
                self.close_requested = true;
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.ctx.resize(size.width, size.height);
                }
            }
            _ => {}
        }
    }
}

pub struct Engine {
    // The event loop drops after the app, i.e. after the window.
    app: App,
    event_loop: EventLoop<()>,
    lifecycle: Lifecycle,
    started: Instant,
}

impl Engine {
    /// Set up the windowing system. No window or GPU object exists before
    /// [`init`](Self::init).
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let event_loop = EventLoop::new().context("could not start the windowing system")?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("could not start the async runtime")?;
        Ok(Self {
            app: App {
                config,
                runtime,
                renderer: None,
                init_error: None,
                close_requested: false,
            },
            event_loop,
            lifecycle: Lifecycle::Uninitialized,
            started: Instant::now(),
        })
    }

    /**
     * Open the window and create every GPU resource.
     *
     * Steps run in order: window and device, swapchain, render pipeline,
     * textures, geometry, buffers, bindings. The first failing step aborts
     * initialization and its error names the step. Resources created by
     * earlier steps are released before this returns.
     */
    pub fn init(&mut self) -> anyhow::Result<()> {
        if self.lifecycle != Lifecycle::Uninitialized {
            bail!("engine is {:?}, it can only be initialized once", self.lifecycle);
        }
        // The window is created once the event loop resumes.
        loop {
            let status = self
                .event_loop
                .pump_app_events(Some(Duration::ZERO), &mut self.app);
            if let Some(e) = self.app.init_error.take() {
                return Err(e);
            }
            if self.app.renderer.is_some() {
                break;
            }
            if let PumpStatus::Exit(code) = status {
                bail!("event loop exited with code {} before the window opened", code);
            }
        }
        self.lifecycle = Lifecycle::Initialized;
        self.started = Instant::now();
        log::info!("Initialized");
        Ok(())
    }

    /// True after a successful `init` until the window is asked to close.
    pub fn is_running(&self) -> bool {
        self.lifecycle == Lifecycle::Initialized && !self.app.close_requested
    }

    /// Process pending window events, then draw one frame.
    pub fn frame(&mut self) {
        if self.lifecycle != Lifecycle::Initialized {
            return;
        }
        let status = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.app);
        if let PumpStatus::Exit(_) = status {
            self.app.close_requested = true;
        }
        if self.app.close_requested {
            return;
        }
        let time = self.started.elapsed().as_secs_f32();
        let clear_colour = self.app.config.clear_colour;
        if let Some(renderer) = &mut self.app.renderer {
            renderer.frame(time, clear_colour);
        }
    }

    /// Release all GPU resources and close the window. The windowing system
    /// itself shuts down when the engine is dropped.
    pub fn finish(&mut self) {
        if let Some(renderer) = self.app.renderer.take() {
            renderer.finish();
        }
        self.lifecycle = Lifecycle::Finished;
        log::info!("Finished");
    }
}
