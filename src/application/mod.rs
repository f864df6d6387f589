//! The windowed presentation loop.
//!
//! One fixed-size window, one render context, and one frame per redraw until
//! the window closes, a frame limit is reached, or a frame fails.

mod frame_stats;
mod render_context;

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Window, WindowId},
};

use self::frame_stats::FrameStats;
pub use self::render_context::RenderContext;
use crate::config::Config;

/// Open the window and present frames until the loop ends.
///
/// # Params
///
/// * `config` - validated application configuration
/// * `max_frames` - stop after this many presented frames, or run until the
///   window closes when None
pub fn run(config: Config, max_frames: Option<u64>) -> Result<()> {
    let event_loop =
        EventLoop::new().context("Unable to create the event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config, max_frames);
    event_loop
        .run_app(&mut app)
        .context("The event loop exited with an error")?;

    log::info!("Presented {} frames", app.stats.total_frames());
    match app.error.take() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

/// Application state driven by winit.
///
/// The render context is declared before the window so it is dropped first.
struct App {
    config: Config,
    max_frames: Option<u64>,
    stats: FrameStats,
    error: Option<anyhow::Error>,
    context: Option<RenderContext>,
    window: Option<Window>,
}

impl App {
    fn new(config: Config, max_frames: Option<u64>) -> Self {
        Self {
            config,
            max_frames,
            stats: FrameStats::new(Duration::from_secs(1), Instant::now()),
            error: None,
            context: None,
            window: None,
        }
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window_config = &self.config.window;
        let attributes = Window::default_attributes()
            .with_title(window_config.title.clone())
            .with_inner_size(PhysicalSize::new(
                window_config.width,
                window_config.height,
            ))
            .with_resizable(false);
        let window = event_loop
            .create_window(attributes)
            .context("Unable to create the window")?;
        let context = RenderContext::new(&window, &self.config.renderer)?;
        window.request_redraw();

        self.context = Some(context);
        self.window = Some(window);
        Ok(())
    }

    /// Tear down the render context before the window and stop the loop.
    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        self.context = None;
        self.window = None;
        event_loop.exit();
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{:?}", error);
        self.error = Some(error);
        self.shutdown(event_loop);
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(context) = self.context.as_mut() else {
            return;
        };
        if let Err(error) = context.draw_frame() {
            self.fail(event_loop, anyhow::Error::new(error).context("Frame failed"));
            return;
        }

        if let Some(fps) = self.stats.frame_presented(Instant::now()) {
            log::info!("{:.1} fps", fps);
        }
        if self
            .max_frames
            .is_some_and(|max| self.stats.total_frames() >= max)
        {
            log::info!("Reached the frame limit");
            self.shutdown(event_loop);
            return;
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(error) = self.initialize(event_loop) {
            self.fail(event_loop, error);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.window.as_ref().is_some_and(|w| w.id() != window_id) {
            return;
        }

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(NamedKey::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                log::info!("Window closed");
                self.shutdown(event_loop);
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}
