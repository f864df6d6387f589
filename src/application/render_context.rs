use std::sync::Arc;

use anyhow::{Context, Result};
use indoc::formatdoc;
use winit::{
    raw_window_handle::{HasDisplayHandle, HasWindowHandle},
    window::Window,
};

use crate::{
    config::RendererConfig,
    graphics::{
        vulkan_api::{
            ColorPass, DeviceContext, GraphicsPipeline, PresentableSurface,
            RenderDevice, Swapchain,
        },
        CommandRecorder, FrameSynchronizer, GraphicsError,
    },
};

/// Every Vulkan resource the frame loop needs, torn down in dependency order.
///
/// Fields after `frames` are declared in destruction order.
pub struct RenderContext {
    frames: Option<FrameSynchronizer<RenderDevice>>,
    recorder: CommandRecorder<RenderDevice>,
    pipeline: GraphicsPipeline,
    color_pass: ColorPass<RenderDevice>,
    swapchain: Swapchain,
    device: Arc<RenderDevice>,
}

impl RenderContext {
    /// Run the one-time bootstrap for the window.
    ///
    /// The window must outlive the returned context.
    pub fn new(window: &Window, config: &RendererConfig) -> Result<Self> {
        let display = window
            .display_handle()
            .context("Unable to get the window's display handle")?
            .as_raw();
        let window_handle = window
            .window_handle()
            .context("Unable to get the window handle")?
            .as_raw();

        // SAFE because the application drops the context before the window
        let device = Arc::new(unsafe {
            RenderDevice::new(display, window_handle, config.enable_validation)
                .context("Unable to create the render device")?
        });

        let size = window.inner_size();
        let swapchain =
            Swapchain::new(device.clone(), (size.width, size.height))
                .context("Unable to create the swapchain")?;

        let color_pass = unsafe {
            ColorPass::new(device.clone(), &swapchain)
                .context("Unable to create the color pass")?
        };

        let pipeline = GraphicsPipeline::new(
            device.clone(),
            &config.vertex_shader,
            &config.fragment_shader,
            color_pass.render_pass(),
        )
        .context("Unable to create the graphics pipeline")?;

        let frames =
            FrameSynchronizer::new(device.clone(), config.frames_in_flight)
                .context("Unable to create the frame synchronizer")?;

        let recorder = CommandRecorder::new(
            device.clone(),
            config.clear_color,
            config.vertex_count,
        );

        log::info!(
            "{}",
            formatdoc!(
                "
                Render context ready
                frames in flight: {}
                swapchain images: {}
                extent: {}x{}",
                frames.frames_in_flight(),
                swapchain.image_count(),
                swapchain.extent().width,
                swapchain.extent().height,
            )
        );

        Ok(Self {
            frames: Some(frames),
            recorder,
            pipeline,
            color_pass,
            swapchain,
            device,
        })
    }

    /// Acquire, record, submit, and present one frame.
    pub fn draw_frame(&mut self) -> Result<(), GraphicsError> {
        let Some(frames) = self.frames.as_mut() else {
            return Ok(());
        };

        let frame = frames.begin_frame(&self.swapchain)?;
        self.recorder.record(
            &self.color_pass,
            frame.command_buffer(),
            frame.swapchain_image_index(),
            self.pipeline.raw(),
            self.swapchain.extent(),
        )?;
        frames.submit_and_present(&self.swapchain, frame)
    }
}

impl Drop for RenderContext {
    fn drop(&mut self) {
        if let Some(frames) = self.frames.as_mut() {
            if let Err(error) = frames.wait_for_all_frames_to_complete() {
                log::error!("Unable to wait for in-flight frames: {}", error);
            }
        }
        if let Err(error) = self.device.wait_idle() {
            log::error!("Unable to idle the device before teardown: {}", error);
        }
        if let Some(frames) = self.frames.take() {
            // SAFE because the device is idle
            unsafe { frames.shutdown() };
        }
    }
}

impl std::fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderContext")
            .field("frames", &self.frames)
            .field("recorder", &self.recorder)
            .field("pipeline", &self.pipeline)
            .field("color_pass", &self.color_pass)
            .field("swapchain", &self.swapchain)
            .finish()
    }
}
