use std::sync::Arc;

use ash::vk;

use crate::graphics::{
    vulkan_api::{ColorPass, DeviceContext},
    RecordingError,
};

/// Writes the per-frame draw into a frame slot's command buffer.
///
/// Recording is deterministic: every call emits the same sequence of commands
/// for the same inputs. The command buffer is reset first, so it can be reused
/// every time its slot comes around.
pub struct CommandRecorder<D: DeviceContext> {
    clear_color: [f32; 4],
    vertex_count: u32,
    device: Arc<D>,
}

impl<D: DeviceContext> CommandRecorder<D> {
    /// # Params
    ///
    /// * `device` - the device which owns the command buffers being recorded
    /// * `clear_color` - the color each image is cleared to before drawing
    /// * `vertex_count` - the number of vertices drawn each frame
    pub fn new(
        device: Arc<D>,
        clear_color: [f32; 4],
        vertex_count: u32,
    ) -> Self {
        Self {
            clear_color,
            vertex_count,
            device,
        }
    }

    /// Record one frame's commands.
    ///
    /// Every argument is validated before anything is written. Once recording
    /// starts, the first rejected command aborts it and nothing is retried.
    ///
    /// # Params
    ///
    /// * `target` - provides the render pass and the framebuffer for each
    ///   surface image
    /// * `command_buffer` - the buffer to record into. It must not be pending
    ///   execution.
    /// * `image_index` - the acquired surface image to draw into
    /// * `pipeline` - the graphics pipeline to bind
    /// * `extent` - the viewport and scissor size
    pub fn record(
        &self,
        target: &ColorPass<D>,
        command_buffer: vk::CommandBuffer,
        image_index: usize,
        pipeline: vk::Pipeline,
        extent: vk::Extent2D,
    ) -> Result<(), RecordingError> {
        if pipeline == vk::Pipeline::null() {
            return Err(RecordingError::InvalidPipeline);
        }
        let framebuffer = target.framebuffer(image_index).ok_or(
            RecordingError::ImageIndexOutOfRange {
                index: image_index,
                count: target.framebuffer_count(),
            },
        )?;
        if extent.width == 0 || extent.height == 0 {
            return Err(RecordingError::EmptyExtent(extent));
        }

        let full_extent = vk::Rect2D {
            offset: vk::Offset2D { x: 0, y: 0 },
            extent,
        };
        let viewport = vk::Viewport {
            x: 0.0,
            y: 0.0,
            width: extent.width as f32,
            height: extent.height as f32,
            min_depth: 0.0,
            max_depth: 1.0,
        };

        unsafe {
            // SAFE because the frame synchronizer only hands out a command
            // buffer after its slot's fence has been observed.
            self.device
                .reset_command_buffer(command_buffer)
                .map_err(RecordingError::ResetFailed)?;
            self.device
                .begin_command_buffer(
                    command_buffer,
                    vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT,
                )
                .map_err(RecordingError::BeginFailed)?;

            self.device.cmd_begin_render_pass(
                command_buffer,
                target.render_pass(),
                framebuffer,
                full_extent,
                self.clear_color,
            );
            self.device.cmd_set_viewport(command_buffer, viewport);
            self.device.cmd_set_scissor(command_buffer, full_extent);
            self.device.cmd_bind_graphics_pipeline(command_buffer, pipeline);
            self.device.cmd_draw(command_buffer, self.vertex_count, 1);
            self.device.cmd_end_render_pass(command_buffer);

            self.device
                .end_command_buffer(command_buffer)
                .map_err(RecordingError::EndFailed)?;
        }

        Ok(())
    }
}

impl<D: DeviceContext> std::fmt::Debug for CommandRecorder<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRecorder")
            .field("clear_color", &self.clear_color)
            .field("vertex_count", &self.vertex_count)
            .finish()
    }
}
