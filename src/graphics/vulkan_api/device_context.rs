use ash::vk;

use crate::graphics::vulkan_api::VulkanError;

/// Everything needed to submit one frame's graphics commands.
///
/// Built fresh every frame and never retained.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SubmissionDescriptor {
    pub command_buffer: vk::CommandBuffer,

    /// Semaphore the queue waits on before `wait_stage` executes.
    pub wait_semaphore: vk::Semaphore,
    pub wait_stage: vk::PipelineStageFlags,

    /// Semaphore signaled when the commands finish executing.
    pub signal_semaphore: vk::Semaphore,

    /// Fence signaled when the commands finish executing.
    pub fence: vk::Fence,
}

/// The logical device, its queues, and the command pool which the frame loop
/// draws from.
///
/// This is the only way the frame loop touches the GPU. The application uses
/// [crate::graphics::vulkan_api::RenderDevice]; tests substitute a recording
/// implementation.
///
/// # Safety
///
/// Methods marked unsafe create or destroy handles, or write into command
/// buffers. Callers are responsible for destroying every created handle
/// before the context is dropped and for never destroying or rewriting a
/// handle which is still referenced by pending GPU work.
pub trait DeviceContext {
    /// Create a binary fence, optionally in the signaled state.
    ///
    /// # Safety
    ///
    /// The fence must be destroyed before the context is dropped.
    unsafe fn create_fence(&self, signaled: bool)
        -> Result<vk::Fence, VulkanError>;

    /// # Safety
    ///
    /// The fence must not be referenced by any pending queue submission.
    unsafe fn destroy_fence(&self, fence: vk::Fence);

    /// Block the calling thread until the fence is signaled or the timeout
    /// (in nanoseconds) expires.
    fn wait_for_fence(
        &self,
        fence: vk::Fence,
        timeout_ns: u64,
    ) -> Result<(), vk::Result>;

    /// Return the fence to the unsignaled state.
    fn reset_fence(&self, fence: vk::Fence) -> Result<(), vk::Result>;

    /// # Safety
    ///
    /// The semaphore must be destroyed before the context is dropped.
    unsafe fn create_semaphore(&self) -> Result<vk::Semaphore, VulkanError>;

    /// # Safety
    ///
    /// The semaphore must not be referenced by any pending GPU operation.
    unsafe fn destroy_semaphore(&self, semaphore: vk::Semaphore);

    /// Allocate `count` primary command buffers in one batch.
    ///
    /// # Safety
    ///
    /// Every buffer must be freed before the context is dropped.
    unsafe fn allocate_command_buffers(
        &self,
        count: u32,
    ) -> Result<Vec<vk::CommandBuffer>, VulkanError>;

    /// # Safety
    ///
    /// None of the command buffers may be pending execution.
    unsafe fn free_command_buffers(&self, command_buffers: &[vk::CommandBuffer]);

    /// # Safety
    ///
    /// The view must be destroyed before the image it references.
    unsafe fn create_image_view(
        &self,
        create_info: &vk::ImageViewCreateInfo<'_>,
    ) -> Result<vk::ImageView, VulkanError>;

    /// # Safety
    ///
    /// The view must not be referenced by any pending GPU operation.
    unsafe fn destroy_image_view(&self, image_view: vk::ImageView);

    /// # Safety
    ///
    /// The render pass must be destroyed before the context is dropped.
    unsafe fn create_render_pass(
        &self,
        create_info: &vk::RenderPassCreateInfo<'_>,
    ) -> Result<vk::RenderPass, VulkanError>;

    /// # Safety
    ///
    /// The render pass must not be referenced by any pending GPU operation.
    unsafe fn destroy_render_pass(&self, render_pass: vk::RenderPass);

    /// # Safety
    ///
    /// The framebuffer must be destroyed before its attachments.
    unsafe fn create_framebuffer(
        &self,
        create_info: &vk::FramebufferCreateInfo<'_>,
    ) -> Result<vk::Framebuffer, VulkanError>;

    /// # Safety
    ///
    /// The framebuffer must not be referenced by any pending GPU operation.
    unsafe fn destroy_framebuffer(&self, framebuffer: vk::Framebuffer);

    /// Discard everything recorded into the command buffer.
    ///
    /// # Safety
    ///
    /// The command buffer must not be pending execution.
    unsafe fn reset_command_buffer(
        &self,
        command_buffer: vk::CommandBuffer,
    ) -> Result<(), vk::Result>;

    /// # Safety
    ///
    /// The command buffer must be in the initial state.
    unsafe fn begin_command_buffer(
        &self,
        command_buffer: vk::CommandBuffer,
        usage: vk::CommandBufferUsageFlags,
    ) -> Result<(), vk::Result>;

    /// # Safety
    ///
    /// The command buffer must be in the recording state.
    unsafe fn end_command_buffer(
        &self,
        command_buffer: vk::CommandBuffer,
    ) -> Result<(), vk::Result>;

    /// Begin an inline render pass which clears its single color attachment.
    ///
    /// # Safety
    ///
    /// The render pass and framebuffer must outlive the command buffer's
    /// execution.
    unsafe fn cmd_begin_render_pass(
        &self,
        command_buffer: vk::CommandBuffer,
        render_pass: vk::RenderPass,
        framebuffer: vk::Framebuffer,
        render_area: vk::Rect2D,
        clear_color: [f32; 4],
    );

    /// # Safety
    ///
    /// The command buffer must be in the recording state.
    unsafe fn cmd_set_viewport(
        &self,
        command_buffer: vk::CommandBuffer,
        viewport: vk::Viewport,
    );

    /// # Safety
    ///
    /// The command buffer must be in the recording state.
    unsafe fn cmd_set_scissor(
        &self,
        command_buffer: vk::CommandBuffer,
        scissor: vk::Rect2D,
    );

    /// # Safety
    ///
    /// The pipeline must outlive the command buffer's execution.
    unsafe fn cmd_bind_graphics_pipeline(
        &self,
        command_buffer: vk::CommandBuffer,
        pipeline: vk::Pipeline,
    );

    /// Non-indexed draw with no bound vertex buffers.
    ///
    /// # Safety
    ///
    /// A graphics pipeline must be bound inside an active render pass.
    unsafe fn cmd_draw(
        &self,
        command_buffer: vk::CommandBuffer,
        vertex_count: u32,
        instance_count: u32,
    );

    /// # Safety
    ///
    /// A render pass must be active in the command buffer.
    unsafe fn cmd_end_render_pass(&self, command_buffer: vk::CommandBuffer);

    /// Submit one command buffer to the graphics queue.
    ///
    /// # Safety
    ///
    /// Every handle in the submission must live until the fence signals.
    unsafe fn submit_graphics_commands(
        &self,
        submission: &SubmissionDescriptor,
    ) -> Result<(), vk::Result>;

    /// Stall the calling thread until the device has no pending work.
    fn wait_idle(&self) -> Result<(), VulkanError>;

    /// Set the name which shows up in validation layer logs. No-op unless the
    /// implementation has debug utils enabled.
    fn set_debug_name<H>(&self, _handle: H, _name: &str)
    where
        H: vk::Handle + Copy,
    {
    }
}
