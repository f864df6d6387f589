use std::ffi::CString;

use ash::vk;

use super::RenderDevice;
use crate::graphics::vulkan_api::{
    DeviceContext, SubmissionDescriptor, VulkanError,
};

impl RenderDevice {
    /// Create a raw Vulkan shader module.
    ///
    /// # Safety
    ///
    /// Unsafe because the caller must ensure the module is destroyed before
    /// the RenderDevice is dropped.
    pub unsafe fn create_shader_module(
        &self,
        code: &[u32],
    ) -> Result<vk::ShaderModule, VulkanError> {
        let create_info = vk::ShaderModuleCreateInfo::default().code(code);
        self.logical_device
            .create_shader_module(&create_info, None)
            .map_err(VulkanError::UnableToCreateShaderModule)
    }

    /// # Safety
    ///
    /// No pipeline may still be in creation with the module.
    pub unsafe fn destroy_shader_module(&self, shader_module: vk::ShaderModule) {
        self.logical_device.destroy_shader_module(shader_module, None)
    }

    /// Create a raw Vulkan pipeline layout.
    ///
    /// # Safety
    ///
    /// Unsafe because the caller must ensure the layout is destroyed before
    /// the RenderDevice is dropped.
    pub unsafe fn create_pipeline_layout(
        &self,
        create_info: &vk::PipelineLayoutCreateInfo<'_>,
    ) -> Result<vk::PipelineLayout, VulkanError> {
        self.logical_device
            .create_pipeline_layout(create_info, None)
            .map_err(VulkanError::UnableToCreatePipelineLayout)
    }

    /// # Safety
    ///
    /// Every pipeline created with the layout must already be destroyed.
    pub unsafe fn destroy_pipeline_layout(&self, layout: vk::PipelineLayout) {
        self.logical_device.destroy_pipeline_layout(layout, None)
    }

    /// Create a single graphics pipeline.
    ///
    /// # Safety
    ///
    /// Unsafe because the caller must ensure the pipeline is destroyed before
    /// the RenderDevice is dropped.
    pub unsafe fn create_graphics_pipeline(
        &self,
        create_info: &vk::GraphicsPipelineCreateInfo<'_>,
    ) -> Result<vk::Pipeline, VulkanError> {
        let pipelines = self
            .logical_device
            .create_graphics_pipelines(
                vk::PipelineCache::null(),
                std::slice::from_ref(create_info),
                None,
            )
            .map_err(|(_, error)| {
                VulkanError::UnableToCreateGraphicsPipeline(error)
            })?;
        pipelines
            .into_iter()
            .next()
            .ok_or(VulkanError::UnableToCreateGraphicsPipeline(
                vk::Result::ERROR_UNKNOWN,
            ))
    }

    /// # Safety
    ///
    /// The pipeline must not be referenced by any pending GPU operation.
    pub unsafe fn destroy_pipeline(&self, pipeline: vk::Pipeline) {
        self.logical_device.destroy_pipeline(pipeline, None)
    }
}

impl DeviceContext for RenderDevice {
    unsafe fn create_fence(
        &self,
        signaled: bool,
    ) -> Result<vk::Fence, VulkanError> {
        let flags = if signaled {
            vk::FenceCreateFlags::SIGNALED
        } else {
            vk::FenceCreateFlags::empty()
        };
        let create_info = vk::FenceCreateInfo::default().flags(flags);
        self.logical_device
            .create_fence(&create_info, None)
            .map_err(VulkanError::UnableToCreateFence)
    }

    unsafe fn destroy_fence(&self, fence: vk::Fence) {
        self.logical_device.destroy_fence(fence, None)
    }

    fn wait_for_fence(
        &self,
        fence: vk::Fence,
        timeout_ns: u64,
    ) -> Result<(), vk::Result> {
        unsafe { self.logical_device.wait_for_fences(&[fence], true, timeout_ns) }
    }

    fn reset_fence(&self, fence: vk::Fence) -> Result<(), vk::Result> {
        unsafe { self.logical_device.reset_fences(&[fence]) }
    }

    unsafe fn create_semaphore(&self) -> Result<vk::Semaphore, VulkanError> {
        let create_info = vk::SemaphoreCreateInfo::default();
        self.logical_device
            .create_semaphore(&create_info, None)
            .map_err(VulkanError::UnableToCreateSemaphore)
    }

    unsafe fn destroy_semaphore(&self, semaphore: vk::Semaphore) {
        self.logical_device.destroy_semaphore(semaphore, None)
    }

    unsafe fn allocate_command_buffers(
        &self,
        count: u32,
    ) -> Result<Vec<vk::CommandBuffer>, VulkanError> {
        let allocate_info = vk::CommandBufferAllocateInfo::default()
            .command_pool(self.command_pool)
            .level(vk::CommandBufferLevel::PRIMARY)
            .command_buffer_count(count);
        self.logical_device
            .allocate_command_buffers(&allocate_info)
            .map_err(VulkanError::UnableToAllocateCommandBuffers)
    }

    unsafe fn free_command_buffers(&self, command_buffers: &[vk::CommandBuffer]) {
        self.logical_device
            .free_command_buffers(self.command_pool, command_buffers)
    }

    unsafe fn create_image_view(
        &self,
        create_info: &vk::ImageViewCreateInfo<'_>,
    ) -> Result<vk::ImageView, VulkanError> {
        self.logical_device
            .create_image_view(create_info, None)
            .map_err(VulkanError::UnableToCreateImageView)
    }

    unsafe fn destroy_image_view(&self, image_view: vk::ImageView) {
        self.logical_device.destroy_image_view(image_view, None)
    }

    unsafe fn create_render_pass(
        &self,
        create_info: &vk::RenderPassCreateInfo<'_>,
    ) -> Result<vk::RenderPass, VulkanError> {
        self.logical_device
            .create_render_pass(create_info, None)
            .map_err(VulkanError::UnableToCreateRenderPass)
    }

    unsafe fn destroy_render_pass(&self, render_pass: vk::RenderPass) {
        self.logical_device.destroy_render_pass(render_pass, None)
    }

    unsafe fn create_framebuffer(
        &self,
        create_info: &vk::FramebufferCreateInfo<'_>,
    ) -> Result<vk::Framebuffer, VulkanError> {
        self.logical_device
            .create_framebuffer(create_info, None)
            .map_err(VulkanError::UnableToCreateFramebuffer)
    }

    unsafe fn destroy_framebuffer(&self, framebuffer: vk::Framebuffer) {
        self.logical_device.destroy_framebuffer(framebuffer, None)
    }

    unsafe fn reset_command_buffer(
        &self,
        command_buffer: vk::CommandBuffer,
    ) -> Result<(), vk::Result> {
        self.logical_device.reset_command_buffer(
            command_buffer,
            vk::CommandBufferResetFlags::empty(),
        )
    }

    unsafe fn begin_command_buffer(
        &self,
        command_buffer: vk::CommandBuffer,
        usage: vk::CommandBufferUsageFlags,
    ) -> Result<(), vk::Result> {
        let begin_info = vk::CommandBufferBeginInfo::default().flags(usage);
        self.logical_device
            .begin_command_buffer(command_buffer, &begin_info)
    }

    unsafe fn end_command_buffer(
        &self,
        command_buffer: vk::CommandBuffer,
    ) -> Result<(), vk::Result> {
        self.logical_device.end_command_buffer(command_buffer)
    }

    unsafe fn cmd_begin_render_pass(
        &self,
        command_buffer: vk::CommandBuffer,
        render_pass: vk::RenderPass,
        framebuffer: vk::Framebuffer,
        render_area: vk::Rect2D,
        clear_color: [f32; 4],
    ) {
        let clear_values = [vk::ClearValue {
            color: vk::ClearColorValue {
                float32: clear_color,
            },
        }];
        let begin_info = vk::RenderPassBeginInfo::default()
            .render_pass(render_pass)
            .framebuffer(framebuffer)
            .render_area(render_area)
            .clear_values(&clear_values);
        self.logical_device.cmd_begin_render_pass(
            command_buffer,
            &begin_info,
            vk::SubpassContents::INLINE,
        );
    }

    unsafe fn cmd_set_viewport(
        &self,
        command_buffer: vk::CommandBuffer,
        viewport: vk::Viewport,
    ) {
        self.logical_device
            .cmd_set_viewport(command_buffer, 0, &[viewport]);
    }

    unsafe fn cmd_set_scissor(
        &self,
        command_buffer: vk::CommandBuffer,
        scissor: vk::Rect2D,
    ) {
        self.logical_device
            .cmd_set_scissor(command_buffer, 0, &[scissor]);
    }

    unsafe fn cmd_bind_graphics_pipeline(
        &self,
        command_buffer: vk::CommandBuffer,
        pipeline: vk::Pipeline,
    ) {
        self.logical_device.cmd_bind_pipeline(
            command_buffer,
            vk::PipelineBindPoint::GRAPHICS,
            pipeline,
        );
    }

    unsafe fn cmd_draw(
        &self,
        command_buffer: vk::CommandBuffer,
        vertex_count: u32,
        instance_count: u32,
    ) {
        self.logical_device
            .cmd_draw(command_buffer, vertex_count, instance_count, 0, 0);
    }

    unsafe fn cmd_end_render_pass(&self, command_buffer: vk::CommandBuffer) {
        self.logical_device.cmd_end_render_pass(command_buffer);
    }

    unsafe fn submit_graphics_commands(
        &self,
        submission: &SubmissionDescriptor,
    ) -> Result<(), vk::Result> {
        let wait_semaphores = [submission.wait_semaphore];
        let wait_stages = [submission.wait_stage];
        let command_buffers = [submission.command_buffer];
        let signal_semaphores = [submission.signal_semaphore];
        let submit_info = vk::SubmitInfo::default()
            .wait_semaphores(&wait_semaphores)
            .wait_dst_stage_mask(&wait_stages)
            .command_buffers(&command_buffers)
            .signal_semaphores(&signal_semaphores);
        self.logical_device.queue_submit(
            self.graphics_queue.raw(),
            &[submit_info],
            submission.fence,
        )
    }

    fn wait_idle(&self) -> Result<(), VulkanError> {
        unsafe {
            self.logical_device
                .device_wait_idle()
                .map_err(VulkanError::UnableToWaitForDeviceToIdle)
        }
    }

    fn set_debug_name<H>(&self, handle: H, name: &str)
    where
        H: vk::Handle + Copy,
    {
        let Some(debug_utils) = &self.debug_utils else {
            return;
        };
        let Ok(cname) = CString::new(name) else {
            log::warn!("Skipping debug name with an interior nul: {}", name);
            return;
        };
        let name_info = vk::DebugUtilsObjectNameInfoEXT::default()
            .object_handle(handle)
            .object_name(&cname);
        let result = unsafe { debug_utils.set_debug_utils_object_name(&name_info) };
        if let Err(error) = result {
            log::warn!("Unable to name {:?} as {}: {:?}", H::TYPE, name, error);
        }
    }
}
