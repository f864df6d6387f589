use {
    crate::graphics::vulkan_api::{DeviceContext, VulkanError},
    ash::vk,
    std::sync::Arc,
};

/// A RAII Vulkan RenderPass.
pub struct RenderPass<D: DeviceContext> {
    render_pass: vk::RenderPass,
    device: Arc<D>,
}

impl<D: DeviceContext> RenderPass<D> {
    /// # Safety
    ///
    /// Unsafe because:
    ///   - The render pass must not be dropped while any pending command
    ///     buffer references it.
    pub unsafe fn new(
        device: Arc<D>,
        create_info: &vk::RenderPassCreateInfo<'_>,
    ) -> Result<Self, VulkanError> {
        let render_pass = unsafe { device.create_render_pass(create_info)? };
        Ok(Self {
            render_pass,
            device,
        })
    }

    /// Set the debug name for how this resource appears in Vulkan logs.
    pub fn set_debug_name(&self, name: &str) {
        self.device.set_debug_name(self.render_pass, name);
    }

    /// Get the raw Vulkan RenderPass handle.
    pub fn raw(&self) -> vk::RenderPass {
        self.render_pass
    }
}

impl<D: DeviceContext> Drop for RenderPass<D> {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_render_pass(self.render_pass);
        }
    }
}

impl<D: DeviceContext> std::fmt::Debug for RenderPass<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderPass")
            .field("render_pass", &self.render_pass)
            .finish()
    }
}
