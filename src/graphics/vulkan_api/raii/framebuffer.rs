use {
    crate::graphics::vulkan_api::{DeviceContext, VulkanError},
    ash::vk,
    std::sync::Arc,
};

/// A RAII Vulkan Framebuffer.
pub struct Framebuffer<D: DeviceContext> {
    framebuffer: vk::Framebuffer,
    device: Arc<D>,
}

impl<D: DeviceContext> Framebuffer<D> {
    /// Create a new Vulkan Framebuffer which is automatically destroyed when
    /// dropped.
    ///
    /// # Safety
    ///
    /// Unsafe because:
    ///   - The application must not drop the Framebuffer while it is in use by
    ///     the GPU.
    ///   - The attachments must outlive the Framebuffer.
    pub unsafe fn new(
        device: Arc<D>,
        create_info: &vk::FramebufferCreateInfo<'_>,
    ) -> Result<Self, VulkanError> {
        let framebuffer = unsafe { device.create_framebuffer(create_info)? };
        Ok(Self {
            framebuffer,
            device,
        })
    }

    /// Set the debug name for how this resource appears in Vulkan logs.
    pub fn set_debug_name(&self, name: &str) {
        self.device.set_debug_name(self.framebuffer, name);
    }

    /// Get the raw Vulkan Framebuffer handle.
    pub fn raw(&self) -> vk::Framebuffer {
        self.framebuffer
    }
}

impl<D: DeviceContext> Drop for Framebuffer<D> {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_framebuffer(self.framebuffer);
        }
    }
}

impl<D: DeviceContext> std::fmt::Debug for Framebuffer<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Framebuffer")
            .field("framebuffer", &self.framebuffer)
            .finish()
    }
}
