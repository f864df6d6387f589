use {
    crate::graphics::vulkan_api::{DeviceContext, VulkanError},
    ash::vk,
    std::sync::Arc,
};

/// A primary command buffer which is returned to the device's command pool
/// when dropped.
pub struct CommandBuffer<D: DeviceContext> {
    command_buffer: vk::CommandBuffer,
    device: Arc<D>,
}

impl<D: DeviceContext> CommandBuffer<D> {
    /// Allocate `count` command buffers with a single allocation call.
    ///
    /// # Safety
    ///
    /// Unsafe because:
    ///   - None of the buffers may be dropped while pending execution.
    pub unsafe fn allocate_batch(
        device: &Arc<D>,
        count: u32,
    ) -> Result<Vec<Self>, VulkanError> {
        let raw_buffers = unsafe { device.allocate_command_buffers(count)? };
        Ok(raw_buffers
            .into_iter()
            .map(|command_buffer| Self {
                command_buffer,
                device: device.clone(),
            })
            .collect())
    }

    /// Set the name which shows up in Vulkan debug logs for this resource.
    pub fn set_debug_name(&self, name: &str) {
        self.device.set_debug_name(self.command_buffer, name);
    }

    /// Get the raw Vulkan command buffer handle.
    pub fn raw(&self) -> vk::CommandBuffer {
        self.command_buffer
    }
}

impl<D: DeviceContext> Drop for CommandBuffer<D> {
    fn drop(&mut self) {
        unsafe {
            self.device.free_command_buffers(&[self.command_buffer]);
        }
    }
}

impl<D: DeviceContext> std::fmt::Debug for CommandBuffer<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandBuffer")
            .field("command_buffer", &self.command_buffer)
            .finish()
    }
}
