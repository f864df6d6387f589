use {
    crate::graphics::vulkan_api::{DeviceContext, VulkanError},
    ash::vk,
    std::sync::Arc,
};

/// RAII Vulkan Fence.
pub struct Fence<D: DeviceContext> {
    fence: vk::Fence,
    device: Arc<D>,
}

impl<D: DeviceContext> Fence<D> {
    /// Create a new binary fence.
    ///
    /// # Safety
    ///
    /// Unsafe because:
    ///   - The fence must not be dropped while a pending queue submission
    ///     will signal it.
    pub unsafe fn new(
        device: Arc<D>,
        signaled: bool,
    ) -> Result<Self, VulkanError> {
        let fence = unsafe { device.create_fence(signaled)? };
        Ok(Self { fence, device })
    }

    /// Block until the fence is signaled.
    pub fn wait(&self, timeout_ns: u64) -> Result<(), vk::Result> {
        self.device.wait_for_fence(self.fence, timeout_ns)
    }

    /// Return the fence to the unsignaled state.
    pub fn reset(&self) -> Result<(), vk::Result> {
        self.device.reset_fence(self.fence)
    }

    /// Set the name which shows up in Vulkan debug logs for this resource.
    pub fn set_debug_name(&self, name: &str) {
        self.device.set_debug_name(self.fence, name);
    }

    /// Get the Vulkan fence handle.
    pub fn raw(&self) -> vk::Fence {
        self.fence
    }
}

impl<D: DeviceContext> Drop for Fence<D> {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_fence(self.fence);
        }
    }
}

impl<D: DeviceContext> std::fmt::Debug for Fence<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fence").field("fence", &self.fence).finish()
    }
}
