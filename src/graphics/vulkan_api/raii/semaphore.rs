use {
    crate::graphics::vulkan_api::{DeviceContext, VulkanError},
    ash::vk,
    std::sync::Arc,
};

/// RAII binary Vulkan Semaphore.
pub struct Semaphore<D: DeviceContext> {
    semaphore: vk::Semaphore,
    device: Arc<D>,
}

impl<D: DeviceContext> Semaphore<D> {
    /// Create a new binary semaphore.
    ///
    /// # Safety
    ///
    /// Unsafe because:
    ///   - The semaphore must not be dropped while any pending GPU operation
    ///     waits on or signals it.
    pub unsafe fn new(device: Arc<D>) -> Result<Self, VulkanError> {
        let semaphore = unsafe { device.create_semaphore()? };
        Ok(Self { semaphore, device })
    }

    /// Set the name which shows up in Vulkan debug logs for this resource.
    pub fn set_debug_name(&self, name: &str) {
        self.device.set_debug_name(self.semaphore, name);
    }

    /// Get the Vulkan semaphore handle.
    pub fn raw(&self) -> vk::Semaphore {
        self.semaphore
    }
}

impl<D: DeviceContext> Drop for Semaphore<D> {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_semaphore(self.semaphore);
        }
    }
}

impl<D: DeviceContext> std::fmt::Debug for Semaphore<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Semaphore")
            .field("semaphore", &self.semaphore)
            .finish()
    }
}
