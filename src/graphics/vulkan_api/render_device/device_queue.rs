use ash::vk;

/// The Vulkan queue and associated indices.
#[derive(Debug, Clone, Copy)]
pub struct DeviceQueue {
    /// The Vulkan queue
    queue: vk::Queue,

    /// The family index for this queue
    family_index: u32,
}

impl DeviceQueue {
    /// Create a new queue instance from the raw vulkan resource.
    pub fn from_raw(queue: vk::Queue, family_index: u32) -> Self {
        Self {
            queue,
            family_index,
        }
    }

    pub fn raw(&self) -> vk::Queue {
        self.queue
    }

    pub fn family_index(&self) -> u32 {
        self.family_index
    }
}
