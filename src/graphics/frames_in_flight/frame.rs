use ash::vk;

/// A frame which has an acquired swapchain image and a command buffer ready
/// for recording.
///
/// The Frame does not own any resources and it is an error to retain copies
/// of any of the Frame's resource handles after calling `submit_and_present`.
#[derive(Debug)]
pub struct Frame {
    slot_index: usize,
    swapchain_image_index: usize,
    command_buffer: vk::CommandBuffer,
    suboptimal: bool,
}

// Public API
// ----------

impl Frame {
    /// The primary command buffer owned by this frame's slot.
    ///
    /// The buffer is not started. Whatever was recorded the last time the
    /// slot was used has finished executing, so the buffer can be reset.
    pub fn command_buffer(&self) -> vk::CommandBuffer {
        self.command_buffer
    }

    /// The frame slot's index. Always in the range [0-K) where K is the
    /// number of frames in flight.
    pub fn slot_index(&self) -> usize {
        self.slot_index
    }

    /// The index of the swapchain image being targeted by this frame.
    pub fn swapchain_image_index(&self) -> usize {
        self.swapchain_image_index
    }

    /// True when the image was acquired from a swapchain which no longer
    /// matches the surface exactly. The frame can still be presented.
    pub fn is_suboptimal(&self) -> bool {
        self.suboptimal
    }
}

// Private API
// -----------

impl Frame {
    pub(super) fn new(
        slot_index: usize,
        swapchain_image_index: usize,
        command_buffer: vk::CommandBuffer,
        suboptimal: bool,
    ) -> Self {
        Self {
            slot_index,
            swapchain_image_index,
            command_buffer,
            suboptimal,
        }
    }
}
