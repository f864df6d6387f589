use std::sync::Arc;

use crate::graphics::{
    vulkan_api::{CommandBuffer, DeviceContext, Fence, Semaphore},
    GraphicsError,
};

/// Where a frame slot is in its lifecycle.
///
/// A slot moves `Idle -> Acquiring -> Recording -> Submitted` and back to
/// `Idle` once its completion fence is observed. A slot which holds an
/// acquired image stays `Acquiring` or `Recording` until that image is
/// submitted.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SlotState {
    /// No work is pending and no frame is using the slot.
    Idle,

    /// The slot's fence has been observed and an image is being acquired, or
    /// the image is held but the fence could not be reset yet.
    Acquiring,

    /// A Frame for this slot has been handed to the application.
    Recording,

    /// The slot's commands were submitted and may still be executing.
    Submitted,
}

/// All of the per-frame synchronization resources.
pub(super) struct FrameSlot<D: DeviceContext> {
    pub(super) state: SlotState,

    /// The swapchain image index and suboptimal flag of an image which was
    /// acquired but not yet submitted. The image acquired semaphore has a
    /// pending signal while this is set.
    pub(super) acquired: Option<(usize, bool)>,

    pub(super) command_buffer: CommandBuffer<D>,
    pub(super) image_acquired_semaphore: Semaphore<D>,
    pub(super) render_finished_semaphore: Semaphore<D>,
    pub(super) graphics_commands_completed_fence: Fence<D>,
}

impl<D: DeviceContext> FrameSlot<D> {
    /// Create synchronization resources for a single in-flight frame.
    ///
    /// # Params
    ///
    /// * `device` - the device used to create and destroy all slot resources
    /// * `index` - the slot's index, used for debug names
    /// * `command_buffer` - this slot's share of the batch allocation
    pub fn new(
        device: &Arc<D>,
        index: usize,
        command_buffer: CommandBuffer<D>,
    ) -> Result<Self, GraphicsError> {
        // SAFE because the slot owns every resource and the synchronizer only
        // drops slots once the device is idle.
        let (image_acquired_semaphore, render_finished_semaphore, fence) = unsafe {
            (
                Semaphore::new(device.clone())?,
                Semaphore::new(device.clone())?,
                Fence::new(device.clone(), true)?,
            )
        };
        command_buffer.set_debug_name(&format!("Frame {index} Command Buffer"));
        image_acquired_semaphore
            .set_debug_name(&format!("Frame {index} Swapchain Image Acquired"));
        render_finished_semaphore
            .set_debug_name(&format!("Frame {index} Render Finished"));
        fence.set_debug_name(&format!(
            "Frame {index} Graphics Commands Completed"
        ));

        Ok(Self {
            state: SlotState::Idle,
            acquired: None,
            command_buffer,
            image_acquired_semaphore,
            render_finished_semaphore,
            graphics_commands_completed_fence: fence,
        })
    }
}
