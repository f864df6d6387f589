mod frame;
mod frame_slot;

use std::sync::Arc;

use ash::vk;

use self::frame_slot::FrameSlot;
use crate::graphics::{
    vulkan_api::{
        CommandBuffer, DeviceContext, PresentableSurface, SubmissionDescriptor,
        SwapchainStatus,
    },
    FrameStage, GraphicsError,
};

pub use self::{frame::Frame, frame_slot::SlotState};

/// A utility for synchronizing graphics commands and presentation for
/// multiple in-flight frames.
///
/// Each of the K slots owns a command buffer, a fence which signals when the
/// slot's last submission finishes, and a pair of semaphores which order
/// acquire -> render -> present on the GPU. A slot is never handed out again
/// until its fence has been observed, so at most K frames are ever in flight.
pub struct FrameSynchronizer<D: DeviceContext> {
    frame_counter: u64,
    slots: Vec<FrameSlot<D>>,
    device: Arc<D>,
}

impl<D: DeviceContext> FrameSynchronizer<D> {
    /// Create resources for synchronizing multiple in-flight frames.
    ///
    /// # Params
    ///
    /// * `device` - used to create all Vulkan resources
    /// * `frame_count` - the number of in-flight frames to support. Typically
    ///   this is 2 for double-buffering. 1 keeps the CPU and GPU in lockstep.
    ///   This is unrelated to the number of swapchain images.
    pub fn new(
        device: Arc<D>,
        frame_count: usize,
    ) -> Result<Self, GraphicsError> {
        if frame_count == 0 {
            return Err(GraphicsError::InvalidFrameCount(frame_count));
        }
        let buffer_count = u32::try_from(frame_count)
            .map_err(|_| GraphicsError::InvalidFrameCount(frame_count))?;

        // SAFE because each buffer is owned by exactly one slot and the slots
        // are only dropped after the device is idle.
        let command_buffers =
            unsafe { CommandBuffer::allocate_batch(&device, buffer_count)? };
        let slots = command_buffers
            .into_iter()
            .enumerate()
            .map(|(index, command_buffer)| {
                FrameSlot::new(&device, index, command_buffer)
            })
            .collect::<Result<Vec<_>, _>>()?;

        log::info!("Created {} frames in flight", frame_count);

        Ok(Self {
            frame_counter: 0,
            slots,
            device,
        })
    }

    /// The number of frame slots, K.
    pub fn frames_in_flight(&self) -> usize {
        self.slots.len()
    }

    /// The number of frames submitted so far.
    pub fn frame_counter(&self) -> u64 {
        self.frame_counter
    }

    /// The slot which the next call to `begin_frame` will use.
    pub fn current_slot(&self) -> usize {
        (self.frame_counter % self.slots.len() as u64) as usize
    }

    /// The lifecycle state of a slot, or None when the index is out of range.
    pub fn slot_state(&self, slot_index: usize) -> Option<SlotState> {
        self.slots.get(slot_index).map(|slot| slot.state)
    }

    /// Wait for the current slot's previous submission to finish then acquire
    /// the next swapchain image.
    ///
    /// This is the only place the frame loop blocks the CPU. The image itself
    /// is not waited on here. The returned frame's submission waits for it on
    /// the GPU.
    ///
    /// When the slot already holds an image which was never submitted, for
    /// instance because recording failed, that image is handed out again and
    /// nothing is waited on or acquired. The caller records the frame from
    /// scratch.
    ///
    /// # Params
    ///
    /// * `surface` - the surface to acquire an image from
    ///
    /// # Errors
    ///
    /// * `SurfaceStale` when the surface must be rebuilt. The slot is left
    ///   idle and the frame counter does not advance.
    /// * `GraphicsOperation` with stage `FenceReset` when the fence could not
    ///   be reset. The slot keeps its image and the next call retries the
    ///   reset.
    pub fn begin_frame<S: PresentableSurface>(
        &mut self,
        surface: &S,
    ) -> Result<Frame, GraphicsError> {
        let slot_index = self.current_slot();
        let slot = &mut self.slots[slot_index];

        let (swapchain_image_index, suboptimal) = match slot.acquired {
            Some(acquired) => {
                log::debug!(
                    "Slot {} reuses unsubmitted swapchain image {}",
                    slot_index,
                    acquired.0
                );
                acquired
            }
            None => {
                // wait for this slot's previous submission to finish executing
                slot.graphics_commands_completed_fence
                    .wait(u64::MAX)
                    .map_err(GraphicsError::at(FrameStage::FenceWait))?;
                slot.state = SlotState::Acquiring;

                let status = unsafe {
                    // SAFE because the semaphore's last signal was consumed by
                    // the submission which the fence wait just observed.
                    surface.acquire_next_image(
                        u64::MAX,
                        slot.image_acquired_semaphore.raw(),
                    )
                };
                let acquired = match status {
                    Ok(SwapchainStatus::Index(index)) => (index, false),
                    Ok(SwapchainStatus::Suboptimal(index)) => {
                        log::debug!("Acquire Image: Swapchain suboptimal.");
                        (index, true)
                    }
                    Ok(SwapchainStatus::NeedsRebuild) => {
                        log::debug!(
                            "Acquire Image: Swapchain lost, needs rebuild."
                        );
                        slot.state = SlotState::Idle;
                        return Err(GraphicsError::SurfaceStale);
                    }
                    Err(result) => {
                        slot.state = SlotState::Idle;
                        return Err(GraphicsError::at(FrameStage::Acquire)(
                            result,
                        ));
                    }
                };
                slot.acquired = Some(acquired);
                acquired
            }
        };

        // only reset once an image is in hand, a failed acquire must leave the
        // fence signaled
        if slot.state == SlotState::Acquiring {
            slot.graphics_commands_completed_fence
                .reset()
                .map_err(GraphicsError::at(FrameStage::FenceReset))?;
            slot.state = SlotState::Recording;
        }

        log::trace!(
            "Frame {} using slot {} and swapchain image {}",
            self.frame_counter,
            slot_index,
            swapchain_image_index
        );

        Ok(Frame::new(
            slot_index,
            swapchain_image_index,
            slot.command_buffer.raw(),
            suboptimal,
        ))
    }

    /// Submit a frame's commands to the graphics queue and schedule the
    /// swapchain image for presentation.
    ///
    /// The frame counter advances as soon as the submission is accepted, even
    /// if presentation fails afterwards.
    ///
    /// # Params
    ///
    /// * `surface` - the surface the frame's image was acquired from
    /// * `frame` - the frame to present. Its command buffer must be fully
    ///   recorded.
    ///
    /// # Errors
    ///
    /// * `FrameSlotMismatch` when the frame belongs to another slot.
    /// * `FrameNotRecording` when the slot has no recorded image, either
    ///   because the frame was already submitted or because its fence reset
    ///   failed.
    pub fn submit_and_present<S: PresentableSurface>(
        &mut self,
        surface: &S,
        frame: Frame,
    ) -> Result<(), GraphicsError> {
        let slot_index = self.current_slot();
        if frame.slot_index() != slot_index {
            return Err(GraphicsError::FrameSlotMismatch {
                expected: slot_index,
                actual: frame.slot_index(),
            });
        }
        let slot = &mut self.slots[slot_index];
        if slot.state != SlotState::Recording || slot.acquired.is_none() {
            return Err(GraphicsError::FrameNotRecording { slot: slot_index });
        }

        let submission = SubmissionDescriptor {
            command_buffer: slot.command_buffer.raw(),
            wait_semaphore: slot.image_acquired_semaphore.raw(),
            wait_stage: vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT,
            signal_semaphore: slot.render_finished_semaphore.raw(),
            fence: slot.graphics_commands_completed_fence.raw(),
        };
        unsafe {
            // SAFE because the slot keeps every handle alive until its fence
            // is observed.
            self.device
                .submit_graphics_commands(&submission)
                .map_err(GraphicsError::at(FrameStage::Submit))?;
        }
        slot.state = SlotState::Submitted;
        slot.acquired = None;
        self.frame_counter += 1;

        let status = unsafe {
            surface.present_image(
                frame.swapchain_image_index(),
                slot.render_finished_semaphore.raw(),
            )
        };
        match status {
            Ok(SwapchainStatus::Index(_)) => Ok(()),
            Ok(SwapchainStatus::Suboptimal(_)) => {
                log::debug!("Present Image: Swapchain is suboptimal.");
                Ok(())
            }
            Ok(SwapchainStatus::NeedsRebuild) => {
                log::debug!("Present Image: Swapchain lost, needs rebuild.");
                Err(GraphicsError::SurfaceStale)
            }
            Err(result) => Err(GraphicsError::at(FrameStage::Present)(result)),
        }
    }

    /// Wait for every slot's submitted commands to finish executing on the
    /// GPU.
    ///
    /// Slots which hold an unsubmitted image have nothing pending and are
    /// skipped.
    pub fn wait_for_all_frames_to_complete(
        &mut self,
    ) -> Result<(), GraphicsError> {
        for slot in &mut self.slots {
            if slot.acquired.is_some() {
                continue;
            }
            slot.graphics_commands_completed_fence
                .wait(u64::MAX)
                .map_err(GraphicsError::at(FrameStage::FenceWait))?;
            slot.state = SlotState::Idle;
        }
        Ok(())
    }

    /// Destroy all frame resources.
    ///
    /// Every slot's fence, both semaphores, and command buffer are released
    /// no matter how many frames were rendered.
    ///
    /// # Safety
    ///
    /// Unsafe because:
    ///   - the application must synchronize the call to this method by waiting
    ///     for the device to idle
    pub unsafe fn shutdown(self) {
        log::debug!(
            "Destroying {} frames in flight after {} frames",
            self.slots.len(),
            self.frame_counter
        );
        let Self { slots, .. } = self;
        drop(slots);
    }
}

impl<D: DeviceContext> std::fmt::Debug for FrameSynchronizer<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let states: Vec<SlotState> =
            self.slots.iter().map(|slot| slot.state).collect();
        f.debug_struct("FrameSynchronizer")
            .field("frame_counter", &self.frame_counter)
            .field("slots", &states)
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::graphics::mock::{Call, MockDevice, MockSurface, Op, Scripted};

    fn extent() -> vk::Extent2D {
        vk::Extent2D {
            width: 800,
            height: 600,
        }
    }

    fn setup(
        frame_count: usize,
        image_count: usize,
    ) -> (Arc<MockDevice>, MockSurface, FrameSynchronizer<MockDevice>) {
        let device = MockDevice::new();
        let surface = MockSurface::new(&device, image_count, extent());
        let frames = FrameSynchronizer::new(device.clone(), frame_count).unwrap();
        (device, surface, frames)
    }

    /// Run one full frame, standing in for the recorder with a buffer reset.
    fn draw(
        device: &MockDevice,
        surface: &MockSurface,
        frames: &mut FrameSynchronizer<MockDevice>,
    ) -> Result<(usize, usize), GraphicsError> {
        let frame = frames.begin_frame(surface)?;
        unsafe {
            device
                .reset_command_buffer(frame.command_buffer())
                .unwrap();
        }
        let indices = (frame.slot_index(), frame.swapchain_image_index());
        frames.submit_and_present(surface, frame)?;
        Ok(indices)
    }

    fn submissions(device: &MockDevice) -> Vec<SubmissionDescriptor> {
        device
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Submit(submission) => Some(submission),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn zero_frames_in_flight_is_rejected() {
        let device = MockDevice::new();
        let result = FrameSynchronizer::new(device.clone(), 0);
        assert!(matches!(result, Err(GraphicsError::InvalidFrameCount(0))));
        assert!(device.calls().is_empty());
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn frame_counts_beyond_u32_are_rejected() {
        let device = MockDevice::new();
        let too_many = u32::MAX as usize + 1;
        let result = FrameSynchronizer::new(device.clone(), too_many);
        assert!(matches!(
            result,
            Err(GraphicsError::InvalidFrameCount(count)) if count == too_many
        ));
        assert!(device.calls().is_empty());
    }

    #[test]
    fn new_creates_every_slot_in_one_batch() {
        let (device, _surface, frames) = setup(3, 2);
        assert_eq!(frames.frames_in_flight(), 3);
        assert_eq!(
            device.count(|c| matches!(c, Call::AllocateCommandBuffers { .. })),
            1
        );
        assert!(device
            .calls()
            .contains(&Call::AllocateCommandBuffers { count: 3 }));
        assert_eq!(
            device.count(|c| matches!(
                c,
                Call::CreateFence { signaled: true, .. }
            )),
            3
        );
        assert_eq!(device.count(|c| matches!(c, Call::CreateSemaphore(_))), 6);
        for slot in 0..3 {
            assert_eq!(frames.slot_state(slot), Some(SlotState::Idle));
        }
        assert_eq!(frames.slot_state(3), None);
    }

    #[test]
    fn double_buffered_slots_alternate() {
        let (device, surface, mut frames) = setup(2, 3);
        let slots: Vec<usize> = (0..5)
            .map(|_| draw(&device, &surface, &mut frames).unwrap().0)
            .collect();
        assert_eq!(slots, vec![0, 1, 0, 1, 0]);
        assert_eq!(frames.frame_counter(), 5);
    }

    #[test]
    fn slots_cycle_for_any_frame_count() {
        for frame_count in 1..=4 {
            let (device, surface, mut frames) = setup(frame_count, 3);
            for expected in (0..9).map(|i| i % frame_count) {
                assert_eq!(frames.current_slot(), expected);
                let (slot, _) = draw(&device, &surface, &mut frames).unwrap();
                assert_eq!(slot, expected);
            }
        }
    }

    #[test]
    fn slot_and_image_indices_are_independent() {
        let (device, surface, mut frames) = setup(3, 2);
        let indices: Vec<(usize, usize)> = (0..4)
            .map(|_| draw(&device, &surface, &mut frames).unwrap())
            .collect();
        assert_eq!(indices, vec![(0, 0), (1, 1), (2, 0), (0, 1)]);
    }

    #[test]
    fn third_frame_waits_on_the_first_frames_fence() {
        let (device, surface, mut frames) = setup(2, 3);
        device.clear_calls();
        for _ in 0..5 {
            draw(&device, &surface, &mut frames).unwrap();
        }

        let calls = device.calls();
        let submits = submissions(&device);
        assert_eq!(submits[2].fence, submits[0].fence);
        assert_ne!(submits[1].fence, submits[0].fence);

        // frames 0 and 2 share a slot so their submissions compare equal,
        // locate them by order instead
        let submit_positions: Vec<usize> = calls
            .iter()
            .enumerate()
            .filter(|(_, c)| matches!(c, Call::Submit(_)))
            .map(|(i, _)| i)
            .collect();
        let (first_submit, third_submit) =
            (submit_positions[0], submit_positions[2]);
        assert!(first_submit < third_submit);

        let wait = calls[first_submit..third_submit]
            .iter()
            .position(|c| *c == Call::WaitFence(submits[0].fence))
            .map(|offset| first_submit + offset)
            .expect("frame 2 never waited on frame 0's fence");
        let reset = calls[wait..third_submit]
            .iter()
            .position(|c| {
                *c == Call::ResetCommandBuffer(submits[2].command_buffer)
            });
        assert!(reset.is_some(), "buffer reset before its fence was waited");
    }

    #[test]
    fn command_buffers_are_reset_only_after_their_fence_is_observed() {
        let frame_count = 2;
        let (device, surface, mut frames) = setup(frame_count, 3);
        device.clear_calls();
        for _ in 0..8 {
            draw(&device, &surface, &mut frames).unwrap();
        }

        let calls = device.calls();
        let submit_positions: Vec<usize> = calls
            .iter()
            .enumerate()
            .filter(|(_, c)| matches!(c, Call::Submit(_)))
            .map(|(i, _)| i)
            .collect();
        let reset_positions: Vec<usize> = calls
            .iter()
            .enumerate()
            .filter(|(_, c)| matches!(c, Call::ResetCommandBuffer(_)))
            .map(|(i, _)| i)
            .collect();
        let submits = submissions(&device);

        for f in frame_count..submits.len() {
            let previous = f - frame_count;
            let fence = submits[previous].fence;
            let waited = calls[submit_positions[previous]..reset_positions[f]]
                .contains(&Call::WaitFence(fence));
            assert!(waited, "frame {} reused a buffer still in flight", f);
        }
    }

    #[test]
    fn fence_is_waited_before_it_is_reset() {
        let (device, surface, mut frames) = setup(1, 2);
        device.clear_calls();
        draw(&device, &surface, &mut frames).unwrap();

        let calls = device.calls();
        let fence = submissions(&device)[0].fence;
        let wait = calls.iter().position(|c| *c == Call::WaitFence(fence));
        let acquire = calls
            .iter()
            .position(|c| matches!(c, Call::Acquire { .. }));
        let reset = calls.iter().position(|c| *c == Call::ResetFence(fence));
        assert!(wait < acquire);
        assert!(acquire < reset);
    }

    #[test]
    fn semaphores_chain_acquire_to_submit_to_present() {
        let (device, surface, mut frames) = setup(2, 3);
        device.clear_calls();
        for _ in 0..6 {
            draw(&device, &surface, &mut frames).unwrap();
        }

        let calls = device.calls();
        let acquires: Vec<(vk::Semaphore, usize)> = calls
            .iter()
            .filter_map(|c| match *c {
                Call::Acquire {
                    signal,
                    image_index: Some(index),
                } => Some((signal, index)),
                _ => None,
            })
            .collect();
        let presents: Vec<(vk::Semaphore, usize)> = calls
            .iter()
            .filter_map(|c| match *c {
                Call::Present { image_index, wait } => Some((wait, image_index)),
                _ => None,
            })
            .collect();
        let submits = submissions(&device);
        assert_eq!(acquires.len(), 6);
        assert_eq!(presents.len(), 6);

        for ((acquire, submit), present) in
            acquires.iter().zip(&submits).zip(&presents)
        {
            assert_eq!(acquire.0, submit.wait_semaphore);
            assert_eq!(
                submit.wait_stage,
                vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT
            );
            assert_eq!(submit.signal_semaphore, present.0);
            assert_ne!(submit.wait_semaphore, submit.signal_semaphore);
            assert_eq!(acquire.1, present.1);
        }

        // neighbouring frames never share a semaphore
        for pair in submits.windows(2) {
            assert_ne!(pair[0].wait_semaphore, pair[1].wait_semaphore);
            assert_ne!(pair[0].signal_semaphore, pair[1].signal_semaphore);
        }
    }

    #[test]
    fn stale_surface_skips_only_that_tick() {
        let (device, surface, mut frames) = setup(2, 3);
        surface.on_acquire(3, Scripted::Stale);
        device.clear_calls();

        for tick in 1..=10 {
            let counter_before = frames.frame_counter();
            let submits_before = device.count(|c| matches!(c, Call::Submit(_)));
            let presents_before =
                device.count(|c| matches!(c, Call::Present { .. }));

            let result = draw(&device, &surface, &mut frames);

            if tick == 3 {
                assert!(matches!(result, Err(GraphicsError::SurfaceStale)));
                assert_eq!(frames.frame_counter(), counter_before);
                assert_eq!(
                    device.count(|c| matches!(c, Call::Submit(_))),
                    submits_before
                );
                assert_eq!(
                    device.count(|c| matches!(c, Call::Present { .. })),
                    presents_before
                );
                assert_eq!(
                    frames.slot_state(frames.current_slot()),
                    Some(SlotState::Idle)
                );
            } else {
                assert!(result.is_ok(), "tick {} failed: {:?}", tick, result);
            }
        }

        assert_eq!(frames.frame_counter(), 9);
        assert_eq!(device.count(|c| matches!(c, Call::Submit(_))), 9);
        assert_eq!(device.count(|c| matches!(c, Call::Present { .. })), 9);
    }

    #[test]
    fn suboptimal_acquire_still_produces_a_frame() {
        let (_device, surface, mut frames) = setup(2, 3);
        surface.on_acquire(1, Scripted::Suboptimal);

        let frame = frames.begin_frame(&surface).unwrap();
        assert!(frame.is_suboptimal());
        frames.submit_and_present(&surface, frame).unwrap();

        let frame = frames.begin_frame(&surface).unwrap();
        assert!(!frame.is_suboptimal());
    }

    #[test]
    fn suboptimal_present_is_not_an_error() {
        let (device, surface, mut frames) = setup(2, 3);
        surface.on_present(1, Scripted::Suboptimal);
        assert!(draw(&device, &surface, &mut frames).is_ok());
    }

    #[test]
    fn stale_present_is_reported_after_submission() {
        let (device, surface, mut frames) = setup(2, 3);
        surface.on_present(2, Scripted::Stale);
        draw(&device, &surface, &mut frames).unwrap();

        let result = draw(&device, &surface, &mut frames);
        assert!(matches!(result, Err(GraphicsError::SurfaceStale)));
        assert_eq!(frames.frame_counter(), 2);
    }

    #[test]
    fn fence_wait_failure_reports_the_stage() {
        let (device, surface, mut frames) = setup(2, 3);
        device.fail_on(Op::WaitFence, 1, vk::Result::ERROR_DEVICE_LOST);
        device.clear_calls();

        let result = frames.begin_frame(&surface);
        assert!(matches!(
            result,
            Err(GraphicsError::GraphicsOperation {
                stage: FrameStage::FenceWait,
                result: vk::Result::ERROR_DEVICE_LOST,
            })
        ));
        assert_eq!(device.count(|c| matches!(c, Call::Acquire { .. })), 0);
    }

    #[test]
    fn acquire_failure_leaves_the_fence_signaled() {
        let (device, surface, mut frames) = setup(1, 3);
        surface.on_acquire(1, Scripted::Fail(vk::Result::ERROR_SURFACE_LOST_KHR));
        device.clear_calls();

        let result = frames.begin_frame(&surface);
        assert!(matches!(
            result,
            Err(GraphicsError::GraphicsOperation {
                stage: FrameStage::Acquire,
                result: vk::Result::ERROR_SURFACE_LOST_KHR,
            })
        ));
        assert_eq!(device.count(|c| matches!(c, Call::ResetFence(_))), 0);
        assert_eq!(frames.slot_state(0), Some(SlotState::Idle));

        // the next attempt does not block on the untouched fence
        assert!(draw(&device, &surface, &mut frames).is_ok());
    }

    #[test]
    fn submit_failure_reports_the_stage() {
        let (device, surface, mut frames) = setup(2, 3);
        device.fail_on(Op::Submit, 1, vk::Result::ERROR_DEVICE_LOST);

        let result = draw(&device, &surface, &mut frames);
        assert!(matches!(
            result,
            Err(GraphicsError::GraphicsOperation {
                stage: FrameStage::Submit,
                result: vk::Result::ERROR_DEVICE_LOST,
            })
        ));
        assert_eq!(frames.frame_counter(), 0);
        assert_eq!(device.count(|c| matches!(c, Call::Present { .. })), 0);
        assert_eq!(frames.slot_state(0), Some(SlotState::Recording));
    }

    #[test]
    fn present_failure_reports_the_stage() {
        let (device, surface, mut frames) = setup(2, 3);
        surface.on_present(1, Scripted::Fail(vk::Result::ERROR_SURFACE_LOST_KHR));

        let result = draw(&device, &surface, &mut frames);
        assert!(matches!(
            result,
            Err(GraphicsError::GraphicsOperation {
                stage: FrameStage::Present,
                result: vk::Result::ERROR_SURFACE_LOST_KHR,
            })
        ));
        assert_eq!(frames.frame_counter(), 1);
    }

    #[test]
    fn beginning_a_recording_slot_reuses_its_image() {
        let (device, surface, mut frames) = setup(2, 3);
        let first = frames.begin_frame(&surface).unwrap();
        device.clear_calls();

        let again = frames.begin_frame(&surface).unwrap();
        assert_eq!(again.slot_index(), 0);
        assert_eq!(again.swapchain_image_index(), first.swapchain_image_index());
        assert_eq!(again.command_buffer(), first.command_buffer());
        assert!(device.calls().is_empty());
        assert_eq!(frames.slot_state(0), Some(SlotState::Recording));

        frames.submit_and_present(&surface, again).unwrap();
        assert_eq!(frames.frame_counter(), 1);
    }

    #[test]
    fn a_frame_cannot_be_submitted_twice() {
        let (device, surface, mut frames) = setup(1, 3);
        let frame = frames.begin_frame(&surface).unwrap();
        let copy = frames.begin_frame(&surface).unwrap();
        frames.submit_and_present(&surface, frame).unwrap();
        device.clear_calls();

        let result = frames.submit_and_present(&surface, copy);
        assert!(matches!(
            result,
            Err(GraphicsError::FrameNotRecording { slot: 0 })
        ));
        assert!(device.calls().is_empty());
        assert_eq!(frames.frame_counter(), 1);
    }

    #[test]
    fn fence_reset_failure_keeps_the_acquired_image() {
        let (device, surface, mut frames) = setup(1, 3);
        device.fail_on(Op::ResetFence, 1, vk::Result::ERROR_DEVICE_LOST);

        let result = frames.begin_frame(&surface);
        assert!(matches!(
            result,
            Err(GraphicsError::GraphicsOperation {
                stage: FrameStage::FenceReset,
                result: vk::Result::ERROR_DEVICE_LOST,
            })
        ));
        assert_eq!(frames.slot_state(0), Some(SlotState::Acquiring));
        let acquired_image = device
            .calls()
            .iter()
            .find_map(|c| match *c {
                Call::Acquire { image_index, .. } => image_index,
                _ => None,
            })
            .unwrap();

        // the retry resets the fence without acquiring a second image
        device.clear_calls();
        let frame = frames.begin_frame(&surface).unwrap();
        assert_eq!(frame.swapchain_image_index(), acquired_image);
        assert_eq!(device.count(|c| matches!(c, Call::Acquire { .. })), 0);
        assert_eq!(device.count(|c| matches!(c, Call::WaitFence(_))), 0);
        assert_eq!(device.count(|c| matches!(c, Call::ResetFence(_))), 1);
        assert_eq!(frames.slot_state(0), Some(SlotState::Recording));

        frames.submit_and_present(&surface, frame).unwrap();
        for _ in 0..3 {
            draw(&device, &surface, &mut frames).unwrap();
        }
        assert_eq!(frames.frame_counter(), 4);
    }

    #[test]
    fn frames_are_refused_while_the_fence_is_not_reset() {
        let (device, surface, mut frames) = setup(1, 3);
        let stale_frame = Frame::new(0, 0, vk::CommandBuffer::null(), false);
        device.fail_on(Op::ResetFence, 1, vk::Result::ERROR_DEVICE_LOST);
        assert!(frames.begin_frame(&surface).is_err());
        device.clear_calls();

        let result = frames.submit_and_present(&surface, stale_frame);
        assert!(matches!(
            result,
            Err(GraphicsError::FrameNotRecording { slot: 0 })
        ));
        assert!(device.calls().is_empty());
    }

    #[test]
    fn submit_failure_is_retried_with_the_same_image() {
        let (device, surface, mut frames) = setup(2, 3);
        device.fail_on(Op::Submit, 1, vk::Result::ERROR_DEVICE_LOST);
        assert!(draw(&device, &surface, &mut frames).is_err());

        let (slot, image) = draw(&device, &surface, &mut frames).unwrap();
        assert_eq!((slot, image), (0, 0));
        assert_eq!(frames.frame_counter(), 1);
        assert_eq!(device.count(|c| matches!(c, Call::Acquire { .. })), 1);
    }

    #[test]
    fn frames_from_another_slot_are_rejected() {
        let (device, surface, mut frames) = setup(2, 3);
        let _frame = frames.begin_frame(&surface).unwrap();
        device.clear_calls();

        let foreign = Frame::new(1, 0, vk::CommandBuffer::null(), false);
        let result = frames.submit_and_present(&surface, foreign);
        assert!(matches!(
            result,
            Err(GraphicsError::FrameSlotMismatch {
                expected: 0,
                actual: 1
            })
        ));
        assert!(device.calls().is_empty());
    }

    #[test]
    fn slot_state_follows_the_frame() {
        let (_device, surface, mut frames) = setup(2, 3);
        assert_eq!(frames.slot_state(0), Some(SlotState::Idle));

        let frame = frames.begin_frame(&surface).unwrap();
        assert_eq!(frames.slot_state(0), Some(SlotState::Recording));

        frames.submit_and_present(&surface, frame).unwrap();
        assert_eq!(frames.slot_state(0), Some(SlotState::Submitted));
        assert_eq!(frames.slot_state(1), Some(SlotState::Idle));

        frames.wait_for_all_frames_to_complete().unwrap();
        assert_eq!(frames.slot_state(0), Some(SlotState::Idle));
    }

    #[test]
    fn waiting_for_all_frames_skips_recording_slots() {
        let (device, surface, mut frames) = setup(2, 3);
        draw(&device, &surface, &mut frames).unwrap();
        let _frame = frames.begin_frame(&surface).unwrap();
        device.clear_calls();

        frames.wait_for_all_frames_to_complete().unwrap();
        assert_eq!(device.count(|c| matches!(c, Call::WaitFence(_))), 1);
        assert_eq!(frames.slot_state(1), Some(SlotState::Recording));
    }

    #[test]
    fn shutdown_releases_every_slot_resource() {
        for frame_count in 1..=3 {
            for frames_rendered in [0, 1, 2, 7] {
                let (device, surface, mut frames) = setup(frame_count, 3);
                for _ in 0..frames_rendered {
                    draw(&device, &surface, &mut frames).unwrap();
                }
                device.wait_idle().unwrap();
                device.clear_calls();

                unsafe { frames.shutdown() };

                assert_eq!(
                    device.count(|c| matches!(c, Call::DestroyFence(_))),
                    frame_count
                );
                assert_eq!(
                    device.count(|c| matches!(c, Call::DestroySemaphore(_))),
                    2 * frame_count
                );
                assert_eq!(
                    device.count(|c| matches!(c, Call::FreeCommandBuffer(_))),
                    frame_count
                );
            }
        }
    }
}
