//! A recording stand-in for the GPU.
//!
//! `MockDevice` logs every call it receives and emulates just enough of the
//! fence and binary semaphore rules to catch ordering mistakes. Misuse which
//! a real driver would turn into undefined behavior panics immediately.

use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    sync::Arc,
};

use ash::vk::{self, Handle};

use crate::graphics::vulkan_api::{
    DeviceContext, PresentableSurface, SubmissionDescriptor, SwapchainStatus,
    VulkanError,
};

/// One logged interaction with the mock GPU.
#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) enum Call {
    CreateFence { fence: vk::Fence, signaled: bool },
    DestroyFence(vk::Fence),
    WaitFence(vk::Fence),
    ResetFence(vk::Fence),
    CreateSemaphore(vk::Semaphore),
    DestroySemaphore(vk::Semaphore),
    AllocateCommandBuffers { count: u32 },
    FreeCommandBuffer(vk::CommandBuffer),
    CreateImageView(vk::ImageView),
    DestroyImageView(vk::ImageView),
    CreateRenderPass(vk::RenderPass),
    DestroyRenderPass(vk::RenderPass),
    CreateFramebuffer(vk::Framebuffer),
    DestroyFramebuffer(vk::Framebuffer),
    ResetCommandBuffer(vk::CommandBuffer),
    BeginCommandBuffer {
        command_buffer: vk::CommandBuffer,
        usage: vk::CommandBufferUsageFlags,
    },
    EndCommandBuffer(vk::CommandBuffer),
    BeginRenderPass {
        command_buffer: vk::CommandBuffer,
        render_pass: vk::RenderPass,
        framebuffer: vk::Framebuffer,
        /// (x, y, width, height)
        area: (i32, i32, u32, u32),
        clear_color: [f32; 4],
    },
    SetViewport {
        command_buffer: vk::CommandBuffer,
        /// (x, y, width, height, min_depth, max_depth)
        viewport: [f32; 6],
    },
    SetScissor {
        command_buffer: vk::CommandBuffer,
        /// (x, y, width, height)
        scissor: (i32, i32, u32, u32),
    },
    BindPipeline {
        command_buffer: vk::CommandBuffer,
        pipeline: vk::Pipeline,
    },
    Draw {
        command_buffer: vk::CommandBuffer,
        vertex_count: u32,
        instance_count: u32,
    },
    EndRenderPass(vk::CommandBuffer),
    Submit(SubmissionDescriptor),
    Acquire {
        signal: vk::Semaphore,
        image_index: Option<usize>,
    },
    Present {
        image_index: usize,
        wait: vk::Semaphore,
    },
    WaitIdle,
}

/// Operations which can be told to fail.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub(crate) enum Op {
    WaitFence,
    ResetFence,
    ResetCommandBuffer,
    BeginCommandBuffer,
    EndCommandBuffer,
    Submit,
}

#[derive(Debug, Copy, Clone, Default)]
struct FenceState {
    signaled: bool,

    /// Submitted work will signal the fence the next time it is observed.
    pending: bool,
}

#[derive(Default)]
struct MockState {
    last_handle: u64,
    calls: Vec<Call>,
    fences: HashMap<vk::Fence, FenceState>,
    semaphores: HashMap<vk::Semaphore, bool>,
    in_flight: HashMap<vk::CommandBuffer, vk::Fence>,
    op_counts: HashMap<Op, usize>,
    failures: Vec<(Op, usize, vk::Result)>,
}

impl MockState {
    fn next_handle<H: Handle>(&mut self) -> H {
        self.last_handle += 1;
        H::from_raw(self.last_handle)
    }

    /// Count one use of `op` and report any failure scheduled for it.
    fn injected(&mut self, op: Op) -> Option<vk::Result> {
        let count = self.op_counts.entry(op).or_insert(0);
        *count += 1;
        let count = *count;
        self.failures
            .iter()
            .find(|(failing_op, nth, _)| *failing_op == op && *nth == count)
            .map(|(_, _, result)| *result)
    }

    fn assert_not_in_flight(&self, command_buffer: vk::CommandBuffer) {
        assert!(
            !self.in_flight.contains_key(&command_buffer),
            "{:?} used while its submission is still in flight",
            command_buffer
        );
    }
}

pub(crate) struct MockDevice {
    state: RefCell<MockState>,
}

impl MockDevice {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            state: RefCell::new(MockState::default()),
        })
    }

    /// Make the `nth` (1-based) use of `op` return `result`.
    pub(crate) fn fail_on(&self, op: Op, nth: usize, result: vk::Result) {
        self.state.borrow_mut().failures.push((op, nth, result));
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub(crate) fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.state
            .borrow()
            .calls
            .iter()
            .filter(|call| predicate(call))
            .count()
    }

    pub(crate) fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    pub(crate) fn new_handle<H: Handle>(&self) -> H {
        self.state.borrow_mut().next_handle()
    }

    fn record(&self, call: Call) {
        self.state.borrow_mut().calls.push(call);
    }

    fn signal_semaphore(&self, semaphore: vk::Semaphore) {
        let mut state = self.state.borrow_mut();
        let signaled = state
            .semaphores
            .get_mut(&semaphore)
            .unwrap_or_else(|| panic!("unknown semaphore {:?}", semaphore));
        assert!(!*signaled, "{:?} signaled twice", semaphore);
        *signaled = true;
    }

    fn consume_semaphore(&self, semaphore: vk::Semaphore) {
        let mut state = self.state.borrow_mut();
        let signaled = state
            .semaphores
            .get_mut(&semaphore)
            .unwrap_or_else(|| panic!("unknown semaphore {:?}", semaphore));
        assert!(
            *signaled,
            "waiting on {:?} which has no pending signal",
            semaphore
        );
        *signaled = false;
    }
}

fn rect_tuple(rect: vk::Rect2D) -> (i32, i32, u32, u32) {
    (
        rect.offset.x,
        rect.offset.y,
        rect.extent.width,
        rect.extent.height,
    )
}

impl DeviceContext for MockDevice {
    unsafe fn create_fence(
        &self,
        signaled: bool,
    ) -> Result<vk::Fence, VulkanError> {
        let mut state = self.state.borrow_mut();
        let fence: vk::Fence = state.next_handle();
        state.fences.insert(
            fence,
            FenceState {
                signaled,
                pending: false,
            },
        );
        state.calls.push(Call::CreateFence { fence, signaled });
        Ok(fence)
    }

    unsafe fn destroy_fence(&self, fence: vk::Fence) {
        let mut state = self.state.borrow_mut();
        state.fences.remove(&fence);
        state.calls.push(Call::DestroyFence(fence));
    }

    fn wait_for_fence(
        &self,
        fence: vk::Fence,
        _timeout_ns: u64,
    ) -> Result<(), vk::Result> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::WaitFence(fence));
        if let Some(result) = state.injected(Op::WaitFence) {
            return Err(result);
        }

        let fence_state = state
            .fences
            .get_mut(&fence)
            .unwrap_or_else(|| panic!("unknown fence {:?}", fence));
        if fence_state.pending {
            fence_state.pending = false;
            fence_state.signaled = true;
        }
        if !fence_state.signaled {
            // nothing will ever signal this fence
            return Err(vk::Result::TIMEOUT);
        }

        state.in_flight.retain(|_, in_flight_fence| *in_flight_fence != fence);
        Ok(())
    }

    fn reset_fence(&self, fence: vk::Fence) -> Result<(), vk::Result> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::ResetFence(fence));
        if let Some(result) = state.injected(Op::ResetFence) {
            return Err(result);
        }
        let fence_state = state
            .fences
            .get_mut(&fence)
            .unwrap_or_else(|| panic!("unknown fence {:?}", fence));
        assert!(!fence_state.pending, "{:?} reset while in use", fence);
        fence_state.signaled = false;
        Ok(())
    }

    unsafe fn create_semaphore(&self) -> Result<vk::Semaphore, VulkanError> {
        let mut state = self.state.borrow_mut();
        let semaphore: vk::Semaphore = state.next_handle();
        state.semaphores.insert(semaphore, false);
        state.calls.push(Call::CreateSemaphore(semaphore));
        Ok(semaphore)
    }

    unsafe fn destroy_semaphore(&self, semaphore: vk::Semaphore) {
        let mut state = self.state.borrow_mut();
        state.semaphores.remove(&semaphore);
        state.calls.push(Call::DestroySemaphore(semaphore));
    }

    unsafe fn allocate_command_buffers(
        &self,
        count: u32,
    ) -> Result<Vec<vk::CommandBuffer>, VulkanError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::AllocateCommandBuffers { count });
        Ok((0..count).map(|_| state.next_handle()).collect())
    }

    unsafe fn free_command_buffers(&self, command_buffers: &[vk::CommandBuffer]) {
        let mut state = self.state.borrow_mut();
        for &command_buffer in command_buffers {
            state.in_flight.remove(&command_buffer);
            state.calls.push(Call::FreeCommandBuffer(command_buffer));
        }
    }

    unsafe fn create_image_view(
        &self,
        _create_info: &vk::ImageViewCreateInfo<'_>,
    ) -> Result<vk::ImageView, VulkanError> {
        let mut state = self.state.borrow_mut();
        let image_view = state.next_handle();
        state.calls.push(Call::CreateImageView(image_view));
        Ok(image_view)
    }

    unsafe fn destroy_image_view(&self, image_view: vk::ImageView) {
        self.record(Call::DestroyImageView(image_view));
    }

    unsafe fn create_render_pass(
        &self,
        _create_info: &vk::RenderPassCreateInfo<'_>,
    ) -> Result<vk::RenderPass, VulkanError> {
        let mut state = self.state.borrow_mut();
        let render_pass = state.next_handle();
        state.calls.push(Call::CreateRenderPass(render_pass));
        Ok(render_pass)
    }

    unsafe fn destroy_render_pass(&self, render_pass: vk::RenderPass) {
        self.record(Call::DestroyRenderPass(render_pass));
    }

    unsafe fn create_framebuffer(
        &self,
        _create_info: &vk::FramebufferCreateInfo<'_>,
    ) -> Result<vk::Framebuffer, VulkanError> {
        let mut state = self.state.borrow_mut();
        let framebuffer = state.next_handle();
        state.calls.push(Call::CreateFramebuffer(framebuffer));
        Ok(framebuffer)
    }

    unsafe fn destroy_framebuffer(&self, framebuffer: vk::Framebuffer) {
        self.record(Call::DestroyFramebuffer(framebuffer));
    }

    unsafe fn reset_command_buffer(
        &self,
        command_buffer: vk::CommandBuffer,
    ) -> Result<(), vk::Result> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::ResetCommandBuffer(command_buffer));
        if let Some(result) = state.injected(Op::ResetCommandBuffer) {
            return Err(result);
        }
        state.assert_not_in_flight(command_buffer);
        Ok(())
    }

    unsafe fn begin_command_buffer(
        &self,
        command_buffer: vk::CommandBuffer,
        usage: vk::CommandBufferUsageFlags,
    ) -> Result<(), vk::Result> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::BeginCommandBuffer {
            command_buffer,
            usage,
        });
        if let Some(result) = state.injected(Op::BeginCommandBuffer) {
            return Err(result);
        }
        state.assert_not_in_flight(command_buffer);
        Ok(())
    }

    unsafe fn end_command_buffer(
        &self,
        command_buffer: vk::CommandBuffer,
    ) -> Result<(), vk::Result> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::EndCommandBuffer(command_buffer));
        match state.injected(Op::EndCommandBuffer) {
            Some(result) => Err(result),
            None => Ok(()),
        }
    }

    unsafe fn cmd_begin_render_pass(
        &self,
        command_buffer: vk::CommandBuffer,
        render_pass: vk::RenderPass,
        framebuffer: vk::Framebuffer,
        render_area: vk::Rect2D,
        clear_color: [f32; 4],
    ) {
        self.record(Call::BeginRenderPass {
            command_buffer,
            render_pass,
            framebuffer,
            area: rect_tuple(render_area),
            clear_color,
        });
    }

    unsafe fn cmd_set_viewport(
        &self,
        command_buffer: vk::CommandBuffer,
        viewport: vk::Viewport,
    ) {
        self.record(Call::SetViewport {
            command_buffer,
            viewport: [
                viewport.x,
                viewport.y,
                viewport.width,
                viewport.height,
                viewport.min_depth,
                viewport.max_depth,
            ],
        });
    }

    unsafe fn cmd_set_scissor(
        &self,
        command_buffer: vk::CommandBuffer,
        scissor: vk::Rect2D,
    ) {
        self.record(Call::SetScissor {
            command_buffer,
            scissor: rect_tuple(scissor),
        });
    }

    unsafe fn cmd_bind_graphics_pipeline(
        &self,
        command_buffer: vk::CommandBuffer,
        pipeline: vk::Pipeline,
    ) {
        self.record(Call::BindPipeline {
            command_buffer,
            pipeline,
        });
    }

    unsafe fn cmd_draw(
        &self,
        command_buffer: vk::CommandBuffer,
        vertex_count: u32,
        instance_count: u32,
    ) {
        self.record(Call::Draw {
            command_buffer,
            vertex_count,
            instance_count,
        });
    }

    unsafe fn cmd_end_render_pass(&self, command_buffer: vk::CommandBuffer) {
        self.record(Call::EndRenderPass(command_buffer));
    }

    unsafe fn submit_graphics_commands(
        &self,
        submission: &SubmissionDescriptor,
    ) -> Result<(), vk::Result> {
        {
            let mut state = self.state.borrow_mut();
            state.calls.push(Call::Submit(*submission));
            if let Some(result) = state.injected(Op::Submit) {
                return Err(result);
            }

            state.assert_not_in_flight(submission.command_buffer);
            let fence_state = state
                .fences
                .get_mut(&submission.fence)
                .unwrap_or_else(|| {
                    panic!("unknown fence {:?}", submission.fence)
                });
            assert!(
                !fence_state.signaled && !fence_state.pending,
                "{:?} submitted while signaled or in use",
                submission.fence
            );
            fence_state.pending = true;
            state
                .in_flight
                .insert(submission.command_buffer, submission.fence);
        }
        self.consume_semaphore(submission.wait_semaphore);
        self.signal_semaphore(submission.signal_semaphore);
        Ok(())
    }

    fn wait_idle(&self) -> Result<(), VulkanError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::WaitIdle);
        for fence_state in state.fences.values_mut() {
            if fence_state.pending {
                fence_state.pending = false;
                fence_state.signaled = true;
            }
        }
        state.in_flight.clear();
        Ok(())
    }
}

/// A scripted outcome for one acquire or present call.
#[derive(Debug, Copy, Clone)]
pub(crate) enum Scripted {
    Stale,
    Suboptimal,
    Fail(vk::Result),
}

/// A swapchain stand-in which hands out images round-robin.
pub(crate) struct MockSurface {
    device: Arc<MockDevice>,
    images: Vec<vk::Image>,
    extent: vk::Extent2D,
    next_image: Cell<usize>,
    acquire_count: Cell<usize>,
    present_count: Cell<usize>,
    acquire_script: RefCell<HashMap<usize, Scripted>>,
    present_script: RefCell<HashMap<usize, Scripted>>,
}

impl MockSurface {
    pub(crate) fn new(
        device: &Arc<MockDevice>,
        image_count: usize,
        extent: vk::Extent2D,
    ) -> Self {
        let images = (0..image_count).map(|_| device.new_handle()).collect();
        Self {
            device: device.clone(),
            images,
            extent,
            next_image: Cell::new(0),
            acquire_count: Cell::new(0),
            present_count: Cell::new(0),
            acquire_script: RefCell::new(HashMap::new()),
            present_script: RefCell::new(HashMap::new()),
        }
    }

    /// Script the `nth` (1-based) acquire call.
    pub(crate) fn on_acquire(&self, nth: usize, outcome: Scripted) {
        self.acquire_script.borrow_mut().insert(nth, outcome);
    }

    /// Script the `nth` (1-based) present call.
    pub(crate) fn on_present(&self, nth: usize, outcome: Scripted) {
        self.present_script.borrow_mut().insert(nth, outcome);
    }

    fn take_next_image(&self) -> usize {
        let index = self.next_image.get();
        self.next_image.set((index + 1) % self.images.len());
        index
    }
}

impl PresentableSurface for MockSurface {
    fn images(&self) -> &[vk::Image] {
        &self.images
    }

    fn format(&self) -> vk::Format {
        vk::Format::B8G8R8A8_SRGB
    }

    fn extent(&self) -> vk::Extent2D {
        self.extent
    }

    unsafe fn acquire_next_image(
        &self,
        _timeout_ns: u64,
        signal: vk::Semaphore,
    ) -> Result<SwapchainStatus, vk::Result> {
        let nth = self.acquire_count.get() + 1;
        self.acquire_count.set(nth);

        let scripted = self.acquire_script.borrow().get(&nth).copied();
        match scripted {
            Some(Scripted::Stale) => {
                self.device.record(Call::Acquire {
                    signal,
                    image_index: None,
                });
                Ok(SwapchainStatus::NeedsRebuild)
            }
            Some(Scripted::Fail(result)) => {
                self.device.record(Call::Acquire {
                    signal,
                    image_index: None,
                });
                Err(result)
            }
            Some(Scripted::Suboptimal) | None => {
                let index = self.take_next_image();
                self.device.record(Call::Acquire {
                    signal,
                    image_index: Some(index),
                });
                self.device.signal_semaphore(signal);
                if scripted.is_some() {
                    Ok(SwapchainStatus::Suboptimal(index))
                } else {
                    Ok(SwapchainStatus::Index(index))
                }
            }
        }
    }

    unsafe fn present_image(
        &self,
        image_index: usize,
        wait: vk::Semaphore,
    ) -> Result<SwapchainStatus, vk::Result> {
        let nth = self.present_count.get() + 1;
        self.present_count.set(nth);

        self.device.record(Call::Present { image_index, wait });
        self.device.consume_semaphore(wait);

        match self.present_script.borrow().get(&nth).copied() {
            Some(Scripted::Stale) => Ok(SwapchainStatus::NeedsRebuild),
            Some(Scripted::Suboptimal) => {
                Ok(SwapchainStatus::Suboptimal(image_index))
            }
            Some(Scripted::Fail(result)) => Err(result),
            None => Ok(SwapchainStatus::Index(image_index)),
        }
    }
}
