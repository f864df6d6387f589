use ash::vk;

/// The outcome of a successful acquire or present call.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub enum SwapchainStatus {
    /// Completed the operation with the given swapchain image index.
    Index(usize),

    /// Completed the operation with the given swapchain image index, but the
    /// surface no longer matches the swapchain exactly. Any semaphore passed
    /// to the call is still signaled or consumed.
    Suboptimal(usize),

    /// The surface changed and the swapchain can no longer be used. Nothing
    /// was acquired or presented.
    NeedsRebuild,
}

/// A chain of presentable images shared with the window system's compositor.
///
/// The images are owned by the surface. Callers only ever see image indices
/// and the raw image handles used to build views.
pub trait PresentableSurface {
    /// The raw images in the chain, ordered by image index.
    fn images(&self) -> &[vk::Image];

    /// The pixel format of every image in the chain.
    fn format(&self) -> vk::Format;

    /// The size of every image in the chain.
    fn extent(&self) -> vk::Extent2D;

    /// The number of images in the chain.
    fn image_count(&self) -> usize {
        self.images().len()
    }

    /// Request the next image which is free for rendering.
    ///
    /// The CPU does not wait for the image. `signal` is signaled by the
    /// presentation engine once the image is actually available.
    ///
    /// # Params
    ///
    /// * `timeout_ns` - how long to wait for an image index to become known.
    /// * `signal` - the semaphore to signal when the image can be written.
    ///
    /// # Safety
    ///
    /// Unsafe because:
    ///   - `signal` must be unsignaled with no pending signal operation.
    unsafe fn acquire_next_image(
        &self,
        timeout_ns: u64,
        signal: vk::Semaphore,
    ) -> Result<SwapchainStatus, vk::Result>;

    /// Queue an image for display once `wait` is signaled.
    ///
    /// # Safety
    ///
    /// Unsafe because:
    ///   - `image_index` must have been acquired and not yet presented.
    ///   - the image must be in `PRESENT_SRC_KHR` layout by the time `wait`
    ///     signals. Typically this is done with a Render Pass.
    unsafe fn present_image(
        &self,
        image_index: usize,
        wait: vk::Semaphore,
    ) -> Result<SwapchainStatus, vk::Result>;
}
