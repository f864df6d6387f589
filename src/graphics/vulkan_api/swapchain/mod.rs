mod selection;

use std::sync::Arc;

use ash::vk;

use crate::graphics::vulkan_api::{
    DeviceContext, PresentableSurface, RenderDevice, SwapchainStatus,
    VulkanError,
};

/// The swapchain and the images it owns.
///
/// The swapchain is built once. A stale surface is reported through
/// [SwapchainStatus::NeedsRebuild] rather than rebuilt in place.
pub struct Swapchain {
    images: Vec<vk::Image>,
    format: vk::Format,
    extent: vk::Extent2D,
    swapchain_khr: vk::SwapchainKHR,
    render_device: Arc<RenderDevice>,
}

impl Swapchain {
    /// Create the swapchain for the render device's window surface.
    ///
    /// # Params
    ///
    /// * `render_device` - the device whose window surface is presented to
    /// * `window_size` - the window's size in pixels, used when the surface
    ///   leaves the extent up to the application
    pub fn new(
        render_device: Arc<RenderDevice>,
        window_size: (u32, u32),
    ) -> Result<Self, VulkanError> {
        let surface = render_device.window_surface();
        let physical_device = render_device.physical_device();
        let (formats, modes, capabilities) = unsafe {
            (
                surface.supported_formats(physical_device)?,
                surface.supported_presentation_modes(physical_device)?,
                surface.surface_capabilities(physical_device)?,
            )
        };

        let format = selection::choose_surface_format(&formats)
            .ok_or(VulkanError::NoSurfaceFormatsAvailable)?;
        let mode = selection::choose_present_mode(&modes);
        let extent = selection::choose_swap_extent(&capabilities, window_size);
        let image_count = selection::choose_image_count(&capabilities);

        let graphics_family = render_device.graphics_queue().family_index();
        let present_family = render_device.present_queue().family_index();
        let indices = [graphics_family, present_family];

        let mut create_info = vk::SwapchainCreateInfoKHR::default()
            .surface(surface.raw())
            .image_format(format.format)
            .image_color_space(format.color_space)
            .image_extent(extent)
            .min_image_count(image_count)
            .image_array_layers(1)
            .image_usage(vk::ImageUsageFlags::COLOR_ATTACHMENT)
            .present_mode(mode)
            .composite_alpha(vk::CompositeAlphaFlagsKHR::OPAQUE)
            .pre_transform(capabilities.current_transform)
            .clipped(true);
        create_info = if graphics_family == present_family {
            create_info.image_sharing_mode(vk::SharingMode::EXCLUSIVE)
        } else {
            create_info
                .image_sharing_mode(vk::SharingMode::CONCURRENT)
                .queue_family_indices(&indices)
        };

        let loader = render_device.swapchain_loader();
        let swapchain_khr = unsafe {
            loader
                .create_swapchain(&create_info, None)
                .map_err(VulkanError::UnableToCreateSwapchain)?
        };
        let images = match unsafe { loader.get_swapchain_images(swapchain_khr) }
        {
            Ok(images) => images,
            Err(error) => {
                unsafe { loader.destroy_swapchain(swapchain_khr, None) };
                return Err(VulkanError::UnableToGetSwapchainImages(error));
            }
        };
        render_device.set_debug_name(swapchain_khr, "Swapchain");
        for (i, &image) in images.iter().enumerate() {
            render_device.set_debug_name(image, &format!("Swapchain Image {}", i));
        }

        log::info!(
            "Created swapchain with {} images at {}x{} ({:?}, {:?})",
            images.len(),
            extent.width,
            extent.height,
            format.format,
            mode
        );

        Ok(Self {
            images,
            format: format.format,
            extent,
            swapchain_khr,
            render_device,
        })
    }
}

impl PresentableSurface for Swapchain {
    fn images(&self) -> &[vk::Image] {
        &self.images
    }

    fn format(&self) -> vk::Format {
        self.format
    }

    fn extent(&self) -> vk::Extent2D {
        self.extent
    }

    unsafe fn acquire_next_image(
        &self,
        timeout_ns: u64,
        signal: vk::Semaphore,
    ) -> Result<SwapchainStatus, vk::Result> {
        let result = self.render_device.swapchain_loader().acquire_next_image(
            self.swapchain_khr,
            timeout_ns,
            signal,
            vk::Fence::null(),
        );
        match result {
            Ok((index, false)) => Ok(SwapchainStatus::Index(index as usize)),

            // the semaphore is still signaled
            Ok((index, true)) => Ok(SwapchainStatus::Suboptimal(index as usize)),

            Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => {
                Ok(SwapchainStatus::NeedsRebuild)
            }
            Err(error) => Err(error),
        }
    }

    unsafe fn present_image(
        &self,
        image_index: usize,
        wait: vk::Semaphore,
    ) -> Result<SwapchainStatus, vk::Result> {
        let wait_semaphores = [wait];
        let swapchains = [self.swapchain_khr];
        let indices = [image_index as u32];
        let present_info = vk::PresentInfoKHR::default()
            .wait_semaphores(&wait_semaphores)
            .swapchains(&swapchains)
            .image_indices(&indices);
        let result = self
            .render_device
            .swapchain_loader()
            .queue_present(self.render_device.present_queue().raw(), &present_info);
        match result {
            Ok(false) => Ok(SwapchainStatus::Index(image_index)),
            Ok(true) => Ok(SwapchainStatus::Suboptimal(image_index)),
            Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => {
                Ok(SwapchainStatus::NeedsRebuild)
            }
            Err(error) => Err(error),
        }
    }
}

impl Drop for Swapchain {
    /// # Safety
    ///
    /// The application must ensure that all usage of the Swapchain is complete
    /// before dropping.
    fn drop(&mut self) {
        unsafe {
            self.render_device
                .swapchain_loader()
                .destroy_swapchain(self.swapchain_khr, None);
        }
    }
}

impl std::fmt::Debug for Swapchain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Swapchain")
            .field("swapchain_khr", &self.swapchain_khr)
            .field("image_count", &self.images.len())
            .field("format", &self.format)
            .field("extent", &self.extent)
            .finish()
    }
}
