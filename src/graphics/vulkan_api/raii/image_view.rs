use {
    crate::graphics::vulkan_api::{DeviceContext, VulkanError},
    ash::vk,
    std::sync::Arc,
};

/// A RAII Vulkan Image View.
pub struct ImageView<D: DeviceContext> {
    image_view: vk::ImageView,
    device: Arc<D>,
}

impl<D: DeviceContext> ImageView<D> {
    /// Create a 2D color view of a single-layer, single-mip image.
    ///
    /// # Safety
    ///
    /// Unsafe because:
    ///   - The image must outlive the Image View. For swapchain images this
    ///     means the view must be dropped before the swapchain.
    pub unsafe fn for_color_image(
        device: Arc<D>,
        image: vk::Image,
        format: vk::Format,
    ) -> Result<Self, VulkanError> {
        let create_info = vk::ImageViewCreateInfo {
            image,
            format,
            view_type: vk::ImageViewType::TYPE_2D,
            subresource_range: vk::ImageSubresourceRange {
                aspect_mask: vk::ImageAspectFlags::COLOR,
                base_mip_level: 0,
                level_count: 1,
                base_array_layer: 0,
                layer_count: 1,
            },
            components: vk::ComponentMapping {
                r: vk::ComponentSwizzle::IDENTITY,
                g: vk::ComponentSwizzle::IDENTITY,
                b: vk::ComponentSwizzle::IDENTITY,
                a: vk::ComponentSwizzle::IDENTITY,
            },
            ..Default::default()
        };
        let image_view = unsafe { device.create_image_view(&create_info)? };
        Ok(Self { image_view, device })
    }

    /// Set the debug name for how this resource appears in Vulkan logs.
    pub fn set_debug_name(&self, name: &str) {
        self.device.set_debug_name(self.image_view, name);
    }

    /// Get the raw Vulkan ImageView handle.
    pub fn raw(&self) -> vk::ImageView {
        self.image_view
    }
}

impl<D: DeviceContext> Drop for ImageView<D> {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_image_view(self.image_view);
        }
    }
}

impl<D: DeviceContext> std::fmt::Debug for ImageView<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageView")
            .field("image_view", &self.image_view)
            .finish()
    }
}
