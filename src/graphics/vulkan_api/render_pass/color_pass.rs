use std::sync::Arc;

use ash::vk;

use crate::graphics::vulkan_api::{
    DeviceContext, Framebuffer, ImageView, PresentableSurface, RenderPass,
    VulkanError,
};

/// A render pass plus one view and framebuffer for every image in a
/// presentable surface.
///
/// The color pass is single-sampled and does not have a depth/stencil buffer.
pub struct ColorPass<D: DeviceContext> {
    extent: vk::Extent2D,
    format: vk::Format,

    // drop order matters: framebuffers, then views, then the render pass
    framebuffers: Vec<Framebuffer<D>>,
    image_views: Vec<ImageView<D>>,
    render_pass: RenderPass<D>,
}

// Public API
// ----------

impl<D: DeviceContext> ColorPass<D> {
    /// Create a render pass with a single color attachment which can target
    /// every image in the surface.
    ///
    /// # Params
    ///
    /// * `device` - the device used to create Vulkan resources
    /// * `surface` - provides the images, format, and extent to target
    ///
    /// # Safety
    ///
    /// Unsafe because:
    ///  - the framebuffers are only valid while the surface's images exist
    ///  - the targeted images MUST outlive the ColorPass.
    pub unsafe fn new<S: PresentableSurface>(
        device: Arc<D>,
        surface: &S,
    ) -> Result<Self, VulkanError> {
        let format = surface.format();
        let extent = surface.extent();

        let render_pass = unsafe { Self::create_render_pass(&device, format)? };
        render_pass.set_debug_name("Color Pass");

        let image_views = surface
            .images()
            .iter()
            .enumerate()
            .map(|(index, &image)| {
                let view = unsafe {
                    ImageView::for_color_image(device.clone(), image, format)?
                };
                view.set_debug_name(&format!("Swapchain Image View {index}"));
                Ok(view)
            })
            .collect::<Result<Vec<_>, VulkanError>>()?;

        let framebuffers = image_views
            .iter()
            .enumerate()
            .map(|(index, view)| {
                let attachments = [view.raw()];
                let create_info = vk::FramebufferCreateInfo::default()
                    .render_pass(render_pass.raw())
                    .attachments(&attachments)
                    .width(extent.width)
                    .height(extent.height)
                    .layers(1);
                let framebuffer =
                    unsafe { Framebuffer::new(device.clone(), &create_info)? };
                framebuffer
                    .set_debug_name(&format!("Swapchain Framebuffer {index}"));
                Ok(framebuffer)
            })
            .collect::<Result<Vec<_>, VulkanError>>()?;

        log::debug!(
            "Created a color pass with {} framebuffers at {}x{}",
            framebuffers.len(),
            extent.width,
            extent.height
        );

        Ok(Self {
            extent,
            format,
            framebuffers,
            image_views,
            render_pass,
        })
    }

    /// The size of every framebuffer.
    pub fn extent(&self) -> vk::Extent2D {
        self.extent
    }

    /// The color attachment format.
    pub fn format(&self) -> vk::Format {
        self.format
    }

    /// The raw render pass handle.
    pub fn render_pass(&self) -> vk::RenderPass {
        self.render_pass.raw()
    }

    /// The framebuffer targeting the surface image at `image_index`.
    pub fn framebuffer(&self, image_index: usize) -> Option<vk::Framebuffer> {
        self.framebuffers.get(image_index).map(Framebuffer::raw)
    }

    /// The number of framebuffers, always equal to the surface's image count.
    pub fn framebuffer_count(&self) -> usize {
        self.framebuffers.len()
    }

    /// The number of image views, always equal to the surface's image count.
    pub fn image_view_count(&self) -> usize {
        self.image_views.len()
    }
}

// Private API
// -----------

impl<D: DeviceContext> ColorPass<D> {
    /// Create a render pass with a single subpass which clears the color
    /// attachment and leaves it ready for presentation.
    ///
    /// # Safety
    ///
    /// Unsafe because:
    ///   - the render pass must not be dropped while any pending command
    ///     buffer references it.
    unsafe fn create_render_pass(
        device: &Arc<D>,
        format: vk::Format,
    ) -> Result<RenderPass<D>, VulkanError> {
        let attachments = [vk::AttachmentDescription {
            flags: vk::AttachmentDescriptionFlags::empty(),
            format,
            samples: vk::SampleCountFlags::TYPE_1,
            load_op: vk::AttachmentLoadOp::CLEAR,
            store_op: vk::AttachmentStoreOp::STORE,
            stencil_load_op: vk::AttachmentLoadOp::DONT_CARE,
            stencil_store_op: vk::AttachmentStoreOp::DONT_CARE,
            initial_layout: vk::ImageLayout::UNDEFINED,
            final_layout: vk::ImageLayout::PRESENT_SRC_KHR,
        }];
        let color_attachment_references = [vk::AttachmentReference {
            attachment: 0,
            layout: vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL,
        }];
        let subpasses = [vk::SubpassDescription::default()
            .pipeline_bind_point(vk::PipelineBindPoint::GRAPHICS)
            .color_attachments(&color_attachment_references)];

        // The acquire semaphore is waited at COLOR_ATTACHMENT_OUTPUT, so the
        // layout transition out of UNDEFINED has to wait for that stage too.
        let dependencies = [vk::SubpassDependency {
            src_subpass: vk::SUBPASS_EXTERNAL,
            dst_subpass: 0,
            src_stage_mask: vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT,
            dst_stage_mask: vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT,
            src_access_mask: vk::AccessFlags::empty(),
            dst_access_mask: vk::AccessFlags::COLOR_ATTACHMENT_WRITE,
            dependency_flags: vk::DependencyFlags::empty(),
        }];

        let create_info = vk::RenderPassCreateInfo::default()
            .attachments(&attachments)
            .subpasses(&subpasses)
            .dependencies(&dependencies);
        unsafe { RenderPass::new(device.clone(), &create_info) }
    }
}

impl<D: DeviceContext> std::fmt::Debug for ColorPass<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColorPass")
            .field("extent", &self.extent)
            .field("format", &self.format)
            .field("render_pass", &self.render_pass)
            .field("framebuffers", &self.framebuffers)
            .finish()
    }
}
