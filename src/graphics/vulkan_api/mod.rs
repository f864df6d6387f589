//! Vulkan bootstrap and the RAII wrappers used by the frame loop.

mod device_context;
mod error;
mod ffi;
mod instance;
mod pipeline;
mod presentable_surface;
mod raii;
mod render_device;
mod render_pass;
mod swapchain;

pub use self::{
    device_context::{DeviceContext, SubmissionDescriptor},
    error::VulkanError,
    instance::Instance,
    pipeline::{GraphicsPipeline, ShaderModule},
    presentable_surface::{PresentableSurface, SwapchainStatus},
    raii::{CommandBuffer, Fence, Framebuffer, ImageView, RenderPass, Semaphore},
    render_device::{DeviceQueue, QueueFamilies, RenderDevice, WindowSurface},
    render_pass::ColorPass,
    swapchain::Swapchain,
};
