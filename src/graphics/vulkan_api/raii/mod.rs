//! Owned Vulkan handles which are destroyed when dropped.
//!
//! Each wrapper keeps an `Arc` to the device which created it so the device
//! always outlives the handle.

mod command_buffer;
mod fence;
mod framebuffer;
mod image_view;
mod render_pass;
mod semaphore;

pub use self::{
    command_buffer::CommandBuffer, fence::Fence, framebuffer::Framebuffer,
    image_view::ImageView, render_pass::RenderPass, semaphore::Semaphore,
};
