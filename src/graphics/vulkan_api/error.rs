use std::path::PathBuf;

use ash::vk;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VulkanError {
    #[error("Unable to load the Vulkan library")]
    UnableToLoadVulkan(#[from] ash::LoadingError),

    #[error("A required name contained an interior nul byte")]
    InvalidCString(#[from] std::ffi::NulError),

    #[error("The following extensions are required but unavailable {:?}", .0)]
    RequiredExtensionsNotFound(Vec<String>),

    #[error("Unable to get the available Vulkan extensions {:?}", .0)]
    UnableToListAvailableExtensions(#[source] vk::Result),

    #[error("Unable to get the window system's required extensions {:?}", .0)]
    UnableToListWindowExtensions(#[source] vk::Result),

    #[error("The following layers are required but unavailable {:?}", .0)]
    RequiredLayersNotFound(Vec<String>),

    #[error("Unable to get the available Vulkan layers {:?}", .0)]
    UnableToListAvailableLayers(#[source] vk::Result),

    #[error("Unable to create a Vulkan instance {:?}", .0)]
    UnableToCreateInstance(#[source] vk::Result),

    #[error("Unable to create the Vulkan debug messenger {:?}", .0)]
    UnableToCreateDebugMessenger(#[source] vk::Result),

    #[error("Unable to create the window surface {:?}", .0)]
    UnableToCreateSurface(#[source] vk::Result),

    #[error("Unable to enumerate physical devices {:?}", .0)]
    UnableToEnumeratePhysicalDevices(#[source] vk::Result),

    #[error("No physical device supports graphics and presentation")]
    NoSuitableDeviceFound,

    #[error("Unable to create the logical device {:?}", .0)]
    UnableToCreateLogicalDevice(#[source] vk::Result),

    #[error("Unable to wait for the device to idle {:?}", .0)]
    UnableToWaitForDeviceToIdle(#[source] vk::Result),

    #[error("Unable to read surface capabilities {:?}", .0)]
    UnableToGetSurfaceCapabilities(#[source] vk::Result),

    #[error("Unable to read surface formats {:?}", .0)]
    UnableToGetSurfaceFormats(#[source] vk::Result),

    #[error("The surface does not report any supported formats")]
    NoSurfaceFormatsAvailable,

    #[error("Unable to read surface presentation modes {:?}", .0)]
    UnableToGetPresentModes(#[source] vk::Result),

    #[error("Unable to create the swapchain {:?}", .0)]
    UnableToCreateSwapchain(#[source] vk::Result),

    #[error("Unable to get the swapchain images {:?}", .0)]
    UnableToGetSwapchainImages(#[source] vk::Result),

    #[error("Unable to create a fence {:?}", .0)]
    UnableToCreateFence(#[source] vk::Result),

    #[error("Unable to create a semaphore {:?}", .0)]
    UnableToCreateSemaphore(#[source] vk::Result),

    #[error("Unable to create the command pool {:?}", .0)]
    UnableToCreateCommandPool(#[source] vk::Result),

    #[error("Unable to allocate command buffers {:?}", .0)]
    UnableToAllocateCommandBuffers(#[source] vk::Result),

    #[error("Unable to create an image view {:?}", .0)]
    UnableToCreateImageView(#[source] vk::Result),

    #[error("Unable to create a render pass {:?}", .0)]
    UnableToCreateRenderPass(#[source] vk::Result),

    #[error("Unable to create a framebuffer {:?}", .0)]
    UnableToCreateFramebuffer(#[source] vk::Result),

    #[error("Unable to read the shader at {:?}", .path)]
    UnableToReadShaderFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("SPIR-V source length must be a multiple of 4, got {} bytes", .0)]
    InvalidSourceLengthInShaderSPIRV(usize),

    #[error("Unable to create a shader module {:?}", .0)]
    UnableToCreateShaderModule(#[source] vk::Result),

    #[error("Unable to create a pipeline layout {:?}", .0)]
    UnableToCreatePipelineLayout(#[source] vk::Result),

    #[error("Unable to create a graphics pipeline {:?}", .0)]
    UnableToCreateGraphicsPipeline(#[source] vk::Result),
}
