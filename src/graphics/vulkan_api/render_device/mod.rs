mod api;
mod device_queue;
mod physical_device;
mod queue_families;
mod window_surface;

use ash::vk;
use raw_window_handle::{RawDisplayHandle, RawWindowHandle};

pub use self::{
    device_queue::DeviceQueue, queue_families::QueueFamilies,
    window_surface::WindowSurface,
};
use crate::{
    graphics::vulkan_api::{ffi::to_os_ptrs, Instance, VulkanError},
    logging::PrettyList,
};

/// The Vulkan Logical Device and related resources which are needed for
/// presenting graphics to the screen.
///
/// Fields are declared in destruction order.
pub struct RenderDevice {
    command_pool: vk::CommandPool,
    graphics_queue: DeviceQueue,
    present_queue: DeviceQueue,
    physical_device: vk::PhysicalDevice,
    debug_utils: Option<ash::ext::debug_utils::Device>,
    swapchain_loader: ash::khr::swapchain::Device,
    logical_device: ash::Device,
    window_surface: WindowSurface,
    instance: Instance,
}

impl RenderDevice {
    /// Create the logical Vulkan Device for this application.
    ///
    /// # Params
    ///
    /// * `display` - the window system's display handle
    /// * `window` - the window which will be presented to
    /// * `enable_validation` - load the Khronos validation layer and name
    ///   Vulkan objects for its messages
    ///
    /// # Safety
    ///
    /// The window must outlive the returned device.
    pub unsafe fn new(
        display: RawDisplayHandle,
        window: RawWindowHandle,
        enable_validation: bool,
    ) -> Result<Self, VulkanError> {
        let instance = Instance::new(display, enable_validation)?;
        let window_surface = WindowSurface::new(&instance, display, window)?;
        let (physical_device, queue_families) =
            physical_device::find_optimal_physical_device(
                &instance,
                &window_surface,
            )?;
        log::debug!("Queue families: {:?}", queue_families);

        let logical_device = create_logical_device(
            &instance,
            physical_device,
            &queue_families,
        )?;
        let (graphics_queue, present_queue) =
            queue_families.get_queues(&logical_device);

        let pool_create_info = vk::CommandPoolCreateInfo::default()
            .flags(vk::CommandPoolCreateFlags::RESET_COMMAND_BUFFER)
            .queue_family_index(graphics_queue.family_index());
        let command_pool =
            match logical_device.create_command_pool(&pool_create_info, None) {
                Ok(pool) => pool,
                Err(error) => {
                    logical_device.destroy_device(None);
                    return Err(VulkanError::UnableToCreateCommandPool(error));
                }
            };

        let swapchain_loader =
            ash::khr::swapchain::Device::new(instance.ash(), &logical_device);
        let debug_utils = instance.debug_utils_enabled().then(|| {
            ash::ext::debug_utils::Device::new(instance.ash(), &logical_device)
        });

        Ok(Self {
            command_pool,
            graphics_queue,
            present_queue,
            physical_device,
            debug_utils,
            swapchain_loader,
            logical_device,
            window_surface,
            instance,
        })
    }

    pub fn window_surface(&self) -> &WindowSurface {
        &self.window_surface
    }

    pub fn physical_device(&self) -> vk::PhysicalDevice {
        self.physical_device
    }

    pub fn graphics_queue(&self) -> &DeviceQueue {
        &self.graphics_queue
    }

    pub fn present_queue(&self) -> &DeviceQueue {
        &self.present_queue
    }

    /// The Ash loader for swapchain functions.
    pub fn swapchain_loader(&self) -> &ash::khr::swapchain::Device {
        &self.swapchain_loader
    }
}

impl Drop for RenderDevice {
    fn drop(&mut self) {
        unsafe {
            if let Err(error) = self.logical_device.device_wait_idle() {
                log::error!(
                    "Error while idling the device before destruction {:?}",
                    error
                );
            }
            self.logical_device
                .destroy_command_pool(self.command_pool, None);
            self.logical_device.destroy_device(None);
        }
    }
}

impl std::fmt::Debug for RenderDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderDevice")
            .field("physical_device", &self.physical_device)
            .field("graphics_queue", &self.graphics_queue)
            .field("present_queue", &self.present_queue)
            .field("window_surface", &self.window_surface)
            .field("instance", &self.instance)
            .finish()
    }
}

fn create_logical_device(
    instance: &Instance,
    physical_device: vk::PhysicalDevice,
    queue_families: &QueueFamilies,
) -> Result<ash::Device, VulkanError> {
    let extensions = physical_device::required_device_extensions();
    log::debug!("Required device extensions: {}", PrettyList(&extensions));
    let (_names, extension_ptrs) = to_os_ptrs(&extensions)?;
    let queue_create_infos = queue_families.as_queue_create_infos();
    let features = vk::PhysicalDeviceFeatures::default();
    let create_info = vk::DeviceCreateInfo::default()
        .queue_create_infos(&queue_create_infos)
        .enabled_extension_names(&extension_ptrs)
        .enabled_features(&features);
    unsafe {
        instance
            .ash()
            .create_device(physical_device, &create_info, None)
            .map_err(VulkanError::UnableToCreateLogicalDevice)
    }
}
