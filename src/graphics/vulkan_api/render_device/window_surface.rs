use ash::vk;
use raw_window_handle::{RawDisplayHandle, RawWindowHandle};

use crate::graphics::vulkan_api::{Instance, VulkanError};

/// The surface targeted by this application and the Ash extension loader which
/// provides access to KHR surface functions.
pub struct WindowSurface {
    surface: vk::SurfaceKHR,
    surface_loader: ash::khr::surface::Instance,
}

impl WindowSurface {
    /// Create a presentable surface for the window.
    ///
    /// # Safety
    ///
    /// The window must outlive the surface and the surface must be dropped
    /// before the instance.
    pub unsafe fn new(
        instance: &Instance,
        display: RawDisplayHandle,
        window: RawWindowHandle,
    ) -> Result<Self, VulkanError> {
        let surface = ash_window::create_surface(
            instance.entry(),
            instance.ash(),
            display,
            window,
            None,
        )
        .map_err(VulkanError::UnableToCreateSurface)?;
        let surface_loader =
            ash::khr::surface::Instance::new(instance.entry(), instance.ash());
        Ok(Self {
            surface,
            surface_loader,
        })
    }

    pub fn raw(&self) -> vk::SurfaceKHR {
        self.surface
    }

    /// Check that a physical device can present swapchain images to the window
    /// surface.
    ///
    /// # Params
    ///
    /// * `physical_device` - the physical device to check for support
    /// * `queue_family_index` - the queue family which will be used for
    ///   presentation. It is possible that the device supports presentation on
    ///   only a subset of all available queue families.
    ///
    /// # Safety
    ///
    /// Unsafe because the queue family index is assumed to be valid and the
    /// physical_device is assumed to still exist.
    pub unsafe fn get_physical_device_surface_support(
        &self,
        physical_device: vk::PhysicalDevice,
        queue_family_index: u32,
    ) -> Result<bool, vk::Result> {
        self.surface_loader.get_physical_device_surface_support(
            physical_device,
            queue_family_index,
            self.surface,
        )
    }

    /// # Safety
    ///
    /// The physical device must still exist.
    pub unsafe fn supported_formats(
        &self,
        physical_device: vk::PhysicalDevice,
    ) -> Result<Vec<vk::SurfaceFormatKHR>, VulkanError> {
        self.surface_loader
            .get_physical_device_surface_formats(physical_device, self.surface)
            .map_err(VulkanError::UnableToGetSurfaceFormats)
    }

    /// # Safety
    ///
    /// The physical device must still exist.
    pub unsafe fn supported_presentation_modes(
        &self,
        physical_device: vk::PhysicalDevice,
    ) -> Result<Vec<vk::PresentModeKHR>, VulkanError> {
        self.surface_loader
            .get_physical_device_surface_present_modes(
                physical_device,
                self.surface,
            )
            .map_err(VulkanError::UnableToGetPresentModes)
    }

    /// # Safety
    ///
    /// The physical device must still exist.
    pub unsafe fn surface_capabilities(
        &self,
        physical_device: vk::PhysicalDevice,
    ) -> Result<vk::SurfaceCapabilitiesKHR, VulkanError> {
        self.surface_loader
            .get_physical_device_surface_capabilities(
                physical_device,
                self.surface,
            )
            .map_err(VulkanError::UnableToGetSurfaceCapabilities)
    }
}

impl Drop for WindowSurface {
    fn drop(&mut self) {
        unsafe {
            self.surface_loader.destroy_surface(self.surface, None);
        }
    }
}

impl std::fmt::Debug for WindowSurface {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("WindowSurface")
            .field("surface", &self.surface)
            .finish()
    }
}
