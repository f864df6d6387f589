use ash::vk;

use crate::{
    graphics::vulkan_api::{
        ffi::to_owned_name,
        render_device::{QueueFamilies, WindowSurface},
        Instance, VulkanError,
    },
    logging::PrettyList,
};

/// Get the set of required device extensions for this application.
pub fn required_device_extensions() -> Vec<String> {
    vec![to_owned_name(ash::khr::swapchain::NAME)]
}

/// Pick the first physical device which can render to and present on the
/// window surface.
pub fn find_optimal_physical_device(
    instance: &Instance,
    window_surface: &WindowSurface,
) -> Result<(vk::PhysicalDevice, QueueFamilies), VulkanError> {
    let physical_devices = unsafe {
        instance
            .ash()
            .enumerate_physical_devices()
            .map_err(VulkanError::UnableToEnumeratePhysicalDevices)?
    };
    physical_devices
        .into_iter()
        .find_map(|device| {
            let families = is_device_suitable(instance, window_surface, device)?;
            log_device_name(instance, device);
            Some((device, families))
        })
        .ok_or(VulkanError::NoSuitableDeviceFound)
}

fn is_device_suitable(
    instance: &Instance,
    window_surface: &WindowSurface,
    physical_device: vk::PhysicalDevice,
) -> Option<QueueFamilies> {
    if any_missing_extensions(instance.ash(), physical_device) {
        return None;
    }

    let Some(families) = QueueFamilies::find_for_physical_device(
        instance.ash(),
        window_surface,
        physical_device,
    ) else {
        log::trace!(
            "Could not find suitable queue families for physical device {:?}",
            physical_device
        );
        return None;
    };

    unsafe {
        let has_formats = window_surface
            .supported_formats(physical_device)
            .is_ok_and(|formats| !formats.is_empty());
        if !has_formats {
            log::trace!(
                "No supported format could be found for physical device {:?}",
                physical_device
            );
            return None;
        }

        let has_present_modes = window_surface
            .supported_presentation_modes(physical_device)
            .is_ok_and(|modes| !modes.is_empty());
        if !has_present_modes {
            log::trace!(
                "No presentation modes could be found for physical device {:?}",
                physical_device
            );
            return None;
        }
    }

    Some(families)
}

/// Check that all required device extensions are available.
/// Returns true if there are any required device extensions that are not
/// available.
fn any_missing_extensions(
    instance: &ash::Instance,
    physical_device: vk::PhysicalDevice,
) -> bool {
    let available_device_extensions: Vec<String> = unsafe {
        instance
            .enumerate_device_extension_properties(physical_device)
            .unwrap_or_default()
    }
    .iter()
    .filter_map(|extension| extension.extension_name_as_c_str().ok())
    .map(to_owned_name)
    .collect();

    log::trace!(
        "Available physical device extensions: {}",
        PrettyList(&available_device_extensions),
    );

    required_device_extensions().iter().any(|required_name| {
        let is_missing = !available_device_extensions.contains(required_name);
        if is_missing {
            log::trace!("Device extension {} is not available", required_name);
        }
        is_missing
    })
}

fn log_device_name(instance: &Instance, physical_device: vk::PhysicalDevice) {
    let properties = unsafe {
        instance.ash().get_physical_device_properties(physical_device)
    };
    let name = properties
        .device_name_as_c_str()
        .map(to_owned_name)
        .unwrap_or_default();
    log::info!("Using physical device {}", name);
}
