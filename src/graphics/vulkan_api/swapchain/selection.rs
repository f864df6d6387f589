use ash::vk;

use crate::logging::PrettyList;

pub fn choose_surface_format(
    formats: &[vk::SurfaceFormatKHR],
) -> Option<vk::SurfaceFormatKHR> {
    log::debug!("Available Surface Formats: {:?}", PrettyList(formats));

    let format = formats
        .iter()
        .copied()
        .find(|format| {
            format.color_space == vk::ColorSpaceKHR::SRGB_NONLINEAR
                && format.format == vk::Format::B8G8R8A8_SRGB
        })
        .or_else(|| formats.first().copied())?;

    log::debug!("Chose Surface Format: {:?}", format);
    Some(format)
}

pub fn choose_present_mode(modes: &[vk::PresentModeKHR]) -> vk::PresentModeKHR {
    log::debug!("Available Presentation Modes: {:?}", PrettyList(modes));

    // FIFO is the only mode every implementation must support
    let mode = if modes.contains(&vk::PresentModeKHR::MAILBOX) {
        vk::PresentModeKHR::MAILBOX
    } else {
        vk::PresentModeKHR::FIFO
    };

    log::debug!("Chose Present Mode: {:?}", mode);
    mode
}

pub fn choose_swap_extent(
    capabilities: &vk::SurfaceCapabilitiesKHR,
    window_size: (u32, u32),
) -> vk::Extent2D {
    if capabilities.current_extent.width != u32::MAX {
        log::debug!(
            "use current swapchain extent {:?}",
            capabilities.current_extent
        );
        return capabilities.current_extent;
    }

    let (width, height) = window_size;
    let extent = vk::Extent2D {
        width: width.clamp(
            capabilities.min_image_extent.width,
            capabilities.max_image_extent.width,
        ),
        height: height.clamp(
            capabilities.min_image_extent.height,
            capabilities.max_image_extent.height,
        ),
    };
    log::debug!("use computed extent {:?}", extent);
    extent
}

pub fn choose_image_count(capabilities: &vk::SurfaceCapabilitiesKHR) -> u32 {
    let proposed_image_count = capabilities.min_image_count + 1;
    if capabilities.max_image_count > 0 {
        proposed_image_count.min(capabilities.max_image_count)
    } else {
        proposed_image_count
    }
}
