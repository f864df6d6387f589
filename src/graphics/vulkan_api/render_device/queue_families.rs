use ash::vk;

use crate::graphics::vulkan_api::render_device::{
    DeviceQueue, WindowSurface,
};

static QUEUE_PRIORITY: [f32; 1] = [1.0];

/// The indices for all of the required queue families for this application.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct QueueFamilies {
    pub graphics_family_index: u32,
    pub present_family_index: u32,
}

impl QueueFamilies {
    /// Find the queue family indexes for the queues this application needs.
    ///
    /// Returns None when the device has no graphics family or no family which
    /// can present to the surface.
    pub fn find_for_physical_device(
        instance: &ash::Instance,
        window_surface: &WindowSurface,
        physical_device: vk::PhysicalDevice,
    ) -> Option<Self> {
        let queue_family_properties = unsafe {
            instance.get_physical_device_queue_family_properties(physical_device)
        };
        let present_support: Vec<bool> = (0..queue_family_properties.len()
            as u32)
            .map(|index| {
                let support = unsafe {
                    window_surface
                        .get_physical_device_surface_support(physical_device, index)
                };
                support.unwrap_or_else(|error| {
                    // other families may still work
                    log::warn!(
                        "Error while checking surface support for device: {:?}",
                        error
                    );
                    false
                })
            })
            .collect();
        pick_families(&queue_family_properties, &present_support)
    }

    pub fn is_same_family(&self) -> bool {
        self.graphics_family_index == self.present_family_index
    }

    /// Create a vector of queue create infos.
    /// Automatically handles the situation where the graphics and present
    /// queue are the same.
    pub fn as_queue_create_infos(&self) -> Vec<vk::DeviceQueueCreateInfo<'static>> {
        let mut create_infos = vec![vk::DeviceQueueCreateInfo::default()
            .queue_family_index(self.graphics_family_index)
            .queue_priorities(&QUEUE_PRIORITY)];
        if !self.is_same_family() {
            create_infos.push(
                vk::DeviceQueueCreateInfo::default()
                    .queue_family_index(self.present_family_index)
                    .queue_priorities(&QUEUE_PRIORITY),
            );
        }
        create_infos
    }

    /// Get the graphics and present queues from the logical device.
    pub fn get_queues(
        &self,
        logical_device: &ash::Device,
    ) -> (DeviceQueue, DeviceQueue) {
        let graphics_queue = DeviceQueue::from_raw(
            unsafe { logical_device.get_device_queue(self.graphics_family_index, 0) },
            self.graphics_family_index,
        );
        let present_queue = if self.is_same_family() {
            graphics_queue
        } else {
            DeviceQueue::from_raw(
                unsafe {
                    logical_device.get_device_queue(self.present_family_index, 0)
                },
                self.present_family_index,
            )
        };
        (graphics_queue, present_queue)
    }
}

/// Prefer a single family which supports both graphics and presentation,
/// otherwise take the first of each.
fn pick_families(
    properties: &[vk::QueueFamilyProperties],
    present_support: &[bool],
) -> Option<QueueFamilies> {
    let is_graphics = |family: &vk::QueueFamilyProperties| {
        family.queue_count > 0
            && family.queue_flags.contains(vk::QueueFlags::GRAPHICS)
    };

    let shared = properties
        .iter()
        .zip(present_support)
        .position(|(family, &present)| is_graphics(family) && present);
    if let Some(index) = shared {
        return Some(QueueFamilies {
            graphics_family_index: index as u32,
            present_family_index: index as u32,
        });
    }

    let graphics_family_index = properties.iter().position(is_graphics)?;
    let present_family_index = present_support.iter().position(|&p| p)?;
    Some(QueueFamilies {
        graphics_family_index: graphics_family_index as u32,
        present_family_index: present_family_index as u32,
    })
}
