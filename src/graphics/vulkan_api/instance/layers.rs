use std::ffi::CStr;

use super::extensions::missing_names;
use crate::{graphics::vulkan_api::VulkanError, logging::PrettyList};

/// Check that each of the required layers is available on the current
/// platform.
pub fn check_layers(
    entry: &ash::Entry,
    required_layers: &[String],
) -> Result<(), VulkanError> {
    if required_layers.is_empty() {
        return Ok(());
    }

    let available_layer_properties = unsafe {
        entry
            .enumerate_instance_layer_properties()
            .map_err(VulkanError::UnableToListAvailableLayers)?
    };
    let available_names: Vec<String> = available_layer_properties
        .iter()
        .filter_map(|layer| layer.layer_name_as_c_str().ok())
        .map(|name: &CStr| name.to_string_lossy().into_owned())
        .collect();
    log::debug!("Available layers: {}", PrettyList(&available_names));

    let missing = missing_names(&available_names, required_layers);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(VulkanError::RequiredLayersNotFound(missing))
    }
}
