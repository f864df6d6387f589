use std::ffi::CStr;

use crate::{graphics::vulkan_api::VulkanError, logging::PrettyList};

/// Check that each of the provided extensions is available on the current
/// platform.
pub fn check_extensions(
    entry: &ash::Entry,
    required_extensions: &[String],
) -> Result<(), VulkanError> {
    let available_extensions = unsafe {
        entry
            .enumerate_instance_extension_properties(None)
            .map_err(VulkanError::UnableToListAvailableExtensions)?
    };
    let available_names: Vec<String> = available_extensions
        .iter()
        .filter_map(|ext| ext.extension_name_as_c_str().ok())
        .map(|name: &CStr| name.to_string_lossy().into_owned())
        .collect();
    log::debug!("Available extensions: {}", PrettyList(&available_names));

    let missing = missing_names(&available_names, required_extensions);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(VulkanError::RequiredExtensionsNotFound(missing))
    }
}

/// Every required name which does not appear in the available list.
pub(super) fn missing_names(
    available: &[String],
    required: &[String],
) -> Vec<String> {
    required
        .iter()
        .filter(|name| !available.contains(name))
        .cloned()
        .collect()
}
