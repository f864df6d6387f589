mod debug_callback;
mod extensions;
mod layers;

use ash::vk;
use raw_window_handle::RawDisplayHandle;

use crate::{
    graphics::vulkan_api::{
        ffi::{to_os_ptrs, to_owned_name},
        VulkanError,
    },
    logging::PrettyList,
};

const VALIDATION_LAYER: &str = "VK_LAYER_KHRONOS_validation";

/// The Vulkan library entry point, instance, and optional debug messenger.
pub struct Instance {
    debug: Option<(ash::ext::debug_utils::Instance, vk::DebugUtilsMessengerEXT)>,
    ash: ash::Instance,
    entry: ash::Entry,
}

impl Instance {
    /// Load the Vulkan library and create an instance which can present to
    /// the given display.
    ///
    /// # Params
    ///
    /// * `display` - the window system's display, used to pick the required
    ///   surface extensions
    /// * `enable_validation` - enable the Khronos validation layer and route
    ///   its messages to the log
    pub fn new(
        display: RawDisplayHandle,
        enable_validation: bool,
    ) -> Result<Self, VulkanError> {
        // SAFE because the entry is kept alive for as long as the instance
        let entry = unsafe { ash::Entry::load()? };

        let mut required_extensions: Vec<String> =
            ash_window::enumerate_required_extensions(display)
                .map_err(VulkanError::UnableToListWindowExtensions)?
                .iter()
                .map(|&ptr| to_owned_name(unsafe { std::ffi::CStr::from_ptr(ptr) }))
                .collect();
        let mut required_layers = vec![];
        if enable_validation {
            required_extensions
                .push(to_owned_name(ash::ext::debug_utils::NAME));
            required_layers.push(VALIDATION_LAYER.to_owned());
        }

        extensions::check_extensions(&entry, &required_extensions)?;
        layers::check_layers(&entry, &required_layers)?;

        log::debug!("Required Extensions: {}", PrettyList(&required_extensions));
        log::debug!("Required Layers: {}", PrettyList(&required_layers));

        let ash = create_instance(&entry, &required_extensions, &required_layers)?;

        let debug = if enable_validation {
            match debug_callback::create_debug_logger(&entry, &ash) {
                Ok(debug) => Some(debug),
                Err(error) => {
                    unsafe { ash.destroy_instance(None) };
                    return Err(error);
                }
            }
        } else {
            None
        };

        Ok(Self { debug, ash, entry })
    }

    /// The Ash instance, used to load extension function tables.
    pub fn ash(&self) -> &ash::Instance {
        &self.ash
    }

    /// The loaded Vulkan library.
    pub fn entry(&self) -> &ash::Entry {
        &self.entry
    }

    /// True when the debug utils extension is loaded and objects can be
    /// named.
    pub fn debug_utils_enabled(&self) -> bool {
        self.debug.is_some()
    }
}

impl Drop for Instance {
    fn drop(&mut self) {
        unsafe {
            if let Some((debug_utils, messenger)) = self.debug.take() {
                debug_utils.destroy_debug_utils_messenger(messenger, None);
            }
            self.ash.destroy_instance(None);
        }
    }
}

impl std::fmt::Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Instance")
            .field("handle", &self.ash.handle())
            .field("validation", &self.debug.is_some())
            .finish()
    }
}

fn create_instance(
    entry: &ash::Entry,
    extensions: &[String],
    layers: &[String],
) -> Result<ash::Instance, VulkanError> {
    let app_info = vk::ApplicationInfo::default()
        .application_name(c"vk_presenter")
        .application_version(vk::make_api_version(0, 1, 0, 0))
        .engine_name(c"no engine")
        .engine_version(vk::make_api_version(0, 1, 0, 0))
        .api_version(vk::API_VERSION_1_0);

    let (_layer_names, layer_ptrs) = to_os_ptrs(layers)?;
    let (_ext_names, ext_ptrs) = to_os_ptrs(extensions)?;

    let create_info = vk::InstanceCreateInfo::default()
        .application_info(&app_info)
        .enabled_layer_names(&layer_ptrs)
        .enabled_extension_names(&ext_ptrs);

    unsafe {
        entry
            .create_instance(&create_info, None)
            .map_err(VulkanError::UnableToCreateInstance)
    }
}
