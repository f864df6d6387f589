use std::{path::Path, sync::Arc};

use ash::vk;

use crate::graphics::vulkan_api::{RenderDevice, VulkanError};

/// An owned Vulkan shader module.
pub struct ShaderModule {
    shader_module: vk::ShaderModule,
    render_device: Arc<RenderDevice>,
}

impl ShaderModule {
    /// Read a compiled SPIR-V file and build a shader module from it.
    pub fn from_file(
        render_device: Arc<RenderDevice>,
        path: impl AsRef<Path>,
    ) -> Result<Self, VulkanError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| {
            VulkanError::UnableToReadShaderFile {
                path: path.to_owned(),
                source,
            }
        })?;
        log::debug!("Loaded {} bytes of SPIR-V from {:?}", bytes.len(), path);
        Self::from_spirv_bytes(render_device, &bytes)
    }

    /// Build a new shader module using compiled SPIRV shader source code.
    pub fn from_spirv_bytes(
        render_device: Arc<RenderDevice>,
        source_bytes: &[u8],
    ) -> Result<Self, VulkanError> {
        let source_words = copy_to_u32(source_bytes)?;
        // Safe because the Vulkan resource is destroyed when this object is
        // dropped.
        let shader_module =
            unsafe { render_device.create_shader_module(&source_words)? };
        Ok(Self {
            shader_module,
            render_device,
        })
    }

    /// The raw Vulkan shader module handle.
    ///
    /// # Safety
    ///
    /// Unsafe because the handle must not be used after the ShaderModule is
    /// dropped.
    pub unsafe fn raw(&self) -> vk::ShaderModule {
        self.shader_module
    }
}

impl Drop for ShaderModule {
    /// # Safety
    ///
    /// The application must ensure that the shader module is not in use when it
    /// is dropped.
    fn drop(&mut self) {
        unsafe { self.render_device.destroy_shader_module(self.shader_module) }
    }
}

/// Copy a byte slice into a properly-aligned u32 array.
///
/// Vulkan expects SPIR-V as u32 words while files are read as bytes. Words
/// are read as little endian.
fn copy_to_u32(bytes: &[u8]) -> Result<Vec<u32>, VulkanError> {
    const U32_SIZE: usize = std::mem::size_of::<u32>();

    if bytes.len() % U32_SIZE != 0 {
        return Err(VulkanError::InvalidSourceLengthInShaderSPIRV(bytes.len()));
    }

    Ok(bytes
        .chunks_exact(U32_SIZE)
        .map(|word| u32::from_le_bytes([word[0], word[1], word[2], word[3]]))
        .collect())
}
