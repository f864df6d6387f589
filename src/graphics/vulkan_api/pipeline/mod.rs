mod graphics_pipeline;
mod shader_module;

pub use self::{graphics_pipeline::GraphicsPipeline, shader_module::ShaderModule};
