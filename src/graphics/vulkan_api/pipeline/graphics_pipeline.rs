use std::{path::Path, sync::Arc};

use ash::vk;

use crate::graphics::vulkan_api::{
    DeviceContext, RenderDevice, ShaderModule, VulkanError,
};

/// A graphics pipeline which draws non-indexed geometry generated entirely by
/// the vertex shader.
///
/// Viewport and scissor are dynamic so the pipeline does not depend on the
/// surface extent.
pub struct GraphicsPipeline {
    pipeline: vk::Pipeline,
    layout: vk::PipelineLayout,
    render_device: Arc<RenderDevice>,
}

impl GraphicsPipeline {
    /// # Params
    ///
    /// * `render_device` - the device which owns the pipeline
    /// * `vertex_shader` - path to compiled SPIR-V for the vertex stage
    /// * `fragment_shader` - path to compiled SPIR-V for the fragment stage
    /// * `render_pass` - the pipeline is used in subpass 0 of this pass
    pub fn new(
        render_device: Arc<RenderDevice>,
        vertex_shader: impl AsRef<Path>,
        fragment_shader: impl AsRef<Path>,
        render_pass: vk::RenderPass,
    ) -> Result<Self, VulkanError> {
        let vertex_module =
            ShaderModule::from_file(render_device.clone(), vertex_shader)?;
        let fragment_module =
            ShaderModule::from_file(render_device.clone(), fragment_shader)?;

        let layout = unsafe {
            render_device.create_pipeline_layout(
                &vk::PipelineLayoutCreateInfo::default(),
            )?
        };

        // the shader modules only need to live until the pipeline is created
        let pipeline = unsafe {
            create_pipeline(
                &render_device,
                &vertex_module,
                &fragment_module,
                layout,
                render_pass,
            )
        };
        let pipeline = match pipeline {
            Ok(pipeline) => pipeline,
            Err(error) => {
                unsafe { render_device.destroy_pipeline_layout(layout) };
                return Err(error);
            }
        };
        render_device.set_debug_name(pipeline, "Triangle Pipeline");
        render_device.set_debug_name(layout, "Triangle Pipeline Layout");

        Ok(Self {
            pipeline,
            layout,
            render_device,
        })
    }

    /// The raw pipeline handle, bound while recording each frame.
    pub fn raw(&self) -> vk::Pipeline {
        self.pipeline
    }
}

impl Drop for GraphicsPipeline {
    /// # Safety
    ///
    /// No pending command buffer may reference the pipeline.
    fn drop(&mut self) {
        unsafe {
            self.render_device.destroy_pipeline(self.pipeline);
            self.render_device.destroy_pipeline_layout(self.layout);
        }
    }
}

impl std::fmt::Debug for GraphicsPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphicsPipeline")
            .field("pipeline", &self.pipeline)
            .field("layout", &self.layout)
            .finish()
    }
}

unsafe fn create_pipeline(
    render_device: &RenderDevice,
    vertex_module: &ShaderModule,
    fragment_module: &ShaderModule,
    layout: vk::PipelineLayout,
    render_pass: vk::RenderPass,
) -> Result<vk::Pipeline, VulkanError> {
    let stages = [
        vk::PipelineShaderStageCreateInfo::default()
            .stage(vk::ShaderStageFlags::VERTEX)
            .module(vertex_module.raw())
            .name(c"main"),
        vk::PipelineShaderStageCreateInfo::default()
            .stage(vk::ShaderStageFlags::FRAGMENT)
            .module(fragment_module.raw())
            .name(c"main"),
    ];

    let vertex_input_state = vk::PipelineVertexInputStateCreateInfo::default();
    let input_assembly = vk::PipelineInputAssemblyStateCreateInfo::default()
        .topology(vk::PrimitiveTopology::TRIANGLE_LIST)
        .primitive_restart_enable(false);

    // counts only, the values are set while recording
    let viewport_state = vk::PipelineViewportStateCreateInfo::default()
        .viewport_count(1)
        .scissor_count(1);
    let dynamic_states = [vk::DynamicState::VIEWPORT, vk::DynamicState::SCISSOR];
    let dynamic_state = vk::PipelineDynamicStateCreateInfo::default()
        .dynamic_states(&dynamic_states);

    let rasterization_state = vk::PipelineRasterizationStateCreateInfo::default()
        .depth_clamp_enable(false)
        .rasterizer_discard_enable(false)
        .polygon_mode(vk::PolygonMode::FILL)
        .line_width(1.0)
        .cull_mode(vk::CullModeFlags::NONE)
        .front_face(vk::FrontFace::CLOCKWISE)
        .depth_bias_enable(false);
    let multisample_state = vk::PipelineMultisampleStateCreateInfo::default()
        .sample_shading_enable(false)
        .rasterization_samples(vk::SampleCountFlags::TYPE_1)
        .min_sample_shading(1.0);

    let blend_attachments = [vk::PipelineColorBlendAttachmentState::default()
        .color_write_mask(vk::ColorComponentFlags::RGBA)
        .blend_enable(false)];
    let color_blend_state = vk::PipelineColorBlendStateCreateInfo::default()
        .logic_op_enable(false)
        .logic_op(vk::LogicOp::COPY)
        .attachments(&blend_attachments)
        .blend_constants([0.0, 0.0, 0.0, 0.0]);

    let create_info = vk::GraphicsPipelineCreateInfo::default()
        .stages(&stages)
        .vertex_input_state(&vertex_input_state)
        .input_assembly_state(&input_assembly)
        .viewport_state(&viewport_state)
        .rasterization_state(&rasterization_state)
        .multisample_state(&multisample_state)
        .color_blend_state(&color_blend_state)
        .dynamic_state(&dynamic_state)
        .layout(layout)
        .render_pass(render_pass)
        .subpass(0);

    render_device.create_graphics_pipeline(&create_info)
}
