use ash::vk;
use thiserror::Error;

use crate::graphics::vulkan_api::VulkanError;

/// The step of the frame loop which talked to the GPU when an error occurred.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameStage {
    FenceWait,
    FenceReset,
    Acquire,
    Submit,
    Present,
}

impl std::fmt::Display for FrameStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FrameStage::FenceWait => "fence wait",
            FrameStage::FenceReset => "fence reset",
            FrameStage::Acquire => "image acquire",
            FrameStage::Submit => "queue submit",
            FrameStage::Present => "image present",
        };
        f.write_str(name)
    }
}

/// Errors raised while writing commands into a frame's command buffer.
#[derive(Error, Debug)]
pub enum RecordingError {
    #[error("Refusing to record a draw with a null pipeline handle")]
    InvalidPipeline,

    #[error("Image index {} has no framebuffer, only {} exist", .index, .count)]
    ImageIndexOutOfRange { index: usize, count: usize },

    #[error("Refusing to record a render pass with an empty extent {:?}", .0)]
    EmptyExtent(vk::Extent2D),

    #[error("Unable to reset the command buffer {:?}", .0)]
    ResetFailed(#[source] vk::Result),

    #[error("Unable to begin the command buffer {:?}", .0)]
    BeginFailed(#[source] vk::Result),

    #[error("Unable to end the command buffer {:?}", .0)]
    EndFailed(#[source] vk::Result),
}

#[derive(Error, Debug)]
pub enum GraphicsError {
    #[error(transparent)]
    VulkanError(#[from] VulkanError),

    #[error(transparent)]
    Recording(#[from] RecordingError),

    #[error("The presentable surface is out of date and must be rebuilt")]
    SurfaceStale,

    #[error("GPU operation failed during {}: {:?}", .stage, .result)]
    GraphicsOperation {
        stage: FrameStage,
        #[source]
        result: vk::Result,
    },

    #[error("At least one frame in flight is required, got {}", .0)]
    InvalidFrameCount(usize),

    #[error(
        "Frame slot {} has no recorded image to submit, was the Frame already submitted?",
        .slot
    )]
    FrameNotRecording { slot: usize },

    #[error(
        "Frame from slot {} was submitted while slot {} is current",
        .actual,
        .expected
    )]
    FrameSlotMismatch { expected: usize, actual: usize },
}

impl GraphicsError {
    /// Build a closure which tags a raw Vulkan status with the stage that
    /// produced it. Meant for use with `map_err`.
    pub(crate) fn at(stage: FrameStage) -> impl Fn(vk::Result) -> Self {
        move |result| GraphicsError::GraphicsOperation { stage, result }
    }
}
