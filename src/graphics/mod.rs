mod command_recorder;
mod error;
mod frames_in_flight;

#[cfg(test)]
pub(crate) mod mock;

pub mod vulkan_api;

pub use self::{
    command_recorder::CommandRecorder,
    error::{FrameStage, GraphicsError, RecordingError},
    frames_in_flight::{Frame, FrameSynchronizer, SlotState},
};
