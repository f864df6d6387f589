//! A Vulkan presentation loop with explicit frames-in-flight
//! synchronization.

pub mod application;
pub mod config;
pub mod graphics;
pub mod logging;
