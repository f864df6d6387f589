//! Runtime configuration for the presentation loop.
//!
//! Every value has a default so an empty (or missing) file is a valid
//! configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unable to read the config file at {:?}", .path)]
    UnableToReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    InvalidToml(#[from] toml::de::Error),

    #[error("frames_in_flight must be at least 1, got {}", .0)]
    InvalidFramesInFlight(usize),

    #[error("vertex_count must be at least 1")]
    InvalidVertexCount,

    #[error("The window size must be non-zero, got {}x{}", .0, .1)]
    InvalidWindowSize(u32, u32),

    #[error("Every clear color component must be finite, got {:?}", .0)]
    InvalidClearColor([f32; 4]),
}

/// The full application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub window: WindowConfig,
    pub renderer: RendererConfig,
}

/// Settings for the window which owns the presentable surface.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

/// Settings consumed by the frame loop.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RendererConfig {
    /// The number of frame slots, K. 1 is single buffered and 2 is double
    /// buffered. Independent of the number of swapchain images.
    pub frames_in_flight: usize,

    /// The color used to clear each swapchain image.
    pub clear_color: [f32; 4],

    /// The number of vertices drawn each frame. The vertex shader generates
    /// all geometry from the vertex index.
    pub vertex_count: u32,

    /// Enable the Khronos validation layer and route its messages to the log.
    pub enable_validation: bool,

    pub vertex_shader: PathBuf,
    pub fragment_shader: PathBuf,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "vk_presenter".to_owned(),
            width: 800,
            height: 600,
        }
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            frames_in_flight: 2,
            clear_color: [0.1, 0.1, 0.1, 1.0],
            vertex_count: 3,
            enable_validation: false,
            vertex_shader: PathBuf::from("shaders/triangle.vert.spv"),
            fragment_shader: PathBuf::from("shaders/triangle.frag.spv"),
        }
    }
}

impl Config {
    /// Read and validate a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| {
            ConfigError::UnableToReadFile {
                path: path.to_owned(),
                source,
            }
        })?;
        Self::from_toml_str(&contents)
    }

    /// Read the config at `path` if the file exists, otherwise use the
    /// defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            log::info!("No config found at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Parse and validate a config from TOML source text.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the frame loop relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let renderer = &self.renderer;
        if renderer.frames_in_flight == 0 {
            return Err(ConfigError::InvalidFramesInFlight(
                renderer.frames_in_flight,
            ));
        }
        if renderer.vertex_count == 0 {
            return Err(ConfigError::InvalidVertexCount);
        }
        if !renderer.clear_color.iter().all(|c| c.is_finite()) {
            return Err(ConfigError::InvalidClearColor(renderer.clear_color));
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::InvalidWindowSize(
                self.window.width,
                self.window.height,
            ));
        }
        Ok(())
    }
}
