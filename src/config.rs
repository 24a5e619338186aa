//! Renderer configuration.
//!
//! [`Config::default`] describes the stock setup: a 640x480 window titled
//! `nostalgia` rendering the resources that ship with the crate. The resource
//! directory can be moved at runtime with the `NOSTALGIA_RESOURCE_DIR`
//! environment variable.

use std::path::{Path, PathBuf};

/// Environment variable that overrides [`Config::resource_dir`].
pub const RESOURCE_DIR_ENV: &str = "NOSTALGIA_RESOURCE_DIR";

/// Resource tree copied next to the build output by the build script.
pub const DEFAULT_RESOURCE_DIR: &str = concat!(env!("OUT_DIR"), "/resources");

#[derive(Clone, Debug)]
pub struct Config {
    pub title: String,
    /// Initial window size in logical pixels. The surface starts at this size too.
    pub width: u32,
    pub height: u32,
    pub resource_dir: PathBuf,
    // Paths below are relative to `resource_dir`.
    pub shader: PathBuf,
    pub tileset: PathBuf,
    pub tilemap: PathBuf,
    pub geometry: PathBuf,
    pub clear_colour: wgpu::Color,
    /// Used when the surface supports it, otherwise the surface's first format.
    pub surface_format: wgpu::TextureFormat,
    pub present_mode: wgpu::PresentMode,
    pub requirements: DeviceRequirements,
}

impl Config {
    /// The default configuration with the resource directory taken from
    /// `NOSTALGIA_RESOURCE_DIR` when it is set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(dir) = std::env::var_os(RESOURCE_DIR_ENV) {
            config.resource_dir = PathBuf::from(dir);
        }
        config
    }

    /// Resolve a path relative to the resource directory.
    pub fn resource(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.resource_dir.join(relative)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "nostalgia".to_string(),
            width: 640,
            height: 480,
            resource_dir: PathBuf::from(DEFAULT_RESOURCE_DIR),
            shader: PathBuf::from("shaders/shader.wgsl"),
            tileset: PathBuf::from("textures/overworld.png"),
            tilemap: PathBuf::from("tilemaps/map.tmj"),
            geometry: PathBuf::from("geometries/webgpu.txt"),
            clear_colour: wgpu::Color {
                r: 0.05,
                g: 0.05,
                b: 0.05,
                a: 1.0,
            },
            surface_format: wgpu::TextureFormat::Bgra8Unorm,
            present_mode: wgpu::PresentMode::Fifo,
            requirements: DeviceRequirements::default(),
        }
    }
}

/// Capability ceilings requested from the device.
///
/// Offset alignments are not listed here: they are always taken from the
/// adapter. See [`crate::context::required_limits`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeviceRequirements {
    pub max_vertex_attributes: u32,
    pub max_vertex_buffers: u32,
    pub max_buffer_size: u64,
    pub max_vertex_buffer_array_stride: u32,
    pub max_bind_groups: u32,
    pub max_uniform_buffers_per_shader_stage: u32,
    pub max_uniform_buffer_binding_size: u32,
    pub max_texture_dimension_1d: u32,
    pub max_texture_dimension_2d: u32,
    pub max_sampled_textures_per_shader_stage: u32,
    pub max_dynamic_uniform_buffers_per_pipeline_layout: u32,
}

impl Default for DeviceRequirements {
    fn default() -> Self {
        Self {
            max_vertex_attributes: 2,
            max_vertex_buffers: 1,
            max_buffer_size: 64 * 1024,
            max_vertex_buffer_array_stride: 5 * 4,
            max_bind_groups: 1,
            max_uniform_buffers_per_shader_stage: 1,
            max_uniform_buffer_binding_size: 16 * 4,
            max_texture_dimension_1d: 4096,
            max_texture_dimension_2d: 4096,
            max_sampled_textures_per_shader_stage: 5,
            max_dynamic_uniform_buffers_per_pipeline_layout: 1,
        }
    }
}
