//! Loading of geometry, tilemaps, textures and shaders from external files.
//!
//! Every loader takes a path (usually produced by
//! [`Config::resource`](crate::config::Config::resource)) and reports an
//! unreadable or malformed file as an error carrying the path.

use std::path::Path;

use anyhow::Context;

pub mod geometry;
pub mod shader;
pub mod texture;
pub mod tilemap;

pub use geometry::{load_geometry, parse_geometry};
pub use shader::load_shader_module;
pub use texture::{load_texture, load_tilemap_as_texture};
pub use tilemap::{load_tilemap, parse_tilemap};

pub fn load_string(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("could not read {}", path.display()))
}

pub fn load_binary(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("could not read {}", path.display()))
}
