//! nostalgia
//!
//! A small wgpu renderer that draws a tilemap, built from a tileset image and a
//! Tiled JSON map, onto a textured quad in a native window. Every input lives in
//! an external file: the WGSL shader, the tileset, the map and the geometry.
//!
//! High-level modules
//! - `config`: window, resource paths and device requirements
//! - `context`: window, surface, adapter, device and queue
//! - `data_structures`: geometry, tilemaps, uniforms and GPU textures
//! - `engine`: the init / frame / finish lifecycle around the event loop
//! - `pipelines`: bind group layout and render pipeline of the tilemap pass
//! - `render`: GPU resources of the scene and the per-frame draw
//! - `resources`: loaders for geometry, tilemap, texture and shader files
//!

pub mod config;
pub mod context;
pub mod data_structures;
pub mod engine;
pub mod pipelines;
pub mod render;
pub mod resources;
