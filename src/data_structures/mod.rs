//! Renderer data structures: geometry, tilemaps, uniforms and textures.
//!
//! This module contains the plain data types that loaders produce and the
//! engine uploads:
//!
//! - `geometry` holds the vertex layout and the flat point/index lists
//! - `tilemap` holds the flattened multi-layer grid of tile indices
//! - `uniforms` holds the GPU uniform block and its stride arithmetic
//! - `texture` contains the GPU texture wrapper and creation utilities

pub mod geometry;
pub mod texture;
pub mod tilemap;
pub mod uniforms;
