//! Render pipelines.

pub mod tilemap;

pub use tilemap::{mk_bind_group, mk_bind_group_layout, mk_render_pipeline, TilemapPipeline};
