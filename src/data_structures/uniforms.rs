//! The uniform block shared by the vertex and fragment stages.

use std::mem;

use crate::data_structures::tilemap::Tilemap;

/**
 * The raw uniform block as the shader sees it.
 *
 * The field order and the two padding slots are part of the GPU contract:
 * `time` must stay at byte offset 16 and the whole block at 32 bytes.
 */
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Uniforms {
    pub tilemap_width: f32,
    pub tilemap_height: f32,
    pub number_of_layers: f32,
    pub _pad0: f32,
    pub time: f32,
    pub screen_width: f32,
    pub screen_height: f32,
    pub _pad1: f32,
}

impl Uniforms {
    pub const SIZE: u64 = mem::size_of::<Uniforms>() as u64;

    /// Byte offset of `time`, the only field rewritten every frame.
    pub const TIME_OFFSET: u64 = mem::offset_of!(Uniforms, time) as u64;

    pub fn new(tilemap: &Tilemap, screen: (u32, u32)) -> Self {
        Self {
            tilemap_width: tilemap.width as f32,
            tilemap_height: tilemap.height as f32,
            number_of_layers: tilemap.number_of_layers as f32,
            time: 1.0,
            screen_width: screen.0 as f32,
            screen_height: screen.1 as f32,
            ..Default::default()
        }
    }
}

/// Round `size` up to the next multiple of `alignment`.
///
/// This is the distance between two uniform blocks that are addressed with a
/// dynamic offset, so `alignment` is the device's
/// `min_uniform_buffer_offset_alignment`.
pub fn uniform_stride(size: u64, alignment: u64) -> u64 {
    size.div_ceil(alignment) * alignment
}

/// Size of a uniform buffer that holds two blocks `stride` bytes apart.
pub fn uniform_buffer_size(stride: u64) -> u64 {
    stride + Uniforms::SIZE
}
