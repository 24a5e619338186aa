//! GPU textures and texture creation utilities.
//!
//! This module provides [`Texture`], a wrapper around a WGPU texture and its
//! view, with constructors for the two kinds of textures the renderer binds:
//! the RGBA tileset image and the single-channel tile index grid.

use anyhow::*;
use image::GenericImageView;

use crate::data_structures::tilemap::Tilemap;

/// A GPU texture together with a view over its full mip and array range.
///
/// Created via [`from_image`](Self::from_image) for color data or
/// [`from_tilemap`](Self::from_tilemap) for tile indices. Both are immutable
/// after the initial upload.
#[derive(Clone, Debug)]
pub struct Texture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

impl Texture {
    /// Format of decoded images. Image bytes are uploaded as they are, without
    /// an sRGB conversion.
    pub const IMAGE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

    /// Format of the tile index grid: one unsigned 32-bit index per texel.
    pub const TILEMAP_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::R32Uint;

    /// Load a texture from raw image file contents (PNG, JPEG, ...).
    ///
    /// The format is guessed from the data.
    pub fn from_bytes(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        bytes: &[u8],
        label: &str,
    ) -> Result<Self> {
        let img = image::load_from_memory(bytes)?;
        Self::from_image(device, queue, &img, Some(label))
    }

    /// Upload a decoded image as a 2-D RGBA8 texture of the same size.
    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        img: &image::DynamicImage,
        label: Option<&str>,
    ) -> Result<Self> {
        let dimensions = img.dimensions();
        if dimensions.0 == 0 || dimensions.1 == 0 {
            bail!("image has no pixels ({}x{})", dimensions.0, dimensions.1);
        }
        check_dimensions(device, dimensions.0, dimensions.1)?;
        let rgba = img.to_rgba8();

        let size = wgpu::Extent3d {
            width: dimensions.0,
            height: dimensions.1,
            depth_or_array_layers: 1,
        };
        let texture = create_texture(device, label, size, Self::IMAGE_FORMAT);

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                aspect: wgpu::TextureAspect::All,
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
            },
            &rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * dimensions.0),
                rows_per_image: Some(dimensions.1),
            },
            size,
        );

        let view = create_full_view(&texture, Self::IMAGE_FORMAT);
        Ok(Self { texture, view })
    }

    /// Upload a tilemap as a 2-D `R32Uint` texture.
    ///
    /// The texture covers `width x height` texels, which is the footprint of a
    /// single layer. For multi-layer maps only the first layer ends up in the
    /// texture; the remaining layers stay in the source buffer.
    pub fn from_tilemap(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        tilemap: &Tilemap,
        label: Option<&str>,
    ) -> Result<Self> {
        if tilemap.width == 0 || tilemap.height == 0 {
            bail!(
                "tilemap has no cells ({}x{})",
                tilemap.width,
                tilemap.height
            );
        }
        check_dimensions(device, tilemap.width, tilemap.height)?;
        if tilemap.layers.len() < tilemap.layer_len() {
            bail!(
                "tilemap holds {} indices but one {}x{} layer needs {}",
                tilemap.layers.len(),
                tilemap.width,
                tilemap.height,
                tilemap.layer_len()
            );
        }

        let size = wgpu::Extent3d {
            width: tilemap.width,
            height: tilemap.height,
            depth_or_array_layers: 1,
        };
        let texture = create_texture(device, label, size, Self::TILEMAP_FORMAT);

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                aspect: wgpu::TextureAspect::All,
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
            },
            bytemuck::cast_slice(&tilemap.layers),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * tilemap.width),
                rows_per_image: Some(tilemap.height),
            },
            size,
        );

        let view = create_full_view(&texture, Self::TILEMAP_FORMAT);
        Ok(Self { texture, view })
    }

    pub fn size(&self) -> wgpu::Extent3d {
        self.texture.size()
    }
}

fn check_dimensions(device: &wgpu::Device, width: u32, height: u32) -> Result<()> {
    let max = device.limits().max_texture_dimension_2d;
    if width > max || height > max {
        bail!("{}x{} exceeds the device's {} texel limit", width, height, max);
    }
    Ok(())
}

fn create_texture(
    device: &wgpu::Device,
    label: Option<&str>,
    size: wgpu::Extent3d,
    format: wgpu::TextureFormat,
) -> wgpu::Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        label,
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    })
}

fn create_full_view(texture: &wgpu::Texture, format: wgpu::TextureFormat) -> wgpu::TextureView {
    texture.create_view(&wgpu::TextureViewDescriptor {
        label: None,
        format: Some(format),
        dimension: Some(wgpu::TextureViewDimension::D2),
        aspect: wgpu::TextureAspect::All,
        base_mip_level: 0,
        mip_level_count: Some(1),
        base_array_layer: 0,
        array_layer_count: Some(1),
        ..Default::default()
    })
}
