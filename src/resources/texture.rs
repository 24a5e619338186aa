use std::path::Path;

use anyhow::Context;

use crate::{
    data_structures::{texture::Texture, tilemap::Tilemap},
    resources::{load_binary, tilemap::load_tilemap},
};

/// Decode an image file of any supported format and upload it as RGBA8.
pub fn load_texture(
    path: &Path,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> anyhow::Result<Texture> {
    let data = load_binary(path)?;
    let label = path.to_string_lossy();
    let texture = Texture::from_bytes(device, queue, &data, &label)
        .with_context(|| format!("could not decode {}", path.display()))?;
    let size = texture.size();
    log::info!(
        "Uploaded {}x{} texture {}",
        size.width,
        size.height,
        path.display()
    );
    Ok(texture)
}

/// Load a tilemap file and upload its index grid as an `R32Uint` texture.
///
/// The parsed tilemap is handed back as well since its dimensions feed the
/// uniform block.
pub fn load_tilemap_as_texture(
    path: &Path,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> anyhow::Result<(Texture, Tilemap)> {
    let tilemap = load_tilemap(path)?;
    let label = path.to_string_lossy();
    let texture = Texture::from_tilemap(device, queue, &tilemap, Some(label.as_ref()))
        .with_context(|| format!("could not upload {}", path.display()))?;
    Ok((texture, tilemap))
}
