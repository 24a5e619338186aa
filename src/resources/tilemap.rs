//! Tilemap files in the Tiled JSON map format (`.tmj`).
//!
//! Only the fields the renderer needs are read: the top-level `width` and
//! `height` and the `data` array of every entry in `layers`. Everything else in
//! the file is ignored.

use std::path::Path;

use anyhow::{bail, Context};
use serde::Deserialize;

use crate::{data_structures::tilemap::Tilemap, resources::load_string};

#[derive(Debug, Deserialize)]
struct MapFile {
    width: u32,
    height: u32,
    layers: Vec<LayerFile>,
}

#[derive(Debug, Deserialize)]
struct LayerFile {
    data: Vec<u32>,
}

pub fn load_tilemap(path: &Path) -> anyhow::Result<Tilemap> {
    let json = load_string(path)?;
    let tilemap =
        parse_tilemap(&json).with_context(|| format!("malformed tilemap {}", path.display()))?;
    log::info!(
        "Loaded {}x{} tilemap with {} layer(s) from {}",
        tilemap.width,
        tilemap.height,
        tilemap.number_of_layers,
        path.display()
    );
    Ok(tilemap)
}

/// Parse a JSON map and flatten its layers into one buffer, layer after layer.
///
/// Maps wider or taller than [`Tilemap::MAX_DIMENSION`], or holding more than
/// [`Tilemap::MAX_CELLS`] cells over all layers, are rejected before anything
/// is allocated.
pub fn parse_tilemap(json: &str) -> anyhow::Result<Tilemap> {
    let map: MapFile = serde_json::from_str(json)?;

    if map.width > Tilemap::MAX_DIMENSION || map.height > Tilemap::MAX_DIMENSION {
        bail!(
            "map is {}x{}, at most {} cells per side are supported",
            map.width,
            map.height,
            Tilemap::MAX_DIMENSION
        );
    }
    let total = (map.width as usize)
        .checked_mul(map.height as usize)
        .and_then(|layer_len| {
            layer_len
                .checked_mul(map.layers.len())
                .map(|total| (layer_len, total))
        });
    let (layer_len, total) = match total {
        Some((layer_len, total)) if total <= Tilemap::MAX_CELLS => (layer_len, total),
        _ => bail!(
            "{}x{} map with {} layers exceeds {} cells",
            map.width,
            map.height,
            map.layers.len(),
            Tilemap::MAX_CELLS
        ),
    };
    let mut layers = vec![0; total];
    for (i, layer) in map.layers.iter().enumerate() {
        if layer.data.len() != layer_len {
            log::warn!(
                "Layer {} holds {} tiles but the map is {}x{}",
                i,
                layer.data.len(),
                map.width,
                map.height
            );
        }
        let copied = layer.data.len().min(layer_len);
        let start = i * layer_len;
        layers[start..start + copied].copy_from_slice(&layer.data[..copied]);
    }

    Ok(Tilemap {
        layers,
        width: map.width,
        height: map.height,
        number_of_layers: map.layers.len() as u32,
    })
}
