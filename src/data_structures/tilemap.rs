//! Flattened multi-layer tilemaps.

/// A grid of tile indices, possibly split into several stacked layers.
///
/// `layers` holds every layer back to back: layer `n` occupies
/// `n * width * height .. (n + 1) * width * height`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tilemap {
    pub layers: Vec<u32>,
    pub width: u32,
    pub height: u32,
    pub number_of_layers: u32,
}

impl Tilemap {
    /// Largest accepted width or height.
    pub const MAX_DIMENSION: u32 = 16384;

    /// Largest accepted number of cells over all layers.
    pub const MAX_CELLS: usize = 1 << 26;

    /// Number of cells in a single layer.
    pub fn layer_len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// The tile indices of layer `index`, or `None` past the last layer.
    pub fn layer(&self, index: u32) -> Option<&[u32]> {
        if index >= self.number_of_layers {
            return None;
        }
        let start = index as usize * self.layer_len();
        self.layers.get(start..start + self.layer_len())
    }
}
