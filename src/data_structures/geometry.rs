//! Static geometry: interleaved position/color vertices and triangle indices.

/// Number of `f32` values that make up one [`Vertex`] in a point list.
pub const FLOATS_PER_VERTEX: usize = 5;

/// Number of indices that make up one triangle in an index list.
pub const INDICES_PER_TRIANGLE: usize = 3;

/// One vertex as it is laid out in the vertex buffer: x, y, r, g, b.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 3],
}

impl Vertex {
    /// Position at location 0 and color at location 1, interleaved at a
    /// five-float stride.
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Geometry as read from a geometry file.
///
/// `points` is the flat list of vertex components in file order (five per
/// vertex) and `indices` the flat triangle list (three per triangle). Both are
/// uploaded once and never modified afterwards.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Geometry {
    pub points: Vec<f32>,
    pub indices: Vec<u16>,
}

impl Geometry {
    pub fn vertex_count(&self) -> usize {
        self.points.len() / FLOATS_PER_VERTEX
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty() || self.indices.is_empty()
    }

    /// The point list viewed as vertices. Trailing components that do not
    /// fill a whole vertex are left out.
    pub fn vertices(&self) -> Vec<Vertex> {
        self.points
            .chunks_exact(FLOATS_PER_VERTEX)
            .map(|p| Vertex {
                position: [p[0], p[1]],
                color: [p[2], p[3], p[4]],
            })
            .collect()
    }
}
