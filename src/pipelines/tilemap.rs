use std::path::Path;

use anyhow::Context;
use tokio::runtime::Runtime;

use crate::{
    context::validated,
    data_structures::{geometry::Vertex, texture::Texture, uniforms::Uniforms},
    resources::load_shader_module,
};

/// Straight alpha for color, destination alpha kept as it is.
pub const BLEND: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::SrcAlpha,
        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::Zero,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
};

/// The pipeline that draws the tilemap, along with the shader module and the
/// bind group layout it was built from.
#[derive(Debug)]
pub struct TilemapPipeline {
    // Released pipeline first, then shader, then layout.
    pub pipeline: wgpu::RenderPipeline,
    pub shader: wgpu::ShaderModule,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl TilemapPipeline {
    /// Build the pipeline for `color_format` targets.
    ///
    /// Fails when the shader file cannot be read or when the shader or the
    /// pipeline does not pass validation.
    pub fn new(
        device: &wgpu::Device,
        runtime: &Runtime,
        shader_path: &Path,
        color_format: wgpu::TextureFormat,
    ) -> anyhow::Result<Self> {
        let shader = validated(device, runtime, || load_shader_module(shader_path, device))
            .with_context(|| format!("could not create the shader module {}", shader_path.display()))?;
        validated(device, runtime, || Ok(Self::build(device, shader, color_format)))
            .context("invalid render pipeline")
    }

    fn build(device: &wgpu::Device, shader: wgpu::ShaderModule, color_format: wgpu::TextureFormat) -> Self {
        let bind_group_layout = mk_bind_group_layout(device);
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Tilemap Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });
        let pipeline = mk_render_pipeline(
            device,
            &layout,
            color_format,
            Some(BLEND),
            &[Vertex::desc()],
            &shader,
        );
        Self {
            pipeline,
            shader,
            bind_group_layout,
        }
    }
}

/**
 * Layout of the single bind group:
 *
 * - 0: the uniform block, addressed with a dynamic offset
 * - 1: the tileset image
 * - 2: the tile index grid
 */
pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(Uniforms::SIZE),
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Uint,
                },
                count: None,
            },
        ],
        label: Some("tilemap_bind_group_layout"),
    })
}

/// Bind the tilemap's resources to a layout made by [`mk_bind_group_layout`].
pub fn mk_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    uniform_buffer: &wgpu::Buffer,
    tileset: &Texture,
    tilemap: &Texture,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: uniform_buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(Uniforms::SIZE),
                }),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(&tileset.view),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::TextureView(&tilemap.view),
            },
        ],
        label: Some("tilemap_bind_group"),
    })
}

pub fn mk_render_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    color_format: wgpu::TextureFormat,
    blend: Option<wgpu::BlendState>,
    vertex_layouts: &[wgpu::VertexBufferLayout],
    shader: &wgpu::ShaderModule,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        cache: None,
        label: Some("Tilemap Pipeline"),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: vertex_layouts,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // The quad is drawn regardless of winding.
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview_mask: None,
    })
}
