//! GPU resources of the tilemap scene and the per-frame draw.
//!
//! [`Scene`] is built from a device and queue in the order the resources depend
//! on each other: pipeline, textures, geometry, buffers and finally the bind
//! group that ties them together. It is dropped in the reverse order.

use anyhow::{bail, Context as _};
use tokio::runtime::Runtime;
use wgpu::util::DeviceExt;

use crate::{
    config::Config,
    context::{validated, Context},
    data_structures::{
        geometry::Geometry,
        texture::Texture,
        uniforms::{uniform_buffer_size, uniform_stride, Uniforms},
    },
    pipelines::{mk_bind_group, TilemapPipeline},
    resources::{load_geometry, load_texture, load_tilemap_as_texture},
};

/// Index of the uniform block the draw call reads. The buffer has room for a
/// second block one stride further, which is never bound.
const UNIFORM_SLOT: u64 = 0;

#[derive(Debug)]
pub struct Scene {
    // Fields drop top to bottom, which is the reverse of creation order.
    bind_group: wgpu::BindGroup,
    uniform_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    vertex_buffer: wgpu::Buffer,
    // Textures are only read through the bind group.
    #[allow(unused)]
    tilemap_texture: Texture,
    #[allow(unused)]
    tileset: Texture,
    pipeline: TilemapPipeline,
    geometry: Geometry,
    uniforms: Uniforms,
    uniform_stride: u64,
}

impl Scene {
    /**
     * Create the scene's GPU resources for render targets of `color_format`.
     *
     * `screen` is the initial size of the render target, written once into the
     * uniform block. Every step runs inside a validation scope, so a resource
     * the device rejects fails this call instead of being logged later.
     */
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        runtime: &Runtime,
        color_format: wgpu::TextureFormat,
        screen: (u32, u32),
        config: &Config,
    ) -> anyhow::Result<Self> {
        log::info!("Render pipeline");
        let pipeline =
            TilemapPipeline::new(device, runtime, &config.resource(&config.shader), color_format)
                .context("could not build the render pipeline")?;

        log::info!("Textures");
        let tileset = validated(device, runtime, || {
            load_texture(&config.resource(&config.tileset), device, queue)
        })
        .context("could not load the tileset")?;
        let (tilemap_texture, tilemap) = validated(device, runtime, || {
            load_tilemap_as_texture(&config.resource(&config.tilemap), device, queue)
        })
        .context("could not load the tilemap")?;

        log::info!("Geometry");
        let geometry = load_geometry(&config.resource(&config.geometry))
            .context("could not load the geometry")?;
        if geometry.is_empty() {
            bail!(
                "geometry {} has {} point values and {} indices, nothing to draw",
                config.geometry.display(),
                geometry.points.len(),
                geometry.indices.len()
            );
        }

        log::info!("Buffers");
        let vertex_bytes: &[u8] = bytemuck::cast_slice(&geometry.points);
        let index_bytes: &[u8] = bytemuck::cast_slice(&geometry.indices);
        let max_buffer_size = device.limits().max_buffer_size;
        for (name, len) in [("vertex", vertex_bytes.len()), ("index", index_bytes.len())] {
            if len as u64 > max_buffer_size {
                bail!(
                    "{} data takes {} bytes, the device allows {} per buffer",
                    name,
                    len,
                    max_buffer_size
                );
            }
        }

        let alignment = device.limits().min_uniform_buffer_offset_alignment as u64;
        let uniform_stride = uniform_stride(Uniforms::SIZE, alignment);
        let uniforms = Uniforms::new(&tilemap, screen);
        let (vertex_buffer, index_buffer, uniform_buffer) = validated(device, runtime, || {
            let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Vertex Buffer"),
                contents: vertex_bytes,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            });
            let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Index Buffer"),
                contents: index_bytes,
                usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            });
            let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Uniform Buffer"),
                size: uniform_buffer_size(uniform_stride),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST
                    | wgpu::BufferUsages::COPY_SRC,
                mapped_at_creation: false,
            });
            queue.write_buffer(
                &uniform_buffer,
                UNIFORM_SLOT * uniform_stride,
                bytemuck::bytes_of(&uniforms),
            );
            Ok((vertex_buffer, index_buffer, uniform_buffer))
        })
        .context("could not create the buffers")?;

        log::info!("Bindings");
        let bind_group = validated(device, runtime, || {
            Ok(mk_bind_group(
                device,
                &pipeline.bind_group_layout,
                &uniform_buffer,
                &tileset,
                &tilemap_texture,
            ))
        })
        .context("could not bind the scene resources")?;

        Ok(Self {
            bind_group,
            uniform_buffer,
            index_buffer,
            vertex_buffer,
            tilemap_texture,
            tileset,
            pipeline,
            geometry,
            uniforms,
            uniform_stride,
        })
    }

    /// The buffer holding the uniform block at offset `0`.
    pub fn uniform_buffer(&self) -> &wgpu::Buffer {
        &self.uniform_buffer
    }

    /// Update the `time` field of the uniform block on the GPU.
    pub fn write_time(&mut self, queue: &wgpu::Queue, time: f32) {
        self.uniforms.time = time;
        queue.write_buffer(
            &self.uniform_buffer,
            UNIFORM_SLOT * self.uniform_stride + Uniforms::TIME_OFFSET,
            bytemuck::bytes_of(&self.uniforms.time),
        );
    }

    /// Draw into the next surface texture and present it.
    pub fn render(
        &self,
        ctx: &Context,
        clear_colour: wgpu::Color,
    ) -> Result<(), wgpu::SurfaceError> {
        let output = ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        self.draw(&ctx.device, &ctx.queue, &view, clear_colour);
        output.present();
        Ok(())
    }

    /// Clear `view` to `clear_colour` and draw every index of the geometry
    /// with the uniform block at dynamic offset `0`.
    pub fn draw(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        clear_colour: wgpu::Color,
    ) {
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
                multiview_mask: None,
            });

            let dynamic_offset = (UNIFORM_SLOT * self.uniform_stride) as u32;
            render_pass.set_pipeline(&self.pipeline.pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[dynamic_offset]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
            render_pass.draw_indexed(0..self.geometry.index_count(), 0, 0..1);
        }

        queue.submit(std::iter::once(encoder.finish()));
    }
}
