#![allow(dead_code)]

use std::path::{Path, PathBuf};

/// Path of a file in `tests/fixtures`.
pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// A device without a window, for tests that only need to create resources.
#[cfg(feature = "integration-tests")]
pub struct Headless {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub adapter: wgpu::Adapter,
    pub runtime: tokio::runtime::Runtime,
}

#[cfg(feature = "integration-tests")]
pub fn headless() -> Headless {
    use nostalgia::{config::DeviceRequirements, context::request_device};

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("Failed to create a runtime");
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::PRIMARY,
        ..Default::default()
    });
    let adapter = runtime
        .block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: None,
            force_fallback_adapter: false,
        }))
        .expect("No adapter available");
    let (device, queue) = request_device(&adapter, &DeviceRequirements::default(), &runtime)
        .expect("Failed to create a device");
    Headless {
        device,
        queue,
        adapter,
        runtime,
    }
}

/// Copy `size` bytes from the start of `buffer` back to the CPU.
/// `buffer` needs `COPY_SRC` usage.
#[cfg(feature = "integration-tests")]
pub fn read_buffer(gpu: &Headless, buffer: &wgpu::Buffer, size: u64) -> Vec<u8> {
    let staging = staging_buffer(gpu, size);
    let mut encoder = gpu
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
    encoder.copy_buffer_to_buffer(buffer, 0, &staging, 0, size);
    gpu.queue.submit(std::iter::once(encoder.finish()));
    map_staging(gpu, &staging)
}

/// An RGBA8 render target of `size x size` pixels that can be read back.
#[cfg(feature = "integration-tests")]
pub fn render_target(gpu: &Headless, size: u32) -> wgpu::Texture {
    gpu.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Test Target"),
        size: wgpu::Extent3d {
            width: size,
            height: size,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8Unorm,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    })
}

/// Read an RGBA8 texture back into an image.
///
/// Rows are copied with the alignment wgpu requires, so the texture width must
/// be a multiple of 64.
#[cfg(feature = "integration-tests")]
pub fn read_texture(gpu: &Headless, texture: &wgpu::Texture) -> image::RgbaImage {
    let (width, height) = (texture.width(), texture.height());
    let bytes_per_row = 4 * width;
    assert_eq!(bytes_per_row % wgpu::COPY_BYTES_PER_ROW_ALIGNMENT, 0);

    let staging = staging_buffer(gpu, (bytes_per_row * height) as u64);
    let mut encoder = gpu
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            aspect: wgpu::TextureAspect::All,
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &staging,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(bytes_per_row),
                rows_per_image: Some(height),
            },
        },
        texture.size(),
    );
    gpu.queue.submit(std::iter::once(encoder.finish()));
    image::RgbaImage::from_raw(width, height, map_staging(gpu, &staging))
        .expect("Readback has the wrong size")
}

#[cfg(feature = "integration-tests")]
fn staging_buffer(gpu: &Headless, size: u64) -> wgpu::Buffer {
    gpu.device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Readback"),
        size,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    })
}

#[cfg(feature = "integration-tests")]
fn map_staging(gpu: &Headless, staging: &wgpu::Buffer) -> Vec<u8> {
    let (tx, rx) = std::sync::mpsc::channel();
    let slice = staging.slice(..);
    slice.map_async(wgpu::MapMode::Read, move |result| {
        tx.send(result).unwrap();
    });
    gpu.device
        .poll(wgpu::PollType::wait_indefinitely())
        .expect("Device poll failed");
    rx.recv()
        .expect("Map callback did not run")
        .expect("Failed to map the readback buffer");
    let data = slice.get_mapped_range().to_vec();
    staging.unmap();
    data
}
