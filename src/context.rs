//! Window and GPU context.
//!
//! [`Context`] owns the window and everything wgpu needs to draw into it:
//! instance, surface, adapter, device, queue and the surface configuration
//! (the swapchain). It is created once, when the event loop resumes.

use std::sync::Arc;

use anyhow::{bail, Context as _};
use tokio::runtime::Runtime;
use winit::{dpi::LogicalSize, event_loop::ActiveEventLoop, window::Window};

use crate::config::{Config, DeviceRequirements};

#[derive(Debug)]
pub struct Context {
    // Fields drop top to bottom, which is the reverse of creation order.
    pub config: wgpu::SurfaceConfiguration,
    pub surface: wgpu::Surface<'static>,
    pub queue: wgpu::Queue,
    pub device: wgpu::Device,
    pub adapter: wgpu::Adapter,
    pub instance: wgpu::Instance,
    #[allow(unused)]
    window: Arc<Window>,
    resize_filter: ResizeFilter,
}

impl Context {
    pub fn new(
        event_loop: &ActiveEventLoop,
        config: &Config,
        runtime: &Runtime,
    ) -> anyhow::Result<Self> {
        log::info!("WGPU setup");
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        log::info!("Window and surface");
        let window_attributes = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(LogicalSize::new(config.width, config.height));
        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .context("could not open window")?,
        );
        let surface = instance
            .create_surface(window.clone())
            .context("could not bind a surface to the window")?;

        log::info!("Adapter, device and queue");
        let adapter = runtime
            .block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            }))
            .context("no adapter can present to the window")?;
        let info = adapter.get_info();
        log::info!("Using {} ({:?})", info.name, info.backend);
        let (device, queue) = request_device(&adapter, &config.requirements, runtime)?;

        log::info!("Swapchain");
        let surface_config = surface_configuration(&surface, &adapter, config)?;
        surface.configure(&device, &surface_config);
        log::info!(
            "Surface configured at {}x{} as {:?}",
            surface_config.width,
            surface_config.height,
            surface_config.format
        );

        let created = window.inner_size();
        Ok(Self {
            config: surface_config,
            surface,
            queue,
            device,
            adapter,
            instance,
            window,
            resize_filter: ResizeFilter::new(created.width, created.height),
        })
    }

    /// Rebuild the swapchain for a new framebuffer size.
    ///
    /// The surface is configured at half the reported size, see
    /// [`ResizeFilter`]. Everything else on the GPU is left untouched.
    pub fn resize(&mut self, width: u32, height: u32) {
        let Some((width, height)) = self.resize_filter.surface_size(width, height) else {
            log::debug!("Ignoring resize to {}x{}", width, height);
            return;
        };
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Configure the surface again at its current size, e.g. after it was lost.
    pub fn reconfigure(&self) {
        self.surface.configure(&self.device, &self.config);
    }
}

/// The swapchain size used for a framebuffer of `width x height` pixels.
///
/// Both dimensions are halved with integer truncation. The window is created
/// with a logical size, so this brings a 2x high-DPI framebuffer back to it.
pub fn halved_surface_size(width: u32, height: u32) -> (u32, u32) {
    (width / 2, height / 2)
}

/// Decides which `Resized` events rebuild the swapchain.
///
/// winit reports the framebuffer size once right after the window opens. That
/// first report leaves the surface at its configured size; only later resizes
/// apply, at [`halved_surface_size`]. Sizes with a zero half are skipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResizeFilter {
    created: Option<(u32, u32)>,
}

impl ResizeFilter {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            created: Some((width, height)),
        }
    }

    /// The surface size for a framebuffer of `width x height`, or `None` when
    /// the surface stays as it is.
    pub fn surface_size(&mut self, width: u32, height: u32) -> Option<(u32, u32)> {
        if self.created.take() == Some((width, height)) {
            return None;
        }
        let (width, height) = halved_surface_size(width, height);
        (width > 0 && height > 0).then_some((width, height))
    }
}

/// Run `create` inside a validation error scope.
///
/// wgpu reports most invalid objects only through error scopes or the
/// uncaptured-error handler. Here a captured error becomes an `Err`, so a
/// broken shader or an oversized texture stops initialization.
pub fn validated<T>(
    device: &wgpu::Device,
    runtime: &Runtime,
    create: impl FnOnce() -> anyhow::Result<T>,
) -> anyhow::Result<T> {
    let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
    let created = create();
    if let Some(error) = runtime.block_on(scope.pop()) {
        bail!("validation failed: {}", error);
    }
    created
}

/**
 * Request a device and queue with explicit limits and hook device errors up
 * to the log.
 *
 * Errors that wgpu cannot return directly (validation of pipelines, shaders,
 * copies) and that no [`validated`] scope catches arrive through the
 * uncaptured-error handler once the device is polled.
 */
pub fn request_device(
    adapter: &wgpu::Adapter,
    requirements: &DeviceRequirements,
    runtime: &Runtime,
) -> anyhow::Result<(wgpu::Device, wgpu::Queue)> {
    let required_limits = required_limits(&adapter.limits(), requirements);
    let (device, queue) = runtime
        .block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("GPU"),
            required_features: wgpu::Features::empty(),
            required_limits,
            ..Default::default()
        }))
        .context("the adapter does not meet the device requirements")?;

    device.on_uncaptured_error(Arc::new(|error: wgpu::Error| {
        log::error!("Device error: {}", error)
    }));

    Ok((device, queue))
}

/// The limits requested from a device.
///
/// Ceilings come from `requirements`, with texture dimensions clamped to what
/// the adapter supports. Offset alignments are the adapter's own minimums.
/// Everything else is the lowest common denominator of all backends.
pub fn required_limits(supported: &wgpu::Limits, requirements: &DeviceRequirements) -> wgpu::Limits {
    wgpu::Limits {
        max_vertex_attributes: requirements.max_vertex_attributes,
        max_vertex_buffers: requirements.max_vertex_buffers,
        max_buffer_size: requirements.max_buffer_size,
        max_vertex_buffer_array_stride: requirements.max_vertex_buffer_array_stride,
        min_storage_buffer_offset_alignment: supported.min_storage_buffer_offset_alignment,
        min_uniform_buffer_offset_alignment: supported.min_uniform_buffer_offset_alignment,
        max_bind_groups: requirements.max_bind_groups,
        max_uniform_buffers_per_shader_stage: requirements.max_uniform_buffers_per_shader_stage,
        max_uniform_buffer_binding_size: requirements.max_uniform_buffer_binding_size.into(),
        max_texture_dimension_1d: requirements
            .max_texture_dimension_1d
            .min(supported.max_texture_dimension_1d),
        max_texture_dimension_2d: requirements
            .max_texture_dimension_2d
            .min(supported.max_texture_dimension_2d),
        max_sampled_textures_per_shader_stage: requirements.max_sampled_textures_per_shader_stage,
        max_dynamic_uniform_buffers_per_pipeline_layout: requirements
            .max_dynamic_uniform_buffers_per_pipeline_layout,
        ..wgpu::Limits::downlevel_webgl2_defaults()
    }
}

fn surface_configuration(
    surface: &wgpu::Surface,
    adapter: &wgpu::Adapter,
    config: &Config,
) -> anyhow::Result<wgpu::SurfaceConfiguration> {
    let surface_caps = surface.get_capabilities(adapter);
    let format = if surface_caps.formats.contains(&config.surface_format) {
        config.surface_format
    } else {
        surface_caps
            .formats
            .first()
            .copied()
            .context("the surface supports no texture format")?
    };
    // FIFO is the one present mode every surface supports.
    let present_mode = if surface_caps.present_modes.contains(&config.present_mode) {
        config.present_mode
    } else {
        wgpu::PresentMode::Fifo
    };
    let alpha_mode = surface_caps
        .alpha_modes
        .first()
        .copied()
        .unwrap_or(wgpu::CompositeAlphaMode::Auto);

    Ok(wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format,
        width: config.width.max(1),
        height: config.height.max(1),
        present_mode,
        alpha_mode,
        view_formats: vec![],
        desired_maximum_frame_latency: 2,
    })
}
