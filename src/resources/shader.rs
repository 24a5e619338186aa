use std::path::Path;

use crate::resources::load_string;

/**
 * Read a WGSL file and wrap it in a shader module.
 *
 * Compilation problems inside the source are reported by the device's error
 * handler; only an unreadable file is an error here.
 */
pub fn load_shader_module(path: &Path, device: &wgpu::Device) -> anyhow::Result<wgpu::ShaderModule> {
    let source = load_string(path)?;
    let label = path.file_name().and_then(|name| name.to_str());
    Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label,
        source: wgpu::ShaderSource::Wgsl(source.into()),
    }))
}
