#[cfg(feature = "integration-tests")]
mod common;

#[cfg(feature = "integration-tests")]
fn fixture_config() -> nostalgia::config::Config {
    use nostalgia::config::Config;

    use crate::common::test_utils::fixture;

    Config {
        resource_dir: fixture(""),
        shader: std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("resources/shaders/shader.wgsl"),
        tileset: "tileset.png".into(),
        tilemap: "two_layers.tmj".into(),
        geometry: "left_half.txt".into(),
        ..Config::default()
    }
}

#[test]
#[cfg(feature = "integration-tests")]
fn should_clear_and_draw_tiles_into_a_texture() {
    use nostalgia::render::Scene;

    use crate::common::test_utils::{headless, read_texture, render_target};

    let gpu = headless();
    let config = fixture_config();
    let target = render_target(&gpu, 64);
    let scene = Scene::new(
        &gpu.device,
        &gpu.queue,
        &gpu.runtime,
        target.format(),
        (64, 64),
        &config,
    )
    .expect("failed to build the scene");

    let view = target.create_view(&wgpu::TextureViewDescriptor::default());
    scene.draw(&gpu.device, &gpu.queue, &view, config.clear_colour);
    let img = read_texture(&gpu, &target);

    // The right half is not covered by the geometry and keeps the clear colour.
    let f_to_u8 = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    let clear = f_to_u8(config.clear_colour.r);
    assert_eq!(clear, 13);
    let image::Rgba([r, g, b, a]) = *img.get_pixel(48, 32);
    for channel in [r, g, b] {
        assert!(channel.abs_diff(clear) <= 1, "pixel {:?} is not the clear colour", [r, g, b, a]);
    }
    assert_eq!(a, 255);

    // Top left cell holds tile 1, a green grass tile.
    let image::Rgba([r, g, b, a]) = *img.get_pixel(8, 8);
    assert!(g > r && g > b, "pixel {:?} is not a grass texel", [r, g, b, a]);
    assert!(g > 100);
    assert_eq!(a, 255);
}

#[test]
#[cfg(feature = "integration-tests")]
fn should_only_rewrite_the_time_field() {
    use nostalgia::{data_structures::uniforms::Uniforms, render::Scene};

    use crate::common::test_utils::{headless, read_buffer};

    let gpu = headless();
    let config = fixture_config();
    let mut scene = Scene::new(
        &gpu.device,
        &gpu.queue,
        &gpu.runtime,
        wgpu::TextureFormat::Rgba8Unorm,
        (64, 64),
        &config,
    )
    .expect("failed to build the scene");

    let size = scene.uniform_buffer().size();
    let before = read_buffer(&gpu, scene.uniform_buffer(), size);
    let initial: Uniforms = bytemuck::pod_read_unaligned(&before[..Uniforms::SIZE as usize]);
    assert_eq!((initial.tilemap_width, initial.tilemap_height), (3.0, 2.0));
    assert_eq!(initial.number_of_layers, 2.0);
    assert_eq!(initial.time, 0.0);

    scene.write_time(&gpu.queue, 5.0);
    let after = read_buffer(&gpu, scene.uniform_buffer(), size);

    let time = Uniforms::TIME_OFFSET as usize..Uniforms::TIME_OFFSET as usize + 4;
    assert_eq!(time, 16..20);
    assert_eq!(after[time.clone()], 5.0f32.to_ne_bytes());
    for (i, (old, new)) in before.iter().zip(&after).enumerate() {
        if !time.contains(&i) {
            assert_eq!(old, new, "byte {} changed", i);
        }
    }
}

#[test]
#[cfg(feature = "integration-tests")]
fn should_fail_to_build_the_scene_with_an_invalid_shader() {
    use nostalgia::render::Scene;

    use crate::common::test_utils::{fixture, headless};

    let gpu = headless();
    let config = nostalgia::config::Config {
        shader: fixture("broken.wgsl"),
        ..fixture_config()
    };

    let error = Scene::new(
        &gpu.device,
        &gpu.queue,
        &gpu.runtime,
        wgpu::TextureFormat::Rgba8Unorm,
        (64, 64),
        &config,
    )
    .expect_err("scene must not build from invalid WGSL");
    assert!(format!("{:#}", error).contains("render pipeline"));
}
