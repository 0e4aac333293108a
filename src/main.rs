// Copyright 2026 TwoCookingMice

use nimbus::buffer::camera::Camera;
use nimbus::buffer::mapping::{ Mapping, MatrixMapping };
use nimbus::buffer::voxel_buffer::{ DataWindow, VoxelBuffer };
use nimbus::io::exr_utils;
use nimbus::lights::point::PointLight;
use nimbus::math::color::{ self, Color };
use nimbus::math::constants::{ Float, Int, Vector3f, Vector3i };
use nimbus::math::transform::Transform;
use nimbus::occluders::RaymarchOccluder;
use nimbus::render::params::ParamMap;
use nimbus::render::raymarchers::uniform::UniformRaymarcher;
use nimbus::render::samplers::physical::PhysicalSampler;
use nimbus::render::scene::Scene;
use nimbus::renderers::raymarch::RaymarchRenderer;
use nimbus::renderers::Renderer;
use nimbus::volumes::interp::InterpKind;
use nimbus::volumes::voxel_volume::VoxelVolume;
use nimbus::volumes::Volume;

use std::env;
use std::sync::Arc;

/// Procedural test cloud: a sphere of density falling off towards the
/// edge, modulated by a cheap ridged pattern so the silhouette is not
/// perfectly smooth.
fn make_cloud_buffer(res: Int) -> VoxelBuffer {
    let window = DataWindow::from_resolution(Vector3i::new(res, res, res));
    let xform = Transform::from_translation_scale(
        Vector3f::new(-1.0, -1.0, -1.0), Vector3f::new(2.0, 2.0, 2.0));
    let mapping = Mapping::Uniform(MatrixMapping::new(xform, window));
    let mut buffer = VoxelBuffer::new(window, mapping);

    for k in 0..res {
        for j in 0..res {
            for i in 0..res {
                let p = Vector3f::new(
                    (i as Float + 0.5) / res as Float * 2.0 - 1.0,
                    (j as Float + 0.5) / res as Float * 2.0 - 1.0,
                    (k as Float + 0.5) / res as Float * 2.0 - 1.0);
                let radial = (1.0 - p.norm() / 0.9).max(0.0);
                let ridge = 0.75 + 0.25 *
                    ((7.0 * p.x).sin() * (5.0 * p.y).cos() *
                     (6.0 * p.z).sin()).abs();
                buffer.set_value(i, j, k, color::gray(radial * ridge));
            }
        }
    }
    buffer
}

fn main() {
    env::set_var("RUST_LOG", "info");
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <output.exr> [--size N] [--res N] [--step-mult F]",
                  args[0]);
        std::process::exit(1);
    }

    let output_path = &args[1];
    let mut image_size: usize = 512;
    let mut buffer_res: Int = 64;
    let mut step_mult: Float = 1.0;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--size" => {
                i += 1;
                image_size = args.get(i)
                    .and_then(|v| v.parse::<usize>().ok())
                    .unwrap_or(image_size);
            }
            "--res" => {
                i += 1;
                buffer_res = args.get(i)
                    .and_then(|v| v.parse::<Int>().ok())
                    .unwrap_or(buffer_res);
            }
            "--step-mult" => {
                i += 1;
                step_mult = args.get(i)
                    .and_then(|v| v.parse::<Float>().ok())
                    .unwrap_or(step_mult);
            }
            _ => {}
        }
        i += 1;
    }

    log::info!("Building cloud volume at resolution {}.", buffer_res);
    let buffer = Arc::new(make_cloud_buffer(buffer_res));
    let mut volume = VoxelVolume::new(buffer);
    if let Err(e) = volume.add_attributes(
            &["scattering", "absorption"],
            &[color::gray(8.0), color::gray(0.5)]) {
        eprintln!("bad volume attributes: {}", e);
        std::process::exit(1);
    }
    volume.set_interpolation(InterpKind::Linear);
    if let Err(e) = volume.set_use_empty_space_optimization(8) {
        eprintln!("cannot enable empty-space optimization: {}", e);
        std::process::exit(1);
    }
    for line in volume.info() {
        log::info!("{}", line);
    }

    let mut scene = Scene::new(Arc::new(volume));

    let sampler = Arc::new(PhysicalSampler::new(scene.volume.as_ref()));
    let mut raymarcher = UniformRaymarcher::new(sampler);
    let mut params = ParamMap::new();
    params.set_int("use_volume_step_length", 1)
          .set_float("volume_step_length_multiplier", step_mult);
    if let Err(e) = raymarcher.set_params(&params) {
        eprintln!("bad raymarcher parameters: {}", e);
        std::process::exit(1);
    }
    raymarcher.bind_holdout(scene.volume.as_ref());
    let raymarcher = Arc::new(raymarcher);

    let mut key_light = PointLight::new(Vector3f::new(4.0, 6.0, -6.0));
    key_light.set_intensity(Color::new(1.0, 0.98, 0.94));
    key_light.set_occluder(Arc::new(RaymarchOccluder::new(raymarcher.clone())));
    scene.add_light(Arc::new(key_light));

    let mut fill_light = PointLight::new(Vector3f::new(-5.0, -2.0, -4.0));
    fill_light.set_intensity(Color::new(0.12, 0.14, 0.18));
    scene.add_light(Arc::new(fill_light));

    let camera = Camera::new(Vector3f::new(0.0, 0.0, -3.5),
                             Vector3f::new(0.0, 0.0, 0.0),
                             Vector3f::new(0.0, 1.0, 0.0),
                             std::f64::consts::FRAC_PI_4,
                             1.0,
                             0.1,
                             20.0);

    log::info!("Rendering {}x{} image.", image_size, image_size);
    let renderer = RaymarchRenderer::new(camera, raymarcher,
                                         image_size, image_size);
    let image = renderer.render(&scene);
    exr_utils::write_exr_to_file(&image.raw_copy(), image.width(),
                                 image.height(), output_path);
}
