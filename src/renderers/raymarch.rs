// Copyright @yucwang 2026

use crate::buffer::camera::Camera;
use crate::math::bitmap::Bitmap;
use crate::math::constants::{ Float, Vector3f };
use crate::render::raymarchers::Raymarcher;
use crate::render::scene::Scene;
use crate::render::state::RayState;
use crate::renderers::Renderer;

use indicatif::{ ProgressBar, ProgressStyle };

use std::sync::atomic::{ AtomicUsize, Ordering };
use std::sync::{ mpsc, Arc };
use std::thread;

/// Renders a scene by firing one camera ray per pixel through the
/// raymarcher. Work is split into square pixel blocks handed out to a
/// pool of scoped threads; each ray is independent, so no
/// synchronization is needed beyond the block counter.
pub struct RaymarchRenderer {
    camera: Camera,
    raymarcher: Arc<dyn Raymarcher>,
    width: usize,
    height: usize,
}

impl RaymarchRenderer {
    pub fn new(camera: Camera, raymarcher: Arc<dyn Raymarcher>,
               width: usize, height: usize) -> Self {
        Self { camera, raymarcher, width, height }
    }

    fn render_pixel(&self, scene: &Scene, x: usize, y: usize) -> Vector3f {
        let ndc_x = 2.0 * (x as Float + 0.5) / self.width as Float - 1.0;
        let ndc_y = 1.0 - 2.0 * (y as Float + 0.5) / self.height as Float;
        let ray = self.camera.ray(ndc_x, ndc_y);
        let state = RayState::new(ray);
        self.raymarcher.integrate(scene, &state).luminance
    }
}

impl Renderer for RaymarchRenderer {
    fn render(&self, scene: &Scene) -> Bitmap {
        let (width, height) = (self.width, self.height);
        if width == 0 || height == 0 {
            return Bitmap::new(0, 0);
        }

        let block_size = 32usize;
        let blocks_x = (width + block_size - 1) / block_size;
        let blocks_y = (height + block_size - 1) / block_size;
        let total_blocks = blocks_x * blocks_y;

        let progress = ProgressBar::new(total_blocks as u64);
        progress.set_style(
            ProgressStyle::with_template(
                "[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} blocks")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let next_block = Arc::new(AtomicUsize::new(0));
        let thread_count = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let (tx, rx) =
            mpsc::channel::<(usize, usize, usize, usize, Vec<Vector3f>)>();
        let mut output = vec![Vector3f::zeros(); width * height];

        thread::scope(|scope| {
            for _ in 0..thread_count {
                let next_block = Arc::clone(&next_block);
                let tx = tx.clone();
                scope.spawn(move || {
                    loop {
                        let block_index =
                            next_block.fetch_add(1, Ordering::Relaxed);
                        if block_index >= total_blocks {
                            break;
                        }

                        let bx = block_index % blocks_x;
                        let by = block_index / blocks_x;
                        let x0 = bx * block_size;
                        let y0 = by * block_size;
                        let x1 = (x0 + block_size).min(width);
                        let y1 = (y0 + block_size).min(height);

                        let mut block =
                            vec![Vector3f::zeros(); (x1 - x0) * (y1 - y0)];
                        for y in y0..y1 {
                            for x in x0..x1 {
                                block[(x - x0) + (x1 - x0) * (y - y0)] =
                                    self.render_pixel(scene, x, y);
                            }
                        }
                        if tx.send((x0, y0, x1, y1, block)).is_err() {
                            break;
                        }
                    }
                });
            }

            drop(tx);
            for _ in 0..total_blocks {
                if let Ok((x0, y0, x1, y1, block)) = rx.recv() {
                    for y in y0..y1 {
                        for x in x0..x1 {
                            output[x + width * y] =
                                block[(x - x0) + (x1 - x0) * (y - y0)];
                        }
                    }
                    progress.inc(1);
                }
            }
        });
        progress.finish_and_clear();

        let mut bitmap = Bitmap::new(width, height);
        for y in 0..height {
            for x in 0..width {
                bitmap[(x, y)] = output[x + width * y];
            }
        }
        bitmap
    }
}

/* Tests for RaymarchRenderer */
