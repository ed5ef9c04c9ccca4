//! Parallel row scheduler.
//!
//! Workers claim whole image rows from a shared atomic counter until every
//! row is taken. One worker runs on the calling thread, the rest on a rayon
//! pool. Rows are independent, so the counter is the only shared mutable
//! state that needs coordination.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::{ThreadPoolBuildError, ThreadPoolBuilder};
use thiserror::Error;

use crate::renderer::render_pixel;
use crate::{Camera, Framebuffer, Hittable, RenderConfig};

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to start render threads: {0}")]
    ThreadPool(#[from] ThreadPoolBuildError),
}

/// Hands out row indices, each exactly once.
struct RowCounter {
    next: AtomicUsize,
    height: usize,
}

impl RowCounter {
    fn new(height: usize) -> Self {
        Self {
            next: AtomicUsize::new(0),
            height,
        }
    }

    fn claim(&self) -> Option<usize> {
        let row = self.next.fetch_add(1, Ordering::Relaxed);
        (row < self.height).then_some(row)
    }
}

/// Render `world` through `camera` using `config.threads` threads.
///
/// Each worker owns an entropy-seeded RNG, so results are not
/// reproducible between runs.
pub fn render(
    camera: &Camera,
    world: &dyn Hittable,
    config: &RenderConfig,
) -> Result<Framebuffer, RenderError> {
    let threads = config.threads.max(1);
    let mut framebuffer = Framebuffer::new(config.width, config.height);

    log::info!(
        "Rendering {}x{} at {} spp, depth {}, {} threads",
        config.width,
        config.height,
        config.samples_per_pixel,
        config.max_depth,
        threads
    );

    // Every row is claimed once, so its lock is never contended
    let rows: Vec<Mutex<&mut [f32]>> = framebuffer.rows_mut().map(Mutex::new).collect();
    let counter = RowCounter::new(rows.len());

    let worker = |worker_id: usize| {
        let mut rng = StdRng::from_entropy();
        let mut rendered = 0usize;

        while let Some(y) = counter.claim() {
            let mut row = rows[y].lock().unwrap_or_else(PoisonError::into_inner);
            for (x, pixel) in row.chunks_exact_mut(3).enumerate() {
                let color = render_pixel(camera, world, x as u32, y as u32, config, &mut rng);
                color.write_to_slice(pixel);
            }
            rendered += 1;
            log::debug!("Worker {} processed row {} of {}", worker_id, y, config.height);
        }

        log::debug!("Worker {} finished after {} rows", worker_id, rendered);
    };

    if threads == 1 {
        worker(0);
    } else {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads - 1)
            .thread_name(|index| format!("lantern-worker-{}", index + 1))
            .build()?;

        pool.in_place_scope(|scope| {
            for worker_id in 1..threads {
                let worker = &worker;
                scope.spawn(move |_| worker(worker_id));
            }
            worker(0);
        });
    }

    drop(rows);
    log::info!("Render finished");
    Ok(framebuffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AxisRect, Color, DiffuseLight, HittableList, Material, Vec3};
    use std::sync::Arc;

    #[test]
    fn test_every_row_claimed_once() {
        let height = 1000;
        let counter = RowCounter::new(height);

        let claimed: Vec<Vec<usize>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(|| {
                        let mut rows = Vec::new();
                        while let Some(row) = counter.claim() {
                            rows.push(row);
                        }
                        rows
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let mut all: Vec<usize> = claimed.into_iter().flatten().collect();
        all.sort_unstable();
        assert_eq!(all, (0..height).collect::<Vec<_>>());
        assert_eq!(counter.claim(), None);
    }

    fn light_wall() -> (Camera, HittableList) {
        // An emitter that fills the whole view; no path ever scatters
        let light: Arc<dyn Material> = Arc::new(DiffuseLight::new(Color::splat(0.25)));
        let mut world = HittableList::new();
        world.add(AxisRect::xy((-100.0, 100.0), (-100.0, 100.0), -1.0, light));

        let mut camera = Camera::new()
            .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_aspect_ratio(2.0);
        camera.initialize();
        (camera, world)
    }

    #[test]
    fn test_render_fills_every_pixel() {
        let (camera, world) = light_wall();
        for threads in [1, 4] {
            let config = RenderConfig {
                width: 16,
                height: 8,
                samples_per_pixel: 2,
                threads,
                ..RenderConfig::default()
            };

            let framebuffer = render(&camera, &world, &config).unwrap();
            assert_eq!(framebuffer.width(), 16);
            assert_eq!(framebuffer.height(), 8);
            for y in 0..8 {
                for x in 0..16 {
                    // sqrt(0.25) = 0.5
                    assert_eq!(framebuffer.pixel(x, y), Color::splat(0.5));
                }
            }
        }
    }

    #[test]
    fn test_more_threads_than_rows() {
        let (camera, world) = light_wall();
        let config = RenderConfig {
            width: 4,
            height: 2,
            samples_per_pixel: 1,
            threads: 8,
            ..RenderConfig::default()
        };

        let framebuffer = render(&camera, &world, &config).unwrap();
        assert_eq!(framebuffer.row(1), &[0.5; 12]);
        assert!(framebuffer.to_rgb8().pixels().all(|p| p.0 == [127, 127, 127]));
    }
}
