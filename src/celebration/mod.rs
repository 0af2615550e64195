//! Celebration overlay: falling soft particles plus slowly expanding rings.
//!
//! The effect is a cooperative frame task. Each activation builds a fresh
//! [`Scene`], hands a per-frame closure to a [`FrameDriver`] and returns a
//! [`StopHandle`]. The closure checks a shared `running` flag before touching
//! anything, so once `stop` returns no later frame from that activation can
//! mutate the surface.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::config::{WidgetConfig, particle_budget};
use crate::countdown::{Celebration, StopHandle};

mod scene;

pub use scene::{Particle, REFERENCE_FRAME_MS, Ring, Scene};

/// Drawing area in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// 2D drawing target. Coordinates are CSS pixels; device-pixel scaling is the
/// implementor's business.
pub trait Surface {
    fn size(&self) -> Size;
    fn clear(&mut self);
    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, alpha: f64);
    fn stroke_circle(&mut self, x: f64, y: f64, radius: f64, alpha: f64);
    /// Called once after each frame is drawn.
    fn end_frame(&mut self) {}
}

/// Host source of animation frames (requestAnimationFrame in the browser).
pub trait FrameDriver {
    /// Current time on the same timeline as frame timestamps.
    fn now(&self) -> f64;
    /// Call `frame` once per host frame until it returns `false` or the
    /// returned handle is stopped.
    fn run(&mut self, frame: Box<dyn FnMut(f64) -> bool>) -> StopHandle;
}

pub struct CelebrationEffect<S: Surface + 'static, F: FrameDriver> {
    surface: Rc<RefCell<S>>,
    frames: F,
    reduced_motion: bool,
    max_particles: usize,
    particle_width_divisor: f64,
    ring_count: usize,
    seed: Option<u64>,
    activations: u64,
}

impl<S: Surface + 'static, F: FrameDriver> CelebrationEffect<S, F> {
    /// `reduced_motion` is sampled once by the caller; when set, every
    /// activation is a no-op.
    pub fn new(surface: S, frames: F, reduced_motion: bool, config: &WidgetConfig) -> Self {
        Self {
            surface: Rc::new(RefCell::new(surface)),
            frames,
            reduced_motion,
            max_particles: config.max_particles,
            particle_width_divisor: config.particle_width_divisor,
            ring_count: config.ring_count,
            seed: None,
            activations: 0,
        }
    }

    /// Deterministic particle layout; activation `n` uses `seed + n`.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    pub fn surface(&self) -> Rc<RefCell<S>> {
        self.surface.clone()
    }

    fn rng(&self) -> SmallRng {
        match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed.wrapping_add(self.activations)),
            None => SmallRng::from_entropy(),
        }
    }
}

impl<S: Surface + 'static, F: FrameDriver> Celebration for CelebrationEffect<S, F> {
    fn start(&mut self) -> StopHandle {
        if self.reduced_motion {
            tracing::debug!("reduced motion preferred, celebration skipped");
            return StopHandle::noop();
        }

        let area = self.surface.borrow().size();
        let mut scene = Scene::new(
            area,
            particle_budget(area.width, self.particle_width_divisor, self.max_particles),
            self.ring_count,
            self.rng(),
            self.frames.now(),
        );
        self.activations += 1;
        tracing::debug!(
            particles = scene.particles().len(),
            rings = scene.rings().len(),
            "celebration started"
        );

        let running = Rc::new(Cell::new(true));
        let frame_running = running.clone();
        let frame_surface = self.surface.clone();
        let frame_loop = self.frames.run(Box::new(move |now_ms| {
            if !frame_running.get() {
                return false;
            }
            let mut surface = frame_surface.borrow_mut();
            let area = surface.size();
            scene.advance(now_ms, area);
            scene.draw(&mut *surface);
            true
        }));

        let surface = self.surface.clone();
        StopHandle::new(move || {
            running.set(false);
            frame_loop.stop();
            surface.borrow_mut().clear();
        })
    }
}
