// Particle and ring simulation for the celebration overlay.
//
// Both populations are fixed-size arenas allocated once per activation; a
// particle that falls off the bottom or a ring that fades out is re-rolled in
// its slot. All motion is scaled by elapsed milliseconds relative to a 16 ms
// reference frame, so speed does not depend on the display refresh rate.

use rand::Rng;

use super::{Size, Surface};

/// Motion constants are "per reference frame".
pub const REFERENCE_FRAME_MS: f64 = 16.0;

const PARTICLE_SIZE: (f64, f64) = (1.0, 4.0);
const PARTICLE_SPEED: (f64, f64) = (0.4, 1.2);
const PARTICLE_DRIFT: (f64, f64) = (-0.3, 0.3);
const PARTICLE_ALPHA: (f64, f64) = (0.2, 0.8);
/// Particles re-enter just above the top edge.
const PARTICLE_REENTRY_Y: f64 = -10.0;

const RING_RADIUS: (f64, f64) = (20.0, 50.0);
const RING_GROWTH: f64 = 0.6;
const RING_FADE: f64 = 0.01;
/// Rings spawn in the upper half, this far below the top edge at least.
const RING_TOP_MARGIN: f64 = 60.0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub speed: f64,
    pub drift: f64,
    pub alpha: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Ring {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub alpha: f64,
}

fn span<R: Rng>(rng: &mut R, (lo, hi): (f64, f64)) -> f64 {
    if hi > lo { rng.gen_range(lo..hi) } else { lo }
}

impl Particle {
    fn spawn<R: Rng>(rng: &mut R, area: Size) -> Self {
        Self {
            x: span(rng, (0.0, area.width)),
            y: -span(rng, (0.0, area.height)),
            size: span(rng, PARTICLE_SIZE),
            speed: span(rng, PARTICLE_SPEED),
            drift: span(rng, PARTICLE_DRIFT),
            alpha: span(rng, PARTICLE_ALPHA),
        }
    }
}

impl Ring {
    fn spawn<R: Rng>(rng: &mut R, area: Size) -> Self {
        Self {
            x: span(rng, (0.0, area.width)),
            y: span(rng, (0.0, area.height * 0.5)) + RING_TOP_MARGIN,
            radius: span(rng, RING_RADIUS),
            alpha: 1.0,
        }
    }
}

pub struct Scene<R: Rng> {
    particles: Vec<Particle>,
    rings: Vec<Ring>,
    rng: R,
    last_frame_ms: f64,
}

impl<R: Rng> Scene<R> {
    pub fn new(area: Size, particles: usize, rings: usize, mut rng: R, now_ms: f64) -> Self {
        let particles = (0..particles).map(|_| Particle::spawn(&mut rng, area)).collect();
        let rings = (0..rings).map(|_| Ring::spawn(&mut rng, area)).collect();
        Self {
            particles,
            rings,
            rng,
            last_frame_ms: now_ms,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    /// Step the simulation to frame time `now_ms` inside `area`.
    pub fn advance(&mut self, now_ms: f64, area: Size) {
        // rAF timestamps can trail the start time by a fraction of a frame.
        let elapsed = (now_ms - self.last_frame_ms).max(0.0);
        self.last_frame_ms = now_ms;
        let k = elapsed / REFERENCE_FRAME_MS;

        for p in &mut self.particles {
            p.y += p.speed * k;
            p.x += p.drift * k;
            if p.y > area.height {
                p.y = PARTICLE_REENTRY_Y;
                p.x = span(&mut self.rng, (0.0, area.width));
            }
        }

        for ring in &mut self.rings {
            ring.radius += RING_GROWTH * k;
            ring.alpha -= RING_FADE * k;
            if ring.alpha <= 0.0 {
                *ring = Ring::spawn(&mut self.rng, area);
            }
        }
    }

    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.clear();
        for p in &self.particles {
            surface.fill_circle(p.x, p.y, p.size, p.alpha);
        }
        for ring in &self.rings {
            surface.stroke_circle(ring.x, ring.y, ring.radius, ring.alpha);
        }
        surface.end_frame();
    }
}
