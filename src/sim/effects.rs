//! Particles, background stars and the streak banner
//!
//! Cosmetic only. Everything here draws from the effects RNG stream, so the
//! particle cap can change without disturbing gameplay randomness.

use glam::Vec2;

use super::events::GameEvent;
use super::random::SimRng;
use super::state::{Banner, Field, Particle, RoundState, Star};

/// Color used for flip bursts and restore bursts
pub const CYAN: u32 = 0x23f5d3;
/// Color used for perfect passes
pub const ORANGE: u32 = 0xff7a59;
/// Color used for plain passes
pub const GOLD: u32 = 0xffd166;
/// Color used for crash bursts
pub const CRASH_RED: u32 = 0xff375f;

/// Which event a particle burst is celebrating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Burst {
    Flip,
    Score(u32),
    Crash,
}

struct BurstShape {
    count: usize,
    jitter: f32,
    speed: f32,
    gravity: f32,
    decay: f32,
    size: (f32, f32),
}

impl Burst {
    fn shape(self) -> BurstShape {
        match self {
            Burst::Flip => BurstShape {
                count: 12,
                jitter: 0.0,
                speed: 3.0,
                gravity: 0.08,
                decay: 0.03,
                size: (2.0, 4.0),
            },
            Burst::Score(_) => BurstShape {
                count: 16,
                jitter: 10.0,
                speed: 4.0,
                gravity: 0.05,
                decay: 0.025,
                size: (2.0, 5.0),
            },
            Burst::Crash => BurstShape {
                count: 28,
                jitter: 0.0,
                speed: 6.0,
                gravity: 0.12,
                decay: 0.02,
                size: (2.0, 6.0),
            },
        }
    }

    fn color(self) -> u32 {
        match self {
            Burst::Flip => CYAN,
            Burst::Score(color) => color,
            Burst::Crash => CRASH_RED,
        }
    }
}

/// Spawn a burst at the ball, up to the particle cap
pub fn burst(state: &mut RoundState, kind: Burst) {
    let shape = kind.shape();
    let color = kind.color();
    let origin = state.ball.pos;
    let room = state.max_particles.saturating_sub(state.particles.len());
    let rng = &mut state.fx_rng;

    for _ in 0..shape.count.min(room) {
        let offset = Vec2::new(
            rng.range(-shape.jitter, shape.jitter),
            rng.range(-shape.jitter, shape.jitter),
        );
        let vel = Vec2::new(
            rng.range(-shape.speed, shape.speed),
            rng.range(-shape.speed, shape.speed),
        );
        state.particles.push(Particle {
            pos: origin + offset,
            vel,
            gravity: shape.gravity,
            life: 1.0,
            decay: shape.decay,
            size: rng.range(shape.size.0, shape.size.1),
            color,
        });
    }
}

/// Move particles and drop the ones that faded out
pub fn update_particles(particles: &mut Vec<Particle>, delta: f32) {
    for particle in particles.iter_mut() {
        particle.pos += particle.vel * delta;
        particle.vel.y += particle.gravity * delta;
        particle.life -= particle.decay * delta;
    }
    particles.retain(|p| p.life > 0.0);
}

/// Scatter a fresh starfield across the field
pub fn create_stars(rng: &mut SimRng, field: Field, count: usize) -> Vec<Star> {
    (0..count)
        .map(|_| Star {
            pos: Vec2::new(rng.unit() * field.width, rng.unit() * field.height),
            size: rng.range(0.5, 2.5),
            speed: rng.range(0.2, 0.8),
            alpha: rng.range(0.3, 0.9),
        })
        .collect()
}

/// Scroll stars with the game speed, wrapping them to the right edge
pub fn update_stars(state: &mut RoundState, delta: f32) {
    let scroll = state.speed_multiplier * 0.6 * delta;
    let field = state.field;
    let rng = &mut state.fx_rng;
    for star in &mut state.stars {
        star.pos.x -= star.speed * scroll;
        if star.pos.x < -10.0 {
            star.pos = Vec2::new(field.width + 10.0, rng.unit() * field.height);
            star.size = rng.range(0.5, 2.5);
            star.alpha = rng.range(0.3, 0.9);
        }
    }
}

/// Show banner text for the configured duration
pub fn show_banner(state: &mut RoundState, text: String) {
    let duration = state.tuning.banner_frames;
    if duration <= 0.0 {
        return;
    }
    state.emit(GameEvent::StreakBanner {
        text: text.clone(),
        duration,
    });
    state.banner = Some(Banner {
        text,
        remaining: duration,
    });
}

/// Count the banner down and hide it when it runs out
pub fn update_banner(state: &mut RoundState, delta: f32) {
    let expired = match &mut state.banner {
        Some(banner) => {
            banner.remaining = (banner.remaining - delta).max(0.0);
            banner.remaining == 0.0
        }
        None => false,
    };
    if expired {
        state.banner = None;
        state.emit(GameEvent::BannerCleared);
    }
}
