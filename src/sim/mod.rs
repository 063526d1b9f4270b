//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time arrives only as a normalized delta
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod effects;
pub mod events;
pub mod hazards;
pub mod obstacles;
pub mod physics;
pub mod random;
pub mod scoring;
pub mod state;
pub mod tick;

pub use events::{GameEvent, HitSource};
pub use random::SimRng;
pub use state::{
    Ball, Banner, Field, GamePhase, Obstacle, PALETTE, Particle, Pulse, RoundState, Shard, Star,
    Timers,
};
pub use tick::{Command, apply, tick};
