//! Gravity Rift - A side-scrolling gravity-flip arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions, scoring)
//! - `driver`: Variable-timestep frame loop and command inbox
//! - `persistence`: Best-score storage
//! - `platform`: Browser input mapping, storage and canvas frontend
//! - `tuning`: Data-driven game balance

pub mod driver;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use driver::{Command, FrameClock, FrameView, Frontend, Game};
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Length of one reference frame; a normalized delta of 1.0 equals this
    pub const REFERENCE_FRAME_MS: f64 = 16.67;
    /// Largest frame gap fed to the simulation (absorbs backgrounded tabs)
    pub const MAX_DELTA_MS: f64 = 40.0;

    /// Storage key for the rift variant's best score
    pub const RIFT_BEST_SCORE_KEY: &str = "gravityRiftBestScore";
    /// Storage key for the bounce variant's best score
    pub const BOUNCE_BEST_SCORE_KEY: &str = "bounceGameBestScore";
    /// Storage key for player settings
    pub const SETTINGS_KEY: &str = "gravity_rift_settings";

    /// Default field size used before the host reports a viewport
    pub const DEFAULT_FIELD_WIDTH: f32 = 480.0;
    pub const DEFAULT_FIELD_HEIGHT: f32 = 800.0;
}

/// Clamp that tolerates an inverted range (a field too small for its
/// margins); the upper bound wins, where `f32::clamp` would panic
#[inline]
pub fn clamp_soft(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

/// Euclidean distance between two points
#[inline]
pub fn distance(ax: f32, ay: f32, bx: f32, by: f32) -> f32 {
    (ax - bx).hypot(ay - by)
}
