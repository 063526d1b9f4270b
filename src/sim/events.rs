//! Notifications emitted by the simulation
//!
//! The HUD, effects and persistence collaborators react to these; the
//! simulation never calls out to them directly.

use serde::{Deserialize, Serialize};

use super::state::GamePhase;

/// What the ball ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitSource {
    /// Wall above or below an obstacle's gap
    Gate,
    /// Pulse hazard inside a gap
    Pulse,
    /// Free-floating shard
    Shard,
    /// Top or bottom edge of the field
    Edge,
}

/// Game event data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Round phase changed
    PhaseChanged(GamePhase),
    /// Flip or jump applied
    Activated { gravity_dir: f32 },
    /// Ball cleared an obstacle
    GatePassed { perfect: bool, points: u32 },
    ScoreChanged(u64),
    ComboChanged(u32),
    StabilityChanged(u32),
    /// Show banner text for `duration` frames
    StreakBanner { text: String, duration: f32 },
    /// Banner display time ran out
    BannerCleared,
    /// Ball took a stability hit
    Crash { source: HitSource },
    /// New best score; the store should persist it
    BestScoreUpdated(u64),
    /// Terminal screen should be revealed
    GameOver { final_score: u64, best_score: u64 },
}
