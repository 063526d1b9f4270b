//! Data-driven game balance
//!
//! Every gameplay constant lives here so the two variants of the game share
//! one simulation core. `Tuning::rift()` is the full gravity-flip game;
//! `Tuning::bounce()` is the classic tap-to-jump game expressed as a reduced
//! configuration of the same core.

use serde::{Deserialize, Serialize};

/// How the activate action moves the ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Control {
    /// Invert gravity and blend the current velocity with a fixed impulse
    Flip {
        /// Impulse applied along the new gravity direction
        impulse: f32,
        /// Share of the previous velocity kept on flip
        retention: f32,
    },
    /// Constant downward gravity, activation sets velocity outright
    Jump {
        /// Velocity assigned on jump (negative = up)
        power: f32,
    },
}

/// Complete balance sheet for one game variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Ball ===
    /// Ball x position as a fraction of field width
    pub ball_x_fraction: f32,
    pub ball_radius: f32,
    /// Gravity magnitude per reference frame
    pub gravity: f32,
    pub control: Control,
    /// Velocity magnitude cap
    pub velocity_clamp: f32,
    /// Per-frame velocity damping factor (1.0 = none)
    pub velocity_damping: f32,
    /// Distance from the top/bottom edge the ball may not enter
    pub edge_buffer: f32,
    /// Speed the ball rebounds with when it meets an edge
    pub edge_rebound: f32,
    /// Whether touching an edge costs stability
    pub edge_damage: bool,
    /// Maximum stored trail points
    pub trail_length: usize,

    // === Obstacles ===
    /// Scroll speed at multiplier 1.0
    pub base_speed: f32,
    pub obstacle_width: f32,
    /// Extra width factor applied to sqrt(uniform) on spawn
    pub width_variance: f32,
    pub base_gap: f32,
    pub min_gap: f32,
    /// Gap shrink per reference frame of elapsed time
    pub gap_shrink_per_frame: f32,
    /// Gap jitter range added on spawn
    pub gap_jitter: (f32, f32),
    /// Extra gap during the opening frames
    pub early_gap_bonus: f32,
    pub early_gap_frames: f32,
    /// Vertical margin the gap stays clear of
    pub gap_margin: f32,
    pub amplitude_range: (f32, f32),
    /// Amplitude added per unit of speed multiplier
    pub amplitude_per_speed: f32,
    pub frequency_range: (f32, f32),
    pub frequency_per_speed: f32,
    pub base_spacing: f32,
    pub min_spacing: f32,
    /// Spacing lost per unit of speed multiplier above 1.0
    pub spacing_per_speed: f32,
    /// Random extra spacing added after each spawn
    pub spacing_jitter: f32,
    /// Extra spacing per pixel of width above the base width
    pub spacing_per_width: f32,
    /// How far right of the field obstacles spawn
    pub spawn_offset: f32,
    /// How far left of the field obstacles/hazards are kept before removal
    pub despawn_margin: f32,
    /// Chance a new obstacle carries a pulse hazard
    pub pulse_chance: f64,
    /// Elapsed frames before pulses may appear
    pub pulse_start_frame: f32,

    // === Shards ===
    pub hazards_enabled: bool,
    /// Elapsed frames before shards start spawning
    pub hazard_start_frame: f32,
    /// Countdown to the first shard
    pub first_hazard_delay: f32,
    /// Countdown range after each shard (divided by speed multiplier)
    pub hazard_interval: (f32, f32),
    /// Vertical distance from the edges where shards reflect
    pub hazard_reflect_margin: f32,
    /// Share of a shard's size that counts for collisions
    pub hazard_hit_ratio: f32,

    // === Collision forgiveness ===
    pub side_forgive_max: f32,
    /// Side forgiveness as a fraction of obstacle width
    pub side_forgive_ratio: f32,
    pub gap_forgive_max: f32,
    /// Gap forgiveness as a fraction of gap size
    pub gap_forgive_ratio: f32,

    // === Progression ===
    pub max_stability: u32,
    pub combo_enabled: bool,
    pub max_combo: u32,
    /// Max distance from gap center for a perfect pass
    pub perfect_window: f32,
    /// Perfect passes in a row needed to restore one stability
    pub health_streak_goal: u32,
    /// Frames after start during which collisions are ignored
    pub grace_frames: f32,
    /// Frames after a hit during which collisions are ignored
    pub invulnerable_frames: f32,
    /// Frames the ending sequence runs before game over
    pub ending_frames: f32,
    /// Frames a streak banner stays visible
    pub banner_frames: f32,
    pub max_speed_multiplier: f32,
    /// Elapsed frames per +1.0 speed multiplier
    pub speed_time_constant: f32,
    /// Speed multiplier added per combo step above 1
    pub combo_speed_bonus: f32,

    // === Background ===
    pub star_count: usize,
    /// Storage key the variant's best score is kept under
    pub best_score_key: String,
}

impl Default for Tuning {
    fn default() -> Self {
        Self::rift()
    }
}

impl Tuning {
    /// The gravity-flip game with hazards, combos and stability
    pub fn rift() -> Self {
        Self {
            ball_x_fraction: 0.25,
            ball_radius: 13.0,
            gravity: 0.4,
            control: Control::Flip {
                impulse: 8.4,
                retention: 0.2,
            },
            velocity_clamp: 8.6,
            velocity_damping: 0.988,
            edge_buffer: 16.0,
            edge_rebound: 1.6,
            edge_damage: true,
            trail_length: 14,

            base_speed: 2.7,
            obstacle_width: 80.0,
            width_variance: 0.7,
            base_gap: 240.0,
            min_gap: 175.0,
            gap_shrink_per_frame: 1.0 / 110.0,
            gap_jitter: (-4.0, 6.0),
            early_gap_bonus: 50.0,
            early_gap_frames: 300.0,
            gap_margin: 60.0,
            amplitude_range: (12.0, 38.0),
            amplitude_per_speed: 4.0,
            frequency_range: (0.004, 0.009),
            frequency_per_speed: 0.0008,
            base_spacing: 480.0,
            min_spacing: 440.0,
            spacing_per_speed: 10.0,
            spacing_jitter: 180.0,
            spacing_per_width: 0.4,
            spawn_offset: 40.0,
            despawn_margin: 40.0,
            pulse_chance: 0.12,
            pulse_start_frame: 1200.0,

            hazards_enabled: true,
            hazard_start_frame: 1200.0,
            first_hazard_delay: 180.0,
            hazard_interval: (260.0, 360.0),
            hazard_reflect_margin: 30.0,
            hazard_hit_ratio: 0.7,

            side_forgive_max: 12.0,
            side_forgive_ratio: 0.2,
            gap_forgive_max: 12.0,
            gap_forgive_ratio: 0.12,

            max_stability: 25,
            combo_enabled: true,
            max_combo: 6,
            perfect_window: 32.0,
            health_streak_goal: 5,
            grace_frames: 200.0,
            invulnerable_frames: 110.0,
            ending_frames: 28.0,
            banner_frames: 50.0,
            max_speed_multiplier: 1.7,
            speed_time_constant: 3600.0,
            combo_speed_bonus: 0.03,

            star_count: 70,
            best_score_key: crate::consts::RIFT_BEST_SCORE_KEY.to_string(),
        }
    }

    /// The classic tap-to-jump game: one life, static gaps, no hazards
    pub fn bounce() -> Self {
        Self {
            ball_x_fraction: 0.2,
            ball_radius: 15.0,
            gravity: 0.5,
            control: Control::Jump { power: -10.0 },
            velocity_clamp: f32::MAX,
            velocity_damping: 1.0,
            edge_buffer: 0.0,
            edge_rebound: 0.0,
            edge_damage: false,
            trail_length: 10,

            base_speed: 3.0,
            obstacle_width: 60.0,
            width_variance: 0.0,
            base_gap: 150.0,
            min_gap: 150.0,
            gap_shrink_per_frame: 0.0,
            gap_jitter: (0.0, 0.0),
            early_gap_bonus: 0.0,
            early_gap_frames: 0.0,
            gap_margin: 50.0,
            amplitude_range: (0.0, 0.0),
            amplitude_per_speed: 0.0,
            frequency_range: (0.0, 0.0),
            frequency_per_speed: 0.0,
            base_spacing: 300.0,
            min_spacing: 300.0,
            spacing_per_speed: 0.0,
            spacing_jitter: 0.0,
            spacing_per_width: 0.0,
            spawn_offset: 0.0,
            despawn_margin: 0.0,
            pulse_chance: 0.0,
            pulse_start_frame: f32::MAX,

            hazards_enabled: false,
            hazard_start_frame: f32::MAX,
            first_hazard_delay: 0.0,
            hazard_interval: (0.0, 0.0),
            hazard_reflect_margin: 0.0,
            hazard_hit_ratio: 0.0,

            side_forgive_max: 0.0,
            side_forgive_ratio: 0.0,
            gap_forgive_max: 0.0,
            gap_forgive_ratio: 0.0,

            max_stability: 1,
            combo_enabled: false,
            max_combo: 1,
            perfect_window: 0.0,
            health_streak_goal: u32::MAX,
            grace_frames: 0.0,
            invulnerable_frames: 0.0,
            ending_frames: 30.0,
            banner_frames: 0.0,
            // +0.5 speed every 600 frames on a base of 3.0
            max_speed_multiplier: 10.0,
            speed_time_constant: 3600.0,
            combo_speed_bonus: 0.0,

            star_count: 50,
            best_score_key: crate::consts::BOUNCE_BEST_SCORE_KEY.to_string(),
        }
    }

    /// Apply a partial JSON object on top of this preset
    ///
    /// Malformed overrides are logged and the preset is kept unchanged.
    pub fn with_overrides(self, json: &str) -> Self {
        match self.merged(json) {
            Ok(tuning) => {
                log::info!("Applied tuning overrides");
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring malformed tuning overrides: {}", e);
                self
            }
        }
    }

    fn merged(&self, json: &str) -> serde_json::Result<Self> {
        let mut base = serde_json::to_value(self)?;
        let patch: serde_json::Value = serde_json::from_str(json)?;
        let (Some(fields), Some(overrides)) = (base.as_object_mut(), patch.as_object()) else {
            return Err(serde::de::Error::custom("tuning overrides must be a JSON object"));
        };
        for (key, value) in overrides {
            fields.insert(key.clone(), value.clone());
        }
        serde_json::from_value(base)
    }
}
