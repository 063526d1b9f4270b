//! Round state and core simulation types
//!
//! Everything one round needs lives in `RoundState`; subsystems borrow it
//! mutably for the duration of a tick and never hold on to it.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::events::GameEvent;
use super::random::SimRng;
use crate::tuning::Tuning;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first input
    Start,
    /// Active gameplay
    Playing,
    /// Stability exhausted, effects play out before game over
    Ending,
    /// Round finished, waiting for restart
    GameOver,
}

/// Obstacle and shard colors (0xRRGGBB)
pub const PALETTE: [u32; 4] = [0x23f5d3, 0xff7a59, 0x7c5cff, 0xffd166];

/// Play field size in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub width: f32,
    pub height: f32,
}

impl Field {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }
}

/// The player's ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub radius: f32,
    /// Signed vertical velocity (positive = down)
    pub velocity: f32,
    /// Gravity direction sign, +1 pulls down and -1 pulls up
    pub gravity_dir: f32,
    /// Trail history (oldest first)
    pub trail: VecDeque<Vec2>,
    /// Fractional frames accumulated toward the next trail point
    #[serde(skip)]
    pub trail_timer: f32,
}

impl Ball {
    pub fn new(field: Field, tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(field.width * tuning.ball_x_fraction, field.height * 0.5),
            radius: tuning.ball_radius,
            velocity: 0.0,
            gravity_dir: 1.0,
            trail: VecDeque::with_capacity(tuning.trail_length + 1),
            trail_timer: 0.0,
        }
    }

    /// Top of the ball's vertical extent
    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y - self.radius
    }

    /// Bottom of the ball's vertical extent
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.radius
    }
}

/// Point hazard riding inside an obstacle's gap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pulse {
    pub radius: f32,
    /// Offset from the gap center
    pub offset: f32,
    pub amplitude: f32,
    pub speed: f32,
    pub phase: f32,
    /// Position as of the last tick
    pub pos: Vec2,
}

/// A gated wall scrolling toward the ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Left edge
    pub x: f32,
    pub width: f32,
    pub gap_size: f32,
    /// Gap center before oscillation
    pub base_y: f32,
    /// Gap center as of the last tick
    pub gap_center: f32,
    pub amplitude: f32,
    pub frequency: f32,
    pub phase: f32,
    pub color: u32,
    /// Set once the ball has cleared this obstacle
    pub passed: bool,
    pub pulse: Option<Pulse>,
    // Cosmetic only
    pub ring_offset: f32,
    pub ring_tilt: f32,
    pub horizon_boost: f32,
}

impl Obstacle {
    /// Right (trailing) edge
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn gap_top(&self) -> f32 {
        self.gap_center - self.gap_size / 2.0
    }

    #[inline]
    pub fn gap_bottom(&self) -> f32 {
        self.gap_center + self.gap_size / 2.0
    }

    /// Re-evaluate the gap sinusoid and the pulse position for `frame`
    pub fn refresh(&mut self, frame: f32, field_height: f32, margin: f32) {
        let sway = (frame * self.frequency + self.phase).sin() * self.amplitude;
        let half = self.gap_size / 2.0;
        self.gap_center = crate::clamp_soft(self.base_y + sway, margin + half, field_height - margin - half);

        if let Some(pulse) = &mut self.pulse {
            let bob = (frame * pulse.speed + pulse.phase).sin() * pulse.amplitude;
            pulse.pos = Vec2::new(self.x + self.width * 0.5, self.gap_center + pulse.offset + bob);
        }
    }
}

/// Free-floating drifting hazard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shard {
    pub id: u32,
    pub pos: Vec2,
    pub size: f32,
    /// Leftward speed
    pub speed: f32,
    /// Vertical drift, sign flips at the reflect margin
    pub drift: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
    pub color: u32,
}

/// A particle for visual effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub gravity: f32,
    /// 0-1, decreases by `decay` per frame
    pub life: f32,
    pub decay: f32,
    pub size: f32,
    pub color: u32,
}

/// Parallax background star
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Star {
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
    pub alpha: f32,
}

/// Streak banner text and its remaining display time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Banner {
    pub text: String,
    pub remaining: f32,
}

/// Countdown timers, in reference frames
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timers {
    /// Collisions ignored after a round starts
    pub grace: f32,
    /// Collisions ignored after a hit
    pub invulnerable: f32,
    /// Frames left in the ending sequence
    pub ending: f32,
    /// Frames until the next shard spawns
    pub next_hazard: f32,
}

/// Complete state of one round (deterministic given seed and inputs)
#[derive(Debug, Clone)]
pub struct RoundState {
    pub tuning: Tuning,
    /// Run seed for reproducibility
    pub seed: u64,
    pub field: Field,
    pub phase: GamePhase,
    pub score: u64,
    pub best_score: u64,
    /// Score snapshot taken when the round ended
    pub final_score: u64,
    pub combo: u32,
    pub perfect_streak: u32,
    pub stability: u32,
    /// Elapsed reference frames this round
    pub frame_count: f32,
    pub speed_multiplier: f32,
    /// Current scroll speed
    pub game_speed: f32,
    pub current_gap: f32,
    pub obstacle_spacing: f32,
    /// Distance the newest obstacle must travel before the next spawns
    pub next_obstacle_spacing: f32,
    pub timers: Timers,
    pub banner: Option<Banner>,
    pub ball: Ball,
    /// Obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    /// Shards in spawn order
    pub shards: Vec<Shard>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub stars: Vec<Star>,
    /// Particle cap from the player's settings
    pub max_particles: usize,
    pub(crate) rng: SimRng,
    pub(crate) fx_rng: SimRng,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl RoundState {
    /// Create a round waiting in the start phase
    pub fn new(tuning: Tuning, seed: u64, field: Field) -> Self {
        let mut fx_rng = SimRng::fx(seed);
        let stars = super::effects::create_stars(&mut fx_rng, field, tuning.star_count);
        let ball = Ball::new(field, &tuning);
        let mut state = Self {
            seed,
            field,
            phase: GamePhase::Start,
            score: 0,
            best_score: 0,
            final_score: 0,
            combo: 1,
            perfect_streak: 0,
            stability: tuning.max_stability,
            frame_count: 0.0,
            speed_multiplier: 1.0,
            game_speed: tuning.base_speed,
            current_gap: tuning.base_gap,
            obstacle_spacing: tuning.base_spacing,
            next_obstacle_spacing: tuning.base_spacing,
            timers: Timers::default(),
            banner: None,
            ball,
            obstacles: Vec::new(),
            shards: Vec::new(),
            particles: Vec::new(),
            stars,
            max_particles: crate::settings::Settings::default().max_particles(),
            rng: SimRng::new(seed),
            fx_rng,
            events: Vec::new(),
            next_id: 1,
            tuning,
        };
        state.reset_round();
        state
    }

    /// Return every per-round value to its starting point
    ///
    /// Leaves the phase, field, stars, best score and random streams alone,
    /// so calling it twice is the same as calling it once.
    pub fn reset_round(&mut self) {
        let t = &self.tuning;
        self.score = 0;
        self.final_score = 0;
        self.combo = 1;
        self.perfect_streak = 0;
        self.stability = t.max_stability;
        self.frame_count = 0.0;
        self.speed_multiplier = 1.0;
        self.game_speed = t.base_speed;
        self.current_gap = t.base_gap;
        self.obstacle_spacing = t.base_spacing;
        self.next_obstacle_spacing = t.base_spacing;
        self.timers = Timers {
            grace: t.grace_frames,
            invulnerable: 0.0,
            ending: 0.0,
            next_hazard: t.first_hazard_delay,
        };
        self.banner = None;
        self.ball = Ball::new(self.field, t);
        self.obstacles.clear();
        self.shards.clear();
        self.particles.clear();
        self.next_id = 1;
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Queue a notification for the frontend
    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Pending notifications, oldest first
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take all pending notifications
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// True while the host should keep scheduling frames
    pub fn is_running(&self) -> bool {
        matches!(self.phase, GamePhase::Playing | GamePhase::Ending)
    }
}
