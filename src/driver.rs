//! Frame driver
//!
//! Owns one round, the command inbox and the best-score store. The host
//! calls [`Game::frame`] once per animation frame with a millisecond
//! timestamp and keeps calling while it returns `true`.

use std::collections::VecDeque;

use crate::consts::{MAX_DELTA_MS, REFERENCE_FRAME_MS};
use crate::persistence::{self, ScoreStore};
use crate::settings::Settings;
use crate::sim::state::{Ball, Banner, Field, GamePhase, Obstacle, Particle, RoundState, Shard, Star};
use crate::sim::{GameEvent, apply, tick};
use crate::tuning::Tuning;

pub use crate::sim::tick::Command;

/// Converts host timestamps into normalized simulation deltas
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delta since the previous call, in reference frames
    ///
    /// The first call after a reset returns 0. Gaps longer than
    /// `MAX_DELTA_MS` are clamped.
    pub fn advance(&mut self, now_ms: f64) -> f32 {
        let delta = match self.last_ms {
            Some(last) => (now_ms - last).clamp(0.0, MAX_DELTA_MS) / REFERENCE_FRAME_MS,
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        delta as f32
    }

    /// Forget the previous timestamp
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

/// Read-only snapshot handed to the frontend each frame
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub phase: GamePhase,
    pub field: Field,
    pub ball: &'a Ball,
    pub obstacles: &'a [Obstacle],
    pub shards: &'a [Shard],
    pub particles: &'a [Particle],
    pub stars: &'a [Star],
    pub banner: Option<&'a Banner>,
    pub score: u64,
    pub best_score: u64,
    pub final_score: u64,
    pub combo: u32,
    pub stability: u32,
    pub max_stability: u32,
    pub speed_multiplier: f32,
    /// Ball is inside its post-hit protection window
    pub invulnerable: bool,
    /// Host timestamp of this frame
    pub now_ms: f64,
}

impl<'a> FrameView<'a> {
    pub fn of(state: &'a RoundState, now_ms: f64) -> Self {
        Self {
            phase: state.phase,
            field: state.field,
            ball: &state.ball,
            obstacles: &state.obstacles,
            shards: &state.shards,
            particles: &state.particles,
            stars: &state.stars,
            banner: state.banner.as_ref(),
            score: state.score,
            best_score: state.best_score,
            final_score: state.final_score,
            combo: state.combo,
            stability: state.stability,
            max_stability: state.tuning.max_stability,
            speed_multiplier: state.speed_multiplier,
            invulnerable: state.timers.invulnerable > 0.0,
            now_ms,
        }
    }
}

/// Drawing and HUD surface supplied by the host
pub trait Frontend {
    fn render(&mut self, view: &FrameView<'_>);

    /// Called once per gameplay notification, in emission order
    fn notify(&mut self, _event: &GameEvent) {}
}

/// One game session: a round plus its inbox, clock and score store
pub struct Game<S: ScoreStore> {
    state: RoundState,
    store: S,
    clock: FrameClock,
    inbox: VecDeque<Command>,
}

impl<S: ScoreStore> Game<S> {
    pub fn new(mut tuning: Tuning, settings: &Settings, seed: u64, field: Field, store: S) -> Self {
        if !settings.quality.starfield_enabled() {
            tuning.star_count = 0;
        }
        let key = tuning.best_score_key.clone();
        let mut state = RoundState::new(tuning, seed, field);
        state.max_particles = settings.max_particles();
        state.best_score = persistence::load_best_score(&store, &key);
        log::info!("Game created (seed {}, {}x{})", seed, field.width, field.height);

        Self {
            state,
            store,
            clock: FrameClock::new(),
            inbox: VecDeque::new(),
        }
    }

    /// Queue a command for the next frame
    pub fn send(&mut self, command: Command) {
        self.inbox.push_back(command);
    }

    /// Run one host frame; returns whether another frame should be scheduled
    pub fn frame<F: Frontend + ?Sized>(&mut self, now_ms: f64, frontend: &mut F) -> bool {
        while let Some(command) = self.inbox.pop_front() {
            apply(&mut self.state, command);
        }

        if self.state.is_running() {
            let delta = self.clock.advance(now_ms);
            tick(&mut self.state, delta);
        }

        for event in self.state.drain_events() {
            if let GameEvent::BestScoreUpdated(score) = event {
                let key = self.state.tuning.best_score_key.clone();
                persistence::save_best_score(&mut self.store, &key, score);
            }
            frontend.notify(&event);
        }

        frontend.render(&FrameView::of(&self.state, now_ms));

        let running = self.state.is_running();
        if !running {
            // Next start measures from its own first frame
            self.clock.reset();
        }
        running
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }
}
