//! Variable timestep simulation tick
//!
//! Core game loop step that advances a round by a normalized delta.

use serde::{Deserialize, Serialize};

use super::effects::{self, Burst};
use super::events::{GameEvent, HitSource};
use super::state::{Field, GamePhase, RoundState};
use super::{collision, hazards, obstacles, physics, scoring};

/// Inbound messages from the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Tap/click/space: start, flip or restart depending on phase
    Activate,
    /// Start button on the title screen
    StartRound,
    /// Restart button on the game over screen
    RestartRound,
    /// Play field was resized
    ViewportResized { width: f32, height: f32 },
}

/// Apply one inbound command; never advances simulation time
pub fn apply(state: &mut RoundState, command: Command) {
    match command {
        Command::Activate => activate(state),
        Command::StartRound => start_round(state),
        Command::RestartRound => restart_round(state),
        Command::ViewportResized { width, height } => resize(state, width, height),
    }
}

/// Route the activate action by phase
pub fn activate(state: &mut RoundState) {
    match state.phase {
        GamePhase::Start => start_round(state),
        GamePhase::GameOver => restart_round(state),
        GamePhase::Playing => {
            physics::activate(&mut state.ball, state.tuning.control);
            state.emit(GameEvent::Activated {
                gravity_dir: state.ball.gravity_dir,
            });
            effects::burst(state, Burst::Flip);
        }
        GamePhase::Ending => {}
    }
}

/// Leave the title screen
pub fn start_round(state: &mut RoundState) {
    if state.phase != GamePhase::Start {
        log::debug!("Start ignored in {:?}", state.phase);
        return;
    }
    enter_playing(state);
}

/// Reset everything and play again
pub fn restart_round(state: &mut RoundState) {
    enter_playing(state);
}

fn enter_playing(state: &mut RoundState) {
    state.reset_round();
    state.phase = GamePhase::Playing;
    log::info!("Round started (seed {}, best {})", state.seed, state.best_score);
    state.emit(GameEvent::PhaseChanged(GamePhase::Playing));
    state.emit(GameEvent::ScoreChanged(state.score));
    state.emit(GameEvent::ComboChanged(state.combo));
    state.emit(GameEvent::StabilityChanged(state.stability));
}

/// Adopt a new field size without restarting the round
pub fn resize(state: &mut RoundState, width: f32, height: f32) {
    let old = state.field;
    let new = Field::new(width, height);
    if old == new {
        return;
    }
    log::debug!("Field resized {}x{} -> {}x{}", old.width, old.height, new.width, new.height);
    state.field = new;
    physics::rescale(&mut state.ball, old, new, state.tuning.ball_x_fraction);
    state.stars = effects::create_stars(&mut state.fx_rng, new, state.tuning.star_count);
}

/// Advance the round by `delta` reference frames
pub fn tick(state: &mut RoundState, delta: f32) {
    match state.phase {
        GamePhase::Playing => update_playing(state, delta),
        GamePhase::Ending => update_ending(state, delta),
        GamePhase::Start | GamePhase::GameOver => {}
    }
}

fn update_playing(state: &mut RoundState, delta: f32) {
    state.frame_count += delta;
    scoring::tick_protection(state, delta);
    scoring::update_difficulty(state);

    physics::advance_ball(&mut state.ball, &state.tuning, delta);
    // Hit lands before the clamp so the crash burst starts where the ball struck
    let edge = physics::touching_edge(&state.ball, &state.tuning, state.field);
    if edge.is_some() && state.tuning.edge_damage {
        scoring::stability_hit(state, HitSource::Edge);
    }
    physics::constrain(&mut state.ball, &state.tuning, state.field);

    obstacles::update_obstacles(state, delta);
    hazards::update_hazards(state, delta);
    effects::update_particles(&mut state.particles, delta);
    effects::update_stars(state, delta);
    effects::update_banner(state, delta);

    if let Some(source) = collision::check_collisions(state) {
        scoring::stability_hit(state, source);
    }
}

fn update_ending(state: &mut RoundState, delta: f32) {
    effects::update_particles(&mut state.particles, delta);
    effects::update_stars(state, delta);
    effects::update_banner(state, delta);
    scoring::tick_ending(state, delta);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Obstacle, PALETTE};
    use crate::tuning::Tuning;

    fn new_state() -> RoundState {
        RoundState::new(Tuning::rift(), 12345, Field::new(400.0, 700.0))
    }

    #[test]
    fn test_start_to_playing() {
        let mut state = new_state();
        tick(&mut state, 1.0);
        assert_eq!(state.phase, GamePhase::Start);
        assert_eq!(state.frame_count, 0.0);

        apply(&mut state, Command::Activate);
        assert_eq!(state.phase, GamePhase::Playing);
        // Activating from the title screen starts without flipping
        assert_eq!(state.ball.gravity_dir, 1.0);

        tick(&mut state, 1.0);
        assert_eq!(state.frame_count, 1.0);
        assert_eq!(state.obstacles.len(), 1);
    }

    #[test]
    fn test_activate_flips_while_playing() {
        let mut state = new_state();
        apply(&mut state, Command::StartRound);
        apply(&mut state, Command::Activate);
        assert_eq!(state.ball.gravity_dir, -1.0);
        assert_eq!(state.particles.len(), 12);
        assert!(state.events().contains(&GameEvent::Activated { gravity_dir: -1.0 }));
    }

    #[test]
    fn test_start_ignored_mid_round() {
        let mut state = new_state();
        apply(&mut state, Command::StartRound);
        tick(&mut state, 10.0);
        apply(&mut state, Command::StartRound);
        assert_eq!(state.frame_count, 10.0);
    }

    #[test]
    fn test_fatal_hit_ends_in_same_tick() {
        let mut state = new_state();
        apply(&mut state, Command::StartRound);
        state.timers.grace = 0.0;
        state.stability = 1;
        let ball = state.ball.clone();
        state.obstacles.push(Obstacle {
            id: 99,
            x: ball.pos.x - 40.0,
            width: 80.0,
            gap_size: 150.0,
            base_y: 100.0,
            gap_center: 100.0,
            amplitude: 0.0,
            frequency: 0.0,
            phase: 0.0,
            color: PALETTE[2],
            passed: false,
            pulse: None,
            ring_offset: 0.0,
            ring_tilt: 0.0,
            horizon_boost: 0.0,
        });
        tick(&mut state, 1.0);
        assert_eq!(state.stability, 0);
        assert_eq!(state.phase, GamePhase::Ending);
        assert!(state.events().contains(&GameEvent::Crash {
            source: HitSource::Gate
        }));
    }

    #[test]
    fn test_ending_then_game_over_then_restart() {
        let mut state = new_state();
        apply(&mut state, Command::StartRound);
        state.timers.grace = 0.0;
        state.stability = 1;
        scoring::stability_hit(&mut state, HitSource::Shard);
        assert_eq!(state.phase, GamePhase::Ending);

        // Ending only decays effects: nothing scrolls
        let frames = state.frame_count;
        for _ in 0..30 {
            tick(&mut state, 1.0);
        }
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.frame_count, frames);

        apply(&mut state, Command::Activate);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.stability, 25);
    }

    #[test]
    fn test_edge_touch_costs_stability() {
        let mut state = new_state();
        apply(&mut state, Command::StartRound);
        state.timers.grace = 0.0;
        state.ball.pos.y = 700.0 - 16.0 - 13.0 - 0.1;
        state.ball.velocity = 3.0;
        tick(&mut state, 1.0);
        assert_eq!(state.stability, 24);
        assert_eq!(state.ball.gravity_dir, -1.0);
        assert!(state.events().contains(&GameEvent::Crash {
            source: HitSource::Edge
        }));
    }

    #[test]
    fn test_edge_crash_burst_starts_past_the_clamp() {
        let mut state = new_state();
        apply(&mut state, Command::StartRound);
        state.timers.grace = 0.0;
        state.ball.pos.y = 700.0 - 16.0 - 13.0 + 5.0;
        state.ball.velocity = 3.0;
        tick(&mut state, 1.0);

        let clamped = 700.0 - 16.0 - 13.0;
        assert!((state.ball.pos.y - clamped).abs() < 1e-4);
        assert_eq!(state.particles.len(), 28);
        for p in &state.particles {
            // Undo this tick's particle step (position moved by the pre-gravity velocity)
            let origin_y = p.pos.y - (p.vel.y - p.gravity);
            assert!(origin_y > clamped + 1.0);
        }
    }

    #[test]
    fn test_grace_period_ignores_edges() {
        let mut state = new_state();
        apply(&mut state, Command::StartRound);
        state.ball.pos.y = 20.0;
        state.ball.velocity = -5.0;
        tick(&mut state, 1.0);
        assert_eq!(state.stability, 25);
    }

    #[test]
    fn test_resize_rescales_ball() {
        let mut state = new_state();
        apply(&mut state, Command::StartRound);
        state.ball.pos.y = 175.0;
        apply(&mut state, Command::ViewportResized { width: 800.0, height: 1400.0 });
        assert_eq!(state.field, Field::new(800.0, 1400.0));
        assert!((state.ball.pos.x - 200.0).abs() < 1e-4);
        assert!((state.ball.pos.y - 350.0).abs() < 1e-4);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_determinism() {
        let mut a = new_state();
        let mut b = new_state();
        let script = |state: &mut RoundState| {
            apply(state, Command::StartRound);
            for i in 0..2000 {
                if i % 23 == 0 {
                    apply(state, Command::Activate);
                }
                tick(state, 1.0 + (i % 3) as f32 * 0.2);
            }
        };
        script(&mut a);
        script(&mut b);
        assert_eq!(a.score, b.score);
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.ball, b.ball);
        assert_eq!(a.obstacles, b.obstacles);
        assert_eq!(a.shards, b.shards);
        assert_eq!(a.events(), b.events());
    }
}
