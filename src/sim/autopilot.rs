//! Demo controller that plays the game on its own
//!
//! Steers toward the gap of the nearest obstacle the ball has not cleared
//! yet, activating only when the ball is drifting away from it.

use super::state::{GamePhase, RoundState};
use crate::tuning::Control;

/// How far from the target line the ball may stray before reacting
const SLACK: f32 = 18.0;

/// Vertical line the autopilot is steering toward
pub fn target_line(state: &RoundState) -> f32 {
    let ball_left = state.ball.pos.x - state.ball.radius;
    state
        .obstacles
        .iter()
        .find(|o| !o.passed && o.right() >= ball_left)
        .map(|o| o.gap_center)
        .unwrap_or(state.field.height * 0.5)
}

/// Whether the autopilot wants to press activate this frame
pub fn wants_activate(state: &RoundState) -> bool {
    match state.phase {
        GamePhase::Start | GamePhase::GameOver => return true,
        GamePhase::Ending => return false,
        GamePhase::Playing => {}
    }

    let ball = &state.ball;
    let target = target_line(state);
    let offset = ball.pos.y - target;

    match state.tuning.control {
        Control::Flip { .. } => {
            // Falling away below the target with gravity still pulling down
            // (or above it with gravity pulling up)
            (offset > SLACK && ball.gravity_dir > 0.0 && ball.velocity >= 0.0)
                || (offset < -SLACK && ball.gravity_dir < 0.0 && ball.velocity <= 0.0)
        }
        Control::Jump { .. } => offset > SLACK && ball.velocity >= 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Field;
    use crate::sim::tick::{Command, apply, tick};
    use crate::tuning::Tuning;

    #[test]
    fn test_flips_back_toward_center() {
        let mut state = RoundState::new(Tuning::rift(), 4, Field::new(400.0, 700.0));
        apply(&mut state, Command::StartRound);
        state.ball.pos.y = 500.0;
        state.ball.velocity = 2.0;
        assert!(wants_activate(&state));
        state.ball.pos.y = 350.0;
        assert!(!wants_activate(&state));
    }

    #[test]
    fn test_starts_from_title() {
        let state = RoundState::new(Tuning::bounce(), 4, Field::new(400.0, 700.0));
        assert!(wants_activate(&state));
    }

    #[test]
    fn test_survives_opening() {
        let mut state = RoundState::new(Tuning::rift(), 4, Field::new(400.0, 700.0));
        apply(&mut state, Command::StartRound);
        for _ in 0..600 {
            if wants_activate(&state) {
                apply(&mut state, Command::Activate);
            }
            tick(&mut state, 1.0);
        }
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.score > 0);
    }
}
