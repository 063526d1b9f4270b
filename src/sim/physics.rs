//! Ball integration under switchable gravity
//!
//! Time is measured in reference frames: a `delta` of 1.0 is one 60 Hz frame.

use glam::Vec2;

use super::state::{Ball, Field};
use crate::tuning::{Control, Tuning};

/// Field edge the ball ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Bottom,
}

/// Apply gravity, clamp, move and damp
pub fn integrate(ball: &mut Ball, tuning: &Tuning, delta: f32) {
    let limit = tuning.velocity_clamp;
    ball.velocity += tuning.gravity * ball.gravity_dir * delta;
    ball.velocity = crate::clamp_soft(ball.velocity, -limit, limit);
    ball.pos.y += ball.velocity * delta;
    ball.velocity *= tuning.velocity_damping.powf(delta);
}

/// Append one trail point per whole frame of accumulated time
pub fn record_trail(ball: &mut Ball, max_len: usize, delta: f32) {
    ball.trail_timer += delta;
    while ball.trail_timer >= 1.0 {
        ball.trail.push_back(ball.pos);
        ball.trail_timer -= 1.0;
    }
    while ball.trail.len() > max_len {
        ball.trail.pop_front();
    }
}

/// Edge buffer the ball currently reaches into, if any
pub fn touching_edge(ball: &Ball, tuning: &Tuning, field: Field) -> Option<Edge> {
    let buffer = tuning.edge_buffer;
    if ball.top() <= buffer {
        Some(Edge::Top)
    } else if ball.bottom() >= field.height - buffer {
        Some(Edge::Bottom)
    } else {
        None
    }
}

/// Keep the ball inside the field, rebounding away from the edge it touched
pub fn constrain(ball: &mut Ball, tuning: &Tuning, field: Field) -> Option<Edge> {
    let buffer = tuning.edge_buffer;
    let flips = matches!(tuning.control, Control::Flip { .. });
    let edge = touching_edge(ball, tuning, field)?;

    if edge == Edge::Top {
        ball.pos.y = buffer + ball.radius;
        ball.velocity = tuning.edge_rebound;
        if flips {
            ball.gravity_dir = 1.0;
        }
    } else {
        ball.pos.y = field.height - buffer - ball.radius;
        ball.velocity = -tuning.edge_rebound;
        if flips {
            ball.gravity_dir = -1.0;
        }
    }
    Some(edge)
}

/// Free flight for one tick: gravity, motion and trail, without the edge clamp
pub fn advance_ball(ball: &mut Ball, tuning: &Tuning, delta: f32) {
    integrate(ball, tuning, delta);
    record_trail(ball, tuning.trail_length, delta);
}

/// Respond to the activate action (flip or jump)
pub fn activate(ball: &mut Ball, control: Control) {
    match control {
        Control::Flip { impulse, retention } => {
            ball.gravity_dir = -ball.gravity_dir;
            ball.velocity = ball.velocity * retention + impulse * ball.gravity_dir;
        }
        Control::Jump { power } => {
            ball.velocity = power;
        }
    }
}

/// Move the ball to its place in a resized field, keeping its relative height
pub fn rescale(ball: &mut Ball, old: Field, new: Field, x_fraction: f32) {
    let ratio = if old.height > 0.0 {
        ball.pos.y / old.height
    } else {
        0.5
    };
    ball.pos = Vec2::new(new.width * x_fraction, ratio * new.height);
    ball.trail.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rift_ball() -> (Ball, Tuning, Field) {
        let tuning = Tuning::rift();
        let field = Field::new(400.0, 700.0);
        (Ball::new(field, &tuning), tuning, field)
    }

    #[test]
    fn test_one_frame_from_rest() {
        let (mut ball, tuning, _) = rift_ball();
        let y0 = ball.pos.y;
        integrate(&mut ball, &tuning, 1.0);
        // Moves by the undamped velocity, then velocity is damped
        assert!((ball.pos.y - (y0 + 0.4)).abs() < 1e-5);
        assert!((ball.velocity - 0.4 * 0.988).abs() < 1e-5);
    }

    #[test]
    fn test_velocity_clamped() {
        let (mut ball, tuning, _) = rift_ball();
        ball.velocity = 50.0;
        let y0 = ball.pos.y;
        integrate(&mut ball, &tuning, 1.0);
        assert!((ball.pos.y - (y0 + 8.6)).abs() < 1e-4);
    }

    #[test]
    fn test_flip_blends_velocity() {
        let (mut ball, tuning, _) = rift_ball();
        ball.velocity = 5.0;
        activate(&mut ball, tuning.control);
        assert_eq!(ball.gravity_dir, -1.0);
        assert!((ball.velocity - (5.0 * 0.2 - 8.4)).abs() < 1e-5);
    }

    #[test]
    fn test_jump_sets_velocity() {
        let tuning = Tuning::bounce();
        let mut ball = Ball::new(Field::new(400.0, 700.0), &tuning);
        ball.velocity = 3.0;
        activate(&mut ball, tuning.control);
        assert_eq!(ball.velocity, -10.0);
        assert_eq!(ball.gravity_dir, 1.0);
    }

    #[test]
    fn test_bottom_edge_rebounds_upward() {
        let (mut ball, tuning, field) = rift_ball();
        ball.pos.y = field.height - 10.0;
        ball.velocity = 4.0;
        let edge = constrain(&mut ball, &tuning, field);
        assert_eq!(edge, Some(Edge::Bottom));
        assert!((ball.bottom() - (field.height - 16.0)).abs() < 1e-4);
        assert_eq!(ball.velocity, -1.6);
        assert_eq!(ball.gravity_dir, -1.0);
    }

    #[test]
    fn test_touching_edge_leaves_ball_alone() {
        let (mut ball, tuning, field) = rift_ball();
        ball.pos.y = 20.0;
        assert_eq!(touching_edge(&ball, &tuning, field), Some(Edge::Top));
        assert_eq!(ball.pos.y, 20.0);
        ball.pos.y = 350.0;
        assert_eq!(touching_edge(&ball, &tuning, field), None);
    }

    #[test]
    fn test_top_edge_in_bounce_stops_ball() {
        let tuning = Tuning::bounce();
        let field = Field::new(400.0, 700.0);
        let mut ball = Ball::new(field, &tuning);
        ball.pos.y = 5.0;
        ball.velocity = -10.0;
        assert_eq!(constrain(&mut ball, &tuning, field), Some(Edge::Top));
        assert_eq!(ball.pos.y, 15.0);
        assert_eq!(ball.velocity, 0.0);
        assert_eq!(ball.gravity_dir, 1.0);
    }

    #[test]
    fn test_trail_cadence_and_cap() {
        let (mut ball, tuning, _) = rift_ball();
        record_trail(&mut ball, tuning.trail_length, 0.5);
        assert!(ball.trail.is_empty());
        record_trail(&mut ball, tuning.trail_length, 0.5);
        assert_eq!(ball.trail.len(), 1);
        record_trail(&mut ball, tuning.trail_length, 30.0);
        assert_eq!(ball.trail.len(), 14);
    }

    #[test]
    fn test_rescale_keeps_relative_height() {
        let (mut ball, tuning, field) = rift_ball();
        ball.pos.y = 175.0;
        rescale(&mut ball, field, Field::new(800.0, 1400.0), tuning.ball_x_fraction);
        assert!((ball.pos.x - 200.0).abs() < 1e-4);
        assert!((ball.pos.y - 350.0).abs() < 1e-4);
    }
}
