//! Collision detection between the ball and walls, pulses and shards
//!
//! Bounds are deliberately forgiving: an obstacle's solid columns are
//! narrowed and its gap widened by margins proportional to its size, so
//! near misses do not count as hits.

use glam::Vec2;

use super::events::HitSource;
use super::state::{Ball, Obstacle, RoundState, Shard};
use crate::tuning::Tuning;

/// Horizontal span of an obstacle that can hit the ball
#[inline]
pub fn solid_span(obstacle: &Obstacle, tuning: &Tuning) -> (f32, f32) {
    let forgive = tuning.side_forgive_max.min(obstacle.width * tuning.side_forgive_ratio);
    (obstacle.x + forgive, obstacle.right() - forgive)
}

/// Vertical band of an obstacle the ball may occupy
#[inline]
pub fn safe_band(obstacle: &Obstacle, tuning: &Tuning) -> (f32, f32) {
    let forgive = tuning.gap_forgive_max.min(obstacle.gap_size * tuning.gap_forgive_ratio);
    (obstacle.gap_top() - forgive, obstacle.gap_bottom() + forgive)
}

/// Check a ball against one obstacle's walls and pulse
pub fn ball_obstacle_collision(ball: &Ball, obstacle: &Obstacle, tuning: &Tuning) -> Option<HitSource> {
    let (x_min, x_max) = solid_span(obstacle, tuning);
    let overlaps = ball.pos.x + ball.radius > x_min && ball.pos.x - ball.radius < x_max;
    if !overlaps {
        return None;
    }

    let (safe_top, safe_bottom) = safe_band(obstacle, tuning);
    if ball.top() < safe_top || ball.bottom() > safe_bottom {
        return Some(HitSource::Gate);
    }

    obstacle
        .pulse
        .as_ref()
        .filter(|p| circles_overlap(ball.pos, ball.radius, p.pos, p.radius))
        .map(|_| HitSource::Pulse)
}

/// Check a ball against a shard using its reduced hit radius
#[inline]
pub fn ball_shard_collision(ball: &Ball, shard: &Shard, tuning: &Tuning) -> bool {
    circles_overlap(ball.pos, ball.radius, shard.pos, shard.size * tuning.hazard_hit_ratio)
}

#[inline]
fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    crate::distance(a.x, a.y, b.x, b.y) < ra + rb
}

/// First hit this tick, walls before shards; `None` while protected
pub fn check_collisions(state: &RoundState) -> Option<HitSource> {
    if state.timers.invulnerable > 0.0 || state.timers.grace > 0.0 {
        return None;
    }

    let ball = &state.ball;
    let tuning = &state.tuning;
    state
        .obstacles
        .iter()
        .find_map(|o| ball_obstacle_collision(ball, o, tuning))
        .or_else(|| {
            state
                .shards
                .iter()
                .any(|s| ball_shard_collision(ball, s, tuning))
                .then_some(HitSource::Shard)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Field, PALETTE, Pulse};

    fn ball_at(y: f32) -> Ball {
        let mut ball = Ball::new(Field::new(400.0, 700.0), &Tuning::rift());
        ball.pos = Vec2::new(100.0, y);
        ball
    }

    fn wall(x: f32, gap_center: f32, gap_size: f32) -> Obstacle {
        Obstacle {
            id: 1,
            x,
            width: 80.0,
            gap_size,
            base_y: gap_center,
            gap_center,
            amplitude: 0.0,
            frequency: 0.0,
            phase: 0.0,
            color: PALETTE[1],
            passed: false,
            pulse: None,
            ring_offset: 0.0,
            ring_tilt: 0.0,
            horizon_boost: 0.0,
        }
    }

    #[test]
    fn test_ball_in_gap_is_safe() {
        let tuning = Tuning::rift();
        let ball = ball_at(350.0);
        assert_eq!(ball_obstacle_collision(&ball, &wall(70.0, 350.0, 200.0), &tuning), None);
    }

    #[test]
    fn test_ball_in_wall_hits() {
        let tuning = Tuning::rift();
        let ball = ball_at(150.0);
        assert_eq!(
            ball_obstacle_collision(&ball, &wall(70.0, 350.0, 200.0), &tuning),
            Some(HitSource::Gate)
        );
    }

    #[test]
    fn test_near_miss_forgiven() {
        let tuning = Tuning::rift();
        // Gap top at 250, forgiveness min(12, 24) = 12: ball top at 240 is still safe
        let ball = ball_at(253.0);
        assert_eq!(ball_obstacle_collision(&ball, &wall(70.0, 350.0, 200.0), &tuning), None);
        let ball = ball_at(250.0);
        assert_eq!(
            ball_obstacle_collision(&ball, &wall(70.0, 350.0, 200.0), &tuning),
            Some(HitSource::Gate)
        );
    }

    #[test]
    fn test_side_forgiveness() {
        let tuning = Tuning::rift();
        let ball = ball_at(100.0);
        // Solid span starts 12px in: wall at x=110 has x_min=122, ball right edge is 113
        assert_eq!(ball_obstacle_collision(&ball, &wall(110.0, 400.0, 200.0), &tuning), None);
        assert_eq!(
            ball_obstacle_collision(&ball, &wall(100.0, 400.0, 200.0), &tuning),
            Some(HitSource::Gate)
        );
    }

    #[test]
    fn test_bounce_has_no_forgiveness() {
        let tuning = Tuning::bounce();
        let mut ball = ball_at(100.0);
        ball.radius = 15.0;
        // Ball right edge at 115 just enters a wall starting at 114
        assert_eq!(
            ball_obstacle_collision(&ball, &wall(114.0, 400.0, 150.0), &tuning),
            Some(HitSource::Gate)
        );
    }

    #[test]
    fn test_pulse_hit() {
        let tuning = Tuning::rift();
        let ball = ball_at(350.0);
        let mut obstacle = wall(70.0, 350.0, 200.0);
        obstacle.pulse = Some(Pulse {
            radius: 8.0,
            offset: 0.0,
            amplitude: 0.0,
            speed: 0.0,
            phase: 0.0,
            pos: Vec2::new(110.0, 360.0),
        });
        assert_eq!(ball_obstacle_collision(&ball, &obstacle, &tuning), Some(HitSource::Pulse));
    }

    #[test]
    fn test_shard_uses_reduced_radius() {
        let tuning = Tuning::rift();
        let ball = ball_at(350.0);
        let mut shard = Shard {
            id: 1,
            pos: Vec2::new(100.0, 350.0 + 13.0 + 6.0),
            size: 10.0,
            speed: 2.0,
            drift: 0.0,
            rotation: 0.0,
            rotation_speed: 0.0,
            color: PALETTE[0],
        };
        assert!(ball_shard_collision(&ball, &shard, &tuning));
        shard.pos.y = 350.0 + 13.0 + 7.5;
        assert!(!ball_shard_collision(&ball, &shard, &tuning));
    }

    #[test]
    fn test_protection_skips_checks() {
        let mut state = RoundState::new(Tuning::rift(), 1, Field::new(400.0, 700.0));
        state.obstacles.push(wall(state.ball.pos.x - 40.0, 100.0, 150.0));
        assert!(state.timers.grace > 0.0);
        assert_eq!(check_collisions(&state), None);
        state.timers.grace = 0.0;
        assert_eq!(check_collisions(&state), Some(HitSource::Gate));
        state.timers.invulnerable = 3.0;
        assert_eq!(check_collisions(&state), None);
    }
}
