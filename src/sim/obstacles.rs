//! Gated-wall spawning, scrolling and pass detection

use glam::Vec2;

use super::scoring;
use super::state::{GamePhase, Obstacle, PALETTE, Pulse, RoundState};

/// Spawn a new obstacle just beyond the right edge of the field
pub fn spawn_obstacle(state: &mut RoundState) {
    let id = state.next_entity_id();
    let t = &state.tuning;
    let rng = &mut state.rng;
    let height = state.field.height;
    let speed = state.speed_multiplier;

    let early_bonus = if state.frame_count < t.early_gap_frames {
        t.early_gap_bonus
    } else {
        0.0
    };
    let gap_size = state.current_gap + rng.range_of(t.gap_jitter) + early_bonus;
    let half = gap_size / 2.0;
    let base_y = rng.range(t.gap_margin + half, height - t.gap_margin - half);
    let amplitude = rng.range_of(t.amplitude_range) + speed * t.amplitude_per_speed;
    let frequency = rng.range_of(t.frequency_range) + speed * t.frequency_per_speed;
    let phase = rng.angle();
    let color = PALETTE[rng.index(PALETTE.len())];
    let has_pulse = state.frame_count > t.pulse_start_frame && rng.chance(t.pulse_chance);
    // sqrt biases the boost toward the top of its range
    let width_boost = rng.unit().sqrt();
    let width = t.obstacle_width * (1.0 + width_boost * t.width_variance);

    let pulse = has_pulse.then(|| Pulse {
        radius: rng.range(6.0, 9.0),
        offset: rng.range(-gap_size * 0.2, gap_size * 0.2),
        amplitude: rng.range(6.0, 12.0),
        speed: rng.range(0.01, 0.02),
        phase: rng.angle(),
        pos: Vec2::ZERO,
    });

    let fx = &mut state.fx_rng;
    let mut obstacle = Obstacle {
        id,
        x: state.field.width + t.spawn_offset,
        width,
        gap_size,
        base_y,
        gap_center: base_y,
        amplitude,
        frequency,
        phase,
        color,
        passed: false,
        pulse,
        ring_offset: fx.range(-24.0, 24.0),
        ring_tilt: fx.range(-0.35, 0.35),
        horizon_boost: fx.range(0.2, 0.55),
    };
    obstacle.refresh(state.frame_count, height, t.gap_margin);

    let overage = (width - t.obstacle_width).max(0.0) * t.spacing_per_width;
    state.next_obstacle_spacing = state.obstacle_spacing + rng.range(0.0, t.spacing_jitter) + overage;
    state.obstacles.push(obstacle);
}

/// Scroll obstacles, score passes, remove off-screen walls and spawn new ones
pub fn update_obstacles(state: &mut RoundState, delta: f32) {
    let shift = state.game_speed * delta;
    let frame = state.frame_count;
    let height = state.field.height;
    let margin = state.tuning.gap_margin;
    let ball_left = state.ball.pos.x - state.ball.radius;

    let mut passed = Vec::new();
    for obstacle in &mut state.obstacles {
        obstacle.x -= shift;
        obstacle.refresh(frame, height, margin);
        if !obstacle.passed && obstacle.right() < ball_left {
            obstacle.passed = true;
            passed.push(obstacle.gap_center);
        }
    }

    for gap_center in passed {
        if state.phase == GamePhase::Playing {
            scoring::gate_pass(state, gap_center);
        }
    }

    let limit = -state.tuning.despawn_margin;
    state.obstacles.retain(|o| o.right() >= limit);

    let due = match state.obstacles.last() {
        None => true,
        Some(newest) => newest.x < state.field.width - state.next_obstacle_spacing,
    };
    if due {
        spawn_obstacle(state);
    }
}
