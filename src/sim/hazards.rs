//! Free-floating shard hazards
//!
//! Shards start once the round has run long enough and arrive faster as the
//! speed multiplier climbs.

use glam::Vec2;

use super::state::{PALETTE, RoundState, Shard};

/// How far right of the field shards spawn
const SPAWN_OFFSET: f32 = 50.0;
/// Vertical margin for spawn positions
const SPAWN_MARGIN: f32 = 40.0;

/// Spawn one shard beyond the right edge
pub fn spawn_shard(state: &mut RoundState) {
    let id = state.next_entity_id();
    let field = state.field;
    let rng = &mut state.rng;
    let shard = Shard {
        id,
        pos: Vec2::new(
            field.width + SPAWN_OFFSET,
            rng.range(SPAWN_MARGIN, field.height - SPAWN_MARGIN),
        ),
        size: rng.range(5.0, 9.0),
        speed: state.game_speed * rng.range(0.65, 0.95),
        drift: rng.range(-0.25, 0.25),
        rotation: rng.unit() * std::f32::consts::PI,
        rotation_speed: rng.range(-0.025, 0.025),
        color: PALETTE[rng.index(PALETTE.len())],
    };
    state.shards.push(shard);
}

/// Count down to the next shard, then move and cull the live ones
pub fn update_hazards(state: &mut RoundState, delta: f32) {
    let t = &state.tuning;
    if !t.hazards_enabled || state.frame_count < t.hazard_start_frame {
        return;
    }

    state.timers.next_hazard -= delta;
    if state.timers.next_hazard <= 0.0 {
        spawn_shard(state);
        let interval = state.rng.range_of(state.tuning.hazard_interval);
        state.timers.next_hazard = (interval / state.speed_multiplier).floor();
    }

    let top = state.tuning.hazard_reflect_margin;
    let bottom = state.field.height - top;
    for shard in &mut state.shards {
        shard.pos.x -= shard.speed * delta;
        shard.pos.y += shard.drift * delta;
        shard.rotation += shard.rotation_speed * delta;
        if shard.pos.y < top {
            shard.drift = shard.drift.abs();
        } else if shard.pos.y > bottom {
            shard.drift = -shard.drift.abs();
        }
    }

    let limit = -state.tuning.despawn_margin;
    state.shards.retain(|s| s.pos.x + s.size >= limit);
}
