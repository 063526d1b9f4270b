//! Score, combo, stability and the difficulty curve
//!
//! Also owns the `Playing -> Ending` transition, which fires exactly once per
//! round when stability runs out.

use super::effects::{self, Burst};
use super::events::{GameEvent, HitSource};
use super::state::{GamePhase, RoundState};

/// Recompute speed, gap size and spacing from elapsed time and combo
pub fn update_difficulty(state: &mut RoundState) {
    let t = &state.tuning;
    let combo_boost = state.combo.saturating_sub(1) as f32 * t.combo_speed_bonus;
    let speed = (1.0 + state.frame_count / t.speed_time_constant + combo_boost).min(t.max_speed_multiplier);
    state.speed_multiplier = speed;
    state.game_speed = t.base_speed * speed;
    state.current_gap = (t.base_gap - state.frame_count * t.gap_shrink_per_frame).max(t.min_gap);
    state.obstacle_spacing = (t.base_spacing - (speed - 1.0) * t.spacing_per_speed).max(t.min_spacing);
}

/// Count down the grace and invulnerability windows
pub fn tick_protection(state: &mut RoundState, delta: f32) {
    state.timers.grace = (state.timers.grace - delta).max(0.0);
    state.timers.invulnerable = (state.timers.invulnerable - delta).max(0.0);
}

/// Award points for clearing an obstacle whose gap was centered at `gap_center`
pub fn gate_pass(state: &mut RoundState, gap_center: f32) {
    let t = &state.tuning;
    let offset = (state.ball.pos.y - gap_center).abs();
    let combo_enabled = t.combo_enabled;
    let perfect = combo_enabled && offset <= t.perfect_window;
    let (max_combo, goal, max_stability) = (t.max_combo, t.health_streak_goal, t.max_stability);

    let points;
    let mut banner = None;
    if perfect {
        state.combo = (state.combo + 1).min(max_combo);
        state.perfect_streak += 1;
        points = state.combo;
        let mut text = format!("Perfect +{}", points);
        effects::burst(state, Burst::Score(effects::ORANGE));

        if state.perfect_streak >= goal && state.stability < max_stability {
            state.perfect_streak = 0;
            state.stability = (state.stability + 1).min(max_stability);
            text.push_str(" | Stability +1");
            effects::burst(state, Burst::Score(effects::CYAN));
            state.emit(GameEvent::StabilityChanged(state.stability));
        }
        banner = Some(text);
    } else {
        state.combo = 1;
        state.perfect_streak = 0;
        points = 1;
        // Plain passes only celebrate in the combo-less variant
        if !combo_enabled {
            effects::burst(state, Burst::Score(effects::GOLD));
        }
    }

    state.score += u64::from(points);
    state.emit(GameEvent::GatePassed { perfect, points });
    state.emit(GameEvent::ScoreChanged(state.score));
    state.emit(GameEvent::ComboChanged(state.combo));
    if let Some(text) = banner {
        effects::show_banner(state, text);
    }
}

/// Take one point of stability; returns false when the hit was ignored
pub fn stability_hit(state: &mut RoundState, source: HitSource) -> bool {
    if state.phase != GamePhase::Playing
        || state.timers.invulnerable > 0.0
        || state.timers.grace > 0.0
    {
        return false;
    }

    state.stability = state.stability.saturating_sub(1);
    state.combo = 1;
    state.perfect_streak = 0;
    state.timers.invulnerable = state.tuning.invulnerable_frames;
    log::debug!("Stability hit from {:?}, {} left", source, state.stability);

    effects::burst(state, Burst::Crash);
    state.emit(GameEvent::Crash { source });
    state.emit(GameEvent::StabilityChanged(state.stability));
    state.emit(GameEvent::ComboChanged(state.combo));
    effects::show_banner(state, "Stability -1".to_string());

    if state.stability == 0 {
        begin_ending(state);
    }
    true
}

/// Freeze the final score, record a new best and start the end countdown
fn begin_ending(state: &mut RoundState) {
    state.phase = GamePhase::Ending;
    state.timers.ending = state.tuning.ending_frames;
    state.final_score = state.score;
    effects::burst(state, Burst::Crash);

    if state.score > state.best_score {
        state.best_score = state.score;
        log::info!("New best score: {}", state.best_score);
        state.emit(GameEvent::BestScoreUpdated(state.best_score));
    }
    state.emit(GameEvent::PhaseChanged(GamePhase::Ending));
}

/// Run the end countdown; moves to `GameOver` when it expires
pub fn tick_ending(state: &mut RoundState, delta: f32) {
    state.timers.ending -= delta;
    if state.timers.ending <= 0.0 {
        state.timers.ending = 0.0;
        state.phase = GamePhase::GameOver;
        log::info!("Game over: score {}, best {}", state.final_score, state.best_score);
        state.emit(GameEvent::PhaseChanged(GamePhase::GameOver));
        state.emit(GameEvent::GameOver {
            final_score: state.final_score,
            best_score: state.best_score,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Field;
    use crate::tuning::Tuning;

    fn playing() -> RoundState {
        let mut state = RoundState::new(Tuning::rift(), 9, Field::new(400.0, 700.0));
        state.phase = GamePhase::Playing;
        state.timers.grace = 0.0;
        state
    }

    #[test]
    fn test_perfect_pass_grows_combo() {
        let mut state = playing();
        state.combo = 3;
        state.score = 10;
        let y = state.ball.pos.y;
        gate_pass(&mut state, y + 32.0);
        assert_eq!(state.combo, 4);
        assert_eq!(state.score, 14);
        assert_eq!(state.perfect_streak, 1);
        assert_eq!(state.banner.as_ref().map(|b| b.text.as_str()), Some("Perfect +4"));
    }

    #[test]
    fn test_plain_pass_resets_combo() {
        let mut state = playing();
        state.combo = 5;
        state.perfect_streak = 3;
        let y = state.ball.pos.y;
        gate_pass(&mut state, y + 40.0);
        assert_eq!(state.combo, 1);
        assert_eq!(state.perfect_streak, 0);
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_combo_capped() {
        let mut state = playing();
        state.combo = 6;
        let y = state.ball.pos.y;
        gate_pass(&mut state, y);
        assert_eq!(state.combo, 6);
        assert_eq!(state.score, 6);
    }

    #[test]
    fn test_streak_restores_stability() {
        let mut state = playing();
        state.stability = 20;
        state.perfect_streak = 4;
        let y = state.ball.pos.y;
        gate_pass(&mut state, y);
        assert_eq!(state.stability, 21);
        assert_eq!(state.perfect_streak, 0);
        assert_eq!(
            state.banner.as_ref().map(|b| b.text.as_str()),
            Some("Perfect +2 | Stability +1")
        );
    }

    #[test]
    fn test_streak_kept_at_full_stability() {
        let mut state = playing();
        state.perfect_streak = 4;
        let y = state.ball.pos.y;
        gate_pass(&mut state, y);
        assert_eq!(state.stability, 25);
        assert_eq!(state.perfect_streak, 5);
    }

    #[test]
    fn test_hit_resets_combo_and_protects() {
        let mut state = playing();
        state.combo = 4;
        state.perfect_streak = 2;
        assert!(stability_hit(&mut state, HitSource::Shard));
        assert_eq!(state.stability, 24);
        assert_eq!(state.combo, 1);
        assert_eq!(state.perfect_streak, 0);
        assert_eq!(state.timers.invulnerable, 110.0);
        assert!(!stability_hit(&mut state, HitSource::Shard));
        assert_eq!(state.stability, 24);
    }

    #[test]
    fn test_last_hit_begins_ending_once() {
        let mut state = playing();
        state.stability = 1;
        state.score = 12;
        state.best_score = 5;
        assert!(stability_hit(&mut state, HitSource::Gate));
        assert_eq!(state.stability, 0);
        assert_eq!(state.phase, GamePhase::Ending);
        assert_eq!(state.final_score, 12);
        assert_eq!(state.best_score, 12);
        state.timers.invulnerable = 0.0;
        assert!(!stability_hit(&mut state, HitSource::Gate));
        let endings = state
            .events()
            .iter()
            .filter(|e| **e == GameEvent::PhaseChanged(GamePhase::Ending))
            .count();
        assert_eq!(endings, 1);
        assert!(state.events().contains(&GameEvent::BestScoreUpdated(12)));
    }

    #[test]
    fn test_no_best_update_when_lower() {
        let mut state = playing();
        state.stability = 1;
        state.score = 3;
        state.best_score = 5;
        stability_hit(&mut state, HitSource::Edge);
        assert_eq!(state.best_score, 5);
        assert!(!state.events().iter().any(|e| matches!(e, GameEvent::BestScoreUpdated(_))));
    }

    #[test]
    fn test_ending_counts_down_to_game_over() {
        let mut state = playing();
        state.stability = 1;
        stability_hit(&mut state, HitSource::Gate);
        tick_ending(&mut state, 27.0);
        assert_eq!(state.phase, GamePhase::Ending);
        tick_ending(&mut state, 1.0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.events().contains(&GameEvent::GameOver {
            final_score: 0,
            best_score: 0
        }));
    }

    #[test]
    fn test_difficulty_curve() {
        let mut state = playing();
        update_difficulty(&mut state);
        assert_eq!(state.speed_multiplier, 1.0);
        assert_eq!(state.current_gap, 240.0);
        assert_eq!(state.obstacle_spacing, 480.0);

        state.frame_count = 1800.0;
        state.combo = 3;
        update_difficulty(&mut state);
        assert!((state.speed_multiplier - 1.56).abs() < 1e-4);
        assert!((state.game_speed - 2.7 * 1.56).abs() < 1e-4);
        assert!((state.current_gap - (240.0 - 1800.0 / 110.0)).abs() < 1e-3);
        assert!(state.obstacle_spacing < 480.0 && state.obstacle_spacing >= 440.0);

        state.frame_count = 1.0e6;
        update_difficulty(&mut state);
        assert_eq!(state.speed_multiplier, 1.7);
        assert_eq!(state.current_gap, 175.0);
    }

    #[test]
    fn test_bounce_passes_score_flat() {
        let mut state = RoundState::new(Tuning::bounce(), 9, Field::new(400.0, 700.0));
        state.phase = GamePhase::Playing;
        let y = state.ball.pos.y;
        gate_pass(&mut state, y);
        gate_pass(&mut state, y);
        assert_eq!(state.score, 2);
        assert_eq!(state.combo, 1);
        assert!(state.banner.is_none());
        assert_eq!(state.particles.len(), 32);
    }

    #[test]
    fn test_plain_pass_is_quiet_with_combo() {
        let mut state = playing();
        let y = state.ball.pos.y;
        gate_pass(&mut state, y + 40.0);
        assert_eq!(state.score, 1);
        assert!(state.particles.is_empty());

        gate_pass(&mut state, y);
        assert_eq!(state.particles.len(), 16);
    }
}
