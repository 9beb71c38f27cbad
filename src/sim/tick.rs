//! Per-frame simulation tick
//!
//! Order within a tick is fixed and matters:
//! commands -> distance -> spawns -> projectile motion + reaping ->
//! collisions -> boss -> cosmetics.
//! Spawning before collisions means a freshly spawned entity is never reaped
//! in the same breath, and collisions before the boss step mean a boss killed
//! this tick never fires again.

use super::collision::resolve_collisions;
use super::command::{Command, CommandOutcome, apply_command};
use super::events::GameEvent;
use super::spawn;
use super::state::GameState;

/// Advance the run by `dt` seconds after applying this frame's commands.
///
/// A non-positive `dt` only processes commands. Once the run has ended only
/// popups keep decaying.
pub fn tick(state: &mut GameState, commands: &[Command], dt: f32) -> Vec<CommandOutcome> {
    let outcomes: Vec<CommandOutcome> = commands
        .iter()
        .map(|&command| apply_command(state, command))
        .collect();

    if dt <= 0.0 {
        return outcomes;
    }

    if !state.is_running() {
        state.events.decay(dt);
        return outcomes;
    }

    state.time_ticks += 1;
    state.ledger.cool_down(dt);

    advance_distance(state, dt);
    spawn::update(state, dt);
    reap(state);
    resolve_collisions(state);

    if state.is_running() {
        advance_boss(state, dt);
    }

    state.player.settle(dt);
    state.player.anim.advance(dt);
    state.events.decay(dt);

    outcomes
}

/// Scroll the player forward and bank distance and score
fn advance_distance(state: &mut GameState, dt: f32) {
    let scrolled = state
        .clock
        .advance(dt, state.tuning.run_speed, state.tuning.distance_factor);
    state.player.pos.x += scrolled;
    state
        .ledger
        .add_score(f64::from(scrolled) * state.tuning.distance_score_factor);
}

fn reap(state: &mut GameState) {
    state.registry.advance_projectiles();
    let reaped = state.registry.reap(
        state.player.pos.x,
        state.tuning.trailing_window,
        &state.tuning.projectile_bounds,
    );
    for entity in reaped {
        state.events.emit(GameEvent::EntityRemoved {
            id: entity.id,
            kind: entity.kind,
        });
    }
}

fn advance_boss(state: &mut GameState, dt: f32) {
    let player_x = state.player.pos.x;
    state.boss.maybe_spawn(
        state.clock.distance,
        player_x,
        &state.tuning.boss,
        &mut state.registry,
        &mut state.events,
    );
    state.boss.update(
        dt,
        player_x,
        &state.tuning.boss,
        &mut state.rng,
        &mut state.registry,
        &mut state.events,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::{EntityKind, RunOutcome, RunPhase, Sound};
    use crate::tuning::Tuning;
    use glam::Vec2;

    fn empty_state(seed: u64) -> GameState {
        let tuning = Tuning {
            initial_obstacles: 0,
            initial_collectibles: 0,
            ..Tuning::default()
        };
        GameState::new(tuning, seed)
    }

    #[test]
    fn test_tick_advances_distance_and_score() {
        let mut state = empty_state(1);
        tick(&mut state, &[], 0.5);
        assert_eq!(state.player.pos.x, 290.0);
        assert!((state.clock.distance - 54.0).abs() < 1e-4);
        assert!((state.ledger.score() - 4.5).abs() < 1e-6);
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_zero_dt_only_runs_commands() {
        let mut state = empty_state(1);
        let outcomes = tick(&mut state, &[Command::Jump], 0.0);
        assert_eq!(outcomes, vec![CommandOutcome::Applied]);
        assert!(state.player.is_airborne());
        assert_eq!(state.player.pos.x, 200.0);
        assert_eq!(state.time_ticks, 0);
    }

    #[test]
    fn test_boss_appears_at_threshold() {
        let mut state = empty_state(1);
        state.clock.distance = 1999.0;
        tick(&mut state, &[], SIM_DT);
        assert!(state.boss.is_active());
        assert_eq!(state.boss.boss().map(|b| b.max_health), Some(120));
    }

    #[test]
    fn test_popups_decay_after_run_ends() {
        let mut state = empty_state(1);
        state.damage_player(500);
        assert_eq!(state.events.popups().len(), 1);
        let x = state.player.pos.x;

        tick(&mut state, &[], 0.5);
        assert_eq!(state.player.pos.x, x);
        assert_eq!(state.events.popups().len(), 1);
        tick(&mut state, &[], 0.6);
        assert!(state.events.popups().is_empty());
        assert_eq!(state.time_ticks, 0);
    }

    #[test]
    fn test_projectile_kill_ends_run_once() {
        let mut state = empty_state(1);
        state.damage_player(95);
        let pos = state.player.pos + Vec2::new(3.0, 0.0);
        state
            .registry
            .spawn(EntityKind::Projectile, pos, Vec2::ZERO);
        state
            .registry
            .spawn(EntityKind::Projectile, pos, Vec2::ZERO);
        tick(&mut state, &[], SIM_DT);
        assert_eq!(state.phase, RunPhase::Ended(RunOutcome::Defeat));
        let events = state.events.drain();
        let ended = events
            .iter()
            .filter(|e| matches!(e, GameEvent::RunEnded { .. }))
            .count();
        assert_eq!(ended, 1);
        assert!(events.contains(&GameEvent::PlaySound(Sound::Lose)));
    }

    #[test]
    fn test_same_seed_same_run() {
        let mut a = GameState::new(Tuning::default(), 99);
        let mut b = GameState::new(Tuning::default(), 99);
        for i in 0..3000 {
            let commands: &[Command] = match i % 97 {
                0 => &[Command::Jump],
                50 => &[Command::Skill],
                _ => &[],
            };
            tick(&mut a, commands, SIM_DT);
            tick(&mut b, commands, SIM_DT);
        }
        assert_eq!(a.player, b.player);
        assert_eq!(a.ledger, b.ledger);
        assert_eq!(a.registry.obstacles(), b.registry.obstacles());
        assert_eq!(a.registry.projectiles(), b.registry.projectiles());
        assert_eq!(a.boss, b.boss);
        assert_eq!(a.events.drain(), b.events.drain());
    }
}
