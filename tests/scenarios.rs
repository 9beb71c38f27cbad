//! End-to-end gameplay scenarios driven through the public API

use glam::Vec2;
use merge_runner::Tuning;
use merge_runner::consts::SIM_DT;
use merge_runner::sim::{
    BossHit, Command, CommandOutcome, EntityKind, GameEvent, GameState, Rejection, RunOutcome,
    RunPhase, Sound, apply_command, resolve_collisions, tick,
};

fn empty_state(seed: u64) -> GameState {
    let tuning = Tuning {
        initial_obstacles: 0,
        initial_collectibles: 0,
        ..Tuning::default()
    };
    GameState::new(tuning, seed)
}

fn count_run_ended(events: &[GameEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, GameEvent::RunEnded { .. }))
        .count()
}

#[test]
fn coin_pickup_at_start_scores_exactly_25() {
    let mut state = empty_state(1);
    let pos = state.player.pos;
    let id = state.registry.spawn(EntityKind::Collectible, pos, Vec2::ZERO);

    let report = resolve_collisions(&mut state);

    assert_eq!(report.collectibles, 1);
    assert_eq!(state.ledger.score(), 25.0);
    assert!(state.registry.get(id).is_none());
    assert!(
        state
            .events
            .pending()
            .contains(&GameEvent::EntityRemoved {
                id,
                kind: EntityKind::Collectible
            })
    );
}

#[test]
fn repeated_hits_clamp_health_and_defeat_once() {
    let mut state = empty_state(2);
    assert_eq!(state.ledger.max_health(), 100);

    for _ in 0..3 {
        assert!(!state.damage_player(18));
    }
    assert_eq!(state.ledger.health(), 46);
    assert!(state.is_running());

    assert!(!state.damage_player(18));
    assert_eq!(state.ledger.health(), 28);
    assert!(state.is_running());

    assert!(state.damage_player(18));
    assert!(!state.damage_player(18));
    assert_eq!(state.ledger.health(), 0);
    assert_eq!(state.phase, RunPhase::Ended(RunOutcome::Defeat));
    assert_eq!(count_run_ended(state.events.pending()), 1);
}

#[test]
fn three_skill_casts_defeat_first_boss() {
    let mut state = empty_state(3);
    state.clock.distance = 1999.0;
    tick(&mut state, &[], SIM_DT);

    let boss = state.boss.boss().expect("boss should spawn at 2000");
    assert_eq!(boss.max_health, 120);
    let score_before = state.ledger.score();

    let mut remaining = Vec::new();
    for cast in 0..3 {
        if cast > 0 {
            state.ledger.cool_down(3.0);
        }
        assert_eq!(apply_command(&mut state, Command::Skill), CommandOutcome::Applied);
        remaining.push(state.boss.boss().map(|b| b.health).unwrap_or(0));
    }

    assert_eq!(remaining, vec![78, 36, 0]);
    assert!(!state.boss.is_active());
    assert_eq!(state.boss.defeated_count(), 1);
    assert!((state.ledger.score() - score_before - 700.0).abs() < 1e-9);

    let events = state.events.drain();
    assert!(events.contains(&GameEvent::PlaySound(Sound::Win)));
    assert!(
        events
            .iter()
            .any(|e| matches!(e, GameEvent::SpawnExplosion { .. }))
    );
    // Endless by default: beating a boss does not end the run
    assert!(state.is_running());
    assert_eq!(state.damage_boss(40), BossHit::NoTarget);
}

#[test]
fn skill_without_boss_clears_only_nearby_obstacles() {
    let mut state = empty_state(4);
    let x = state.player.pos.x;
    for offset in [-150.0, 50.0, 219.0, 221.0, 800.0] {
        state
            .registry
            .spawn(EntityKind::Obstacle, Vec2::new(x + offset, 200.0), Vec2::ZERO);
    }

    assert_eq!(apply_command(&mut state, Command::Skill), CommandOutcome::Applied);

    let left: Vec<f32> = state
        .registry
        .obstacles()
        .iter()
        .map(|o| o.pos.x - x)
        .collect();
    assert_eq!(left, vec![221.0, 800.0]);
    assert!(
        state
            .events
            .pending()
            .contains(&GameEvent::ObstaclesCleared { count: 3 })
    );
}

#[test]
fn skill_recast_within_cooldown_is_rejected() {
    let mut state = empty_state(5);
    assert_eq!(apply_command(&mut state, Command::Skill), CommandOutcome::Applied);
    tick(&mut state, &[], 1.0);
    let cooldown = state.ledger.skill_cooldown();
    assert!((cooldown - 2.0).abs() < 1e-6);

    let outcomes = tick(&mut state, &[Command::Skill], 0.0);
    assert_eq!(
        outcomes,
        vec![CommandOutcome::Rejected(Rejection::SkillCoolingDown {
            remaining: cooldown
        })]
    );
    assert_eq!(state.ledger.skill_cooldown(), cooldown);
}

#[test]
fn victory_target_ends_run() {
    let tuning = Tuning {
        initial_obstacles: 0,
        initial_collectibles: 0,
        victory_after_bosses: Some(1),
        ..Tuning::default()
    };
    let mut state = GameState::new(tuning, 6);
    state.clock.distance = 2500.0;
    tick(&mut state, &[], SIM_DT);
    assert!(state.boss.is_active());

    assert_eq!(state.damage_boss(1000), BossHit::Defeated);
    assert_eq!(state.phase, RunPhase::Ended(RunOutcome::Victory));
    let events = state.events.drain();
    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::RunEnded {
            outcome: RunOutcome::Victory,
            ..
        }
    )));
}

#[test]
fn restart_after_defeat_starts_fresh_run() {
    let mut state = GameState::new(Tuning::default(), 7);
    state.damage_player(1000);

    let outcomes = tick(&mut state, &[Command::Melee, Command::Restart], SIM_DT);
    assert_eq!(
        outcomes,
        vec![
            CommandOutcome::Rejected(Rejection::RunOver),
            CommandOutcome::Applied
        ]
    );
    assert!(state.is_running());
    assert_eq!(state.seed, 8);
    assert_eq!(state.ledger.health(), 100);
    assert!(state.clock.distance > 0.0);
}

#[test]
fn projectiles_outlive_their_boss() {
    let mut state = empty_state(9);
    state.clock.distance = 1999.0;
    // Long enough for the phase 1 boss to fire once
    for _ in 0..80 {
        tick(&mut state, &[], SIM_DT);
    }
    assert!(!state.registry.projectiles().is_empty());

    assert_eq!(state.damage_boss(1000), BossHit::Defeated);
    let before: Vec<Vec2> = state.registry.projectiles().iter().map(|p| p.pos).collect();
    tick(&mut state, &[], SIM_DT);
    let after: Vec<Vec2> = state.registry.projectiles().iter().map(|p| p.pos).collect();
    assert_eq!(before.len(), after.len());
    assert_ne!(before, after);
}

#[test]
fn long_run_reaps_trailing_entities() {
    let mut state = GameState::new(Tuning::default(), 10);
    for _ in 0..(60 * 30) {
        tick(&mut state, &[Command::Jump], SIM_DT);
        if !state.is_running() {
            break;
        }
    }
    let cutoff = state.player.pos.x - 900.0;
    assert!(state.registry.obstacles().iter().all(|o| o.pos.x >= cutoff));
    assert!(state.registry.collectibles().iter().all(|c| c.pos.x >= cutoff));
}
