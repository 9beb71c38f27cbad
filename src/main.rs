//! Merge Runner headless entry point
//!
//! Plays one seeded run with a simple autopilot standing in for the input
//! layer, then records the score.
//! Usage: `merge-runner [tuning.json] [seed] [character]`

use std::path::{Path, PathBuf};

use merge_runner::consts::*;
use merge_runner::sim::{Command, EntityKind, GameEvent, GameState, RunPhase, tick};
use merge_runner::{Character, HighScores, PlayerProfile, Tuning};

/// Upper bound on a headless run (10 minutes of play)
const MAX_TICKS: u64 = 10 * 60 * 60;

fn main() {
    env_logger::init();
    log::info!("Merge Runner (headless) starting...");

    let mut args = std::env::args().skip(1);
    let tuning = args
        .next()
        .map(|path| Tuning::load(Path::new(&path)))
        .unwrap_or_default();
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0x5EED);

    let data_dir = PathBuf::from(DATA_DIR);
    let profile_path = data_dir.join(PROFILE_FILE);
    let mut profile = PlayerProfile::load(&profile_path);
    if let Some(name) = args.next() {
        match name.parse::<Character>() {
            Ok(character) => {
                profile = PlayerProfile::with_character(character);
                if let Err(e) = profile.save(&profile_path) {
                    log::warn!("Could not save profile: {}", e);
                }
            }
            Err(e) => log::warn!("{}, keeping saved profile", e),
        }
    }
    match profile.character {
        Some(c) => log::info!("Running as {}", c.as_str()),
        None => log::info!("No character selected, using default runner"),
    }

    let mut state = GameState::new(tuning, seed);
    log::info!("Game initialized with seed: {}", seed);

    let mut bosses = 0u32;
    let mut projectiles = 0u32;
    while state.phase == RunPhase::Running && state.time_ticks < MAX_TICKS {
        let commands = autopilot(&state);
        tick(&mut state, &commands, SIM_DT);

        for event in state.events.drain() {
            match event {
                GameEvent::BossDefeated { count } => bosses = count,
                GameEvent::EntitySpawned {
                    kind: EntityKind::Projectile,
                    ..
                } => projectiles += 1,
                _ => {}
            }
        }
    }

    let final_score = state.ledger.final_score();
    log::info!(
        "Run over after {:.1}s: {:?}, distance {:.0}, score {}, bosses {}, boss shots {}",
        state.clock.elapsed,
        state.phase,
        state.clock.distance,
        final_score,
        bosses,
        projectiles
    );

    let board_path = data_dir.join(LEADERBOARD_FILE);
    let mut scores = HighScores::load(&board_path);
    match scores.add_score("Player", final_score) {
        Some(rank) => {
            log::info!("New high score! Rank {}", rank);
            if let Err(e) = scores.save(&board_path) {
                log::warn!("Could not save leaderboard: {}", e);
            }
        }
        None => log::info!("Score did not make the leaderboard"),
    }
    println!("Final score: {final_score}");
}

/// Naive input layer: hit the boss when close, skill when ready, hop obstacles
fn autopilot(state: &GameState) -> Vec<Command> {
    let tuning = state.tuning();
    let player_x = state.player.pos.x;
    let mut commands = Vec::new();

    if let Some(boss) = state.boss.boss() {
        if (boss.body.pos.x - player_x).abs() < tuning.combat.melee_range {
            commands.push(Command::Melee);
        }
        if state.ledger.skill_ready() {
            commands.push(Command::Skill);
        }
    }

    let obstacle_ahead = state
        .registry
        .obstacles()
        .iter()
        .any(|o| o.pos.x > player_x && o.pos.x - player_x < 60.0);
    if obstacle_ahead && !state.player.is_airborne() {
        commands.push(Command::Jump);
    }
    commands
}
