//! Edge-triggered player commands
//!
//! Each command is either applied or explicitly rejected; a rejected command
//! leaves the state untouched.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::events::{GameEvent, Sound};
use super::state::{EntityKind, GameState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Jump,
    Melee,
    Skill,
    /// Start a new run (terminal state only)
    Restart,
    ReturnToMenu,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Rejection {
    /// Gameplay command after the run stopped
    RunOver,
    /// Restart while the run is still going
    RunInProgress,
    /// Melee with no boss within reach
    NoBossInRange,
    SkillCoolingDown { remaining: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CommandOutcome {
    Applied,
    Rejected(Rejection),
}

/// Dispatch a single command against the run
pub fn apply_command(state: &mut GameState, command: Command) -> CommandOutcome {
    let outcome = match command {
        Command::Jump => jump(state),
        Command::Melee => melee(state),
        Command::Skill => skill(state),
        Command::Restart => restart(state),
        Command::ReturnToMenu => {
            state.abandon();
            CommandOutcome::Applied
        }
    };
    if let CommandOutcome::Rejected(reason) = outcome {
        log::debug!("{:?} rejected: {:?}", command, reason);
    }
    outcome
}

fn jump(state: &mut GameState) -> CommandOutcome {
    if !state.is_running() {
        return CommandOutcome::Rejected(Rejection::RunOver);
    }
    state
        .player
        .jump(state.tuning.jump_height, state.tuning.jump_hang_time);
    CommandOutcome::Applied
}

fn melee(state: &mut GameState) -> CommandOutcome {
    if !state.is_running() {
        return CommandOutcome::Rejected(Rejection::RunOver);
    }
    let combat = &state.tuning.combat;
    let Some(boss_pos) = state
        .boss
        .boss()
        .map(|b| b.body.pos)
        .filter(|pos| (pos.x - state.player.pos.x).abs() < combat.melee_range)
    else {
        return CommandOutcome::Rejected(Rejection::NoBossInRange);
    };

    let range = combat.melee_damage;
    let popup_pos = boss_pos + Vec2::new(0.0, combat.boss_popup_rise);
    let popup_ttl = combat.melee_popup_ttl;
    let damage = state.rng.random_range(range.min..=range.max);

    state.events.push_popup(popup_pos, damage, popup_ttl);
    state.events.emit(GameEvent::PlaySound(Sound::Melee));
    state.damage_boss(damage);
    CommandOutcome::Applied
}

fn skill(state: &mut GameState) -> CommandOutcome {
    if !state.is_running() {
        return CommandOutcome::Rejected(Rejection::RunOver);
    }
    if !state.ledger.skill_ready() {
        return CommandOutcome::Rejected(Rejection::SkillCoolingDown {
            remaining: state.ledger.skill_cooldown(),
        });
    }
    state
        .ledger
        .start_skill_cooldown(state.tuning.combat.skill_cooldown);

    let combat = &state.tuning.combat;
    if let Some(boss) = state.boss.boss() {
        let damage = combat.skill_base + (state.clock.distance / combat.skill_step).floor() as i32;
        let popup_pos = boss.body.pos + Vec2::new(0.0, combat.boss_popup_rise);
        let popup_ttl = combat.skill_popup_ttl;

        state.events.push_popup(popup_pos, damage, popup_ttl);
        state.events.emit(GameEvent::PlaySound(Sound::SkillHit));
        state.damage_boss(damage);
        return CommandOutcome::Applied;
    }

    // No boss: area denial around the player
    let cleared = state.registry.take_within(
        EntityKind::Obstacle,
        state.player.pos.x,
        combat.skill_clear_radius,
    );
    for obstacle in &cleared {
        state.events.emit(GameEvent::EntityRemoved {
            id: obstacle.id,
            kind: obstacle.kind,
        });
    }
    let count = cleared.len() as u32;
    state.events.emit(GameEvent::ObstaclesCleared { count });
    if count > 0 {
        state.events.emit(GameEvent::PlaySound(Sound::SkillHit));
    }
    CommandOutcome::Applied
}

fn restart(state: &mut GameState) -> CommandOutcome {
    if state.is_running() {
        return CommandOutcome::Rejected(Rejection::RunInProgress);
    }
    *state = state.restarted();
    CommandOutcome::Applied
}
