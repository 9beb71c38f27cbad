//! Overlap detection and per-category collision effects
//!
//! Resolution runs in a fixed order every tick: collectibles, obstacles,
//! projectiles, then boss body contact. Each step sees the results of the
//! previous ones.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::events::GameEvent;
use super::state::{Entity, EntityKind, GameState};

/// Axis-aligned rectangle given by center and half-extents
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    /// Strict overlap; rectangles that only touch do not collide
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let gap = (self.center - other.center).abs();
        let reach = self.half_extents + other.half_extents;
        gap.x < reach.x && gap.y < reach.y
    }
}

/// What happened during one resolution pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionReport {
    pub collectibles: u32,
    pub obstacles: u32,
    pub projectile_hits: u32,
    pub boss_contact: bool,
}

/// Resolve every player overlap for this tick
pub fn resolve_collisions(state: &mut GameState) -> CollisionReport {
    let mut report = CollisionReport::default();
    if !state.is_running() {
        return report;
    }

    report.collectibles = collect_coins(state);
    report.obstacles = hit_obstacles(state);
    report.projectile_hits = hit_projectiles(state);
    if state.is_running() {
        report.boss_contact = boss_contact(state);
    }
    report
}

fn collect_coins(state: &mut GameState) -> u32 {
    let player_box = state.player.hitbox(&state.tuning.hitboxes);
    let taken = state.registry.take_overlapping(
        EntityKind::Collectible,
        &player_box,
        &state.tuning.hitboxes,
    );
    for _ in &taken {
        state.ledger.add_score(state.tuning.combat.coin_score);
    }
    announce_removed(state, &taken);
    taken.len() as u32
}

fn hit_obstacles(state: &mut GameState) -> u32 {
    let player_box = state.player.hitbox(&state.tuning.hitboxes);
    let taken = state.registry.take_overlapping(
        EntityKind::Obstacle,
        &player_box,
        &state.tuning.hitboxes,
    );
    for _ in &taken {
        state.ledger.deduct_score(state.tuning.combat.obstacle_penalty);
        state.player.pos.x =
            (state.player.pos.x - state.tuning.combat.knockback).max(state.tuning.player_min_x);
    }
    announce_removed(state, &taken);
    taken.len() as u32
}

fn hit_projectiles(state: &mut GameState) -> u32 {
    let player_box = state.player.hitbox(&state.tuning.hitboxes);
    let taken = state.registry.take_overlapping(
        EntityKind::Projectile,
        &player_box,
        &state.tuning.hitboxes,
    );
    announce_removed(state, &taken);

    let range = state.tuning.combat.projectile_damage;
    let mut hits = 0;
    for _ in &taken {
        if !state.is_running() {
            break;
        }
        let damage = state.rng.random_range(range.min..=range.max);
        state.damage_player(damage);
        hits += 1;
    }
    hits
}

/// Mutual damage on boss contact. The player's hit is checked first; if it
/// ends the run, the boss is spared and no victory is awarded.
fn boss_contact(state: &mut GameState) -> bool {
    let Some(boss) = state.boss.boss() else {
        return false;
    };
    let boss_box = boss.body.hitbox(&state.tuning.hitboxes);
    if !state.player.hitbox(&state.tuning.hitboxes).overlaps(&boss_box) {
        return false;
    }

    let combat = &state.tuning.combat;
    let player_damage =
        combat.contact_base + (state.clock.distance / combat.contact_step).floor() as i32;
    let boss_damage = combat.contact_boss_damage;

    if state.damage_player(player_damage) {
        return true;
    }
    state.damage_boss(boss_damage);
    true
}

fn announce_removed(state: &mut GameState, removed: &[Entity]) {
    for entity in removed {
        state.events.emit(GameEvent::EntityRemoved {
            id: entity.id,
            kind: entity.kind,
        });
    }
}
