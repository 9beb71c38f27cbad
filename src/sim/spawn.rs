//! Distance-scaled spawning of obstacles and collectibles ahead of the player

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::events::GameEvent;
use super::state::{EntityId, EntityKind, GameState};
use crate::tuning::Tuning;

/// Which spawns came due this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpawnDue {
    pub obstacle: bool,
    pub collectible: bool,
}

/// Two independent spawn timers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpawnScheduler {
    pub obstacle_timer: f32,
    pub collectible_timer: f32,
}

impl SpawnScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate `dt` and report which timers passed their cadence.
    /// A timer that fires resets to zero.
    pub fn advance(&mut self, dt: f32, distance: f32, tuning: &Tuning) -> SpawnDue {
        self.obstacle_timer += dt;
        self.collectible_timer += dt;

        let mut due = SpawnDue::default();
        if self.obstacle_timer > tuning.obstacle_cadence.interval(distance) {
            self.obstacle_timer = 0.0;
            due.obstacle = true;
        }
        if self.collectible_timer > tuning.collectible_cadence.interval(distance) {
            self.collectible_timer = 0.0;
            due.collectible = true;
        }
        due
    }
}

/// Run the scheduler for one tick and spawn whatever came due
pub fn update(state: &mut GameState, dt: f32) {
    let due = state
        .spawner
        .advance(dt, state.clock.distance, &state.tuning);
    if due.obstacle {
        spawn_obstacle(state);
    }
    if due.collectible {
        spawn_collectible(state);
    }
}

/// Place an obstacle at ground height somewhere ahead of the player
pub fn spawn_obstacle(state: &mut GameState) -> EntityId {
    let ahead = state.tuning.obstacle_ahead;
    let x = state.player.pos.x + state.rng.random_range(ahead.min..=ahead.max);
    let pos = Vec2::new(x, state.tuning.obstacle_height);
    spawn_at(state, EntityKind::Obstacle, pos)
}

/// Place a coin ahead of the player at a random height
pub fn spawn_collectible(state: &mut GameState) -> EntityId {
    let ahead = state.tuning.collectible_ahead;
    let height = state.tuning.collectible_height;
    let x = state.player.pos.x + state.rng.random_range(ahead.min..=ahead.max);
    let y = state.rng.random_range(height.min..=height.max);
    spawn_at(state, EntityKind::Collectible, Vec2::new(x, y))
}

fn spawn_at(state: &mut GameState, kind: EntityKind, pos: Vec2) -> EntityId {
    let id = state.registry.spawn(kind, pos, Vec2::ZERO);
    log::debug!("Spawned {:?} #{} at x={:.0}", kind, id, pos.x);
    state.events.emit(GameEvent::EntitySpawned {
        id,
        kind,
        pos,
        vel: Vec2::ZERO,
    });
    id
}
