//! Live obstacles, collectibles and projectiles
//!
//! Each kind is kept in its own insertion-ordered list. IDs come from a
//! monotonically increasing counter, so a removed entity can never come back.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::state::{Entity, EntityId, EntityKind};
use crate::tuning::{Hitboxes, ProjectileBounds};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityRegistry {
    obstacles: Vec<Entity>,
    collectibles: Vec<Entity>,
    projectiles: Vec<Entity>,
    next_id: EntityId,
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self {
            obstacles: Vec::new(),
            collectibles: Vec::new(),
            projectiles: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Create and store an entity. Bosses are owned by the encounter, so
    /// for `EntityKind::Boss` only an ID is allocated.
    pub fn spawn(&mut self, kind: EntityKind, pos: Vec2, vel: Vec2) -> EntityId {
        let id = self.next_entity_id();
        let entity = Entity::new(id, kind, pos).with_velocity(vel);
        match self.list_mut(kind) {
            Some(list) => list.push(entity),
            None => log::warn!("Registry does not hold {:?} entities", kind),
        }
        id
    }

    pub fn obstacles(&self) -> &[Entity] {
        &self.obstacles
    }

    pub fn collectibles(&self) -> &[Entity] {
        &self.collectibles
    }

    pub fn projectiles(&self) -> &[Entity] {
        &self.projectiles
    }

    pub fn len(&self) -> usize {
        self.obstacles.len() + self.collectibles.len() + self.projectiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.obstacles
            .iter()
            .chain(&self.collectibles)
            .chain(&self.projectiles)
            .find(|e| e.id == id)
    }

    /// Remove an entity by ID. Removing an absent entity is a no-op.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        for list in [
            &mut self.obstacles,
            &mut self.collectibles,
            &mut self.projectiles,
        ] {
            if let Some(index) = list.iter().position(|e| e.id == id) {
                return Some(list.remove(index));
            }
        }
        None
    }

    /// Move every projectile by its per-tick velocity
    pub fn advance_projectiles(&mut self) {
        for projectile in &mut self.projectiles {
            projectile.pos += projectile.vel;
        }
    }

    /// Drop obstacles and collectibles more than `trailing_window` behind the
    /// player, and projectiles that left `bounds`. Returns what was removed.
    pub fn reap(
        &mut self,
        player_x: f32,
        trailing_window: f32,
        bounds: &ProjectileBounds,
    ) -> Vec<Entity> {
        let cutoff = player_x - trailing_window;
        let mut reaped = Vec::new();
        drain_where(&mut self.obstacles, &mut reaped, |e| e.pos.x < cutoff);
        drain_where(&mut self.collectibles, &mut reaped, |e| e.pos.x < cutoff);
        drain_where(&mut self.projectiles, &mut reaped, |e| {
            !bounds.contains(e.pos, player_x)
        });
        reaped
    }

    /// Remove every entity of `kind` whose hitbox overlaps `target`
    pub fn take_overlapping(
        &mut self,
        kind: EntityKind,
        target: &Aabb,
        hitboxes: &Hitboxes,
    ) -> Vec<Entity> {
        let mut taken = Vec::new();
        if let Some(list) = self.list_mut(kind) {
            drain_where(list, &mut taken, |e| e.hitbox(hitboxes).overlaps(target));
        }
        taken
    }

    /// Remove every entity of `kind` horizontally closer than `radius` to `x`
    pub fn take_within(&mut self, kind: EntityKind, x: f32, radius: f32) -> Vec<Entity> {
        let mut taken = Vec::new();
        if let Some(list) = self.list_mut(kind) {
            drain_where(list, &mut taken, |e| (e.pos.x - x).abs() < radius);
        }
        taken
    }

    fn list_mut(&mut self, kind: EntityKind) -> Option<&mut Vec<Entity>> {
        match kind {
            EntityKind::Obstacle => Some(&mut self.obstacles),
            EntityKind::Collectible => Some(&mut self.collectibles),
            EntityKind::Projectile => Some(&mut self.projectiles),
            EntityKind::Boss => None,
        }
    }
}

/// Move matching entities from `list` into `out`, preserving order in both
fn drain_where(list: &mut Vec<Entity>, out: &mut Vec<Entity>, pred: impl Fn(&Entity) -> bool) {
    let mut kept = Vec::with_capacity(list.len());
    for entity in list.drain(..) {
        if pred(&entity) {
            out.push(entity);
        } else {
            kept.push(entity);
        }
    }
    *list = kept;
}
