//! Outbound feedback for the presentation layer
//!
//! Damage popups decay with time; signals are fire-and-forget and drained by
//! the collaborator once per frame. Nothing here is read back into gameplay.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{EntityId, EntityKind};

/// Sound cues (the collaborator decides whether a sound is loaded)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sound {
    Shoot,
    Melee,
    SkillHit,
    Win,
    Lose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    Victory,
    Defeat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Renderer should create a visual for this entity
    EntitySpawned {
        id: EntityId,
        kind: EntityKind,
        pos: Vec2,
        vel: Vec2,
    },
    /// Entity was reaped or consumed; its visual can go
    EntityRemoved { id: EntityId, kind: EntityKind },
    PlaySound(Sound),
    SpawnExplosion { pos: Vec2 },
    BossDefeated { count: u32 },
    /// Area-denial skill removed this many obstacles
    ObstaclesCleared { count: u32 },
    RunEnded { outcome: RunOutcome, final_score: u64 },
    MenuRequested,
}

/// Floating damage number
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamagePopup {
    pub pos: Vec2,
    pub amount: i32,
    /// Seconds left before the popup disappears
    pub ttl: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventQueue {
    popups: Vec<DamagePopup>,
    signals: Vec<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_popup(&mut self, pos: Vec2, amount: i32, ttl: f32) {
        if ttl > 0.0 {
            self.popups.push(DamagePopup { pos, amount, ttl });
        }
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.signals.push(event);
    }

    pub fn popups(&self) -> &[DamagePopup] {
        &self.popups
    }

    /// Signals emitted since the last drain, oldest first
    pub fn pending(&self) -> &[GameEvent] {
        &self.signals
    }

    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.signals)
    }

    /// Age popups and drop the expired ones
    pub fn decay(&mut self, dt: f32) {
        for popup in &mut self.popups {
            popup.ttl -= dt;
        }
        self.popups.retain(|p| p.ttl > 0.0);
    }
}
