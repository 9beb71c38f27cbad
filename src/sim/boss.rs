//! Boss encounter state machine
//!
//! `Inactive -> Active(phase) -> Defeated -> Active(phase) -> ...`
//!
//! A boss appears when cumulative distance crosses the next threshold and
//! leaves only when its health reaches zero. Its phase is derived from the
//! remaining health ratio and cached on every health change and tick.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::events::{EventQueue, GameEvent, Sound};
use super::ledger::Ledger;
use super::registry::EntityRegistry;
use super::state::{Animation, Entity, EntityKind, RUN_CYCLE_FRAMES, RUN_CYCLE_FRAME_TIME};
use crate::tuning::BossTuning;

/// Behaviour regime picked by remaining health
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BossPhase {
    One,
    Two,
    Three,
}

impl BossPhase {
    /// Phase for a health ratio in `[0, 1]`
    pub fn from_ratio(ratio: f32, tuning: &BossTuning) -> Self {
        if ratio > tuning.phase_two_ratio {
            BossPhase::One
        } else if ratio > tuning.phase_three_ratio {
            BossPhase::Two
        } else {
            BossPhase::Three
        }
    }

    /// 1-based phase number
    pub fn number(self) -> u8 {
        match self {
            BossPhase::One => 1,
            BossPhase::Two => 2,
            BossPhase::Three => 3,
        }
    }

    pub fn index(self) -> usize {
        usize::from(self.number() - 1)
    }
}

/// An active boss
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boss {
    pub body: Entity,
    pub health: i32,
    pub max_health: i32,
    /// Cached `BossPhase::from_ratio(health / max_health)`
    pub phase: BossPhase,
    /// Seconds since the last volley
    pub shoot_timer: f32,
}

impl Boss {
    pub fn new(body: Entity, max_health: i32) -> Self {
        let max_health = max_health.max(1);
        Self {
            body,
            health: max_health,
            max_health,
            phase: BossPhase::One,
            shoot_timer: 0.0,
        }
    }

    pub fn health_ratio(&self) -> f32 {
        self.health as f32 / self.max_health.max(1) as f32
    }

    fn refresh_phase(&mut self, tuning: &BossTuning) {
        self.phase = BossPhase::from_ratio(self.health_ratio(), tuning);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EncounterState {
    /// No boss has appeared yet
    Inactive,
    Active(Boss),
    /// Last boss was beaten; the next one waits for its threshold
    Defeated,
}

/// Result of damaging the boss
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BossHit {
    /// No boss to hit
    NoTarget,
    Damaged { remaining: i32 },
    Defeated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossEncounter {
    pub state: EncounterState,
    /// Distance at which the next boss appears (strictly increasing)
    pub next_threshold: f32,
    defeated: u32,
}

impl BossEncounter {
    pub fn new(tuning: &BossTuning) -> Self {
        Self {
            state: EncounterState::Inactive,
            next_threshold: tuning.first_threshold,
            defeated: 0,
        }
    }

    pub fn boss(&self) -> Option<&Boss> {
        match &self.state {
            EncounterState::Active(boss) => Some(boss),
            _ => None,
        }
    }

    pub fn boss_mut(&mut self) -> Option<&mut Boss> {
        match &mut self.state {
            EncounterState::Active(boss) => Some(boss),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.boss().is_some()
    }

    pub fn defeated_count(&self) -> u32 {
        self.defeated
    }

    /// Spawn a boss if none is active and `distance` reached the threshold.
    /// Returns true if a boss appeared.
    pub fn maybe_spawn(
        &mut self,
        distance: f32,
        player_x: f32,
        tuning: &BossTuning,
        registry: &mut EntityRegistry,
        events: &mut EventQueue,
    ) -> bool {
        if self.is_active() || distance < self.next_threshold {
            return false;
        }

        let id = registry.next_entity_id();
        let pos = Vec2::new(player_x + tuning.spawn_ahead, tuning.spawn_height);
        let body = Entity::new(id, EntityKind::Boss, pos)
            .with_animation(Animation::new(RUN_CYCLE_FRAMES, RUN_CYCLE_FRAME_TIME));
        let max_health = max_health_at(distance, tuning);

        self.next_threshold = threshold_after(self.next_threshold, distance, tuning);
        self.state = EncounterState::Active(Boss::new(body, max_health));

        events.emit(GameEvent::EntitySpawned {
            id,
            kind: EntityKind::Boss,
            pos,
            vel: Vec2::ZERO,
        });
        log::info!(
            "Boss #{} appeared at distance {:.0} with {} HP (next at {:.0})",
            self.defeated + 1,
            distance,
            max_health,
            self.next_threshold
        );
        true
    }

    /// Advance phase, movement and attack timers for one tick
    pub fn update(
        &mut self,
        dt: f32,
        player_x: f32,
        tuning: &BossTuning,
        rng: &mut Pcg32,
        registry: &mut EntityRegistry,
        events: &mut EventQueue,
    ) {
        let EncounterState::Active(boss) = &mut self.state else {
            return;
        };

        boss.shoot_timer += dt;
        boss.refresh_phase(tuning);
        if let Some(anim) = boss.body.anim.as_mut() {
            anim.advance(dt);
        }

        let phase = tuning.phase(boss.phase);
        let gap = player_x - boss.body.pos.x;
        boss.body.pos.x += gap.signum() * phase.advance_per_tick.min(gap.abs());

        if boss.shoot_timer >= phase.shoot_interval {
            boss.shoot_timer = 0.0;
            fire_volley(boss, player_x, tuning, rng, registry, events);
        }
    }

    /// Apply damage to the active boss. Reaching zero health resolves the
    /// defeat: explosion, score bonus, win cue. Without a boss this is a no-op.
    pub fn damage(
        &mut self,
        amount: i32,
        tuning: &BossTuning,
        ledger: &mut Ledger,
        events: &mut EventQueue,
    ) -> BossHit {
        let Some(boss) = self.boss_mut() else {
            return BossHit::NoTarget;
        };

        boss.health = (boss.health - amount.max(0)).clamp(0, boss.max_health);
        boss.refresh_phase(tuning);
        if boss.health > 0 {
            return BossHit::Damaged {
                remaining: boss.health,
            };
        }

        self.defeat(tuning, ledger, events);
        BossHit::Defeated
    }

    fn defeat(&mut self, tuning: &BossTuning, ledger: &mut Ledger, events: &mut EventQueue) {
        let EncounterState::Active(boss) =
            std::mem::replace(&mut self.state, EncounterState::Defeated)
        else {
            return;
        };
        self.defeated += 1;

        ledger.add_score(tuning.defeat_bonus);
        events.emit(GameEvent::SpawnExplosion { pos: boss.body.pos });
        events.emit(GameEvent::EntityRemoved {
            id: boss.body.id,
            kind: EntityKind::Boss,
        });
        events.emit(GameEvent::PlaySound(Sound::Win));
        events.emit(GameEvent::BossDefeated {
            count: self.defeated,
        });
        log::info!("Boss defeated ({} total)", self.defeated);
    }
}

/// Boss max health for an encounter starting at `distance`
pub fn max_health_at(distance: f32, tuning: &BossTuning) -> i32 {
    let steps = (distance.max(0.0) / tuning.health_step_distance).floor() as i32;
    tuning.base_health + steps * tuning.health_per_step
}

/// Next spawn threshold; spacing grows with distance already covered
pub fn threshold_after(threshold: f32, distance: f32, tuning: &BossTuning) -> f32 {
    threshold + tuning.spacing * (1.0 + distance.max(0.0) / tuning.spacing_growth)
}

/// Aim one or two projectiles at the player. Earlier phases fire faster
/// horizontally per speed factor; the vertical component is jittered.
fn fire_volley(
    boss: &Boss,
    player_x: f32,
    tuning: &BossTuning,
    rng: &mut Pcg32,
    registry: &mut EntityRegistry,
    events: &mut EventQueue,
) {
    let phase = tuning.phase(boss.phase);
    let origin = boss.body.pos - Vec2::new(tuning.muzzle_offset, 0.0);
    let dx = player_x - boss.body.pos.x;
    let dy = tuning.aim_height - boss.body.pos.y;
    let dist = dx.abs().max(1.0);
    let lead = 1.0 + f32::from(3 - boss.phase.number()) * 0.2;
    let jitter = rng.random_range(tuning.aim_jitter.min..=tuning.aim_jitter.max);
    let vel = Vec2::new(dx / dist * phase.speed_factor * lead, dy / dist * jitter);

    let mut shots = vec![(origin, vel)];
    if phase.volley >= 2 {
        shots.push((
            origin + Vec2::new(0.0, tuning.volley_offset),
            vel + Vec2::new(0.0, tuning.volley_extra_vy),
        ));
    }

    for (pos, vel) in shots {
        let id = registry.spawn(EntityKind::Projectile, pos, vel);
        events.emit(GameEvent::EntitySpawned {
            id,
            kind: EntityKind::Projectile,
            pos,
            vel,
        });
    }
    events.emit(GameEvent::PlaySound(Sound::Shoot));
}
