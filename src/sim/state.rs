//! Game state and core simulation types
//!
//! Everything a run needs to advance deterministically lives here: the
//! seeded RNG, the tuning it was built with and every component's state.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::boss::{BossEncounter, BossHit};
use super::clock::DistanceClock;
use super::collision::Aabb;
use super::events::{EventQueue, GameEvent, RunOutcome, Sound};
use super::ledger::Ledger;
use super::registry::EntityRegistry;
use super::spawn::{self, SpawnScheduler};
use crate::tuning::{Hitboxes, Tuning};

/// Entity identifier (never reused within a run)
pub type EntityId = u32;

/// Frames in the runner and boss sprite sheets
pub const RUN_CYCLE_FRAMES: u32 = 6;
pub const RUN_CYCLE_FRAME_TIME: f32 = 0.08;

/// Behaviour tag of a world entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Obstacle,
    Collectible,
    Projectile,
    Boss,
}

/// Sprite-sheet frame cycling. Cosmetic only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    pub frame: u32,
    pub frames: u32,
    pub frame_time: f32,
    pub timer: f32,
}

impl Animation {
    pub fn new(frames: u32, frame_time: f32) -> Self {
        Self {
            frame: 0,
            frames: frames.max(1),
            frame_time,
            timer: 0.0,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.timer += dt;
        if self.timer >= self.frame_time {
            self.frame = (self.frame + 1) % self.frames;
            self.timer = 0.0;
        }
    }
}

/// A world entity: position plus a behaviour tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub pos: Vec2,
    /// Units per tick (projectiles only)
    pub vel: Vec2,
    pub anim: Option<Animation>,
}

impl Entity {
    pub fn new(id: EntityId, kind: EntityKind, pos: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            vel: Vec2::ZERO,
            anim: None,
        }
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn with_animation(mut self, anim: Animation) -> Self {
        self.anim = Some(anim);
        self
    }

    pub fn hitbox(&self, hitboxes: &Hitboxes) -> Aabb {
        Aabb::new(self.pos, hitboxes.for_kind(self.kind))
    }
}

/// The runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub ground_y: f32,
    /// Seconds until a jumping player is back on the ground
    pub hang_time: f32,
    pub anim: Animation,
}

impl Player {
    pub fn new(start: Vec2) -> Self {
        Self {
            pos: start,
            ground_y: start.y,
            hang_time: 0.0,
            anim: Animation::new(RUN_CYCLE_FRAMES, RUN_CYCLE_FRAME_TIME),
        }
    }

    pub fn is_airborne(&self) -> bool {
        self.hang_time > 0.0
    }

    /// Lift the player to jump height. Jumping again while airborne only
    /// refreshes the hang time.
    pub fn jump(&mut self, height: f32, hang_time: f32) {
        self.pos.y = self.ground_y + height;
        self.hang_time = hang_time;
    }

    /// Count down hang time and drop back to the ground when it runs out
    pub fn settle(&mut self, dt: f32) {
        if self.hang_time > 0.0 {
            self.hang_time -= dt;
            if self.hang_time <= 0.0 {
                self.hang_time = 0.0;
                self.pos.y = self.ground_y;
            }
        }
    }

    pub fn hitbox(&self, hitboxes: &Hitboxes) -> Aabb {
        Aabb::new(self.pos, hitboxes.player)
    }
}

/// Lifecycle of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Gameplay advancing
    Running,
    /// Terminal: only cosmetic decay continues
    Ended(RunOutcome),
    /// Player asked for the menu; the collaborator discards this state
    Abandoned,
}

/// Where the presentation layer's camera should head
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraTarget {
    pub x: f32,
    /// Fraction of the remaining gap closed per frame
    pub smoothing: f32,
}

/// Complete run state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Balance configuration (fixed for the lifetime of the run)
    pub(crate) tuning: Tuning,
    pub(crate) rng: Pcg32,
    pub phase: RunPhase,
    /// Gameplay ticks advanced
    pub time_ticks: u64,
    pub clock: DistanceClock,
    pub player: Player,
    pub ledger: Ledger,
    pub spawner: SpawnScheduler,
    pub registry: EntityRegistry,
    pub boss: BossEncounter,
    pub events: EventQueue,
}

impl GameState {
    /// Create a new run with the given tuning and seed
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: RunPhase::Running,
            time_ticks: 0,
            clock: DistanceClock::new(),
            player: Player::new(tuning.player_start),
            ledger: Ledger::new(tuning.player_max_health),
            spawner: SpawnScheduler::new(),
            registry: EntityRegistry::new(),
            boss: BossEncounter::new(&tuning.boss),
            events: EventQueue::new(),
            tuning,
        };

        for _ in 0..state.tuning.initial_obstacles {
            spawn::spawn_obstacle(&mut state);
        }
        for _ in 0..state.tuning.initial_collectibles {
            spawn::spawn_collectible(&mut state);
        }

        state
    }

    /// Fresh run with the same tuning and the next seed
    pub fn restarted(&self) -> Self {
        let seed = self.seed.wrapping_add(1);
        log::info!("Run restarted with seed: {}", seed);
        Self::new(self.tuning.clone(), seed)
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn is_running(&self) -> bool {
        self.phase == RunPhase::Running
    }

    pub fn camera_target(&self) -> CameraTarget {
        CameraTarget {
            x: self.player.pos.x - self.tuning.camera_lead,
            smoothing: self.tuning.camera_smoothing,
        }
    }

    /// Damage the player and queue a popup above them.
    /// Returns true if this hit ended the run.
    pub fn damage_player(&mut self, amount: i32) -> bool {
        if !self.is_running() {
            return false;
        }
        self.ledger.damage(amount);
        let popup_pos = self.player.pos + Vec2::new(0.0, self.tuning.combat.player_popup_rise);
        self.events
            .push_popup(popup_pos, amount, self.tuning.combat.hit_popup_ttl);

        if self.ledger.is_depleted() {
            self.end_run(RunOutcome::Defeat);
            return true;
        }
        false
    }

    /// Damage the active boss, resolving its defeat if health runs out
    pub fn damage_boss(&mut self, amount: i32) -> BossHit {
        if !self.is_running() {
            return BossHit::NoTarget;
        }
        let hit = self
            .boss
            .damage(amount, &self.tuning.boss, &mut self.ledger, &mut self.events);

        if hit == BossHit::Defeated
            && let Some(target) = self.tuning.victory_after_bosses
            && self.boss.defeated_count() >= target
        {
            self.end_run(RunOutcome::Victory);
        }
        hit
    }

    /// Enter the terminal state. Only the first call has any effect.
    pub fn end_run(&mut self, outcome: RunOutcome) {
        if !self.is_running() {
            return;
        }
        self.phase = RunPhase::Ended(outcome);
        if outcome == RunOutcome::Defeat {
            self.events.emit(GameEvent::PlaySound(Sound::Lose));
        }
        let final_score = self.ledger.final_score();
        self.events.emit(GameEvent::RunEnded {
            outcome,
            final_score,
        });
        log::info!(
            "Run ended: {:?} (score {}, distance {:.0})",
            outcome,
            final_score,
            self.clock.distance
        );
    }

    /// Leave the run for the menu
    pub fn abandon(&mut self) {
        if self.phase == RunPhase::Abandoned {
            return;
        }
        self.phase = RunPhase::Abandoned;
        self.events.emit(GameEvent::MenuRequested);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_tuning() -> Tuning {
        Tuning {
            initial_obstacles: 0,
            initial_collectibles: 0,
            ..Tuning::default()
        }
    }

    #[test]
    fn test_new_run_populates_world() {
        let state = GameState::new(Tuning::default(), 7);
        assert_eq!(state.registry.obstacles().len(), 6);
        assert_eq!(state.registry.collectibles().len(), 5);
        let spawned = state
            .events
            .pending()
            .iter()
            .filter(|e| matches!(e, GameEvent::EntitySpawned { .. }))
            .count();
        assert_eq!(spawned, 11);
    }

    #[test]
    fn test_same_seed_same_world() {
        let a = GameState::new(Tuning::default(), 42);
        let b = GameState::new(Tuning::default(), 42);
        assert_eq!(a.registry.obstacles(), b.registry.obstacles());
        assert_eq!(a.registry.collectibles(), b.registry.collectibles());
    }

    #[test]
    fn test_defeat_reported_once() {
        let mut state = GameState::new(empty_tuning(), 1);
        assert!(state.damage_player(150));
        assert!(!state.damage_player(10));
        assert_eq!(state.ledger.health(), 0);
        let ended = state
            .events
            .pending()
            .iter()
            .filter(|e| matches!(e, GameEvent::RunEnded { .. }))
            .count();
        assert_eq!(ended, 1);
        assert_eq!(state.phase, RunPhase::Ended(RunOutcome::Defeat));
    }

    #[test]
    fn test_jump_settles_back_to_ground() {
        let mut player = Player::new(Vec2::new(200.0, 200.0));
        player.jump(90.0, 0.6);
        assert!(player.is_airborne());
        assert_eq!(player.pos.y, 290.0);
        player.jump(90.0, 0.6);
        assert_eq!(player.pos.y, 290.0);
        player.settle(0.7);
        assert!(!player.is_airborne());
        assert_eq!(player.pos.y, 200.0);
    }

    #[test]
    fn test_camera_trails_player() {
        let state = GameState::new(empty_tuning(), 1);
        let camera = state.camera_target();
        assert_eq!(camera.x, 200.0 - 300.0);
        assert_eq!(camera.smoothing, 0.08);
    }

    #[test]
    fn test_restart_uses_next_seed() {
        let mut state = GameState::new(empty_tuning(), 9);
        state.damage_player(500);
        let fresh = state.restarted();
        assert_eq!(fresh.seed, 10);
        assert!(fresh.is_running());
        assert_eq!(fresh.ledger.health(), 100);
    }
}
