//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Fixed update order within a tick
//! - Stable iteration order (insertion order, entity IDs never reused)
//! - No rendering, audio or file dependencies

pub mod boss;
pub mod clock;
pub mod collision;
pub mod command;
pub mod events;
pub mod ledger;
pub mod registry;
pub mod spawn;
pub mod state;
pub mod tick;

pub use boss::{Boss, BossEncounter, BossHit, BossPhase, EncounterState};
pub use clock::DistanceClock;
pub use collision::{Aabb, CollisionReport, resolve_collisions};
pub use command::{Command, CommandOutcome, Rejection, apply_command};
pub use events::{DamagePopup, EventQueue, GameEvent, RunOutcome, Sound};
pub use ledger::Ledger;
pub use registry::EntityRegistry;
pub use spawn::SpawnScheduler;
pub use state::{Animation, CameraTarget, Entity, EntityId, EntityKind, GameState, Player, RunPhase};
pub use tick::tick;
