//! Data-driven game balance
//!
//! Every number the simulation reads lives here. A `GameState` receives a
//! `Tuning` at construction and never mutates it, so two runs built from the
//! same tuning and seed play out identically.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::persistence;
use crate::sim::{BossPhase, EntityKind};

/// Inclusive float range for uniform draws. Deserializing rejects
/// `min > max` (and NaN), so every loaded span can be sampled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSpan<f32>")]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }
}

impl TryFrom<RawSpan<f32>> for Span {
    type Error = String;

    fn try_from(raw: RawSpan<f32>) -> Result<Self, Self::Error> {
        if raw.min <= raw.max {
            Ok(Self::new(raw.min, raw.max))
        } else {
            Err(format!("empty range: min {} > max {}", raw.min, raw.max))
        }
    }
}

/// Inclusive integer range for damage rolls, validated like `Span`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSpan<i32>")]
pub struct IntSpan {
    pub min: i32,
    pub max: i32,
}

impl IntSpan {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }
}

impl TryFrom<RawSpan<i32>> for IntSpan {
    type Error = String;

    fn try_from(raw: RawSpan<i32>) -> Result<Self, Self::Error> {
        if raw.min <= raw.max {
            Ok(Self::new(raw.min, raw.max))
        } else {
            Err(format!("empty range: min {} > max {}", raw.min, raw.max))
        }
    }
}

/// Unchecked wire form of a span
#[derive(Debug, Deserialize)]
pub struct RawSpan<T> {
    min: T,
    max: T,
}

/// Spawn cadence that shrinks linearly with distance down to a floor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cadence {
    /// Interval at distance 0 (seconds)
    pub base: f32,
    /// Distance that removes one second from the interval
    pub distance_scale: f32,
    /// Shortest allowed interval (seconds)
    pub floor: f32,
}

impl Cadence {
    /// Interval between spawns at the given distance
    pub fn interval(&self, distance: f32) -> f32 {
        (self.base - distance / self.distance_scale).max(self.floor)
    }
}

/// Behaviour of one boss phase
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseTuning {
    /// Seconds between volleys
    pub shoot_interval: f32,
    /// Base projectile speed (units/tick)
    pub speed_factor: f32,
    /// Horizontal advance toward the player (units/tick)
    pub advance_per_tick: f32,
    /// Projectiles per volley
    pub volley: u8,
}

/// Spacing, health and attack parameters for boss encounters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BossTuning {
    /// Distance at which the first boss appears
    pub first_threshold: f32,
    /// Base spacing between encounters, grown by `1 + distance / spacing_growth`
    pub spacing: f32,
    pub spacing_growth: f32,
    pub base_health: i32,
    /// Every `health_step_distance` of travel adds `health_per_step` max health
    pub health_step_distance: f32,
    pub health_per_step: i32,
    /// Spawn offset ahead of the player
    pub spawn_ahead: f32,
    pub spawn_height: f32,
    /// Height projectiles are aimed at
    pub aim_height: f32,
    /// Projectiles leave this far in front of the boss
    pub muzzle_offset: f32,
    /// Phase 1 above this health ratio
    pub phase_two_ratio: f32,
    /// Phase 3 at or below this health ratio
    pub phase_three_ratio: f32,
    pub phases: [PhaseTuning; 3],
    /// Random multiplier applied to the vertical aim component
    pub aim_jitter: Span,
    /// Extra projectile in a double volley
    pub volley_offset: f32,
    pub volley_extra_vy: f32,
    /// Score awarded on defeat
    pub defeat_bonus: f64,
}

impl Default for BossTuning {
    fn default() -> Self {
        Self {
            first_threshold: 2000.0,
            spacing: 2000.0,
            spacing_growth: 8000.0,
            base_health: 80,
            health_step_distance: 500.0,
            health_per_step: 10,
            spawn_ahead: 900.0,
            spawn_height: 220.0,
            aim_height: 200.0,
            muzzle_offset: 30.0,
            phase_two_ratio: 0.66,
            phase_three_ratio: 0.33,
            phases: [
                PhaseTuning {
                    shoot_interval: 1.2,
                    speed_factor: 5.0,
                    advance_per_tick: 0.0,
                    volley: 1,
                },
                PhaseTuning {
                    shoot_interval: 0.9,
                    speed_factor: 6.0,
                    advance_per_tick: 0.8,
                    volley: 1,
                },
                PhaseTuning {
                    shoot_interval: 0.5,
                    speed_factor: 7.0,
                    advance_per_tick: 1.4,
                    volley: 2,
                },
            ],
            aim_jitter: Span::new(0.8, 2.0),
            volley_offset: 50.0,
            volley_extra_vy: 1.0,
            defeat_bonus: 700.0,
        }
    }
}

impl BossTuning {
    pub fn phase(&self, phase: BossPhase) -> &PhaseTuning {
        &self.phases[phase.index()]
    }
}

/// Damage, score and range numbers for collisions and player actions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    pub coin_score: f64,
    pub obstacle_penalty: f64,
    pub knockback: f32,
    pub projectile_damage: IntSpan,
    /// Boss contact: player takes `contact_base + floor(distance / contact_step)`
    pub contact_base: i32,
    pub contact_step: f32,
    /// Boss contact: boss takes this flat amount
    pub contact_boss_damage: i32,
    pub melee_range: f32,
    pub melee_damage: IntSpan,
    pub skill_cooldown: f32,
    /// Skill: `skill_base + floor(distance / skill_step)` against a boss
    pub skill_base: i32,
    pub skill_step: f32,
    /// Skill without a boss clears obstacles closer than this
    pub skill_clear_radius: f32,
    pub player_popup_rise: f32,
    pub boss_popup_rise: f32,
    pub hit_popup_ttl: f32,
    pub melee_popup_ttl: f32,
    pub skill_popup_ttl: f32,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            coin_score: 25.0,
            obstacle_penalty: 40.0,
            knockback: 140.0,
            projectile_damage: IntSpan::new(8, 18),
            contact_base: 18,
            contact_step: 1000.0,
            contact_boss_damage: 40,
            melee_range: 140.0,
            melee_damage: IntSpan::new(8, 16),
            skill_cooldown: 3.0,
            skill_base: 40,
            skill_step: 1000.0,
            skill_clear_radius: 220.0,
            player_popup_rise: 80.0,
            boss_popup_rise: 100.0,
            hit_popup_ttl: 1.0,
            melee_popup_ttl: 0.9,
            skill_popup_ttl: 1.2,
        }
    }
}

/// Half-extents of each entity's collision rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hitboxes {
    pub player: Vec2,
    pub obstacle: Vec2,
    pub collectible: Vec2,
    pub projectile: Vec2,
    pub boss: Vec2,
}

impl Default for Hitboxes {
    fn default() -> Self {
        Self {
            player: Vec2::new(24.0, 40.0),
            obstacle: Vec2::new(24.0, 24.0),
            collectible: Vec2::new(12.0, 12.0),
            projectile: Vec2::new(8.0, 8.0),
            boss: Vec2::new(60.0, 80.0),
        }
    }
}

impl Hitboxes {
    pub fn for_kind(&self, kind: EntityKind) -> Vec2 {
        match kind {
            EntityKind::Obstacle => self.obstacle,
            EntityKind::Collectible => self.collectible,
            EntityKind::Projectile => self.projectile,
            EntityKind::Boss => self.boss,
        }
    }
}

/// Region around the player outside which projectiles are dropped
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileBounds {
    pub behind: f32,
    pub ahead: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl ProjectileBounds {
    pub fn contains(&self, pos: Vec2, player_x: f32) -> bool {
        pos.x >= player_x - self.behind
            && pos.x <= player_x + self.ahead
            && pos.y >= self.min_y
            && pos.y <= self.max_y
    }
}

/// Complete balance configuration for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Baseline scroll speed (units/second)
    pub run_speed: f32,
    /// Share of scrolled units counted as distance
    pub distance_factor: f32,
    /// Score per scrolled unit
    pub distance_score_factor: f64,

    pub player_start: Vec2,
    /// Knock-back never pushes the player behind this x
    pub player_min_x: f32,
    pub player_max_health: i32,
    pub jump_height: f32,
    /// Seconds before a jumping player is back on the ground
    pub jump_hang_time: f32,

    pub obstacle_cadence: Cadence,
    pub collectible_cadence: Cadence,
    pub obstacle_ahead: Span,
    pub obstacle_height: f32,
    pub collectible_ahead: Span,
    pub collectible_height: Span,
    pub initial_obstacles: u32,
    pub initial_collectibles: u32,

    /// Obstacles and collectibles further behind the player are reaped
    pub trailing_window: f32,
    pub projectile_bounds: ProjectileBounds,

    pub boss: BossTuning,
    pub combat: CombatTuning,
    pub hitboxes: Hitboxes,

    /// Camera sits this far behind the player
    pub camera_lead: f32,
    pub camera_smoothing: f32,

    /// End the run in victory after this many bosses (`None` = endless)
    pub victory_after_bosses: Option<u32>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            run_speed: 180.0,
            distance_factor: 0.6,
            distance_score_factor: 0.05,
            player_start: Vec2::new(200.0, 200.0),
            player_min_x: 200.0,
            player_max_health: 100,
            jump_height: 90.0,
            jump_hang_time: 0.6,
            obstacle_cadence: Cadence {
                base: 2.4,
                distance_scale: 8000.0,
                floor: 0.6,
            },
            collectible_cadence: Cadence {
                base: 2.3,
                distance_scale: 9000.0,
                floor: 0.8,
            },
            obstacle_ahead: Span::new(600.0, 3000.0),
            obstacle_height: 200.0,
            collectible_ahead: Span::new(500.0, 2600.0),
            collectible_height: Span::new(240.0, 320.0),
            initial_obstacles: 6,
            initial_collectibles: 5,
            trailing_window: 900.0,
            projectile_bounds: ProjectileBounds {
                behind: 1200.0,
                ahead: 4000.0,
                min_y: -1000.0,
                max_y: 3000.0,
            },
            boss: BossTuning::default(),
            combat: CombatTuning::default(),
            hitboxes: Hitboxes::default(),
            camera_lead: crate::consts::SCREEN_WIDTH * 0.3,
            camera_smoothing: 0.08,
            victory_after_bosses: None,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load tuning from a file, falling back to defaults if missing or corrupt
    pub fn load(path: &Path) -> Self {
        persistence::load_or_default(path, "tuning")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::test_support::scratch_dir;

    #[test]
    fn test_cadence_shrinks_to_floor() {
        let tuning = Tuning::default();
        let c = tuning.obstacle_cadence;
        assert!((c.interval(0.0) - 2.4).abs() < 1e-6);
        assert!((c.interval(8000.0) - 1.4).abs() < 1e-5);
        assert_eq!(c.interval(1_000_000.0), 0.6);
        assert_eq!(tuning.collectible_cadence.interval(1_000_000.0), 0.8);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "run_speed": 240.0, "combat": { "coin_score": 50.0 } }"#)
            .unwrap();
        assert_eq!(tuning.run_speed, 240.0);
        assert_eq!(tuning.combat.coin_score, 50.0);
        assert_eq!(tuning.combat.obstacle_penalty, 40.0);
        assert_eq!(tuning.boss.first_threshold, 2000.0);
    }

    #[test]
    fn test_corrupt_json_is_an_error() {
        assert!(Tuning::from_json("{ run_speed: ").is_err());
    }

    #[test]
    fn test_inverted_span_is_rejected() {
        let err = Tuning::from_json(r#"{ "obstacle_ahead": { "min": 3000.0, "max": 600.0 } }"#);
        assert!(err.is_err());
        let err = Tuning::from_json(r#"{ "combat": { "melee_damage": { "min": 16, "max": 8 } } }"#);
        assert!(err.is_err());
        // A single-value span is still a valid range
        let tuning =
            Tuning::from_json(r#"{ "boss": { "aim_jitter": { "min": 1.0, "max": 1.0 } } }"#).unwrap();
        assert_eq!(tuning.boss.aim_jitter, Span::new(1.0, 1.0));
    }

    #[test]
    fn test_load_with_inverted_span_falls_back_to_defaults() {
        let dir = scratch_dir("tuning-inverted");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("tuning.json");
        std::fs::write(
            &path,
            r#"{ "run_speed": 240.0, "collectible_height": { "min": 320.0, "max": 240.0 } }"#,
        )
        .unwrap();

        let tuning = Tuning::load(&path);
        assert_eq!(tuning, Tuning::default());
        // The fallback tuning starts a run without panicking on a draw
        let state = crate::sim::GameState::new(tuning, 1);
        assert_eq!(state.registry.collectibles().len(), 5);
    }

    #[test]
    fn test_projectile_bounds_follow_player() {
        let bounds = Tuning::default().projectile_bounds;
        assert!(bounds.contains(Vec2::new(20_000.0, 200.0), 19_000.0));
        assert!(!bounds.contains(Vec2::new(17_000.0, 200.0), 19_000.0));
        assert!(!bounds.contains(Vec2::new(19_000.0, 5000.0), 19_000.0));
    }
}
