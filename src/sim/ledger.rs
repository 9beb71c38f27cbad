//! Player health, score and skill cooldown
//!
//! Every write clamps: `0 <= health <= max_health`, `score >= 0`,
//! `skill_cooldown >= 0`. There are no raw setters.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    health: i32,
    max_health: i32,
    score: f64,
    skill_cooldown: f32,
}

impl Ledger {
    pub fn new(max_health: i32) -> Self {
        let max_health = max_health.max(1);
        Self {
            health: max_health,
            max_health,
            score: 0.0,
            skill_cooldown: 0.0,
        }
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    /// Whole-number score as shown on the HUD and stored on the leaderboard
    pub fn final_score(&self) -> u64 {
        self.score.floor() as u64
    }

    pub fn skill_cooldown(&self) -> f32 {
        self.skill_cooldown
    }

    pub fn is_depleted(&self) -> bool {
        self.health == 0
    }

    /// Subtract health, returning the amount actually removed
    pub fn damage(&mut self, amount: i32) -> i32 {
        let before = self.health;
        self.health = (self.health - amount.max(0)).clamp(0, self.max_health);
        before - self.health
    }

    pub fn add_score(&mut self, amount: f64) {
        self.score = (self.score + amount.max(0.0)).max(0.0);
    }

    /// Penalties never take the score below zero
    pub fn deduct_score(&mut self, amount: f64) {
        self.score = (self.score - amount.max(0.0)).max(0.0);
    }

    pub fn skill_ready(&self) -> bool {
        self.skill_cooldown <= 0.0
    }

    pub fn start_skill_cooldown(&mut self, seconds: f32) {
        self.skill_cooldown = seconds.max(0.0);
    }

    pub fn cool_down(&mut self, dt: f32) {
        if self.skill_cooldown > 0.0 {
            self.skill_cooldown = (self.skill_cooldown - dt.max(0.0)).max(0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_clamps_at_zero() {
        let mut ledger = Ledger::new(100);
        assert_eq!(ledger.damage(60), 60);
        assert_eq!(ledger.damage(60), 40);
        assert_eq!(ledger.health(), 0);
        assert!(ledger.is_depleted());
        assert_eq!(ledger.damage(10), 0);
    }

    #[test]
    fn test_negative_amounts_do_nothing() {
        let mut ledger = Ledger::new(100);
        ledger.damage(-20);
        assert_eq!(ledger.health(), 100);
        ledger.add_score(-5.0);
        assert_eq!(ledger.score(), 0.0);
    }

    #[test]
    fn test_penalty_floors_score() {
        let mut ledger = Ledger::new(100);
        ledger.add_score(25.0);
        ledger.deduct_score(40.0);
        assert_eq!(ledger.score(), 0.0);
    }

    #[test]
    fn test_skill_cooldown() {
        let mut ledger = Ledger::new(100);
        assert!(ledger.skill_ready());
        ledger.start_skill_cooldown(3.0);
        assert!(!ledger.skill_ready());
        ledger.cool_down(2.0);
        assert!(!ledger.skill_ready());
        ledger.cool_down(2.0);
        assert!(ledger.skill_ready());
        assert_eq!(ledger.skill_cooldown(), 0.0);
    }
}
