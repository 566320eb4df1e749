//! Data-driven game balance
//!
//! Everything a designer might want to retune without touching simulation
//! code. Defaults mirror `crate::consts`; a JSON blob can override them at
//! startup (the shell decides where that blob comes from).

use serde::{Deserialize, Serialize};

use crate::consts::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Player movement speed in px per tick
    pub player_speed: f32,
    pub player_max_health: i32,
    pub player_max_shield: i32,

    pub basic_enemy_health: i32,
    pub basic_enemy_speed: f32,
    /// Boss stats scale linearly with the wave number
    pub boss_base_health: i32,
    pub boss_health_per_wave: i32,
    pub boss_base_speed: f32,
    pub boss_speed_per_wave: f32,

    pub projectile_speed: i32,
    pub projectile_damage: i32,
    pub bounce_budget: u32,

    pub contact_damage: i32,
    pub damage_cooldown_ticks: u32,
    /// Pixel offset between enemies queued at the same entrance
    pub spawn_spacing: i32,
    pub kill_score: u32,

    pub powerup_duration_ticks: u32,
    pub speed_boost_amount: f32,
    pub heal_amount: i32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_speed: PLAYER_SPEED,
            player_max_health: MAX_HEALTH,
            player_max_shield: MAX_SHIELD,

            basic_enemy_health: BASIC_ENEMY_HEALTH,
            basic_enemy_speed: BASIC_ENEMY_SPEED,
            boss_base_health: 10,
            boss_health_per_wave: 3,
            boss_base_speed: 1.5,
            boss_speed_per_wave: 0.1,

            projectile_speed: PROJECTILE_SPEED,
            projectile_damage: PROJECTILE_DAMAGE,
            bounce_budget: BOUNCE_BUDGET,

            contact_damage: CONTACT_DAMAGE,
            damage_cooldown_ticks: DAMAGE_COOLDOWN_TICKS,
            spawn_spacing: SPAWN_SPACING,
            kill_score: KILL_SCORE,

            powerup_duration_ticks: POWERUP_DURATION_TICKS,
            speed_boost_amount: SPEED_BOOST_AMOUNT,
            heal_amount: HEAL_AMOUNT,
        }
    }
}

impl Tuning {
    /// Parse a tuning override; unspecified fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Boss health for a given wave
    pub fn boss_health(&self, wave: u32) -> i32 {
        self.boss_base_health + self.boss_health_per_wave * wave as i32
    }

    /// Boss speed for a given wave
    pub fn boss_speed(&self, wave: u32) -> f32 {
        self.boss_base_speed + self.boss_speed_per_wave * wave as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_consts() {
        let t = Tuning::default();
        assert_eq!(t.player_speed, PLAYER_SPEED);
        assert_eq!(t.damage_cooldown_ticks, DAMAGE_COOLDOWN_TICKS);
        assert_eq!(t.bounce_budget, 2);
    }

    #[test]
    fn test_partial_json_override() {
        let t = Tuning::from_json(r#"{"player_speed": 7.5, "kill_score": 25}"#).unwrap();
        assert_eq!(t.player_speed, 7.5);
        assert_eq!(t.kill_score, 25);
        // Untouched fields keep defaults
        assert_eq!(t.basic_enemy_speed, BASIC_ENEMY_SPEED);
    }

    #[test]
    fn test_boss_scaling() {
        let t = Tuning::default();
        assert_eq!(t.boss_health(5), 25);
        assert!((t.boss_speed(5) - 2.0).abs() < 1e-6);
    }
}
