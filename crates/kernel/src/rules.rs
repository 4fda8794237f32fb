use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Tunable constants of the jump game.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRules {
    /// Units per second the enemy travels towards -X while a round is running.
    pub enemy_speed: f32,
    /// Where the enemy reappears after leaving the play field or hitting the hero.
    pub enemy_spawn: Vec3,
    /// The enemy is recycled once its X coordinate is at or below this value.
    pub boundary_x: f32,
    /// Where the hero is placed when a round ends.
    pub hero_spawn: Vec3,
    /// Impulse applied to the hero on a grounded jump.
    pub jump_impulse: Vec3,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            enemy_speed: 15.0,
            enemy_spawn: Vec3::new(18.0, 1.0, 0.0),
            boundary_x: -18.0,
            hero_spawn: Vec3::new(0.0, 0.5, 0.0),
            jump_impulse: Vec3::new(0.0, 100.0, 0.0),
        }
    }
}

impl GameRules {
    pub fn enemy_velocity(&self) -> Vec3 {
        Vec3::new(-self.enemy_speed, 0.0, 0.0)
    }
}
