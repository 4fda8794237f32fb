use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Simulation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: Vec3,
    /// Length of one internal simulation step, in seconds.
    pub fixed_step: f32,
    /// Upper bound on internal steps per `step_simulation` call. Whole steps
    /// beyond the bound are dropped; only the sub-step remainder carries over.
    pub max_substeps: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.8, 0.0),
            fixed_step: 1.0 / 60.0,
            max_substeps: 1,
        }
    }
}
