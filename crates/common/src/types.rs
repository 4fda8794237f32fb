use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Stable handle of an entity in the registry arena.
///
/// The same handle keys the entity's drawable in the scene and is stored as
/// user data on its physics body, so contact resolution never goes through a
/// raw address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Index into arena storage.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Encode as the opaque user-data word carried by physics objects.
    pub fn to_user_data(self) -> u128 {
        u128::from(self.0)
    }

    /// Decode from physics user data. `None` if the word was never produced
    /// by [`EntityId::to_user_data`].
    pub fn from_user_data(data: u128) -> Option<Self> {
        u32::try_from(data).ok().map(Self)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Spatial transform: position, rotation, scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Model matrix composed as translation × rotation × scale.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}
