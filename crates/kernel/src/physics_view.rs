use glam::Vec3;
use skyhop_common::EntityId;

/// A pair of bodies the physics step found touching, already resolved back to
/// the entities that own them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactManifold {
    pub a: EntityId,
    pub b: EntityId,
    /// Number of contact points in the manifold. Pairs whose bounding volumes
    /// overlap without touching are reported with zero points.
    pub contact_count: usize,
}

impl ContactManifold {
    pub fn is_touching(&self) -> bool {
        self.contact_count > 0
    }

    /// True if the manifold joins `x` and `y` in either order.
    pub fn joins(&self, x: EntityId, y: EntityId) -> bool {
        (self.a == x && self.b == y) || (self.a == y && self.b == x)
    }
}

/// What the game policy needs from the physics world during a tick.
///
/// Implemented by the rigid-body adapter; tests implement it with a scripted
/// world. Mutators return `false` when the entity has no body.
pub trait PhysicsView {
    /// Manifolds produced by the step that just completed.
    fn contact_manifolds(&self) -> Vec<ContactManifold>;

    fn position(&self, entity: EntityId) -> Option<Vec3>;

    /// Teleport a body without touching its velocity.
    fn set_position(&mut self, entity: EntityId, position: Vec3) -> bool;

    /// Teleport a body, clear its rotation and stop all motion.
    fn reset_body(&mut self, entity: EntityId, position: Vec3) -> bool;

    /// Apply an impulse at the body's centre of mass.
    fn apply_impulse(&mut self, entity: EntityId, impulse: Vec3) -> bool;
}
