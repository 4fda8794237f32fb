use crate::config::PhysicsConfig;
use glam::{Quat, Vec3};
use rapier3d::prelude::*;
use skyhop_common::{EntityId, Transform};
use skyhop_kernel::{ContactManifold, PhysicsView};
use std::collections::BTreeMap;

/// Errors from physics world operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PhysicsError {
    #[error("entity {0} already has a rigid body")]
    DuplicateBody(EntityId),
    #[error("entity {0} has no rigid body")]
    UnknownEntity(EntityId),
}

/// How a body takes part in the simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyKind {
    /// Moved by forces and contacts.
    Dynamic { mass: f32 },
    /// Never moves.
    Fixed,
    /// Moved only by explicit teleports from game code.
    Kinematic,
}

/// Collision shape, centred on the body origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Ball { radius: f32 },
    Cuboid { half_extents: Vec3 },
}

/// Everything needed to create one body and its collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDesc {
    pub kind: BodyKind,
    pub shape: Shape,
    pub position: Vec3,
    pub friction: f32,
    pub restitution: f32,
    /// When false, contacts are still reported but the solver ignores them.
    pub contact_response: bool,
}

impl BodyDesc {
    pub fn new(kind: BodyKind, shape: Shape, position: Vec3) -> Self {
        Self {
            kind,
            shape,
            position,
            friction: 1.0,
            restitution: 0.0,
            contact_response: true,
        }
    }

    pub fn without_contact_response(mut self) -> Self {
        self.contact_response = false;
        self
    }
}

/// The rigid-body world plus the bookkeeping that maps bodies to entities.
pub struct PhysicsWorld {
    config: PhysicsConfig,
    gravity: Vector<Real>,
    params: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    handles: BTreeMap<EntityId, RigidBodyHandle>,
    accumulator: f32,
    steps: u64,
}

impl PhysicsWorld {
    pub fn new(config: PhysicsConfig) -> Self {
        let params = IntegrationParameters {
            dt: config.fixed_step,
            ..IntegrationParameters::default()
        };
        Self {
            gravity: to_vector(config.gravity),
            config,
            params,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            handles: BTreeMap::new(),
            accumulator: 0.0,
            steps: 0,
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Number of internal steps taken so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn body_count(&self) -> usize {
        self.handles.len()
    }

    /// Create the body owned by `entity`.
    pub fn add_body(&mut self, entity: EntityId, desc: BodyDesc) -> Result<(), PhysicsError> {
        if self.handles.contains_key(&entity) {
            return Err(PhysicsError::DuplicateBody(entity));
        }

        let builder = match desc.kind {
            BodyKind::Dynamic { .. } => RigidBodyBuilder::dynamic().can_sleep(false),
            BodyKind::Fixed => RigidBodyBuilder::fixed(),
            BodyKind::Kinematic => RigidBodyBuilder::kinematic_position_based(),
        };
        let body = builder
            .translation(to_vector(desc.position))
            .user_data(entity.to_user_data())
            .build();
        let handle = self.bodies.insert(body);

        let mut collider = match desc.shape {
            Shape::Ball { radius } => ColliderBuilder::ball(radius),
            Shape::Cuboid { half_extents } => {
                ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            }
        }
        .friction(desc.friction)
        .restitution(desc.restitution)
        .user_data(entity.to_user_data());
        if let BodyKind::Dynamic { mass } = desc.kind {
            collider = collider.mass(mass);
        }
        if !desc.contact_response {
            collider = collider.solver_groups(InteractionGroups::none());
        }
        self.colliders
            .insert_with_parent(collider.build(), handle, &mut self.bodies);

        self.handles.insert(entity, handle);
        tracing::debug!(%entity, kind = ?desc.kind, "rigid body added");
        Ok(())
    }

    /// Current pose of the entity's body. Scale is always one.
    pub fn pose(&self, entity: EntityId) -> Option<Transform> {
        let body = self.body(entity)?;
        Some(Transform {
            position: to_vec3(body.translation()),
            rotation: to_quat(body.rotation()),
            scale: Vec3::ONE,
        })
    }

    pub fn linear_velocity(&self, entity: EntityId) -> Option<Vec3> {
        self.body(entity).map(|b| to_vec3(b.linvel()))
    }

    /// Advance the world by `dt` seconds of wall time.
    ///
    /// Runs whole fixed steps only, at most `max_substeps` of them, and calls
    /// `on_tick` after each one with the fixed step length. Returns the number
    /// of internal steps taken.
    pub fn step_simulation<F>(&mut self, dt: f32, mut on_tick: F) -> u32
    where
        F: FnMut(&mut PhysicsWorld, f32),
    {
        let fixed = self.config.fixed_step;
        self.accumulator += dt.max(0.0);
        let available = (self.accumulator / fixed).floor() as u32;
        if available == 0 {
            return 0;
        }
        self.accumulator -= available as f32 * fixed;

        let steps = available.min(self.config.max_substeps);
        for _ in 0..steps {
            self.step_once();
            on_tick(self, fixed);
        }
        steps
    }

    fn step_once(&mut self) {
        self.pipeline.step(
            &self.gravity,
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
        self.steps += 1;
        tracing::trace!(step = self.steps, "physics step");
    }

    fn body(&self, entity: EntityId) -> Option<&RigidBody> {
        self.handles.get(&entity).and_then(|h| self.bodies.get(*h))
    }

    fn body_mut(&mut self, entity: EntityId) -> Option<&mut RigidBody> {
        let handle = *self.handles.get(&entity)?;
        self.bodies.get_mut(handle)
    }

    fn collider_entity(&self, handle: ColliderHandle) -> Option<EntityId> {
        let collider = self.colliders.get(handle)?;
        EntityId::from_user_data(collider.user_data)
    }
}

impl PhysicsView for PhysicsWorld {
    fn contact_manifolds(&self) -> Vec<ContactManifold> {
        let mut out = Vec::new();
        for pair in self.narrow_phase.contact_pairs() {
            let (Some(a), Some(b)) = (
                self.collider_entity(pair.collider1),
                self.collider_entity(pair.collider2),
            ) else {
                tracing::warn!("contact pair without an owning entity");
                continue;
            };
            for manifold in &pair.manifolds {
                out.push(ContactManifold {
                    a,
                    b,
                    contact_count: manifold.points.len(),
                });
            }
        }
        out
    }

    fn position(&self, entity: EntityId) -> Option<Vec3> {
        self.body(entity).map(|b| to_vec3(b.translation()))
    }

    fn set_position(&mut self, entity: EntityId, position: Vec3) -> bool {
        let Some(body) = self.body_mut(entity) else {
            return false;
        };
        body.set_translation(to_vector(position), true);
        true
    }

    fn reset_body(&mut self, entity: EntityId, position: Vec3) -> bool {
        let Some(body) = self.body_mut(entity) else {
            return false;
        };
        body.set_translation(to_vector(position), true);
        body.set_rotation(Rotation::identity(), true);
        body.set_linvel(Vector::zeros(), true);
        body.set_angvel(Vector::zeros(), true);
        true
    }

    fn apply_impulse(&mut self, entity: EntityId, impulse: Vec3) -> bool {
        let Some(body) = self.body_mut(entity) else {
            return false;
        };
        body.apply_impulse(to_vector(impulse), true);
        true
    }
}

fn to_vector(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

fn to_vec3(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

fn to_quat(q: &Rotation<Real>) -> Quat {
    Quat::from_xyzw(q.i, q.j, q.k, q.w)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HERO: EntityId = EntityId(0);
    const GROUND: EntityId = EntityId(1);
    const ENEMY: EntityId = EntityId(2);

    fn demo_world() -> PhysicsWorld {
        let mut world = PhysicsWorld::new(PhysicsConfig::default());
        world
            .add_body(
                HERO,
                BodyDesc::new(
                    BodyKind::Dynamic { mass: 13.0 },
                    Shape::Ball { radius: 1.0 },
                    Vec3::new(0.0, 0.5, 0.0),
                ),
            )
            .unwrap();
        world
            .add_body(
                GROUND,
                BodyDesc::new(
                    BodyKind::Fixed,
                    Shape::Cuboid {
                        half_extents: Vec3::new(4.0, 0.5, 4.0),
                    },
                    Vec3::new(0.0, -1.0, 0.0),
                ),
            )
            .unwrap();
        world
            .add_body(
                ENEMY,
                BodyDesc::new(
                    BodyKind::Kinematic,
                    Shape::Cuboid {
                        half_extents: Vec3::ONE,
                    },
                    Vec3::new(18.0, 1.0, 0.0),
                )
                .without_contact_response(),
            )
            .unwrap();
        world
    }

    fn run(world: &mut PhysicsWorld, ticks: u32) {
        for _ in 0..ticks {
            world.step_simulation(1.0 / 60.0 + 1e-4, |_, _| {});
        }
    }

    fn touching(world: &PhysicsWorld, x: EntityId, y: EntityId) -> bool {
        world
            .contact_manifolds()
            .iter()
            .any(|m| m.joins(x, y) && m.is_touching())
    }

    #[test]
    fn duplicate_body_is_rejected() {
        let mut world = demo_world();
        let err = world
            .add_body(
                HERO,
                BodyDesc::new(BodyKind::Fixed, Shape::Ball { radius: 1.0 }, Vec3::ZERO),
            )
            .unwrap_err();
        assert_eq!(err, PhysicsError::DuplicateBody(HERO));
        assert_eq!(world.body_count(), 3);
    }

    #[test]
    fn hero_rests_on_ground_and_reports_contact() {
        let mut world = demo_world();
        run(&mut world, 60);
        assert!(touching(&world, HERO, GROUND));
        let y = world.position(HERO).unwrap().y;
        assert!(y > 0.3 && y < 0.7, "hero settled at y={y}");
    }

    #[test]
    fn gravity_pulls_a_free_body_down() {
        let mut world = PhysicsWorld::new(PhysicsConfig::default());
        world
            .add_body(
                HERO,
                BodyDesc::new(
                    BodyKind::Dynamic { mass: 1.0 },
                    Shape::Ball { radius: 1.0 },
                    Vec3::new(0.0, 10.0, 0.0),
                ),
            )
            .unwrap();
        run(&mut world, 30);
        assert!(world.position(HERO).unwrap().y < 10.0);
        assert!(world.linear_velocity(HERO).unwrap().y < 0.0);
    }

    #[test]
    fn enemy_overlap_is_reported_without_pushing_the_hero() {
        let mut world = demo_world();
        run(&mut world, 10);
        assert!(world.set_position(ENEMY, Vec3::new(1.5, 1.0, 0.0)));
        run(&mut world, 1);
        assert!(touching(&world, HERO, ENEMY));
        assert!(world.position(HERO).unwrap().x.abs() < 0.05);
    }

    #[test]
    fn kinematic_teleport_is_visible_immediately() {
        let mut world = demo_world();
        world.set_position(ENEMY, Vec3::new(3.0, 1.0, 0.0));
        assert_eq!(world.position(ENEMY), Some(Vec3::new(3.0, 1.0, 0.0)));
        run(&mut world, 5);
        assert_eq!(world.position(ENEMY), Some(Vec3::new(3.0, 1.0, 0.0)));
    }

    #[test]
    fn jump_impulse_lifts_the_hero() {
        let mut world = demo_world();
        run(&mut world, 30);
        let before = world.position(HERO).unwrap().y;
        assert!(world.apply_impulse(HERO, Vec3::new(0.0, 100.0, 0.0)));
        run(&mut world, 10);
        assert!(world.position(HERO).unwrap().y > before + 0.5);
    }

    #[test]
    fn reset_body_stops_motion() {
        let mut world = demo_world();
        world.apply_impulse(HERO, Vec3::new(0.0, 100.0, 0.0));
        run(&mut world, 5);
        assert!(world.reset_body(HERO, Vec3::new(0.0, 0.5, 0.0)));
        assert_eq!(world.linear_velocity(HERO), Some(Vec3::ZERO));
        assert_eq!(world.pose(HERO).unwrap().rotation, Quat::IDENTITY);
    }

    #[test]
    fn unknown_entities_are_refused() {
        let mut world = demo_world();
        let ghost = EntityId(42);
        assert!(world.position(ghost).is_none());
        assert!(!world.set_position(ghost, Vec3::ZERO));
        assert!(!world.apply_impulse(ghost, Vec3::Y));
        assert!(!world.reset_body(ghost, Vec3::ZERO));
    }

    #[test]
    fn small_dt_accumulates_before_stepping() {
        let mut world = demo_world();
        let mut calls = 0;
        let fixed = world.config().fixed_step;
        assert_eq!(world.step_simulation(fixed * 0.6, |_, _| calls += 1), 0);
        assert_eq!(world.step_simulation(fixed * 0.6, |_, _| calls += 1), 1);
        assert_eq!(calls, 1);
        assert_eq!(world.steps(), 1);
    }

    #[test]
    fn substeps_are_capped_and_callback_sees_fixed_dt() {
        let config = PhysicsConfig {
            max_substeps: 3,
            ..PhysicsConfig::default()
        };
        let mut world = PhysicsWorld::new(config);
        let mut seen = Vec::new();
        let taken = world.step_simulation(1.0, |_, dt| seen.push(dt));
        assert_eq!(taken, 3);
        assert_eq!(seen, vec![config.fixed_step; 3]);
    }

    #[test]
    fn callback_can_mutate_the_world_mid_step() {
        let mut world = demo_world();
        world.step_simulation(1.0 / 30.0, |w, dt| {
            let p = w.position(ENEMY).unwrap();
            w.set_position(ENEMY, p - Vec3::new(15.0 * dt, 0.0, 0.0));
        });
        let x = world.position(ENEMY).unwrap().x;
        assert!((x - (18.0 - 15.0 / 60.0)).abs() < 1e-4);
    }
}
