use crate::config::SkyhopConfig;
use glam::Vec3;
use skyhop_common::EntityId;
use skyhop_input::{Action, KeyEvent, KeyMap};
use skyhop_kernel::{
    EntityRegistry, GameSession, JumpOutcome, RegistryError, SessionError, ENEMY, GROUND, HERO,
};
use skyhop_physics::{BodyDesc, BodyKind, PhysicsError, PhysicsWorld, Shape};
use skyhop_render::{Camera, Drawable, MeshKind, ProgramId, Scene, SceneError, TextureId};

/// Longest frame time fed to the simulation, in seconds.
pub const MAX_FRAME_DT: f32 = 0.1;

pub const LIGHT: &str = "light";
pub const LABEL: &str = "label";

pub const FLAT_PROGRAM: ProgramId = ProgramId(0);
pub const LIT_PROGRAM: ProgramId = ProgramId(1);
pub const TEXT_PROGRAM: ProgramId = ProgramId(2);

/// Program ids and the shader file stem each is loaded from.
pub const PROGRAMS: [(ProgramId, &str); 3] = [
    (FLAT_PROGRAM, "flat_model"),
    (LIT_PROGRAM, "lit_textured_model"),
    (TEXT_PROGRAM, "text"),
];

pub const HERO_TEXTURE: TextureId = TextureId(0);
pub const GROUND_TEXTURE: TextureId = TextureId(1);

const SPECULAR_STRENGTH: f32 = 0.1;
const AMBIENT_STRENGTH: f32 = 0.5;

#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Physics(#[from] PhysicsError),
    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Handles of the five scene entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entities {
    pub light: EntityId,
    pub hero: EntityId,
    pub ground: EntityId,
    pub enemy: EntityId,
    pub label: EntityId,
}

/// What one frame of simulation did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub steps: u32,
    pub score_changed: bool,
    pub round_lost: bool,
}

/// The game session, its physics world and its scene, stepped together.
pub struct Game {
    session: GameSession,
    physics: PhysicsWorld,
    scene: Scene,
    camera: Camera,
    keys: KeyMap,
    entities: Entities,
}

impl Game {
    pub fn new(config: &SkyhopConfig) -> Result<Self, SetupError> {
        let mut registry = EntityRegistry::new();
        let entities = Entities {
            light: registry.register(LIGHT)?,
            hero: registry.register(HERO)?,
            ground: registry.register(GROUND)?,
            enemy: registry.register(ENEMY)?,
            label: registry.register(LABEL)?,
        };
        let session = GameSession::new(registry, config.rules)?;

        let bodies = &config.bodies;
        let rules = &config.rules;
        let with_surface = |desc: BodyDesc| BodyDesc {
            friction: bodies.friction,
            restitution: bodies.restitution,
            ..desc
        };
        let mut physics = PhysicsWorld::new(config.physics);
        physics.add_body(
            entities.hero,
            with_surface(BodyDesc::new(
                BodyKind::Dynamic {
                    mass: bodies.hero_mass,
                },
                Shape::Ball {
                    radius: bodies.hero_radius,
                },
                rules.hero_spawn,
            )),
        )?;
        physics.add_body(
            entities.ground,
            with_surface(BodyDesc::new(
                BodyKind::Fixed,
                Shape::Cuboid {
                    half_extents: bodies.ground_half_extents,
                },
                bodies.ground_position,
            )),
        )?;
        physics.add_body(
            entities.enemy,
            with_surface(BodyDesc::new(
                BodyKind::Kinematic,
                Shape::Cuboid {
                    half_extents: bodies.enemy_half_extents,
                },
                rules.enemy_spawn,
            ))
            .without_contact_response(),
        )?;

        let assets = &config.assets;
        let mut scene = Scene::new();

        let mut light = Drawable::light_marker(MeshKind::Sphere, assets.light_color);
        light.set_position(assets.light_position);
        light.set_program(FLAT_PROGRAM);
        scene.insert(entities.light, light)?;

        let mesh = |kind, position: Vec3, scale: Vec3, texture| {
            let mut d = Drawable::lit_mesh(kind, SPECULAR_STRENGTH, AMBIENT_STRENGTH);
            d.set_position(position);
            d.set_scale(scale);
            d.set_program(LIT_PROGRAM);
            d.set_texture(texture);
            d
        };
        scene.insert(
            entities.hero,
            mesh(
                MeshKind::Sphere,
                rules.hero_spawn,
                Vec3::splat(bodies.hero_radius),
                HERO_TEXTURE,
            ),
        )?;
        scene.insert(
            entities.ground,
            mesh(
                MeshKind::Cube,
                bodies.ground_position,
                bodies.ground_half_extents,
                GROUND_TEXTURE,
            ),
        )?;
        scene.insert(
            entities.enemy,
            mesh(
                MeshKind::Cube,
                rules.enemy_spawn,
                bodies.enemy_half_extents,
                GROUND_TEXTURE,
            ),
        )?;

        let mut label = Drawable::text(
            session.state().score_label(),
            assets.label_color,
            assets.label_origin,
        );
        label.set_program(TEXT_PROGRAM);
        scene.insert(entities.label, label)?;

        let mut camera = config.camera;
        camera.set_viewport(config.window.width, config.window.height);

        tracing::info!(bodies = physics.body_count(), drawables = scene.len(), "game ready");
        Ok(Self {
            session,
            physics,
            scene,
            camera,
            keys: KeyMap::new(),
            entities,
        })
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn entities(&self) -> Entities {
        self.entities
    }

    /// Feed one key transition. Jumps are applied here; `Quit` is returned for
    /// the caller to act on.
    pub fn handle_key(&mut self, event: KeyEvent) -> Action {
        let action = self.keys.handle(event);
        if action == Action::Jump {
            self.press_jump();
        }
        action
    }

    pub fn press_jump(&mut self) -> JumpOutcome {
        self.session.press_jump(&mut self.physics)
    }

    /// Step physics for a frame of `dt` seconds, running the collision policy
    /// after every internal step, then copy body poses into the scene.
    pub fn advance(&mut self, dt: f32) -> FrameReport {
        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        let mut score_changed = false;
        let mut round_lost = false;
        let session = &mut self.session;
        let scene = &mut self.scene;
        let label = self.entities.label;

        let steps = self.physics.step_simulation(dt, |world, step| {
            let outcome = session.on_tick(world, step);
            round_lost |= outcome.round_lost;
            if outcome.score_changed {
                score_changed = true;
                if let Err(err) = scene.set_text(label, session.state().score_label()) {
                    tracing::warn!(%err, "score label not updated");
                }
            }
        });

        let physics = &self.physics;
        self.scene.sync_poses(|id| physics.pose(id));
        FrameReport {
            steps,
            score_changed,
            round_lost,
        }
    }
}
