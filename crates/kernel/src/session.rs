use crate::events::GameEvent;
use crate::physics_view::PhysicsView;
use crate::registry::{EntityRegistry, ENEMY, GROUND, HERO};
use crate::rules::GameRules;
use crate::state::GameState;
use skyhop_common::EntityId;

/// Errors from building a session.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("required entity {0:?} is not registered")]
    MissingEntity(&'static str),
}

/// What a tick changed, so the caller can refresh dependent views in the same
/// callback invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// The score (and therefore the score label) changed.
    pub score_changed: bool,
    /// The hero hit the enemy during this tick.
    pub round_lost: bool,
}

/// Result of a jump key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpOutcome {
    /// No round was running; one has started.
    Started,
    /// The hero was grounded and the jump impulse was applied.
    Jumped,
    /// The hero is airborne. No double jumps.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContactKind {
    HeroEnemy,
    HeroGround,
}

/// Owns the game state and applies the collision policy.
///
/// The physics adapter calls [`GameSession::on_tick`] once per internal
/// simulation step; keyboard input calls [`GameSession::press_jump`]. Nothing
/// else mutates [`GameState`].
#[derive(Debug, Clone)]
pub struct GameSession {
    registry: EntityRegistry,
    rules: GameRules,
    state: GameState,
    hero: EntityId,
    enemy: EntityId,
    event_log: Vec<GameEvent>,
}

impl GameSession {
    /// Build a session over a registry that contains the hero, enemy and
    /// ground entities.
    pub fn new(registry: EntityRegistry, rules: GameRules) -> Result<Self, SessionError> {
        let hero = registry.find(HERO).ok_or(SessionError::MissingEntity(HERO))?;
        let enemy = registry.find(ENEMY).ok_or(SessionError::MissingEntity(ENEMY))?;
        registry
            .find(GROUND)
            .ok_or(SessionError::MissingEntity(GROUND))?;
        Ok(Self {
            registry,
            rules,
            state: GameState::default(),
            hero,
            enemy,
            event_log: Vec::new(),
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn hero(&self) -> EntityId {
        self.hero
    }

    pub fn enemy(&self) -> EntityId {
        self.enemy
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[GameEvent] {
        &self.event_log
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Per-step physics callback.
    ///
    /// Advances the enemy while a round is running, then re-derives
    /// `grounded` and handles hero/enemy hits from this step's manifolds.
    pub fn on_tick(&mut self, physics: &mut impl PhysicsView, dt: f32) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        if self.state.is_running() {
            self.advance_enemy(physics, dt, &mut outcome);
        }

        self.state.grounded = false;

        for manifold in physics.contact_manifolds() {
            if !manifold.is_touching() {
                continue;
            }
            let Some(kind) = self.classify(manifold.a, manifold.b) else {
                continue;
            };
            tracing::debug!(
                a = self.registry.name(manifold.a).unwrap_or("?"),
                b = self.registry.name(manifold.b).unwrap_or("?"),
                "collision"
            );
            self.event_log.push(GameEvent::Collision {
                a: manifold.a,
                b: manifold.b,
            });
            match kind {
                ContactKind::HeroEnemy => self.lose_round(physics, &mut outcome),
                ContactKind::HeroGround => self.state.grounded = true,
            }
        }

        outcome
    }

    /// Handle a discrete jump key press.
    pub fn press_jump(&mut self, physics: &mut impl PhysicsView) -> JumpOutcome {
        if self.state.game_over {
            self.state.game_over = false;
            self.event_log.push(GameEvent::RoundStarted);
            tracing::info!("round started");
            return JumpOutcome::Started;
        }
        if !self.state.grounded {
            return JumpOutcome::Ignored;
        }
        self.state.grounded = false;
        physics.apply_impulse(self.hero, self.rules.jump_impulse);
        self.event_log.push(GameEvent::Jumped);
        tracing::debug!("jump");
        JumpOutcome::Jumped
    }

    fn advance_enemy(&mut self, physics: &mut impl PhysicsView, dt: f32, outcome: &mut TickOutcome) {
        let Some(position) = physics.position(self.enemy) else {
            tracing::warn!(enemy = %self.enemy, "enemy has no physics body");
            return;
        };
        let mut next = position + self.rules.enemy_velocity() * dt;
        if next.x <= self.rules.boundary_x {
            next = self.rules.enemy_spawn;
            self.state.score += 1;
            outcome.score_changed = true;
            self.event_log.push(GameEvent::EnemyRecycled {
                score: self.state.score,
            });
            tracing::info!(score = self.state.score, "enemy cleared");
        }
        physics.set_position(self.enemy, next);
    }

    fn lose_round(&mut self, physics: &mut impl PhysicsView, outcome: &mut TickOutcome) {
        physics.set_position(self.enemy, self.rules.enemy_spawn);
        physics.reset_body(self.hero, self.rules.hero_spawn);
        let final_score = self.state.score;
        self.state.game_over = true;
        self.state.score = 0;
        outcome.score_changed = true;
        outcome.round_lost = true;
        self.event_log.push(GameEvent::RoundLost { final_score });
        tracing::info!(final_score, "round lost");
    }

    fn classify(&self, a: EntityId, b: EntityId) -> Option<ContactKind> {
        let name_a = self.registry.name(a)?;
        let name_b = self.registry.name(b)?;
        match (name_a, name_b) {
            (HERO, ENEMY) | (ENEMY, HERO) => Some(ContactKind::HeroEnemy),
            (HERO, GROUND) | (GROUND, HERO) => Some(ContactKind::HeroGround),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics_view::ContactManifold;
    use glam::Vec3;
    use std::collections::BTreeMap;

    /// Scripted physics world: positions are plain values and the manifold
    /// list is whatever the test puts there.
    #[derive(Default)]
    struct ScriptedPhysics {
        positions: BTreeMap<EntityId, Vec3>,
        manifolds: Vec<ContactManifold>,
        impulses: Vec<(EntityId, Vec3)>,
        resets: Vec<EntityId>,
    }

    impl PhysicsView for ScriptedPhysics {
        fn contact_manifolds(&self) -> Vec<ContactManifold> {
            self.manifolds.clone()
        }

        fn position(&self, entity: EntityId) -> Option<Vec3> {
            self.positions.get(&entity).copied()
        }

        fn set_position(&mut self, entity: EntityId, position: Vec3) -> bool {
            self.positions.insert(entity, position).is_some()
        }

        fn reset_body(&mut self, entity: EntityId, position: Vec3) -> bool {
            self.resets.push(entity);
            self.set_position(entity, position)
        }

        fn apply_impulse(&mut self, entity: EntityId, impulse: Vec3) -> bool {
            self.impulses.push((entity, impulse));
            true
        }
    }

    struct Fixture {
        session: GameSession,
        physics: ScriptedPhysics,
        hero: EntityId,
        enemy: EntityId,
        ground: EntityId,
    }

    fn fixture() -> Fixture {
        let mut registry = EntityRegistry::new();
        let hero = registry.register(HERO).unwrap();
        let ground = registry.register(GROUND).unwrap();
        let enemy = registry.register(ENEMY).unwrap();
        let rules = GameRules::default();
        let mut physics = ScriptedPhysics::default();
        physics.positions.insert(hero, rules.hero_spawn);
        physics.positions.insert(ground, Vec3::new(0.0, -1.0, 0.0));
        physics.positions.insert(enemy, rules.enemy_spawn);
        Fixture {
            session: GameSession::new(registry, rules).unwrap(),
            physics,
            hero,
            enemy,
            ground,
        }
    }

    fn touching(a: EntityId, b: EntityId) -> ContactManifold {
        ContactManifold {
            a,
            b,
            contact_count: 1,
        }
    }

    fn start_round(f: &mut Fixture) {
        assert_eq!(f.session.press_jump(&mut f.physics), JumpOutcome::Started);
    }

    #[test]
    fn missing_roles_are_reported() {
        let mut registry = EntityRegistry::new();
        registry.register(HERO).unwrap();
        let err = GameSession::new(registry, GameRules::default()).unwrap_err();
        assert_eq!(err, SessionError::MissingEntity(ENEMY));
    }

    #[test]
    fn hero_enemy_contact_ends_round_in_either_order() {
        for swap in [false, true] {
            let mut f = fixture();
            start_round(&mut f);
            f.physics.positions.insert(f.enemy, Vec3::new(0.5, 1.0, 0.0));
            f.session.state.score = 4;
            f.physics.manifolds = if swap {
                vec![touching(f.enemy, f.hero)]
            } else {
                vec![touching(f.hero, f.enemy)]
            };

            let outcome = f.session.on_tick(&mut f.physics, 1.0 / 60.0);

            assert!(f.session.state().game_over);
            assert_eq!(f.session.state().score, 0);
            assert_eq!(
                f.physics.position(f.enemy),
                Some(f.session.rules().enemy_spawn)
            );
            assert!(outcome.score_changed);
            assert!(outcome.round_lost);
            assert!(f.session.events().contains(&GameEvent::RoundLost { final_score: 4 }));
        }
    }

    #[test]
    fn round_loss_returns_hero_to_spawn() {
        let mut f = fixture();
        start_round(&mut f);
        f.physics.positions.insert(f.hero, Vec3::new(0.0, 3.0, 0.0));
        f.physics.manifolds = vec![touching(f.hero, f.enemy)];
        f.session.on_tick(&mut f.physics, 1.0 / 60.0);
        assert_eq!(f.physics.resets, vec![f.hero]);
        assert_eq!(f.physics.position(f.hero), Some(f.session.rules().hero_spawn));
    }

    #[test]
    fn hero_ground_contact_sets_grounded_and_it_is_not_sticky() {
        let mut f = fixture();
        f.physics.manifolds = vec![touching(f.ground, f.hero)];
        f.session.on_tick(&mut f.physics, 1.0 / 60.0);
        assert!(f.session.state().grounded);

        f.physics.manifolds.clear();
        f.session.on_tick(&mut f.physics, 1.0 / 60.0);
        assert!(!f.session.state().grounded);
    }

    #[test]
    fn manifolds_without_points_are_ignored() {
        let mut f = fixture();
        f.physics.manifolds = vec![ContactManifold {
            a: f.hero,
            b: f.ground,
            contact_count: 0,
        }];
        f.session.on_tick(&mut f.physics, 1.0 / 60.0);
        assert!(!f.session.state().grounded);
        assert!(f.session.events().is_empty());
    }

    #[test]
    fn unrelated_pairs_are_ignored() {
        let mut f = fixture();
        start_round(&mut f);
        f.physics.manifolds = vec![touching(f.enemy, f.ground)];
        let outcome = f.session.on_tick(&mut f.physics, 0.0);
        assert!(!outcome.round_lost);
        assert!(f.session.state().is_running());
    }

    #[test]
    fn enemy_advances_by_speed_times_dt() {
        let mut f = fixture();
        start_round(&mut f);
        let dt = 0.1;
        let before = f.physics.position(f.enemy).unwrap();
        let outcome = f.session.on_tick(&mut f.physics, dt);
        let after = f.physics.position(f.enemy).unwrap();
        assert!((before.x - after.x - 15.0 * dt).abs() < 1e-5);
        assert_eq!(before.y, after.y);
        assert!(!outcome.score_changed);
    }

    #[test]
    fn enemy_does_not_move_before_the_round_starts() {
        let mut f = fixture();
        let before = f.physics.position(f.enemy);
        f.session.on_tick(&mut f.physics, 0.5);
        assert_eq!(f.physics.position(f.enemy), before);
    }

    #[test]
    fn crossing_the_boundary_recycles_enemy_and_scores_once() {
        let mut f = fixture();
        start_round(&mut f);
        f.physics.positions.insert(f.enemy, Vec3::new(-17.9, 1.0, 0.0));

        let outcome = f.session.on_tick(&mut f.physics, 0.1);

        assert_eq!(f.session.state().score, 1);
        assert!(outcome.score_changed);
        assert_eq!(
            f.physics.position(f.enemy),
            Some(f.session.rules().enemy_spawn)
        );
        assert_eq!(f.session.state().score_label(), "Score: 1");

        f.session.on_tick(&mut f.physics, 0.1);
        assert_eq!(f.session.state().score, 1);
    }

    #[test]
    fn grounded_jump_applies_impulse_once() {
        let mut f = fixture();
        start_round(&mut f);
        f.physics.manifolds = vec![touching(f.hero, f.ground)];
        f.session.on_tick(&mut f.physics, 1.0 / 60.0);
        assert!(f.session.state().grounded);

        assert_eq!(f.session.press_jump(&mut f.physics), JumpOutcome::Jumped);
        assert!(!f.session.state().grounded);
        assert_eq!(f.session.press_jump(&mut f.physics), JumpOutcome::Ignored);

        assert_eq!(
            f.physics.impulses,
            vec![(f.hero, Vec3::new(0.0, 100.0, 0.0))]
        );
    }

    #[test]
    fn airborne_press_is_ignored() {
        let mut f = fixture();
        start_round(&mut f);
        assert_eq!(f.session.press_jump(&mut f.physics), JumpOutcome::Ignored);
        assert!(f.physics.impulses.is_empty());
    }

    #[test]
    fn press_after_game_over_restarts_without_jumping() {
        let mut f = fixture();
        start_round(&mut f);
        f.physics.manifolds = vec![touching(f.hero, f.enemy), touching(f.hero, f.ground)];
        f.session.on_tick(&mut f.physics, 1.0 / 60.0);
        assert!(f.session.state().game_over);
        assert!(f.session.state().grounded);

        assert_eq!(f.session.press_jump(&mut f.physics), JumpOutcome::Started);
        assert!(f.session.state().is_running());
        assert!(f.physics.impulses.is_empty());
    }

    #[test]
    fn drain_events_clears_log() {
        let mut f = fixture();
        start_round(&mut f);
        let events = f.session.drain_events();
        assert_eq!(events, vec![GameEvent::RoundStarted]);
        assert!(f.session.events().is_empty());
    }
}
