//! Game kernel: entity registry, game state and the collision policy that runs
//! inside every physics tick.
//!
//! # Invariants
//! - Score, grounded and game-over flags change only through [`GameSession`].
//! - `grounded` reflects the most recent tick only; it is cleared at the start
//!   of every tick before contacts are examined.
//! - Every physics body maps back to a registered entity by [`EntityId`].

pub mod events;
pub mod physics_view;
pub mod registry;
pub mod rules;
pub mod session;
pub mod state;

pub use events::GameEvent;
pub use physics_view::{ContactManifold, PhysicsView};
pub use registry::{EntityRegistry, RegistryError, ENEMY, GROUND, HERO};
pub use rules::GameRules;
pub use session::{GameSession, JumpOutcome, SessionError, TickOutcome};
pub use state::GameState;
