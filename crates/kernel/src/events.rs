use serde::{Deserialize, Serialize};
use skyhop_common::EntityId;

/// A record of every game-state transition made by the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Space was pressed while no round was running.
    RoundStarted,
    /// The enemy crossed the boundary and was sent back to its spawn.
    EnemyRecycled { score: u32 },
    /// The hero hit the enemy. Carries the score the round ended with.
    RoundLost { final_score: u32 },
    /// A grounded jump applied the jump impulse.
    Jumped,
    /// A touching manifold between two named entities was classified.
    Collision { a: EntityId, b: EntityId },
}
