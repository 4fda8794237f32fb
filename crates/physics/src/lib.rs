//! Physics World Adapter over the `rapier3d` rigid-body engine.
//!
//! # Invariants
//! - Every body is created for a registered entity; its collider carries the
//!   entity handle as user data, so contact resolution cannot dangle.
//! - The tick callback runs synchronously after each internal fixed step,
//!   before `step_simulation` returns.

mod config;
mod world;

pub use config::PhysicsConfig;
pub use world::{BodyDesc, BodyKind, PhysicsError, PhysicsWorld, Shape};
