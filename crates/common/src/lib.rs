//! Shared types used across the skyhop crates.

mod types;

pub use types::{EntityId, Transform};
