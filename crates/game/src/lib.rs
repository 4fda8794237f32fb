//! Game assembly shared by the desktop app and the headless CLI.
//!
//! Builds the entity registry, rigid bodies and drawables from a
//! [`SkyhopConfig`], then advances them one frame at a time.
//!
//! # Invariants
//! - Every drawable and every body is keyed by an entity from the registry.
//! - The score label is rewritten inside the same physics tick that changed
//!   the score.
//! - Scene poses are copied from physics after stepping, never the reverse.

mod config;
mod game;

pub use config::{AssetConfig, BodyConfig, ConfigError, SkyhopConfig, WindowConfig};
pub use game::{
    Entities, FrameReport, Game, SetupError, FLAT_PROGRAM, GROUND_TEXTURE, HERO_TEXTURE, LABEL,
    LIGHT, LIT_PROGRAM, MAX_FRAME_DT, PROGRAMS, TEXT_PROGRAM,
};
