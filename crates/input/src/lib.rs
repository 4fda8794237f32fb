//! Input mapping: raw key events become game actions.
//!
//! # Invariants
//! - The game consumes [`Action`]s, never raw key events.
//! - One physical press yields at most one action; OS auto-repeat is filtered.

pub mod action;

pub use action::{Action, Key, KeyEvent, KeyMap};
