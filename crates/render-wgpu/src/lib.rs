//! wgpu render backend for skyhop scenes.
//!
//! Compiles WGSL programs headlessly with naga, uploads them as shader
//! modules and draws a [`skyhop_render::Scene`] one drawable at a time.
//!
//! # Invariants
//! - The renderer never mutates the scene or game state.
//! - Every GPU object is created inside an error scope; failures surface as
//!   [`RenderError::Creation`] instead of leaving unusable handles.
//! - Buffers and textures are destroyed when their owner drops.
//! - Text pipelines blend and skip depth writes, so text is drawn last.

mod error;
mod gpu;
mod shaders;
mod texture;

pub use error::RenderError;
pub use gpu::{WgpuRenderer, MAX_TEXT_GLYPHS};
pub use shaders::{
    CompiledStage, GpuProgram, LinkedProgram, WgslFrontend, FRAGMENT_ENTRY, VERTEX_ENTRY,
};
pub use texture::{checkerboard, decode_rgba, GpuTexture, TextureError};
