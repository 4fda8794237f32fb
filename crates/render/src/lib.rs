//! Rendering Adapter: renderer-agnostic scene description.
//!
//! Everything here is plain data and math; a GPU backend uploads it.
//!
//! # Invariants
//! - Renderers never mutate game state; poses flow in from physics.
//! - Draw order is fixed per frame: light markers, then lit meshes, then
//!   screen text last because it blends over opaque geometry.
//! - Mesh data is generated once per drawable and never re-uploaded.

pub mod asset;
pub mod camera;
pub mod drawable;
pub mod geometry;
mod renderer;
pub mod scene;
pub mod shader;
pub mod text;

pub use asset::AssetError;
pub use camera::Camera;
pub use drawable::{
    BlendMode, DepthMode, Drawable, DrawableKind, LightSource, Material, PipelineConfig,
    ProgramId, TextureId, UniformSet, VertexLayout,
};
pub use geometry::{MeshData, MeshKind, Vertex};
pub use renderer::{DebugTextRenderer, Renderer};
pub use scene::{Scene, SceneError};
pub use shader::{compile_and_link, ProgramSource, ShaderCompiler, ShaderError, ShaderStage};
pub use text::{FontError, Glyph, GlyphQuad, GlyphTable};
