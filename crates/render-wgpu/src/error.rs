use crate::texture::TextureError;
use skyhop_render::{AssetError, FontError, ShaderError};

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// A GPU object could not be created. Captured through wgpu error scopes.
    #[error("failed to create {what}: {message}")]
    Creation { what: String, message: String },
    #[error(transparent)]
    Texture(#[from] TextureError),
    #[error(transparent)]
    Shader(#[from] ShaderError),
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error(transparent)]
    Font(#[from] FontError),
}

/// Run `create` inside validation and out-of-memory error scopes and turn any
/// captured error into [`RenderError::Creation`].
pub(crate) fn scoped<T>(
    device: &wgpu::Device,
    what: impl Into<String>,
    create: impl FnOnce() -> T,
) -> Result<T, RenderError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
    let value = create();
    let out_of_memory = pollster::block_on(device.pop_error_scope());
    let validation = pollster::block_on(device.pop_error_scope());
    match out_of_memory.or(validation) {
        None => Ok(value),
        Some(err) => Err(RenderError::Creation {
            what: what.into(),
            message: err.to_string(),
        }),
    }
}
