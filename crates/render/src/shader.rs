//! Shader program building, independent of the GPU backend.
//!
//! Reading the source files is fatal on failure ([`AssetError`]); compiling
//! and linking are recoverable ([`ShaderError`]) and leave the program unset.

use crate::asset::{self, AssetError};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex => f.write_str("vertex"),
            Self::Fragment => f.write_str("fragment"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShaderError {
    #[error("{stage} stage failed to compile:\n{diagnostic}")]
    Compile {
        stage: ShaderStage,
        diagnostic: String,
    },
    #[error("program failed to link:\n{diagnostic}")]
    Link { diagnostic: String },
}

impl ShaderError {
    pub fn diagnostic(&self) -> &str {
        match self {
            Self::Compile { diagnostic, .. } | Self::Link { diagnostic } => diagnostic,
        }
    }
}

/// Vertex and fragment source text of one program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramSource {
    pub label: String,
    pub vertex: String,
    pub fragment: String,
}

impl ProgramSource {
    pub fn new(
        label: impl Into<String>,
        vertex: impl Into<String>,
        fragment: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }

    pub fn load(
        label: impl Into<String>,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<Self, AssetError> {
        Ok(Self {
            label: label.into(),
            vertex: asset::read_text(vertex_path)?,
            fragment: asset::read_text(fragment_path)?,
        })
    }

    /// Load `<dir>/<name>.vs.wgsl` and `<dir>/<name>.fs.wgsl`.
    pub fn from_dir(dir: impl AsRef<Path>, name: &str) -> Result<Self, AssetError> {
        let dir = dir.as_ref();
        Self::load(
            name,
            dir.join(format!("{name}{VERTEX_SUFFIX}")),
            dir.join(format!("{name}{FRAGMENT_SUFFIX}")),
        )
    }

    /// Names of every program in `dir` that has a vertex stage file, sorted.
    pub fn names_in(dir: impl AsRef<Path>) -> Result<Vec<String>, AssetError> {
        let dir = dir.as_ref();
        let read_err = |source| AssetError::Read {
            path: dir.to_path_buf(),
            source,
        };
        let mut names = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(read_err)? {
            let file_name = entry.map_err(read_err)?.file_name();
            if let Some(name) = file_name.to_str().and_then(|f| f.strip_suffix(VERTEX_SUFFIX)) {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

const VERTEX_SUFFIX: &str = ".vs.wgsl";
const FRAGMENT_SUFFIX: &str = ".fs.wgsl";

/// A backend that turns source text into stage objects and links them.
///
/// Stage objects are moved into [`ShaderCompiler::link`], so they are dropped
/// (released) after linking whether it succeeds or not, and dropped right away
/// if the other stage fails to compile.
pub trait ShaderCompiler {
    type Stage;
    type Program;

    fn compile(&self, stage: ShaderStage, source: &str) -> Result<Self::Stage, String>;

    fn link(
        &self,
        label: &str,
        vertex: Self::Stage,
        fragment: Self::Stage,
    ) -> Result<Self::Program, String>;
}

/// Compile both stages and link them. Failures are logged and returned; the
/// process carries on.
pub fn compile_and_link<C: ShaderCompiler>(
    compiler: &C,
    source: &ProgramSource,
) -> Result<C::Program, ShaderError> {
    let result = compile_stages(compiler, source).and_then(|(vertex, fragment)| {
        compiler
            .link(&source.label, vertex, fragment)
            .map_err(|diagnostic| ShaderError::Link { diagnostic })
    });
    match &result {
        Ok(_) => tracing::debug!(program = %source.label, "shader program linked"),
        Err(err) => tracing::error!(program = %source.label, "{err}"),
    }
    result
}

fn compile_stages<C: ShaderCompiler>(
    compiler: &C,
    source: &ProgramSource,
) -> Result<(C::Stage, C::Stage), ShaderError> {
    let compile = |stage, text: &str| {
        compiler
            .compile(stage, text)
            .map_err(|diagnostic| ShaderError::Compile { stage, diagnostic })
    };
    let vertex = compile(ShaderStage::Vertex, &source.vertex)?;
    let fragment = compile(ShaderStage::Fragment, &source.fragment)?;
    Ok((vertex, fragment))
}
