//! WGSL programs: headless compile and link through `naga`, then upload as
//! wgpu shader modules.

use crate::error::{scoped, RenderError};
use naga::valid::{Capabilities, ValidationFlags, Validator};
use naga::{Binding, Handle, Module, Type, TypeInner};
use skyhop_render::{ShaderCompiler, ShaderStage};
use std::collections::BTreeSet;

pub const VERTEX_ENTRY: &str = "vs_main";
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// One parsed and validated stage.
#[derive(Debug)]
pub struct CompiledStage {
    stage: ShaderStage,
    source: String,
    module: Module,
}

impl CompiledStage {
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    fn entry_point(&self) -> Option<&naga::EntryPoint> {
        let (wanted, name) = naga_stage(self.stage);
        self.module
            .entry_points
            .iter()
            .find(|ep| ep.stage == wanted && ep.name == name)
    }

    /// `@location`s written by the vertex entry point.
    fn outputs(&self) -> BTreeSet<u32> {
        let mut out = BTreeSet::new();
        if let Some(result) = self.entry_point().and_then(|ep| ep.function.result.as_ref()) {
            collect_locations(&self.module, result.ty, result.binding.as_ref(), &mut out);
        }
        out
    }

    /// `@location`s read by the fragment entry point.
    fn inputs(&self) -> BTreeSet<u32> {
        let mut out = BTreeSet::new();
        if let Some(ep) = self.entry_point() {
            for arg in &ep.function.arguments {
                collect_locations(&self.module, arg.ty, arg.binding.as_ref(), &mut out);
            }
        }
        out
    }
}

/// Vertex and fragment stages whose interfaces agree.
#[derive(Debug)]
pub struct LinkedProgram {
    pub label: String,
    pub vertex: CompiledStage,
    pub fragment: CompiledStage,
}

/// [`ShaderCompiler`] backed by naga's WGSL front end and validator.
#[derive(Debug, Default, Clone, Copy)]
pub struct WgslFrontend;

impl ShaderCompiler for WgslFrontend {
    type Stage = CompiledStage;
    type Program = LinkedProgram;

    fn compile(&self, stage: ShaderStage, source: &str) -> Result<CompiledStage, String> {
        let module = naga::front::wgsl::parse_str(source).map_err(|e| e.emit_to_string(source))?;
        Validator::new(ValidationFlags::all(), Capabilities::all())
            .validate(&module)
            .map_err(|e| e.emit_to_string(source))?;
        let compiled = CompiledStage {
            stage,
            source: source.to_string(),
            module,
        };
        if compiled.entry_point().is_none() {
            let (_, name) = naga_stage(stage);
            return Err(format!("no {stage} entry point named `{name}`"));
        }
        Ok(compiled)
    }

    fn link(
        &self,
        label: &str,
        vertex: CompiledStage,
        fragment: CompiledStage,
    ) -> Result<LinkedProgram, String> {
        let written = vertex.outputs();
        let missing: Vec<String> = fragment
            .inputs()
            .difference(&written)
            .map(|loc| format!("@location({loc})"))
            .collect();
        if !missing.is_empty() {
            return Err(format!(
                "fragment inputs {} are not written by the vertex stage",
                missing.join(", ")
            ));
        }
        Ok(LinkedProgram {
            label: label.to_string(),
            vertex,
            fragment,
        })
    }
}

fn naga_stage(stage: ShaderStage) -> (naga::ShaderStage, &'static str) {
    match stage {
        ShaderStage::Vertex => (naga::ShaderStage::Vertex, VERTEX_ENTRY),
        ShaderStage::Fragment => (naga::ShaderStage::Fragment, FRAGMENT_ENTRY),
    }
}

fn collect_locations(
    module: &Module,
    ty: Handle<Type>,
    binding: Option<&Binding>,
    out: &mut BTreeSet<u32>,
) {
    match binding {
        Some(Binding::Location { location, .. }) => {
            out.insert(*location);
        }
        Some(Binding::BuiltIn(_)) => {}
        None => {
            if let TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for member in members {
                    collect_locations(module, member.ty, member.binding.as_ref(), out);
                }
            }
        }
    }
}

/// A linked program on the GPU. Several drawables may share one.
#[derive(Debug)]
pub struct GpuProgram {
    label: String,
    vertex: wgpu::ShaderModule,
    fragment: wgpu::ShaderModule,
}

impl GpuProgram {
    pub fn upload(device: &wgpu::Device, linked: &LinkedProgram) -> Result<Self, RenderError> {
        let module = |stage: &CompiledStage| {
            let label = format!("{}.{}", linked.label, stage.stage);
            scoped(device, format!("shader module {label}"), || {
                device.create_shader_module(wgpu::ShaderModuleDescriptor {
                    label: Some(&label),
                    source: wgpu::ShaderSource::Wgsl(stage.source.as_str().into()),
                })
            })
        };
        let vertex = module(&linked.vertex)?;
        let fragment = module(&linked.fragment)?;
        tracing::debug!(program = %linked.label, "program uploaded");
        Ok(Self {
            label: linked.label.clone(),
            vertex,
            fragment,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub(crate) fn vertex(&self) -> &wgpu::ShaderModule {
        &self.vertex
    }

    pub(crate) fn fragment(&self) -> &wgpu::ShaderModule {
        &self.fragment
    }
}
