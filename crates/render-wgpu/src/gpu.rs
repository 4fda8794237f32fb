use crate::error::{scoped, RenderError};
use crate::shaders::GpuProgram;
use crate::texture::GpuTexture;
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use skyhop_common::EntityId;
use skyhop_render::{
    BlendMode, Camera, DepthMode, Drawable, DrawableKind, GlyphTable, Material, MeshData,
    PipelineConfig, ProgramId, Scene, TextureId, UniformSet, VertexLayout,
};
use std::collections::{BTreeMap, HashMap};
use wgpu::util::DeviceExt;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Longest string a text drawable can show.
pub const MAX_TEXT_GLYPHS: usize = 128;

const POSITION_COLOR_ATTRS: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];
const POSITION_TEX_NORMAL_ATTRS: [wgpu::VertexAttribute; 3] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2, 2 => Float32x3];
const SCREEN_QUAD_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x4];

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct LightUniforms {
    model: [[f32; 4]; 4],
    view: [[f32; 4]; 4],
    projection: [[f32; 4]; 4],
    color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct LitUniforms {
    view_proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    camera_position: [f32; 4],
    light_position: [f32; 4],
    light_color: [f32; 4],
    /// x: specular strength, y: ambient strength.
    material: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct TextUniforms {
    projection: [[f32; 4]; 4],
    color: [f32; 4],
}

fn vec4(v: Vec3, w: f32) -> [f32; 4] {
    v.extend(w).to_array()
}

fn cols(m: Mat4) -> [[f32; 4]; 4] {
    m.to_cols_array_2d()
}

pub(crate) fn uniform_size(kind: DrawableKind) -> u64 {
    let size = match kind {
        DrawableKind::LightMarker => std::mem::size_of::<LightUniforms>(),
        DrawableKind::LitMesh => std::mem::size_of::<LitUniforms>(),
        DrawableKind::ScreenText => std::mem::size_of::<TextUniforms>(),
    };
    size as u64
}

pub(crate) fn uniform_bytes(set: &UniformSet) -> Vec<u8> {
    match *set {
        UniformSet::Light {
            model,
            view,
            projection,
            color,
        } => bytemuck::bytes_of(&LightUniforms {
            model: cols(model),
            view: cols(view),
            projection: cols(projection),
            color: vec4(color, 1.0),
        })
        .to_vec(),
        UniformSet::Lit {
            view_projection,
            model,
            camera_position,
            light_position,
            light_color,
            specular_strength,
            ambient_strength,
        } => bytemuck::bytes_of(&LitUniforms {
            view_proj: cols(view_projection),
            model: cols(model),
            camera_position: vec4(camera_position, 1.0),
            light_position: vec4(light_position, 1.0),
            light_color: vec4(light_color, 1.0),
            material: [specular_strength, ambient_strength, 0.0, 0.0],
        })
        .to_vec(),
        UniformSet::Text { projection, color } => bytemuck::bytes_of(&TextUniforms {
            projection: cols(projection),
            color: vec4(color, 1.0),
        })
        .to_vec(),
    }
}

pub(crate) fn floats_per_vertex(layout: VertexLayout) -> usize {
    match layout {
        VertexLayout::PositionColor => 6,
        VertexLayout::PositionTexNormal => 8,
        VertexLayout::ScreenQuad => 4,
    }
}

pub(crate) fn vertex_buffer_layout(layout: VertexLayout) -> wgpu::VertexBufferLayout<'static> {
    let attributes: &'static [wgpu::VertexAttribute] = match layout {
        VertexLayout::PositionColor => &POSITION_COLOR_ATTRS,
        VertexLayout::PositionTexNormal => &POSITION_TEX_NORMAL_ATTRS,
        VertexLayout::ScreenQuad => &SCREEN_QUAD_ATTRS,
    };
    wgpu::VertexBufferLayout {
        array_stride: (floats_per_vertex(layout) * std::mem::size_of::<f32>()) as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes,
    }
}

/// Interleave the attributes `layout` reads.
pub(crate) fn pack_vertices(mesh: &MeshData, layout: VertexLayout) -> Vec<f32> {
    let mut out = Vec::with_capacity(mesh.vertices.len() * floats_per_vertex(layout));
    for v in &mesh.vertices {
        match layout {
            VertexLayout::PositionColor => {
                out.extend_from_slice(&v.position.to_array());
                out.extend_from_slice(&v.color.to_array());
            }
            VertexLayout::PositionTexNormal => {
                out.extend_from_slice(&v.position.to_array());
                out.extend_from_slice(&v.tex_coords.to_array());
                out.extend_from_slice(&v.normal.to_array());
            }
            VertexLayout::ScreenQuad => {}
        }
    }
    out
}

pub(crate) fn blend_state(mode: BlendMode) -> wgpu::BlendState {
    match mode {
        BlendMode::Replace => wgpu::BlendState::REPLACE,
        BlendMode::Alpha => wgpu::BlendState::ALPHA_BLENDING,
    }
}

pub(crate) fn depth_state(mode: DepthMode) -> wgpu::DepthStencilState {
    let (depth_write_enabled, depth_compare) = match mode {
        DepthMode::Test => (true, wgpu::CompareFunction::Less),
        DepthMode::Overlay => (false, wgpu::CompareFunction::Always),
    };
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled,
        depth_compare,
        stencil: Default::default(),
        bias: Default::default(),
    }
}

fn uses_texture(kind: DrawableKind) -> bool {
    !matches!(kind, DrawableKind::LightMarker)
}

enum GpuGeometry {
    Indexed {
        vertex_buffer: wgpu::Buffer,
        index_buffer: wgpu::Buffer,
        index_count: u32,
        texture_bind_group: Option<wgpu::BindGroup>,
    },
    Glyphs {
        vertex_buffer: wgpu::Buffer,
    },
}

/// GPU side of one drawable: uniform buffer and bind group plus its mesh
/// buffers, uploaded once. Buffers are destroyed on drop.
struct GpuDrawable {
    kind: DrawableKind,
    program: ProgramId,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    geometry: GpuGeometry,
}

impl Drop for GpuDrawable {
    fn drop(&mut self) {
        self.uniform_buffer.destroy();
        match &self.geometry {
            GpuGeometry::Indexed {
                vertex_buffer,
                index_buffer,
                ..
            } => {
                vertex_buffer.destroy();
                index_buffer.destroy();
            }
            GpuGeometry::Glyphs { vertex_buffer } => vertex_buffer.destroy(),
        }
    }
}

struct GlyphAtlas {
    table: GlyphTable,
    bind_groups: BTreeMap<char, wgpu::BindGroup>,
    // Kept alive for the bind groups.
    _textures: Vec<GpuTexture>,
}

/// Draws a [`Scene`] with one pipeline per (program, drawable kind).
///
/// Field order matters: drawables are dropped before the textures their bind
/// groups reference.
pub struct WgpuRenderer {
    drawables: BTreeMap<EntityId, GpuDrawable>,
    glyphs: Option<GlyphAtlas>,
    pipelines: HashMap<(ProgramId, DrawableKind), wgpu::RenderPipeline>,
    programs: BTreeMap<ProgramId, GpuProgram>,
    textures: BTreeMap<TextureId, GpuTexture>,
    fallback_texture: GpuTexture,
    uniform_layout: wgpu::BindGroupLayout,
    texture_layout: wgpu::BindGroupLayout,
    depth_texture: wgpu::TextureView,
    surface_format: wgpu::TextureFormat,
}

impl WgpuRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Result<Self, RenderError> {
        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        Ok(Self {
            drawables: BTreeMap::new(),
            glyphs: None,
            pipelines: HashMap::new(),
            programs: BTreeMap::new(),
            textures: BTreeMap::new(),
            fallback_texture: GpuTexture::fallback(device, queue)?,
            uniform_layout,
            texture_layout,
            depth_texture: Self::create_depth_texture(device, width, height),
            surface_format,
        })
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    pub fn add_program(&mut self, id: ProgramId, program: GpuProgram) {
        tracing::debug!(?id, label = program.label(), "program registered");
        self.programs.insert(id, program);
    }

    pub fn add_texture(&mut self, id: TextureId, texture: GpuTexture) {
        self.textures.insert(id, texture);
    }

    /// Upload one coverage texture per non-blank glyph.
    pub fn set_glyphs(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        table: GlyphTable,
    ) -> Result<(), RenderError> {
        let mut textures = Vec::new();
        let mut bind_groups = BTreeMap::new();
        for (ch, glyph) in table.iter() {
            if glyph.is_blank() {
                continue;
            }
            let texture = GpuTexture::glyph(
                device,
                queue,
                &format!("glyph {:#04x}", ch as u32),
                (glyph.size.x, glyph.size.y),
                &glyph.bitmap,
            )?;
            bind_groups.insert(ch, self.texture_bind_group(device, &texture));
            textures.push(texture);
        }
        tracing::debug!(count = textures.len(), "glyph textures uploaded");
        self.glyphs = Some(GlyphAtlas {
            table,
            bind_groups,
            _textures: textures,
        });
        Ok(())
    }

    fn texture_bind_group(&self, device: &wgpu::Device, texture: &GpuTexture) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("texture_bind_group"),
            layout: &self.texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(texture.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(texture.sampler()),
                },
            ],
        })
    }

    /// Upload GPU state for drawables seen for the first time and release it
    /// for entities that left the scene. Drawables without a program stay
    /// undrawn.
    pub fn prepare(&mut self, device: &wgpu::Device, scene: &Scene) -> Result<(), RenderError> {
        self.drawables.retain(|id, _| scene.get(*id).is_some());
        for (id, drawable) in scene.iter() {
            if self.drawables.contains_key(&id) {
                continue;
            }
            let Some(program) = drawable.program() else {
                continue;
            };
            if !self.programs.contains_key(&program) {
                tracing::warn!(%id, ?program, "drawable references an unloaded program");
                continue;
            }
            let kind = drawable.kind();
            if !self.pipelines.contains_key(&(program, kind)) {
                let pipeline = self.create_pipeline(device, program, kind)?;
                self.pipelines.insert((program, kind), pipeline);
            }
            let gpu = scoped(device, format!("drawable {id}"), || {
                self.create_drawable(device, drawable, program)
            })?;
            self.drawables.insert(id, gpu);
        }
        Ok(())
    }

    fn create_pipeline(
        &self,
        device: &wgpu::Device,
        program_id: ProgramId,
        kind: DrawableKind,
    ) -> Result<wgpu::RenderPipeline, RenderError> {
        let program = &self.programs[&program_id];
        let config: PipelineConfig = kind.pipeline();
        let label = format!("{}_{kind:?}", program.label());
        let mut layouts = vec![&self.uniform_layout];
        if uses_texture(kind) {
            layouts.push(&self.texture_layout);
        }

        scoped(device, format!("pipeline {label}"), || {
            let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(&label),
                bind_group_layouts: &layouts,
                push_constant_ranges: &[],
            });
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(&label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: program.vertex(),
                    entry_point: Some(crate::shaders::VERTEX_ENTRY),
                    compilation_options: Default::default(),
                    buffers: &[vertex_buffer_layout(config.layout)],
                },
                fragment: Some(wgpu::FragmentState {
                    module: program.fragment(),
                    entry_point: Some(crate::shaders::FRAGMENT_ENTRY),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: self.surface_format,
                        blend: Some(blend_state(config.blend)),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    cull_mode: config.cull_back_faces.then_some(wgpu::Face::Back),
                    ..Default::default()
                },
                depth_stencil: Some(depth_state(config.depth)),
                multisample: Default::default(),
                multiview: None,
                cache: None,
            })
        })
    }

    fn create_drawable(
        &self,
        device: &wgpu::Device,
        drawable: &Drawable,
        program: ProgramId,
    ) -> GpuDrawable {
        let kind = drawable.kind();
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("uniform_buffer"),
            size: uniform_size(kind),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uniform_bind_group"),
            layout: &self.uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let geometry = match drawable.mesh() {
            Some(mesh_kind) => {
                let mesh = MeshData::build(mesh_kind);
                let vertices = pack_vertices(&mesh, kind.pipeline().layout);
                let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("vertex_buffer"),
                    contents: bytemuck::cast_slice(&vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                });
                let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("index_buffer"),
                    contents: bytemuck::cast_slice(&mesh.indices),
                    usage: wgpu::BufferUsages::INDEX,
                });
                let texture_bind_group = uses_texture(kind).then(|| {
                    let texture = drawable
                        .texture()
                        .and_then(|id| self.textures.get(&id))
                        .unwrap_or(&self.fallback_texture);
                    self.texture_bind_group(device, texture)
                });
                GpuGeometry::Indexed {
                    vertex_buffer,
                    index_buffer,
                    index_count: mesh.indices.len() as u32,
                    texture_bind_group,
                }
            }
            None => GpuGeometry::Glyphs {
                vertex_buffer: device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some("glyph_vertex_buffer"),
                    size: (MAX_TEXT_GLYPHS * 6 * 4 * std::mem::size_of::<f32>()) as u64,
                    usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                }),
            },
        };

        GpuDrawable {
            kind,
            program,
            uniform_buffer,
            uniform_bind_group,
            geometry,
        }
    }

    /// Render one frame into `target`: clear to black, then every prepared
    /// drawable in [`Scene::draw_order`].
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target: &wgpu::TextureView,
        scene: &Scene,
        camera: &Camera,
    ) {
        let light = scene.light_source();
        let mut frame: Vec<(&GpuDrawable, Vec<char>)> = Vec::new();

        for id in scene.draw_order() {
            let (Some(drawable), Some(gpu)) = (scene.get(id), self.drawables.get(&id)) else {
                continue;
            };
            queue.write_buffer(
                &gpu.uniform_buffer,
                0,
                &uniform_bytes(&drawable.uniforms(camera, light)),
            );
            let glyphs = match (&gpu.geometry, drawable.material()) {
                (
                    GpuGeometry::Glyphs { vertex_buffer },
                    Material::Text {
                        text,
                        origin,
                        scale,
                        ..
                    },
                ) => self.write_text(queue, vertex_buffer, text, *origin, *scale),
                _ => Vec::new(),
            };
            frame.push((gpu, glyphs));
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            for (gpu, glyphs) in &frame {
                let Some(pipeline) = self.pipelines.get(&(gpu.program, gpu.kind)) else {
                    continue;
                };
                pass.set_pipeline(pipeline);
                pass.set_bind_group(0, &gpu.uniform_bind_group, &[]);
                match &gpu.geometry {
                    GpuGeometry::Indexed {
                        vertex_buffer,
                        index_buffer,
                        index_count,
                        texture_bind_group,
                    } => {
                        if let Some(bind_group) = texture_bind_group {
                            pass.set_bind_group(1, bind_group, &[]);
                        }
                        pass.set_vertex_buffer(0, vertex_buffer.slice(..));
                        pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                        pass.draw_indexed(0..*index_count, 0, 0..1);
                    }
                    GpuGeometry::Glyphs { vertex_buffer } => {
                        let Some(atlas) = &self.glyphs else {
                            continue;
                        };
                        pass.set_vertex_buffer(0, vertex_buffer.slice(..));
                        for (i, ch) in glyphs.iter().enumerate() {
                            if let Some(bind_group) = atlas.bind_groups.get(ch) {
                                pass.set_bind_group(1, bind_group, &[]);
                                let first = (i * 6) as u32;
                                pass.draw(first..first + 6, 0..1);
                            }
                        }
                    }
                }
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    /// Lay out `text` and upload its quads. Returns the glyph of each quad.
    fn write_text(
        &self,
        queue: &wgpu::Queue,
        vertex_buffer: &wgpu::Buffer,
        text: &str,
        origin: glam::Vec2,
        scale: f32,
    ) -> Vec<char> {
        let Some(atlas) = &self.glyphs else {
            tracing::trace!("no glyphs loaded; text skipped");
            return Vec::new();
        };
        let mut quads = atlas.table.layout(text, origin, scale);
        if quads.len() > MAX_TEXT_GLYPHS {
            tracing::warn!(len = quads.len(), "label truncated to {MAX_TEXT_GLYPHS} glyphs");
            quads.truncate(MAX_TEXT_GLYPHS);
        }
        let vertices: Vec<[f32; 4]> = quads.iter().flat_map(|q| q.vertices).collect();
        if !vertices.is_empty() {
            queue.write_buffer(vertex_buffer, 0, bytemuck::cast_slice(&vertices));
        }
        quads.into_iter().map(|q| q.ch).collect()
    }

    fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyhop_render::{LightSource, MeshKind};

    #[test]
    fn uniform_blocks_are_16_byte_aligned() {
        for kind in [
            DrawableKind::LightMarker,
            DrawableKind::LitMesh,
            DrawableKind::ScreenText,
        ] {
            assert_eq!(uniform_size(kind) % 16, 0, "{kind:?}");
        }
        assert_eq!(uniform_size(DrawableKind::LitMesh), 192);
    }

    #[test]
    fn uniform_bytes_match_block_size() {
        let cam = Camera::default();
        let light = LightSource::default();
        let drawables = [
            Drawable::light_marker(MeshKind::Sphere, Vec3::ONE),
            Drawable::lit_mesh(MeshKind::Cube, 0.1, 0.5),
            Drawable::text("x", Vec3::X, glam::Vec2::ZERO),
        ];
        for d in &drawables {
            let bytes = uniform_bytes(&d.uniforms(&cam, light));
            assert_eq!(bytes.len() as u64, uniform_size(d.kind()));
        }
    }

    #[test]
    fn lit_material_packs_after_matrices() {
        let cam = Camera::default();
        let d = Drawable::lit_mesh(MeshKind::Sphere, 0.25, 0.5);
        let bytes = uniform_bytes(&d.uniforms(&cam, LightSource::default()));
        let floats: Vec<f32> = bytes
            .chunks_exact(4)
            .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        assert_eq!(&floats[44..46], &[0.25, 0.5]);
        assert_eq!(&floats[32..35], &cam.position.to_array());
    }

    #[test]
    fn packed_vertices_match_stride() {
        let mesh = MeshData::build(MeshKind::Cube);
        for layout in [VertexLayout::PositionColor, VertexLayout::PositionTexNormal] {
            let packed = pack_vertices(&mesh, layout);
            assert_eq!(packed.len(), mesh.vertices.len() * floats_per_vertex(layout));
            let stride = vertex_buffer_layout(layout).array_stride;
            let attrs = vertex_buffer_layout(layout).attributes;
            let last = attrs[attrs.len() - 1];
            assert_eq!(last.offset + last.format.size(), stride);
        }
    }

    #[test]
    fn text_pipeline_overlays_with_alpha() {
        let cfg = DrawableKind::ScreenText.pipeline();
        let depth = depth_state(cfg.depth);
        assert!(!depth.depth_write_enabled);
        assert_eq!(depth.depth_compare, wgpu::CompareFunction::Always);
        assert_eq!(blend_state(cfg.blend), wgpu::BlendState::ALPHA_BLENDING);

        let mesh = depth_state(DrawableKind::LitMesh.pipeline().depth);
        assert!(mesh.depth_write_enabled);
        assert_eq!(mesh.depth_compare, wgpu::CompareFunction::Less);
    }
}
