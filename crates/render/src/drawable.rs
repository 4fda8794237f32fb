//! One generic drawable parameterized by a small pipeline configuration, with
//! a tagged material selecting which uniforms it uploads.

use crate::camera::Camera;
use crate::geometry::MeshKind;
use glam::{Mat4, Quat, Vec2, Vec3};
use skyhop_common::Transform;

/// Opaque handle of a linked shader program held by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProgramId(pub u32);

/// Opaque handle of a 2D texture held by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u32);

/// Which vertex attributes a pipeline reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexLayout {
    /// location 0 position, location 1 colour.
    PositionColor,
    /// location 0 position, location 1 texture coordinate, location 2 normal.
    PositionTexNormal,
    /// location 0 `vec4(x, y, u, v)` in screen pixels.
    ScreenQuad,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendMode {
    Replace,
    /// Source-alpha over destination.
    Alpha,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DepthMode {
    /// Depth tested and written.
    Test,
    /// Drawn over everything, depth untouched.
    Overlay,
}

/// Fixed-function state of a drawable's pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PipelineConfig {
    pub layout: VertexLayout,
    pub blend: BlendMode,
    pub depth: DepthMode,
    pub cull_back_faces: bool,
    /// Draw with an index buffer (one call) or per glyph without one.
    pub indexed: bool,
}

/// The three renderer variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DrawableKind {
    LightMarker,
    LitMesh,
    ScreenText,
}

impl DrawableKind {
    /// Frame ordering rank: lower draws first.
    pub fn draw_rank(self) -> u8 {
        match self {
            Self::LightMarker => 0,
            Self::LitMesh => 1,
            Self::ScreenText => 2,
        }
    }

    pub fn pipeline(self) -> PipelineConfig {
        match self {
            Self::LightMarker => PipelineConfig {
                layout: VertexLayout::PositionColor,
                blend: BlendMode::Replace,
                depth: DepthMode::Test,
                cull_back_faces: true,
                indexed: true,
            },
            Self::LitMesh => PipelineConfig {
                layout: VertexLayout::PositionTexNormal,
                blend: BlendMode::Replace,
                depth: DepthMode::Test,
                cull_back_faces: true,
                indexed: true,
            },
            Self::ScreenText => PipelineConfig {
                layout: VertexLayout::ScreenQuad,
                blend: BlendMode::Alpha,
                depth: DepthMode::Overlay,
                cull_back_faces: false,
                indexed: false,
            },
        }
    }
}

/// Variant-specific parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    Light {
        color: Vec3,
    },
    Lit {
        specular_strength: f32,
        ambient_strength: f32,
    },
    Text {
        text: String,
        color: Vec3,
        /// Baseline start in screen pixels, origin bottom-left.
        origin: Vec2,
        scale: f32,
    },
}

/// Position and colour of the scene light as seen by lit meshes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSource {
    pub position: Vec3,
    pub color: Vec3,
}

impl Default for LightSource {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            color: Vec3::ONE,
        }
    }
}

/// Values uploaded before a drawable's draw call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformSet {
    Light {
        model: Mat4,
        view: Mat4,
        projection: Mat4,
        color: Vec3,
    },
    Lit {
        view_projection: Mat4,
        model: Mat4,
        camera_position: Vec3,
        light_position: Vec3,
        light_color: Vec3,
        specular_strength: f32,
        ambient_strength: f32,
    },
    Text {
        projection: Mat4,
        color: Vec3,
    },
}

/// CPU-side state of one renderer instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Drawable {
    mesh: Option<MeshKind>,
    transform: Transform,
    material: Material,
    program: Option<ProgramId>,
    texture: Option<TextureId>,
}

impl Drawable {
    pub fn light_marker(mesh: MeshKind, color: Vec3) -> Self {
        Self::new(Some(mesh), Material::Light { color })
    }

    pub fn lit_mesh(mesh: MeshKind, specular_strength: f32, ambient_strength: f32) -> Self {
        Self::new(
            Some(mesh),
            Material::Lit {
                specular_strength,
                ambient_strength,
            },
        )
    }

    pub fn text(text: impl Into<String>, color: Vec3, origin: Vec2) -> Self {
        Self::new(
            None,
            Material::Text {
                text: text.into(),
                color,
                origin,
                scale: 1.0,
            },
        )
    }

    fn new(mesh: Option<MeshKind>, material: Material) -> Self {
        Self {
            mesh,
            transform: Transform::default(),
            material,
            program: None,
            texture: None,
        }
    }

    pub fn kind(&self) -> DrawableKind {
        match self.material {
            Material::Light { .. } => DrawableKind::LightMarker,
            Material::Lit { .. } => DrawableKind::LitMesh,
            Material::Text { .. } => DrawableKind::ScreenText,
        }
    }

    pub fn pipeline(&self) -> PipelineConfig {
        self.kind().pipeline()
    }

    pub fn mesh(&self) -> Option<MeshKind> {
        self.mesh
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn program(&self) -> Option<ProgramId> {
        self.program
    }

    pub fn texture(&self) -> Option<TextureId> {
        self.texture
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    /// Light or text colour. Lit meshes take their colour from a texture.
    pub fn color(&self) -> Option<Vec3> {
        match &self.material {
            Material::Light { color } | Material::Text { color, .. } => Some(*color),
            Material::Lit { .. } => None,
        }
    }

    pub fn text_content(&self) -> Option<&str> {
        match &self.material {
            Material::Text { text, .. } => Some(text),
            _ => None,
        }
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.transform.position = position;
    }

    /// Copy a physics pose. Scale is kept.
    pub fn set_pose(&mut self, position: Vec3, rotation: Quat) {
        self.transform.position = position;
        self.transform.rotation = rotation;
    }

    /// Returns `false` for text, which has no scale.
    pub fn set_scale(&mut self, scale: Vec3) -> bool {
        if self.mesh.is_none() {
            return false;
        }
        self.transform.scale = scale;
        true
    }

    /// Returns `false` for lit meshes, which have no colour.
    pub fn set_color(&mut self, new: Vec3) -> bool {
        match &mut self.material {
            Material::Light { color } | Material::Text { color, .. } => {
                *color = new;
                true
            }
            Material::Lit { .. } => false,
        }
    }

    /// Replace the string of a text drawable.
    pub fn set_text(&mut self, new: impl Into<String>) -> bool {
        match &mut self.material {
            Material::Text { text, .. } => {
                *text = new.into();
                true
            }
            _ => false,
        }
    }

    /// Move the baseline start of a text drawable.
    pub fn set_screen_origin(&mut self, new: Vec2) -> bool {
        match &mut self.material {
            Material::Text { origin, .. } => {
                *origin = new;
                true
            }
            _ => false,
        }
    }

    pub fn set_program(&mut self, program: ProgramId) {
        self.program = Some(program);
    }

    pub fn set_texture(&mut self, texture: TextureId) {
        self.texture = Some(texture);
    }

    /// Model transform: translation × scale for the light marker,
    /// translation × rotation × scale for meshes, identity for text.
    pub fn model_matrix(&self) -> Mat4 {
        match self.kind() {
            DrawableKind::LightMarker => {
                Mat4::from_translation(self.transform.position)
                    * Mat4::from_scale(self.transform.scale)
            }
            DrawableKind::LitMesh => self.transform.model_matrix(),
            DrawableKind::ScreenText => Mat4::IDENTITY,
        }
    }

    pub fn uniforms(&self, camera: &Camera, light: LightSource) -> UniformSet {
        match &self.material {
            Material::Light { color } => UniformSet::Light {
                model: self.model_matrix(),
                view: camera.view_matrix(),
                projection: camera.projection_matrix(),
                color: *color,
            },
            Material::Lit {
                specular_strength,
                ambient_strength,
            } => UniformSet::Lit {
                view_projection: camera.view_projection(),
                model: self.model_matrix(),
                camera_position: camera.position,
                light_position: light.position,
                light_color: light.color,
                specular_strength: *specular_strength,
                ambient_strength: *ambient_strength,
            },
            Material::Text { color, .. } => UniformSet::Text {
                projection: camera.screen_projection(),
                color: *color,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_material() {
        assert_eq!(
            Drawable::light_marker(MeshKind::Sphere, Vec3::ONE).kind(),
            DrawableKind::LightMarker
        );
        assert_eq!(
            Drawable::lit_mesh(MeshKind::Cube, 0.1, 0.5).kind(),
            DrawableKind::LitMesh
        );
        assert_eq!(
            Drawable::text("hi", Vec3::X, Vec2::ZERO).kind(),
            DrawableKind::ScreenText
        );
    }

    #[test]
    fn only_text_blends_and_skips_depth() {
        for kind in [DrawableKind::LightMarker, DrawableKind::LitMesh] {
            let p = kind.pipeline();
            assert_eq!(p.blend, BlendMode::Replace);
            assert_eq!(p.depth, DepthMode::Test);
            assert!(p.indexed);
        }
        let text = DrawableKind::ScreenText.pipeline();
        assert_eq!(text.blend, BlendMode::Alpha);
        assert_eq!(text.depth, DepthMode::Overlay);
        assert!(!text.indexed);
    }

    #[test]
    fn mesh_model_is_translate_rotate_scale() {
        let mut d = Drawable::lit_mesh(MeshKind::Cube, 0.1, 0.5);
        d.set_scale(Vec3::new(2.0, 1.0, 1.0));
        d.set_pose(
            Vec3::new(0.0, 5.0, 0.0),
            Quat::from_rotation_z(std::f32::consts::FRAC_PI_2),
        );
        let p = d.model_matrix().transform_point3(Vec3::X);
        assert!((p - Vec3::new(0.0, 7.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn light_model_ignores_rotation() {
        let mut d = Drawable::light_marker(MeshKind::Sphere, Vec3::ONE);
        d.set_pose(Vec3::new(0.0, 10.0, 0.0), Quat::from_rotation_x(1.0));
        assert_eq!(
            d.model_matrix(),
            Mat4::from_translation(Vec3::new(0.0, 10.0, 0.0))
        );
    }

    #[test]
    fn lit_uniforms_carry_light_and_camera() {
        let cam = Camera::default();
        let light = LightSource {
            position: Vec3::new(0.0, 10.0, 0.0),
            color: Vec3::ONE,
        };
        let d = Drawable::lit_mesh(MeshKind::Sphere, 0.1, 0.5);
        let UniformSet::Lit {
            camera_position,
            light_position,
            specular_strength,
            ambient_strength,
            view_projection,
            ..
        } = d.uniforms(&cam, light)
        else {
            panic!("lit mesh produced the wrong uniform set");
        };
        assert_eq!(camera_position, cam.position);
        assert_eq!(light_position, light.position);
        assert_eq!(specular_strength, 0.1);
        assert_eq!(ambient_strength, 0.5);
        assert_eq!(view_projection, cam.view_projection());
    }

    #[test]
    fn text_uses_screen_projection() {
        let cam = Camera::default();
        let d = Drawable::text("Score: 0", Vec3::X, Vec2::new(320.0, 500.0));
        assert_eq!(
            d.uniforms(&cam, LightSource::default()),
            UniformSet::Text {
                projection: cam.screen_projection(),
                color: Vec3::X,
            }
        );
    }

    #[test]
    fn mutators_respect_variant() {
        let mut text = Drawable::text("a", Vec3::X, Vec2::ZERO);
        assert!(!text.set_scale(Vec3::splat(2.0)));
        assert!(text.set_text("b"));
        assert_eq!(text.text_content(), Some("b"));
        assert!(text.set_color(Vec3::Y));
        assert_eq!(text.color(), Some(Vec3::Y));

        let mut mesh = Drawable::lit_mesh(MeshKind::Cube, 0.1, 0.5);
        assert!(!mesh.set_color(Vec3::Y));
        assert!(!mesh.set_text("nope"));
        assert!(mesh.color().is_none());
        mesh.set_program(ProgramId(2));
        mesh.set_texture(TextureId(1));
        assert_eq!(mesh.program(), Some(ProgramId(2)));
        assert_eq!(mesh.texture(), Some(TextureId(1)));
    }
}
