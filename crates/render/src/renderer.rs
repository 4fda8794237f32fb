use crate::camera::Camera;
use crate::drawable::Material;
use crate::scene::Scene;
use std::fmt::Write;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer reads the scene and the camera, then produces output. It never
/// mutates either; poses are synced into the scene before the frame.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame, visiting drawables in [`Scene::draw_order`].
    fn render(&self, scene: &Scene, camera: &Camera) -> Self::Output;
}

/// Text dump of one frame, used by the headless CLI and in tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &Scene, camera: &Camera) -> String {
        let mut out = String::new();
        let eye = camera.position;
        let target = camera.target;
        let _ = writeln!(out, "=== Frame ({} drawables) ===", scene.len());
        let _ = writeln!(
            out,
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}",
            eye.x, eye.y, eye.z, target.x, target.y, target.z, camera.fov_degrees
        );

        for id in scene.draw_order() {
            let Some(drawable) = scene.get(id) else {
                continue;
            };
            let p = drawable.position();
            match drawable.material() {
                Material::Text { text, origin, .. } => {
                    let _ = writeln!(
                        out,
                        "  [{id}] text {text:?} at ({:.0}, {:.0})",
                        origin.x, origin.y
                    );
                }
                _ => {
                    let _ = writeln!(
                        out,
                        "  [{id}] {:?} {:?} pos=({:.2}, {:.2}, {:.2})",
                        drawable.kind(),
                        drawable.mesh(),
                        p.x,
                        p.y,
                        p.z
                    );
                }
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawable::Drawable;
    use crate::geometry::MeshKind;
    use glam::{Vec2, Vec3};
    use skyhop_common::EntityId;

    #[test]
    fn debug_renderer_empty_scene() {
        let output = DebugTextRenderer::new().render(&Scene::new(), &Camera::default());
        assert!(output.contains("0 drawables"));
        assert!(output.contains("fov=45"));
    }

    #[test]
    fn debug_renderer_lists_in_draw_order() {
        let mut scene = Scene::new();
        scene
            .insert(EntityId(0), Drawable::text("Score: 2", Vec3::X, Vec2::ZERO))
            .unwrap();
        let mut hero = Drawable::lit_mesh(MeshKind::Sphere, 0.1, 0.5);
        hero.set_position(Vec3::new(1.0, 2.0, 3.0));
        scene.insert(EntityId(1), hero).unwrap();

        let output = DebugTextRenderer::new().render(&scene, &Camera::default());
        let mesh_at = output.find("pos=(1.00, 2.00, 3.00)").unwrap();
        let text_at = output.find("\"Score: 2\"").unwrap();
        assert!(mesh_at < text_at);
    }
}
