use crate::drawable::{Drawable, DrawableKind, LightSource};
use skyhop_common::{EntityId, Transform};
use std::collections::BTreeMap;

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("entity {0} already has a drawable")]
    Duplicate(EntityId),
    #[error("entity {0} has no drawable")]
    Unknown(EntityId),
}

/// Arena of drawables keyed by the same [`EntityId`] the physics bodies carry.
///
/// At most one drawable per entity.
#[derive(Debug, Default)]
pub struct Scene {
    drawables: BTreeMap<EntityId, Drawable>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: EntityId, drawable: Drawable) -> Result<(), SceneError> {
        if self.drawables.contains_key(&id) {
            return Err(SceneError::Duplicate(id));
        }
        tracing::debug!(%id, kind = ?drawable.kind(), "drawable added");
        self.drawables.insert(id, drawable);
        Ok(())
    }

    pub fn remove(&mut self, id: EntityId) -> Option<Drawable> {
        self.drawables.remove(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Drawable> {
        self.drawables.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Drawable> {
        self.drawables.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.drawables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drawables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Drawable)> {
        self.drawables.iter().map(|(id, d)| (*id, d))
    }

    /// Entities in frame order: light markers, lit meshes, then text. Ties
    /// break on id so the order is stable between frames.
    pub fn draw_order(&self) -> Vec<EntityId> {
        let mut order: Vec<_> = self
            .drawables
            .iter()
            .map(|(id, d)| (d.kind().draw_rank(), *id))
            .collect();
        order.sort_unstable();
        order.into_iter().map(|(_, id)| id).collect()
    }

    /// Replace the string of a text drawable.
    pub fn set_text(&mut self, id: EntityId, text: impl Into<String>) -> Result<(), SceneError> {
        let drawable = self.drawables.get_mut(&id).ok_or(SceneError::Unknown(id))?;
        if !drawable.set_text(text) {
            tracing::warn!(%id, "set_text on a drawable that is not text");
        }
        Ok(())
    }

    /// Copy physics poses onto lit meshes. Light markers and text keep their
    /// own placement; scale always stays as configured.
    pub fn sync_poses<F>(&mut self, mut pose_of: F)
    where
        F: FnMut(EntityId) -> Option<Transform>,
    {
        for (id, drawable) in &mut self.drawables {
            if drawable.kind() != DrawableKind::LitMesh {
                continue;
            }
            if let Some(pose) = pose_of(*id) {
                drawable.set_pose(pose.position, pose.rotation);
            }
        }
    }

    /// The first light marker by id, or a white light at the origin.
    pub fn light_source(&self) -> LightSource {
        self.drawables
            .values()
            .find(|d| d.kind() == DrawableKind::LightMarker)
            .map(|d| LightSource {
                position: d.position(),
                color: d.color().unwrap_or(glam::Vec3::ONE),
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::MeshKind;
    use glam::{Quat, Vec2, Vec3};

    fn sample() -> Scene {
        let mut scene = Scene::new();
        scene
            .insert(
                EntityId(4),
                Drawable::text("Score: 0", Vec3::X, Vec2::new(320.0, 500.0)),
            )
            .unwrap();
        scene
            .insert(EntityId(1), Drawable::lit_mesh(MeshKind::Sphere, 0.1, 0.5))
            .unwrap();
        let mut light = Drawable::light_marker(MeshKind::Sphere, Vec3::ONE);
        light.set_position(Vec3::new(0.0, 10.0, 0.0));
        scene.insert(EntityId(3), light).unwrap();
        scene
            .insert(EntityId(2), Drawable::lit_mesh(MeshKind::Cube, 0.1, 0.5))
            .unwrap();
        scene
    }

    #[test]
    fn text_draws_last_light_first() {
        let scene = sample();
        assert_eq!(
            scene.draw_order(),
            vec![EntityId(3), EntityId(1), EntityId(2), EntityId(4)]
        );
    }

    #[test]
    fn one_drawable_per_entity() {
        let mut scene = sample();
        let err = scene
            .insert(EntityId(1), Drawable::lit_mesh(MeshKind::Cube, 0.1, 0.5))
            .unwrap_err();
        assert!(matches!(err, SceneError::Duplicate(EntityId(1))));
        assert_eq!(scene.len(), 4);
    }

    #[test]
    fn sync_moves_meshes_and_keeps_scale() {
        let mut scene = sample();
        scene
            .get_mut(EntityId(2))
            .unwrap()
            .set_scale(Vec3::new(4.0, 0.5, 4.0));
        let rot = Quat::from_rotation_y(0.5);
        scene.sync_poses(|id| {
            Some(Transform {
                position: Vec3::new(id.0 as f32, 0.0, 0.0),
                rotation: rot,
                scale: Vec3::splat(9.0),
            })
        });
        let ground = scene.get(EntityId(2)).unwrap();
        assert_eq!(ground.position(), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(ground.transform().rotation, rot);
        assert_eq!(ground.transform().scale, Vec3::new(4.0, 0.5, 4.0));
        // Light markers are not driven by physics.
        assert_eq!(
            scene.get(EntityId(3)).unwrap().position(),
            Vec3::new(0.0, 10.0, 0.0)
        );
    }

    #[test]
    fn light_source_comes_from_marker() {
        let scene = sample();
        let light = scene.light_source();
        assert_eq!(light.position, Vec3::new(0.0, 10.0, 0.0));
        assert_eq!(light.color, Vec3::ONE);
        assert_eq!(Scene::new().light_source(), LightSource::default());
    }

    #[test]
    fn set_text_updates_label() {
        let mut scene = sample();
        scene.set_text(EntityId(4), "Score: 3").unwrap();
        assert_eq!(
            scene.get(EntityId(4)).unwrap().text_content(),
            Some("Score: 3")
        );
        assert!(matches!(
            scene.set_text(EntityId(9), "x"),
            Err(SceneError::Unknown(EntityId(9)))
        ));
    }
}
