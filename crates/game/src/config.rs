use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use skyhop_kernel::GameRules;
use skyhop_physics::PhysicsConfig;
use skyhop_render::Camera;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("can't read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Everything tunable about a game, loaded from YAML. Missing fields keep
/// their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyhopConfig {
    pub window: WindowConfig,
    pub camera: Camera,
    pub rules: GameRules,
    pub physics: PhysicsConfig,
    pub bodies: BodyConfig,
    pub assets: AssetConfig,
}

impl SkyhopConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    /// Resolve relative asset paths against `root`.
    pub fn with_asset_root(mut self, root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let assets = &mut self.assets;
        for path in [
            &mut assets.shader_dir,
            &mut assets.font,
            &mut assets.hero_texture,
            &mut assets.ground_texture,
        ] {
            if path.is_relative() {
                *path = root.join(&*path);
            }
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Skyhop".into(),
            width: 800,
            height: 600,
        }
    }
}

/// Rigid-body parameters of the hero, ground and enemy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyConfig {
    pub hero_mass: f32,
    pub hero_radius: f32,
    pub friction: f32,
    pub restitution: f32,
    pub ground_position: Vec3,
    pub ground_half_extents: Vec3,
    pub enemy_half_extents: Vec3,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            hero_mass: 13.0,
            hero_radius: 1.0,
            friction: 1.0,
            restitution: 0.0,
            ground_position: Vec3::new(0.0, -1.0, 0.0),
            ground_half_extents: Vec3::new(4.0, 0.5, 4.0),
            enemy_half_extents: Vec3::ONE,
        }
    }
}

/// Asset paths plus the placement of the light and the score label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub shader_dir: PathBuf,
    pub font: PathBuf,
    pub font_pixel_size: f32,
    pub hero_texture: PathBuf,
    pub ground_texture: PathBuf,
    pub light_position: Vec3,
    pub light_color: Vec3,
    pub label_origin: Vec2,
    pub label_color: Vec3,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            shader_dir: "shaders".into(),
            font: "fonts/gooddog.ttf".into(),
            font_pixel_size: 64.0,
            hero_texture: "textures/globe.jpg".into(),
            ground_texture: "textures/ground.jpg".into(),
            light_position: Vec3::new(0.0, 10.0, 0.0),
            light_color: Vec3::ONE,
            label_origin: Vec2::new(320.0, 500.0),
            label_color: Vec3::X,
        }
    }
}
