use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::types::Transform;

/// Upper bound on frames in flight. More slots than this only add latency.
pub const MAX_FRAMES_IN_FLIGHT: usize = 4;

/// Errors from loading or validating an [`EngineConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("frames_in_flight must be in 1..={MAX_FRAMES_IN_FLIGHT}, got {0}")]
    InvalidFramesInFlight(usize),
    #[error("invalid camera configuration: {0}")]
    InvalidCamera(String),
}

/// Procedural shape kinds a scene object can be built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    Cube,
    Quad,
    Terrain,
}

impl Shape {
    pub const ALL: [Shape; 3] = [Shape::Cube, Shape::Quad, Shape::Terrain];

    pub fn name(self) -> &'static str {
        match self {
            Shape::Cube => "cube",
            Shape::Quad => "quad",
            Shape::Terrain => "terrain",
        }
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Camera rig and projection parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub aspect: f32,
    /// Starting position of the camera rig.
    pub position: Vec3,
    /// Starting Euler rotation of the camera rig (radians).
    pub rotation: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 60.0,
            near: 0.1,
            far: 100.0,
            aspect: 800.0 / 600.0,
            position: Vec3::new(0.0, 0.0, -2.5),
            rotation: Vec3::ZERO,
        }
    }
}

/// A procedurally generated object placed in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectConfig {
    pub name: String,
    pub shape: Shape,
    pub resolution: u32,
    #[serde(default)]
    pub transform: Transform,
}

/// A point light placed in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightConfig {
    pub name: String,
    pub position: Vec3,
    #[serde(default = "default_light_color")]
    pub color: Vec3,
    #[serde(default = "default_light_intensity")]
    pub intensity: f32,
}

fn default_light_color() -> Vec3 {
    Vec3::ONE
}

fn default_light_intensity() -> f32 {
    1.0
}

/// Top-level engine configuration.
///
/// Every field has a default, so a config file only needs to name what it
/// changes. The default scene is the demo layout: a quad, a cube and one
/// white point light.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub frames_in_flight: usize,
    pub ambient_color: [f32; 4],
    pub camera: CameraConfig,
    pub objects: Vec<ObjectConfig>,
    pub lights: Vec<LightConfig>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            frames_in_flight: 2,
            ambient_color: [1.0, 1.0, 1.0, 0.05],
            camera: CameraConfig::default(),
            objects: vec![
                ObjectConfig {
                    name: "quad".into(),
                    shape: Shape::Quad,
                    resolution: 128,
                    transform: Transform::from_position(Vec3::new(-2.5, 0.0, 5.0))
                        .with_scale(Vec3::splat(5.0)),
                },
                ObjectConfig {
                    name: "cube".into(),
                    shape: Shape::Cube,
                    resolution: 128,
                    transform: Transform::from_position(Vec3::new(-0.5, -2.0, 5.0)),
                },
            ],
            lights: vec![LightConfig {
                name: "key_light".into(),
                position: Vec3::new(0.0, -3.0, 3.0),
                color: Vec3::ONE,
                intensity: 1.0,
            }],
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from YAML text and validate it.
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file from disk and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&text)?;
        tracing::debug!(
            path = %path.display(),
            objects = config.objects.len(),
            lights = config.lights.len(),
            "loaded engine config"
        );
        Ok(config)
    }

    /// Write the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_yaml()?)?;
        Ok(())
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check the ranges serde cannot express.
    ///
    /// Object resolutions are deliberately not checked here: a bad resolution
    /// only drops that one object when the scene is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_FRAMES_IN_FLIGHT).contains(&self.frames_in_flight) {
            return Err(ConfigError::InvalidFramesInFlight(self.frames_in_flight));
        }
        let cam = &self.camera;
        if !(cam.near > 0.0 && cam.far > cam.near) {
            return Err(ConfigError::InvalidCamera(format!(
                "near/far must satisfy 0 < near < far, got {} / {}",
                cam.near, cam.far
            )));
        }
        if !(cam.aspect > 0.0) {
            return Err(ConfigError::InvalidCamera(format!(
                "aspect must be positive, got {}",
                cam.aspect
            )));
        }
        Ok(())
    }
}
