//! Shared types for the lumen workspace: entity ids, transforms and the
//! engine configuration loaded at startup.

pub mod config;
pub mod types;

pub use config::{
    CameraConfig, ConfigError, EngineConfig, LightConfig, MAX_FRAMES_IN_FLIGHT, ObjectConfig,
    Shape,
};
pub use types::{EntityId, Transform};
