//! Scene setup: turns an [`EngineConfig`] into a populated registry.
//!
//! Objects whose mesh cannot be generated are left out of the scene and
//! reported. Setup only fails if the registry rejects a component on an
//! entity it just created.

use std::collections::{BTreeMap, HashMap};

use lumen_common::{EngineConfig, EntityId, ObjectConfig, Shape, Transform};
use lumen_ecs::{EcsError, Registry};
use lumen_geometry::{GeometryError, MeshHandle, generate};
use tracing::{debug, info, info_span, warn};

/// An object that did not make it into the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedObject {
    pub name: String,
    pub error: GeometryError,
}

/// A built scene: the registry plus the bookkeeping setup produced.
#[derive(Debug)]
pub struct Scene {
    registry: Registry,
    camera_rig: EntityId,
    names: BTreeMap<EntityId, String>,
    meshes: Vec<MeshHandle>,
    skipped: Vec<SkippedObject>,
}

impl Scene {
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Entity whose transform drives the camera.
    pub fn camera_rig(&self) -> EntityId {
        self.camera_rig
    }

    pub fn name(&self, id: EntityId) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    pub fn find(&self, name: &str) -> Option<EntityId> {
        self.names
            .iter()
            .find(|(_, n)| n.as_str() == name)
            .map(|(id, _)| *id)
    }

    /// Distinct meshes generated for this scene.
    pub fn meshes(&self) -> &[MeshHandle] {
        &self.meshes
    }

    pub fn skipped(&self) -> &[SkippedObject] {
        &self.skipped
    }
}

/// Generates meshes and spawns entities for a configuration.
///
/// Objects sharing a `(shape, resolution)` pair share one mesh.
#[derive(Debug, Default)]
pub struct SceneBuilder {
    cache: HashMap<(Shape, u32), MeshHandle>,
    meshes: Vec<MeshHandle>,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn mesh_for(&mut self, object: &ObjectConfig) -> Result<MeshHandle, GeometryError> {
        let key = (object.shape, object.resolution);
        if let Some(handle) = self.cache.get(&key) {
            return Ok(handle.clone());
        }
        let handle = MeshHandle::new(generate(object.shape, object.resolution)?);
        debug!(
            shape = %object.shape,
            resolution = object.resolution,
            vertices = handle.vertex_count(),
            triangles = handle.triangle_count(),
            "mesh generated"
        );
        self.cache.insert(key, handle.clone());
        self.meshes.push(handle.clone());
        Ok(handle)
    }

    pub fn build(mut self, config: &EngineConfig) -> Result<Scene, EcsError> {
        let _span = info_span!("scene_setup").entered();
        let mut registry = Registry::new();
        let mut names = BTreeMap::new();
        let mut skipped = Vec::new();

        for object in &config.objects {
            let mesh = match self.mesh_for(object) {
                Ok(mesh) => mesh,
                Err(error) => {
                    warn!(object = %object.name, %error, "object skipped");
                    skipped.push(SkippedObject {
                        name: object.name.clone(),
                        error,
                    });
                    continue;
                }
            };
            let id = registry.create_entity();
            registry.add_component(id, object.transform)?;
            registry.add_component(id, mesh)?;
            names.insert(id, object.name.clone());
            debug!(entity = %id, object = %object.name, "object spawned");
        }

        for light in &config.lights {
            let id = registry.create_point_light_entity();
            registry.transform_mut(id)?.position = light.position;
            registry.point_light_mut(id)?.intensity = light.intensity;
            registry.set_color(id, light.color)?;
            names.insert(id, light.name.clone());
            debug!(entity = %id, light = %light.name, "light spawned");
        }

        let camera_rig = registry.create_entity();
        registry.add_component(
            camera_rig,
            Transform {
                position: config.camera.position,
                rotation: config.camera.rotation,
                ..Transform::default()
            },
        )?;
        names.insert(camera_rig, "camera_rig".to_string());

        info!(
            entities = registry.len(),
            meshes = self.meshes.len(),
            skipped = skipped.len(),
            "scene built"
        );

        Ok(Scene {
            registry,
            camera_rig,
            names,
            meshes: self.meshes,
            skipped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use lumen_common::LightConfig;
    use lumen_ecs::ComponentKind;

    fn object(name: &str, shape: Shape, resolution: u32) -> ObjectConfig {
        ObjectConfig {
            name: name.into(),
            shape,
            resolution,
            transform: Transform::default(),
        }
    }

    fn small_config() -> EngineConfig {
        EngineConfig {
            objects: vec![
                object("a", Shape::Cube, 2),
                object("b", Shape::Quad, 3),
                object("c", Shape::Cube, 2),
            ],
            lights: vec![LightConfig {
                name: "lamp".into(),
                position: Vec3::new(0.0, -3.0, 3.0),
                color: Vec3::new(1.0, 0.5, 0.25),
                intensity: 2.0,
            }],
            ..EngineConfig::default()
        }
    }

    #[test]
    fn objects_and_lights_are_spawned() {
        let scene = SceneBuilder::new().build(&small_config()).unwrap();
        let reg = scene.registry();
        assert_eq!(reg.renderables().count(), 3);
        assert_eq!(reg.point_lights().count(), 1);
        // Three objects, one light, the camera rig.
        assert_eq!(reg.len(), 5);

        let lamp = scene.find("lamp").unwrap();
        assert_eq!(reg.transform(lamp).unwrap().position, Vec3::new(0.0, -3.0, 3.0));
        assert_eq!(reg.point_light(lamp).unwrap().intensity, 2.0);
        assert_eq!(reg.color(lamp).unwrap(), Vec3::new(1.0, 0.5, 0.25));
    }

    #[test]
    fn every_spawned_entity_has_its_components() {
        let scene = SceneBuilder::new().build(&small_config()).unwrap();
        let reg = scene.registry();
        for name in ["a", "b", "c"] {
            let id = scene.find(name).unwrap();
            assert!(reg.has_component(id, ComponentKind::Transform), "{name}");
            assert!(reg.has_component(id, ComponentKind::Mesh), "{name}");
        }
        let lamp = scene.find("lamp").unwrap();
        assert!(reg.has_component(lamp, ComponentKind::Transform));
        assert!(reg.has_component(lamp, ComponentKind::PointLight));
        assert!(reg.has_component(scene.camera_rig(), ComponentKind::Transform));
    }

    #[test]
    fn identical_objects_share_a_mesh() {
        let scene = SceneBuilder::new().build(&small_config()).unwrap();
        assert_eq!(scene.meshes().len(), 2);
        let a = scene.registry().mesh(scene.find("a").unwrap()).unwrap();
        let c = scene.registry().mesh(scene.find("c").unwrap()).unwrap();
        assert!(MeshHandle::ptr_eq(a.handle(), c.handle()));
    }

    #[test]
    fn failed_objects_are_skipped() {
        let mut config = small_config();
        config.objects.insert(1, object("broken", Shape::Terrain, 0));
        let scene = SceneBuilder::new().build(&config).unwrap();

        assert_eq!(scene.skipped().len(), 1);
        assert_eq!(scene.skipped()[0].name, "broken");
        assert!(matches!(
            scene.skipped()[0].error,
            GeometryError::InvalidResolution { resolution: 0, .. }
        ));
        assert!(scene.find("broken").is_none());
        assert_eq!(scene.registry().renderables().count(), 3);
    }

    #[test]
    fn camera_rig_starts_at_configured_pose() {
        let config = EngineConfig::default();
        let scene = SceneBuilder::new().build(&config).unwrap();
        let rig = scene.camera_rig();
        assert_eq!(scene.name(rig), Some("camera_rig"));
        assert!(!scene.registry().has_component(rig, ComponentKind::Mesh));
        assert_eq!(
            scene.registry().transform(rig).unwrap().position,
            config.camera.position
        );
    }

    #[test]
    fn default_config_builds_the_demo_scene() {
        let scene = SceneBuilder::new().build(&EngineConfig::default()).unwrap();
        let quad = scene.find("quad").unwrap();
        let cube = scene.find("cube").unwrap();
        assert!(quad < cube);
        let t = scene.registry().transform(quad).unwrap();
        assert_eq!(t.scale, Vec3::splat(5.0));
        assert_eq!(scene.registry().mesh(cube).unwrap().triangle_count(), 12 * 128 * 128);
        assert!(scene.skipped().is_empty());
    }

    #[test]
    fn scene_from_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.yaml");
        std::fs::write(
            &path,
            "objects:\n  - name: ground\n    shape: terrain\n    resolution: 4\nlights: []\n",
        )
        .unwrap();
        let config = EngineConfig::load(&path).unwrap();
        let scene = SceneBuilder::new().build(&config).unwrap();
        let ground = scene.find("ground").unwrap();
        assert_eq!(scene.registry().mesh(ground).unwrap().vertex_count(), 25);
        assert_eq!(scene.registry().point_lights().count(), 0);
    }
}
