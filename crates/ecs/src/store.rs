use std::collections::BTreeMap;

use lumen_common::{EntityId, Transform};

use crate::components::{Component, ComponentKind, MeshRef, PointLight};

/// Sparse component storage: one map per component kind, keyed by entity.
///
/// Entity ids are allocated in increasing order, so every map iterates in
/// creation order.
#[derive(Debug, Clone, Default)]
pub struct ComponentStore {
    transforms: BTreeMap<EntityId, Transform>,
    meshes: BTreeMap<EntityId, MeshRef>,
    point_lights: BTreeMap<EntityId, PointLight>,
}

impl ComponentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `component`, returning the value of the same kind it replaced.
    pub fn insert(&mut self, entity: EntityId, component: Component) -> Option<Component> {
        match component {
            Component::Transform(t) => self.set_transform(entity, t).map(Component::Transform),
            Component::Mesh(m) => self.set_mesh(entity, m).map(Component::Mesh),
            Component::PointLight(l) => self.set_point_light(entity, l).map(Component::PointLight),
        }
    }

    pub fn contains(&self, entity: EntityId, kind: ComponentKind) -> bool {
        match kind {
            ComponentKind::Transform => self.transforms.contains_key(&entity),
            ComponentKind::Mesh => self.meshes.contains_key(&entity),
            ComponentKind::PointLight => self.point_lights.contains_key(&entity),
        }
    }

    // --- Transform ---
    pub fn set_transform(&mut self, entity: EntityId, transform: Transform) -> Option<Transform> {
        self.transforms.insert(entity, transform)
    }

    pub fn get_transform(&self, entity: EntityId) -> Option<&Transform> {
        self.transforms.get(&entity)
    }

    pub fn get_transform_mut(&mut self, entity: EntityId) -> Option<&mut Transform> {
        self.transforms.get_mut(&entity)
    }

    pub fn transforms(&self) -> &BTreeMap<EntityId, Transform> {
        &self.transforms
    }

    // --- Mesh ---
    pub fn set_mesh(&mut self, entity: EntityId, mesh: MeshRef) -> Option<MeshRef> {
        self.meshes.insert(entity, mesh)
    }

    pub fn get_mesh(&self, entity: EntityId) -> Option<&MeshRef> {
        self.meshes.get(&entity)
    }

    pub fn meshes(&self) -> &BTreeMap<EntityId, MeshRef> {
        &self.meshes
    }

    // --- PointLight ---
    pub fn set_point_light(&mut self, entity: EntityId, light: PointLight) -> Option<PointLight> {
        self.point_lights.insert(entity, light)
    }

    pub fn get_point_light(&self, entity: EntityId) -> Option<&PointLight> {
        self.point_lights.get(&entity)
    }

    pub fn get_point_light_mut(&mut self, entity: EntityId) -> Option<&mut PointLight> {
        self.point_lights.get_mut(&entity)
    }

    pub fn point_lights(&self) -> &BTreeMap<EntityId, PointLight> {
        &self.point_lights
    }
}
