use std::collections::BTreeMap;

use glam::Vec3;
use lumen_common::{EntityId, Transform};
use tracing::debug;

use crate::components::{Component, ComponentKind, MeshRef, PointLight};
use crate::error::EcsError;
use crate::store::ComponentStore;

/// Per-entity data that is not a component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityRecord {
    pub color: Vec3,
}

impl Default for EntityRecord {
    fn default() -> Self {
        Self { color: Vec3::ZERO }
    }
}

/// Owns every entity and its components.
///
/// Ids are handed out from a counter that only grows; there is no removal
/// path, so an id never refers to a different entity over the registry's
/// lifetime.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    next_id: u64,
    entities: BTreeMap<EntityId, EntityRecord>,
    components: ComponentStore,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_entity(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.entities.insert(id, EntityRecord::default());
        id
    }

    /// New entity carrying a default `PointLight` and a default `Transform`.
    pub fn create_point_light_entity(&mut self) -> EntityId {
        let id = self.create_entity();
        self.components.set_transform(id, Transform::default());
        self.components.set_point_light(id, PointLight::default());
        if let Some(record) = self.entities.get_mut(&id) {
            record.color = Vec3::ONE;
        }
        id
    }

    /// Point light with explicit parameters. The radius is stored as the
    /// transform's x scale.
    pub fn create_point_light(&mut self, intensity: f32, radius: f32, color: Vec3) -> EntityId {
        let id = self.create_entity();
        self.components
            .set_transform(id, Transform::default().with_scale(Vec3::new(radius, 1.0, 1.0)));
        self.components.set_point_light(id, PointLight { intensity });
        if let Some(record) = self.entities.get_mut(&id) {
            record.color = color;
        }
        id
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Attach `component`, replacing any component of the same kind.
    /// Returns the replaced value.
    pub fn add_component(
        &mut self,
        id: EntityId,
        component: impl Into<Component>,
    ) -> Result<Option<Component>, EcsError> {
        if !self.contains(id) {
            return Err(EcsError::UnknownEntity(id));
        }
        let component = component.into();
        let kind = component.kind();
        let replaced = self.components.insert(id, component);
        if replaced.is_some() {
            debug!(entity = %id, %kind, "component replaced");
        }
        Ok(replaced)
    }

    pub fn has_component(&self, id: EntityId, kind: ComponentKind) -> bool {
        self.components.contains(id, kind)
    }

    pub fn transform(&self, id: EntityId) -> Result<&Transform, EcsError> {
        self.components
            .get_transform(id)
            .ok_or_else(|| self.absent(id, ComponentKind::Transform))
    }

    pub fn transform_mut(&mut self, id: EntityId) -> Result<&mut Transform, EcsError> {
        let err = self.absent(id, ComponentKind::Transform);
        self.components.get_transform_mut(id).ok_or(err)
    }

    pub fn mesh(&self, id: EntityId) -> Result<&MeshRef, EcsError> {
        self.components
            .get_mesh(id)
            .ok_or_else(|| self.absent(id, ComponentKind::Mesh))
    }

    pub fn point_light(&self, id: EntityId) -> Result<&PointLight, EcsError> {
        self.components
            .get_point_light(id)
            .ok_or_else(|| self.absent(id, ComponentKind::PointLight))
    }

    pub fn point_light_mut(&mut self, id: EntityId) -> Result<&mut PointLight, EcsError> {
        let err = self.absent(id, ComponentKind::PointLight);
        self.components.get_point_light_mut(id).ok_or(err)
    }

    fn absent(&self, id: EntityId, kind: ComponentKind) -> EcsError {
        if self.contains(id) {
            EcsError::ComponentAbsent { entity: id, kind }
        } else {
            EcsError::UnknownEntity(id)
        }
    }

    pub fn color(&self, id: EntityId) -> Result<Vec3, EcsError> {
        self.entities
            .get(&id)
            .map(|r| r.color)
            .ok_or(EcsError::UnknownEntity(id))
    }

    pub fn set_color(&mut self, id: EntityId, color: Vec3) -> Result<(), EcsError> {
        let record = self.entities.get_mut(&id).ok_or(EcsError::UnknownEntity(id))?;
        record.color = color;
        Ok(())
    }

    /// All entities in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &EntityRecord)> + '_ {
        self.entities.iter().map(|(id, record)| (*id, record))
    }

    /// Entities with both a `Transform` and a `PointLight`, in creation order.
    pub fn point_lights(&self) -> impl Iterator<Item = LightView<'_>> + '_ {
        self.components
            .point_lights()
            .iter()
            .filter_map(move |(id, light)| {
                let transform = self.components.get_transform(*id)?;
                let color = self.entities.get(id)?.color;
                Some(LightView {
                    entity: *id,
                    transform,
                    light,
                    color,
                })
            })
    }

    /// Entities with both a `Transform` and a mesh, in creation order.
    pub fn renderables(&self) -> impl Iterator<Item = (EntityId, &Transform, &MeshRef)> + '_ {
        self.components.meshes().iter().filter_map(move |(id, mesh)| {
            let transform = self.components.get_transform(*id)?;
            Some((*id, transform, mesh))
        })
    }

    pub fn components(&self) -> &ComponentStore {
        &self.components
    }
}

/// A point light entity joined with its transform and color.
#[derive(Debug, Clone, Copy)]
pub struct LightView<'a> {
    pub entity: EntityId,
    pub transform: &'a Transform,
    pub light: &'a PointLight,
    pub color: Vec3,
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_common::Shape;
    use lumen_geometry::{MeshHandle, generate};

    #[test]
    fn ids_are_monotonic() {
        let mut reg = Registry::new();
        let a = reg.create_entity();
        let b = reg.create_entity();
        let c = reg.create_point_light_entity();
        assert!(a < b && b < c);
        assert_eq!(reg.len(), 3);
    }

    #[test]
    fn second_component_of_a_kind_replaces_the_first() {
        let mut reg = Registry::new();
        let id = reg.create_entity();
        reg.add_component(id, Transform::from_position(Vec3::X)).unwrap();
        let replaced = reg
            .add_component(id, Transform::from_position(Vec3::Y))
            .unwrap();
        assert!(matches!(replaced, Some(Component::Transform(t)) if t.position == Vec3::X));
        assert!(reg.has_component(id, ComponentKind::Transform));
        assert_eq!(reg.transform(id).unwrap().position, Vec3::Y);
        assert_eq!(reg.components().transforms().len(), 1);
    }

    #[test]
    fn missing_component_is_an_error() {
        let mut reg = Registry::new();
        let id = reg.create_entity();
        assert_eq!(
            reg.mesh(id).unwrap_err(),
            EcsError::ComponentAbsent {
                entity: id,
                kind: ComponentKind::Mesh
            }
        );
        assert!(matches!(
            reg.point_light_mut(id),
            Err(EcsError::ComponentAbsent { .. })
        ));
        assert!(!reg.has_component(id, ComponentKind::PointLight));
    }

    #[test]
    fn unknown_entity_is_reported() {
        let mut reg = Registry::new();
        let ghost = EntityId(42);
        assert_eq!(reg.transform(ghost).unwrap_err(), EcsError::UnknownEntity(ghost));
        assert_eq!(
            reg.add_component(ghost, PointLight::default()).unwrap_err(),
            EcsError::UnknownEntity(ghost)
        );
        assert!(reg.set_color(ghost, Vec3::ONE).is_err());
    }

    #[test]
    fn point_light_entity_has_defaults() {
        let mut reg = Registry::new();
        let id = reg.create_point_light_entity();
        assert!(reg.has_component(id, ComponentKind::Transform));
        assert!(reg.has_component(id, ComponentKind::PointLight));
        assert!(!reg.has_component(id, ComponentKind::Mesh));
        assert_eq!(*reg.transform(id).unwrap(), Transform::default());
        assert_eq!(*reg.point_light(id).unwrap(), PointLight::default());
    }

    #[test]
    fn explicit_point_light_keeps_radius_and_color() {
        let mut reg = Registry::new();
        let color = Vec3::new(1.0, 0.1, 0.1);
        let id = reg.create_point_light(0.2, 0.05, color);
        assert_eq!(reg.transform(id).unwrap().scale.x, 0.05);
        assert_eq!(reg.point_light(id).unwrap().intensity, 0.2);
        assert_eq!(reg.color(id).unwrap(), color);
    }

    #[test]
    fn point_lights_need_a_transform_and_keep_creation_order() {
        let mut reg = Registry::new();
        let first = reg.create_point_light_entity();
        let bare = reg.create_entity();
        reg.add_component(bare, PointLight { intensity: 3.0 }).unwrap();
        let second = reg.create_point_light_entity();

        let ids: Vec<EntityId> = reg.point_lights().map(|v| v.entity).collect();
        assert_eq!(ids, vec![first, second]);
    }

    #[test]
    fn renderables_share_meshes() {
        let mut reg = Registry::new();
        let mesh = MeshHandle::new(generate(Shape::Cube, 1).unwrap());
        for _ in 0..3 {
            let id = reg.create_entity();
            reg.add_component(id, Transform::default()).unwrap();
            reg.add_component(id, mesh.clone()).unwrap();
        }
        let loner = reg.create_entity();
        reg.add_component(loner, mesh.clone()).unwrap();

        assert_eq!(reg.renderables().count(), 3);
        for (_, _, m) in reg.renderables() {
            assert!(MeshHandle::ptr_eq(m.handle(), &mesh));
            assert_eq!(m.index_count(), 36);
        }
    }

    #[test]
    fn iteration_is_insertion_ordered() {
        let mut reg = Registry::new();
        let ids: Vec<EntityId> = (0..5).map(|_| reg.create_entity()).collect();
        let seen: Vec<EntityId> = reg.iter().map(|(id, _)| id).collect();
        assert_eq!(seen, ids);
    }
}
