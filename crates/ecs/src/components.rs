use std::ops::Deref;

use lumen_common::Transform;
use lumen_geometry::{Mesh, MeshHandle};

/// Shared reference to the mesh an entity draws with. Set once at creation.
#[derive(Debug, Clone)]
pub struct MeshRef(pub MeshHandle);

impl MeshRef {
    pub fn handle(&self) -> &MeshHandle {
        &self.0
    }
}

impl Deref for MeshRef {
    type Target = Mesh;

    fn deref(&self) -> &Mesh {
        &self.0
    }
}

impl From<MeshHandle> for MeshRef {
    fn from(handle: MeshHandle) -> Self {
        Self(handle)
    }
}

/// Point light parameters. Position comes from the entity's transform and
/// color from the entity's color attribute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub intensity: f32,
}

impl Default for PointLight {
    fn default() -> Self {
        Self { intensity: 1.0 }
    }
}

/// The kinds of component an entity can carry, at most one of each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Transform,
    Mesh,
    PointLight,
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ComponentKind::Transform => "transform",
            ComponentKind::Mesh => "mesh",
            ComponentKind::PointLight => "point light",
        };
        f.write_str(name)
    }
}

/// A component value tagged with its kind.
#[derive(Debug, Clone)]
pub enum Component {
    Transform(Transform),
    Mesh(MeshRef),
    PointLight(PointLight),
}

impl Component {
    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::Transform(_) => ComponentKind::Transform,
            Component::Mesh(_) => ComponentKind::Mesh,
            Component::PointLight(_) => ComponentKind::PointLight,
        }
    }
}

impl From<Transform> for Component {
    fn from(t: Transform) -> Self {
        Component::Transform(t)
    }
}

impl From<MeshRef> for Component {
    fn from(m: MeshRef) -> Self {
        Component::Mesh(m)
    }
}

impl From<MeshHandle> for Component {
    fn from(m: MeshHandle) -> Self {
        Component::Mesh(MeshRef(m))
    }
}

impl From<PointLight> for Component {
    fn from(l: PointLight) -> Self {
        Component::PointLight(l)
    }
}
