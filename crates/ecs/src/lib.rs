//! Entity registry with sparse, id-keyed component storage.
//!
//! Each component kind lives in its own `BTreeMap` keyed by `EntityId`.
//!
//! # Invariants
//! - Entity ids are monotonically increasing and never reused.
//! - An entity carries at most one component of each kind; adding another
//!   replaces the stored value.
//! - Iteration follows creation order.

mod components;
mod error;
mod registry;
mod store;

pub use components::{Component, ComponentKind, MeshRef, PointLight};
pub use error::EcsError;
pub use registry::{EntityRecord, LightView, Registry};
pub use store::ComponentStore;
