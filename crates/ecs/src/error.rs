use lumen_common::EntityId;
use thiserror::Error;

use crate::components::ComponentKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EcsError {
    #[error("entity {entity} has no {kind} component")]
    ComponentAbsent { entity: EntityId, kind: ComponentKind },
    #[error("entity {0} does not exist")]
    UnknownEntity(EntityId),
}
