//! Frame pipeline: a fixed ring of frame slots, per-frame uniform
//! aggregation and the headless render passes that consume each frame.
//!
//! # Invariants
//! - Frame `n` always uses slot `n % frames_in_flight`.
//! - A slot is written only while `Idle`; it returns to `Idle` only when its
//!   [`FrameToken`] is retired.
//! - At most [`MAX_POINT_LIGHTS`] lights reach the uniform block, the first
//!   ones in entity creation order.
//! - Passes never mutate the registry.

mod camera;
mod clock;
mod error;
mod frame;
mod orchestrator;
mod passes;
mod presenter;
mod ubo;

pub use camera::{Camera, CameraMatrices, DEFAULT_UP};
pub use clock::{FrameClock, FrameInfo, MAX_DELTA_TIME};
pub use error::FrameError;
pub use frame::{FrameRing, FrameSlot, FrameToken, SlotBinding, SlotState};
pub use orchestrator::{FrameContext, FrameOrchestrator, LightAggregate, aggregate};
pub use passes::{
    BillboardPass, DebugTextPass, LightBillboard, MeshDraw, MeshDrawPass, RenderPass,
};
pub use presenter::{FramePresenter, HeadlessPresenter};
pub use ubo::{DEFAULT_AMBIENT, GlobalUbo, MAX_POINT_LIGHTS, PointLightUniform};
