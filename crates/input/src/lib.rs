//! Input actions and the camera rig controller that turns them into
//! transform updates between frames.

pub mod action;
pub mod controller;

pub use action::{Action, ActionSet, UnknownAction};
pub use controller::{MovementController, PITCH_LIMIT};
