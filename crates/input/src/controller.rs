use std::f32::consts::TAU;

use glam::Vec3;
use lumen_common::Transform;

use crate::action::{Action, ActionSet};

/// Pitch limit in radians, just short of straight up or down.
pub const PITCH_LIMIT: f32 = 1.5;

/// First-person rig controller that keeps movement in the XZ plane.
///
/// Yaw is `rotation.y`, pitch is `rotation.x`. World up is `-Y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementController {
    /// Units per second.
    pub move_speed: f32,
    /// Radians per second.
    pub look_speed: f32,
}

impl Default for MovementController {
    fn default() -> Self {
        Self {
            move_speed: 3.0,
            look_speed: 1.5,
        }
    }
}

impl MovementController {
    pub fn new(move_speed: f32, look_speed: f32) -> Self {
        Self {
            move_speed,
            look_speed,
        }
    }

    /// Apply one frame of `actions` to `transform`.
    ///
    /// Opposing actions cancel. Diagonal input is normalized so it is no
    /// faster than a single direction.
    pub fn move_in_plane_xz(&self, actions: ActionSet, dt: f32, transform: &mut Transform) {
        let mut rotate = Vec3::ZERO;
        if actions.contains(Action::LookRight) {
            rotate.y += 1.0;
        }
        if actions.contains(Action::LookLeft) {
            rotate.y -= 1.0;
        }
        if actions.contains(Action::LookUp) {
            rotate.x += 1.0;
        }
        if actions.contains(Action::LookDown) {
            rotate.x -= 1.0;
        }
        if rotate.length_squared() > f32::EPSILON {
            transform.rotation += self.look_speed * dt * rotate.normalize();
        }

        transform.rotation.x = transform.rotation.x.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        transform.rotation.y = transform.rotation.y.rem_euclid(TAU);

        let yaw = transform.rotation.y;
        let forward = Vec3::new(yaw.sin(), 0.0, yaw.cos());
        let right = Vec3::new(forward.z, 0.0, -forward.x);
        let up = Vec3::new(0.0, -1.0, 0.0);

        let mut direction = Vec3::ZERO;
        if actions.contains(Action::MoveForward) {
            direction += forward;
        }
        if actions.contains(Action::MoveBackward) {
            direction -= forward;
        }
        if actions.contains(Action::MoveRight) {
            direction += right;
        }
        if actions.contains(Action::MoveLeft) {
            direction -= right;
        }
        if actions.contains(Action::MoveUp) {
            direction += up;
        }
        if actions.contains(Action::MoveDown) {
            direction -= up;
        }
        if direction.length_squared() > f32::EPSILON {
            transform.position += self.move_speed * dt * direction.normalize();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(actions: &[Action], dt: f32, transform: &mut Transform) {
        let set: ActionSet = actions.iter().copied().collect();
        MovementController::default().move_in_plane_xz(set, dt, transform);
    }

    #[test]
    fn forward_follows_yaw() {
        let mut t = Transform::default();
        step(&[Action::MoveForward], 1.0, &mut t);
        assert!(t.position.abs_diff_eq(Vec3::new(0.0, 0.0, 3.0), 1e-6));

        let mut turned = Transform::default();
        turned.rotation.y = std::f32::consts::FRAC_PI_2;
        step(&[Action::MoveForward], 1.0, &mut turned);
        assert!(turned.position.abs_diff_eq(Vec3::new(3.0, 0.0, 0.0), 1e-5));
    }

    #[test]
    fn up_is_negative_y() {
        let mut t = Transform::default();
        step(&[Action::MoveUp], 0.5, &mut t);
        assert!(t.position.abs_diff_eq(Vec3::new(0.0, -1.5, 0.0), 1e-6));
    }

    #[test]
    fn diagonal_moves_at_single_axis_speed() {
        let mut t = Transform::default();
        step(&[Action::MoveForward, Action::MoveRight], 1.0, &mut t);
        assert!((t.position.length() - 3.0).abs() < 1e-5);
        assert_eq!(t.position.y, 0.0);
    }

    #[test]
    fn opposing_actions_cancel() {
        let mut t = Transform::default();
        step(
            &[Action::MoveForward, Action::MoveBackward, Action::LookLeft, Action::LookRight],
            1.0,
            &mut t,
        );
        assert_eq!(t, Transform::default());
    }

    #[test]
    fn pitch_is_clamped_and_yaw_wrapped() {
        let mut t = Transform::default();
        for _ in 0..100 {
            step(&[Action::LookUp], 0.1, &mut t);
        }
        assert_eq!(t.rotation.x, PITCH_LIMIT);

        let mut spun = Transform::default();
        step(&[Action::LookLeft], 0.1, &mut spun);
        assert!(spun.rotation.y > 0.0 && spun.rotation.y < TAU);
        assert!((spun.rotation.y - (TAU - 0.15)).abs() < 1e-5);
    }

    #[test]
    fn idle_frame_changes_nothing() {
        let mut t = Transform::from_position(Vec3::new(1.0, 2.0, 3.0));
        step(&[], 0.016, &mut t);
        assert_eq!(t.position, Vec3::new(1.0, 2.0, 3.0));
    }
}
