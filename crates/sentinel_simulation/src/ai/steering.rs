//! Steering: прямолинейный seek к точке + сглаженный поворот
//!
//! Чистые функции: читают только аргументы, результат (SteeringCommand)
//! применяет body/physics слой. Obstacle avoidance нет.

use bevy::prelude::*;

use crate::components::SteeringCommand;

/// Ориентация "смотрим вдоль direction" (forward = -Z, up = Y, как в Bevy).
///
/// None для нулевого направления: смотреть некуда.
pub fn look_rotation(direction: Vec3) -> Option<Quat> {
    if direction.length_squared() <= f32::EPSILON {
        return None;
    }

    Some(Transform::IDENTITY.looking_to(direction, Vec3::Y).rotation)
}

/// Seek к target_position со скоростью speed
///
/// - velocity = normalize(target - self) * speed (ноль если target == self)
/// - heading = slerp(self_heading, look_rotation, rotation_speed * delta), t ∈ [0, 1]
pub fn seek(
    self_position: Vec3,
    self_heading: Quat,
    target_position: Vec3,
    speed: f32,
    rotation_speed: f32,
    delta: f32,
) -> SteeringCommand {
    let to_target = target_position - self_position;
    let velocity = to_target.normalize_or_zero() * speed;

    let heading = match look_rotation(to_target) {
        Some(desired) => {
            let t = (rotation_speed * delta).clamp(0.0, 1.0);
            self_heading.slerp(desired, t)
        }
        None => self_heading,
    };

    SteeringCommand { velocity, heading }
}
