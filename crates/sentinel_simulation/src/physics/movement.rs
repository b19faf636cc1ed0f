//! Kinematic body stand-in для headless режима
//!
//! В игре SteeringCommand исполняет внешний body/physics слой (движок).
//! Headless (runner, тесты) — интегрируем сами:
//! - position += velocity * dt
//! - rotation = heading
//!
//! Детерминизм: fixed timestep, dt = Time<Fixed>::timestep (не delta_secs)

use bevy::prelude::*;

use crate::components::{Agent, SteeringCommand};
use crate::SimulationSet;

/// Система интеграции SteeringCommand → Transform
pub fn integrate_steering(
    mut bodies: Query<(&SteeringCommand, &mut Transform), With<Agent>>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.timestep().as_secs_f32();

    for (command, mut transform) in bodies.iter_mut() {
        if command.is_moving() {
            transform.translation += command.velocity * delta;
        }

        // Проверяем что heading изменился — иначе Changed<Transform> спамит
        if transform.rotation != command.heading {
            transform.rotation = command.heading;
        }
    }
}

/// Plugin для headless body
///
/// Не подключайте вместе с движковым body слоем: оба будут двигать Transform.
pub struct KinematicBodyPlugin;

impl Plugin for KinematicBodyPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, integrate_steering.in_set(SimulationSet::Body));
    }
}
