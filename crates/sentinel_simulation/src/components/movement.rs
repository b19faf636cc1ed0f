//! Movement компоненты: выход steering для body/physics слоя

use bevy::prelude::*;

/// Команда движения агента на текущий тик
///
/// Архитектура:
/// - ECS FSM пишет SteeringCommand каждый тик (velocity + heading)
/// - Body/physics слой движка (character body, rigidbody и т.п.) применяет её
/// - Симуляция НЕ читает скорректированную позицию в том же тике
///
/// Headless режим: `integrate_steering` интегрирует команду в Transform.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct SteeringCommand {
    /// Желаемая скорость (м/с, world space)
    pub velocity: Vec3,
    /// Желаемая ориентация (сглаженная через slerp)
    pub heading: Quat,
}

impl Default for SteeringCommand {
    fn default() -> Self {
        Self {
            velocity: Vec3::ZERO,
            heading: Quat::IDENTITY,
        }
    }
}

impl SteeringCommand {
    /// Стоим на месте, ориентацию не трогаем
    pub fn halt(heading: Quat) -> Self {
        Self {
            velocity: Vec3::ZERO,
            heading,
        }
    }

    pub fn is_moving(&self) -> bool {
        self.velocity.length_squared() > 0.0
    }
}
