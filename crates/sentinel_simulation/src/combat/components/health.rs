//! Health компонент охранника

use bevy::prelude::*;

/// Результат применения урона
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageResult {
    pub new_health: f32,
    pub is_dead: bool,
}

/// Здоровье агента
///
/// Инвариант: current ≤ max. Нижней границы нет: в тике смерти current
/// может уйти в минус, агент всё равно уничтожается.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct CombatState {
    pub current: f32,
    pub max: f32,
}

impl Default for CombatState {
    fn default() -> Self {
        Self::new(100.0) // Default 100 HP
    }
}

impl CombatState {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    /// Доля здоровья для health bar (0..=1)
    pub fn fraction(&self) -> f32 {
        (self.current / self.max).clamp(0.0, 1.0)
    }

    /// Применить урон. Отрицательный урон не лечит выше max.
    pub fn apply_damage(&mut self, amount: f32) -> DamageResult {
        self.current = (self.current - amount).min(self.max);

        DamageResult {
            new_health: self.current,
            is_dead: self.current <= 0.0,
        }
    }
}
