//! Combat events: урон извне, health display, lifecycle смерти

use bevy::prelude::*;

/// Входящий урон по агенту ("takeDamage"). Отправляет внешний атакующий.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct TakeDamage {
    pub agent: Entity,
    pub amount: f32,
}

/// Health bar должен показать новое значение
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct HealthBarUpdated {
    pub agent: Entity,
    pub current: f32,
    pub max: f32,
}

/// Запрос к spawn manager: заменить погибшего агента.
///
/// Отправляется ровно один раз на смерть, до AgentDestroyed.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplacementSpawnRequested {
    pub agent: Entity,
}

/// Агент уничтожен (entity despawn'ится командой в этом же тике)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentDestroyed {
    pub agent: Entity,
}
