//! FSM AI components (state machine, config, guarded objective).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// AI FSM состояния охранника
///
/// ConsideringObjective → Walking → ConsideringPatrol → Patrolling → Chasing ⇄ Attacking,
/// плюс возвраты в ConsideringObjective. Смерть — не состояние, а lifecycle event.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub enum AgentState {
    /// Выбираем свободную цель для охраны (начальное состояние после спавна)
    ConsideringObjective,

    /// Идём к выбранной цели на move_speed
    Walking,

    /// Планируем следующую patrol точку вокруг цели
    ConsideringPatrol,

    /// Патрулируем вокруг цели
    Patrolling {
        /// Случайная точка в радиусе патруля (на ground_height).
        /// Живёт только внутри этого состояния.
        patrol_target: Vec3,
    },

    /// Преследуем игрока
    Chasing,

    /// Игрок в радиусе атаки, стоим и атакуем
    Attacking,
}

impl Default for AgentState {
    fn default() -> Self {
        Self::ConsideringObjective
    }
}

impl AgentState {
    pub fn name(&self) -> &'static str {
        match self {
            AgentState::ConsideringObjective => "ConsideringObjective",
            AgentState::Walking => "Walking",
            AgentState::ConsideringPatrol => "ConsideringPatrol",
            AgentState::Patrolling { .. } => "Patrolling",
            AgentState::Chasing => "Chasing",
            AgentState::Attacking => "Attacking",
        }
    }

    /// Агрессивные состояния (игрок обнаружен или агент атакован)
    pub fn is_hostile(&self) -> bool {
        matches!(self, AgentState::Chasing | AgentState::Attacking)
    }
}

/// Non-owning handle на цель, которую агент охраняет
///
/// Claim (Objective::protector) снимается при обнаружении игрока, но handle
/// остаётся: Chasing меряет от него leash-дистанцию.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct GuardedObjective(pub Option<Entity>);

/// Параметры охранника
#[derive(Component, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct AgentConfig {
    /// Скорость подхода к цели (м/с)
    pub move_speed: f32,
    /// Скорость патруля и преследования (м/с)
    pub patrol_speed: f32,
    /// Скорость сглаживания поворота (slerp factor в секунду)
    pub rotation_speed: f32,
    /// Радиус патруля вокруг цели, он же leash для преследования
    pub max_patrol_radius: f32,
    /// Радиус обнаружения игрока во время патруля
    pub detect_range: f32,
    /// Радиус атаки
    pub attack_range: f32,
    /// Урон по игроку (AgentStrike)
    pub attack_damage: f32,
    pub max_health: f32,
    /// Дистанция до цели, на которой заканчиваем подход и начинаем патруль
    pub proximity_threshold: f32,
    /// Patrol точка считается достигнутой ближе этой дистанции
    pub patrol_arrival_tolerance: f32,
    /// Высота, на которую проецируется patrol точка
    pub ground_height: f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            patrol_speed: 0.5,
            rotation_speed: 5.0,
            max_patrol_radius: 5.0,
            detect_range: 2.0,
            attack_range: 1.0,
            attack_damage: 20.0,
            max_health: 100.0,
            proximity_threshold: 5.0,
            patrol_arrival_tolerance: 0.1,
            ground_height: 0.0,
        }
    }
}

impl AgentConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("move_speed", self.move_speed),
            ("patrol_speed", self.patrol_speed),
            ("rotation_speed", self.rotation_speed),
            ("max_patrol_radius", self.max_patrol_radius),
            ("detect_range", self.detect_range),
            ("attack_range", self.attack_range),
            ("attack_damage", self.attack_damage),
            ("proximity_threshold", self.proximity_threshold),
            ("patrol_arrival_tolerance", self.patrol_arrival_tolerance),
        ];

        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid { field, value });
            }
        }

        if !self.ground_height.is_finite() {
            return Err(ConfigError::Invalid {
                field: "ground_height",
                value: self.ground_height,
            });
        }

        if !self.max_health.is_finite() || self.max_health <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "max_health",
                value: self.max_health,
            });
        }

        Ok(())
    }
}
