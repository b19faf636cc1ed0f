//! AI Events — сигналы от FSM наружу (presentation + combat слой)
//!
//! Все события fire-and-forget: подтверждений не ждём, дубликаты безвредны.

use bevy::prelude::*;

/// Presentation cue (animation trigger на стороне движка)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum CueKind {
    Move,
    Attack,
}

impl CueKind {
    /// Имя trigger'а в animator
    pub fn trigger_name(&self) -> &'static str {
        match self {
            CueKind::Move => "Move",
            CueKind::Attack => "Attack",
        }
    }
}

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PresentationCue {
    pub agent: Entity,
    pub cue: CueKind,
}

/// Удар по игроку: отправляется при входе в Attacking вместе с Attack cue.
///
/// Урон игроку применяет внешний combat слой (у игрока нет CombatState здесь).
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct AgentStrike {
    pub attacker: Entity,
    pub damage: f32,
}
