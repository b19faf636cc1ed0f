//! Combat module: здоровье агентов, входящий урон, смерть
//!
//! ECS ответственность:
//! - CombatState (health), apply_damage
//! - принудительный переход в Chasing при уроне
//! - death procedure: release цели → ReplacementSpawnRequested → despawn
//!
//! Внешний слой отвечает за: health bar UI (HealthBarUpdated),
//! respawn (ReplacementSpawnRequested), урон по игроку (AgentStrike).

use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod systems;

// Re-export основных типов
pub use components::{CombatState, DamageResult};
pub use events::{AgentDestroyed, HealthBarUpdated, ReplacementSpawnRequested, TakeDamage};
pub use systems::apply_agent_damage;

use crate::SimulationSet;

/// Combat Plugin
///
/// Урон применяется в FixedUpdate в `SimulationSet::Damage`, то есть до FSM
/// тика: forced Chasing и despawn видны FSM уже в этом тике.
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<TakeDamage>()
            .add_event::<HealthBarUpdated>()
            .add_event::<ReplacementSpawnRequested>()
            .add_event::<AgentDestroyed>();

        app.add_systems(FixedUpdate, apply_agent_damage.in_set(SimulationSet::Damage));
    }
}
