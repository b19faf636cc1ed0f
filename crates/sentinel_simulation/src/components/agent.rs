//! Agent marker: охранник целей под управлением FSM

use bevy::prelude::*;

use crate::ai::{AgentConfig, AgentState, GuardedObjective};
use crate::combat::CombatState;
use crate::components::SteeringCommand;

/// Охранник (NPC) — entity, которым управляет agent FSM
///
/// Автоматически добавляет FSM state, handle цели, конфиг, здоровье и
/// steering выход через Required Components.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(AgentState, GuardedObjective, AgentConfig, CombatState, SteeringCommand, Transform)]
pub struct Agent;

/// Bundle нового агента: полное здоровье из конфига, ConsideringObjective
pub fn agent_bundle(position: Vec3, config: AgentConfig) -> impl Bundle {
    (
        Agent,
        Transform::from_translation(position),
        CombatState::new(config.max_health),
        config,
    )
}

pub fn spawn_agent(world: &mut World, position: Vec3, config: AgentConfig) -> Entity {
    let entity = world.spawn(agent_bundle(position, config)).id();
    crate::log(&format!("Agent: spawned {:?} at {:?}", entity, position));
    entity
}
