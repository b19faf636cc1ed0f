//! AI decision-making module
//!
//! FSM охранника цели: выбор цели (scoring), патруль, погоня, атака.
//! - `controller` — чистый переход одного тика (без World)
//! - `systems` — ECS обвязка: senses из мира, effects обратно в мир

use bevy::prelude::*;

pub mod components;
pub mod controller;
pub mod events;
pub mod scoring;
pub mod steering;
pub mod systems;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod controller_tests;

// Re-export основных типов
pub use components::{AgentConfig, AgentState, GuardedObjective};
pub use controller::{step_agent, AgentEffect, AgentFault, AgentSenses, TickOutcome};
pub use events::{AgentStrike, CueKind, PresentationCue};
pub use scoring::{select_best, ObjectiveCandidate, ScoredCandidate};
pub use systems::agent_fsm_tick;

use crate::components::prune_objective_registry;
use crate::SimulationSet;

/// AI Plugin
///
/// Регистрирует AI системы в FixedUpdate для детерминизма.
/// Порядок (через SimulationSet):
/// 1. prune_objective_registry — выкинуть despawned цели из реестра
/// 2. (Damage — CombatPlugin)
/// 3. agent_fsm_tick — переходы + claims + cues + SteeringCommand
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PresentationCue>()
            .add_event::<AgentStrike>();

        app.add_systems(
            FixedUpdate,
            (
                prune_objective_registry.in_set(SimulationSet::Registry),
                agent_fsm_tick.in_set(SimulationSet::Decision),
            ),
        );
    }
}
