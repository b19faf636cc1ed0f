//! Damage and death systems.

use bevy::prelude::*;

use crate::ai::{AgentState, GuardedObjective};
use crate::combat::{AgentDestroyed, CombatState, HealthBarUpdated, ReplacementSpawnRequested, TakeDamage};
use crate::components::{Agent, Objective};

/// Система: применение TakeDamage к агентам
///
/// Для каждого события атомарно (в одной системе, до FSM тика):
/// 1. CombatState::apply_damage
/// 2. HealthBarUpdated
/// 3. Принудительный переход в Chasing (атакованный агент всегда агрессивен)
/// 4. При смерти: release claim → ReplacementSpawnRequested → AgentDestroyed → despawn
///
/// Урон по уже мёртвому в этом тике агенту игнорируется (замена запрашивается один раз).
pub fn apply_agent_damage(
    mut commands: Commands,
    mut damage_events: EventReader<TakeDamage>,
    mut agents: Query<(&mut CombatState, &mut AgentState, &GuardedObjective), With<Agent>>,
    mut objectives: Query<&mut Objective>,
    mut health_bar_events: EventWriter<HealthBarUpdated>,
    mut spawn_requests: EventWriter<ReplacementSpawnRequested>,
    mut destroyed_events: EventWriter<AgentDestroyed>,
) {
    for event in damage_events.read() {
        let Ok((mut health, mut state, guarded)) = agents.get_mut(event.agent) else {
            crate::log_warning(&format!(
                "Damage: target {:?} is not an agent (or already despawned)",
                event.agent
            ));
            continue;
        };

        if !health.is_alive() {
            continue;
        }

        let result = health.apply_damage(event.amount);

        health_bar_events.write(HealthBarUpdated {
            agent: event.agent,
            current: result.new_health,
            max: health.max,
        });

        if *state != AgentState::Chasing {
            crate::log(&format!(
                "AI: {:?} {} → Chasing (took {} damage)",
                event.agent,
                state.name(),
                event.amount
            ));
        }
        *state = AgentState::Chasing;

        if !result.is_dead {
            continue;
        }

        // Смерть: цель снова свободна
        if let Some(objective) = guarded.0 {
            if let Ok(mut objective_state) = objectives.get_mut(objective) {
                objective_state.release_by(event.agent);
            }
        }

        spawn_requests.write(ReplacementSpawnRequested { agent: event.agent });
        destroyed_events.write(AgentDestroyed { agent: event.agent });
        commands.entity(event.agent).despawn();

        crate::log_info(&format!(
            "⚰️ Agent {:?} died (health {}), replacement requested",
            event.agent, result.new_health
        ));
    }
}
