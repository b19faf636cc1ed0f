//! FSM AI systems (per-tick decision + effect application).

use bevy::prelude::*;

use crate::ai::controller::{step_agent, AgentEffect, AgentSenses};
use crate::ai::scoring::ObjectiveCandidate;
use crate::ai::{AgentConfig, AgentState, AgentStrike, GuardedObjective, PresentationCue};
use crate::components::{Agent, Objective, ObjectiveRegistry, Player, SteeringCommand};
use crate::DeterministicRng;

/// Система: agent FSM tick
///
/// Для каждого агента:
/// 1. Собираем senses (позиция, цель, игрок, snapshot свободных целей)
/// 2. `step_agent` — чистый переход
/// 3. Применяем effects: claim/release Objective::protector, cues, strikes
/// 4. Пишем SteeringCommand для body слоя
///
/// Claim contention: агенты обрабатываются последовательно, snapshot целей
/// строится заново для каждого агента из живых Objective компонентов,
/// поэтому claim предыдущего агента виден следующему в этом же тике.
pub fn agent_fsm_tick(
    mut agents: Query<
        (
            Entity,
            &Transform,
            &mut AgentState,
            &mut GuardedObjective,
            &AgentConfig,
            &mut SteeringCommand,
        ),
        With<Agent>,
    >,
    mut objectives: Query<(&mut Objective, &Transform), Without<Agent>>,
    players: Query<&Transform, (With<Player>, Without<Agent>)>,
    registry: Res<ObjectiveRegistry>,
    mut rng: ResMut<DeterministicRng>,
    time: Res<Time<Fixed>>,
    mut cue_events: EventWriter<PresentationCue>,
    mut strike_events: EventWriter<AgentStrike>,
) {
    let delta = time.timestep().as_secs_f32();
    let player_position = players.single().ok().map(|t| t.translation);

    for (agent, transform, mut state, mut guarded, config, mut steering) in agents.iter_mut() {
        let candidates: Vec<ObjectiveCandidate> = registry
            .iter()
            .filter_map(|objective| {
                objectives.get(objective).ok().map(|(target, t)| ObjectiveCandidate {
                    objective,
                    position: t.translation,
                    protector: target.protector,
                })
            })
            .collect();

        let guarded_position = guarded
            .0
            .and_then(|objective| objectives.get(objective).ok())
            .map(|(_, t)| t.translation);

        let senses = AgentSenses {
            agent,
            position: transform.translation,
            heading: transform.rotation,
            guarded_position,
            player_position,
            candidates: &candidates,
            delta,
        };

        let mut next_state = *state;
        let mut next_guarded = *guarded;
        let outcome = step_agent(&mut next_state, &mut next_guarded, &senses, config, &mut rng.rng);

        for fault in &outcome.faults {
            crate::log_with_level(fault.log_level(), &fault.to_string());
        }

        for effect in &outcome.effects {
            match *effect {
                AgentEffect::Claim(objective) => {
                    let claimed = objectives
                        .get_mut(objective)
                        .map(|(mut target, _)| target.try_claim(agent))
                        .unwrap_or(false);

                    if claimed {
                        crate::log(&format!("🪙 {:?} claimed objective {:?}", agent, objective));
                    } else {
                        // Не должно случаться при последовательной обработке
                        crate::log_warning(&format!(
                            "{:?} lost claim race for {:?}, reconsidering",
                            agent, objective
                        ));
                        next_guarded.0 = None;
                        next_state = AgentState::ConsideringObjective;
                    }
                }
                AgentEffect::Release(objective) => {
                    if let Ok((mut target, _)) = objectives.get_mut(objective) {
                        if target.release_by(agent) {
                            crate::log(&format!("{:?} released objective {:?}", agent, objective));
                        }
                    }
                }
                AgentEffect::Cue(cue) => {
                    cue_events.write(PresentationCue { agent, cue });
                }
                AgentEffect::Strike { damage } => {
                    strike_events.write(AgentStrike {
                        attacker: agent,
                        damage,
                    });
                }
            }
        }

        if *state != next_state {
            crate::log(&format!("AI: {:?} {} → {}", agent, state.name(), next_state.name()));
            *state = next_state;
        }

        if *guarded != next_guarded {
            *guarded = next_guarded;
        }

        if *steering != outcome.steering {
            *steering = outcome.steering;
        }
    }
}
