//! Agent controller — один тик FSM охранника
//!
//! Чистая функция над (state, guarded handle, senses, config, rng):
//! - мир не трогает, только возвращает TickOutcome (steering + effects)
//! - ECS система (`agent_fsm_tick`) собирает senses и применяет effects
//!
//! Переходы (первый сработавший guard в строке выигрывает):
//! - any: цель пропала (или handle пуст) → ConsideringObjective
//! - ConsideringObjective: scorer нашёл цель → claim + Move cue → Walking
//! - Walking: ≤ proximity_threshold → ConsideringPatrol, иначе seek(move_speed)
//! - ConsideringPatrol: случайная точка вокруг цели → Patrolling
//! - Patrolling: игрок ≤ detect_range → release → Chasing;
//!   точка достигнута → ConsideringPatrol; иначе seek(patrol_speed)
//! - Chasing: цель ≥ max_patrol_radius → ConsideringObjective;
//!   игрок ≤ attack_range → Attack cue → Attacking; иначе seek + Move cue
//! - Attacking: игрок > attack_range → Move cue → Chasing; иначе стоим

use bevy::prelude::*;
use rand::Rng;
use thiserror::Error;

use crate::ai::events::CueKind;
use crate::ai::scoring::{select_best, ObjectiveCandidate};
use crate::ai::steering::seek;
use crate::ai::{AgentConfig, AgentState, GuardedObjective};
use crate::components::SteeringCommand;
use crate::logger::LogLevel;

/// Диагностика тика. Не ошибка процесса: каждое условие поглощается переходом.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AgentFault {
    #[error("agent {agent:?}: guarded objective is gone, reconsidering")]
    MissingObjective { agent: Entity },

    #[error("agent {agent:?}: no objective available")]
    NoCandidates { agent: Entity },

    #[error("agent {agent:?}: player not found")]
    MissingPlayer { agent: Entity },
}

impl AgentFault {
    /// NoCandidates — штатное ожидание, остальное стоит видеть в логах
    pub fn log_level(&self) -> LogLevel {
        match self {
            AgentFault::NoCandidates { .. } => LogLevel::Debug,
            AgentFault::MissingObjective { .. } | AgentFault::MissingPlayer { .. } => {
                LogLevel::Warning
            }
        }
    }
}

/// Что агент "видит" в начале тика (snapshot, в течение тика не меняется)
#[derive(Debug, Clone, Copy)]
pub struct AgentSenses<'a> {
    pub agent: Entity,
    pub position: Vec3,
    pub heading: Quat,
    /// Позиция охраняемой цели; None если handle пуст или цель уничтожена
    pub guarded_position: Option<Vec3>,
    pub player_position: Option<Vec3>,
    /// Цели в порядке реестра
    pub candidates: &'a [ObjectiveCandidate],
    pub delta: f32,
}

impl AgentSenses<'_> {
    fn player_distance(&self) -> Option<f32> {
        self.player_position.map(|p| p.distance(self.position))
    }
}

/// Side effects тика, применяются вызывающим в порядке следования
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AgentEffect {
    /// Выставить Objective::protector = agent
    Claim(Entity),
    /// Снять protector, если он указывает на этого агента
    Release(Entity),
    Cue(CueKind),
    Strike { damage: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    pub steering: SteeringCommand,
    pub effects: Vec<AgentEffect>,
    pub faults: Vec<AgentFault>,
}

impl TickOutcome {
    fn halt(heading: Quat) -> Self {
        Self {
            steering: SteeringCommand::halt(heading),
            effects: Vec::new(),
            faults: Vec::new(),
        }
    }
}

/// Один тик FSM
pub fn step_agent(
    state: &mut AgentState,
    guarded: &mut GuardedObjective,
    senses: &AgentSenses,
    config: &AgentConfig,
    rng: &mut impl Rng,
) -> TickOutcome {
    let mut outcome = TickOutcome::halt(senses.heading);

    // any: цель подобрали / уничтожили → выбираем заново в этом же тике
    let objective_position = match senses.guarded_position {
        Some(position) => position,
        None => {
            // Fault только если handle был и цель пропала; без handle просто выбираем
            if guarded.0.take().is_some() {
                outcome.faults.push(AgentFault::MissingObjective {
                    agent: senses.agent,
                });
            }
            *state = AgentState::ConsideringObjective;
            consider_objective(state, guarded, senses, &mut outcome);
            return outcome;
        }
    };

    match *state {
        // handle здесь пуст: abandon_pursuit, lost claim и spawn его сбрасывают
        AgentState::ConsideringObjective => {
            consider_objective(state, guarded, senses, &mut outcome);
        }

        AgentState::Walking => {
            if senses.position.distance(objective_position) <= config.proximity_threshold {
                *state = AgentState::ConsideringPatrol;
            } else {
                outcome.steering = seek(
                    senses.position,
                    senses.heading,
                    objective_position,
                    config.move_speed,
                    config.rotation_speed,
                    senses.delta,
                );
            }
        }

        AgentState::ConsideringPatrol => {
            *state = AgentState::Patrolling {
                patrol_target: sample_patrol_target(objective_position, config, rng),
            };
        }

        AgentState::Patrolling { patrol_target } => {
            let player_detected = senses
                .player_distance()
                .is_some_and(|d| d <= config.detect_range);

            if player_detected {
                if let Some(objective) = guarded.0 {
                    outcome.effects.push(AgentEffect::Release(objective));
                }
                *state = AgentState::Chasing;
            } else if senses.position.distance(patrol_target) <= config.patrol_arrival_tolerance {
                *state = AgentState::ConsideringPatrol;
            } else {
                outcome.steering = seek(
                    senses.position,
                    senses.heading,
                    patrol_target,
                    config.patrol_speed,
                    config.rotation_speed,
                    senses.delta,
                );
            }
        }

        AgentState::Chasing => {
            if senses.position.distance(objective_position) >= config.max_patrol_radius {
                abandon_pursuit(state, guarded, &mut outcome);
            } else {
                match senses.player_position {
                    None => {
                        outcome.faults.push(AgentFault::MissingPlayer {
                            agent: senses.agent,
                        });
                        abandon_pursuit(state, guarded, &mut outcome);
                    }
                    Some(player) if player.distance(senses.position) <= config.attack_range => {
                        outcome.effects.push(AgentEffect::Cue(CueKind::Attack));
                        outcome.effects.push(AgentEffect::Strike {
                            damage: config.attack_damage,
                        });
                        *state = AgentState::Attacking;
                    }
                    Some(player) => {
                        outcome.steering = seek(
                            senses.position,
                            senses.heading,
                            player,
                            config.patrol_speed,
                            config.rotation_speed,
                            senses.delta,
                        );
                        outcome.effects.push(AgentEffect::Cue(CueKind::Move));
                    }
                }
            }
        }

        AgentState::Attacking => {
            let in_range = senses
                .player_distance()
                .is_some_and(|d| d <= config.attack_range);

            if !in_range {
                if senses.player_position.is_none() {
                    outcome.faults.push(AgentFault::MissingPlayer {
                        agent: senses.agent,
                    });
                }
                outcome.effects.push(AgentEffect::Cue(CueKind::Move));
                *state = AgentState::Chasing;
            }
        }
    }

    outcome
}

fn consider_objective(
    state: &mut AgentState,
    guarded: &mut GuardedObjective,
    senses: &AgentSenses,
    outcome: &mut TickOutcome,
) {
    match select_best(senses.position, senses.candidates) {
        Some(best) => {
            guarded.0 = Some(best.objective);
            outcome.effects.push(AgentEffect::Claim(best.objective));
            outcome.effects.push(AgentEffect::Cue(CueKind::Move));
            *state = AgentState::Walking;
        }
        None => {
            outcome.faults.push(AgentFault::NoCandidates {
                agent: senses.agent,
            });
        }
    }
}

/// Слишком далеко от цели (или игрока нет): бросаем погоню, отпускаем claim
fn abandon_pursuit(state: &mut AgentState, guarded: &mut GuardedObjective, outcome: &mut TickOutcome) {
    if let Some(objective) = guarded.0.take() {
        outcome.effects.push(AgentEffect::Release(objective));
    }
    *state = AgentState::ConsideringObjective;
}

/// Случайная patrol точка вокруг цели
///
/// Направление равномерно на единичной сфере, затем проекция на плоскость
/// земли (Y отбрасывается, длина ≤ 1). Радиус равномерно в [0, max_patrol_radius].
pub fn sample_patrol_target(center: Vec3, config: &AgentConfig, rng: &mut impl Rng) -> Vec3 {
    let y: f32 = rng.gen_range(-1.0..=1.0);
    let azimuth = rng.gen::<f32>() * std::f32::consts::TAU;
    let ring = (1.0 - y * y).max(0.0).sqrt();
    let direction = Vec3::new(ring * azimuth.cos(), 0.0, ring * azimuth.sin());

    let radius = rng.gen::<f32>() * config.max_patrol_radius;

    let mut target = center + direction * radius;
    target.y = config.ground_height;
    target
}
