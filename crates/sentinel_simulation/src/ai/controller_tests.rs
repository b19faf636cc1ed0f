//! Tests for the agent controller (pure FSM step).

#[cfg(test)]
mod tests {
    use bevy::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use crate::ai::controller::{
        sample_patrol_target, step_agent, AgentEffect, AgentFault, AgentSenses, TickOutcome,
    };
    use crate::ai::events::CueKind;
    use crate::ai::scoring::ObjectiveCandidate;
    use crate::ai::{AgentConfig, AgentState, GuardedObjective};

    const DT: f32 = 1.0 / 60.0;

    struct Fixture {
        agent: Entity,
        objectives: Vec<Entity>,
        rng: ChaCha8Rng,
        config: AgentConfig,
    }

    impl Fixture {
        fn new() -> Self {
            let mut world = World::new();
            let agent = world.spawn_empty().id();
            let objectives = (0..3).map(|_| world.spawn_empty().id()).collect();
            Self {
                agent,
                objectives,
                rng: ChaCha8Rng::seed_from_u64(42),
                config: AgentConfig::default(),
            }
        }

        fn senses<'a>(
            &self,
            position: Vec3,
            guarded_position: Option<Vec3>,
            player_position: Option<Vec3>,
            candidates: &'a [ObjectiveCandidate],
        ) -> AgentSenses<'a> {
            AgentSenses {
                agent: self.agent,
                position,
                heading: Quat::IDENTITY,
                guarded_position,
                player_position,
                candidates,
                delta: DT,
            }
        }

        fn step(
            &mut self,
            state: &mut AgentState,
            guarded: &mut GuardedObjective,
            senses: &AgentSenses,
        ) -> TickOutcome {
            step_agent(state, guarded, senses, &self.config, &mut self.rng)
        }
    }

    fn free(objective: Entity, position: Vec3) -> ObjectiveCandidate {
        ObjectiveCandidate {
            objective,
            position,
            protector: None,
        }
    }

    #[test]
    fn test_considering_claims_best_objective() {
        let mut fx = Fixture::new();
        let candidates = [
            free(fx.objectives[0], Vec3::new(50.0, 0.0, 0.0)),
            free(fx.objectives[1], Vec3::new(10.0, 0.0, 0.0)),
        ];
        let mut state = AgentState::ConsideringObjective;
        let mut guarded = GuardedObjective::default();

        let senses = fx.senses(Vec3::ZERO, None, None, &candidates);
        let out = fx.step(&mut state, &mut guarded, &senses);

        assert_eq!(state, AgentState::Walking);
        assert_eq!(guarded.0, Some(fx.objectives[1]));
        assert_eq!(
            out.effects,
            vec![
                AgentEffect::Claim(fx.objectives[1]),
                AgentEffect::Cue(CueKind::Move),
            ]
        );
        assert!(out.faults.is_empty());
    }

    #[test]
    fn test_considering_without_candidates_idles() {
        let mut fx = Fixture::new();
        let mut state = AgentState::ConsideringObjective;
        let mut guarded = GuardedObjective::default();

        let senses = fx.senses(Vec3::ZERO, None, None, &[]);
        let out = fx.step(&mut state, &mut guarded, &senses);

        assert_eq!(state, AgentState::ConsideringObjective);
        assert!(out.effects.is_empty());
        assert_eq!(out.steering.velocity, Vec3::ZERO);
        assert_eq!(out.faults, vec![AgentFault::NoCandidates { agent: fx.agent }]);
    }

    #[test]
    fn test_walking_steers_toward_objective() {
        let mut fx = Fixture::new();
        let objective = Vec3::new(20.0, 0.0, 0.0);
        let mut state = AgentState::Walking;
        let mut guarded = GuardedObjective(Some(fx.objectives[0]));

        let senses = fx.senses(Vec3::ZERO, Some(objective), None, &[]);
        let out = fx.step(&mut state, &mut guarded, &senses);

        assert_eq!(state, AgentState::Walking);
        assert!(out
            .steering
            .velocity
            .abs_diff_eq(Vec3::X * fx.config.move_speed, 1e-5));
    }

    #[test]
    fn test_walking_within_threshold_starts_patrol_planning() {
        let mut fx = Fixture::new();
        let objective = Vec3::new(5.0, 0.0, 0.0);
        let mut state = AgentState::Walking;
        let mut guarded = GuardedObjective(Some(fx.objectives[0]));

        // Игрок рядом — не важно, Walking на него не реагирует
        let senses = fx.senses(Vec3::ZERO, Some(objective), Some(Vec3::ZERO), &[]);
        let out = fx.step(&mut state, &mut guarded, &senses);

        assert_eq!(state, AgentState::ConsideringPatrol);
        assert_eq!(out.steering.velocity, Vec3::ZERO);
        assert!(out.effects.is_empty());
    }

    #[test]
    fn test_considering_patrol_samples_point_around_objective() {
        let mut fx = Fixture::new();
        let objective = Vec3::new(10.0, 0.0, 0.0);
        let mut state = AgentState::ConsideringPatrol;
        let mut guarded = GuardedObjective(Some(fx.objectives[0]));

        let senses = fx.senses(Vec3::new(6.0, 0.0, 0.0), Some(objective), None, &[]);
        fx.step(&mut state, &mut guarded, &senses);

        let AgentState::Patrolling { patrol_target } = state else {
            panic!("expected Patrolling, got {:?}", state);
        };
        assert!(patrol_target.distance(objective) <= fx.config.max_patrol_radius + 1e-5);
        assert_eq!(patrol_target.y, fx.config.ground_height);
    }

    #[test]
    fn test_patrol_target_is_flattened_to_ground_height() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let config = AgentConfig {
            ground_height: 0.5,
            ..Default::default()
        };
        let center = Vec3::new(-3.0, 4.0, 2.0);

        for _ in 0..200 {
            let target = sample_patrol_target(center, &config, &mut rng);
            assert_eq!(target.y, 0.5);
            let horizontal = Vec2::new(target.x - center.x, target.z - center.z);
            assert!(horizontal.length() <= config.max_patrol_radius + 1e-5);
        }
    }

    #[test]
    fn test_patrol_sampling_is_deterministic_per_seed() {
        let config = AgentConfig::default();
        let mut a = ChaCha8Rng::seed_from_u64(99);
        let mut b = ChaCha8Rng::seed_from_u64(99);

        for _ in 0..10 {
            assert_eq!(
                sample_patrol_target(Vec3::ZERO, &config, &mut a),
                sample_patrol_target(Vec3::ZERO, &config, &mut b)
            );
        }
    }

    #[test]
    fn test_patrolling_detects_player_before_arrival() {
        let mut fx = Fixture::new();
        let position = Vec3::new(9.0, 0.0, 0.0);
        // Точка патруля достигнута И игрок в detect range → detection выигрывает
        let mut state = AgentState::Patrolling {
            patrol_target: position,
        };
        let mut guarded = GuardedObjective(Some(fx.objectives[0]));

        let senses = fx.senses(
            position,
            Some(Vec3::new(10.0, 0.0, 0.0)),
            Some(Vec3::new(8.0, 0.0, 0.0)),
            &[],
        );
        let out = fx.step(&mut state, &mut guarded, &senses);

        assert_eq!(state, AgentState::Chasing);
        assert_eq!(out.effects, vec![AgentEffect::Release(fx.objectives[0])]);
        // Handle остаётся: Chasing меряет от него leash
        assert_eq!(guarded.0, Some(fx.objectives[0]));
    }

    #[test]
    fn test_patrolling_reached_point_replans() {
        let mut fx = Fixture::new();
        let position = Vec3::new(9.0, 0.0, 0.0);
        let mut state = AgentState::Patrolling {
            patrol_target: position + Vec3::new(0.05, 0.0, 0.0),
        };
        let mut guarded = GuardedObjective(Some(fx.objectives[0]));

        let senses = fx.senses(position, Some(Vec3::new(10.0, 0.0, 0.0)), None, &[]);
        let out = fx.step(&mut state, &mut guarded, &senses);

        assert_eq!(state, AgentState::ConsideringPatrol);
        assert!(out.effects.is_empty());
    }

    #[test]
    fn test_patrolling_walks_at_patrol_speed() {
        let mut fx = Fixture::new();
        let patrol_target = Vec3::new(12.0, 0.0, 0.0);
        let mut state = AgentState::Patrolling { patrol_target };
        let mut guarded = GuardedObjective(Some(fx.objectives[0]));

        let senses = fx.senses(
            Vec3::new(9.0, 0.0, 0.0),
            Some(Vec3::new(10.0, 0.0, 0.0)),
            Some(Vec3::new(-30.0, 0.0, 0.0)),
            &[],
        );
        let out = fx.step(&mut state, &mut guarded, &senses);

        assert_eq!(state, AgentState::Patrolling { patrol_target });
        assert!((out.steering.velocity.length() - fx.config.patrol_speed).abs() < 1e-5);
    }

    #[test]
    fn test_chasing_beyond_leash_abandons_pursuit() {
        let mut fx = Fixture::new();
        let mut state = AgentState::Chasing;
        let mut guarded = GuardedObjective(Some(fx.objectives[0]));

        // Цель в 6м, max_patrol_radius = 5
        let senses = fx.senses(
            Vec3::ZERO,
            Some(Vec3::new(6.0, 0.0, 0.0)),
            Some(Vec3::new(0.5, 0.0, 0.0)),
            &[],
        );
        let out = fx.step(&mut state, &mut guarded, &senses);

        assert_eq!(state, AgentState::ConsideringObjective);
        assert_eq!(guarded.0, None);
        assert_eq!(out.effects, vec![AgentEffect::Release(fx.objectives[0])]);
        assert_eq!(out.steering.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_chasing_in_attack_range_attacks() {
        let mut fx = Fixture::new();
        let mut state = AgentState::Chasing;
        let mut guarded = GuardedObjective(Some(fx.objectives[0]));

        let senses = fx.senses(
            Vec3::ZERO,
            Some(Vec3::new(2.0, 0.0, 0.0)),
            Some(Vec3::new(0.0, 0.0, 0.8)),
            &[],
        );
        let out = fx.step(&mut state, &mut guarded, &senses);

        assert_eq!(state, AgentState::Attacking);
        assert_eq!(
            out.effects,
            vec![
                AgentEffect::Cue(CueKind::Attack),
                AgentEffect::Strike {
                    damage: fx.config.attack_damage
                },
            ]
        );
    }

    #[test]
    fn test_chasing_follows_player_with_move_cue() {
        let mut fx = Fixture::new();
        let mut state = AgentState::Chasing;
        let mut guarded = GuardedObjective(Some(fx.objectives[0]));

        let senses = fx.senses(
            Vec3::ZERO,
            Some(Vec3::new(2.0, 0.0, 0.0)),
            Some(Vec3::new(0.0, 0.0, -3.0)),
            &[],
        );
        let out = fx.step(&mut state, &mut guarded, &senses);

        assert_eq!(state, AgentState::Chasing);
        assert_eq!(out.effects, vec![AgentEffect::Cue(CueKind::Move)]);
        let expected = Vec3::NEG_Z * fx.config.patrol_speed;
        assert!(out.steering.velocity.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn test_chasing_without_player_gives_up() {
        let mut fx = Fixture::new();
        let mut state = AgentState::Chasing;
        let mut guarded = GuardedObjective(Some(fx.objectives[0]));

        let senses = fx.senses(Vec3::ZERO, Some(Vec3::new(2.0, 0.0, 0.0)), None, &[]);
        let out = fx.step(&mut state, &mut guarded, &senses);

        assert_eq!(state, AgentState::ConsideringObjective);
        assert_eq!(out.faults, vec![AgentFault::MissingPlayer { agent: fx.agent }]);
    }

    #[test]
    fn test_attacking_holds_while_player_in_range() {
        let mut fx = Fixture::new();
        let mut state = AgentState::Attacking;
        let mut guarded = GuardedObjective(Some(fx.objectives[0]));

        let senses = fx.senses(
            Vec3::ZERO,
            Some(Vec3::new(2.0, 0.0, 0.0)),
            Some(Vec3::new(1.0, 0.0, 0.0)),
            &[],
        );
        let out = fx.step(&mut state, &mut guarded, &senses);

        assert_eq!(state, AgentState::Attacking);
        assert!(out.effects.is_empty());
        assert_eq!(out.steering.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_attacking_resumes_chase_when_player_leaves() {
        let mut fx = Fixture::new();
        let mut state = AgentState::Attacking;
        let mut guarded = GuardedObjective(Some(fx.objectives[0]));

        let senses = fx.senses(
            Vec3::ZERO,
            Some(Vec3::new(2.0, 0.0, 0.0)),
            Some(Vec3::new(1.5, 0.0, 0.0)),
            &[],
        );
        let out = fx.step(&mut state, &mut guarded, &senses);

        assert_eq!(state, AgentState::Chasing);
        assert_eq!(out.effects, vec![AgentEffect::Cue(CueKind::Move)]);
    }

    #[test]
    fn test_missing_objective_falls_back_and_reconsiders_same_tick() {
        let mut fx = Fixture::new();
        let candidates = [free(fx.objectives[2], Vec3::new(3.0, 0.0, 0.0))];
        let mut state = AgentState::Patrolling {
            patrol_target: Vec3::ONE,
        };
        let mut guarded = GuardedObjective(Some(fx.objectives[0]));

        let senses = fx.senses(Vec3::ZERO, None, None, &candidates);
        let out = fx.step(&mut state, &mut guarded, &senses);

        assert_eq!(out.faults[0], AgentFault::MissingObjective { agent: fx.agent });
        assert_eq!(state, AgentState::Walking);
        assert_eq!(guarded.0, Some(fx.objectives[2]));
    }

    #[test]
    fn test_missing_objective_without_candidates_waits() {
        let mut fx = Fixture::new();

        for start in [
            AgentState::Walking,
            AgentState::ConsideringPatrol,
            AgentState::Chasing,
            AgentState::Attacking,
        ] {
            let mut state = start;
            let mut guarded = GuardedObjective(Some(fx.objectives[0]));

            let senses = fx.senses(Vec3::ZERO, None, Some(Vec3::ZERO), &[]);
            let out = fx.step(&mut state, &mut guarded, &senses);

            assert_eq!(state, AgentState::ConsideringObjective, "from {:?}", start);
            assert_eq!(guarded.0, None);
            assert_eq!(
                out.faults,
                vec![
                    AgentFault::MissingObjective { agent: fx.agent },
                    AgentFault::NoCandidates { agent: fx.agent },
                ]
            );
        }
    }

    /// Урон по агенту без цели форсирует Chasing; handle пуст, значит
    /// ничего не пропадало — только выбор цели, без MissingObjective
    #[test]
    fn test_forced_chase_without_guard_reconsiders_silently() {
        let mut fx = Fixture::new();
        let mut state = AgentState::Chasing;
        let mut guarded = GuardedObjective::default();

        let senses = fx.senses(Vec3::ZERO, None, Some(Vec3::X), &[]);
        let out = fx.step(&mut state, &mut guarded, &senses);

        assert_eq!(state, AgentState::ConsideringObjective);
        assert_eq!(out.faults, vec![AgentFault::NoCandidates { agent: fx.agent }]);

        let candidates = [free(fx.objectives[1], Vec3::new(4.0, 0.0, 0.0))];
        let mut state = AgentState::Chasing;
        let senses = fx.senses(Vec3::ZERO, None, Some(Vec3::X), &candidates);
        let out = fx.step(&mut state, &mut guarded, &senses);

        assert_eq!(state, AgentState::Walking);
        assert_eq!(guarded.0, Some(fx.objectives[1]));
        assert!(out.faults.is_empty());
    }

    #[test]
    fn test_considering_never_emits_release() {
        let mut fx = Fixture::new();
        let candidates = [free(fx.objectives[0], Vec3::new(2.0, 0.0, 0.0))];
        let mut state = AgentState::ConsideringObjective;
        let mut guarded = GuardedObjective::default();

        let senses = fx.senses(Vec3::ZERO, None, None, &candidates);
        let out = fx.step(&mut state, &mut guarded, &senses);

        assert!(!out
            .effects
            .iter()
            .any(|effect| matches!(effect, AgentEffect::Release(_))));
    }

    #[test]
    fn test_fault_log_levels() {
        use crate::logger::LogLevel;

        let fx = Fixture::new();
        let idle = AgentFault::NoCandidates { agent: fx.agent };
        let missing = AgentFault::MissingObjective { agent: fx.agent };
        assert_eq!(idle.log_level(), LogLevel::Debug);
        assert_eq!(missing.log_level(), LogLevel::Warning);
        assert!(idle.to_string().contains("no objective available"));
    }

    /// Objective (10,0,0), агент в начале координат, detect 2, radius 5:
    /// Walking → ConsideringPatrol в пределах 5м → Patrolling вокруг цели,
    /// Chasing только когда игрок подходит на 2м.
    #[test]
    fn test_guard_scenario_walk_patrol_detect() {
        let mut fx = Fixture::new();
        let objective = Vec3::new(10.0, 0.0, 0.0);
        let candidates = [free(fx.objectives[0], objective)];
        let far_player = Some(Vec3::new(-50.0, 0.0, 0.0));

        let mut state = AgentState::ConsideringObjective;
        let mut guarded = GuardedObjective::default();
        let mut position = Vec3::ZERO;

        // Claim
        let senses = fx.senses(position, None, far_player, &candidates);
        fx.step(&mut state, &mut guarded, &senses);
        assert_eq!(state, AgentState::Walking);

        // Идём к цели, интегрируя velocity как body слой
        let mut ticks = 0;
        while state == AgentState::Walking {
            let senses = fx.senses(position, Some(objective), far_player, &[]);
            let out = fx.step(&mut state, &mut guarded, &senses);
            position += out.steering.velocity * DT;
            ticks += 1;
            assert!(ticks < 1000, "agent never reached objective");
        }
        assert_eq!(state, AgentState::ConsideringPatrol);
        assert!(position.distance(objective) <= 5.0);

        // Патрульная точка
        let senses = fx.senses(position, Some(objective), far_player, &[]);
        fx.step(&mut state, &mut guarded, &senses);
        let AgentState::Patrolling { patrol_target } = state else {
            panic!("expected Patrolling, got {:?}", state);
        };
        assert!(patrol_target.distance(objective) <= 5.0 + 1e-5);

        // Игрок в 3м — ещё не видим
        let near_player = Some(position + Vec3::new(0.0, 0.0, 3.0));
        let senses = fx.senses(position, Some(objective), near_player, &[]);
        fx.step(&mut state, &mut guarded, &senses);
        assert!(!state.is_hostile());

        // Игрок в 1.5м — Chasing (если тик выше перепланировал патруль,
        // нужен ещё один тик на ConsideringPatrol → Patrolling)
        let close_player = Some(position + Vec3::new(0.0, 0.0, 1.5));
        let mut released = false;
        for _ in 0..2 {
            let senses = fx.senses(position, Some(objective), close_player, &[]);
            let out = fx.step(&mut state, &mut guarded, &senses);
            released |= out.effects.contains(&AgentEffect::Release(fx.objectives[0]));
            if state == AgentState::Chasing {
                break;
            }
        }
        assert_eq!(state, AgentState::Chasing);
        assert!(released);
    }
}
