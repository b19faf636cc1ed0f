//! Headless симуляция SENTINEL
//!
//! Запускает Bevy App без рендера: цели, игрок, охранник, урон и respawn.
//! Использование: `sentinel_simulation [config.json]`

use bevy::prelude::*;
use sentinel_simulation::{
    create_headless_app, log_error, log_info, run_ticks, spawn_agent, spawn_objective, AgentState,
    CombatState, Player, PresentationCue, ReplacementSpawnRequested, SimulationConfig,
    SimulationPlugin, TakeDamage,
};

const TICK_COUNT: usize = 1200;
const REPORT_EVERY: usize = 100;

fn main() {
    let config = match std::env::args().nth(1) {
        Some(path) => match SimulationConfig::load(&path) {
            Ok(config) => config,
            Err(err) => {
                sentinel_simulation::init_logger();
                log_error(&format!("Config {}: {}", path, err));
                std::process::exit(1);
            }
        },
        None => SimulationConfig::default(),
    };

    let mut app = create_headless_app(config.seed);
    app.add_plugins(SimulationPlugin::headless(config.clone()));
    log_info(&format!(
        "Starting SENTINEL headless simulation (seed: {}, {} Hz)",
        config.seed, config.tick_hz
    ));

    let world = app.world_mut();
    for position in [
        Vec3::new(12.0, 0.0, 0.0),
        Vec3::new(-8.0, 0.0, 6.0),
        Vec3::new(0.0, 0.0, -20.0),
    ] {
        spawn_objective(world, position);
    }
    let player = world
        .spawn((Player, Transform::from_xyz(30.0, 0.0, 0.0)))
        .id();
    let first_agent = spawn_agent(world, Vec3::ZERO, config.agent.clone());

    for tick in 0..TICK_COUNT {
        // Игрок идёт от края карты к первой цели
        if let Some(mut transform) = app.world_mut().get_mut::<Transform>(player) {
            let to_objective = Vec3::new(12.0, 0.0, 0.0) - transform.translation;
            if to_objective.length() > 0.5 {
                transform.translation += to_objective.normalize() * 2.0 * config.tick_seconds();
            }
        }

        // Игрок отбивается, пока первый охранник жив
        if tick % 240 == 239 && app.world().get_entity(first_agent).is_ok() {
            app.world_mut().send_event(TakeDamage {
                agent: first_agent,
                amount: 30.0,
            });
        }

        run_ticks(&mut app, 1);

        // Respawn — ответственность host'а
        let requests: Vec<_> = app
            .world_mut()
            .resource_mut::<Events<ReplacementSpawnRequested>>()
            .drain()
            .collect();
        for request in requests {
            let replacement = spawn_agent(app.world_mut(), Vec3::ZERO, config.agent.clone());
            log_info(&format!(
                "Tick {}: replacing {:?} with {:?}",
                tick, request.agent, replacement
            ));
        }

        // Animator на стороне движка; здесь только trigger names для отчёта
        let cues: Vec<PresentationCue> = app
            .world_mut()
            .resource_mut::<Events<PresentationCue>>()
            .drain()
            .collect();

        if tick % REPORT_EVERY == 0 {
            report(app.world_mut(), tick, &cues);
        }
    }

    log_info("Simulation complete!");
}

fn report(world: &mut World, tick: usize, cues: &[PresentationCue]) {
    let mut agents = world.query::<(Entity, &Transform, &AgentState, &CombatState)>();
    for (entity, transform, state, health) in agents.iter(world) {
        let triggers: Vec<&str> = cues
            .iter()
            .filter(|cue| cue.agent == entity)
            .map(|cue| cue.cue.trigger_name())
            .collect();

        log_info(&format!(
            "Tick {}: {:?} {} at {:.2} hp {}/{} triggers {:?}",
            tick,
            entity,
            state.name(),
            transform.translation,
            health.current,
            health.max,
            triggers
        ));
    }
}
