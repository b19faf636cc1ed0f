//! SENTINEL Simulation Core
//!
//! ECS-симуляция охранников целей на Bevy 0.16 (strategic layer)
//!
//! HYBRID ARCHITECTURE:
//! - ECS = решения (FSM охранника, claims, здоровье, смерть)
//! - Engine = исполнение (body/physics по SteeringCommand, анимации по
//!   PresentationCue, UI по HealthBarUpdated, respawn по ReplacementSpawnRequested)
//!
//! Headless режим: `KinematicBodyPlugin` интегрирует SteeringCommand сам.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod combat;
pub mod components;
pub mod config;
pub mod logger;
pub mod physics;

// Re-export базовых компонентов для удобства
pub use ai::{
    AIPlugin, AgentConfig, AgentFault, AgentState, AgentStrike, CueKind, GuardedObjective,
    PresentationCue,
};
pub use combat::{
    AgentDestroyed, CombatPlugin, CombatState, DamageResult, HealthBarUpdated,
    ReplacementSpawnRequested, TakeDamage,
};
pub use components::*;
pub use config::{ConfigError, SimulationConfig};
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, log_with_level, set_log_level, set_logger,
    LogLevel, LogPrinter,
};
pub use physics::KinematicBodyPlugin;

/// Порядок фаз одного FixedUpdate тика
///
/// Registry → Damage → Decision → Body: урон и смерть видны FSM в том же
/// тике, SteeringCommand исполняется после решения.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Синхронизация ObjectiveRegistry с миром
    Registry,
    /// TakeDamage → CombatState, forced Chasing, смерть
    Damage,
    /// Agent FSM тик
    Decision,
    /// Headless body (KinematicBodyPlugin)
    Body,
}

/// Главный plugin симуляции (объединяет все подсистемы)
#[derive(Default)]
pub struct SimulationPlugin {
    pub config: SimulationConfig,
    /// Подключить KinematicBodyPlugin (false когда body исполняет движок)
    pub headless_bodies: bool,
}

impl SimulationPlugin {
    /// Headless вариант: body интегрируется внутри симуляции
    pub fn headless(config: SimulationConfig) -> Self {
        Self {
            config,
            headless_bodies: true,
        }
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        // Seed, выставленный host'ом (create_headless_app), не перезаписываем
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(self.config.seed));
        }

        app
            // Fixed timestep для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(self.config.tick_hz as f64))
            .insert_resource(self.config.clone())
            .init_resource::<ObjectiveRegistry>()
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::Registry,
                    SimulationSet::Damage,
                    SimulationSet::Decision,
                    SimulationSet::Body,
                )
                    .chain(), // Последовательное выполнение для детерминизма
            )
            // Подсистемы (ECS strategic layer)
            .add_plugins((CombatPlugin, AIPlugin));

        if self.headless_bodies {
            app.add_plugins(KinematicBodyPlugin);
        }
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0)); // 60Hz FixedUpdate

    app
}

/// Один simulation tick вручную (без ожидания реального времени)
///
/// Ручной тик не проходит через `First`, где Bevy переключает буферы
/// событий, поэтому переключаем их сами: после вызова в `Events<E>`
/// остаются только события последнего тика (и отправленные перед ним).
pub fn run_ticks(app: &mut App, ticks: usize) {
    for _ in 0..ticks {
        let world = app.world_mut();
        world.run_schedule(FixedUpdate);
        update_simulation_events(world);
    }
}

/// Double-buffer swap для всех событий симуляции
fn update_simulation_events(world: &mut World) {
    update_events::<TakeDamage>(world);
    update_events::<HealthBarUpdated>(world);
    update_events::<ReplacementSpawnRequested>(world);
    update_events::<AgentDestroyed>(world);
    update_events::<PresentationCue>(world);
    update_events::<AgentStrike>(world);
}

fn update_events<E: Event>(world: &mut World) {
    if let Some(mut events) = world.get_resource_mut::<Events<E>>() {
        events.update();
    }
}

/// Snapshot мира для сравнения детерминизма
///
/// Entity index + Debug representation компонента, отсортировано по index.
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
