//! ECS компоненты для игровых entity
//!
//! Организация по доменам:
//! - agent: охранник (Agent marker + spawn helper)
//! - objective: охраняемые цели (Objective, ObjectiveRegistry)
//! - movement: выход steering для body/physics слоя (SteeringCommand)
//! - player: маркер игрока (Player)

pub mod agent;
pub mod movement;
pub mod objective;
pub mod player;

// Re-exports для удобного импорта
pub use agent::*;
pub use movement::*;
pub use objective::*;
pub use player::*;
