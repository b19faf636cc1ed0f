//! Physics module (headless body)
//!
//! Исполнение SteeringCommand без движка: прямая интеграция в Transform.

pub mod movement;

// Re-export основных типов
pub use movement::{integrate_steering, KinematicBodyPlugin};
