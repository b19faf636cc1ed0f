//! Combat components

pub mod health;


// Re-export all components
pub use health::*;
