//! Combat systems (strategic layer logic)

pub mod damage;


// Re-export all systems
pub use damage::*;
