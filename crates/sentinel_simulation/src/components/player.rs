//! Player marker component
//!
//! Источник "player locator": агенты читают `Transform` единственного entity
//! с этим маркером.

use bevy::prelude::Component;

/// Marker component для player-controlled entity
///
/// Движением игрока управляет внешний input/physics слой, симуляция
/// только читает позицию (detect/attack range checks).
///
/// В single-player режиме только один entity имеет этот компонент.
/// Если игрока нет — агенты считают его вне всех радиусов.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;
