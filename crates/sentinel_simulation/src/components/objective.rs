//! Objective компоненты: охраняемые точки интереса ("монеты") и их реестр
//!
//! Ownership:
//! - Objective entity принадлежит сцене / внешнему генератору
//! - Агент держит только non-owning handle (Entity) через `GuardedObjective`
//! - `protector` — обратная ссылка на агента, тоже просто Entity

use bevy::prelude::*;

/// Охраняемая цель
///
/// Инвариант: `protector`, однажды выставленный одним агентом, не
/// перезаписывается claim'ом другого агента до release.
#[derive(Component, Debug, Clone, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Objective {
    /// Агент, который сейчас охраняет цель (None — свободна)
    pub protector: Option<Entity>,
}

impl Objective {
    pub fn is_claimed(&self) -> bool {
        self.protector.is_some()
    }

    /// Claim только свободной цели. Возвращает false если цель уже занята.
    pub fn try_claim(&mut self, agent: Entity) -> bool {
        match self.protector {
            None => {
                self.protector = Some(agent);
                true
            }
            Some(holder) => holder == agent,
        }
    }

    /// Release только своего claim'а (чужой protector не трогаем)
    pub fn release_by(&mut self, agent: Entity) -> bool {
        if self.protector == Some(agent) {
            self.protector = None;
            true
        } else {
            false
        }
    }
}

/// Реестр целей ("listObjectives")
///
/// Хранит handles в порядке регистрации: scorer разрешает ничьи в пользу
/// первой встреченной цели, поэтому порядок должен быть стабильным
/// (Query iteration order это не гарантирует).
#[derive(Resource, Debug, Clone, Default)]
pub struct ObjectiveRegistry {
    objectives: Vec<Entity>,
}

impl ObjectiveRegistry {
    pub fn register(&mut self, objective: Entity) {
        if !self.objectives.contains(&objective) {
            self.objectives.push(objective);
        }
    }

    pub fn unregister(&mut self, objective: Entity) {
        self.objectives.retain(|&e| e != objective);
    }

    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.objectives.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.objectives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objectives.is_empty()
    }

    pub fn contains(&self, objective: Entity) -> bool {
        self.objectives.contains(&objective)
    }
}

/// Spawn helper для внешнего генератора целей: entity + регистрация
pub fn spawn_objective(world: &mut World, position: Vec3) -> Entity {
    let entity = world
        .spawn((Objective::default(), Transform::from_translation(position)))
        .id();

    world
        .get_resource_or_insert_with(ObjectiveRegistry::default)
        .register(entity);

    entity
}

/// Система: убрать из реестра despawned цели (подобрал игрок, убрал генератор)
pub fn prune_objective_registry(
    mut registry: ResMut<ObjectiveRegistry>,
    objectives: Query<(), With<Objective>>,
) {
    let before = registry.len();
    registry.objectives.retain(|&e| objectives.contains(e));

    let removed = before - registry.len();
    if removed > 0 {
        crate::log(&format!("Objectives: pruned {} despawned entries from registry", removed));
    }
}
