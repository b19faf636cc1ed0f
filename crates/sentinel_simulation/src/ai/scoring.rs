//! Objective scoring — выбор цели для охраны
//!
//! Score = clamp01(1 - distance / 100): ближе → выше, дальше 100м → 0.
//! Берём максимум среди свободных целей, ничья → первая по порядку реестра.
//! Функция чистая: claim делает вызывающий (FSM), состояния между вызовами нет.

use bevy::prelude::*;

/// Дистанция, на которой score падает до 0
pub const SCORE_FALLOFF_DISTANCE: f32 = 100.0;

/// Снимок цели на момент оценки
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectiveCandidate {
    pub objective: Entity,
    pub position: Vec3,
    pub protector: Option<Entity>,
}

/// Пара (цель, score ∈ [0, 1]); живёт только внутри одного вызова select_best
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredCandidate {
    pub objective: Entity,
    pub score: f32,
}

/// Нормализованный score по дистанции
#[inline]
pub fn score_for_distance(distance: f32) -> f32 {
    (1.0 - distance / SCORE_FALLOFF_DISTANCE).clamp(0.0, 1.0)
}

/// Лучшая свободная цель, или None если свободных нет
pub fn select_best<'a>(
    self_position: Vec3,
    candidates: impl IntoIterator<Item = &'a ObjectiveCandidate>,
) -> Option<ScoredCandidate> {
    candidates
        .into_iter()
        .filter(|candidate| candidate.protector.is_none())
        .map(|candidate| ScoredCandidate {
            objective: candidate.objective,
            score: score_for_distance(self_position.distance(candidate.position)),
        })
        .fold(None, |best: Option<ScoredCandidate>, scored| match best {
            // Строго больше: при равенстве остаётся первый
            Some(current) if scored.score <= current.score => Some(current),
            _ => Some(scored),
        })
}
