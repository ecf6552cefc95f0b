//! Macro-tolerance meal matching and scoring.
//!
//! A pure read-and-compute service: the repository narrows candidates to
//! available meals inside the acceptance windows, scoring and ordering
//! happen here. No side effects.

use std::sync::Arc;

use crate::domain::DomainError;
use crate::domain::meal::{MacroTargets, MealWithVendor, TolerancePercent};
use crate::domain::ports::MealRepository;

/// A candidate meal with its computed match score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredMeal {
    /// The meal and its vendor summary.
    pub meal: MealWithVendor,
    /// Integer percentage score; exact-target meals score 100.
    pub match_score: i32,
}

/// Meal matching service over the catalogue repository.
#[derive(Clone)]
pub struct MacroMatcher {
    meals: Arc<dyn MealRepository>,
}

impl MacroMatcher {
    /// Create a matcher backed by the given catalogue repository.
    pub fn new(meals: Arc<dyn MealRepository>) -> Self {
        Self { meals }
    }

    /// Find available meals inside the tolerance windows, scored and sorted
    /// by descending match score. The sort is stable, so equal scores keep
    /// the repository's retrieval order.
    pub async fn search(
        &self,
        targets: MacroTargets,
        tolerance: TolerancePercent,
    ) -> Result<Vec<ScoredMeal>, DomainError> {
        let windows = targets.windows(tolerance);
        let candidates = self.meals.find_available_within(&windows).await?;

        let mut scored: Vec<ScoredMeal> = candidates
            .into_iter()
            .map(|candidate| {
                let match_score = targets.match_score(candidate.meal.macros());
                ScoredMeal {
                    meal: candidate,
                    match_score,
                }
            })
            .collect();
        scored.sort_by(|a, b| b.match_score.cmp(&a.match_score));
        Ok(scored)
    }
}
