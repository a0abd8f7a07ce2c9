//! Meal suggestions.
//!
//! Proposes recipes for an empty menu slot. Recipes already on the menu are
//! never offered, and the engine tries to avoid repeating the protein family
//! of the neighbouring meals. When too few recipes satisfy that preference it
//! falls back to everything eligible for the meal.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::config::SuggestionConfig;
use crate::menu::{Meal, WeeklyMenu, Weekday};
use crate::protein::ProteinCategory;
use crate::recipe::Recipe;

/// Default number of suggestions returned.
pub const DEFAULT_MAX_RESULTS: usize = 5;

/// Default number of protein-varied candidates needed before the
/// avoid-set is applied.
pub const DEFAULT_MIN_PREFERRED: usize = 3;

/// Build the random source for a suggestion run.
///
/// A fixed seed gives reproducible output; `None` seeds from entropy.
#[must_use]
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Protein categories to steer away from for a slot.
///
/// Lunch avoids the previous day's dinner. Dinner avoids the same day's lunch
/// and the previous day's dinner. Monday has no previous day.
#[must_use]
pub fn avoid_set(day: Weekday, meal: Meal, menu: &WeeklyMenu) -> HashSet<ProteinCategory> {
    let mut avoid = HashSet::new();

    if meal == Meal::Dinner {
        if let Some(lunch) = menu.slot(day, Meal::Lunch) {
            avoid.insert(lunch.protein_category());
        }
    }

    if let Some(previous) = day.previous() {
        if let Some(dinner) = menu.slot(previous, Meal::Dinner) {
            avoid.insert(dinner.protein_category());
        }
    }

    avoid
}

/// Ranks and samples recipes for a menu slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestionEngine {
    max_results: usize,
    min_preferred: usize,
}

impl Default for SuggestionEngine {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
            min_preferred: DEFAULT_MIN_PREFERRED,
        }
    }
}

impl SuggestionEngine {
    /// Create an engine with explicit limits.
    #[must_use]
    pub fn new(max_results: usize, min_preferred: usize) -> Self {
        Self {
            max_results,
            min_preferred,
        }
    }

    /// Create an engine from the `[suggestions]` config section.
    #[must_use]
    pub fn from_config(config: &SuggestionConfig) -> Self {
        Self::new(config.max_results, config.min_preferred)
    }

    /// Override the result limit.
    #[must_use]
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Maximum number of suggestions returned.
    #[must_use]
    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// Suggest up to `max_results` recipes for `day`/`meal`.
    ///
    /// Candidates are the recipes in `pool` that are not assigned anywhere in
    /// `menu` and are either untagged or tagged for `meal`. Candidates whose
    /// protein category is outside the avoid-set are preferred; if fewer than
    /// `min_preferred` of them exist, all candidates are used. The result is
    /// shuffled with `rng`.
    pub fn suggest<R: Rng + ?Sized>(
        &self,
        day: Weekday,
        meal: Meal,
        menu: &WeeklyMenu,
        pool: &[Recipe],
        rng: &mut R,
    ) -> Vec<Recipe> {
        let assigned = menu.assigned_ids();
        let avoid = avoid_set(day, meal, menu);
        let tag = meal.as_str();

        let candidates: Vec<&Recipe> = pool
            .iter()
            .filter(|r| !assigned.contains(r.id.as_str()))
            .filter(|r| r.categories.is_empty() || r.has_category(tag))
            .collect();

        let preferred: Vec<&Recipe> = candidates
            .iter()
            .copied()
            .filter(|r| !avoid.contains(&r.protein_category()))
            .collect();

        let fallback = preferred.len() < self.min_preferred;
        let mut chosen = if fallback { candidates } else { preferred };

        debug!(
            day = %day,
            meal = %meal,
            avoid = avoid.len(),
            eligible = chosen.len(),
            fallback,
            "Selecting suggestions"
        );

        chosen.shuffle(rng);
        chosen.truncate(self.max_results);
        chosen.into_iter().cloned().collect()
    }
}

/// Suggest with the default preference threshold.
pub fn suggest<R: Rng + ?Sized>(
    day: Weekday,
    meal: Meal,
    menu: &WeeklyMenu,
    pool: &[Recipe],
    max_results: usize,
    rng: &mut R,
) -> Vec<Recipe> {
    SuggestionEngine::default()
        .with_max_results(max_results)
        .suggest(day, meal, menu, pool, rng)
}
