//! Core recipe types for mealplanner.
//!
//! A [`Recipe`] is the unit everything else works on: the menu assigns them to
//! slots, the shopping list reads their ingredients, and the suggestion engine
//! ranks them.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};
use crate::protein::{self, ProteinCategory};

/// Meal-time tags a recipe can carry in its category set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealTime {
    /// Morning meal.
    Breakfast,
    /// Midday meal.
    Lunch,
    /// Evening meal.
    Dinner,
    /// Anything between meals.
    Snack,
}

impl MealTime {
    /// All meal-time tags in display order.
    pub const ALL: [MealTime; 4] = [Self::Breakfast, Self::Lunch, Self::Dinner, Self::Snack];

    /// The tag string stored in a recipe's category set.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
            Self::Snack => "snack",
        }
    }
}

impl std::fmt::Display for MealTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recipe record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    /// Stable identifier, a slug of the name unless set explicitly.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Ingredient lines, in the order the author wrote them.
    #[serde(default, deserialize_with = "null_as_default")]
    pub ingredients: Vec<String>,

    /// Preparation steps, in order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub instructions: Vec<String>,

    /// Meal-time tags such as `lunch` or `dinner`. May hold free-form tags too.
    #[serde(default, deserialize_with = "null_as_default")]
    pub categories: BTreeSet<String>,

    /// Reference to the recipe's image in the blob store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,

    /// Whether the user marked this recipe as a favorite.
    #[serde(default)]
    pub is_favorite: bool,
}

/// Treats an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn slug_separator() -> &'static Regex {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    SEPARATOR.get_or_init(|| Regex::new(r"[^\p{L}\p{N}]+").expect("static regex is valid"))
}

/// Derive a recipe id from its name.
///
/// Lower-cases the name and collapses every run of non-alphanumeric
/// characters into a single `-`.
#[must_use]
pub fn slugify(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    slug_separator()
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

impl Recipe {
    /// Create a new recipe with an id derived from `name`.
    ///
    /// Ingredient and instruction lines are trimmed and blank lines dropped.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        ingredients: impl IntoIterator<Item = impl Into<String>>,
        instructions: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        let name = name.into().trim().to_string();
        Self {
            id: slugify(&name),
            name,
            ingredients: clean_lines(ingredients),
            instructions: clean_lines(instructions),
            categories: BTreeSet::new(),
            image_ref: None,
            is_favorite: false,
        }
    }

    /// Add a category tag (stored lower-cased).
    #[must_use]
    pub fn with_category(mut self, category: impl AsRef<str>) -> Self {
        let tag = category.as_ref().trim().to_lowercase();
        if !tag.is_empty() {
            self.categories.insert(tag);
        }
        self
    }

    /// Set the image reference.
    #[must_use]
    pub fn with_image(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = Some(image_ref.into());
        self
    }

    /// Set the favorite flag.
    #[must_use]
    pub fn with_favorite(mut self, is_favorite: bool) -> Self {
        self.is_favorite = is_favorite;
        self
    }

    /// Check that the recipe is complete enough to store.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRecipe`] if the name, id, ingredients or
    /// instructions are missing.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::invalid_recipe("name must not be empty"));
        }
        if self.id.trim().is_empty() {
            return Err(Error::invalid_recipe(format!(
                "could not derive an id from name '{}'",
                self.name
            )));
        }
        if !self.ingredients.iter().any(|i| !i.trim().is_empty()) {
            return Err(Error::invalid_recipe(format!(
                "'{}' needs at least one ingredient",
                self.name
            )));
        }
        if !self.instructions.iter().any(|i| !i.trim().is_empty()) {
            return Err(Error::invalid_recipe(format!(
                "'{}' needs at least one instruction",
                self.name
            )));
        }
        Ok(())
    }

    /// The protein category, recomputed from the ingredient list.
    #[must_use]
    pub fn protein_category(&self) -> ProteinCategory {
        protein::classify(&self.ingredients)
    }

    /// Whether the recipe carries the given meal-time tag.
    #[must_use]
    pub fn has_category(&self, tag: &str) -> bool {
        self.categories.iter().any(|c| c.eq_ignore_ascii_case(tag))
    }

    /// Case-insensitive match against the name or any ingredient.
    ///
    /// A blank term matches every recipe.
    #[must_use]
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&term)
            || self
                .ingredients
                .iter()
                .any(|i| i.to_lowercase().contains(&term))
    }

    /// Flip the favorite flag and return the new value.
    pub fn toggle_favorite(&mut self) -> bool {
        self.is_favorite = !self.is_favorite;
        self.is_favorite
    }
}

fn clean_lines(lines: impl IntoIterator<Item = impl Into<String>>) -> Vec<String> {
    lines
        .into_iter()
        .map(|l| l.into().trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}
