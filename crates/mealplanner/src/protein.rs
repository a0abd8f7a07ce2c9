//! Protein category classification.
//!
//! Recipes are tagged with a coarse protein family by scanning their
//! ingredient text for keywords. The tag is never stored; it is recomputed
//! from the ingredients whenever it is needed.
//!
//! # Example
//!
//! ```
//! use mealplanner::protein::{classify, ProteinCategory};
//!
//! let ingredients = vec!["200g pechuga de pollo".to_string()];
//! assert_eq!(classify(&ingredients), ProteinCategory::Chicken);
//! assert_eq!(classify::<&str>(&[]), ProteinCategory::Other);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Coarse protein family of a recipe.
///
/// Declaration order is classification priority: when ingredients mention
/// more than one family, the earliest variant wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProteinCategory {
    /// Chicken and other poultry.
    Chicken,
    /// Red meat and pork.
    Meat,
    /// Fish.
    Fish,
    /// Shellfish and cephalopods.
    Seafood,
    /// Legumes, tofu, seitan.
    Vegetarian,
    /// Egg-based dishes.
    Egg,
    /// Pasta dishes.
    Pasta,
    /// Rice dishes.
    Rice,
    /// Nothing recognised.
    Other,
}

/// Keyword table in priority order. `Other` has no keywords.
const KEYWORDS: &[(ProteinCategory, &[&str])] = &[
    (
        ProteinCategory::Chicken,
        &["pollo", "pechuga", "muslo", "ave", "gallina", "pavo"],
    ),
    (
        ProteinCategory::Meat,
        &["carne", "ternera", "cerdo", "res", "vacuno", "cordero", "lomo"],
    ),
    (
        ProteinCategory::Fish,
        &[
            "pescado", "atún", "salmón", "merluza", "bacalao", "dorada", "lubina", "rape",
        ],
    ),
    (
        ProteinCategory::Seafood,
        &[
            "marisco",
            "gambas",
            "langostinos",
            "mejillones",
            "calamares",
            "pulpo",
        ],
    ),
    (
        ProteinCategory::Vegetarian,
        &[
            "tofu",
            "seitán",
            "legumbres",
            "garbanzos",
            "lentejas",
            "judías",
            "vegetariano",
            "vegano",
        ],
    ),
    (
        ProteinCategory::Egg,
        &["huevo", "huevos", "tortilla", "revuelto"],
    ),
    (
        ProteinCategory::Pasta,
        &[
            "pasta",
            "espagueti",
            "macarrones",
            "tallarines",
            "lasaña",
            "canelones",
        ],
    ),
    (ProteinCategory::Rice, &["arroz", "paella", "risotto"]),
];

impl ProteinCategory {
    /// Every category in priority order.
    pub const ALL: [ProteinCategory; 9] = [
        Self::Chicken,
        Self::Meat,
        Self::Fish,
        Self::Seafood,
        Self::Vegetarian,
        Self::Egg,
        Self::Pasta,
        Self::Rice,
        Self::Other,
    ];

    /// The keywords that select this category.
    #[must_use]
    pub fn keywords(self) -> &'static [&'static str] {
        KEYWORDS
            .iter()
            .find(|(category, _)| *category == self)
            .map(|(_, words)| *words)
            .unwrap_or(&[])
    }

    /// Stable lower-case name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Chicken => "chicken",
            Self::Meat => "meat",
            Self::Fish => "fish",
            Self::Seafood => "seafood",
            Self::Vegetarian => "vegetarian",
            Self::Egg => "egg",
            Self::Pasta => "pasta",
            Self::Rice => "rice",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for ProteinCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProteinCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| Error::internal(format!("unknown protein category: {s}")))
    }
}

/// Classify a recipe by its ingredient lines.
///
/// Joins the lines, lower-cases them, and returns the first category (in
/// priority order) with a keyword occurring as a substring. First match wins,
/// not best match.
#[must_use]
pub fn classify<S: AsRef<str>>(ingredients: &[S]) -> ProteinCategory {
    if ingredients.is_empty() {
        return ProteinCategory::Other;
    }

    let text = ingredients
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    KEYWORDS
        .iter()
        .find(|(_, words)| words.iter().any(|w| text.contains(w)))
        .map_or(ProteinCategory::Other, |(category, _)| *category)
}
