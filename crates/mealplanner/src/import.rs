//! Bulk recipe import from JSON.
//!
//! Reads a collection of the form `{"recipes": [ ... ]}`. Field names from
//! the Spanish document export (`nombre`, `ingredientes`, `instrucciones`,
//! `categoria`, `imagen`, `fav`, and a top-level `recetas`) are accepted as
//! aliases.
//!
//! Entries that cannot become a valid recipe are skipped and logged; the
//! import as a whole only fails when there is nothing to import.

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::recipe::Recipe;

/// Result of parsing a recipe collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportOutcome {
    /// Recipes that passed validation, in input order.
    pub recipes: Vec<Recipe>,
    /// Number of entries that were skipped.
    pub skipped: usize,
}

#[derive(Debug, Deserialize)]
struct Collection {
    #[serde(default, alias = "recetas")]
    recipes: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Categories {
    One(String),
    Many(Vec<String>),
}

impl Categories {
    fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(tag) => vec![tag],
            Self::Many(tags) => tags,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ImportedRecipe {
    #[serde(default, alias = "nombre")]
    name: Option<String>,
    #[serde(default, alias = "ingredientes")]
    ingredients: Option<Vec<String>>,
    #[serde(default, alias = "instrucciones")]
    instructions: Option<Vec<String>>,
    #[serde(default, alias = "categoria")]
    categories: Option<Categories>,
    #[serde(default, alias = "fav")]
    favorite: Option<bool>,
    #[serde(default, alias = "imagen")]
    image: Option<String>,
}

impl ImportedRecipe {
    fn into_recipe(self) -> Result<Recipe> {
        let name = self
            .name
            .ok_or_else(|| Error::invalid_recipe("missing name"))?;

        let mut recipe = Recipe::new(
            name,
            self.ingredients.unwrap_or_default(),
            self.instructions.unwrap_or_default(),
        )
        .with_favorite(self.favorite.unwrap_or(false));

        for tag in self.categories.map(Categories::into_vec).unwrap_or_default() {
            recipe = recipe.with_category(tag);
        }

        if let Some(image) = self.image.filter(|i| is_plain_reference(i)) {
            recipe = recipe.with_image(image.trim());
        }

        recipe.validate()?;
        Ok(recipe)
    }
}

/// Inline images are not stored; only references survive an import.
fn is_plain_reference(image: &str) -> bool {
    let image = image.trim();
    !image.is_empty() && !image.starts_with("data:")
}

/// Parse a JSON recipe collection.
///
/// # Errors
///
/// Returns [`Error::Json`] if the input is not a JSON object, or
/// [`Error::Import`] if the collection is missing or empty.
pub fn parse_collection(json: &str) -> Result<ImportOutcome> {
    let collection: Collection = serde_json::from_str(json)?;
    let entries = collection
        .recipes
        .filter(|entries| !entries.is_empty())
        .ok_or_else(|| Error::import("no recipes found in collection"))?;

    let mut outcome = ImportOutcome::default();
    for (index, entry) in entries.into_iter().enumerate() {
        let parsed = serde_json::from_value::<ImportedRecipe>(entry)
            .map_err(Error::from)
            .and_then(ImportedRecipe::into_recipe);

        match parsed {
            Ok(recipe) => {
                debug!(index, id = %recipe.id, "Accepted recipe");
                outcome.recipes.push(recipe);
            }
            Err(e) => {
                warn!(index, error = %e, "Skipping recipe entry");
                outcome.skipped += 1;
            }
        }
    }

    info!(
        accepted = outcome.recipes.len(),
        skipped = outcome.skipped,
        "Parsed recipe collection"
    );
    Ok(outcome)
}

/// Read and parse a JSON recipe collection from disk.
///
/// # Errors
///
/// Returns an error if the file cannot be read or [`parse_collection`] fails.
pub fn parse_file(path: impl AsRef<Path>) -> Result<ImportOutcome> {
    let path = path.as_ref();
    debug!("Reading recipe collection from {}", path.display());
    let json = std::fs::read_to_string(path)?;
    parse_collection(&json)
}
