//! Storage layer for mealplanner.
//!
//! This module provides `SQLite`-based persistent storage for the recipe book
//! and the weekly menus. Each week is one row holding its day plans and its
//! shopping list, so saving a menu always saves the matching list.

pub mod migrations;
pub mod schema;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::menu::{monday_of, DayPlan, WeeklyMenu, Weekday};
use crate::recipe::Recipe;
use crate::shopping::ShoppingList;

const DATE_FORMAT: &str = "%Y-%m-%d";

const RECIPE_COLUMNS: &str =
    "id, name, ingredients, instructions, categories, image_ref, is_favorite";

/// Which recipes a listing should return.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RecipeFilter {
    /// Every recipe.
    #[default]
    All,
    /// Only recipes marked as favorite.
    Favorites,
    /// Only recipes carrying the given category tag (case-insensitive).
    Category(String),
}

/// Storage engine for recipes and weekly menus.
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist,
    /// then brings the schema up to date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let mut conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        migrations::initialize_schema(&mut conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory storage instance for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&mut conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    // === Recipes ===

    /// Insert or replace a recipe, keyed by its id.
    ///
    /// The creation time of an existing recipe is preserved.
    ///
    /// # Errors
    ///
    /// Returns an error if the recipe is invalid or the database operation fails.
    pub fn save_recipe(&self, recipe: &Recipe) -> Result<()> {
        Self::write_recipe(&self.conn, recipe)?;
        debug!(id = %recipe.id, "Saved recipe");
        Ok(())
    }

    /// Save many recipes in one transaction.
    ///
    /// Returns the number of recipes written. Nothing is written if any
    /// recipe is invalid.
    ///
    /// # Errors
    ///
    /// Returns an error if a recipe is invalid or the database operation fails.
    pub fn save_recipes(&mut self, recipes: &[Recipe]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        for recipe in recipes {
            Self::write_recipe(&tx, recipe)?;
        }
        tx.commit()?;

        info!("Saved {} recipes", recipes.len());
        Ok(recipes.len())
    }

    fn write_recipe(conn: &Connection, recipe: &Recipe) -> Result<()> {
        recipe.validate()?;
        let now = Utc::now().to_rfc3339();

        conn.execute(
            r"
            INSERT INTO recipes
                (id, name, ingredients, instructions, categories, image_ref, is_favorite,
                 created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                ingredients = excluded.ingredients,
                instructions = excluded.instructions,
                categories = excluded.categories,
                image_ref = excluded.image_ref,
                is_favorite = excluded.is_favorite,
                updated_at = excluded.updated_at
            ",
            params![
                recipe.id,
                recipe.name,
                to_json(&recipe.ingredients)?,
                to_json(&recipe.instructions)?,
                to_json(&recipe.categories)?,
                recipe.image_ref,
                recipe.is_favorite,
                now,
            ],
        )?;
        Ok(())
    }

    /// Get a recipe by its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get_recipe(&self, id: &str) -> Result<Option<Recipe>> {
        let sql = format!("SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = ?1");
        let recipe = self
            .conn
            .query_row(&sql, [id], Self::row_to_recipe)
            .optional()?;
        Ok(recipe)
    }

    /// Get a recipe by its id, failing if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecipeNotFound`] if there is no such recipe, or an
    /// error if the database operation fails.
    pub fn require_recipe(&self, id: &str) -> Result<Recipe> {
        self.get_recipe(id)?
            .ok_or_else(|| Error::recipe_not_found(id))
    }

    /// List recipes ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_recipes(&self, filter: &RecipeFilter) -> Result<Vec<Recipe>> {
        let where_clause = match filter {
            RecipeFilter::Favorites => "WHERE is_favorite = 1",
            RecipeFilter::All | RecipeFilter::Category(_) => "",
        };
        let sql = format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes {where_clause} ORDER BY name COLLATE NOCASE, id"
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let recipes = stmt
            .query_map([], Self::row_to_recipe)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(match filter {
            RecipeFilter::Category(tag) => recipes
                .into_iter()
                .filter(|r| r.has_category(tag.trim()))
                .collect(),
            RecipeFilter::All | RecipeFilter::Favorites => recipes,
        })
    }

    /// Search recipes by name or ingredient, ignoring case.
    ///
    /// Matching is done after loading so accented letters compare correctly.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn search_recipes(&self, term: &str) -> Result<Vec<Recipe>> {
        let recipes = self.list_recipes(&RecipeFilter::All)?;
        Ok(recipes
            .into_iter()
            .filter(|r| r.matches_search(term))
            .collect())
    }

    /// Set the favorite flag of a recipe.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecipeNotFound`] if there is no such recipe.
    pub fn set_favorite(&self, id: &str, is_favorite: bool) -> Result<()> {
        let affected = self.conn.execute(
            "UPDATE recipes SET is_favorite = ?1, updated_at = ?2 WHERE id = ?3",
            params![is_favorite, Utc::now().to_rfc3339(), id],
        )?;
        if affected == 0 {
            return Err(Error::recipe_not_found(id));
        }
        debug!(id, is_favorite, "Updated favorite flag");
        Ok(())
    }

    /// Flip the favorite flag of a recipe and return the new value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecipeNotFound`] if there is no such recipe.
    pub fn toggle_favorite(&self, id: &str) -> Result<bool> {
        let mut recipe = self.require_recipe(id)?;
        let is_favorite = recipe.toggle_favorite();
        self.set_favorite(id, is_favorite)?;
        Ok(is_favorite)
    }

    /// Delete a recipe by id.
    ///
    /// Returns `true` if a recipe was deleted. Menus keep their own copy of
    /// assigned recipes and are not touched.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn delete_recipe(&self, id: &str) -> Result<bool> {
        let affected = self.conn.execute("DELETE FROM recipes WHERE id = ?1", [id])?;
        if affected > 0 {
            info!(id, "Deleted recipe");
        }
        Ok(affected > 0)
    }

    /// Count stored recipes.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count_recipes(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM recipes", [], |row| row.get(0))?;
        Ok(count)
    }

    fn row_to_recipe(row: &Row) -> rusqlite::Result<Recipe> {
        Ok(Recipe {
            id: row.get(0)?,
            name: row.get(1)?,
            ingredients: json_column(row, 2)?,
            instructions: json_column(row, 3)?,
            categories: json_column(row, 4)?,
            image_ref: row.get(5)?,
            is_favorite: row.get(6)?,
        })
    }

    // === Weekly menus ===

    /// Save a week's menu together with its shopping list.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the database operation fails.
    pub fn save_menu(&self, menu: &WeeklyMenu, shopping: &ShoppingList) -> Result<()> {
        self.conn.execute(
            r"
            INSERT OR REPLACE INTO weekly_menus
                (week_start, week_end, days, shopping_list, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ",
            params![
                menu.week_id(),
                menu.week_end().format(DATE_FORMAT).to_string(),
                to_json(menu.days())?,
                to_json(shopping)?,
                Utc::now().to_rfc3339(),
            ],
        )?;

        debug!(
            week = %menu.week_id(),
            slots = menu.assigned_count(),
            items = shopping.len(),
            "Saved weekly menu"
        );
        Ok(())
    }

    /// Load the menu of the week containing `date`.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored documents are corrupt or the database
    /// operation fails.
    pub fn load_menu(&self, date: NaiveDate) -> Result<Option<(WeeklyMenu, ShoppingList)>> {
        let week_start = monday_of(date);
        let row: Option<(String, String)> = self
            .conn
            .query_row(
                "SELECT days, shopping_list FROM weekly_menus WHERE week_start = ?1",
                [week_start.format(DATE_FORMAT).to_string()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        row.map(|(days, list)| Self::decode_menu(week_start, &days, &list))
            .transpose()
    }

    /// Load the menu of the week containing `date`, or an empty one.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored documents are corrupt or the database
    /// operation fails.
    pub fn load_or_empty_menu(&self, date: NaiveDate) -> Result<(WeeklyMenu, ShoppingList)> {
        Ok(self
            .load_menu(date)?
            .unwrap_or_else(|| (WeeklyMenu::new(date), ShoppingList::new())))
    }

    /// Load the week containing `date`, or the most recent stored week when
    /// that week has no document. Falls back to an empty menu for `date`.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored documents are corrupt or the database
    /// operation fails.
    pub fn load_menu_or_latest(&self, date: NaiveDate) -> Result<(WeeklyMenu, ShoppingList)> {
        if let Some(found) = self.load_menu(date)? {
            return Ok(found);
        }
        match self.latest_menu()? {
            Some(latest) => {
                debug!(week = %latest.0.week_id(), "No menu for this week, using latest");
                Ok(latest)
            }
            None => Ok((WeeklyMenu::new(date), ShoppingList::new())),
        }
    }

    /// Load the most recent stored week.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored documents are corrupt or the database
    /// operation fails.
    pub fn latest_menu(&self) -> Result<Option<(WeeklyMenu, ShoppingList)>> {
        let row: Option<(String, String, String)> = self
            .conn
            .query_row(
                r"
                SELECT week_start, days, shopping_list FROM weekly_menus
                ORDER BY week_start DESC LIMIT 1
                ",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;

        row.map(|(week, days, list)| Self::decode_menu(parse_date(&week)?, &days, &list))
            .transpose()
    }

    /// Delete the menu of the week containing `date`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn delete_menu(&self, date: NaiveDate) -> Result<bool> {
        let week = monday_of(date).format(DATE_FORMAT).to_string();
        let affected = self
            .conn
            .execute("DELETE FROM weekly_menus WHERE week_start = ?1", [&week])?;
        if affected > 0 {
            info!(week = %week, "Deleted weekly menu");
        }
        Ok(affected > 0)
    }

    /// Mondays of every stored week, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_menu_weeks(&self) -> Result<Vec<NaiveDate>> {
        let mut stmt = self
            .conn
            .prepare("SELECT week_start FROM weekly_menus ORDER BY week_start ASC")?;
        let weeks = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        weeks.iter().map(|w| parse_date(w)).collect()
    }

    fn decode_menu(
        week_start: NaiveDate,
        days: &str,
        list: &str,
    ) -> Result<(WeeklyMenu, ShoppingList)> {
        let days: BTreeMap<Weekday, DayPlan> = serde_json::from_str(days)?;
        let shopping: ShoppingList = serde_json::from_str(list)?;
        Ok((WeeklyMenu::from_days(week_start, days), shopping))
    }

    /// Get database statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<StorageStats> {
        let total_recipes = self.count_recipes()?;
        let favorite_recipes: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM recipes WHERE is_favorite = 1",
            [],
            |row| row.get(0),
        )?;
        let menu_weeks: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM weekly_menus", [], |row| row.get(0))?;
        let latest: Option<String> = self
            .conn
            .query_row("SELECT MAX(week_start) FROM weekly_menus", [], |row| {
                row.get(0)
            })?;

        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StorageStats {
            total_recipes,
            favorite_recipes,
            menu_weeks,
            latest_week: latest.as_deref().map(parse_date).transpose()?,
            db_size_bytes,
        })
    }
}

/// Statistics about the storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageStats {
    /// Number of recipes in the book.
    pub total_recipes: i64,
    /// Number of recipes marked as favorite.
    pub favorite_recipes: i64,
    /// Number of stored weekly menus.
    pub menu_weeks: i64,
    /// Monday of the most recent stored week.
    pub latest_week: Option<NaiveDate>,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

fn json_column<T: DeserializeOwned>(row: &Row, idx: usize) -> rusqlite::Result<T> {
    let text: String = row.get(idx)?;
    serde_json::from_str(&text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| Error::internal(format!("stored week '{value}' is not a date: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::Meal;

    fn create_test_storage() -> Storage {
        Storage::open_in_memory().expect("failed to create test storage")
    }

    fn create_test_recipe(name: &str, ingredients: &[&str]) -> Recipe {
        Recipe::new(name, ingredients.iter().copied(), ["Cocinar"])
    }

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    #[test]
    fn test_open_in_memory() {
        assert!(Storage::open_in_memory().is_ok());
    }

    #[test]
    fn test_path() {
        let storage = create_test_storage();
        assert_eq!(storage.path().to_string_lossy(), ":memory:");
    }

    #[test]
    fn test_save_and_get_recipe() {
        let storage = create_test_storage();
        let recipe = create_test_recipe("Pollo al limón", &["pollo", "limón"])
            .with_category("dinner")
            .with_image("images/pollo.jpg");

        storage.save_recipe(&recipe).unwrap();

        let loaded = storage.get_recipe("pollo-al-limón").unwrap().unwrap();
        assert_eq!(loaded, recipe);
    }

    #[test]
    fn test_save_recipe_upserts() {
        let storage = create_test_storage();
        storage
            .save_recipe(&create_test_recipe("Gazpacho", &["tomate"]))
            .unwrap();
        storage
            .save_recipe(&create_test_recipe("Gazpacho", &["tomate", "pepino"]))
            .unwrap();

        assert_eq!(storage.count_recipes().unwrap(), 1);
        let loaded = storage.require_recipe("gazpacho").unwrap();
        assert_eq!(loaded.ingredients.len(), 2);
    }

    #[test]
    fn test_save_recipe_rejects_invalid() {
        let storage = create_test_storage();
        let recipe = Recipe::new("Nada", Vec::<String>::new(), ["x"]);

        let err = storage.save_recipe(&recipe).unwrap_err();
        assert!(matches!(err, Error::InvalidRecipe { .. }));
        assert_eq!(storage.count_recipes().unwrap(), 0);
    }

    #[test]
    fn test_save_recipes_is_atomic() {
        let mut storage = create_test_storage();
        let recipes = vec![
            create_test_recipe("Uno", &["a"]),
            Recipe::new("Dos", ["b"], Vec::<String>::new()),
        ];

        assert!(storage.save_recipes(&recipes).is_err());
        assert_eq!(storage.count_recipes().unwrap(), 0);

        let saved = storage.save_recipes(&recipes[..1]).unwrap();
        assert_eq!(saved, 1);
    }

    #[test]
    fn test_get_nonexistent_recipe() {
        let storage = create_test_storage();
        assert!(storage.get_recipe("nope").unwrap().is_none());
        assert!(storage.require_recipe("nope").unwrap_err().is_not_found());
    }

    #[test]
    fn test_list_recipes_ordered_by_name() {
        let storage = create_test_storage();
        for name in ["paella", "Albóndigas", "Macarrones"] {
            storage
                .save_recipe(&create_test_recipe(name, &["x"]))
                .unwrap();
        }

        let names: Vec<String> = storage
            .list_recipes(&RecipeFilter::All)
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["Albóndigas", "Macarrones", "paella"]);
    }

    #[test]
    fn test_list_recipes_filters() {
        let storage = create_test_storage();
        storage
            .save_recipe(&create_test_recipe("Lentejas", &["lentejas"]).with_category("lunch"))
            .unwrap();
        storage
            .save_recipe(
                &create_test_recipe("Crema", &["calabaza"])
                    .with_category("dinner")
                    .with_favorite(true),
            )
            .unwrap();

        let favorites = storage.list_recipes(&RecipeFilter::Favorites).unwrap();
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].id, "crema");

        let lunch = storage
            .list_recipes(&RecipeFilter::Category("LUNCH".to_string()))
            .unwrap();
        assert_eq!(lunch.len(), 1);
        assert_eq!(lunch[0].id, "lentejas");
    }

    #[test]
    fn test_search_recipes() {
        let storage = create_test_storage();
        storage
            .save_recipe(&create_test_recipe("Salmón al horno", &["salmón", "limón"]))
            .unwrap();
        storage
            .save_recipe(&create_test_recipe("Ensalada", &["lechuga", "LIMÓN"]))
            .unwrap();

        assert_eq!(storage.search_recipes("SALMÓN").unwrap().len(), 1);
        assert_eq!(storage.search_recipes("limón").unwrap().len(), 2);
        assert_eq!(storage.search_recipes("").unwrap().len(), 2);
        assert!(storage.search_recipes("trufa").unwrap().is_empty());
    }

    #[test]
    fn test_favorites() {
        let storage = create_test_storage();
        storage
            .save_recipe(&create_test_recipe("Flan", &["huevos", "leche"]))
            .unwrap();

        assert!(storage.toggle_favorite("flan").unwrap());
        assert!(storage.require_recipe("flan").unwrap().is_favorite);
        assert!(!storage.toggle_favorite("flan").unwrap());

        storage.set_favorite("flan", true).unwrap();
        assert!(storage.require_recipe("flan").unwrap().is_favorite);

        assert!(storage.set_favorite("nope", true).unwrap_err().is_not_found());
    }

    #[test]
    fn test_delete_recipe() {
        let storage = create_test_storage();
        storage
            .save_recipe(&create_test_recipe("Flan", &["huevos"]))
            .unwrap();

        assert!(storage.delete_recipe("flan").unwrap());
        assert!(!storage.delete_recipe("flan").unwrap());
        assert_eq!(storage.count_recipes().unwrap(), 0);
    }

    #[test]
    fn test_menu_round_trip_with_shopping_list() {
        let storage = create_test_storage();
        let mut menu = WeeklyMenu::new(monday());
        menu.assign(
            Weekday::Monday,
            Meal::Lunch,
            create_test_recipe("Paella", &["arroz", "gambas"]),
        );
        menu.assign(
            Weekday::Thursday,
            Meal::Dinner,
            create_test_recipe("Arroz con leche", &["Arroz", "leche"]),
        );
        let mut shopping = ShoppingList::from_menu(&menu);
        shopping.toggle("leche");

        storage.save_menu(&menu, &shopping).unwrap();

        let wednesday = monday() + chrono::Duration::days(2);
        let (loaded, list) = storage.load_menu(wednesday).unwrap().unwrap();
        assert_eq!(loaded, menu);
        assert_eq!(list, shopping);
        assert_eq!(list.remaining(), list.len() - 1);
    }

    #[test]
    fn test_load_missing_menu() {
        let storage = create_test_storage();
        assert!(storage.load_menu(monday()).unwrap().is_none());

        let (menu, list) = storage.load_or_empty_menu(monday()).unwrap();
        assert!(menu.is_empty());
        assert!(list.is_empty());
        assert_eq!(menu.week_start(), monday());
    }

    #[test]
    fn test_latest_menu_and_weeks() {
        let storage = create_test_storage();
        assert!(storage.latest_menu().unwrap().is_none());

        let later = monday() + chrono::Duration::days(14);
        for date in [later, monday()] {
            storage
                .save_menu(&WeeklyMenu::new(date), &ShoppingList::new())
                .unwrap();
        }

        let (latest, _) = storage.latest_menu().unwrap().unwrap();
        assert_eq!(latest.week_start(), later);
        assert_eq!(storage.list_menu_weeks().unwrap(), vec![monday(), later]);
    }

    #[test]
    fn test_load_menu_or_latest_prefers_requested_week() {
        let storage = create_test_storage();
        let next_week = monday() + chrono::Duration::days(7);
        let mut menu = WeeklyMenu::new(monday());
        menu.assign(
            Weekday::Friday,
            Meal::Lunch,
            create_test_recipe("Lentejas", &["lentejas", "chorizo"]),
        );
        storage
            .save_menu(&menu, &ShoppingList::from_menu(&menu))
            .unwrap();
        storage
            .save_menu(&WeeklyMenu::new(next_week), &ShoppingList::new())
            .unwrap();

        let (loaded, list) = storage.load_menu_or_latest(monday()).unwrap();
        assert_eq!(loaded.week_start(), monday());
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_load_menu_or_latest_falls_back_to_latest_week() {
        let storage = create_test_storage();
        let mut menu = WeeklyMenu::new(monday());
        menu.assign(
            Weekday::Monday,
            Meal::Dinner,
            create_test_recipe("Tortilla", &["huevos", "patatas"]),
        );
        let mut shopping = ShoppingList::from_menu(&menu);
        shopping.toggle("huevos");
        storage.save_menu(&menu, &shopping).unwrap();

        let later = monday() + chrono::Duration::days(8);
        let (loaded, list) = storage.load_menu_or_latest(later).unwrap();
        assert_eq!(loaded.week_start(), monday());
        assert_eq!(list, shopping);
        assert_eq!(list.remaining(), 1);
    }

    #[test]
    fn test_load_menu_or_latest_empty_store() {
        let storage = create_test_storage();
        let later = monday() + chrono::Duration::days(8);
        let (menu, list) = storage.load_menu_or_latest(later).unwrap();
        assert!(menu.is_empty());
        assert!(list.is_empty());
        assert_eq!(menu.week_start(), monday() + chrono::Duration::days(7));
    }

    #[test]
    fn test_delete_menu() {
        let storage = create_test_storage();
        storage
            .save_menu(&WeeklyMenu::new(monday()), &ShoppingList::new())
            .unwrap();

        assert!(storage.delete_menu(monday()).unwrap());
        assert!(!storage.delete_menu(monday()).unwrap());
        assert!(storage.list_menu_weeks().unwrap().is_empty());
    }

    #[test]
    fn test_stats() {
        let storage = create_test_storage();
        let stats = storage.stats().unwrap();
        assert_eq!(stats.total_recipes, 0);
        assert!(stats.latest_week.is_none());

        storage
            .save_recipe(&create_test_recipe("Flan", &["huevos"]).with_favorite(true))
            .unwrap();
        storage
            .save_recipe(&create_test_recipe("Sopa", &["fideos"]))
            .unwrap();
        storage
            .save_menu(&WeeklyMenu::new(monday()), &ShoppingList::new())
            .unwrap();

        let stats = storage.stats().unwrap();
        assert_eq!(stats.total_recipes, 2);
        assert_eq!(stats.favorite_recipes, 1);
        assert_eq!(stats.menu_weeks, 1);
        assert_eq!(stats.latest_week, Some(monday()));
        assert_eq!(stats.db_size_bytes, 0);
    }

    #[test]
    fn test_open_file_based() {
        let db_path = std::env::temp_dir().join(format!(
            "mealplanner_test_{}/nested/menu.db",
            std::process::id()
        ));
        if let Some(parent) = db_path.parent() {
            let _ = std::fs::remove_dir_all(parent);
        }

        let storage = Storage::open(&db_path).unwrap();
        storage
            .save_recipe(&create_test_recipe("Flan", &["huevos"]))
            .unwrap();
        assert_eq!(storage.path(), db_path);
        assert!(storage.stats().unwrap().db_size_bytes > 0);
        drop(storage);

        let reopened = Storage::open(&db_path).unwrap();
        assert_eq!(reopened.count_recipes().unwrap(), 1);

        drop(reopened);
        if let Some(parent) = db_path.parent().and_then(Path::parent) {
            let _ = std::fs::remove_dir_all(parent);
        }
    }
}
