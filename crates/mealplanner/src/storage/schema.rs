//! `SQLite` schema definitions for mealplanner.
//!
//! The metadata table is created up front because it holds the schema
//! version. Everything else is created by a numbered migration.

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// SQL statement to create the recipes table.
///
/// List fields are stored as JSON arrays.
pub const CREATE_RECIPES_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS recipes (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    ingredients TEXT NOT NULL DEFAULT '[]',
    instructions TEXT NOT NULL DEFAULT '[]',
    categories TEXT NOT NULL DEFAULT '[]',
    image_ref TEXT,
    is_favorite INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
";

/// SQL statement to create an index on recipe name for ordered listings.
pub const CREATE_RECIPE_NAME_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_recipes_name ON recipes(name COLLATE NOCASE)
";

/// SQL statement to create an index on the favorite flag.
pub const CREATE_RECIPE_FAVORITE_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_recipes_favorite ON recipes(is_favorite)
";

/// SQL statement to create the weekly menus table.
///
/// One row per week, keyed by the ISO date of its Monday. The day plans and
/// the shopping list live in the same row as JSON documents.
pub const CREATE_WEEKLY_MENUS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS weekly_menus (
    week_start TEXT PRIMARY KEY,
    week_end TEXT NOT NULL,
    days TEXT NOT NULL DEFAULT '{}',
    shopping_list TEXT NOT NULL DEFAULT '[]',
    updated_at TEXT NOT NULL
)
";

/// Statements created before any migration runs.
pub const BASE_STATEMENTS: &[&str] = &[CREATE_METADATA_TABLE];

/// Statements for schema version 1: the recipe book and the weekly menus.
pub const V1_STATEMENTS: &[&str] = &[
    CREATE_RECIPES_TABLE,
    CREATE_RECIPE_NAME_INDEX,
    CREATE_RECIPE_FAVORITE_INDEX,
    CREATE_WEEKLY_MENUS_TABLE,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statement_groups_not_empty() {
        for group in [BASE_STATEMENTS, V1_STATEMENTS] {
            assert!(!group.is_empty());
            for stmt in group {
                assert!(!stmt.trim().is_empty());
            }
        }
    }

    #[test]
    fn test_recipes_table_contains_required_columns() {
        assert!(CREATE_RECIPES_TABLE.contains("id TEXT PRIMARY KEY"));
        assert!(CREATE_RECIPES_TABLE.contains("ingredients TEXT NOT NULL"));
        assert!(CREATE_RECIPES_TABLE.contains("instructions TEXT NOT NULL"));
        assert!(CREATE_RECIPES_TABLE.contains("is_favorite INTEGER"));
    }

    #[test]
    fn test_weekly_menus_table_merges_shopping_list() {
        assert!(CREATE_WEEKLY_MENUS_TABLE.contains("week_start TEXT PRIMARY KEY"));
        assert!(CREATE_WEEKLY_MENUS_TABLE.contains("days TEXT"));
        assert!(CREATE_WEEKLY_MENUS_TABLE.contains("shopping_list TEXT"));
    }
}
