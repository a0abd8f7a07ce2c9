//! `mealplanner` - A recipe book and weekly menu planner
//!
//! This library provides the recipe book, the lunch/dinner weekly menu, the
//! protein-aware meal suggestion engine, and the consolidated shopping list,
//! backed by a local `SQLite` store.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod import;
pub mod logging;
pub mod menu;
pub mod protein;
pub mod recipe;
pub mod shopping;
pub mod storage;
pub mod suggest;

pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use menu::{Meal, WeeklyMenu, Weekday};
pub use protein::{classify, ProteinCategory};
pub use recipe::Recipe;
pub use shopping::{ShoppingList, ShoppingListEntry};
pub use storage::{RecipeFilter, Storage, StorageStats};
pub use suggest::SuggestionEngine;
