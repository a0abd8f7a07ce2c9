//! Shopping list consolidation.
//!
//! Builds a deduplicated, counted, alphabetically sorted ingredient list from
//! every recipe assigned in a [`WeeklyMenu`]. Ingredients are matched on their
//! trimmed, lower-cased text; the first spelling seen becomes the display
//! name.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use mealplanner::menu::{Meal, WeeklyMenu, Weekday};
//! use mealplanner::recipe::Recipe;
//! use mealplanner::shopping;
//!
//! let monday = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
//! let mut menu = WeeklyMenu::new(monday);
//! menu.assign(Weekday::Monday, Meal::Lunch, Recipe::new("Bizcocho", ["Harina", "Huevos"], ["Hornear"]));
//! menu.assign(Weekday::Monday, Meal::Dinner, Recipe::new("Crepes", [" harina "], ["Freír"]));
//!
//! let list = shopping::build(&menu);
//! assert_eq!(list[0].name, "Harina");
//! assert_eq!(list[0].count, 2);
//! ```

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::menu::WeeklyMenu;

/// One consolidated ingredient on the shopping list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingListEntry {
    /// Display name, with the casing of its first occurrence.
    pub name: String,
    /// How many times the ingredient occurs across the week. Always at least 1.
    pub count: u32,
    /// Whether the user ticked this item off.
    #[serde(default)]
    pub checked: bool,
}

impl ShoppingListEntry {
    /// Create an unchecked entry.
    #[must_use]
    pub fn new(name: impl Into<String>, count: u32) -> Self {
        Self {
            name: name.into(),
            count: count.max(1),
            checked: false,
        }
    }

    /// The key used to match this entry against ingredients and other entries.
    #[must_use]
    pub fn key(&self) -> String {
        normalize(&self.name)
    }
}

/// Matching form of an ingredient: trimmed and lower-cased.
#[must_use]
pub fn normalize(ingredient: &str) -> String {
    ingredient.trim().to_lowercase()
}

fn fold_diacritic(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        _ => c,
    }
}

/// Sort key approximating locale-aware ordering: case and Latin accents are
/// ignored at the primary level.
fn collation_key(name: &str) -> String {
    name.trim()
        .chars()
        .flat_map(char::to_lowercase)
        .map(fold_diacritic)
        .collect()
}

fn sort_entries(entries: &mut [ShoppingListEntry]) {
    entries.sort_by_cached_key(|e| (collation_key(&e.name), e.name.clone()));
}

/// Build the shopping list for a menu.
///
/// Ingredients are gathered in day-then-meal order, so the display name is
/// the spelling used by the earliest slot. Blank ingredient lines are
/// skipped. Every entry starts unchecked.
#[must_use]
pub fn build(menu: &WeeklyMenu) -> Vec<ShoppingListEntry> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut entries: Vec<ShoppingListEntry> = Vec::new();

    for (_, _, recipe) in menu.slots() {
        for ingredient in &recipe.ingredients {
            let key = normalize(ingredient);
            if key.is_empty() {
                continue;
            }
            match positions.entry(key) {
                Entry::Occupied(slot) => entries[*slot.get()].count += 1,
                Entry::Vacant(slot) => {
                    slot.insert(entries.len());
                    entries.push(ShoppingListEntry::new(ingredient.trim(), 1));
                }
            }
        }
    }

    sort_entries(&mut entries);
    debug!(
        week = %menu.week_id(),
        entries = entries.len(),
        "Built shopping list"
    );
    entries
}

/// Build the shopping list and carry check marks over from `prior`.
///
/// Entries are matched by normalized name. New entries start unchecked and
/// prior entries that no longer appear are dropped.
#[must_use]
pub fn build_with_prior(menu: &WeeklyMenu, prior: &[ShoppingListEntry]) -> Vec<ShoppingListEntry> {
    let checked: HashMap<String, bool> = prior
        .iter()
        .filter(|e| e.checked)
        .map(|e| (e.key(), true))
        .collect();

    let mut entries = build(menu);
    for entry in &mut entries {
        entry.checked = checked.contains_key(&entry.key());
    }
    entries
}

/// A shopping list being edited during a session.
///
/// Serializes as a plain array of entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShoppingList {
    entries: Vec<ShoppingListEntry>,
}

impl From<Vec<ShoppingListEntry>> for ShoppingList {
    fn from(entries: Vec<ShoppingListEntry>) -> Self {
        Self { entries }
    }
}

impl ShoppingList {
    /// An empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh, fully unchecked list for `menu`.
    #[must_use]
    pub fn from_menu(menu: &WeeklyMenu) -> Self {
        Self::from(build(menu))
    }

    /// The entries in display order.
    #[must_use]
    pub fn entries(&self) -> &[ShoppingListEntry] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries not yet checked.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.entries.iter().filter(|e| !e.checked).count()
    }

    /// Recompute the list from `menu`, keeping check marks for entries that
    /// are still present.
    pub fn rebuild(&mut self, menu: &WeeklyMenu) {
        self.entries = build_with_prior(menu, &self.entries);
    }

    /// Recompute the list from `menu` with every entry unchecked.
    pub fn reset(&mut self, menu: &WeeklyMenu) {
        self.entries = build(menu);
    }

    /// Add an item by hand.
    ///
    /// If an entry with the same normalized name exists its count goes up,
    /// otherwise a new unchecked entry is appended. Returns the entry's new
    /// count, or `None` if `text` is blank.
    pub fn add_item(&mut self, text: &str) -> Option<u32> {
        let key = normalize(text);
        if key.is_empty() {
            return None;
        }

        if let Some(entry) = self.find_mut(&key) {
            entry.count += 1;
            return Some(entry.count);
        }

        self.entries.push(ShoppingListEntry::new(text.trim(), 1));
        Some(1)
    }

    /// Flip the check mark of the named entry, returning its new state.
    pub fn toggle(&mut self, name: &str) -> Option<bool> {
        let entry = self.find_mut(&normalize(name))?;
        entry.checked = !entry.checked;
        Some(entry.checked)
    }

    /// Remove the named entry. Returns `false` if there was none.
    pub fn remove(&mut self, name: &str) -> bool {
        let key = normalize(name);
        let before = self.entries.len();
        self.entries.retain(|e| e.key() != key);
        self.entries.len() != before
    }

    /// Entries whose name contains `term`, ignoring case. A blank term
    /// returns every entry.
    #[must_use]
    pub fn search(&self, term: &str) -> Vec<&ShoppingListEntry> {
        let term = normalize(term);
        self.entries
            .iter()
            .filter(|e| term.is_empty() || e.name.to_lowercase().contains(&term))
            .collect()
    }

    fn find_mut(&mut self, key: &str) -> Option<&mut ShoppingListEntry> {
        self.entries.iter_mut().find(|e| e.key() == key)
    }
}
