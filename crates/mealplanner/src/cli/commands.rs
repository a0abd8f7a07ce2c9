//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Subcommand, ValueEnum};

use crate::menu::{Meal, Weekday};

/// Recipe book commands.
#[derive(Debug, Subcommand)]
pub enum RecipeCommand {
    /// Add or replace a recipe
    Add(RecipeAddCommand),

    /// List recipes
    List {
        /// Only show favorites
        #[arg(long, conflicts_with = "category")]
        favorites: bool,

        /// Only show recipes with this category tag
        #[arg(long)]
        category: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Show one recipe in full
    Show {
        /// Recipe id
        id: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "plain")]
        format: OutputFormat,
    },

    /// Search recipes by name or ingredient
    Search {
        /// Text to look for
        term: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Toggle the favorite flag of a recipe
    Favorite {
        /// Recipe id
        id: String,
    },

    /// Delete a recipe
    Delete {
        /// Recipe id
        id: String,
    },

    /// Import recipes from a JSON collection
    Import {
        /// Path to a file containing `{"recipes": [...]}`
        file: PathBuf,
    },
}

/// Arguments for `recipe add`.
#[derive(Debug, Args)]
pub struct RecipeAddCommand {
    /// Recipe name
    #[arg(short, long)]
    pub name: String,

    /// Ingredient line (repeat for each ingredient)
    #[arg(short, long = "ingredient", required = true)]
    pub ingredients: Vec<String>,

    /// Preparation step (repeat for each step)
    #[arg(short = 's', long = "instruction", required = true)]
    pub instructions: Vec<String>,

    /// Category tag such as lunch or dinner (repeatable)
    #[arg(long = "category")]
    pub categories: Vec<String>,

    /// Image reference
    #[arg(long)]
    pub image: Option<String>,

    /// Mark as favorite
    #[arg(long)]
    pub favorite: bool,
}

/// Weekly menu commands.
#[derive(Debug, Subcommand)]
pub enum MenuCommand {
    /// Show the menu for a week
    Show {
        /// Week to operate on
        #[command(flatten)]
        week: WeekArg,

        /// Output format
        #[arg(short, long, value_enum, default_value = "plain")]
        format: OutputFormat,
    },

    /// Put a recipe into a slot
    Assign {
        /// Day of the week
        #[arg(value_enum)]
        day: WeekdayArg,

        /// Lunch or dinner
        #[arg(value_enum)]
        meal: MealArg,

        /// Id of the recipe to assign
        recipe_id: String,

        /// Week to operate on
        #[command(flatten)]
        week: WeekArg,
    },

    /// Empty a slot
    Remove {
        /// Day of the week
        #[arg(value_enum)]
        day: WeekdayArg,

        /// Lunch or dinner
        #[arg(value_enum)]
        meal: MealArg,

        /// Week to operate on
        #[command(flatten)]
        week: WeekArg,
    },

    /// Remove every assignment from a week
    Clear {
        /// Week to operate on
        #[command(flatten)]
        week: WeekArg,
    },

    /// Print the menu and shopping list as shareable text
    Share {
        /// Week to operate on
        #[command(flatten)]
        week: WeekArg,
    },

    /// List every stored week
    List,

    /// Delete a stored week and its shopping list
    Delete {
        /// Week to operate on
        #[command(flatten)]
        week: WeekArg,
    },
}

/// Suggest command arguments.
#[derive(Debug, Args)]
pub struct SuggestCommand {
    /// Day of the week
    #[arg(value_enum)]
    pub day: WeekdayArg,

    /// Lunch or dinner
    #[arg(value_enum)]
    pub meal: MealArg,

    /// Week to plan against
    #[command(flatten)]
    pub week: WeekArg,

    /// Maximum number of suggestions (defaults to the configured value)
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Seed for a reproducible shuffle
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Shopping list commands.
#[derive(Debug, Subcommand)]
pub enum ShoppingCommand {
    /// Show the shopping list
    ///
    /// Without --week, shows the current week, or the most recent stored week
    /// when the current one has no menu.
    Show {
        /// Only show items containing this text
        #[arg(short, long)]
        search: Option<String>,

        /// Week to operate on
        #[command(flatten)]
        week: WeekArg,

        /// Output format
        #[arg(short, long, value_enum, default_value = "plain")]
        format: OutputFormat,
    },

    /// Tick or untick an item
    Check {
        /// Item name
        name: String,

        /// Week to operate on
        #[command(flatten)]
        week: WeekArg,
    },

    /// Add an item by hand
    Add {
        /// Item name
        item: String,

        /// Week to operate on
        #[command(flatten)]
        week: WeekArg,
    },

    /// Remove an item
    Remove {
        /// Item name
        name: String,

        /// Week to operate on
        #[command(flatten)]
        week: WeekArg,
    },
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Week selector shared by menu and shopping commands.
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct WeekArg {
    /// Any date in the week (YYYY-MM-DD); defaults to the current week
    #[arg(short, long, value_name = "DATE")]
    pub week: Option<NaiveDate>,
}

impl WeekArg {
    /// The selected date, or `today` when none was given.
    #[must_use]
    pub fn date_or(&self, today: NaiveDate) -> NaiveDate {
        self.week.unwrap_or(today)
    }
}

/// Day of the week argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WeekdayArg {
    /// Monday
    Monday,
    /// Tuesday
    Tuesday,
    /// Wednesday
    Wednesday,
    /// Thursday
    Thursday,
    /// Friday
    Friday,
    /// Saturday
    Saturday,
    /// Sunday
    Sunday,
}

impl From<WeekdayArg> for Weekday {
    fn from(arg: WeekdayArg) -> Self {
        match arg {
            WeekdayArg::Monday => Self::Monday,
            WeekdayArg::Tuesday => Self::Tuesday,
            WeekdayArg::Wednesday => Self::Wednesday,
            WeekdayArg::Thursday => Self::Thursday,
            WeekdayArg::Friday => Self::Friday,
            WeekdayArg::Saturday => Self::Saturday,
            WeekdayArg::Sunday => Self::Sunday,
        }
    }
}

/// Meal slot argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MealArg {
    /// Midday meal
    Lunch,
    /// Evening meal
    Dinner,
}

impl From<MealArg> for Meal {
    fn from(arg: MealArg) -> Self {
        match arg {
            MealArg::Lunch => Self::Lunch,
            MealArg::Dinner => Self::Dinner,
        }
    }
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_arg_conversion() {
        assert_eq!(Weekday::from(WeekdayArg::Monday), Weekday::Monday);
        assert_eq!(Weekday::from(WeekdayArg::Thursday), Weekday::Thursday);
        assert_eq!(Weekday::from(WeekdayArg::Sunday), Weekday::Sunday);
    }

    #[test]
    fn test_weekday_arg_covers_every_day() {
        let days: Vec<Weekday> = WeekdayArg::value_variants()
            .iter()
            .map(|d| Weekday::from(*d))
            .collect();
        assert_eq!(days, Weekday::ALL.to_vec());
    }

    #[test]
    fn test_meal_arg_conversion() {
        assert_eq!(Meal::from(MealArg::Lunch), Meal::Lunch);
        assert_eq!(Meal::from(MealArg::Dinner), Meal::Dinner);
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Plain);
    }

    #[test]
    fn test_week_arg_date_or() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 4).unwrap();
        assert_eq!(WeekArg::default().date_or(today), today);

        let chosen = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let arg = WeekArg { week: Some(chosen) };
        assert_eq!(arg.date_or(today), chosen);
    }

    #[test]
    fn test_status_command_debug() {
        let cmd = StatusCommand { json: true };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("json"));
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Show"));
    }
}
