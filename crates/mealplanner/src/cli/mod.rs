//! Command-line interface for mealplanner.
//!
//! This module provides the CLI structure for the `mealplan` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ConfigCommand, MealArg, MenuCommand, OutputFormat, RecipeAddCommand, RecipeCommand,
    ShoppingCommand, StatusCommand, SuggestCommand, WeekArg, WeekdayArg,
};

use crate::logging::Verbosity;

/// mealplan - Keep a recipe book and plan the week's meals
///
/// Stores recipes, assigns them to lunch and dinner slots for each week,
/// suggests varied meals, and keeps a consolidated shopping list.
#[derive(Debug, Parser)]
#[command(name = "mealplan")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage the recipe book
    #[command(subcommand)]
    Recipe(RecipeCommand),

    /// View and edit weekly menus
    #[command(subcommand)]
    Menu(MenuCommand),

    /// Suggest recipes for an empty slot
    Suggest(SuggestCommand),

    /// View and edit the shopping list
    #[command(subcommand)]
    Shopping(ShoppingCommand),

    /// Show database status
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}
