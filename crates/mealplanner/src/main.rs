//! `mealplan` - CLI for mealplanner
//!
//! This binary provides the command-line interface for the recipe book, the
//! weekly menus and their shopping lists.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use tracing::{debug, info};

use mealplanner::cli::{
    Cli, Command, ConfigCommand, MenuCommand, OutputFormat, RecipeAddCommand, RecipeCommand,
    ShoppingCommand, SuggestCommand, WeekArg,
};
use mealplanner::shopping::ShoppingListEntry;
use mealplanner::suggest::rng_from_seed;
use mealplanner::{
    import, init_logging, Config, Meal, Recipe, RecipeFilter, ShoppingList, Storage,
    SuggestionEngine, WeeklyMenu, Weekday,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config =
        Config::load_from(cli.config.clone()).context("failed to load configuration")?;

    match cli.command {
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
        Command::Status(status_cmd) => handle_status(&config, status_cmd.json),
        Command::Recipe(recipe_cmd) => handle_recipe(&config, recipe_cmd),
        Command::Menu(menu_cmd) => handle_menu(&config, menu_cmd),
        Command::Suggest(suggest_cmd) => handle_suggest(&config, &suggest_cmd),
        Command::Shopping(shopping_cmd) => handle_shopping(&config, shopping_cmd),
    }
}

fn open_storage(config: &Config) -> Result<Storage> {
    let path = config.database_path();
    Storage::open(&path).with_context(|| format!("failed to open database {}", path.display()))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

// === Recipes ===

fn handle_recipe(config: &Config, cmd: RecipeCommand) -> Result<()> {
    let mut storage = open_storage(config)?;

    match cmd {
        RecipeCommand::Add(add) => {
            let recipe = recipe_from_args(add);
            let existed = storage.get_recipe(&recipe.id)?.is_some();
            storage
                .save_recipe(&recipe)
                .with_context(|| format!("could not save '{}'", recipe.name))?;
            if existed {
                println!("Updated recipe '{}' ({})", recipe.name, recipe.id);
            } else {
                println!("Added recipe '{}' ({})", recipe.name, recipe.id);
            }
        }
        RecipeCommand::List {
            favorites,
            category,
            format,
        } => {
            let filter = match (favorites, category) {
                (true, _) => RecipeFilter::Favorites,
                (false, Some(tag)) => RecipeFilter::Category(tag),
                (false, None) => RecipeFilter::All,
            };
            print_recipes(&storage.list_recipes(&filter)?, format)?;
        }
        RecipeCommand::Show { id, format } => {
            let recipe = storage.require_recipe(&id)?;
            if format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&recipe)?);
            } else {
                print_recipe_detail(&recipe);
            }
        }
        RecipeCommand::Search { term, format } => {
            print_recipes(&storage.search_recipes(&term)?, format)?;
        }
        RecipeCommand::Favorite { id } => {
            if storage.toggle_favorite(&id)? {
                println!("'{id}' is now a favorite");
            } else {
                println!("'{id}' is no longer a favorite");
            }
        }
        RecipeCommand::Delete { id } => {
            if storage.delete_recipe(&id)? {
                println!("Deleted '{id}'");
            } else {
                bail!("no recipe with id '{id}'");
            }
        }
        RecipeCommand::Import { file } => {
            let outcome = import::parse_file(&file)
                .with_context(|| format!("failed to import {}", file.display()))?;
            let saved = storage.save_recipes(&outcome.recipes)?;
            println!("Imported {saved} recipes ({} skipped)", outcome.skipped);
        }
    }
    Ok(())
}

fn recipe_from_args(add: RecipeAddCommand) -> Recipe {
    let mut recipe =
        Recipe::new(add.name, add.ingredients, add.instructions).with_favorite(add.favorite);
    for tag in add.categories {
        recipe = recipe.with_category(tag);
    }
    if let Some(image) = add.image {
        recipe = recipe.with_image(image);
    }
    recipe
}

fn print_recipes(recipes: &[Recipe], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(recipes)?),
        OutputFormat::Plain => {
            for recipe in recipes {
                println!("{} ({})", recipe.name, recipe.id);
            }
        }
        OutputFormat::Table => {
            if recipes.is_empty() {
                println!("No recipes found.");
                return Ok(());
            }
            println!(
                "{:<28} {:<28} {:<11} {:<16} FAV",
                "ID", "NAME", "PROTEIN", "CATEGORIES"
            );
            for recipe in recipes {
                let categories: Vec<&str> =
                    recipe.categories.iter().map(String::as_str).collect();
                println!(
                    "{:<28} {:<28} {:<11} {:<16} {}",
                    truncate(&recipe.id, 28),
                    truncate(&recipe.name, 28),
                    recipe.protein_category(),
                    truncate(&categories.join(","), 16),
                    if recipe.is_favorite { "*" } else { "" }
                );
            }
        }
    }
    Ok(())
}

fn print_recipe_detail(recipe: &Recipe) {
    println!("{}", recipe.name);
    println!("{}", "=".repeat(recipe.name.chars().count()));
    println!("Id:          {}", recipe.id);
    println!("Protein:     {}", recipe.protein_category());
    if !recipe.categories.is_empty() {
        let categories: Vec<&str> = recipe.categories.iter().map(String::as_str).collect();
        println!("Categories:  {}", categories.join(", "));
    }
    println!("Favorite:    {}", if recipe.is_favorite { "yes" } else { "no" });
    if let Some(image) = &recipe.image_ref {
        println!("Image:       {image}");
    }
    println!();
    println!("Ingredients:");
    for ingredient in &recipe.ingredients {
        println!("  - {ingredient}");
    }
    println!();
    println!("Instructions:");
    for (i, step) in recipe.instructions.iter().enumerate() {
        println!("  {}. {step}", i + 1);
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('~');
    cut
}

// === Menus ===

/// Rebuild the shopping list for `menu` and persist both.
fn save_menu_change(
    config: &Config,
    storage: &Storage,
    menu: &WeeklyMenu,
    shopping: &mut ShoppingList,
) -> Result<()> {
    if config.shopping.carry_checked {
        shopping.rebuild(menu);
    } else {
        shopping.reset(menu);
    }
    storage.save_menu(menu, shopping)?;
    debug!(
        week = %menu.week_id(),
        items = shopping.len(),
        "Shopping list rebuilt"
    );
    Ok(())
}

fn handle_menu(config: &Config, cmd: MenuCommand) -> Result<()> {
    let storage = open_storage(config)?;

    match cmd {
        MenuCommand::Show { week, format } => {
            let (menu, _) = storage.load_or_empty_menu(week.date_or(today()))?;
            print_menu(&menu, format)?;
        }
        MenuCommand::Assign {
            day,
            meal,
            recipe_id,
            week,
        } => {
            let (day, meal) = (Weekday::from(day), Meal::from(meal));
            let recipe = storage.require_recipe(&recipe_id)?;
            let (mut menu, mut shopping) = storage.load_or_empty_menu(week.date_or(today()))?;

            let name = recipe.name.clone();
            if let Some(previous) = menu.assign(day, meal, recipe) {
                info!(replaced = %previous.id, "Replaced assigned recipe");
            }
            save_menu_change(config, &storage, &menu, &mut shopping)?;
            println!(
                "{name} assigned to {} {meal} (week of {})",
                day.display_name(),
                menu.week_id()
            );
        }
        MenuCommand::Remove { day, meal, week } => {
            let (day, meal) = (Weekday::from(day), Meal::from(meal));
            let (mut menu, mut shopping) = storage.load_or_empty_menu(week.date_or(today()))?;

            match menu.remove(day, meal) {
                Some(removed) => {
                    save_menu_change(config, &storage, &menu, &mut shopping)?;
                    println!("Removed {} from {} {meal}", removed.name, day.display_name());
                }
                None => println!("{} {meal} was already empty", day.display_name()),
            }
        }
        MenuCommand::Clear { week } => {
            let (mut menu, mut shopping) = storage.load_or_empty_menu(week.date_or(today()))?;
            let count = menu.assigned_count();
            menu.clear();
            save_menu_change(config, &storage, &menu, &mut shopping)?;
            println!("Cleared {count} meals from week of {}", menu.week_id());
        }
        MenuCommand::Share { week } => {
            let (menu, shopping) = storage.load_or_empty_menu(week.date_or(today()))?;
            print!("{}", menu.share_text(shopping.entries()));
        }
        MenuCommand::List => {
            let weeks = storage.list_menu_weeks()?;
            if weeks.is_empty() {
                println!("No stored menus.");
            }
            for week in weeks {
                let (menu, shopping) = storage.load_or_empty_menu(week)?;
                println!(
                    "{} to {}  {} meals, {} items",
                    menu.week_id(),
                    menu.week_end().format("%Y-%m-%d"),
                    menu.assigned_count(),
                    shopping.len()
                );
            }
        }
        MenuCommand::Delete { week } => {
            let date = week.date_or(today());
            if storage.delete_menu(date)? {
                println!("Deleted menu for week of {}", WeeklyMenu::new(date).week_id());
            } else {
                bail!("no stored menu for week of {}", WeeklyMenu::new(date).week_id());
            }
        }
    }
    Ok(())
}

fn print_menu(menu: &WeeklyMenu, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(menu)?),
        OutputFormat::Plain => print!("{}", menu.share_text(&[])),
        OutputFormat::Table => {
            println!(
                "Week of {} to {}",
                menu.week_start().format("%Y-%m-%d"),
                menu.week_end().format("%Y-%m-%d")
            );
            println!();
            println!("{:<18} {:<30} {:<30}", "DAY", "LUNCH", "DINNER");
            for day in Weekday::ALL {
                let cell = |meal| {
                    menu.slot(day, meal)
                        .map_or_else(|| "-".to_string(), |r| truncate(&r.name, 30))
                };
                println!(
                    "{:<18} {:<30} {:<30}",
                    format!("{} {}", day.display_name(), menu.date_of(day).format("%-d %b")),
                    cell(Meal::Lunch),
                    cell(Meal::Dinner)
                );
            }
        }
    }
    Ok(())
}

// === Suggestions ===

fn handle_suggest(config: &Config, cmd: &SuggestCommand) -> Result<()> {
    let storage = open_storage(config)?;
    let (day, meal) = (Weekday::from(cmd.day), Meal::from(cmd.meal));
    let (menu, _) = storage.load_or_empty_menu(cmd.week.date_or(today()))?;
    let pool = storage.list_recipes(&RecipeFilter::All)?;

    let mut engine = SuggestionEngine::from_config(&config.suggestions);
    if let Some(limit) = cmd.limit {
        engine = engine.with_max_results(limit);
    }
    let mut rng = rng_from_seed(cmd.seed.or(config.suggestions.seed));

    let suggestions = engine.suggest(day, meal, &menu, &pool, &mut rng);

    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&suggestions)?),
        OutputFormat::Plain | OutputFormat::Table => {
            if let Some(current) = menu.slot(day, meal) {
                println!(
                    "{} {meal} currently has: {}",
                    day.display_name(),
                    current.name
                );
            }
            if suggestions.is_empty() {
                println!("No suggestions available.");
            }
            for (i, recipe) in suggestions.iter().enumerate() {
                println!(
                    "{}. {} ({}) [{}]",
                    i + 1,
                    recipe.name,
                    recipe.id,
                    recipe.protein_category()
                );
            }
        }
    }
    Ok(())
}

// === Shopping list ===

/// Load the week a shopping command works on.
///
/// Without `--week`, a current week with nothing stored falls back to the
/// most recent stored week.
fn load_shopping_week(storage: &Storage, week: WeekArg) -> Result<(WeeklyMenu, ShoppingList)> {
    let loaded = match week.week {
        Some(date) => storage.load_or_empty_menu(date)?,
        None => storage.load_menu_or_latest(today())?,
    };
    Ok(loaded)
}

fn handle_shopping(config: &Config, cmd: ShoppingCommand) -> Result<()> {
    let storage = open_storage(config)?;

    match cmd {
        ShoppingCommand::Show {
            search,
            week,
            format,
        } => {
            let (menu, shopping) = load_shopping_week(&storage, week)?;
            let entries = shopping.search(search.as_deref().unwrap_or(""));
            if format != OutputFormat::Json {
                println!("Shopping list for week of {}", menu.week_id());
                println!();
            }
            print_shopping(&entries, shopping.remaining(), shopping.len(), format)?;
        }
        ShoppingCommand::Check { name, week } => {
            let (menu, mut shopping) = load_shopping_week(&storage, week)?;
            let Some(checked) = shopping.toggle(&name) else {
                bail!("no item named '{name}' on the shopping list");
            };
            storage.save_menu(&menu, &shopping)?;
            println!(
                "{} {name} ({} remaining)",
                if checked { "Checked" } else { "Unchecked" },
                shopping.remaining()
            );
        }
        ShoppingCommand::Add { item, week } => {
            let (menu, mut shopping) = load_shopping_week(&storage, week)?;
            let Some(count) = shopping.add_item(&item) else {
                bail!("item name must not be empty");
            };
            storage.save_menu(&menu, &shopping)?;
            println!("Added {} (x{count})", item.trim());
        }
        ShoppingCommand::Remove { name, week } => {
            let (menu, mut shopping) = load_shopping_week(&storage, week)?;
            if !shopping.remove(&name) {
                bail!("no item named '{name}' on the shopping list");
            }
            storage.save_menu(&menu, &shopping)?;
            println!("Removed {name}");
        }
    }
    Ok(())
}

fn print_shopping(
    entries: &[&ShoppingListEntry],
    remaining: usize,
    total: usize,
    format: OutputFormat,
) -> Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("Shopping list is empty.");
        return Ok(());
    }
    for entry in entries {
        let mark = if entry.checked { "x" } else { " " };
        if entry.count > 1 {
            println!("[{mark}] {} (x{})", entry.name, entry.count);
        } else {
            println!("[{mark}] {}", entry.name);
        }
    }
    println!();
    println!("{remaining} of {total} items remaining");
    Ok(())
}

// === Status and configuration ===

fn handle_status(config: &Config, json: bool) -> Result<()> {
    let storage = open_storage(config)?;
    let stats = storage.stats()?;

    if json {
        let status = serde_json::json!({
            "database_path": storage.path(),
            "config_path": Config::default_config_path(),
            "stats": stats,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("mealplan status");
        println!("---------------");
        println!("Database:      {}", storage.path().display());
        println!("Size:          {} bytes", stats.db_size_bytes);
        println!("Recipes:       {}", stats.total_recipes);
        println!("Favorites:     {}", stats.favorite_recipes);
        println!("Menus:         {}", stats.menu_weeks);
        match stats.latest_week {
            Some(week) => println!("Latest week:   {week}"),
            None => println!("Latest week:   none"),
        }
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!();
                println!("[Suggestions]");
                println!("  Max results:        {}", config.suggestions.max_results);
                println!("  Min preferred:      {}", config.suggestions.min_preferred);
                match config.suggestions.seed {
                    Some(seed) => println!("  Seed:               {seed}"),
                    None => println!("  Seed:               random"),
                }
                println!();
                println!("[Shopping]");
                println!("  Carry checked:      {}", config.shopping.carry_checked);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => bail!("configuration error: {e}"),
            }
        }
    }
    Ok(())
}
