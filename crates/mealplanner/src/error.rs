//! Error types for mealplanner.
//!
//! The pure planning functions never fail; everything that touches storage,
//! configuration, imports, or user input reports through [`Error`].

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for mealplanner operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Domain Errors ===
    /// A recipe failed validation.
    #[error("invalid recipe: {message}")]
    InvalidRecipe {
        /// Description of the validation failure.
        message: String,
    },

    /// No recipe exists with the given id.
    #[error("recipe not found: {id}")]
    RecipeNotFound {
        /// The id that was looked up.
        id: String,
    },

    /// A recipe collection could not be imported.
    #[error("import failed: {message}")]
    Import {
        /// Description of what went wrong.
        message: String,
    },

    /// A weekday id could not be parsed.
    #[error("invalid weekday '{value}', expected monday..sunday")]
    InvalidWeekday {
        /// The rejected input.
        value: String,
    },

    /// A meal name could not be parsed.
    #[error("invalid meal '{value}', expected lunch or dinner")]
    InvalidMeal {
        /// The rejected input.
        value: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for mealplanner operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new invalid recipe error.
    #[must_use]
    pub fn invalid_recipe(message: impl Into<String>) -> Self {
        Self::InvalidRecipe {
            message: message.into(),
        }
    }

    /// Create a recipe not found error.
    #[must_use]
    pub fn recipe_not_found(id: impl Into<String>) -> Self {
        Self::RecipeNotFound { id: id.into() }
    }

    /// Create a new import error.
    #[must_use]
    pub fn import(message: impl Into<String>) -> Self {
        Self::Import {
            message: message.into(),
        }
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this error means a looked-up record does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::RecipeNotFound { .. })
    }

    /// Check if this error was caused by bad user input rather than the system.
    #[must_use]
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidRecipe { .. }
                | Self::RecipeNotFound { .. }
                | Self::Import { .. }
                | Self::InvalidWeekday { .. }
                | Self::InvalidMeal { .. }
                | Self::ConfigValidation { .. }
        )
    }
}
