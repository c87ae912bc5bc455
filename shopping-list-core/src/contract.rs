//! # contract: data model and the cart source seam
//!
//! This module defines the plain data types that flow through an export
//! (cart lines in, aggregated lines in the middle, an artifact out) and the single
//! trait (`CartSource`) through which the engine obtains a user's cart.
//!
//! ## Interface & Extensibility
//! - Implement [`CartSource`] to plug in a storage backend (database, file, fixture).
//! - The source is responsible for validation: every [`CartLine`] it yields must
//!   carry a positive amount and non-empty name/unit. Malformed data is reported as
//!   [`CartError::InvalidCartLine`] before it reaches the aggregator.
//!
//! ## Mocking & Testing
//! - The trait is annotated for `mockall` so consumers can generate deterministic mocks.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use async_trait::async_trait;
#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ConfigError;

/// One ingredient occurrence contributed by one recipe in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub ingredient_name: String,
    pub unit: String,
    /// Always at least 1.
    pub amount: u32,
}

impl CartLine {
    pub fn new(ingredient_name: impl Into<String>, unit: impl Into<String>, amount: u32) -> Self {
        Self {
            ingredient_name: ingredient_name.into(),
            unit: unit.into(),
            amount,
        }
    }
}

/// The merged total for one `(ingredient_name, unit)` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedLine {
    pub ingredient_name: String,
    pub unit: String,
    pub total_amount: u64,
}

impl AggregatedLine {
    pub fn new(
        ingredient_name: impl Into<String>,
        unit: impl Into<String>,
        total_amount: u64,
    ) -> Self {
        Self {
            ingredient_name: ingredient_name.into(),
            unit: unit.into(),
            total_amount,
        }
    }

    pub fn key(&self) -> (&str, &str) {
        (&self.ingredient_name, &self.unit)
    }
}

/// Delivery format of a rendered shopping list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactFormat {
    /// Plain text list, one ingredient per line
    #[serde(alias = "txt", alias = "plain")]
    Text,
    /// Paginated A4 document
    #[default]
    Pdf,
}

impl ArtifactFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            ArtifactFormat::Text => "text/plain",
            ArtifactFormat::Pdf => "application/pdf",
        }
    }

    pub fn filename(self) -> &'static str {
        match self {
            ArtifactFormat::Text => "shopping_cart.txt",
            ArtifactFormat::Pdf => "shopping_cart.pdf",
        }
    }
}

impl FromStr for ArtifactFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" | "plain" => Ok(ArtifactFormat::Text),
            "pdf" => Ok(ArtifactFormat::Pdf),
            _ => Err(ConfigError::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ArtifactFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactFormat::Text => f.write_str("text"),
            ArtifactFormat::Pdf => f.write_str("pdf"),
        }
    }
}

/// A rendered document plus the hints the delivering layer needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub filename: String,
    pub content_type: String,
    pub content: Vec<u8>,
}

impl Artifact {
    pub fn new(format: ArtifactFormat, content: Vec<u8>) -> Self {
        Self {
            filename: format.filename().to_string(),
            content_type: format.content_type().to_string(),
            content,
        }
    }

    /// Value for a `Content-Disposition` response header.
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename={}", self.filename)
    }
}

/// Errors raised by cart sources while producing cart lines.
#[derive(Debug, Error)]
pub enum CartError {
    #[error("invalid cart line in recipe '{recipe}' for ingredient '{ingredient}': {reason}")]
    InvalidCartLine {
        recipe: String,
        ingredient: String,
        reason: String,
    },

    #[error("recipe '{recipe}' lists ingredient '{ingredient}' ({unit}) more than once")]
    DuplicateIngredient {
        recipe: String,
        ingredient: String,
        unit: String,
    },

    #[error("recipe id {recipe_id} is defined more than once")]
    DuplicateRecipe { recipe_id: u64 },

    #[error("cart of user '{user}' references unknown recipe id {recipe_id}")]
    UnknownRecipe { user: String, recipe_id: u64 },

    #[error("cart of user '{user}' contains recipe id {recipe_id} more than once")]
    DuplicateCartEntry { user: String, recipe_id: u64 },

    #[error("failed to read cart file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse cart file: {0}")]
    Parse(String),

    #[error("unsupported cart file extension for {0:?}, expected .yaml, .yml or .json")]
    UnsupportedFormat(PathBuf),
}

/// Trait for loading the cart of a user as a flat list of ingredient lines.
///
/// Lines are returned in the order the backing store yields them; the engine does
/// not sort before aggregating.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait CartSource: Send + Sync {
    /// One line per (recipe in cart × ingredient in recipe). An empty cart is `Ok(vec![])`.
    async fn cart_lines(&self, user: &str) -> Result<Vec<CartLine>, CartError>;
}
