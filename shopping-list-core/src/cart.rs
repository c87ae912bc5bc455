//! File-backed cart storage.
//!
//! A cart file holds the recipe catalogue together with every user's cart:
//!
//! ```yaml
//! recipes:
//!   - id: 1
//!     name: Pancakes
//!     tags: [breakfast]
//!     ingredients:
//!       - { name: Flour, unit: g, amount: 200 }
//!       - { name: Milk, unit: ml, amount: 300 }
//! carts:
//!   alice: [1]
//! ```
//!
//! The file is validated as a whole before any lines are produced, so the
//! aggregator only ever sees positive amounts and non-empty names and units.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::contract::{CartError, CartLine, CartSource};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientAmount {
    pub name: String,
    pub unit: String,
    pub amount: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub ingredients: Vec<IngredientAmount>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartFile {
    #[serde(default)]
    pub recipes: Vec<Recipe>,
    /// User name to the ids of the recipes in that user's cart, in cart order.
    #[serde(default)]
    pub carts: BTreeMap<String, Vec<u64>>,
}

impl CartFile {
    pub fn from_yaml_str(content: &str) -> Result<Self, CartError> {
        serde_yaml::from_str(content).map_err(|e| CartError::Parse(e.to_string()))
    }

    pub fn from_json_str(content: &str) -> Result<Self, CartError> {
        serde_json::from_str(content).map_err(|e| CartError::Parse(e.to_string()))
    }

    /// Reads and parses a cart file, choosing YAML or JSON by extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CartError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        let parse: fn(&str) -> Result<Self, CartError> = match extension.as_deref() {
            Some("yaml") | Some("yml") => Self::from_yaml_str,
            Some("json") => Self::from_json_str,
            _ => return Err(CartError::UnsupportedFormat(path.to_path_buf())),
        };

        let content = fs::read_to_string(path).map_err(|e| {
            error!(path = %path.display(), error = ?e, "Failed to read cart file");
            CartError::Io {
                path: path.to_path_buf(),
                source: e,
            }
        })?;
        let cart = parse(&content)?;
        debug!(
            path = %path.display(),
            recipes = cart.recipes.len(),
            carts = cart.carts.len(),
            "Parsed cart file"
        );
        Ok(cart)
    }

    /// Checks the constraints storage would normally enforce.
    pub fn validate(&self) -> Result<(), CartError> {
        let mut recipe_ids = HashSet::new();
        for recipe in &self.recipes {
            if !recipe_ids.insert(recipe.id) {
                return Err(CartError::DuplicateRecipe {
                    recipe_id: recipe.id,
                });
            }
            let mut seen = HashSet::new();
            for ingredient in &recipe.ingredients {
                validate_ingredient(recipe, ingredient)?;
                if !seen.insert((ingredient.name.as_str(), ingredient.unit.as_str())) {
                    return Err(CartError::DuplicateIngredient {
                        recipe: recipe.name.clone(),
                        ingredient: ingredient.name.clone(),
                        unit: ingredient.unit.clone(),
                    });
                }
            }
        }

        for (user, recipe_ids_in_cart) in &self.carts {
            let mut seen = HashSet::new();
            for recipe_id in recipe_ids_in_cart {
                if !recipe_ids.contains(recipe_id) {
                    return Err(CartError::UnknownRecipe {
                        user: user.clone(),
                        recipe_id: *recipe_id,
                    });
                }
                if !seen.insert(*recipe_id) {
                    return Err(CartError::DuplicateCartEntry {
                        user: user.clone(),
                        recipe_id: *recipe_id,
                    });
                }
            }
        }
        Ok(())
    }

    /// Flattens the cart of `user` into lines: cart order, then ingredient order within a recipe.
    ///
    /// A user without a cart gets no lines. Call [`CartFile::validate`] first.
    pub fn lines_for(&self, user: &str) -> Result<Vec<CartLine>, CartError> {
        let Some(recipe_ids) = self.carts.get(user) else {
            debug!(user, "User has no cart");
            return Ok(Vec::new());
        };

        let mut lines = Vec::new();
        for recipe_id in recipe_ids {
            let recipe = self
                .recipes
                .iter()
                .find(|r| r.id == *recipe_id)
                .ok_or_else(|| CartError::UnknownRecipe {
                    user: user.to_string(),
                    recipe_id: *recipe_id,
                })?;
            for ingredient in &recipe.ingredients {
                lines.push(CartLine {
                    ingredient_name: ingredient.name.clone(),
                    unit: ingredient.unit.clone(),
                    amount: checked_amount(recipe, ingredient)?,
                });
            }
        }
        Ok(lines)
    }
}

fn validate_ingredient(recipe: &Recipe, ingredient: &IngredientAmount) -> Result<(), CartError> {
    let invalid = |reason: &str| CartError::InvalidCartLine {
        recipe: recipe.name.clone(),
        ingredient: ingredient.name.clone(),
        reason: reason.to_string(),
    };
    if ingredient.name.trim().is_empty() {
        return Err(invalid("ingredient name is empty"));
    }
    if ingredient.unit.trim().is_empty() {
        return Err(invalid("unit is empty"));
    }
    checked_amount(recipe, ingredient).map(|_| ())
}

fn checked_amount(recipe: &Recipe, ingredient: &IngredientAmount) -> Result<u32, CartError> {
    if ingredient.amount == 0 {
        return Err(CartError::InvalidCartLine {
            recipe: recipe.name.clone(),
            ingredient: ingredient.name.clone(),
            reason: "amount must be at least 1".to_string(),
        });
    }
    u32::try_from(ingredient.amount).map_err(|_| CartError::InvalidCartLine {
        recipe: recipe.name.clone(),
        ingredient: ingredient.name.clone(),
        reason: format!("amount {} exceeds {}", ingredient.amount, u32::MAX),
    })
}

/// Serves carts from an already parsed [`CartFile`].
#[derive(Debug, Clone)]
pub struct InMemoryCartSource {
    cart: CartFile,
}

impl InMemoryCartSource {
    /// Validates `cart` once up front.
    pub fn new(cart: CartFile) -> Result<Self, CartError> {
        cart.validate()?;
        Ok(Self { cart })
    }
}

#[async_trait]
impl CartSource for InMemoryCartSource {
    async fn cart_lines(&self, user: &str) -> Result<Vec<CartLine>, CartError> {
        self.cart.lines_for(user)
    }
}

/// Reads the cart file on every request, so edits are picked up without a restart.
#[derive(Debug, Clone)]
pub struct FileCartSource {
    path: PathBuf,
}

impl FileCartSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CartSource for FileCartSource {
    async fn cart_lines(&self, user: &str) -> Result<Vec<CartLine>, CartError> {
        info!(path = %self.path.display(), user, "Loading cart from file");
        let cart = CartFile::from_path(&self.path)?;
        if let Err(e) = cart.validate() {
            error!(path = %self.path.display(), error = %e, "Cart file failed validation");
            return Err(e);
        }
        let lines = cart.lines_for(user)?;
        info!(user, lines = lines.len(), "Loaded cart lines");
        Ok(lines)
    }
}
