//! Types for the local recipe store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A recipe category as held in the local store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    /// Stable external identifier.
    pub slug: String,
    /// Display name.
    pub name: String,
    /// Last successful merge of this row.
    pub updated_at: DateTime<Utc>,
}

/// A single ingredient line. Order within a recipe is significant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ingredient {
    pub amount: String,
    pub name: String,
}

/// A single instruction step. Order within a recipe is significant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Instruction {
    pub text: String,
}

/// A full recipe as held in the local store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recipe {
    /// Stable external identifier.
    pub slug: String,
    /// Display name.
    pub name: String,
    /// Recipe author, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Slug of the owning category.
    pub category_slug: String,
    /// Ingredients in recipe order.
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    /// Instructions in recipe order.
    #[serde(default)]
    pub instructions: Vec<Instruction>,
    /// Last successful merge of this row.
    pub updated_at: DateTime<Utc>,
}

/// Row counts of the local store.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreStats {
    pub categories: u64,
    pub recipes: u64,
}

/// Errors for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_serialization_skips_missing_author() {
        let recipe = Recipe {
            slug: "toast".to_string(),
            name: "Toast".to_string(),
            author: None,
            category_slug: "breakfast".to_string(),
            ingredients: vec![Ingredient {
                amount: "1 slice".to_string(),
                name: "bread".to_string(),
            }],
            instructions: vec![Instruction {
                text: "Toast it.".to_string(),
            }],
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&recipe).unwrap();
        assert!(!json.contains("author"));

        let parsed: Recipe = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, recipe);
    }

    #[test]
    fn test_store_error_from_rusqlite() {
        let err: StoreError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, StoreError::Database(_)));
    }
}
