//! Types for remote catalog API responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::{Category, Ingredient, Instruction, Recipe};

/// A category as listed by the remote catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemoteCategory {
    pub slug: String,
    pub name: String,
}

impl RemoteCategory {
    /// Convert into a store row stamped with the merge time.
    pub fn into_category(self, merged_at: DateTime<Utc>) -> Category {
        Category {
            slug: self.slug,
            name: self.name,
            updated_at: merged_at,
        }
    }
}

/// A recipe summary as embedded in a category detail response.
///
/// Summaries carry no ingredients or instructions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecipeSummary {
    pub slug: String,
    pub name: String,
}

/// A category with the summaries of its recipes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemoteCategoryDetail {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub recipes: Vec<RecipeSummary>,
}

/// A full recipe as returned by the remote catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemoteRecipe {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub instructions: Vec<Instruction>,
    pub category: RemoteCategory,
}

impl RemoteRecipe {
    /// Convert into a store row owned by `category_slug`, stamped with the merge time.
    pub fn into_recipe(self, category_slug: &str, merged_at: DateTime<Utc>) -> Recipe {
        Recipe {
            slug: self.slug,
            name: self.name,
            author: self.author,
            category_slug: category_slug.to_string(),
            ingredients: self.ingredients,
            instructions: self.instructions,
            updated_at: merged_at,
        }
    }
}

/// The full catalog, as returned by the bulk endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogDump {
    pub categories: Vec<RemoteCategory>,
    pub recipes: Vec<RemoteRecipe>,
}

// ============================================================================
// Response envelopes
// ============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct CategoriesEnvelope {
    pub categories: Vec<RemoteCategory>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CategoryEnvelope {
    pub category: RemoteCategoryDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecipeEnvelope {
    pub recipe: RemoteRecipe,
}
