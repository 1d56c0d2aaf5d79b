//! SQLite-backed recipe store implementation.

use std::collections::HashSet;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};

use super::{Category, Ingredient, Instruction, Recipe, RecipeStore, StoreError, StoreStats};

const RECIPE_COLUMNS: &str =
    "slug, name, author, category_slug, ingredients, instructions, updated_at";

/// SQLite-backed recipe store.
pub struct SqliteRecipeStore {
    conn: Mutex<Connection>,
}

impl SqliteRecipeStore {
    /// Open the database file, creating it and the tables if needed.
    pub fn new(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize()?;
        Ok(store)
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize()?;
        Ok(store)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Database("connection mutex poisoned".to_string()))
    }

    fn upsert_category_row(
        conn: &Connection,
        category: &Category,
        merged_at: i64,
    ) -> Result<(), StoreError> {
        conn.execute(
            "INSERT INTO categories (slug, name, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(slug) DO UPDATE SET
                name = excluded.name,
                updated_at = MAX(categories.updated_at, excluded.updated_at)",
            params![&category.slug, &category.name, merged_at],
        )?;
        Ok(())
    }

    fn upsert_recipe_row(
        conn: &Connection,
        recipe: &Recipe,
        merged_at: i64,
    ) -> Result<(), StoreError> {
        let ingredients = serde_json::to_string(&recipe.ingredients)?;
        let instructions = serde_json::to_string(&recipe.instructions)?;

        conn.execute(
            "INSERT INTO recipes (slug, name, author, category_slug, ingredients, instructions, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(slug) DO UPDATE SET
                name = excluded.name,
                author = excluded.author,
                category_slug = excluded.category_slug,
                ingredients = excluded.ingredients,
                instructions = excluded.instructions,
                updated_at = MAX(recipes.updated_at, excluded.updated_at)",
            params![
                &recipe.slug,
                &recipe.name,
                &recipe.author,
                &recipe.category_slug,
                &ingredients,
                &instructions,
                merged_at,
            ],
        )?;
        Ok(())
    }

    fn row_to_category(row: &rusqlite::Row) -> rusqlite::Result<Category> {
        Ok(Category {
            slug: row.get(0)?,
            name: row.get(1)?,
            updated_at: from_millis(row.get(2)?),
        })
    }

    fn row_to_recipe(row: &rusqlite::Row) -> rusqlite::Result<Recipe> {
        let ingredients_json: String = row.get(4)?;
        let instructions_json: String = row.get(5)?;

        let ingredients: Vec<Ingredient> = serde_json::from_str(&ingredients_json)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;
        let instructions: Vec<Instruction> = serde_json::from_str(&instructions_json)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;

        Ok(Recipe {
            slug: row.get(0)?,
            name: row.get(1)?,
            author: row.get(2)?,
            category_slug: row.get(3)?,
            ingredients,
            instructions,
            updated_at: from_millis(row.get(6)?),
        })
    }
}

impl RecipeStore for SqliteRecipeStore {
    fn initialize(&self) -> Result<(), StoreError> {
        let conn = self.lock()?;
        conn.execute_batch(
            r#"
            PRAGMA journal_mode = WAL;
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS categories (
                slug TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS recipes (
                slug TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                author TEXT,
                category_slug TEXT NOT NULL REFERENCES categories(slug) ON DELETE CASCADE,
                ingredients TEXT NOT NULL,
                instructions TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_categories_name ON categories(name);
            CREATE INDEX IF NOT EXISTS idx_recipes_category ON recipes(category_slug);
            CREATE INDEX IF NOT EXISTS idx_recipes_name ON recipes(name);
            "#,
        )?;
        Ok(())
    }

    fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT slug, name, updated_at FROM categories ORDER BY name, slug")?;

        let rows = stmt.query_map([], Self::row_to_category)?;
        let mut categories = Vec::new();
        for row in rows {
            categories.push(row?);
        }
        Ok(categories)
    }

    fn get_category(&self, slug: &str) -> Result<Option<Category>, StoreError> {
        let conn = self.lock()?;
        let category = conn
            .query_row(
                "SELECT slug, name, updated_at FROM categories WHERE slug = ?",
                params![slug],
                Self::row_to_category,
            )
            .optional()?;
        Ok(category)
    }

    fn upsert_categories(
        &self,
        categories: &[Category],
        merged_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let merged_at = merged_at.timestamp_millis();

        for category in categories {
            Self::upsert_category_row(&tx, category, merged_at)?;
        }

        // Drop categories the remote no longer lists (cascades to their recipes)
        let keep: HashSet<&str> = categories.iter().map(|c| c.slug.as_str()).collect();
        let existing: Vec<String> = {
            let mut stmt = tx.prepare("SELECT slug FROM categories")?;
            let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
            rows.collect::<Result<Vec<String>, _>>()?
        };
        for slug in existing.iter().filter(|s| !keep.contains(s.as_str())) {
            tx.execute("DELETE FROM categories WHERE slug = ?", params![slug])?;
        }

        tx.commit()?;
        Ok(())
    }

    fn ensure_category(&self, slug: &str, name: &str) -> Result<(), StoreError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO categories (slug, name, updated_at) VALUES (?1, ?2, 0)
             ON CONFLICT(slug) DO UPDATE SET name = excluded.name",
            params![slug, name],
        )?;
        Ok(())
    }

    fn list_recipes_by_category(&self, slug: &str) -> Result<Vec<Recipe>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes WHERE category_slug = ? ORDER BY name, slug"
        ))?;

        let rows = stmt.query_map(params![slug], Self::row_to_recipe)?;
        let mut recipes = Vec::new();
        for row in rows {
            recipes.push(row?);
        }
        Ok(recipes)
    }

    fn get_recipe(&self, slug: &str) -> Result<Option<Recipe>, StoreError> {
        let conn = self.lock()?;
        let recipe = conn
            .query_row(
                &format!("SELECT {RECIPE_COLUMNS} FROM recipes WHERE slug = ?"),
                params![slug],
                Self::row_to_recipe,
            )
            .optional()?;
        Ok(recipe)
    }

    fn upsert_recipe(&self, recipe: &Recipe, merged_at: DateTime<Utc>) -> Result<(), StoreError> {
        let conn = self.lock()?;
        Self::upsert_recipe_row(&conn, recipe, merged_at.timestamp_millis())
    }

    fn upsert_recipes_bulk(
        &self,
        recipes: &[Recipe],
        merged_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let merged_at = merged_at.timestamp_millis();

        for recipe in recipes {
            Self::upsert_recipe_row(&tx, recipe, merged_at)?;
        }

        tx.commit()?;
        Ok(())
    }

    fn upsert_catalog_bulk(
        &self,
        categories: &[Category],
        recipes: &[Recipe],
        merged_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let merged_at = merged_at.timestamp_millis();

        for category in categories {
            Self::upsert_category_row(&tx, category, merged_at)?;
        }
        for recipe in recipes {
            Self::upsert_recipe_row(&tx, recipe, merged_at)?;
        }

        tx.commit()?;
        Ok(())
    }

    fn search(&self, query: &str) -> Result<Vec<Recipe>, StoreError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.lock()?;
        let pattern = format!("%{}%", escape_like(query));

        // LIKE is case-insensitive for ASCII; ingredients are matched on their
        // names only, not on the JSON keys
        let mut stmt = conn.prepare(&format!(
            r#"SELECT {RECIPE_COLUMNS} FROM recipes
               WHERE name LIKE ?1 ESCAPE '\'
                  OR author LIKE ?1 ESCAPE '\'
                  OR EXISTS (
                      SELECT 1 FROM json_each(recipes.ingredients) AS i
                      WHERE json_extract(i.value, '$.name') LIKE ?1 ESCAPE '\'
                  )
               ORDER BY name, slug"#
        ))?;

        let rows = stmt.query_map(params![&pattern], Self::row_to_recipe)?;
        let mut recipes = Vec::new();
        for row in rows {
            recipes.push(row?);
        }
        Ok(recipes)
    }

    fn stats(&self) -> Result<StoreStats, StoreError> {
        let conn = self.lock()?;

        let categories: u64 =
            conn.query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))?;
        let recipes: u64 = conn.query_row("SELECT COUNT(*) FROM recipes", [], |row| row.get(0))?;

        Ok(StoreStats {
            categories,
            recipes,
        })
    }

    fn reset(&self) -> Result<(), StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        tx.execute_batch(
            "DELETE FROM recipes;
             DELETE FROM categories;",
        )?;
        tx.commit()?;
        Ok(())
    }
}

fn from_millis(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or_default()
}

/// Escape LIKE wildcards so the query matches literally.
fn escape_like(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
