//! Testing utilities and mock implementations.
//!
//! Provides a scriptable remote catalog, a manually driven clock and
//! fixtures so the sync engine can be exercised without network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use ressipy_core::testing::{fixtures, ManualClock, MockCatalogClient};
//!
//! let client = MockCatalogClient::new();
//! client
//!     .add_category_with_recipes("pasta", "Pasta", vec![
//!         fixtures::remote_recipe("carbonara", "Carbonara", "pasta"),
//!     ])
//!     .await;
//!
//! let clock = ManualClock::new(fixtures::base_time());
//! let engine = SyncEngine::new(store, Arc::new(client), SyncConfig::default())
//!     .with_clock(clock.clock());
//! ```

mod mock_catalog_client;

pub use mock_catalog_client::{MockCatalogClient, RecordedRequest};

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};

use crate::sync::Clock;

/// A clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn set(&self, at: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = at;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }

    /// A `Clock` reading this manual clock.
    pub fn clock(&self) -> Clock {
        let now = self.now.clone();
        Arc::new(move || *now.lock().unwrap_or_else(|e| e.into_inner()))
    }
}

/// Test fixtures and helper functions.
pub mod fixtures {
    use chrono::{DateTime, TimeZone, Utc};

    use crate::remote::{RemoteCategory, RemoteRecipe};
    use crate::store::{Category, Ingredient, Instruction, Recipe};

    /// A fixed instant tests can build on.
    pub fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
            .single()
            .unwrap_or_default()
    }

    pub fn remote_category(slug: &str, name: &str) -> RemoteCategory {
        RemoteCategory {
            slug: slug.to_string(),
            name: name.to_string(),
        }
    }

    /// A full remote recipe with two ingredients and two steps.
    pub fn remote_recipe(slug: &str, name: &str, category_slug: &str) -> RemoteRecipe {
        RemoteRecipe {
            slug: slug.to_string(),
            name: name.to_string(),
            author: Some("Test Kitchen".to_string()),
            ingredients: vec![
                Ingredient {
                    amount: "200 g".to_string(),
                    name: format!("{} base", name.to_lowercase()),
                },
                Ingredient {
                    amount: "1 pinch".to_string(),
                    name: "salt".to_string(),
                },
            ],
            instructions: vec![
                Instruction {
                    text: "Prepare the ingredients.".to_string(),
                },
                Instruction {
                    text: format!("Cook the {}.", name.to_lowercase()),
                },
            ],
            category: remote_category(category_slug, &title_case(category_slug)),
        }
    }

    pub fn category(slug: &str, name: &str, updated_at: DateTime<Utc>) -> Category {
        Category {
            slug: slug.to_string(),
            name: name.to_string(),
            updated_at,
        }
    }

    pub fn recipe(slug: &str, name: &str, category_slug: &str, updated_at: DateTime<Utc>) -> Recipe {
        remote_recipe(slug, name, category_slug).into_recipe(category_slug, updated_at)
    }

    fn title_case(slug: &str) -> String {
        let mut chars = slug.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}
