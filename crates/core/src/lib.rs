pub mod config;
pub mod remote;
pub mod store;
pub mod sync;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, CacheConfig, Config, ConfigError,
    DatabaseConfig, RemoteConfig, ServerConfig,
};
pub use remote::{CatalogClient, HttpCatalogClient, RemoteError};
pub use store::{
    Category, Ingredient, Instruction, Recipe, RecipeStore, SqliteRecipeStore, StoreError,
    StoreStats,
};
pub use sync::{BootstrapOutcome, Clock, SyncConfig, SyncEngine, SyncError};
