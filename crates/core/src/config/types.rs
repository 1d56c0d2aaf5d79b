use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("ressipy.db")
}

/// Remote catalog configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RemoteConfig {
    /// Catalog API root (e.g., "https://ressipy.com/api")
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request deadline in seconds (default: 10)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_base_url() -> String {
    "https://ressipy.com/api".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("Ressipy/{}", env!("CARGO_PKG_VERSION"))
}

/// Local cache policy configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Rows older than this are refreshed from the remote catalog (default: 24)
    #[serde(default = "default_stale_after_hours")]
    pub stale_after_hours: u32,
    /// Seed the whole catalog when the store starts out empty (default: true)
    #[serde(default = "default_true")]
    pub bootstrap_on_empty: bool,
    /// Max recipe detail fetches in flight for one category read (default: 4)
    #[serde(default = "default_cascade_concurrency")]
    pub cascade_concurrency: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            stale_after_hours: default_stale_after_hours(),
            bootstrap_on_empty: default_true(),
            cascade_concurrency: default_cascade_concurrency(),
        }
    }
}

fn default_stale_after_hours() -> u32 {
    24
}

fn default_true() -> bool {
    true
}

fn default_cascade_concurrency() -> usize {
    4
}
