//! Configuration
//!
//! Settings resolve in three layers, later layers winning: built-in
//! defaults, then the TOML config file, then `HUB_*` environment
//! variables. The file is optional; a missing file just means defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::content::ContentKind;
use crate::error::{HubError, Result};

/// Resolved settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub browse: BrowseConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of choice lists kept.
    pub choice_capacity: usize,
    /// Seconds before a cached choice list goes stale.
    pub choice_ttl_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowseConfig {
    /// Kind slugs anonymous visitors may browse.
    pub public_kinds: Vec<String>,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            cache: CacheConfig::default(),
            browse: BrowseConfig::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_data_dir().join("hub.db"),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            choice_capacity: 64,
            choice_ttl_secs: 300,
        }
    }
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            public_kinds: vec!["case-study".into(), "photograph".into(), "video".into()],
        }
    }
}

/// Partial settings parsed from the config file. Only present fields
/// override the layer below.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigPatch {
    pub database: Option<DatabasePatch>,
    pub cache: Option<CachePatch>,
    pub browse: Option<BrowsePatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabasePatch {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CachePatch {
    pub choice_capacity: Option<usize>,
    pub choice_ttl_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BrowsePatch {
    pub public_kinds: Option<Vec<String>>,
}

impl HubConfig {
    /// Load settings: defaults, then `path` (or the default config file),
    /// then environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        let file = path.map(Path::to_path_buf).or_else(default_config_file);
        if let Some(file) = file {
            if file.exists() {
                let raw = std::fs::read_to_string(&file)?;
                let patch: ConfigPatch = toml::from_str(&raw)
                    .map_err(|e| HubError::Config(format!("{}: {e}", file.display())))?;
                config.apply(patch);
                debug!(file = %file.display(), "config file applied");
            } else if path.is_some() {
                return Err(HubError::Config(format!(
                    "config file not found: {}",
                    file.display()
                )));
            }
        }

        config.apply_env();
        Ok(config)
    }

    pub fn apply(&mut self, patch: ConfigPatch) {
        if let Some(db) = patch.database {
            if let Some(path) = db.path {
                self.database.path = path;
            }
        }
        if let Some(cache) = patch.cache {
            if let Some(capacity) = cache.choice_capacity {
                self.cache.choice_capacity = capacity;
            }
            if let Some(ttl) = cache.choice_ttl_secs {
                self.cache.choice_ttl_secs = ttl;
            }
        }
        if let Some(browse) = patch.browse {
            if let Some(kinds) = browse.public_kinds {
                self.browse.public_kinds = kinds;
            }
        }
    }

    fn apply_env(&mut self) {
        if let Ok(path) = std::env::var("HUB_DB_PATH") {
            if !path.is_empty() {
                self.database.path = PathBuf::from(path);
            }
        }
        if let Ok(ttl) = std::env::var("HUB_CACHE_TTL_SECS") {
            if let Ok(ttl) = ttl.parse() {
                self.cache.choice_ttl_secs = ttl;
            }
        }
        if let Ok(kinds) = std::env::var("HUB_PUBLIC_KINDS") {
            if !kinds.is_empty() {
                self.browse.public_kinds = kinds
                    .split(',')
                    .map(|k| k.trim().to_string())
                    .filter(|k| !k.is_empty())
                    .collect();
            }
        }
    }

    pub fn choice_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.choice_ttl_secs)
    }

    /// The configured public kinds, unknown slugs dropped.
    pub fn public_kinds(&self) -> Vec<ContentKind> {
        self.browse
            .public_kinds
            .iter()
            .filter_map(|slug| slug.parse().ok())
            .collect()
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("resource-hub")
}

fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("resource-hub").join("config.toml"))
}
