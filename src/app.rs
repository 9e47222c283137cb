//! Shared application state for a CLI invocation

use tracing::info;

use crate::browse::{BrowseGate, ChoiceCache, FilterContext};
use crate::config::HubConfig;
use crate::error::{HubError, Result};
use crate::search::FtsIndex;
use crate::storage::Database;

/// Everything a command needs: settings, an open database, the choice
/// cache and the visibility gate.
pub struct AppContext {
    pub config: HubConfig,
    pub db: Database,
    pub cache: ChoiceCache,
    pub gate: BrowseGate,
    pub search: FtsIndex,
}

impl AppContext {
    /// Open an existing hub database. Fails if `hub init` has not run.
    pub fn open(config: HubConfig) -> Result<Self> {
        let path = config.database.path.clone();
        if !path.exists() {
            return Err(HubError::NotInitialized(path));
        }
        let db = Database::open(&path)?;
        Ok(Self::assemble(config, db))
    }

    /// Create (or reopen) the hub database and bring the schema current.
    pub fn init(config: HubConfig) -> Result<Self> {
        let path = config.database.path.clone();
        let db = Database::open(&path)?;
        info!(path = %path.display(), "database ready");
        Ok(Self::assemble(config, db))
    }

    /// A fully in-memory context, used by tests and the demo seeder.
    pub fn in_memory() -> Result<Self> {
        let config = HubConfig::default();
        let db = Database::open_in_memory()?;
        Ok(Self::assemble(config, db))
    }

    fn assemble(config: HubConfig, db: Database) -> Self {
        let cache = ChoiceCache::new(config.cache.choice_capacity, config.choice_ttl());
        let gate = BrowseGate::new(config.public_kinds());
        Self {
            config,
            db,
            cache,
            gate,
            search: FtsIndex,
        }
    }

    pub fn filter_ctx(&self) -> FilterContext<'_> {
        FilterContext {
            db: &self.db,
            search: &self.search,
            cache: &self.cache,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_requires_init() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = HubConfig::default();
        config.database.path = dir.path().join("hub.db");

        assert!(matches!(
            AppContext::open(config.clone()),
            Err(HubError::NotInitialized(_))
        ));

        AppContext::init(config.clone()).unwrap();
        assert!(AppContext::open(config).is_ok());
    }
}
