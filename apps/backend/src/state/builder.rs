use std::sync::Arc;

use crate::catalog::{load_catalog, CardCatalog};
use crate::config::AppConfig;
use crate::error::AppError;
use crate::services::game_flow::GameFlowService;
use crate::services::persistence::SnapshotWriter;
use crate::services::session_store::SessionStore;
use crate::state::app_state::AppState;
use crate::ws::hub::WsRegistry;

/// Builder for [`AppState`] (used in both tests and main).
pub struct StateBuilder {
    config: AppConfig,
    catalog: Option<Arc<CardCatalog>>,
    seed: Option<u64>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            catalog: None,
            seed: None,
        }
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Use an in-memory catalog instead of reading the stock files.
    pub fn with_catalog(mut self, catalog: Arc<CardCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Seed dealing and join codes so tests are reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(self) -> Result<AppState, AppError> {
        let catalog = match self.catalog {
            Some(catalog) => catalog,
            None => Arc::new(load_catalog(
                &self.config.characters_path,
                &self.config.bonuses_path,
            )?),
        };

        let rules = self.config.rules();
        let store = match self.seed {
            Some(seed) => SessionStore::with_seed(Arc::clone(&catalog), rules, seed),
            None => SessionStore::new(Arc::clone(&catalog), rules),
        };

        let registry = Arc::new(WsRegistry::new());
        let writer = SnapshotWriter::new(self.config.snapshot_dir.clone());
        let flow = Arc::new(GameFlowService::new(
            Arc::new(store),
            registry.clone(),
            writer,
        ));

        Ok(AppState::new(
            Arc::new(self.config),
            catalog,
            flow,
            registry,
        ))
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
