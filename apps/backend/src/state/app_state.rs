use std::sync::Arc;

use crate::catalog::CardCatalog;
use crate::config::AppConfig;
use crate::services::game_flow::GameFlowService;
use crate::ws::hub::WsRegistry;

/// Shared resources handed to every handler and websocket actor.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub catalog: Arc<CardCatalog>,
    /// All session operations go through here.
    pub flow: Arc<GameFlowService>,
    /// Open websocket connections; also the flow's broadcast gateway.
    pub registry: Arc<WsRegistry>,
}

impl AppState {
    pub fn new(
        config: Arc<AppConfig>,
        catalog: Arc<CardCatalog>,
        flow: Arc<GameFlowService>,
        registry: Arc<WsRegistry>,
    ) -> Self {
        Self {
            config,
            catalog,
            flow,
            registry,
        }
    }
}
