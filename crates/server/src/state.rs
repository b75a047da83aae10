use std::sync::Arc;
use streamfind_core::{
    Config, FileHoster, HistoryStore, MatchOrchestrator, MetadataCatalog, SanitizedConfig,
};

/// Shared application state
pub struct AppState {
    config: Config,
    hoster: Option<Arc<dyn FileHoster>>,
    catalog: Option<Arc<dyn MetadataCatalog>>,
    history: Arc<dyn HistoryStore>,
    orchestrator: MatchOrchestrator,
}

impl AppState {
    /// The orchestrator is built from the `[matching]` weights in `config`.
    pub fn new(
        config: Config,
        hoster: Option<Arc<dyn FileHoster>>,
        catalog: Option<Arc<dyn MetadataCatalog>>,
        history: Arc<dyn HistoryStore>,
    ) -> Self {
        let orchestrator = MatchOrchestrator::new(config.matching.clone());
        Self {
            config,
            hoster,
            catalog,
            history,
            orchestrator,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn hoster(&self) -> Option<&Arc<dyn FileHoster>> {
        self.hoster.as_ref()
    }

    pub fn catalog(&self) -> Option<&Arc<dyn MetadataCatalog>> {
        self.catalog.as_ref()
    }

    pub fn history(&self) -> &dyn HistoryStore {
        self.history.as_ref()
    }

    pub fn orchestrator(&self) -> &MatchOrchestrator {
        &self.orchestrator
    }
}
