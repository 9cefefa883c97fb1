use std::sync::Arc;

use ridewise_catalog::{
    demo_catalog, demo_profiles, CatalogProvider, InMemoryCatalog, InMemoryProfileStore,
    JsonFileCatalog, ProfileProvider, ProviderError,
};
use ridewise_core::config::AppConfig;
use ridewise_core::recommendations::RecommendationEngine;
use thiserror::Error;
use tracing::info;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub engine: RecommendationEngine,
    pub catalog: Arc<dyn CatalogProvider>,
    pub profiles: Arc<dyn ProfileProvider>,
}

pub struct Application {
    pub config: AppConfig,
    pub state: AppState,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("catalog failed to load: {0}")]
    Catalog(#[source] ProviderError),
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let catalog: Arc<dyn CatalogProvider> = match &config.catalog.path {
        Some(path) => Arc::new(JsonFileCatalog::new(path)),
        None => Arc::new(InMemoryCatalog::with_vehicles(demo_catalog())),
    };
    let vehicles = catalog.snapshot().await.map_err(BootstrapError::Catalog)?;
    info!(
        event_name = "system.bootstrap.catalog_loaded",
        correlation_id = "bootstrap",
        source = config
            .catalog
            .path
            .as_deref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "demo".to_string()),
        vehicles = vehicles.len(),
        "catalog snapshot loaded"
    );

    let state = AppState {
        engine: RecommendationEngine::with_settings(config.recommendations),
        catalog,
        profiles: Arc::new(InMemoryProfileStore::with_profiles(demo_profiles())),
    };

    Ok(Application { config, state })
}
