use std::sync::Arc;

use pitch_composer::{ComposerRegistry, GenerationBridge, PublishController, TextCompletionClient};
use pitch_db::storage::PublicUrls;
use pitch_db::{DbPool, PitchStore};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// The injected storage client, constructed once at startup.
    pub store: Arc<dyn PitchStore>,
    /// Database pool for health checks. `None` on the in-memory store.
    pub pool: Option<DbPool>,
    pub config: Arc<ServerConfig>,
    /// Public URL accessor for object-storage paths.
    pub urls: Arc<PublicUrls>,
    /// Open composer sessions.
    pub composer: Arc<ComposerRegistry>,
    pub publisher: Arc<PublishController>,
    pub generator: Arc<GenerationBridge>,
}

impl AppState {
    /// Wire every component around one storage client.
    pub fn new(
        store: Arc<dyn PitchStore>,
        pool: Option<DbPool>,
        config: ServerConfig,
        completion: Arc<dyn TextCompletionClient>,
    ) -> Self {
        let urls = PublicUrls::new(&config.storage_public_url, &config.storage_bucket);
        let composer = ComposerRegistry::new(Arc::clone(&store), config.autosave_quiet());
        let publisher = PublishController::new(Arc::clone(&store), config.public_origin.clone());
        let generator = GenerationBridge::new(Arc::clone(&store), completion);

        Self {
            store,
            pool,
            config: Arc::new(config),
            urls: Arc::new(urls),
            composer: Arc::new(composer),
            publisher: Arc::new(publisher),
            generator: Arc::new(generator),
        }
    }
}
