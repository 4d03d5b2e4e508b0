//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and HTTP
//! handlers. Services are generic over store/client/verifier traits, but
//! AppState pins them to the concrete infra implementations.

use std::sync::Arc;

use weddingwall_core::ingest::service::IngestService;
use weddingwall_core::rotation::service::RotationService;
use weddingwall_infra::config::{LineCredentials, load_effective_config};
use weddingwall_infra::line::{LineMessagingClient, LineSignatureVerifier};
use weddingwall_infra::storage::LocalImageStore;
use weddingwall_types::config::WallConfig;

/// Store handle shared by both services.
pub type SharedStore = Arc<LocalImageStore>;

pub type ConcreteIngestService =
    IngestService<SharedStore, LineMessagingClient, LineSignatureVerifier>;

pub type ConcreteRotationService = RotationService<SharedStore>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub ingest: Arc<ConcreteIngestService>,
    pub rotation: Arc<ConcreteRotationService>,
    pub store: SharedStore,
    pub config: Arc<WallConfig>,
}

impl AppState {
    /// Load config and credentials, then wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let config = load_effective_config().await;
        let credentials = LineCredentials::from_env();
        if !credentials.is_complete() {
            tracing::warn!(
                missing = ?credentials.missing,
                "LINE credentials incomplete; webhook calls will be rejected"
            );
        }

        let state = Self::build(config, credentials)?;
        if let Err(e) = state.store.ensure_layout().await {
            // Moves and writes create directories on demand; this is not fatal.
            tracing::warn!(error = %e, "could not create bucket directories");
        }
        Ok(state)
    }

    /// Wire services from an explicit config and credentials.
    pub fn build(config: WallConfig, credentials: LineCredentials) -> anyhow::Result<Self> {
        let store: SharedStore = Arc::new(LocalImageStore::new(config.storage.base_dir.clone()));
        let client = LineMessagingClient::new(credentials.access_token, &config.line)?;
        let verifier = LineSignatureVerifier::new(credentials.channel_secret);

        tracing::debug!(base_dir = %config.storage.base_dir.display(), "image store ready");

        Ok(Self {
            ingest: Arc::new(IngestService::new(store.clone(), client, verifier)),
            rotation: Arc::new(RotationService::new(store.clone())),
            store,
            config: Arc::new(config),
        })
    }
}
