//! Application state wiring the session together.
//!
//! AppState pins the session controller to the concrete infra
//! implementations: the Gemini client, the process-lifetime credential
//! store, and the in-memory document store.

use std::path::Path;
use std::sync::Arc;

use docuchat_core::chat::controller::SessionController;
use docuchat_core::credential::manager::CREDENTIAL_KEY;
use docuchat_infra::config::{load_config_file, load_global_config, resolve_data_dir};
use docuchat_infra::credential::SessionCredentialStore;
use docuchat_infra::document::MemoryDocumentStore;
use docuchat_infra::llm::create_client;
use docuchat_types::config::GlobalConfig;

/// Shared application state for CLI commands.
#[derive(Clone)]
pub struct AppState {
    pub controller: SessionController,
    pub config: GlobalConfig,
}

impl AppState {
    /// Load configuration and start the session.
    ///
    /// An explicit `config_path` must exist and parse; otherwise the data
    /// directory's `config.toml` is used when present.
    pub async fn init(config_path: Option<&Path>) -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        let config = match config_path {
            Some(path) => load_config_file(path).await?,
            None => load_global_config(&data_dir).await,
        };

        let client = create_client(&config.provider)?;
        let credentials = Arc::new(SessionCredentialStore::seeded_from_env(
            CREDENTIAL_KEY,
            &config.provider.api_key_env,
        ));
        let documents = Arc::new(MemoryDocumentStore::new());

        let controller =
            SessionController::start(config.session.clone(), client, credentials, documents).await;

        tracing::debug!(
            data_dir = %data_dir.display(),
            model = %config.session.model,
            "session ready"
        );

        Ok(Self { controller, config })
    }
}
