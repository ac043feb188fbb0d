//! Wiring of the shared client components.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::debug;

use crate::access::ContentAccessResolver;
use crate::comments::CommentsClient;
use crate::config::ClientConfig;
use crate::content::ContentService;
use crate::credentials::{CredentialStore, KeyValueStorage};
use crate::error::Result;
use crate::favorites::FavoritesClient;
use crate::gateway::Gateway;
use crate::session::{SessionEvent, SessionEventBus, SessionManager};

/// Owns the credential store, the event bus and the gateway.
///
/// Every client handed out shares the same store, so a sign-out or a 401
/// seen by one is visible to all. Cloning is cheap.
#[derive(Clone, Debug)]
pub struct SessionContext {
    config: Arc<ClientConfig>,
    store: CredentialStore,
    events: SessionEventBus,
    gateway: Gateway,
}

impl SessionContext {
    pub fn new(config: ClientConfig, storage: Arc<dyn KeyValueStorage>) -> Result<Self> {
        let http = config.build_http_client()?;
        let base = config.base_url()?;
        let store = CredentialStore::new(storage);
        let events = SessionEventBus::new();
        let gateway = Gateway::new(http, base, store.clone(), events.clone());

        debug!(api_base = %gateway.base(), "Session context ready");
        Ok(Self {
            config: Arc::new(config),
            store,
            events,
            gateway,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    pub fn events(&self) -> &SessionEventBus {
        &self.events
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn session(&self) -> SessionManager {
        SessionManager::new(
            self.gateway.clone(),
            self.store.clone(),
            self.events.clone(),
            self.config.remember_days,
        )
    }

    pub fn access(&self) -> ContentAccessResolver {
        ContentAccessResolver::new(self.gateway.clone())
    }

    pub fn favorites(&self) -> FavoritesClient {
        FavoritesClient::new(self.gateway.clone())
    }

    pub fn content(&self) -> ContentService {
        ContentService::new(self.gateway.clone())
    }

    pub fn comments(&self) -> CommentsClient {
        CommentsClient::new(self.gateway.clone())
    }
}
