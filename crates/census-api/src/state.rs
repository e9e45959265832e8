//! Application state.

use std::sync::Arc;

use crate::auth::AdminGate;
use crate::config::ApiConfig;
use crate::services::{ParticipantService, ParticipantStore};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub participants: ParticipantService,
    pub admin_gate: Arc<AdminGate>,
}

impl AppState {
    /// Create new application state.
    pub fn new(config: ApiConfig) -> Self {
        let store = if config.seed_example_participant {
            ParticipantStore::seeded()
        } else {
            ParticipantStore::new()
        };

        Self::with_store(config, store)
    }

    /// Create application state around an existing store.
    pub fn with_store(config: ApiConfig, store: ParticipantStore) -> Self {
        let admin_gate = Arc::new(AdminGate::new(&config.admin_jwt_secret));
        Self {
            config,
            participants: ParticipantService::new(store),
            admin_gate,
        }
    }
}
