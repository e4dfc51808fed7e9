use std::sync::Arc;

use crate::core::client::Client;
use crate::core::config::Args;
use crate::core::error::ConfigError;
use crate::policy::AccessPolicy;
use crate::session::manager::SessionManager;
use crate::session::token::TokenCodec;

#[derive(Clone, Debug)]
pub(crate) struct AppState {
    pub(crate) client: Client,
    pub(crate) sessions: SessionManager,
    pub(crate) policy: Arc<AccessPolicy>,
}

impl AppState {
    pub(crate) fn new(config: &Args) -> Result<Self, ConfigError> {
        Ok(AppState {
            client: Client::new(&config.api_url, &config.api_key)?,
            sessions: SessionManager::new(TokenCodec::new(&config.secret)),
            policy: Arc::new(AccessPolicy::new(config.development)?),
        })
    }
}
