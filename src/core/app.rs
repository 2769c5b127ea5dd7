//! Wiring from configuration to a ready [`ChatSession`].

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::api::{ClientSettings, HttpChatClient};
use crate::auth::AuthManager;
use crate::commands::CommandRegistry;
use crate::core::builtins::{builtin_documents, find_builtin_provider};
use crate::core::config::Config;
use crate::core::document::InMemoryDocumentStore;
use crate::core::session::ChatSession;
use crate::utils::logging::LoggingState;

/// Command-line overrides applied on top of the config file.
#[derive(Debug, Clone, Default)]
pub struct AppInitConfig {
    pub model: Option<String>,
    pub provider: Option<String>,
    pub base_url: Option<String>,
    pub log_file: Option<String>,
    pub env_only: bool,
}

/// Shared, read-mostly state. One [`ChatSession`] is created per connection.
pub struct App {
    pub store: Arc<InMemoryDocumentStore>,
    pub commands: Arc<CommandRegistry>,
    pub client: Arc<HttpChatClient>,
    log_file: Option<String>,
}

impl App {
    pub fn new_session(&self) -> Result<ChatSession, Box<dyn Error>> {
        let logging = LoggingState::new(self.log_file.clone())?;
        Ok(ChatSession::new(
            self.client.clone(),
            self.store.clone(),
            self.commands.clone(),
            logging,
        ))
    }
}

/// Configured documents, or the built-in samples when none are configured.
pub fn build_document_store(config: &Config) -> InMemoryDocumentStore {
    if config.documents.is_empty() {
        InMemoryDocumentStore::from_documents(builtin_documents())
    } else {
        InMemoryDocumentStore::from_documents(config.documents.iter().cloned())
    }
}

pub fn new_with_auth(
    init: AppInitConfig,
    config: &Config,
    auth: &AuthManager,
) -> Result<App, Box<dyn Error>> {
    let provider = init
        .provider
        .clone()
        .unwrap_or_else(|| config.provider_id().to_string());

    let base_url = match init.base_url.clone().or_else(|| config.base_url.clone()) {
        Some(url) => url,
        None => find_builtin_provider(&provider)
            .map(|p| p.base_url.clone())
            .ok_or_else(|| {
                format!(
                    "Unknown provider '{provider}'. Pass --base-url or run 'docchat set base-url <url>'."
                )
            })?,
    };

    let model = init
        .model
        .clone()
        .or_else(|| config.model.clone())
        .filter(|m| !m.trim().is_empty())
        .ok_or("No model configured. Pass --model or run 'docchat set model <name>'.")?;

    let api_key = if init.env_only {
        AuthManager::env_only().resolve_api_key(&provider)?
    } else {
        auth.resolve_api_key(&provider)?
    };

    let settings = ClientSettings {
        base_url,
        api_key,
        provider_name: provider,
        model,
        max_tokens: config.max_tokens(),
        temperature: config.temperature(),
        system_prompt: config.system_prompt.clone(),
        timeout: Duration::from_secs(config.request_timeout_secs()),
    };
    info!(
        provider = %settings.provider_name,
        model = %settings.model,
        base_url = %settings.base_url,
        "Configured chat client"
    );

    let store = build_document_store(config);
    let commands = CommandRegistry::with_custom(&config.commands)?;

    Ok(App {
        store: Arc::new(store),
        commands: Arc::new(commands),
        client: Arc::new(HttpChatClient::new(settings)?),
        log_file: init.log_file.or_else(|| config.log_file.clone()),
    })
}
