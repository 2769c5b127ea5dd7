//! Providers and sample documents embedded from `src/builtins/` at build time.

use std::sync::LazyLock;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::error;

use crate::core::document::Document;

/// Which authentication headers a provider expects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// `Authorization: Bearer <key>`
    #[default]
    #[serde(alias = "openai")]
    Bearer,
    /// `x-api-key` plus `anthropic-version`
    Anthropic,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BuiltinProvider {
    pub id: String,
    pub display_name: String,
    pub base_url: String,
    #[serde(default, rename = "mode")]
    pub auth: AuthMode,
    /// Conventional environment variable holding this provider's key.
    pub env_key: Option<String>,
}

#[derive(Deserialize)]
struct ProviderTable {
    providers: Vec<BuiltinProvider>,
}

#[derive(Deserialize)]
struct DocumentTable {
    documents: Vec<Document>,
}

static PROVIDERS: LazyLock<Vec<BuiltinProvider>> = LazyLock::new(|| {
    parse_embedded::<ProviderTable>("providers.toml", include_str!("../builtins/providers.toml"))
        .map(|table| table.providers)
        .unwrap_or_default()
});

fn parse_embedded<T: DeserializeOwned>(name: &str, source: &str) -> Option<T> {
    match toml::from_str(source) {
        Ok(table) => Some(table),
        Err(e) => {
            error!(file = name, error = %e, "Embedded table failed to parse");
            None
        }
    }
}

/// Case-insensitive lookup by provider id.
pub fn find_builtin_provider(id: &str) -> Option<&'static BuiltinProvider> {
    PROVIDERS.iter().find(|p| p.id.eq_ignore_ascii_case(id))
}

/// Sample documents used when the configuration does not define any.
pub fn builtin_documents() -> Vec<Document> {
    parse_embedded::<DocumentTable>("documents.toml", include_str!("../builtins/documents.toml"))
        .map(|table| table.documents)
        .unwrap_or_default()
}
