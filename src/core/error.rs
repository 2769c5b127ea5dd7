//! Error taxonomy for the chat core.
//!
//! Every variant is recoverable: the session reports it to the user and keeps
//! running. Nothing in the core terminates the process.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    /// A referenced document id does not exist in the store.
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    /// A `/name` command that is not registered. `suggestions` holds
    /// registered names that start with what was typed.
    #[error("Unknown command: /{name}. {}", did_you_mean(.suggestions))]
    UnknownCommand {
        name: String,
        suggestions: Vec<String>,
    },

    /// Malformed input, such as a bare `/` or a missing command argument.
    #[error("{0}")]
    Validation(String),

    /// The upstream chat API failed or returned something unusable.
    #[error("{0}")]
    Upstream(String),
}

fn did_you_mean(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        return "Type /help for available commands.".to_string();
    }
    let names: Vec<String> = suggestions.iter().map(|s| format!("/{s}")).collect();
    format!("Did you mean {}?", names.join(" or "))
}

impl ChatError {
    pub fn validation(message: impl Into<String>) -> Self {
        ChatError::Validation(message.into())
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        ChatError::Upstream(message.into())
    }

    /// The request went out and failed; the user turn stays in history.
    pub fn is_upstream(&self) -> bool {
        matches!(self, ChatError::Upstream(_))
    }
}
