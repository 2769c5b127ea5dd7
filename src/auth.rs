//! API key lookup and keyring storage.
//!
//! Keys are looked up in this order: `DOCCHAT_API_KEY`, the provider's
//! conventional environment variable, then the system keyring.

use keyring::Entry;
use std::error::Error;
use std::io::{self, Write};
use tracing::debug;

use crate::core::builtins::find_builtin_provider;

const KEYRING_SERVICE: &str = "docchat";
pub const API_KEY_ENV: &str = "DOCCHAT_API_KEY";

pub struct AuthManager {
    use_keyring: bool,
}

impl Default for AuthManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthManager {
    pub fn new() -> Self {
        Self { use_keyring: true }
    }

    /// Environment-only lookup; never touches the keyring.
    pub fn env_only() -> Self {
        Self { use_keyring: false }
    }

    pub fn store_token(&self, provider_name: &str, token: &str) -> Result<(), Box<dyn Error>> {
        let entry = Entry::new(KEYRING_SERVICE, provider_name)?;
        entry.set_password(token)?;
        Ok(())
    }

    pub fn get_token(&self, provider_name: &str) -> Result<Option<String>, Box<dyn Error>> {
        if !self.use_keyring {
            return Ok(None);
        }
        let entry = Entry::new(KEYRING_SERVICE, provider_name)?;
        match entry.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// Returns true when a stored key was removed.
    pub fn remove_token(&self, provider_name: &str) -> Result<bool, Box<dyn Error>> {
        let entry = Entry::new(KEYRING_SERVICE, provider_name)?;
        match entry.delete_credential() {
            Ok(()) => Ok(true),
            Err(keyring::Error::NoEntry) => Ok(false),
            Err(e) => Err(Box::new(e)),
        }
    }

    pub fn resolve_api_key(&self, provider_name: &str) -> Result<String, Box<dyn Error>> {
        self.resolve_api_key_with(provider_name, |name| std::env::var(name).ok())
    }

    fn resolve_api_key_with(
        &self,
        provider_name: &str,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<String, Box<dyn Error>> {
        let provider_env =
            find_builtin_provider(provider_name).and_then(|p| p.env_key.as_deref());
        let env_names = std::iter::once(API_KEY_ENV).chain(provider_env);

        for name in env_names {
            if let Some(key) = env(name).filter(|k| !k.trim().is_empty()) {
                debug!(source = name, "Using API key from environment");
                return Ok(key);
            }
        }

        if let Some(key) = self.get_token(provider_name)? {
            debug!(provider = provider_name, "Using API key from keyring");
            return Ok(key);
        }

        let hint = match provider_env {
            Some(var) => format!("{API_KEY_ENV} or {var}"),
            None => API_KEY_ENV.to_string(),
        };
        Err(format!(
            "No API key found for provider '{provider_name}'. Set {hint}, or run 'docchat auth'."
        )
        .into())
    }

    pub fn interactive_auth(&self, provider_name: &str) -> Result<(), Box<dyn Error>> {
        print!("Enter API key for {}: ", display_name(provider_name));
        io::stdout().flush()?;

        let mut token = String::new();
        io::stdin().read_line(&mut token)?;
        let token = token.trim();
        if token.is_empty() {
            return Err("API key cannot be empty".into());
        }

        self.store_token(provider_name, token)?;
        println!(
            "✅ Stored API key for {} in the system keyring",
            display_name(provider_name)
        );
        Ok(())
    }

    pub fn interactive_deauth(&self, provider_name: &str) -> Result<(), Box<dyn Error>> {
        let name = display_name(provider_name);
        if self.remove_token(provider_name)? {
            println!("✅ Removed API key for {name}");
        } else {
            println!("No stored API key for {name}");
        }
        Ok(())
    }
}

/// The built-in provider's display name, or the id as given.
fn display_name(provider_name: &str) -> &str {
    find_builtin_provider(provider_name)
        .map(|p| p.display_name.as_str())
        .unwrap_or(provider_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn docchat_key_takes_precedence() {
        let auth = AuthManager::env_only();
        let env = env_from(&[(API_KEY_ENV, "primary"), ("ANTHROPIC_API_KEY", "fallback")]);
        assert_eq!(auth.resolve_api_key_with("anthropic", env).unwrap(), "primary");
    }

    #[test]
    fn provider_env_var_is_used_when_primary_is_blank() {
        let auth = AuthManager::env_only();
        let env = env_from(&[(API_KEY_ENV, "  "), ("OPENAI_API_KEY", "sk-openai")]);
        assert_eq!(auth.resolve_api_key_with("openai", env).unwrap(), "sk-openai");
    }

    #[test]
    fn prompts_use_display_names() {
        assert_eq!(display_name("openrouter"), "OpenRouter");
        assert_eq!(display_name("my-proxy"), "my-proxy");
    }

    #[test]
    fn missing_key_error_names_the_variables() {
        let auth = AuthManager::env_only();
        let err = auth
            .resolve_api_key_with("anthropic", env_from(&[]))
            .unwrap_err()
            .to_string();
        assert!(err.contains("DOCCHAT_API_KEY or ANTHROPIC_API_KEY"));

        let err = auth
            .resolve_api_key_with("my-proxy", env_from(&[]))
            .unwrap_err()
            .to_string();
        assert!(err.contains("Set DOCCHAT_API_KEY,"));
    }
}
