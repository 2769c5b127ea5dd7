//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod chat_loop;
pub mod say;

use std::error::Error;
use std::path::PathBuf;
use std::sync::LazyLock;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::auth::AuthManager;
use crate::core::app::{build_document_store, AppInitConfig};
use crate::core::config::data::SETTABLE_KEYS;
use crate::core::config::Config;
use crate::core::document::DocumentStore;

static LONG_VERSION: LazyLock<String> = LazyLock::new(|| {
    format!(
        "{} ({} {})",
        env!("CARGO_PKG_VERSION"),
        option_env!("VERGEN_GIT_DESCRIBE").unwrap_or("unknown"),
        option_env!("VERGEN_BUILD_DATE").unwrap_or("unknown"),
    )
});

#[derive(Parser)]
#[command(name = "docchat", version, long_version = LONG_VERSION.as_str())]
#[command(about = "A terminal chat client with @document mentions and /command prompts")]
#[command(
    long_about = "docchat is a line-oriented chat client for LLM chat-completion APIs. \
Mention a stored document anywhere in a message with @id to include it as context, \
or start a line with /name to run a prompt template.\n\n\
Environment Variables:\n\
  DOCCHAT_API_KEY    API key (falls back to the provider's usual variable, then the keyring)\n\
  RUST_LOG           Diagnostic log filter, e.g. docchat=debug (logs go to stderr)\n\n\
Commands inside a chat:\n\
  /help              Show available commands\n\
  /docs              List documents that can be mentioned\n\
  /format <doc_id>   Rewrite a document in markdown\n\
  /summarize <doc_id> Summarize a document\n\
  /log [filename]    Enable or toggle the transcript log"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Model to use for chat
    #[arg(short = 'm', long, global = true)]
    pub model: Option<String>,

    /// Provider to use (anthropic, openai, openrouter, or a custom id with --base-url)
    #[arg(short = 'p', long, global = true)]
    pub provider: Option<String>,

    /// Override the provider's API base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Enable transcript logging to the specified file
    #[arg(short = 'l', long, global = true)]
    pub log: Option<String>,

    /// Read configuration from this file instead of the default location
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Only read API keys from environment variables, never the keyring
    #[arg(long, global = true)]
    pub env: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat (default)
    Chat,
    /// Send a single message and print the reply
    Say {
        /// The message; may reference documents with @id or start with /command
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        prompt: Vec<String>,
    },
    /// List the documents available for @id mentions
    Docs,
    /// Store an API key for the provider in the system keyring
    Auth,
    /// Remove the provider's API key from the system keyring
    Deauth,
    /// Set a configuration value
    Set {
        /// Configuration key to set
        key: String,
        /// Value to set (multiple words are joined with spaces)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        value: Vec<String>,
    },
    /// Unset a configuration value
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

fn init_tracing() {
    // Diagnostics go to stderr so they never interleave with chat output.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("docchat=warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

fn load_config(path: Option<&PathBuf>) -> Result<(Config, PathBuf), Box<dyn Error>> {
    let path = match path {
        Some(path) => path.clone(),
        None => Config::get_config_path()?,
    };
    let config = Config::load_from_path(&path)?;
    Ok((config, path))
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let (mut config, config_path) = load_config(args.config.as_ref())?;
    let provider = args
        .provider
        .clone()
        .unwrap_or_else(|| config.provider_id().to_string());

    let init = AppInitConfig {
        model: args.model,
        provider: args.provider,
        base_url: args.base_url,
        log_file: args.log,
        env_only: args.env,
    };

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Chat => chat_loop::run_chat(init, &config).await,
        Commands::Say { prompt } => say::run_say(prompt, init, &config).await,
        Commands::Docs => {
            let store = build_document_store(&config);
            for id in store.list() {
                println!("@{id}");
            }
            Ok(())
        }
        Commands::Auth => AuthManager::new().interactive_auth(&provider),
        Commands::Deauth => AuthManager::new().interactive_deauth(&provider),
        Commands::Set { key, value } => {
            let value = value.join(" ");
            if config.set_value(&key, value.clone())? {
                config.save_to_path(&config_path)?;
                println!("✅ Set {key} to: {value}");
                Ok(())
            } else {
                Err(unknown_key(&key).into())
            }
        }
        Commands::Unset { key } => {
            if config.unset_value(&key) {
                config.save_to_path(&config_path)?;
                println!("✅ Unset {key}");
                Ok(())
            } else {
                Err(unknown_key(&key).into())
            }
        }
    }
}

fn unknown_key(key: &str) -> String {
    format!(
        "Unknown config key: {key}. Valid keys: {}",
        SETTABLE_KEYS.join(", ")
    )
}
