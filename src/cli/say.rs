//! One-shot "say" command

use std::error::Error;

use crate::auth::AuthManager;
use crate::cli::chat_loop::{print_outcome, print_warnings};
use crate::core::app::{self, AppInitConfig};
use crate::core::config::Config;

pub async fn run_say(
    prompt: Vec<String>,
    init: AppInitConfig,
    config: &Config,
) -> Result<(), Box<dyn Error>> {
    let prompt = prompt.join(" ");
    if prompt.trim().is_empty() {
        return Err("Usage: docchat say <prompt>".into());
    }

    let auth_manager = AuthManager::new();
    let app = app::new_with_auth(init, config, &auth_manager)?;
    let mut session = app.new_session()?;

    let mut out = std::io::stdout();
    match session.handle_input(&prompt).await {
        Ok(outcome) => {
            print_outcome(&mut out, &outcome)?;
            Ok(())
        }
        Err(err) => {
            print_warnings(&mut out, &session.take_warnings())?;
            Err(err.into())
        }
    }
}
