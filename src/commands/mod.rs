//! Slash-command parsing and dispatch.
//!
//! A line whose first non-blank character is `/` is a command: the first
//! token names it and the rest of the line is one raw argument string.

mod registry;
mod templates;

#[cfg(test)]
mod tests;

pub use registry::{Command, CommandInvocation, CommandKind, CommandRegistry, LocalCommand};
pub use templates::{CustomTemplate, PromptTemplate, ARG_PLACEHOLDER};

use crate::core::error::ChatError;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Not a command; send the input as a regular message.
    ProcessAsMessage(String),
    /// A rendered prompt that replaces the user's text for this turn.
    Prompt {
        name: String,
        text: String,
        /// The argument, when the template treats it as a document id.
        document_id: Option<String>,
    },
    /// A command the session answers locally.
    Local { command: LocalCommand, args: String },
}

/// Splits `/name rest` into its parts. Returns `Ok(None)` for input that is
/// not a command.
pub fn parse_invocation(input: &str) -> Result<Option<CommandInvocation<'_>>, ChatError> {
    let trimmed = input.trim();
    let Some(body) = trimmed.strip_prefix('/') else {
        return Ok(None);
    };

    let (name, args) = match body.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (body, ""),
    };
    if name.is_empty() {
        return Err(ChatError::validation(
            "Missing command name after '/'. Type /help for available commands.",
        ));
    }

    Ok(Some(CommandInvocation {
        input: trimmed,
        name,
        args,
    }))
}

pub fn process_input(registry: &CommandRegistry, input: &str) -> Result<CommandResult, ChatError> {
    let Some(invocation) = parse_invocation(input)? else {
        return Ok(CommandResult::ProcessAsMessage(input.to_string()));
    };

    let Some(command) = registry.find(invocation.name) else {
        let suggestions = registry
            .matching(invocation.name)
            .into_iter()
            .map(|command| command.name.clone())
            .collect();
        return Err(ChatError::UnknownCommand {
            name: invocation.name.to_string(),
            suggestions,
        });
    };
    debug!(command = %command.name, args = %invocation.args, "Dispatching command");

    match &command.kind {
        CommandKind::Local(local) => Ok(CommandResult::Local {
            command: *local,
            args: invocation.args.to_string(),
        }),
        CommandKind::Prompt(template) => {
            let (arg, document_id) = if template.takes_document() {
                let id = strip_mention(invocation.args);
                (id, Some(id.to_string()))
            } else {
                (invocation.args, None)
            };
            let text = template.render(&command.name, arg)?;
            Ok(CommandResult::Prompt {
                name: command.name.clone(),
                text,
                document_id,
            })
        }
    }
}

/// `/summarize @plan.md` and `/summarize plan.md` name the same document.
fn strip_mention(arg: &str) -> &str {
    arg.strip_prefix('@').unwrap_or(arg)
}
