use super::templates::{CustomTemplate, PromptTemplate};
use crate::core::config::data::CommandConfig;
use crate::core::config::io::ConfigError;

/// Commands answered by the session itself, without an API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalCommand {
    Help,
    Docs,
    Clear,
    Log,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandKind {
    Prompt(PromptTemplate),
    Local(LocalCommand),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub name: String,
    pub help: String,
    pub kind: CommandKind,
}

#[derive(Clone, Copy, Debug)]
pub struct CommandInvocation<'a> {
    pub input: &'a str,
    pub name: &'a str,
    pub args: &'a str,
}

impl Command {
    fn builtin(name: &str, help: &str, kind: CommandKind) -> Self {
        Self {
            name: name.to_string(),
            help: help.to_string(),
            kind,
        }
    }

    pub fn usage(&self) -> String {
        match &self.kind {
            CommandKind::Prompt(template) => template.usage(&self.name),
            CommandKind::Local(LocalCommand::Log) => format!("/{} [filename]", self.name),
            CommandKind::Local(_) => format!("/{}", self.name),
        }
    }
}

/// Name → command lookup. Loaded once at startup and read-only afterwards.
#[derive(Debug, Clone)]
pub struct CommandRegistry {
    commands: Vec<Command>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CommandRegistry {
    pub fn builtin() -> Self {
        Self {
            commands: vec![
                Command::builtin(
                    "help",
                    "Show available commands and usage information.",
                    CommandKind::Local(LocalCommand::Help),
                ),
                Command::builtin(
                    "docs",
                    "List the documents that can be mentioned with @id.",
                    CommandKind::Local(LocalCommand::Docs),
                ),
                Command::builtin(
                    "clear",
                    "Forget the conversation so far.",
                    CommandKind::Local(LocalCommand::Clear),
                ),
                Command::builtin(
                    "log",
                    "Toggle transcript logging or set the log file path.",
                    CommandKind::Local(LocalCommand::Log),
                ),
                Command::builtin(
                    "format",
                    "Rewrite a document in markdown.",
                    CommandKind::Prompt(PromptTemplate::Format),
                ),
                Command::builtin(
                    "summarize",
                    "Summarize a document.",
                    CommandKind::Prompt(PromptTemplate::Summarize),
                ),
            ],
        }
    }

    /// Built-in commands plus the user-defined templates from configuration.
    pub fn with_custom(custom: &[CommandConfig]) -> Result<Self, ConfigError> {
        let mut registry = Self::builtin();
        for entry in custom {
            registry.register_custom(entry)?;
        }
        Ok(registry)
    }

    fn register_custom(&mut self, entry: &CommandConfig) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidCommand {
            name: entry.name.clone(),
            reason,
        };

        let name = entry.name.trim();
        if name.is_empty() || name.chars().any(char::is_whitespace) || name.starts_with('/') {
            return Err(invalid(
                "command names must be a single word without a leading '/'".to_string(),
            ));
        }
        if self.find(name).is_some() {
            return Err(invalid("a command with this name already exists".to_string()));
        }

        let template = CustomTemplate::parse(&entry.template).map_err(invalid)?;
        self.commands.push(Command {
            name: name.to_string(),
            help: entry
                .help
                .clone()
                .unwrap_or_else(|| format!("Run the '{name}' prompt template.")),
            kind: CommandKind::Prompt(PromptTemplate::Custom(template)),
        });
        Ok(())
    }

    pub fn find(&self, name: &str) -> Option<&Command> {
        self.commands
            .iter()
            .find(|command| command.name.eq_ignore_ascii_case(name))
    }

    /// Commands whose name starts with `prefix`, case-insensitively.
    pub fn matching(&self, prefix: &str) -> Vec<&Command> {
        let prefix = prefix.to_ascii_lowercase();
        self.commands
            .iter()
            .filter(|command| command.name.to_ascii_lowercase().starts_with(&prefix))
            .collect()
    }

    pub fn help_text(&self) -> String {
        let mut help = String::from("Commands:\n");
        for command in &self.commands {
            help.push_str(&format!("  {:<24} {}\n", command.usage(), command.help));
        }
        help.push_str("\nMention a document anywhere in a message with @id to include it as context.");
        help
    }
}
