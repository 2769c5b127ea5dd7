//! Per-connection chat orchestration.
//!
//! A [`ChatSession`] turns one line of user input into at most one upstream
//! request. Commands are rendered or answered locally, `@id` mentions become
//! document context, and the conversation is resent in full on every call.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::api::{AssistantReply, ChatClient};
use crate::commands::{self, CommandRegistry, CommandResult, LocalCommand};
use crate::core::document::{Document, DocumentStore};
use crate::core::error::ChatError;
use crate::core::message::Message;
use crate::core::resolver::{compose_prompt, resolve_references, ResolvedContext};
use crate::utils::logging::LoggingState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    AwaitingInput,
    Dispatching,
    AwaitingResponse,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// The upstream API answered. `warnings` lists non-fatal problems such as
    /// unknown `@id` mentions.
    Reply {
        reply: AssistantReply,
        warnings: Vec<String>,
    },
    /// A local command's output; nothing was sent upstream.
    Local(String),
}

pub struct ChatSession {
    client: Arc<dyn ChatClient>,
    store: Arc<dyn DocumentStore>,
    commands: Arc<CommandRegistry>,
    turns: Vec<Message>,
    state: SessionState,
    logging: LoggingState,
    unreported_warnings: Vec<String>,
}

impl ChatSession {
    pub fn new(
        client: Arc<dyn ChatClient>,
        store: Arc<dyn DocumentStore>,
        commands: Arc<CommandRegistry>,
        logging: LoggingState,
    ) -> Self {
        Self {
            client,
            store,
            commands,
            turns: Vec::new(),
            state: SessionState::Idle,
            logging,
            unreported_warnings: Vec::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The conversation so far, oldest first.
    pub fn turns(&self) -> &[Message] {
        &self.turns
    }

    pub fn logging_status(&self) -> String {
        self.logging.get_status_string()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Warnings raised by the last turn whose request then failed. A
    /// successful turn returns its warnings in [`TurnOutcome::Reply`].
    pub fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.unreported_warnings)
    }

    /// Marks the session as waiting for the next line of input.
    pub fn await_input(&mut self) {
        if self.state == SessionState::Idle {
            self.set_state(SessionState::AwaitingInput);
        }
    }

    fn set_state(&mut self, next: SessionState) {
        debug!(from = ?self.state, to = ?next, "Session state");
        self.state = next;
    }

    /// Processes one line of input, from either `Idle` or `AwaitingInput`.
    /// The session is back in [`SessionState::Idle`] when this returns,
    /// whatever the outcome. A dropped future leaves the state where the
    /// turn stopped.
    pub async fn handle_input(&mut self, input: &str) -> Result<TurnOutcome, ChatError> {
        self.unreported_warnings.clear();
        self.set_state(SessionState::Dispatching);
        let outcome = self.dispatch(input).await;
        self.set_state(SessionState::Idle);
        outcome
    }

    async fn dispatch(&mut self, input: &str) -> Result<TurnOutcome, ChatError> {
        if input.trim().is_empty() {
            return Err(ChatError::validation("Message is empty."));
        }

        match commands::process_input(&self.commands, input)? {
            CommandResult::ProcessAsMessage(text) => {
                let context = resolve_references(self.store.as_ref(), &text);
                let warnings = context.missing_warning().into_iter().collect();
                let prompt = compose_prompt(&text, &context);
                self.submit(prompt, warnings).await
            }
            CommandResult::Prompt {
                name,
                text,
                document_id,
            } => {
                info!(command = %name, document = ?document_id, "Running prompt command");
                let prompt = match document_id {
                    Some(id) => self.attach_document(text, &id)?,
                    None => text,
                };
                self.submit(prompt, Vec::new()).await
            }
            CommandResult::Local { command, args } => {
                self.run_local(command, &args).map(TurnOutcome::Local)
            }
        }
    }

    // No tool loop exists through which the model could fetch the document,
    // so its content travels with the rendered prompt.
    fn attach_document(&self, prompt: String, id: &str) -> Result<String, ChatError> {
        let content = self.store.get(id)?;
        let context = ResolvedContext {
            documents: vec![Document::new(id, content)],
            missing: Vec::new(),
        };
        Ok(format!("{prompt}\n{}", context.render()))
    }

    async fn submit(
        &mut self,
        text: String,
        warnings: Vec<String>,
    ) -> Result<TurnOutcome, ChatError> {
        let history_len = self.turns.len();
        let user_turn = Message::user(text);
        self.log_turn(&user_turn);
        self.turns.push(user_turn);

        self.set_state(SessionState::AwaitingResponse);
        debug!(history_len, "Submitting turn");
        let (history, pending) = self.turns.split_at(history_len);
        let result = self.client.send(history, &pending[0].content).await;

        match result {
            Ok(reply) => {
                let assistant_turn = Message::assistant(reply.text.clone());
                self.log_turn(&assistant_turn);
                self.turns.push(assistant_turn);
                Ok(TurnOutcome::Reply { reply, warnings })
            }
            Err(err) => {
                warn!(error = %err, "Upstream request failed; keeping user turn");
                self.unreported_warnings = warnings;
                Err(err)
            }
        }
    }

    fn run_local(&mut self, command: LocalCommand, args: &str) -> Result<String, ChatError> {
        match command {
            LocalCommand::Help => Ok(self.commands.help_text()),
            LocalCommand::Docs => {
                let ids = self.store.list();
                if ids.is_empty() {
                    Ok("No documents available.".to_string())
                } else {
                    Ok(format!(
                        "Documents:\n{}",
                        ids.iter()
                            .map(|id| format!("  @{id}"))
                            .collect::<Vec<_>>()
                            .join("\n")
                    ))
                }
            }
            LocalCommand::Clear => {
                self.clear();
                Ok("Conversation cleared.".to_string())
            }
            LocalCommand::Log => {
                let result = if args.is_empty() {
                    self.logging.toggle_logging()
                } else {
                    self.logging.set_log_file(args.to_string())
                };
                result.map_err(|e| ChatError::validation(format!("Log error: {e}")))
            }
        }
    }

    fn log_turn(&self, message: &Message) {
        if let Err(e) = self.logging.log_turn(message) {
            warn!(error = %e, "Failed to write transcript log");
        }
    }
}
