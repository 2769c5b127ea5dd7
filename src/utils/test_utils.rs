use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::api::{AssistantReply, ChatClient};
use crate::commands::CommandRegistry;
use crate::core::document::{Document, InMemoryDocumentStore};
use crate::core::error::ChatError;
use crate::core::message::Message;
use crate::core::session::ChatSession;
use crate::utils::logging::LoggingState;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub history: Vec<Message>,
    pub new_text: String,
}

/// A [`ChatClient`] that answers from a script and records every call.
#[derive(Default)]
pub struct ScriptedClient {
    responses: Mutex<VecDeque<Result<AssistantReply, String>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedClient {
    pub fn replying<I, S>(replies: I) -> Arc<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let client = Self::default();
        {
            let mut responses = client.responses.lock().unwrap();
            for reply in replies {
                responses.push_back(Ok(AssistantReply::text(reply)));
            }
        }
        Arc::new(client)
    }

    pub fn failing(message: &str) -> Arc<Self> {
        let client = Self::default();
        client
            .responses
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        Arc::new(client)
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatClient for ScriptedClient {
    async fn send(&self, history: &[Message], new_text: &str) -> Result<AssistantReply, ChatError> {
        self.calls.lock().unwrap().push(RecordedCall {
            history: history.to_vec(),
            new_text: new_text.to_string(),
        });
        match self.responses.lock().unwrap().pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(message)) => Err(ChatError::upstream(message)),
            None => Err(ChatError::upstream("script exhausted")),
        }
    }
}

pub fn create_test_store() -> InMemoryDocumentStore {
    InMemoryDocumentStore::from_documents([
        Document::new("doc1", "Contents of doc one."),
        Document::new("notes.txt", "Meeting notes."),
    ])
}

pub fn create_test_session(client: Arc<ScriptedClient>) -> ChatSession {
    ChatSession::new(
        client,
        Arc::new(create_test_store()),
        Arc::new(CommandRegistry::builtin()),
        LoggingState::new(None).unwrap(),
    )
}
