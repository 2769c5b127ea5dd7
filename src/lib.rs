//! docchat is a line-oriented chat client for remote LLM APIs that lets a
//! user pull stored documents into a message with `@id` mentions and run
//! prompt templates with `/command` lines.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the document store, mention resolution, configuration and
//!   the per-connection [`core::session::ChatSession`].
//! - [`commands`] parses `/command` lines and holds the prompt templates.
//! - [`api`] defines the chat-completion payloads and the HTTP client.
//! - [`auth`] looks up API keys in the environment and the system keyring.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod api;
pub mod auth;
pub mod cli;
pub mod commands;
pub mod core;
pub mod utils;
