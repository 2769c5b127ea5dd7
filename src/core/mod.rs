pub mod app;
pub mod builtins;
pub mod config;
pub mod document;
pub mod error;
pub mod message;
pub mod resolver;
pub mod session;
