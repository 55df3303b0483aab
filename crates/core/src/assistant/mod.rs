//! Free-text question answering through an LLM.
//!
//! Each `/ia` request is a single-turn completion with a fixed system
//! instruction; nothing is remembered between calls.

mod config;
mod error;
mod messages;
mod service;

pub use config::AssistantConfig;
pub use error::AssistantError;
pub use service::{AskReport, Assistant};
