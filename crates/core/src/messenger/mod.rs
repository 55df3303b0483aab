//! Chat delivery abstraction.
//!
//! The pipeline and the assistant talk to the chat platform only through the
//! `Messenger` trait; the Telegram implementation lives in the bot crate.

mod traits;
mod types;

pub use traits::Messenger;
pub use types::{split_message, ChatId, MessageHandle, MessengerError, OutgoingAudio, MAX_MESSAGE_CHARS};
