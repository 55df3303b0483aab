//! Types for the messenger module.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Longest text a single Telegram message may carry, in characters.
pub const MAX_MESSAGE_CHARS: usize = 4096;

/// Identifier of a chat on the messaging platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatId(pub i64);

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to a message that was sent and may be edited or deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageHandle {
    pub chat_id: ChatId,
    pub message_id: i32,
}

/// An audio upload with the metadata shown by the client.
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingAudio {
    /// File to upload.
    pub path: PathBuf,
    /// Track title.
    pub title: String,
    /// Performer shown under the title.
    pub performer: String,
    /// Duration in seconds.
    pub duration_secs: u32,
    /// Caption attached to the message.
    pub caption: String,
}

/// Errors returned by the messaging platform.
#[derive(Debug, Error)]
pub enum MessengerError {
    /// The platform rejected or failed the request.
    #[error("Request failed: {0}")]
    Request(String),

    /// The file to upload could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Splits `text` into pieces of at most `max_chars` characters.
///
/// Prefers to break after a newline, then after a space, and never splits a
/// UTF-8 character.
pub fn split_message(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut rest = text;

    while rest.chars().count() > max_chars {
        let hard_end = rest
            .char_indices()
            .nth(max_chars)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let window = &rest[..hard_end];

        let cut = window
            .rfind('\n')
            .or_else(|| window.rfind(' '))
            .map(|i| i + 1)
            .unwrap_or(hard_end);

        chunks.push(rest[..cut].trim_end().to_string());
        rest = &rest[cut..];
    }

    if !rest.is_empty() || chunks.is_empty() {
        chunks.push(rest.to_string());
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_short_message_is_untouched() {
        assert_eq!(split_message("Brasília", MAX_MESSAGE_CHARS), vec!["Brasília"]);
    }

    #[test]
    fn test_split_empty_message_yields_one_chunk() {
        assert_eq!(split_message("", 10), vec![""]);
    }

    #[test]
    fn test_split_prefers_newlines() {
        let chunks = split_message("first line\nsecond line", 15);
        assert_eq!(chunks, vec!["first line", "second line"]);
    }

    #[test]
    fn test_split_falls_back_to_spaces() {
        let chunks = split_message("aaaa bbbb cccc", 10);
        assert_eq!(chunks, vec!["aaaa bbbb", "cccc"]);
    }

    #[test]
    fn test_split_respects_char_boundaries() {
        let text = "ééééééééééé";
        let chunks = split_message(text, 4);
        assert_eq!(chunks, vec!["éééé", "éééé", "ééé"]);
        assert!(chunks.iter().all(|c| c.chars().count() <= 4));
    }
}
