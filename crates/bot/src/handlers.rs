//! Command handlers.

use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{debug, info};

use melodia_core::messenger::ChatId;

use crate::commands::{Command, HELP_TEXT, START_TEXT};
use crate::state::AppState;

/// Routes a parsed command to its handler.
pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    state: Arc<AppState>,
) -> ResponseResult<()> {
    let chat = ChatId(msg.chat.id.0);
    debug!(chat_id = %chat, command = ?cmd, "Received command");

    match cmd {
        Command::Start => {
            bot.send_message(msg.chat.id, START_TEXT).await?;
        }
        Command::Help => {
            bot.send_message(msg.chat.id, HELP_TEXT).await?;
        }
        Command::Musicas(query) => {
            let report = state.pipeline().run(chat, &query).await;
            info!(job_id = %report.job_id, success = report.is_success(), "Finished /musicas");
        }
        Command::Ia(prompt) => {
            let report = state.assistant().ask(chat, &prompt).await;
            info!(
                chat_id = %chat,
                success = report.outcome.is_ok(),
                messages_sent = report.messages_sent,
                "Finished /ia"
            );
        }
    }

    Ok(())
}
