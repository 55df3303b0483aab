//! Bot commands and their static texts.

use teloxide::utils::command::BotCommands;

/// Commands understood by the bot.
#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "Comandos disponíveis:")]
pub enum Command {
    #[command(description = "Iniciar o bot")]
    Start,
    #[command(description = "Mostrar ajuda")]
    Help,
    #[command(description = "Baixar música do YouTube")]
    Musicas(String),
    #[command(description = "Perguntar algo à IA")]
    Ia(String),
}

pub const START_TEXT: &str = "🎵 Olá! Eu sou o Music Bot!\n\n\
     Use o comando /musicas seguido do nome da música que você deseja baixar.\n\n\
     Exemplo: /musicas Imagine Dragons - Believer\n\n\
     Também posso responder perguntas com /ia.";

pub const HELP_TEXT: &str = "🎵 Music Bot - Ajuda\n\n\
     Comandos disponíveis:\n\
     /start - Iniciar o bot\n\
     /musicas <nome> - Baixar música do YouTube\n\
     /ia <pergunta> - Perguntar algo à IA\n\
     /help - Mostrar esta mensagem\n\n\
     Exemplo de uso:\n\
     /musicas Imagine Dragons - Believer\n\
     /musicas The Weeknd Blinding Lights";
