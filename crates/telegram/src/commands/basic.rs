//! Basic bot commands (start, help, menu)

use crate::types::{Command, HandlerResult};
use teloxide::{prelude::*, utils::command::BotCommands};

/// Welcome message when user starts the bot
pub async fn start(bot: Bot, msg: Message) -> HandlerResult {
    let welcome_text = "👋 Welcome!\n\n\
        I search torrent indexers and manage your downloads.\n\n\
        🎯 Quick Actions:\n\
        • send any text - search for it\n\
        • /downloads - qBittorrent downloads\n\
        • /torrserver - TorrServer playlist\n\
        • /help - See all commands";

    bot.send_message(msg.chat.id, welcome_text)
        .reply_markup(crate::keyboards::main_menu_keyboard())
        .await?;
    Ok(())
}

pub async fn send_help(bot: &Bot, chat_id: ChatId) -> Result<(), teloxide::RequestError> {
    bot.send_message(chat_id, Command::descriptions().to_string())
        .await?;
    Ok(())
}

/// Display help message with available commands
pub async fn help(bot: Bot, msg: Message) -> HandlerResult {
    send_help(&bot, msg.chat.id).await?;
    Ok(())
}

/// Show interactive menu
pub async fn menu(bot: Bot, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, "🤖 Main Menu - Choose an action:")
        .reply_markup(crate::keyboards::main_menu_keyboard())
        .await?;
    Ok(())
}

/// Anything that is neither a command nor a search query
pub async fn invalid(bot: Bot, msg: Message) -> HandlerResult {
    bot.send_message(
        msg.chat.id,
        "Unable to handle the message. Type /help to see the usage.",
    )
    .await?;
    Ok(())
}
