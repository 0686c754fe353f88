use crate::access::{callback_allowed, message_allowed};
use crate::types::Command;
use crate::{callbacks, commands};
use teloxide::{dispatching::UpdateHandler, prelude::*, utils::command::BotCommands};

/// Register bot commands in Telegram menu
pub async fn set_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    bot.set_my_commands(Command::bot_commands()).await?;
    Ok(())
}

/// Update routing; expects `Services` and `AccessList` among the dependencies
pub fn schema() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    use dptree::case;

    let command_handler = teloxide::filter_command::<Command, _>()
        .branch(case![Command::Start].endpoint(commands::start))
        .branch(case![Command::Help].endpoint(commands::help))
        .branch(case![Command::Menu].endpoint(commands::menu))
        .branch(case![Command::Downloads].endpoint(commands::downloads))
        .branch(case![Command::Torrserver].endpoint(commands::torrserver));

    let search_handler = dptree::filter(|msg: Message| {
        msg.text().is_some_and(|text| !text.trim_start().starts_with('/'))
    })
    .endpoint(commands::search);

    let message_handler = Update::filter_message()
        .filter(message_allowed)
        .branch(command_handler)
        .branch(search_handler)
        .branch(dptree::endpoint(commands::invalid));

    let callback_handler = Update::filter_callback_query()
        .filter(callback_allowed)
        .endpoint(callbacks::handle_callback);

    dptree::entry()
        .branch(message_handler)
        .branch(callback_handler)
}
