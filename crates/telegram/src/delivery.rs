//! Telegram implementation of the list delivery channel

use async_trait::async_trait;
use paginator::{ChatRef, Delivery, DeliveryError, Keyboard, MessageRef};
use teloxide::prelude::*;
use teloxide::types::{InputFile, MessageId, ParseMode};
use teloxide::{ApiError, RequestError};

use crate::keyboards::inline_markup;

/// Sends and edits list messages through the Bot API
#[derive(Clone)]
pub struct TelegramDelivery {
    bot: Bot,
}

impl TelegramDelivery {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

fn delivery_error(err: RequestError) -> DeliveryError {
    DeliveryError::Request(err.to_string())
}

/// Telegram refuses edits that change nothing; for us that is success
fn ignore_not_modified(result: Result<Message, RequestError>) -> Result<(), DeliveryError> {
    match result {
        Ok(_) | Err(RequestError::Api(ApiError::MessageNotModified)) => Ok(()),
        Err(e) => Err(delivery_error(e)),
    }
}

#[async_trait]
impl Delivery for TelegramDelivery {
    async fn send_message(
        &self,
        chat: ChatRef,
        text: &str,
        keyboard: &Keyboard,
    ) -> Result<MessageRef, DeliveryError> {
        let mut request = self
            .bot
            .send_message(ChatId(chat.0), text)
            .parse_mode(ParseMode::Html);
        if !keyboard.is_empty() {
            request = request.reply_markup(inline_markup(keyboard));
        }
        let sent = request.await.map_err(delivery_error)?;
        Ok(MessageRef { chat, id: sent.id.0 })
    }

    async fn edit_text(
        &self,
        message: MessageRef,
        text: &str,
        keyboard: &Keyboard,
    ) -> Result<(), DeliveryError> {
        let result = self
            .bot
            .edit_message_text(ChatId(message.chat.0), MessageId(message.id), text)
            .parse_mode(ParseMode::Html)
            .reply_markup(inline_markup(keyboard))
            .await;
        ignore_not_modified(result)
    }

    async fn edit_keyboard(&self, message: MessageRef, keyboard: &Keyboard) -> Result<(), DeliveryError> {
        let result = self
            .bot
            .edit_message_reply_markup(ChatId(message.chat.0), MessageId(message.id))
            .reply_markup(inline_markup(keyboard))
            .await;
        ignore_not_modified(result)
    }

    async fn acknowledge(&self, tap_id: &str, notice: Option<&str>) -> Result<(), DeliveryError> {
        let mut request = self.bot.answer_callback_query(tap_id);
        if let Some(notice) = notice {
            request = request.text(notice);
        }
        request.await.map_err(delivery_error)?;
        Ok(())
    }

    async fn send_document(
        &self,
        chat: ChatRef,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<(), DeliveryError> {
        self.bot
            .send_document(ChatId(chat.0), InputFile::memory(bytes).file_name(file_name.to_string()))
            .await
            .map_err(delivery_error)?;
        Ok(())
    }
}
