use async_trait::async_trait;

use crate::error::DeliveryError;
use crate::render::Keyboard;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChatRef(pub i64);

/// A message previously sent through a [`Delivery`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageRef {
    pub chat: ChatRef,
    pub id: i32,
}

/// Outbound side of the chat channel
#[async_trait]
pub trait Delivery: Send + Sync + 'static {
    async fn send_message(
        &self,
        chat: ChatRef,
        text: &str,
        keyboard: &Keyboard,
    ) -> Result<MessageRef, DeliveryError>;

    async fn edit_text(
        &self,
        message: MessageRef,
        text: &str,
        keyboard: &Keyboard,
    ) -> Result<(), DeliveryError>;

    async fn edit_keyboard(&self, message: MessageRef, keyboard: &Keyboard) -> Result<(), DeliveryError>;

    /// Answer a tap, optionally with a short notice shown to the user
    async fn acknowledge(&self, tap_id: &str, notice: Option<&str>) -> Result<(), DeliveryError>;

    async fn send_document(
        &self,
        chat: ChatRef,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<(), DeliveryError>;
}
