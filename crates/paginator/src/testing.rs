//! In-memory collaborators for unit tests

use std::sync::atomic::{AtomicBool, AtomicI32, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::delivery::{ChatRef, Delivery, MessageRef};
use crate::error::{DeliveryError, SourceError};
use crate::render::Keyboard;
use crate::semantics::{ActionOutcome, DataSource, ItemSemantics};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub name: String,
    pub kind: String,
    pub size: u64,
}

impl Row {
    pub fn new(name: &str, kind: &str, size: u64) -> Self {
        Self {
            name: name.to_string(),
            kind: kind.to_string(),
            size,
        }
    }
}

#[derive(Default)]
pub struct Rows {
    pub source: Mutex<Vec<Row>>,
    pub fail_reload: AtomicBool,
    pub fail_actions: AtomicBool,
    pub reload_delay: Mutex<Option<Duration>>,
    pub reloads: AtomicUsize,
}

impl Rows {
    pub fn with(rows: Vec<Row>) -> Self {
        Self {
            source: Mutex::new(rows),
            ..Self::default()
        }
    }
}

#[async_trait]
impl ItemSemantics for Rows {
    type Item = Row;

    fn stringify(&self, item: &Row, attribute: &str) -> String {
        match attribute {
            "kind" => item.kind.clone(),
            "name" => item.name.clone(),
            _ => String::new(),
        }
    }

    fn less_than(&self, a: &Row, b: &Row, key: &str) -> bool {
        match key {
            "size" => a.size < b.size,
            "name" => a.name < b.name,
            _ => false,
        }
    }

    fn render_line(&self, item: &Row, selected: bool) -> String {
        if selected {
            format!("{} *", item.name)
        } else {
            item.name.clone()
        }
    }

    fn actions(&self, _item: &Row) -> Vec<String> {
        ["bump", "drop", "reload", "note"].iter().map(|a| a.to_string()).collect()
    }

    async fn execute(&self, item: &mut Row, action: &str) -> Result<ActionOutcome, SourceError> {
        if self.fail_actions.load(Ordering::SeqCst) {
            return Err(SourceError::backend("backend down"));
        }
        Ok(match action {
            "bump" => {
                item.size += 100;
                ActionOutcome::Keep
            }
            "drop" => ActionOutcome::Remove,
            "reload" => ActionOutcome::Reload,
            "note" => ActionOutcome::Reply(format!("note on {}", item.name)),
            _ => ActionOutcome::Deselect,
        })
    }

    fn footer(&self, visible: &[&Row]) -> Option<String> {
        Some(format!("total size: {}", visible.iter().map(|r| r.size).sum::<u64>()))
    }
}

#[async_trait]
impl DataSource for Rows {
    async fn reload(&self) -> Result<Vec<Row>, SourceError> {
        self.reloads.fetch_add(1, Ordering::SeqCst);
        let delay = *self.reload_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_reload.load(Ordering::SeqCst) {
            return Err(SourceError::backend("source unavailable"));
        }
        Ok(self.source.lock().unwrap().clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Send(String),
    EditText(String),
    EditKeyboard(Keyboard),
    Ack(Option<String>),
    Document(String),
}

#[derive(Default)]
pub struct RecordingDelivery {
    calls: Mutex<Vec<Call>>,
    pub fail_edits: AtomicBool,
    next_id: AtomicI32,
}

impl RecordingDelivery {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn edits(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::EditText(_) | Call::EditKeyboard(_)))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn edit_result(&self) -> Result<(), DeliveryError> {
        if self.fail_edits.load(Ordering::SeqCst) {
            Err(DeliveryError::Request("message can't be edited".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Delivery for RecordingDelivery {
    async fn send_message(&self, chat: ChatRef, text: &str, _keyboard: &Keyboard) -> Result<MessageRef, DeliveryError> {
        self.record(Call::Send(text.to_string()));
        Ok(MessageRef {
            chat,
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
        })
    }

    async fn edit_text(&self, _message: MessageRef, text: &str, _keyboard: &Keyboard) -> Result<(), DeliveryError> {
        self.record(Call::EditText(text.to_string()));
        self.edit_result()
    }

    async fn edit_keyboard(&self, _message: MessageRef, keyboard: &Keyboard) -> Result<(), DeliveryError> {
        self.record(Call::EditKeyboard(keyboard.clone()));
        self.edit_result()
    }

    async fn acknowledge(&self, _tap_id: &str, notice: Option<&str>) -> Result<(), DeliveryError> {
        self.record(Call::Ack(notice.map(str::to_string)));
        Ok(())
    }

    async fn send_document(&self, _chat: ChatRef, file_name: &str, _bytes: Vec<u8>) -> Result<(), DeliveryError> {
        self.record(Call::Document(file_name.to_string()));
        Ok(())
    }
}

/// Let spawned session tasks run until they block
pub async fn settle() {
    for _ in 0..64 {
        tokio::task::yield_now().await;
    }
}
