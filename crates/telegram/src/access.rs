//! User allow-list applied before any handler runs

use std::collections::HashSet;
use std::sync::Arc;

use teloxide::types::{CallbackQuery, Message};

/// Users permitted to talk to the bot; an empty list lets everyone in
#[derive(Debug, Clone, Default)]
pub struct AccessList {
    users: Arc<HashSet<u64>>,
}

impl AccessList {
    pub fn new(users: impl IntoIterator<Item = u64>) -> Self {
        Self {
            users: Arc::new(users.into_iter().collect()),
        }
    }

    pub fn allows(&self, user_id: u64) -> bool {
        self.users.is_empty() || self.users.contains(&user_id)
    }
}

/// dptree filter for incoming messages
pub fn message_allowed(msg: Message, access: AccessList) -> bool {
    let Some(user) = msg.from() else {
        return false;
    };
    let allowed = access.allows(user.id.0);
    if !allowed {
        tracing::info!(
            "Ignoring {} ({}): {}",
            user.id,
            user.username.as_deref().unwrap_or("-"),
            msg.text().unwrap_or("")
        );
    }
    allowed
}

/// dptree filter for button taps
pub fn callback_allowed(q: CallbackQuery, access: AccessList) -> bool {
    let allowed = access.allows(q.from.id.0);
    if !allowed {
        tracing::info!("Ignoring callback from {}", q.from.id);
    }
    allowed
}
