//! One shown list and the task that keeps it up to date

use std::future::pending;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::delivery::{ChatRef, Delivery, MessageRef};
use crate::error::SourceError;
use crate::paginator::{Paginator, Step};
use crate::protocol::Command;
use crate::render::{Edit, Keyboard, Snapshot};
use crate::semantics::{ActionOutcome, DataSource};

pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Reload period; `None` or zero disables the background refresh
    pub refresh_every: Option<Duration>,
    /// Upper bound for every reload and item action
    pub call_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            refresh_every: None,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }
}

/// A button press routed to a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tap {
    /// Identifier used to acknowledge the tap
    pub id: String,
    /// Callback data with the session prefix stripped
    pub payload: String,
}

pub struct Session<S: DataSource, D: Delivery> {
    paginator: Paginator<S>,
    delivery: Arc<D>,
    chat: ChatRef,
    message: Option<MessageRef>,
    shown: Snapshot,
    config: SessionConfig,
}

impl<S: DataSource, D: Delivery> Session<S, D> {
    pub fn new(paginator: Paginator<S>, delivery: Arc<D>, chat: ChatRef, config: SessionConfig) -> Self {
        Self {
            paginator,
            delivery,
            chat,
            message: None,
            shown: Snapshot::default(),
            config,
        }
    }

    pub fn paginator(&self) -> &Paginator<S> {
        &self.paginator
    }

    pub fn message(&self) -> Option<MessageRef> {
        self.message
    }

    /// Load the items and send the list message
    ///
    /// When the data source fails, the error is posted instead of the list.
    pub async fn show(&mut self) -> Result<(), SourceError> {
        let items = match self.fetch_items().await {
            Ok(items) => items,
            Err(e) => {
                tracing::error!("[{}] Failed to load list: {}", self.paginator.prefix(), e);
                let empty: Keyboard = Vec::new();
                if let Err(e) = self.delivery.send_message(self.chat, &format!("❌ {}", e), &empty).await {
                    tracing::warn!("[{}] Failed to report load error: {}", self.paginator.prefix(), e);
                }
                return Err(e);
            }
        };

        self.paginator.load(items);
        self.refresh_view().await;
        tracing::info!(
            "[{}] Shown {} items in chat {}",
            self.paginator.prefix(),
            self.paginator.len(),
            self.chat.0
        );
        Ok(())
    }

    /// Apply one tap, re-render and acknowledge it
    pub async fn handle_tap(&mut self, tap: Tap) {
        let notice = match Command::decode(&tap.payload) {
            Ok(command) => match self.paginator.apply(command) {
                Step::Changed | Step::Ignored => None,
                Step::Execute { position, action } => match self.execute(position, &action).await {
                    Ok(()) => None,
                    Err(e) => {
                        tracing::warn!("[{}] Action {} failed: {}", self.paginator.prefix(), action, e);
                        Some(format!("❌ {}", e))
                    }
                },
            },
            Err(e) => {
                tracing::warn!("[{}] Ignoring tap: {}", self.paginator.prefix(), e);
                None
            }
        };

        self.refresh_view().await;

        if let Err(e) = self.delivery.acknowledge(&tap.id, notice.as_deref()).await {
            tracing::warn!("[{}] Failed to acknowledge tap: {}", self.paginator.prefix(), e);
        }
    }

    /// Periodic reload; failures keep the current state
    pub async fn tick(&mut self) {
        match self.fetch_items().await {
            Ok(items) => {
                self.paginator.load(items);
                self.refresh_view().await;
            }
            Err(e) => tracing::warn!("[{}] Refresh failed: {}", self.paginator.prefix(), e),
        }
    }

    /// Bring the shown message in line with the current state
    ///
    /// The snapshot only advances when the delivery call succeeds, so a
    /// failed edit is retried by the next render.
    pub async fn refresh_view(&mut self) {
        let next = self.paginator.render();

        let Some(message) = self.message else {
            match self.delivery.send_message(self.chat, &next.text, &next.keyboard).await {
                Ok(message) => {
                    self.message = Some(message);
                    self.shown = next;
                }
                Err(e) => tracing::warn!("[{}] Failed to send list: {}", self.paginator.prefix(), e),
            }
            return;
        };

        let result = match self.shown.diff(&next) {
            Edit::None => return,
            Edit::Text => self.delivery.edit_text(message, &next.text, &next.keyboard).await,
            Edit::KeyboardOnly => self.delivery.edit_keyboard(message, &next.keyboard).await,
        };

        match result {
            Ok(()) => self.shown = next,
            Err(e) => tracing::warn!("[{}] Failed to update list: {}", self.paginator.prefix(), e),
        }
    }

    /// Serve taps and refresh ticks until cancelled or the tap channel closes
    pub async fn run(mut self, mut taps: mpsc::Receiver<Tap>, cancel: CancellationToken) {
        let prefix = self.paginator.prefix().to_string();

        let shown = tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            shown = self.show() => shown,
        };
        if shown.is_err() {
            return;
        }

        // A zero period would make the interval panic; treat it as no refresh
        let mut ticker = self.config.refresh_every.filter(|p| !p.is_zero()).map(|period| {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker
        });

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::debug!("[{}] Session superseded", prefix);
                    break;
                }
                tap = taps.recv() => match tap {
                    Some(tap) => self.handle_tap(tap).await,
                    None => break,
                },
                _ = next_tick(&mut ticker) => self.tick().await,
            }
        }
    }

    async fn execute(&mut self, position: usize, action: &str) -> Result<(), SourceError> {
        let semantics = Arc::clone(self.paginator.semantics());
        let limit = self.config.call_timeout;
        let Some(item) = self.paginator.item_at_mut(position) else {
            return Ok(());
        };

        let outcome = tokio::time::timeout(limit, semantics.execute(item, action))
            .await
            .map_err(|_| SourceError::Timeout(limit))??;
        tracing::debug!("[{}] Action {} on item {}: {:?}", self.paginator.prefix(), action, position, outcome);

        match outcome {
            ActionOutcome::Keep => {}
            ActionOutcome::Deselect => self.paginator.deselect(),
            ActionOutcome::Remove => {
                self.paginator.remove(position);
            }
            ActionOutcome::Reload => {
                self.paginator.deselect();
                let items = self
                    .fetch_items()
                    .await
                    .map_err(|e| SourceError::Refresh(Box::new(e)))?;
                self.paginator.load(items);
            }
            ActionOutcome::Reply(text) => {
                let empty: Keyboard = Vec::new();
                if let Err(e) = self.delivery.send_message(self.chat, &text, &empty).await {
                    tracing::warn!("[{}] Failed to send reply: {}", self.paginator.prefix(), e);
                }
            }
            ActionOutcome::Document { file_name, bytes } => {
                if let Err(e) = self.delivery.send_document(self.chat, &file_name, bytes).await {
                    tracing::warn!("[{}] Failed to send {}: {}", self.paginator.prefix(), file_name, e);
                }
            }
        }
        Ok(())
    }

    async fn fetch_items(&self) -> Result<Vec<S::Item>, SourceError> {
        let limit = self.config.call_timeout;
        tokio::time::timeout(limit, self.paginator.semantics().reload())
            .await
            .map_err(|_| SourceError::Timeout(limit))?
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => pending::<()>().await,
    }
}
