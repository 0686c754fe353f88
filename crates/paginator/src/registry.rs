//! Process-wide routing of taps to the active session of each prefix

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio_util::sync::CancellationToken;

use crate::delivery::{ChatRef, Delivery};
use crate::ordmap::OrderedMap;
use crate::paginator::Paginator;
use crate::semantics::DataSource;
use crate::session::{Session, SessionConfig, Tap};

/// Taps buffered per session before new ones are refused
const TAP_QUEUE: usize = 32;

#[derive(Debug, Clone)]
pub struct SessionHandle {
    id: u64,
    scope: String,
    taps: mpsc::Sender<Tap>,
    cancel: CancellationToken,
}

impl SessionHandle {
    pub fn new(id: u64, scope: impl Into<String>, taps: mpsc::Sender<Tap>, cancel: CancellationToken) -> Self {
        Self {
            id,
            scope: scope.into(),
            taps,
            cancel,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// The logical list this session shows; one session per scope is active
    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Whether the session task has stopped listening
    pub fn is_closed(&self) -> bool {
        self.taps.is_closed()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Handed to the session
    Routed,
    /// No session registered for this data
    Unrouted,
    /// A session matched but could not take the tap
    Dropped,
}

#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: Mutex<OrderedMap<String, SessionHandle>>,
    next_id: AtomicU64,
    next_prefix: AtomicU64,
}

impl SessionRegistry {
    /// Prefix nonces start from the clock so a restart does not reuse them
    pub fn new() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        Self::with_seed(seed)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            sessions: Mutex::default(),
            next_id: AtomicU64::new(0),
            next_prefix: AtomicU64::new(seed),
        }
    }

    /// A callback prefix no other session of this registry has used
    ///
    /// Buttons on a superseded message carry the old prefix, so their taps
    /// come back as [`Dispatch::Unrouted`] instead of reaching the new list.
    pub fn unique_prefix(&self, kind: &str) -> String {
        let nonce = self.next_prefix.fetch_add(1, Ordering::Relaxed);
        format!("{}{}:", kind, base36(nonce))
    }

    fn lock(&self) -> MutexGuard<'_, OrderedMap<String, SessionHandle>> {
        self.sessions.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Install `handle` for `prefix`
    ///
    /// Whatever session held the prefix or the handle's scope is cancelled
    /// and forgotten.
    pub fn register(&self, prefix: &str, handle: SessionHandle) {
        let mut sessions = self.lock();
        sessions.retain(|held, previous| {
            let superseded = held == prefix || previous.scope == handle.scope;
            if superseded {
                tracing::debug!("Superseding session {} for prefix {}", previous.id, held);
                previous.cancel();
            }
            !superseded
        });
        sessions.set(prefix.to_string(), handle);
    }

    /// Remove the registration if it still belongs to session `id`
    pub fn unregister(&self, prefix: &str, id: u64) -> bool {
        let mut sessions = self.lock();
        let owned = sessions.get(prefix).is_some_and(|handle| handle.id == id);
        if owned {
            sessions.remove(prefix);
        }
        owned
    }

    /// Start a session task for `paginator` and make it the active one of `scope`
    pub fn launch<S, D>(
        self: &Arc<Self>,
        scope: &str,
        paginator: Paginator<S>,
        delivery: Arc<D>,
        chat: ChatRef,
        config: SessionConfig,
    ) -> SessionHandle
    where
        S: DataSource,
        D: Delivery,
    {
        let (sender, receiver) = mpsc::channel(TAP_QUEUE);
        let cancel = CancellationToken::new();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let handle = SessionHandle::new(id, scope, sender, cancel.clone());

        let prefix = paginator.prefix().to_string();
        self.register(&prefix, handle.clone());
        tracing::info!("Launching session {} for prefix {} in chat {}", id, prefix, chat.0);

        let registry = Arc::clone(self);
        let session = Session::new(paginator, delivery, chat, config);
        tokio::spawn(async move {
            session.run(receiver, cancel).await;
            registry.unregister(&prefix, id);
            tracing::debug!("Session {} for prefix {} finished", id, prefix);
        });

        handle
    }

    /// Route raw callback data to the session with the longest matching prefix
    pub fn dispatch(&self, tap_id: &str, data: &str) -> Dispatch {
        let sessions = self.lock();
        let matched = sessions
            .iter()
            .filter(|(prefix, _)| data.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len());

        let Some((prefix, handle)) = matched else {
            return Dispatch::Unrouted;
        };

        let tap = Tap {
            id: tap_id.to_string(),
            payload: data[prefix.len()..].to_string(),
        };
        match handle.taps.try_send(tap) {
            Ok(()) => Dispatch::Routed,
            Err(TrySendError::Full(_)) => {
                tracing::warn!("Session {} for prefix {} is busy, dropping tap", handle.id, prefix);
                Dispatch::Dropped
            }
            Err(TrySendError::Closed(_)) => {
                tracing::debug!("Session {} for prefix {} already stopped", handle.id, prefix);
                Dispatch::Dropped
            }
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn is_registered(&self, prefix: &str) -> bool {
        self.lock().contains_key(prefix)
    }
}

fn base36(mut n: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut digits = Vec::new();
    loop {
        digits.push(DIGITS[(n % 36) as usize] as char);
        n /= 36;
        if n == 0 {
            break;
        }
    }
    digits.iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::testing::{settle, Call, RecordingDelivery, Row, Rows};

    fn rows() -> Vec<Row> {
        (0..6).map(|i| Row::new(&format!("r{}", i), "k", i)).collect()
    }

    fn paginator(prefix: &str, source: Arc<Rows>) -> Paginator<Rows> {
        Paginator::new(prefix, 4, source)
    }

    fn handle(id: u64) -> (SessionHandle, mpsc::Receiver<Tap>) {
        scoped(id, &format!("scope{}", id))
    }

    fn scoped(id: u64, scope: &str) -> (SessionHandle, mpsc::Receiver<Tap>) {
        let (sender, receiver) = mpsc::channel(4);
        (SessionHandle::new(id, scope, sender, CancellationToken::new()), receiver)
    }

    #[tokio::test]
    async fn test_dispatch_longest_prefix() {
        let registry = SessionRegistry::new();
        let (short, mut short_rx) = handle(1);
        let (long, mut long_rx) = handle(2);
        registry.register("f", short);
        registry.register("find", long);

        assert_eq!(registry.dispatch("q1", "find3"), Dispatch::Routed);
        assert_eq!(
            long_rx.recv().await,
            Some(Tap {
                id: "q1".into(),
                payload: "3".into()
            })
        );

        assert_eq!(registry.dispatch("q2", "fnext_page"), Dispatch::Routed);
        assert_eq!(short_rx.recv().await.map(|t| t.payload), Some("next_page".to_string()));

        assert_eq!(registry.dispatch("q3", "list1"), Dispatch::Unrouted);
    }

    #[tokio::test]
    async fn test_register_cancels_previous() {
        let registry = SessionRegistry::new();
        let (first, _first_rx) = handle(1);
        let (second, _second_rx) = handle(2);
        registry.register("list", first.clone());
        registry.register("list", second.clone());

        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
        assert_eq!(registry.len(), 1);

        // Stale unregister leaves the newer session alone
        assert!(!registry.unregister("list", 1));
        assert!(registry.is_registered("list"));
        assert!(registry.unregister("list", 2));
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_to_stopped_session() {
        let registry = SessionRegistry::new();
        let (stopped, receiver) = handle(1);
        registry.register("list", stopped);
        drop(receiver);
        assert_eq!(registry.dispatch("q", "list0"), Dispatch::Dropped);
    }

    #[tokio::test]
    async fn test_relaunch_supersedes_session() {
        let registry = Arc::new(SessionRegistry::new());
        let delivery = Arc::new(RecordingDelivery::default());
        let source = Arc::new(Rows::with(rows()));
        let config = SessionConfig {
            refresh_every: Some(Duration::from_secs(5)),
            ..SessionConfig::default()
        };

        let first = registry.launch(
            "list1",
            paginator("list", Arc::clone(&source)),
            Arc::clone(&delivery),
            ChatRef(1),
            config.clone(),
        );
        settle().await;
        let second = registry.launch(
            "list1",
            paginator("list", Arc::clone(&source)),
            Arc::clone(&delivery),
            ChatRef(1),
            config,
        );
        settle().await;

        assert!(first.is_cancelled());
        assert!(first.is_closed());
        assert!(!second.is_cancelled());
        assert!(!second.is_closed());
        assert_eq!(registry.len(), 1);
        assert!(registry.is_registered("list"));

        second.cancel();
        settle().await;
        assert!(second.is_closed());
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_tap_round_trip() {
        let registry = Arc::new(SessionRegistry::new());
        let delivery = Arc::new(RecordingDelivery::default());
        let source = Arc::new(Rows::with(rows()));

        registry.launch("list1", paginator("list", source), Arc::clone(&delivery), ChatRef(1), SessionConfig::default());
        settle().await;
        delivery.clear();

        assert_eq!(registry.dispatch("q", "listtoggle_filters"), Dispatch::Routed);
        settle().await;
        let calls = delivery.calls();
        assert_eq!(calls.len(), 2);
        assert!(matches!(calls[0], Call::EditKeyboard(_)));
        assert_eq!(calls[1], Call::Ack(None));
    }

    #[tokio::test(start_paused = true)]
    async fn test_periodic_refresh() {
        let registry = Arc::new(SessionRegistry::new());
        let delivery = Arc::new(RecordingDelivery::default());
        let source = Arc::new(Rows::with(rows()));
        let config = SessionConfig {
            refresh_every: Some(Duration::from_secs(5)),
            ..SessionConfig::default()
        };

        registry.launch("list1", paginator("list", Arc::clone(&source)), Arc::clone(&delivery), ChatRef(1), config);
        settle().await;
        assert_eq!(source.reloads.load(std::sync::atomic::Ordering::SeqCst), 1);

        *source.source.lock().unwrap() = (0..9).map(|i| Row::new(&format!("r{}", i), "k", i)).collect();
        tokio::time::sleep(Duration::from_secs(6)).await;
        settle().await;

        assert_eq!(source.reloads.load(std::sync::atomic::Ordering::SeqCst), 2);
        assert!(delivery
            .calls()
            .iter()
            .any(|c| matches!(c, Call::EditText(text) if text.contains("of 9"))));
    }

    #[tokio::test]
    async fn test_failed_show_unregisters() {
        let registry = Arc::new(SessionRegistry::new());
        let delivery = Arc::new(RecordingDelivery::default());
        let source = Arc::new(Rows::with(rows()));
        source.fail_reload.store(true, std::sync::atomic::Ordering::SeqCst);

        let handle = registry.launch("list1", paginator("list", source), delivery, ChatRef(1), SessionConfig::default());
        settle().await;
        assert!(handle.is_closed());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_unique_prefixes() {
        let registry = SessionRegistry::with_seed(35);
        assert_eq!(registry.unique_prefix("find"), "findz:");
        assert_eq!(registry.unique_prefix("find"), "find10:");
        assert_eq!(registry.unique_prefix("list"), "list11:");
        assert_eq!(base36(0), "0");
    }

    #[tokio::test]
    async fn test_new_session_in_scope_expires_old_buttons() {
        let registry = SessionRegistry::with_seed(0);
        let old_prefix = registry.unique_prefix("find");
        let new_prefix = registry.unique_prefix("find");
        let (old, _old_rx) = scoped(1, "find-100");
        let (new, mut new_rx) = scoped(2, "find-100");
        registry.register(&old_prefix, old.clone());
        registry.register(&new_prefix, new);

        assert!(old.is_cancelled());
        assert!(!registry.is_registered(&old_prefix));
        assert_eq!(registry.len(), 1);

        // A tap from the superseded message never reaches the new selection
        let stale = format!("{}#action__#delete", old_prefix);
        assert_eq!(registry.dispatch("q1", &stale), Dispatch::Unrouted);
        assert!(new_rx.try_recv().is_err());

        let fresh = format!("{}next_page", new_prefix);
        assert_eq!(registry.dispatch("q2", &fresh), Dispatch::Routed);
        assert_eq!(new_rx.recv().await.map(|t| t.payload), Some("next_page".to_string()));

        // Other scopes are left alone
        let (other, _other_rx) = scoped(3, "find-200");
        registry.register(&registry.unique_prefix("find"), other.clone());
        assert!(!other.is_cancelled());
        assert_eq!(registry.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_refresh_period_keeps_session_alive() {
        let registry = Arc::new(SessionRegistry::new());
        let delivery = Arc::new(RecordingDelivery::default());
        let source = Arc::new(Rows::with(rows()));
        let config = SessionConfig {
            refresh_every: Some(Duration::ZERO),
            ..SessionConfig::default()
        };

        let handle = registry.launch("list1", paginator("list", Arc::clone(&source)), Arc::clone(&delivery), ChatRef(1), config);
        settle().await;
        tokio::time::sleep(Duration::from_secs(60)).await;
        settle().await;

        assert!(!handle.is_closed());
        assert!(registry.is_registered("list"));
        assert_eq!(source.reloads.load(std::sync::atomic::Ordering::SeqCst), 1);
        assert_eq!(registry.dispatch("q", "listnext_page"), Dispatch::Routed);
    }
}
