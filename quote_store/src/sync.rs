//! Periodic reconciliation with a remote quote source.
//!
//! The sync engine wires together three building blocks:
//!
//! - [`RemoteSource`] — an injected collaborator that fetches the remote
//!   quote list or pushes a single locally created quote (fire-and-forget).
//! - [`SyncEngine`] — runs one fetch/apply pass at a time and owns the
//!   explicit phase machine `Idle -> Fetching -> Applying -> Idle`. A pass
//!   that starts while another is in flight is skipped, never queued.
//! - [`StoreEvent`] — messages sent to the consumer driving a banner or
//!   notification surface whenever remote data lands.
//!
//! Conflict policy: the remote always wins. A successful fetch with a
//! non-empty result replaces the entire local sequence, including quotes
//! added locally since the last successful sync. There is no merge and no
//! timestamp comparison; this matches the observed last-fetch-wins contract
//! and is deliberately not "fixed" here. A fetch failure leaves local state
//! untouched and is retried only on the next scheduled tick.
//!
//! User-initiated operations are never blocked by an in-flight sync; they
//! mutate the store directly and may lose the race against a completing
//! fetch.

use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use chrono::Utc;
use crossbeam_channel::{Receiver, Sender, select, tick, unbounded};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::error::StoreError;
use crate::quote::Quote;
use crate::result::Result;
use crate::store::QuoteStore;

/// Category assigned to remote records that do not carry one.
pub const REMOTE_CATEGORY: &str = "Server";

/// Record shape served by the remote source; `title` carries the quote text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteQuote {
    /// Quote text, under the field name the remote endpoint uses.
    pub title: String,
    /// Optional category; [`REMOTE_CATEGORY`] is used when absent.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub category: Option<String>,
    /// Remote-side identifier, when provided.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<u64>,
}

impl From<RemoteQuote> for Quote {
    fn from(remote: RemoteQuote) -> Self {
        Quote {
            text: remote.title,
            category: remote
                .category
                .unwrap_or_else(|| REMOTE_CATEGORY.to_string()),
            author: None,
            id: remote.id,
            timestamp: Some(Utc::now().timestamp_millis() as u64),
        }
    }
}

/// Remote collaborator the engine reconciles against.
///
/// The engine never constructs its own transport; an implementation is
/// injected so the core stays testable without a network.
pub trait RemoteSource: Send + Sync {
    /// Fetch the full remote quote list.
    fn fetch(&self) -> Result<Vec<RemoteQuote>>;

    /// Send one locally created quote to the remote.
    ///
    /// Fire-and-forget: the response carries no meaning for local
    /// correctness and failures are only logged by callers.
    fn push(&self, quote: &Quote) -> Result<()>;
}

/// Message sent by the sync engine to its consumer.
#[derive(Debug, Clone)]
pub enum StoreEvent {
    /// Remote data replaced local data; carries a human-readable banner message.
    QuotesUpdated(String),
    /// The engine is stopping and no further events will arrive.
    Shutdown,
}

/// Where the engine currently is in its fetch/apply cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SyncPhase {
    /// No pass in progress.
    Idle,
    /// A remote fetch is outstanding.
    Fetching,
    /// A fetched list is being applied to the local store.
    Applying,
}

/// Result of one sync pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Remote data replaced local data; carries the new quote count.
    Applied(usize),
    /// The remote returned an empty list; local data was left alone.
    NoData,
    /// The fetch failed; local data is untouched until the next tick.
    Failed,
    /// Another pass was already in flight; this one did nothing.
    SkippedBusy,
}

/// Periodic sync driver over a shared [`QuoteStore`].
pub struct SyncEngine {
    store: Arc<Mutex<QuoteStore>>,
    remote: Arc<dyn RemoteSource>,
    phase: Mutex<SyncPhase>,
    events_tx: Sender<StoreEvent>,
}

impl SyncEngine {
    /// Create an engine reconciling `store` against `remote`.
    ///
    /// Returns the engine together with the receiver carrying its
    /// [`StoreEvent`] notifications.
    pub fn new(
        store: Arc<Mutex<QuoteStore>>,
        remote: Arc<dyn RemoteSource>,
    ) -> (Self, Receiver<StoreEvent>) {
        let (events_tx, events_rx) = unbounded();
        let engine = SyncEngine {
            store,
            remote,
            phase: Mutex::new(SyncPhase::Idle),
            events_tx,
        };
        (engine, events_rx)
    }

    /// The phase the engine is currently in.
    pub fn phase(&self) -> SyncPhase {
        match self.phase.lock() {
            Ok(phase) => *phase,
            Err(e) => {
                error!("Sync phase lock poisoned: {}", e);
                SyncPhase::Idle
            }
        }
    }

    fn set_phase(&self, next: SyncPhase) {
        match self.phase.lock() {
            Ok(mut phase) => *phase = next,
            Err(e) => error!("Sync phase lock poisoned: {}", e),
        }
    }

    /// Run one fetch/apply pass.
    ///
    /// A pass entered while another is still in flight is a no-op returning
    /// [`SyncOutcome::SkippedBusy`]; overlapping ticks are skipped, not
    /// queued.
    pub fn run_once(&self) -> SyncOutcome {
        {
            let mut phase = match self.phase.lock() {
                Ok(phase) => phase,
                Err(e) => {
                    error!("Sync phase lock poisoned: {}", e);
                    return SyncOutcome::Failed;
                }
            };
            if *phase != SyncPhase::Idle {
                info!("Sync tick skipped; a pass is already {}", *phase);
                return SyncOutcome::SkippedBusy;
            }
            *phase = SyncPhase::Fetching;
        }

        let outcome = self.fetch_and_apply();
        self.set_phase(SyncPhase::Idle);
        outcome
    }

    fn fetch_and_apply(&self) -> SyncOutcome {
        let fetched = match self.remote.fetch() {
            Ok(list) => list,
            Err(e) => {
                warn!("Remote fetch failed; keeping local quotes: {}", e);
                return SyncOutcome::Failed;
            }
        };
        if fetched.is_empty() {
            info!("Remote returned no quotes; keeping local data");
            return SyncOutcome::NoData;
        }

        self.set_phase(SyncPhase::Applying);
        let incoming: Vec<Quote> = fetched.into_iter().map(Quote::from).collect();
        let count = incoming.len();
        match self.store.lock() {
            Ok(mut store) => store.replace_all(incoming),
            Err(e) => {
                error!("Store lock poisoned; dropping fetched quotes: {}", e);
                return SyncOutcome::Failed;
            }
        }

        let message = format!("Quotes synced with server: {} quotes loaded.", count);
        info!("{}", message);
        let _ = self.events_tx.send(StoreEvent::QuotesUpdated(message));
        SyncOutcome::Applied(count)
    }

    /// Forward a locally created quote to the remote, fire-and-forget.
    pub fn push_quote(&self, quote: &Quote) {
        if let Err(e) = self.remote.push(quote) {
            warn!("Failed to push quote to remote: {}", e);
        }
    }

    /// Spawn the periodic sync thread, running one pass per `interval` tick.
    ///
    /// The returned handle is the one cancellable resource: [`SyncHandle::stop`]
    /// tears the timer down and broadcasts [`StoreEvent::Shutdown`] so
    /// consumers can terminate gracefully.
    pub fn start(self, interval: Duration) -> SyncHandle {
        let (stop_tx, stop_rx) = unbounded::<()>();
        let thread = thread::spawn(move || {
            let ticker = tick(interval);
            info!("Sync timer started with interval {:?}", interval);
            loop {
                select! {
                    recv(stop_rx) -> _ => break,
                    recv(ticker) -> _ => {
                        self.run_once();
                    }
                }
            }
            let _ = self.events_tx.send(StoreEvent::Shutdown);
            info!("Sync timer stopped");
        });
        SyncHandle { stop_tx, thread }
    }
}

/// Handle owning the periodic sync thread.
pub struct SyncHandle {
    stop_tx: Sender<()>,
    thread: JoinHandle<()>,
}

impl SyncHandle {
    /// Stop the timer and wait for the sync thread to finish.
    pub fn stop(self) -> Result<()> {
        self.stop_tx
            .send(())
            .map_err(|e| StoreError::ChannelSend(e.to_string()))?;
        self.thread
            .join()
            .map_err(|_| StoreError::ChannelRecv("sync thread panicked".to_string()))
    }
}

#[cfg(test)]
mod test {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::storage::{KeyValueStore, MemStore};

    use super::*;

    /// Scripted remote: counts fetch calls and serves a fixed response.
    struct ScriptedRemote {
        fetches: AtomicUsize,
        response: Result<Vec<RemoteQuote>, String>,
    }

    impl ScriptedRemote {
        fn serving(titles: &[&str]) -> Self {
            ScriptedRemote {
                fetches: AtomicUsize::new(0),
                response: Ok(titles
                    .iter()
                    .map(|t| RemoteQuote {
                        title: t.to_string(),
                        category: None,
                        id: None,
                    })
                    .collect()),
            }
        }

        fn failing(message: &str) -> Self {
            ScriptedRemote {
                fetches: AtomicUsize::new(0),
                response: Err(message.to_string()),
            }
        }

        fn fetch_count(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    impl RemoteSource for ScriptedRemote {
        fn fetch(&self) -> Result<Vec<RemoteQuote>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            match &self.response {
                Ok(list) => Ok(list.clone()),
                Err(message) => Err(StoreError::RemoteUnavailable(message.clone())),
            }
        }

        fn push(&self, _quote: &Quote) -> Result<()> {
            Ok(())
        }
    }

    /// Remote whose fetch blocks until the test releases it, to hold a pass
    /// in the Fetching phase.
    struct BlockingRemote {
        fetches: AtomicUsize,
        gate: Receiver<()>,
    }

    impl RemoteSource for BlockingRemote {
        fn fetch(&self) -> Result<Vec<RemoteQuote>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            let _ = self.gate.recv();
            Ok(vec![RemoteQuote {
                title: "late arrival".to_string(),
                category: None,
                id: None,
            }])
        }

        fn push(&self, _quote: &Quote) -> Result<()> {
            Ok(())
        }
    }

    fn shared_store() -> Arc<Mutex<QuoteStore>> {
        let durable = Arc::new(MemStore::new());
        durable.set(crate::storage::QUOTES_KEY, "[]").unwrap();
        Arc::new(Mutex::new(QuoteStore::open(
            durable,
            Arc::new(MemStore::new()),
        )))
    }

    #[test]
    fn remote_quote_maps_title_to_text_with_server_category() {
        let quote: Quote = RemoteQuote {
            title: "from afar".to_string(),
            category: None,
            id: Some(7),
        }
        .into();
        assert_eq!(quote.text, "from afar");
        assert_eq!(quote.category, REMOTE_CATEGORY);
        assert_eq!(quote.id, Some(7));
        assert!(quote.timestamp.is_some());
    }

    #[test]
    fn successful_sync_replaces_local_data_and_notifies() {
        let store = shared_store();
        store
            .lock()
            .unwrap()
            .add("added locally, never synced", "Mine", None)
            .unwrap();

        let remote = Arc::new(ScriptedRemote::serving(&["alpha", "beta"]));
        let (engine, events) = SyncEngine::new(store.clone(), remote);

        assert_eq!(engine.run_once(), SyncOutcome::Applied(2));

        // Last-fetch-wins: the local addition is gone.
        let store = store.lock().unwrap();
        assert_eq!(store.len(), 2);
        assert!(store.quotes().iter().all(|q| q.category == REMOTE_CATEGORY));

        match events.try_recv() {
            Ok(StoreEvent::QuotesUpdated(message)) => assert!(message.contains('2')),
            other => panic!("expected QuotesUpdated, got {:?}", other),
        }
    }

    #[test]
    fn failed_fetch_leaves_local_state_untouched() {
        let store = shared_store();
        store.lock().unwrap().add("survivor", "Mine", None).unwrap();

        let remote = Arc::new(ScriptedRemote::failing("connection refused"));
        let (engine, events) = SyncEngine::new(store.clone(), remote.clone());

        assert_eq!(engine.run_once(), SyncOutcome::Failed);
        assert_eq!(store.lock().unwrap().len(), 1);
        assert!(events.try_recv().is_err());

        // The next tick tries again rather than giving up.
        assert_eq!(engine.run_once(), SyncOutcome::Failed);
        assert_eq!(remote.fetch_count(), 2);
    }

    #[test]
    fn empty_remote_result_is_not_applied() {
        let store = shared_store();
        store.lock().unwrap().add("kept", "Mine", None).unwrap();

        let remote = Arc::new(ScriptedRemote::serving(&[]));
        let (engine, events) = SyncEngine::new(store.clone(), remote);

        assert_eq!(engine.run_once(), SyncOutcome::NoData);
        assert_eq!(store.lock().unwrap().len(), 1);
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn overlapping_passes_are_skipped_not_queued() {
        let (gate_tx, gate_rx) = unbounded();
        let remote = Arc::new(BlockingRemote {
            fetches: AtomicUsize::new(0),
            gate: gate_rx,
        });
        let (engine, _events) = SyncEngine::new(shared_store(), remote.clone());
        let engine = Arc::new(engine);

        let background = {
            let engine = engine.clone();
            thread::spawn(move || engine.run_once())
        };

        // Wait for the background pass to reach its fetch.
        while remote.fetches.load(Ordering::SeqCst) == 0 {
            thread::yield_now();
        }
        assert_eq!(engine.phase(), SyncPhase::Fetching);

        // The second pass must be a no-op: no extra fetch, nothing queued.
        assert_eq!(engine.run_once(), SyncOutcome::SkippedBusy);
        assert_eq!(remote.fetches.load(Ordering::SeqCst), 1);

        gate_tx.send(()).unwrap();
        assert_eq!(background.join().unwrap(), SyncOutcome::Applied(1));
        assert_eq!(engine.phase(), SyncPhase::Idle);
    }

    #[test]
    fn periodic_engine_stops_cleanly() {
        let remote = Arc::new(ScriptedRemote::serving(&["tick"]));
        let (engine, events) = SyncEngine::new(shared_store(), remote);

        let handle = engine.start(Duration::from_millis(10));
        // At least one tick lands before we stop.
        match events.recv_timeout(Duration::from_secs(5)) {
            Ok(StoreEvent::QuotesUpdated(_)) => {}
            other => panic!("expected QuotesUpdated, got {:?}", other),
        }
        handle.stop().unwrap();

        // Drain until the shutdown marker arrives.
        loop {
            match events.recv_timeout(Duration::from_secs(5)) {
                Ok(StoreEvent::Shutdown) => break,
                Ok(StoreEvent::QuotesUpdated(_)) => continue,
                Err(e) => panic!("missing shutdown event: {}", e),
            }
        }
    }
}
