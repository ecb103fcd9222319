//! Viewer session
//!
//! The session is the one owner of the clash navigator and the loading
//! aggregator for a running viewer. Asynchronous work (clash fetches, model
//! loads) reports back through a [`ViewerEvent`] queue that the session
//! drains on its own thread, so every state change happens in one place and
//! in order.
//!
//! ```ignore
//! let mut session = ViewerSession::new(source, SceneRegistry::builtin()?);
//! session.set_region("euw1");
//! session.settle().await;
//! println!("{:?}", session.current());
//! ```

pub mod events;

pub use events::{EventSender, ViewerEvent};

use crate::assets::{ChampionLoader, ModelLoader, ModelRequest};
use crate::clash::{Clash, ClashError, ClashId, ClashNavigator, ClashResult, ClashSource, FetchTicket, RemoteClashes};
use crate::loading::{LoadingAggregator, LoadingEdge, LoadingWatcher};
use crate::scenes::{SceneConfig, SceneRegistry};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{debug, error, info};

pub struct ViewerSession {
    navigator: ClashNavigator,
    loading: LoadingAggregator,
    remote: RemoteClashes,
    scenes: SceneRegistry,
    events_tx: EventSender,
    events_rx: UnboundedReceiver<ViewerEvent>,
}

impl ViewerSession {
    pub fn new(source: Arc<dyn ClashSource>, scenes: SceneRegistry) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            navigator: ClashNavigator::new(),
            loading: LoadingAggregator::new(),
            remote: RemoteClashes::new(source),
            scenes,
            events_tx: EventSender::new(tx),
            events_rx: rx,
        }
    }

    /// Handle for workers that report back to this session.
    pub fn events(&self) -> EventSender {
        self.events_tx.clone()
    }

    pub fn region(&self) -> Option<&str> {
        self.remote.region()
    }

    /// Switch region. A new fetch is started only when the region changes.
    /// Must be called within a Tokio runtime.
    pub fn set_region(&mut self, region: &str) {
        if let Some(ticket) = self.remote.request(region) {
            self.start_fetch(ticket);
        }
    }

    /// Fetch the current region again. Must be called within a Tokio runtime.
    pub fn refresh(&mut self) {
        if let Some(ticket) = self.remote.refresh() {
            self.start_fetch(ticket);
        }
    }

    fn start_fetch(&mut self, ticket: FetchTicket) {
        let generation = ticket.generation;
        self.apply(ViewerEvent::FetchStarted { generation });

        let events = self.events_tx.clone();
        let fetch = tokio::spawn(ticket.run());
        tokio::spawn(async move {
            // A panicking source must still end the fetch
            let event = match fetch.await {
                Ok(Ok(clashes)) => ViewerEvent::FetchCompleted { generation, clashes },
                Ok(Err(error)) => ViewerEvent::FetchFailed { generation, error },
                Err(e) => {
                    error!("❌ Clash fetch #{} aborted: {}", generation, e);
                    ViewerEvent::FetchFailed {
                        generation,
                        error: ClashError::Task(e.to_string()),
                    }
                }
            };
            events.send(event);
        });
    }

    /// Apply one event and report the loading edge it caused, if any.
    pub fn apply(&mut self, event: ViewerEvent) -> Option<LoadingEdge> {
        debug!("📨 Applying {:?}", EventKind(&event));
        match event {
            ViewerEvent::FetchStarted { generation } => {
                if generation == self.remote.generation() {
                    self.loading.set_remote_loading(true, &mut self.navigator);
                }
            }
            ViewerEvent::FetchCompleted { generation, clashes } => {
                self.finish_fetch(generation, Ok(clashes));
            }
            ViewerEvent::FetchFailed { generation, error } => {
                self.finish_fetch(generation, Err(error));
            }
            ViewerEvent::AssetLoadStarted => self.loading.increment(),
            ViewerEvent::AssetLoadFinished => self.loading.decrement(),
        }
        self.loading.observe(&mut self.navigator)
    }

    fn finish_fetch(&mut self, generation: u64, result: ClashResult<Vec<Clash>>) {
        if let Some(clashes) = self.remote.complete(generation, result) {
            self.navigator.set_collection(clashes);
            self.loading.set_remote_loading(false, &mut self.navigator);
        }
    }

    /// Apply every queued event without waiting. Returns how many were
    /// applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply(event);
            applied += 1;
        }
        self.loading.observe(&mut self.navigator);
        applied
    }

    /// Wait for the next event and apply it.
    pub async fn next_event(&mut self) -> Option<LoadingEdge> {
        // The session holds a sender itself, so the queue never closes.
        let event = self.events_rx.recv().await?;
        self.apply(event)
    }

    /// Apply events until nothing is loading any more. Waits forever if a
    /// load never reports back.
    pub async fn settle(&mut self) {
        self.pump();
        while self.is_loading() {
            self.next_event().await;
        }
        info!("✅ Session settled with {} clashes", self.navigator.clashes().len());
    }

    pub fn subscribe(&mut self, watcher: impl LoadingWatcher + 'static) {
        self.loading.subscribe(watcher);
    }

    // =========================================================================
    // Consumer surface
    // =========================================================================

    pub fn current(&self) -> Option<&Clash> {
        self.navigator.current()
    }

    pub fn clashes(&self) -> &[Clash] {
        self.navigator.clashes()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    pub fn loading(&self) -> &LoadingAggregator {
        &self.loading
    }

    pub fn next(&mut self) {
        self.navigator.next();
    }

    pub fn previous(&mut self) {
        self.navigator.previous();
    }

    pub fn select(&mut self, clash: Clash) {
        self.navigator.select(clash);
    }

    /// Select a clash of the current collection by id.
    pub fn select_by_id(&mut self, id: ClashId) -> ClashResult<()> {
        let clash = self
            .navigator
            .clashes()
            .iter()
            .find(|clash| clash.id == id)
            .cloned()
            .ok_or(ClashError::UnknownClash { id })?;
        self.navigator.select(clash);
        Ok(())
    }

    pub fn unselect(&mut self) {
        self.navigator.unselect();
    }

    pub fn select_nearest(&mut self) {
        self.navigator.select_nearest();
    }

    pub fn scene_key(&self) -> String {
        self.scenes.key_for(self.current())
    }

    pub fn scene(&self) -> &SceneConfig {
        self.scenes.scene_for(self.current())
    }

    /// Model requests for every champion of the current scene.
    pub fn scene_requests(&self, enable_texture: bool) -> Vec<ModelRequest> {
        self.scene()
            .champions
            .iter()
            .map(|champion| ModelRequest::from_config(champion, enable_texture))
            .collect()
    }

    /// A champion loader whose loads count towards this session's loading
    /// state.
    pub fn champion_loader<L: ModelLoader>(&self, loader: L, cache_capacity: usize) -> ChampionLoader<L, EventSender> {
        ChampionLoader::new(loader, self.events(), cache_capacity)
    }
}

impl std::fmt::Debug for ViewerSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewerSession")
            .field("remote", &self.remote)
            .field("loading", &self.loading)
            .field("current", &self.navigator.current().map(|clash| clash.id))
            .finish()
    }
}

/// Event summary for logs, without the clash payload.
struct EventKind<'a>(&'a ViewerEvent);

impl std::fmt::Debug for EventKind<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            ViewerEvent::FetchStarted { generation } => write!(f, "FetchStarted(#{})", generation),
            ViewerEvent::FetchCompleted { generation, clashes } => {
                write!(f, "FetchCompleted(#{}, {} clashes)", generation, clashes.len())
            }
            ViewerEvent::FetchFailed { generation, error } => write!(f, "FetchFailed(#{}, {})", generation, error),
            ViewerEvent::AssetLoadStarted => write!(f, "AssetLoadStarted"),
            ViewerEvent::AssetLoadFinished => write!(f, "AssetLoadFinished"),
        }
    }
}
