//! Loading state aggregation
//!
//! Two independent sources feed the viewer's single "is anything loading"
//! signal: the remote clash fetch and a counter of in-flight asset loads.
//! [`LoadingAggregator`] merges them and reacts to edges of the merged
//! signal.

pub mod guard;

pub use guard::{LoadGuard, LoadReporter};

use crate::clash::ClashNavigator;
use tracing::{debug, info, warn};

/// Number of asset loads currently in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadingCounter {
    in_flight: usize,
}

impl LoadingCounter {
    pub fn increment(&mut self) {
        self.in_flight += 1;
    }

    /// Decrement, clamped at zero. An unmatched decrement is reported and
    /// otherwise ignored.
    pub fn decrement(&mut self) {
        match self.in_flight.checked_sub(1) {
            Some(in_flight) => self.in_flight = in_flight,
            None => warn!("⚠️ Asset load finished without a matching start; counter stays at 0"),
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn is_active(&self) -> bool {
        self.in_flight > 0
    }
}

/// Edge of the merged loading signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingEdge {
    /// Nothing was loading and something started.
    Started,
    /// Everything that was loading has finished.
    Settled,
}

/// Notified on every edge of the merged loading signal.
pub trait LoadingWatcher: Send {
    fn on_edge(&mut self, edge: LoadingEdge);
}

impl<F> LoadingWatcher for F
where
    F: FnMut(LoadingEdge) + Send,
{
    fn on_edge(&mut self, edge: LoadingEdge) {
        self(edge)
    }
}

/// Merges the remote fetch flag with the asset counter.
///
/// Edges are detected against the last observed value. Before the first
/// observation the signal counts as loading, so a viewer that starts idle
/// settles once.
pub struct LoadingAggregator {
    counter: LoadingCounter,
    remote_loading: bool,
    last_seen: Option<bool>,
    watchers: Vec<Box<dyn LoadingWatcher>>,
}

impl LoadingAggregator {
    pub fn new() -> Self {
        Self {
            counter: LoadingCounter::default(),
            remote_loading: false,
            last_seen: None,
            watchers: Vec::new(),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.counter.is_active() || self.remote_loading
    }

    pub fn counter(&self) -> LoadingCounter {
        self.counter
    }

    pub fn remote_loading(&self) -> bool {
        self.remote_loading
    }

    pub fn increment(&mut self) {
        self.counter.increment();
        debug!("⏳ Asset load started ({} in flight)", self.counter.in_flight());
    }

    pub fn decrement(&mut self) {
        self.counter.decrement();
        debug!("⏳ Asset load finished ({} in flight)", self.counter.in_flight());
    }

    /// Update the remote fetch flag. When a fetch starts the selection is
    /// cleared so stale data is never shown as selected during a refetch.
    pub fn set_remote_loading(&mut self, loading: bool, navigator: &mut ClashNavigator) {
        let started = loading && !self.remote_loading;
        self.remote_loading = loading;
        if started {
            debug!("⏳ Remote fetch started; clearing selection");
            navigator.unselect();
        }
    }

    pub fn subscribe(&mut self, watcher: impl LoadingWatcher + 'static) {
        self.watchers.push(Box::new(watcher));
    }

    /// Compare the merged signal with its last observed value. On a
    /// settle edge the nearest clash is selected; watchers see every edge.
    pub fn observe(&mut self, navigator: &mut ClashNavigator) -> Option<LoadingEdge> {
        let now = self.is_loading();
        let before = self.last_seen.unwrap_or(true);
        self.last_seen = Some(now);

        let edge = match (before, now) {
            (true, false) => LoadingEdge::Settled,
            (false, true) => LoadingEdge::Started,
            _ => return None,
        };

        match edge {
            LoadingEdge::Settled => {
                info!("✅ Loading settled; selecting nearest clash");
                navigator.select_nearest();
            }
            LoadingEdge::Started => info!("⏳ Loading started"),
        }

        for watcher in self.watchers.iter_mut() {
            watcher.on_edge(edge);
        }
        Some(edge)
    }
}

impl Default for LoadingAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LoadingAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadingAggregator")
            .field("counter", &self.counter)
            .field("remote_loading", &self.remote_loading)
            .field("last_seen", &self.last_seen)
            .field("watchers", &self.watchers.len())
            .finish()
    }
}
