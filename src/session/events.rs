use crate::clash::{Clash, ClashError};
use crate::loading::LoadReporter;
use tokio::sync::mpsc::UnboundedSender;
use tracing::trace;

/// State updates produced by asynchronous work. They are queued and applied
/// one at a time by the session, never from the worker itself.
#[derive(Debug)]
pub enum ViewerEvent {
    FetchStarted { generation: u64 },
    FetchCompleted { generation: u64, clashes: Vec<Clash> },
    FetchFailed { generation: u64, error: ClashError },
    AssetLoadStarted,
    AssetLoadFinished,
}

/// Cloneable handle for posting events to a session.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: UnboundedSender<ViewerEvent>,
}

impl EventSender {
    pub(crate) fn new(tx: UnboundedSender<ViewerEvent>) -> Self {
        Self { tx }
    }

    pub fn send(&self, event: ViewerEvent) {
        if let Err(e) = self.tx.send(event) {
            trace!("session gone, dropping event {:?}", e.0);
        }
    }
}

impl LoadReporter for EventSender {
    fn load_started(&self) {
        self.send(ViewerEvent::AssetLoadStarted);
    }

    fn load_finished(&self) {
        self.send(ViewerEvent::AssetLoadFinished);
    }
}
