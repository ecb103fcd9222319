//! Remote clash sources
//!
//! Clash collections are fetched per region. [`RemoteClashes`] tracks the
//! last requested region and whether a fetch is in flight; the fetch itself
//! runs from a [`FetchTicket`] so it can be driven on any task.

use super::{Clash, ClashError, ClashResult};
use crate::config::ApiSettings;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

const TOURNAMENTS_PATH: &str = "/lol/clash/v1/tournaments";
const TOKEN_HEADER: &str = "X-Riot-Token";

#[async_trait]
pub trait ClashSource: Send + Sync {
    async fn fetch(&self, region: &str) -> ClashResult<Vec<Clash>>;
}

/// Fetches the active tournaments of a region over HTTP.
#[derive(Debug, Clone)]
pub struct HttpClashSource {
    http_client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpClashSource {
    pub fn new(api: &ApiSettings) -> ClashResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_millis(api.timeout_ms))
            .user_agent(concat!("clash-viewer/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClashError::Http(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: api.base_url.clone(),
            api_key: api.api_key.clone(),
        })
    }

    /// Tournament endpoint for a region. `{region}` in the base URL is
    /// substituted with the region name.
    pub fn endpoint(&self, region: &str) -> String {
        let base = self.base_url.replace("{region}", region);
        format!("{}{}", base.trim_end_matches('/'), TOURNAMENTS_PATH)
    }
}

#[async_trait]
impl ClashSource for HttpClashSource {
    async fn fetch(&self, region: &str) -> ClashResult<Vec<Clash>> {
        let url = self.endpoint(region);
        debug!("🌐 Requesting clashes: {}", url);

        let mut request = self.http_client.get(&url);
        if let Some(api_key) = &self.api_key {
            request = request.header(TOKEN_HEADER, api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ClashError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("❌ Clash request for {} failed: HTTP {}", region, status.as_u16());
            return Err(ClashError::HttpStatus(status.as_u16(), body));
        }

        let clashes: Vec<Clash> = response
            .json()
            .await
            .map_err(|e| ClashError::Parse(e.to_string()))?;

        info!("🌐 Fetched {} clashes for region {}", clashes.len(), region);
        Ok(clashes)
    }
}

/// In-memory source, used offline and in tests.
#[derive(Debug, Default)]
pub struct StaticClashSource {
    clashes: Vec<Clash>,
    by_region: HashMap<String, Vec<Clash>>,
    fetches: AtomicUsize,
}

impl StaticClashSource {
    pub fn new(clashes: Vec<Clash>) -> Self {
        Self {
            clashes,
            by_region: HashMap::new(),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Serve a dedicated collection for one region.
    pub fn with_region(mut self, region: impl Into<String>, clashes: Vec<Clash>) -> Self {
        self.by_region.insert(region.into(), clashes);
        self
    }

    /// Number of fetches served so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClashSource for StaticClashSource {
    async fn fetch(&self, region: &str) -> ClashResult<Vec<Clash>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .by_region
            .get(region)
            .unwrap_or(&self.clashes)
            .clone())
    }
}

/// A fetch that has been started but not yet run.
pub struct FetchTicket {
    pub generation: u64,
    pub region: String,
    source: Arc<dyn ClashSource>,
}

impl FetchTicket {
    pub async fn run(self) -> ClashResult<Vec<Clash>> {
        self.source.fetch(&self.region).await
    }
}

impl std::fmt::Debug for FetchTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchTicket")
            .field("generation", &self.generation)
            .field("region", &self.region)
            .finish()
    }
}

/// Output of the remote source: the latest collection plus a loading flag.
pub struct RemoteClashes {
    source: Arc<dyn ClashSource>,
    region: Option<String>,
    generation: u64,
    is_loading: bool,
    data: Arc<[Clash]>,
}

impl RemoteClashes {
    pub fn new(source: Arc<dyn ClashSource>) -> Self {
        Self {
            source,
            region: None,
            generation: 0,
            is_loading: false,
            data: Arc::from(Vec::<Clash>::new()),
        }
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start a fetch for `region` unless it is already the requested one.
    pub fn request(&mut self, region: &str) -> Option<FetchTicket> {
        if self.region.as_deref() == Some(region) {
            debug!("🌐 Region {} already requested", region);
            return None;
        }
        Some(self.begin(region.to_string()))
    }

    /// Fetch the current region again. No-op before any region was requested.
    pub fn refresh(&mut self) -> Option<FetchTicket> {
        let region = self.region.clone()?;
        Some(self.begin(region))
    }

    fn begin(&mut self, region: String) -> FetchTicket {
        self.generation += 1;
        self.is_loading = true;
        self.region = Some(region.clone());
        info!("🌐 Fetching clashes for region {} (fetch #{})", region, self.generation);

        FetchTicket {
            generation: self.generation,
            region,
            source: Arc::clone(&self.source),
        }
    }

    /// Record the outcome of a fetch. Returns the new collection, or `None`
    /// when the fetch was superseded by a later one. A failed fetch yields an
    /// empty collection.
    pub fn complete(&mut self, generation: u64, result: ClashResult<Vec<Clash>>) -> Option<Arc<[Clash]>> {
        if generation != self.generation {
            debug!(
                "🌐 Discarding result of fetch #{} (current is #{})",
                generation, self.generation
            );
            return None;
        }

        self.is_loading = false;
        self.data = match result {
            Ok(clashes) => Arc::from(clashes),
            Err(e) => {
                error!("❌ Clash fetch #{} failed: {}", generation, e);
                Arc::from(Vec::<Clash>::new())
            }
        };
        Some(Arc::clone(&self.data))
    }
}

impl std::fmt::Debug for RemoteClashes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteClashes")
            .field("region", &self.region)
            .field("generation", &self.generation)
            .field("is_loading", &self.is_loading)
            .field("clashes", &self.data.len())
            .finish()
    }
}
