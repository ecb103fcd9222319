//! Champion loading with loading-state bookkeeping.

use super::{AnimatedModel, AssetCache, AssetResult, ModelKey, ModelLoader, ModelRequest};
use crate::loading::{LoadGuard, LoadReporter};
use crate::scenes::SceneConfig;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub type SharedModel<M> = Arc<Mutex<M>>;

/// Wraps a [`ModelLoader`] so that every load is reported to the viewer's
/// loading state and finished models are posed and cached.
pub struct ChampionLoader<L: ModelLoader, R> {
    loader: Arc<L>,
    reporter: R,
    cache: Mutex<AssetCache<ModelKey, SharedModel<L::Model>>>,
}

impl<L, R> ChampionLoader<L, R>
where
    L: ModelLoader,
    R: LoadReporter + Clone,
{
    pub fn new(loader: L, reporter: R, cache_capacity: usize) -> Self {
        Self {
            loader: Arc::new(loader),
            reporter,
            cache: Mutex::new(AssetCache::new(cache_capacity)),
        }
    }

    /// Load one champion. Cached models are returned without touching the
    /// loading state.
    pub async fn load(&self, request: &ModelRequest) -> AssetResult<SharedModel<L::Model>> {
        let key = request.key();
        if let Some(model) = self.cache.lock().await.get(&key) {
            debug!("📋 {} found in cache", request.label());
            return Ok(Arc::clone(model));
        }

        let guard = LoadGuard::new(self.reporter.clone(), request.label());
        let mut model = self.loader.load(request).await.map_err(|e| {
            warn!("❌ Failed to load {}: {}", guard.label(), e);
            e
        })?;

        match &request.anim_name {
            Some(name) => model.set_animation(name),
            None => model.set_default_animation(),
        }
        model.update(0.0);

        let model = Arc::new(Mutex::new(model));
        self.cache.lock().await.insert(key, Arc::clone(&model));
        info!("🎨 Loaded {}", guard.label());
        Ok(model)
    }

    /// Load every champion of a scene, in order. A failed champion does not
    /// stop the others.
    pub async fn load_scene(
        &self,
        scene: &SceneConfig,
        enable_texture: bool,
    ) -> Vec<AssetResult<SharedModel<L::Model>>> {
        let mut models = Vec::with_capacity(scene.champions.len());
        for champion in &scene.champions {
            let request = ModelRequest::from_config(champion, enable_texture);
            models.push(self.load(&request).await);
        }
        models
    }

    /// Advance a cached model to `elapsed` seconds of playback. Returns the
    /// animation time it was moved to, or `None` when the model is not loaded
    /// or does not animate.
    pub async fn animate(&self, request: &ModelRequest, elapsed: f32) -> Option<f32> {
        let time = request.frame_time(elapsed)?;
        let model = self.cache.lock().await.get(&request.key()).map(Arc::clone)?;
        model.lock().await.update(time);
        Some(time)
    }

    pub async fn cached(&self) -> usize {
        self.cache.lock().await.len()
    }
}
