pub mod cache;
pub mod headless;
pub mod loader;

pub use cache::AssetCache;
pub use headless::{HeadlessLoader, HeadlessModel};
pub use loader::ChampionLoader;

use crate::scenes::ChampionConfig;
use async_trait::async_trait;
use thiserror::Error;

/// A loaded champion model as seen from the viewer: something that can be
/// posed and advanced in time. Geometry and materials stay with the renderer.
pub trait AnimatedModel: Send + Sync {
    fn set_animation(&mut self, name: &str);
    fn set_default_animation(&mut self);
    fn update(&mut self, time: f32);
}

/// Everything needed to load one champion skin.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRequest {
    pub champion_key: String,
    pub skin_index: u32,
    pub enable_texture: bool,
    pub set_frame: Option<f32>,
    pub anim_name: Option<String>,
    /// Animation time units per elapsed second.
    pub animation_speed: f32,
}

impl ModelRequest {
    pub fn from_config(config: &ChampionConfig, enable_texture: bool) -> Self {
        Self {
            champion_key: config.champion_key.clone(),
            skin_index: config.skin_index,
            enable_texture,
            set_frame: config.set_frame,
            anim_name: config.anim_name.clone(),
            animation_speed: config.animation_speed,
        }
    }

    /// Animation time after `elapsed` seconds of playback. Untextured
    /// models stay on their first frame.
    pub fn frame_time(&self, elapsed: f32) -> Option<f32> {
        self.enable_texture.then(|| elapsed * self.animation_speed)
    }

    /// Identity of the request for caching. Requests with equal keys load
    /// the same model.
    pub fn key(&self) -> ModelKey {
        ModelKey {
            champion_key: self.champion_key.clone(),
            skin_index: self.skin_index,
            enable_texture: self.enable_texture,
            set_frame_bits: self.set_frame.map(f32::to_bits),
            anim_name: self.anim_name.clone(),
        }
    }

    pub fn label(&self) -> String {
        format!("champion {} skin {}", self.champion_key, self.skin_index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelKey {
    champion_key: String,
    skin_index: u32,
    enable_texture: bool,
    set_frame_bits: Option<u32>,
    anim_name: Option<String>,
}

/// Loads champion models for the renderer.
#[async_trait]
pub trait ModelLoader: Send + Sync {
    type Model: AnimatedModel;

    async fn load(&self, request: &ModelRequest) -> AssetResult<Self::Model>;
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Champion {champion_key} skin {skin_index} not found")]
    NotFound { champion_key: String, skin_index: u32 },
}

pub type AssetResult<T> = Result<T, AssetError>;
