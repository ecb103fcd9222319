//! Model loader for running without a renderer.
//!
//! Produces lightweight models that only track their pose, so the viewer
//! can walk scenes from the command line.

use super::{AnimatedModel, AssetError, AssetResult, ModelLoader, ModelRequest};
use async_trait::async_trait;

const DEFAULT_ANIMATION: &str = "idle1";

#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessModel {
    pub champion_key: String,
    pub skin_index: u32,
    pub animation: Option<String>,
    pub time: f32,
}

impl AnimatedModel for HeadlessModel {
    fn set_animation(&mut self, name: &str) {
        self.animation = Some(name.to_string());
    }

    fn set_default_animation(&mut self) {
        self.animation = Some(DEFAULT_ANIMATION.to_string());
    }

    fn update(&mut self, time: f32) {
        self.time = time;
    }
}

#[derive(Debug, Default, Clone)]
pub struct HeadlessLoader;

impl HeadlessLoader {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ModelLoader for HeadlessLoader {
    type Model = HeadlessModel;

    async fn load(&self, request: &ModelRequest) -> AssetResult<HeadlessModel> {
        // Champion keys are numeric ids
        if request.champion_key.is_empty() || !request.champion_key.chars().all(|c| c.is_ascii_digit()) {
            return Err(AssetError::NotFound {
                champion_key: request.champion_key.clone(),
                skin_index: request.skin_index,
            });
        }

        tokio::task::yield_now().await;

        Ok(HeadlessModel {
            champion_key: request.champion_key.clone(),
            skin_index: request.skin_index,
            animation: None,
            time: f32::NAN,
        })
    }
}
