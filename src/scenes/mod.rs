//! Scene layouts
//!
//! Each clash theme is shown in its own scene: a set of champions with a
//! fixed placement and animation. Layouts are static configuration parsed
//! from the embedded `scenes.toml`.

use crate::clash::Clash;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

const BUILTIN_SCENES: &str = include_str!("scenes.toml");

/// Scene shown while nothing is selected.
pub const HOME_SCENE: &str = "0";
/// Scene shown for themes without a dedicated layout.
pub const FALLBACK_SCENE: &str = "oops";

const DEFAULT_ANIMATION_SPEED: f32 = 700.0;

fn default_animation_speed() -> f32 {
    DEFAULT_ANIMATION_SPEED
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChampionConfig {
    pub champion_key: String,
    pub skin_index: u32,
    pub position: Vec3,
    pub rotation: Vec3,
    /// Freeze the animation at this frame instead of playing it.
    #[serde(default)]
    pub set_frame: Option<f32>,
    #[serde(default)]
    pub anim_name: Option<String>,
    #[serde(default = "default_animation_speed")]
    pub animation_speed: f32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SceneConfig {
    pub champions: Vec<ChampionConfig>,
    #[serde(default)]
    pub reset_camera: bool,
    #[serde(default)]
    pub disable_rotation: bool,
}

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("Failed to parse scene table: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Scene table has no '{0}' scene")]
    MissingScene(String),
}

pub type SceneResult<T> = Result<T, SceneError>;

#[derive(Debug, Deserialize)]
struct SceneTable {
    scenes: HashMap<String, SceneConfig>,
}

/// Scene layouts keyed by theme id.
#[derive(Debug, Clone)]
pub struct SceneRegistry {
    scenes: HashMap<String, SceneConfig>,
}

impl SceneRegistry {
    /// The layouts shipped with the viewer.
    pub fn builtin() -> SceneResult<Self> {
        Self::from_toml(BUILTIN_SCENES)
    }

    /// Parse a scene table. The home and fallback scenes are required.
    pub fn from_toml(source: &str) -> SceneResult<Self> {
        let table: SceneTable = toml::from_str(source)?;
        for required in [HOME_SCENE, FALLBACK_SCENE] {
            if !table.scenes.contains_key(required) {
                return Err(SceneError::MissingScene(required.to_string()));
            }
        }
        debug!("🎬 Loaded {} scenes", table.scenes.len());
        Ok(Self { scenes: table.scenes })
    }

    pub fn get(&self, key: &str) -> Option<&SceneConfig> {
        self.scenes.get(key)
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SceneConfig)> {
        self.scenes.iter().map(|(key, scene)| (key.as_str(), scene))
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Key of the scene shown for a selection.
    pub fn key_for(&self, selection: Option<&Clash>) -> String {
        match selection {
            None => HOME_SCENE.to_string(),
            Some(clash) => {
                let key = clash.theme_id.to_string();
                if self.scenes.contains_key(&key) {
                    key
                } else {
                    FALLBACK_SCENE.to_string()
                }
            }
        }
    }

    pub fn scene_for(&self, selection: Option<&Clash>) -> &SceneConfig {
        let key = self.key_for(selection);
        // from_toml guarantees the home and fallback scenes
        &self.scenes[&key]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clash::fixtures::clash;

    #[test]
    fn test_builtin_scenes_parse() {
        let registry = SceneRegistry::builtin().unwrap();
        assert_eq!(registry.len(), 4);

        let home = registry.get(HOME_SCENE).unwrap();
        assert_eq!(home.champions.len(), 1);
        assert_eq!(home.champions[0].champion_key, "32");
        assert_eq!(home.champions[0].position, Vec3::new(0.0, 0.0, -50.0));
        assert_eq!(home.champions[0].animation_speed, DEFAULT_ANIMATION_SPEED);

        let duo = registry.get("2").unwrap();
        assert_eq!(duo.champions.len(), 2);
        assert_eq!(duo.champions[1].anim_name.as_deref(), Some("idle1"));
        assert!(duo.champions[1].set_frame.is_some());

        let oops = registry.get(FALLBACK_SCENE).unwrap();
        assert!(oops.reset_camera);
        assert!(oops.disable_rotation);
        assert_eq!(oops.champions[0].animation_speed, 1000.0);
    }

    #[test]
    fn test_scene_for_selection() {
        let registry = SceneRegistry::builtin().unwrap();

        assert_eq!(registry.key_for(None), HOME_SCENE);

        let mut themed = clash(1, &[1]);
        themed.theme_id = 2;
        assert_eq!(registry.key_for(Some(&themed)), "2");
        assert_eq!(registry.scene_for(Some(&themed)).champions.len(), 2);

        themed.theme_id = 99;
        assert_eq!(registry.key_for(Some(&themed)), FALLBACK_SCENE);
    }

    #[test]
    fn test_missing_required_scene() {
        let result = SceneRegistry::from_toml(
            r#"
            [scenes."0"]
            champions = []
            "#,
        );
        assert!(matches!(result, Err(SceneError::MissingScene(key)) if key == FALLBACK_SCENE));
    }
}
