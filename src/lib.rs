// Clash Viewer: browse clash tournaments in themed champion scenes
// Selection, navigation and loading state for the viewer front end

pub mod assets;
pub mod clash;
pub mod config;
pub mod loading;
pub mod scenes;
pub mod session;
pub mod utils;

// Re-export commonly used types for convenience
pub use clash::{Clash, ClashError, ClashId, ClashNavigator, Schedule};
pub use config::ViewerSettings;
pub use loading::{LoadingAggregator, LoadingEdge};
pub use scenes::{SceneConfig, SceneRegistry};
pub use session::{ViewerEvent, ViewerSession};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
