use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ViewerError;

/// Viewer settings, loadable from a JSON file and overridable by the CLI.
///
/// Every field has a default so `{}` is a valid config file. Unknown keys are
/// rejected to catch typos early.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    /// Fragment shader file to watch and render.
    pub shader: PathBuf,
    /// Initial window size in logical pixels.
    pub width: u32,
    pub height: u32,
    pub title: String,
    /// Request a swap interval of 1 on the surface (best-effort).
    pub vsync: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            shader: PathBuf::from("default.frag"),
            width: 640,
            height: 480,
            title: "fraglive".to_string(),
            vsync: true,
        }
    }
}

/// Loads a [`ViewerConfig`] from a JSON file.
pub fn load_viewer_config_from(path: &Path) -> Result<ViewerConfig, ViewerError> {
    let bytes = fs::read(path).map_err(|source| ViewerError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let cfg: ViewerConfig = serde_json::from_slice(&bytes).map_err(|source| ViewerError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    if cfg.width == 0 || cfg.height == 0 {
        return Err(ViewerError::InvalidConfig {
            path: path.to_path_buf(),
            msg: "width and height must be non-zero".to_string(),
        });
    }

    Ok(cfg)
}
