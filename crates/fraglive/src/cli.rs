use std::path::PathBuf;

use clap::Parser;

use fraglive_core::{load_viewer_config_from, ViewerConfig, ViewerError};

/// Live-coding fragment shader viewer.
///
/// Renders SHADER to a full-screen quad and recompiles it in place every time
/// the file is saved; a broken save keeps the previous program on screen.
#[derive(Debug, Parser)]
#[command(name = "fraglive", version)]
pub struct Cli {
    /// Fragment shader file to watch.
    pub shader: Option<PathBuf>,

    /// JSON config file; flags win over it.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Initial window width in pixels.
    #[arg(long)]
    pub width: Option<u32>,

    /// Initial window height in pixels.
    #[arg(long)]
    pub height: Option<u32>,

    /// Window title.
    #[arg(long)]
    pub title: Option<String>,

    /// Skip the swap-interval request and render unthrottled.
    #[arg(long)]
    pub no_vsync: bool,
}

impl Cli {
    /// Resolves the effective config: defaults, then the config file, then
    /// the flags.
    pub fn resolve(self) -> Result<ViewerConfig, ViewerError> {
        let mut cfg = match &self.config {
            Some(path) => load_viewer_config_from(path)?,
            None => ViewerConfig::default(),
        };

        if let Some(shader) = self.shader {
            cfg.shader = shader;
        }
        if let Some(width) = self.width {
            cfg.width = width;
        }
        if let Some(height) = self.height {
            cfg.height = height;
        }
        if let Some(title) = self.title {
            cfg.title = title;
        }
        if self.no_vsync {
            cfg.vsync = false;
        }

        Ok(cfg)
    }
}
