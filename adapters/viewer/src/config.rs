//! Window and playback settings loaded from an optional TOML manifest.

use std::fs;
use std::path::Path;

use anyhow::Context;

/// Settings that shape the spectator window and playback cadence.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default)]
pub(crate) struct ViewerConfig {
    /// Title for the spectator window.
    pub(crate) window_title: String,
    /// Initial window width in pixels.
    pub(crate) window_width: i32,
    /// Initial window height in pixels.
    pub(crate) window_height: i32,
    /// Upper bound on the rendered size of one board cell, in pixels.
    pub(crate) cell_size: f32,
    /// Seconds to linger on each turn while autoplay is on.
    pub(crate) autoplay_delay: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window_title: "Grimhold".to_owned(),
            window_width: 1024,
            window_height: 768,
            cell_size: 50.0,
            autoplay_delay: 0.5,
        }
    }
}

impl ViewerConfig {
    /// Reads settings from `path`, or falls back to the defaults when no
    /// manifest was named on the command line.
    pub(crate) fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading viewer settings at {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("parsing viewer settings at {}", path.display()))
    }
}
