use anyhow::{Context, Result};
use tracing::warn;

use crate::store::KvStore;

pub const THEME_KEY: &str = "fantasy-football-theme";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Theme::Dark),
            "light" => Some(Theme::Light),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

/// Stored theme, or the default when nothing valid is stored.
pub fn load_theme(store: &impl KvStore) -> Theme {
    match store.get(THEME_KEY) {
        Ok(Some(raw)) => Theme::parse(&raw).unwrap_or_default(),
        Ok(None) => Theme::default(),
        Err(err) => {
            warn!(error = %err, "theme preference read failed");
            Theme::default()
        }
    }
}

pub fn save_theme(store: &impl KvStore, theme: Theme) -> Result<()> {
    store
        .set(THEME_KEY, theme.as_str())
        .context("save theme preference")
}
