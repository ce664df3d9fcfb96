pub mod settings;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::app::messages::Language;

/// Pause between lines used when nothing else is configured.
pub const DEFAULT_LINE_DELAY_MS: u64 = 10;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Language used for progress and error messages.
    pub language: Language,
    /// Pacing delay after each line, in milliseconds. Zero disables it.
    pub line_delay_ms: u64,
    pub last_output_directory: Option<PathBuf>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        settings::load_config(None)
    }

    pub fn line_delay(&self) -> Duration {
        Duration::from_millis(self.line_delay_ms)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            language: Language::default(),
            line_delay_ms: DEFAULT_LINE_DELAY_MS,
            last_output_directory: None,
        }
    }
}
