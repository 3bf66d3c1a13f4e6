// Application state module
// Immutable state shared by every connection task

use super::types::Config;

/// Application state
pub struct AppState {
    pub config: Config,
}

impl AppState {
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Whether access logging is enabled (read on every request)
    pub const fn access_log_enabled(&self) -> bool {
        self.config.logging.access_log
    }
}
