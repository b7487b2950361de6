//! Web application state

use crate::config::Settings;

/// Service identity reported by the health endpoint
#[derive(Debug, Clone)]
pub struct AppState {
    pub app_name: String,
    pub app_version: String,
}

impl AppState {
    pub fn new(app_name: impl Into<String>, app_version: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            app_version: app_version.into(),
        }
    }
}

impl From<&Settings> for AppState {
    fn from(settings: &Settings) -> Self {
        Self::new(settings.app_name.clone(), settings.app_version.clone())
    }
}
