use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};

use crate::device::DeviceState;
use crate::theme::ThemeState;

pub type RefreshBroadcaster = broadcast::Sender<()>;

/// Cross-request state. Content is deliberately absent: posts are
/// re-discovered and re-validated on every page-data request, so the only
/// mutable state is the client UI state.
pub struct AppState {
    pub content_dir: PathBuf,
    pub theme: RwLock<ThemeState>,
    pub device: RwLock<DeviceState>,
    pub is_development: bool,
}

impl AppState {
    pub fn new(content_dir: PathBuf, is_development: bool) -> Self {
        Self {
            content_dir,
            theme: RwLock::new(ThemeState::new()),
            device: RwLock::new(DeviceState::new()),
            is_development,
        }
    }
}

#[derive(Clone)]
pub struct RouterState {
    pub app_state: Arc<AppState>,
    pub broadcaster: RefreshBroadcaster,
}

impl axum::extract::FromRef<RouterState> for Arc<AppState> {
    fn from_ref(state: &RouterState) -> Self {
        state.app_state.clone()
    }
}

impl axum::extract::FromRef<RouterState> for RefreshBroadcaster {
    fn from_ref(state: &RouterState) -> Self {
        state.broadcaster.clone()
    }
}
