//! Simulated-phone state for the front-end. Purely presentational; the
//! content pipeline never reads it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DevicePage {
    Home,
    Blog,
    About,
    Projects,
    Contact,
    Settings,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeviceState {
    /// Whether the user has dragged the phone away from its initial spot.
    pub moved: bool,
    pub page: DevicePage,
    pub mobile: bool,
}

/// Partial update accepted on the device endpoint; unset fields leave the
/// current value alone.
#[derive(Debug, Default, Deserialize)]
pub struct DeviceUpdate {
    pub moved: Option<bool>,
    pub page: Option<DevicePage>,
    pub mobile: Option<bool>,
}

impl DeviceState {
    pub fn new() -> Self {
        Self {
            moved: false,
            page: DevicePage::Home,
            mobile: false,
        }
    }

    pub fn mark_moved(&mut self) {
        self.moved = true;
    }

    pub fn navigate(&mut self, page: DevicePage) {
        self.page = page;
    }

    pub fn set_mobile(&mut self, mobile: bool) {
        self.mobile = mobile;
    }

    pub fn apply(&mut self, update: &DeviceUpdate) {
        if update.moved == Some(true) {
            self.mark_moved();
        }
        if let Some(page) = update.page {
            self.navigate(page);
        }
        if let Some(mobile) = update.mobile {
            self.set_mobile(mobile);
        }
    }
}

impl Default for DeviceState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_unmoved_on_home() {
        let state = DeviceState::new();
        assert!(!state.moved);
        assert_eq!(state.page, DevicePage::Home);
        assert!(!state.mobile);
    }

    #[test]
    fn apply_updates_only_given_fields() {
        let mut state = DeviceState::new();
        state.apply(&DeviceUpdate {
            page: Some(DevicePage::Blog),
            ..Default::default()
        });
        assert_eq!(state.page, DevicePage::Blog);
        assert!(!state.moved);

        state.apply(&DeviceUpdate {
            moved: Some(true),
            mobile: Some(true),
            ..Default::default()
        });
        assert!(state.moved);
        assert!(state.mobile);
        assert_eq!(state.page, DevicePage::Blog);
    }

    #[test]
    fn moved_is_sticky() {
        let mut state = DeviceState::new();
        state.mark_moved();
        state.apply(&DeviceUpdate {
            moved: Some(false),
            ..Default::default()
        });
        assert!(state.moved);
    }
}
