//! Navigation Observer
//!
//! Redirects (logout, forced logout on 401, route guard) are delivered to a
//! caller-supplied [`Navigator`] instead of being performed directly.

use parking_lot::Mutex;
use tracing::info;

pub const HOME_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/login";
pub const REGISTER_PATH: &str = "/registro";
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Receives redirect requests
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// Navigator that only logs the redirect
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, path: &str) {
        info!("Redirect to {}", path);
    }
}

/// Navigator that records every redirect in order
#[derive(Debug, Default)]
pub struct HistoryNavigator {
    history: Mutex<Vec<String>>,
}

impl HistoryNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<String> {
        self.history.lock().clone()
    }

    /// Last requested path
    pub fn current(&self) -> Option<String> {
        self.history.lock().last().cloned()
    }

    /// Number of redirects to `path`
    pub fn count(&self, path: &str) -> usize {
        self.history.lock().iter().filter(|p| p.as_str() == path).count()
    }
}

impl Navigator for HistoryNavigator {
    fn navigate(&self, path: &str) {
        self.history.lock().push(path.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_navigator() {
        let nav = HistoryNavigator::new();
        assert!(nav.current().is_none());

        nav.navigate(LOGIN_PATH);
        nav.navigate(DASHBOARD_PATH);
        nav.navigate(LOGIN_PATH);

        assert_eq!(nav.history(), vec!["/login", "/dashboard", "/login"]);
        assert_eq!(nav.current().as_deref(), Some("/login"));
        assert_eq!(nav.count(LOGIN_PATH), 2);
    }
}
