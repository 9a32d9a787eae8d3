//! Route Shell
//!
//! Picks the page to render from the path and the session state, and tracks
//! the backend connection banner.
//!
//! A guarded page renders only if the session holds a token at resolution
//! time. Tokens are never refreshed; a stale token is trusted until a request
//! comes back 401.

use crate::client::{ApiClient, ConnectionStatus};
use crate::navigation::{Navigator, DASHBOARD_PATH, HOME_PATH, LOGIN_PATH, REGISTER_PATH};
use crate::session::SessionStore;
use std::sync::Arc;
use tracing::{debug, info};

pub const BANNER_DISCONNECTED: &str =
    "No se pudo conectar con el servidor. Asegúrate de que el backend esté funcionando.";

/// Connection banner state machine: `Checking → Connected | Disconnected`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerState {
    Checking,
    Connected,
    Disconnected,
}

#[derive(Debug, Clone)]
pub struct ConnectionBanner {
    state: BannerState,
}

impl Default for ConnectionBanner {
    fn default() -> Self {
        Self {
            state: BannerState::Checking,
        }
    }
}

impl ConnectionBanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> BannerState {
        self.state
    }

    /// Record a probe result
    pub fn apply(&mut self, status: ConnectionStatus) {
        self.state = match status {
            ConnectionStatus::Connected => BannerState::Connected,
            ConnectionStatus::Disconnected => BannerState::Disconnected,
        };
    }

    /// Probe the backend and record the result
    pub async fn refresh(&mut self, api: &ApiClient) -> BannerState {
        self.state = BannerState::Checking;
        let status = api.check_connection().await;
        self.apply(status);
        debug!("Connection banner: {:?}", self.state);
        self.state
    }

    /// Text to display, only while disconnected
    pub fn message(&self) -> Option<&'static str> {
        match self.state {
            BannerState::Disconnected => Some(BANNER_DISCONNECTED),
            _ => None,
        }
    }
}

/// Page-level components
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Login,
    Register,
    Dashboard,
}

impl Page {
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or("");
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Some(Page::Home),
            "/login" => Some(Page::Login),
            "/registro" | "/register" => Some(Page::Register),
            "/dashboard" => Some(Page::Dashboard),
            _ => None,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Page::Home => HOME_PATH,
            Page::Login => LOGIN_PATH,
            Page::Register => REGISTER_PATH,
            Page::Dashboard => DASHBOARD_PATH,
        }
    }

    /// Requires an authenticated session
    pub fn is_protected(&self) -> bool {
        matches!(self, Page::Dashboard)
    }

    /// Only meaningful for anonymous visitors
    pub fn is_auth_page(&self) -> bool {
        matches!(self, Page::Login | Page::Register)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Render(Page),
    Redirect(&'static str),
}

/// Route guard over the session store
pub struct RouteShell {
    session: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
}

impl RouteShell {
    pub fn new(session: Arc<SessionStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self { session, navigator }
    }

    /// Decide what `path` shows right now
    pub fn resolve(&self, path: &str) -> Resolution {
        let Some(page) = Page::from_path(path) else {
            return Resolution::Redirect(HOME_PATH);
        };

        let authenticated = self.session.is_authenticated();
        if page.is_protected() && !authenticated {
            Resolution::Redirect(LOGIN_PATH)
        } else if page.is_auth_page() && authenticated {
            Resolution::Redirect(DASHBOARD_PATH)
        } else {
            Resolution::Render(page)
        }
    }

    /// Resolve `path`, following redirects and reporting each to the navigator
    pub fn open(&self, path: &str) -> Page {
        let mut current = path.to_string();
        // Redirect targets always render, so two hops is the worst case
        for _ in 0..3 {
            match self.resolve(&current) {
                Resolution::Render(page) => {
                    info!("Render {:?} for {}", page, path);
                    return page;
                }
                Resolution::Redirect(to) => {
                    self.navigator.navigate(to);
                    current = to.to_string();
                }
            }
        }
        Page::Home
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AuthPayload;
    use crate::navigation::HistoryNavigator;
    use crate::storage::MemoryStorage;

    fn shell() -> (RouteShell, Arc<SessionStore>, Arc<HistoryNavigator>) {
        let nav = Arc::new(HistoryNavigator::new());
        let session = Arc::new(SessionStore::new(Arc::new(MemoryStorage::new()), nav.clone()));
        (RouteShell::new(session.clone(), nav.clone()), session, nav)
    }

    fn sign_in(session: &SessionStore) {
        session
            .set_auth_data(&AuthPayload {
                access_token: Some("T".into()),
                ..Default::default()
            })
            .unwrap();
    }

    #[test]
    fn test_anonymous_routes() {
        let (shell, _, _) = shell();
        assert_eq!(shell.resolve("/"), Resolution::Render(Page::Home));
        assert_eq!(shell.resolve("/login"), Resolution::Render(Page::Login));
        assert_eq!(shell.resolve("/register/"), Resolution::Render(Page::Register));
        assert_eq!(shell.resolve("/dashboard"), Resolution::Redirect("/login"));
        assert_eq!(shell.resolve("/cursos"), Resolution::Redirect("/"));
    }

    #[test]
    fn test_authenticated_routes() {
        let (shell, session, _) = shell();
        sign_in(&session);

        assert_eq!(shell.resolve("/dashboard?tab=1"), Resolution::Render(Page::Dashboard));
        assert_eq!(shell.resolve("/login"), Resolution::Redirect("/dashboard"));
        assert_eq!(shell.resolve("/registro"), Resolution::Redirect("/dashboard"));
        assert_eq!(shell.resolve("/"), Resolution::Render(Page::Home));
    }

    #[test]
    fn test_open_follows_redirects() {
        let (shell, session, nav) = shell();
        assert_eq!(shell.open("/dashboard"), Page::Login);
        assert_eq!(nav.history(), vec!["/login"]);

        sign_in(&session);
        assert_eq!(shell.open("/login"), Page::Dashboard);
        assert_eq!(nav.current().as_deref(), Some("/dashboard"));
    }

    #[test]
    fn test_banner_transitions() {
        let mut banner = ConnectionBanner::new();
        assert_eq!(banner.state(), BannerState::Checking);
        assert!(banner.message().is_none());

        banner.apply(ConnectionStatus::Disconnected);
        assert_eq!(banner.state(), BannerState::Disconnected);
        assert_eq!(banner.message(), Some(BANNER_DISCONNECTED));

        banner.apply(ConnectionStatus::Connected);
        assert!(banner.message().is_none());
    }
}
