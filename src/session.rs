//! Session Store
//!
//! Persists the bearer token and the role-specific profile records in durable
//! [`Storage`], and performs logout (clear + redirect to the login page through
//! the injected [`Navigator`]).
//!
//! Writes go key by key. A crash between two writes can leave a token without
//! its profile; readers tolerate that.

use crate::error::StorageError;
use crate::models::{Administrador, AuthPayload, Docente, Estudiante, UserRole, Usuario};
use crate::navigation::{Navigator, LOGIN_PATH};
use crate::storage::Storage;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const TOKEN_KEY: &str = "access_token";
pub const USER_KEY: &str = "user_data";
pub const STUDENT_KEY: &str = "student_data";
pub const TEACHER_KEY: &str = "teacher_data";
pub const ADMIN_KEY: &str = "admin_data";

/// Every key owned by the session
pub const SESSION_KEYS: [&str; 5] = [TOKEN_KEY, USER_KEY, STUDENT_KEY, TEACHER_KEY, ADMIN_KEY];

/// Snapshot of the stored session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthData {
    pub token: Option<String>,
    pub user: Option<Usuario>,
    pub student: Option<Estudiante>,
    pub teacher: Option<Docente>,
    pub admin: Option<Administrador>,
}

impl AuthData {
    pub fn role(&self) -> Option<UserRole> {
        self.user.as_ref().and_then(Usuario::role)
    }
}

/// Session context shared by the client, the forms and the route shell
pub struct SessionStore {
    storage: Arc<dyn Storage>,
    navigator: Arc<dyn Navigator>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn Storage>, navigator: Arc<dyn Navigator>) -> Self {
        Self { storage, navigator }
    }

    /// Store token and profiles from a login/registration response.
    ///
    /// Fields absent from the payload are left untouched. Profiles are
    /// ignored unless a token is present in the payload or already stored.
    pub fn set_auth_data(&self, payload: &AuthPayload) -> Result<(), StorageError> {
        let token = payload.access_token.as_deref().filter(|t| !t.is_empty());

        if let Some(token) = token {
            self.storage.set(TOKEN_KEY, token)?;
        }

        if token.is_none() && !self.is_authenticated() {
            if payload.usuario.is_some()
                || payload.estudiante.is_some()
                || payload.docente.is_some()
                || payload.administrador.is_some()
            {
                warn!("Auth payload without token; profile data not stored");
            }
            return Ok(());
        }

        self.write_json(USER_KEY, payload.usuario.as_ref())?;
        self.write_json(STUDENT_KEY, payload.estudiante.as_ref())?;
        self.write_json(TEACHER_KEY, payload.docente.as_ref())?;
        self.write_json(ADMIN_KEY, payload.administrador.as_ref())?;

        info!(
            "Session stored: user={:?}",
            payload.usuario.as_ref().and_then(|u| u.username.as_deref())
        );
        Ok(())
    }

    /// Read the stored session. Absent or unreadable values come back as `None`.
    pub fn get_auth_data(&self) -> AuthData {
        let token = self.token();
        if token.is_none() {
            return AuthData::default();
        }

        AuthData {
            token,
            user: self.read_json(USER_KEY),
            student: self.read_json(STUDENT_KEY),
            teacher: self.read_json(TEACHER_KEY),
            admin: self.read_json(ADMIN_KEY),
        }
    }

    /// Stored non-empty token
    pub fn token(&self) -> Option<String> {
        match self.storage.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!("Failed to read session token: {}", e);
                None
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Role of the stored user (`tipo_usuario`)
    pub fn user_type(&self) -> Option<UserRole> {
        self.get_auth_data().role()
    }

    /// Remove every session key without redirecting
    pub fn clear(&self) {
        for key in SESSION_KEYS {
            if let Err(e) = self.storage.remove(key) {
                warn!("Failed to remove {} from session storage: {}", key, e);
            }
        }
    }

    /// Clear the session and redirect to the login page
    pub fn logout(&self) {
        self.clear();
        info!("Session cleared");
        self.navigator.navigate(LOGIN_PATH);
    }

    fn write_json<T: Serialize>(&self, key: &str, value: Option<&T>) -> Result<(), StorageError> {
        if let Some(value) = value {
            let json = serde_json::to_string(value)?;
            self.storage.set(key, &json)?;
        }
        Ok(())
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.storage.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to read {}: {}", key, e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!("Malformed {} in session storage: {}", key, e);
                None
            }
        }
    }
}
