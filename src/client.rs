//! Academy API Client
//!
//! Thin wrapper over `reqwest` with the portal's two interceptors:
//!
//! - **Outgoing**: attaches `Authorization: Bearer <token>` when the session
//!   store holds a token.
//! - **Incoming**: successful responses pass through; failures are classified
//!   (timeout / network / server status) and logged. A 401 clears the session
//!   and redirects to the login page, once per failing response.
//!
//! No request is ever retried.

use crate::config::Config;
use crate::error::{ApiError, TransportKind};
use crate::models::{
    AuthPayload, Ciclo, Curso, Docente, Estudiante, LoginRequest, Matricula, NewCiclo, NewCurso,
    NewMatricula, Page, Statistics, StudentRegistration, StudentSignup, Usuario, VerifyResponse,
};
use crate::session::SessionStore;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Backend reachability as seen by the `GET /` probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
}

impl ConnectionStatus {
    pub fn message(&self) -> &'static str {
        match self {
            ConnectionStatus::Connected => "Conexión exitosa",
            ConnectionStatus::Disconnected => "No se pudo conectar con el servidor",
        }
    }
}

/// REST client bound to one session
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    probe_timeout: Duration,
    session: Arc<SessionStore>,
}

impl ApiClient {
    pub fn new(config: &Config, session: Arc<SessionStore>) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .timeout(config.request_timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::Request(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            probe_timeout: config.probe_timeout,
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Outgoing interceptor
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {}", token)),
            None => request,
        }
    }

    /// Incoming interceptor for failures
    fn on_failure(&self, err: &ApiError) {
        match err {
            ApiError::Transport {
                kind: TransportKind::Timeout,
                message,
            } => error!("Request timeout: {}", message),
            ApiError::Transport {
                kind: TransportKind::Network,
                message,
            } => error!("Network error: {}", message),
            ApiError::Status { status, body } => {
                error!("Response error: {} {:?}", status, body);
                if err.is_unauthorized() {
                    warn!("Unauthorized response; ending session");
                    self.session.logout();
                }
            }
            ApiError::Decode(message) => error!("Unexpected response body: {}", message),
            ApiError::Request(message) => error!("Invalid request: {}", message),
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let result = match self.dispatch(request).await {
            Ok(response) => response
                .json::<T>()
                .await
                .map_err(|e| ApiError::Decode(e.to_string())),
            Err(err) => Err(err),
        };
        if let Err(err) = &result {
            self.on_failure(err);
        }
        result
    }

    /// Like `send`, but only the status matters; the body is never read
    async fn send_status(&self, request: RequestBuilder) -> Result<(), ApiError> {
        let result = self.dispatch(request).await.map(|_| ());
        if let Err(err) = &result {
            self.on_failure(err);
        }
        result
    }

    async fn dispatch(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(ApiError::from_reqwest)?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let body = serde_json::from_str(&text).ok();
            return Err(ApiError::Status { status, body });
        }

        Ok(response)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        debug!("GET {}", path);
        self.send(self.http.get(self.url(path))).await
    }

    pub async fn get_page<T: DeserializeOwned>(&self, path: &str, page: Page) -> Result<T, ApiError> {
        debug!("GET {} skip={} limit={}", path, page.skip, page.limit);
        self.send(self.http.get(self.url(path)).query(&page)).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        debug!("POST {}", path);
        self.send(self.http.post(self.url(path)).json(body)).await
    }

    /// Probe `GET /` with the short probe timeout. Any 2xx counts as
    /// connected, whatever the body.
    pub async fn check_connection(&self) -> ConnectionStatus {
        let request = self.http.get(self.url("/")).timeout(self.probe_timeout);
        match self.send_status(request).await {
            Ok(_) => ConnectionStatus::Connected,
            Err(_) => ConnectionStatus::Disconnected,
        }
    }

    // ---- Auth ----

    pub async fn login(&self, request: &LoginRequest) -> Result<AuthPayload, ApiError> {
        self.post("/api/auth/login", request).await
    }

    pub async fn register_student(
        &self,
        registration: &StudentRegistration,
    ) -> Result<AuthPayload, ApiError> {
        self.post("/api/auth/register/estudiante", registration).await
    }

    pub async fn verify_token(&self) -> Result<VerifyResponse, ApiError> {
        self.get("/api/auth/verify").await
    }

    // ---- Diagnostics ----

    pub async fn test_connection(&self) -> Result<serde_json::Value, ApiError> {
        self.get("/").await
    }

    pub async fn test_database(&self) -> Result<serde_json::Value, ApiError> {
        self.get("/api/test-db").await
    }

    // ---- Statistics ----

    pub async fn stats(&self) -> Result<Statistics, ApiError> {
        self.get("/api/estadisticas").await
    }

    // ---- Students / teachers ----

    pub async fn students(&self, page: Page) -> Result<Vec<Estudiante>, ApiError> {
        self.get_page("/api/estudiantes", page).await
    }

    pub async fn student(&self, id: i64) -> Result<Estudiante, ApiError> {
        self.get(&format!("/api/estudiantes/{}", id)).await
    }

    /// Basic sign-up without credentials
    pub async fn create_student(&self, signup: &StudentSignup) -> Result<Estudiante, ApiError> {
        self.post("/api/estudiantes", signup).await
    }

    pub async fn teachers(&self, page: Page) -> Result<Vec<Docente>, ApiError> {
        self.get_page("/api/docentes", page).await
    }

    // ---- Cycles / courses / enrollments ----

    pub async fn create_cycle(&self, cycle: &NewCiclo) -> Result<Ciclo, ApiError> {
        self.post("/api/ciclos", cycle).await
    }

    pub async fn cycles(&self, page: Page) -> Result<Vec<Ciclo>, ApiError> {
        self.get_page("/api/ciclos", page).await
    }

    pub async fn cycle(&self, id: i64) -> Result<Ciclo, ApiError> {
        self.get(&format!("/api/ciclos/{}", id)).await
    }

    pub async fn cycle_courses(&self, id: i64) -> Result<Vec<Curso>, ApiError> {
        self.get(&format!("/api/ciclos/{}/cursos", id)).await
    }

    pub async fn create_course(&self, course: &NewCurso) -> Result<Curso, ApiError> {
        self.post("/api/cursos", course).await
    }

    pub async fn courses(&self, page: Page) -> Result<Vec<Curso>, ApiError> {
        self.get_page("/api/cursos", page).await
    }

    pub async fn create_enrollment(&self, enrollment: &NewMatricula) -> Result<Matricula, ApiError> {
        self.post("/api/matriculas", enrollment).await
    }

    pub async fn enrollments(&self, page: Page) -> Result<Vec<Matricula>, ApiError> {
        self.get_page("/api/matriculas", page).await
    }

    /// Currently authenticated user, as reported by the backend
    pub async fn current_user(&self) -> Result<Usuario, ApiError> {
        Ok(self.verify_token().await?.user)
    }
}

/// Server `detail` message, or `default` when the error carries none
pub fn error_detail(err: &ApiError, default: &str) -> String {
    err.detail().unwrap_or(default).to_string()
}
