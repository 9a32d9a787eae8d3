//! Form Controllers
//!
//! Login and registration share one shape: a [`FormState`], a declarative
//! [`RuleTable`], and a submit cycle
//!
//! ```text
//! validate ──fail──► inline message (no request sent)
//!    │
//!    ▼
//! Submitting ──► API call ──ok──► Success
//!                    │
//!                    └──err──► inline message (status → text table)
//! ```
//!
//! There is no in-flight guard: submitting twice issues two requests.

use crate::client::ApiClient;
use crate::error::{ApiError, StorageError, TransportKind, ValidationError};
use crate::validation::RuleTable;
use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, warn};

mod login;
mod registration;

pub use login::LoginForm;
pub use registration::{RegistrationForm, RegistrationVariant};

pub const MSG_BAD_CREDENTIALS: &str = "Credenciales incorrectas. Verifica tu email y contraseña";
pub const MSG_DUPLICATE: &str = "El email ya está registrado";
pub const MSG_MALFORMED: &str = "Los datos ingresados no tienen el formato correcto";
pub const MSG_SERVER: &str = "Error en el servidor. Intente nuevamente más tarde";
pub const MSG_UNEXPECTED: &str = "Error inesperado. Intente nuevamente";

/// Which form produced a failure; wording differs slightly between them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Login,
    Registration,
}

impl FormKind {
    fn invalid_data(&self) -> &'static str {
        match self {
            FormKind::Login => "Datos inválidos en el formulario",
            FormKind::Registration => "Los datos ingresados no son válidos",
        }
    }

    fn unreachable(&self) -> &'static str {
        match self {
            FormKind::Login => "No se pudo conectar con el servidor",
            FormKind::Registration => "Error de conexión. Verifique su conexión a internet",
        }
    }
}

/// Failure after validation passed
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// User-facing text for a failed submission
pub fn submission_message(kind: FormKind, err: &SubmitError) -> String {
    let err = match err {
        SubmitError::Api(err) => err,
        SubmitError::Storage(_) => return MSG_UNEXPECTED.to_string(),
    };

    match err {
        ApiError::Status { status, .. } => match *status {
            StatusCode::BAD_REQUEST => {
                if let Some(messages) = err.detail_messages() {
                    format!("Error de validación: {}", messages.join(", "))
                } else if let Some(detail) = err.detail() {
                    format!("Error: {}", detail)
                } else {
                    kind.invalid_data().to_string()
                }
            }
            StatusCode::UNAUTHORIZED => MSG_BAD_CREDENTIALS.to_string(),
            StatusCode::CONFLICT => MSG_DUPLICATE.to_string(),
            StatusCode::UNPROCESSABLE_ENTITY => MSG_MALFORMED.to_string(),
            _ => MSG_SERVER.to_string(),
        },
        ApiError::Transport {
            kind: TransportKind::Timeout | TransportKind::Network,
            ..
        } => kind.unreachable().to_string(),
        ApiError::Decode(_) | ApiError::Request(_) => MSG_UNEXPECTED.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Editing,
    Submitting,
    Success,
}

/// Result of one submit attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blocked locally; nothing was sent
    Invalid(String),
    /// Sent, and the request failed
    Failed(String),
    Succeeded,
}

/// Field values, the current inline error, and the phase
#[derive(Debug, Clone)]
pub struct FormState {
    values: HashMap<String, String>,
    error: Option<String>,
    phase: FormPhase,
}

impl FormState {
    pub fn new<'a>(fields: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            values: fields
                .into_iter()
                .map(|f| (f.to_string(), String::new()))
                .collect(),
            error: None,
            phase: FormPhase::Editing,
        }
    }

    /// Update a field; any shown error is dismissed
    pub fn set(&mut self, field: &str, value: impl Into<String>) {
        self.values.insert(field.to_string(), value.into());
        self.error = None;
    }

    pub fn value(&self, field: &str) -> &str {
        self.values.get(field).map(String::as_str).unwrap_or("")
    }

    pub fn values(&self) -> &HashMap<String, String> {
        &self.values
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    fn begin(&mut self) {
        self.error = None;
        self.phase = FormPhase::Submitting;
    }

    fn fail(&mut self, message: String) {
        self.error = Some(message);
        self.phase = FormPhase::Editing;
    }

    fn succeed(&mut self) {
        self.error = None;
        self.phase = FormPhase::Success;
    }
}

#[async_trait]
pub trait FormController: Send {
    fn kind(&self) -> FormKind;

    fn rules(&self) -> &RuleTable;

    fn state(&self) -> &FormState;

    fn state_mut(&mut self) -> &mut FormState;

    /// Form-specific request; runs only after validation passed
    async fn send(&mut self, api: &ApiClient) -> Result<(), SubmitError>;

    fn set_field(&mut self, field: &str, value: &str) {
        self.state_mut().set(field, value);
    }

    fn validate(&self) -> Result<(), ValidationError> {
        self.rules().validate(self.state().values())
    }

    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    async fn submit(&mut self, api: &ApiClient) -> SubmitOutcome {
        if let Err(err) = self.validate() {
            debug!("{:?} form blocked: {}", self.kind(), err);
            self.state_mut().fail(err.message.clone());
            return SubmitOutcome::Invalid(err.message);
        }

        self.state_mut().begin();

        match self.send(api).await {
            Ok(()) => {
                self.state_mut().succeed();
                SubmitOutcome::Succeeded
            }
            Err(err) => {
                warn!("{:?} form submission failed: {}", self.kind(), err);
                let message = submission_message(self.kind(), &err);
                self.state_mut().fail(message.clone());
                SubmitOutcome::Failed(message)
            }
        }
    }
}
