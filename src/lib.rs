//! Academia Portal
//!
//! Client core for the Academia Preuniversitaria student-management portal.
//!
//! # Features
//!
//! - **REST client**: bearer-token interceptor, failure classification, forced logout on 401
//! - **Session store**: token + role profiles over an injectable durable storage
//! - **Forms**: login and registration over one declarative validation table
//! - **Route shell**: auth guard and backend connection banner
//! - **Dashboard**: role-specific panels and system statistics
//!
//! # Architecture
//!
//! ```text
//! Forms ──► ApiClient ──► Academy REST backend
//!   │          │
//!   │          └── 401 ──► SessionStore::logout ──► Navigator("/login")
//!   ▼
//! SessionStore (Storage: memory | JSON file)
//!   │
//!   ▼
//! RouteShell ──► Dashboard
//! ```

pub mod client;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod forms;
pub mod models;
pub mod navigation;
pub mod session;
pub mod shell;
pub mod storage;
pub mod validation;

pub use client::{ApiClient, ConnectionStatus};
pub use config::Config;
pub use dashboard::Dashboard;
pub use error::{ApiError, ConfigError, StorageError, TransportKind, ValidationError};
pub use forms::{FormController, FormPhase, LoginForm, RegistrationForm, RegistrationVariant, SubmitOutcome};
pub use models::{AuthPayload, Statistics, UserRole, Usuario};
pub use navigation::{HistoryNavigator, LogNavigator, Navigator};
pub use session::{AuthData, SessionStore};
pub use shell::{BannerState, ConnectionBanner, Page, Resolution, RouteShell};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use validation::{PhoneRule, RuleTable};
