//! Dashboard
//!
//! Role-specific view model built from the session store and the statistics
//! endpoint. Statistics are optional: a failed fetch is logged and the panel
//! is simply omitted.

use crate::client::ApiClient;
use crate::models::{Statistics, UserRole};
use crate::session::{AuthData, SessionStore};
use tracing::{info, warn};

const NOT_REGISTERED: &str = "No registrado";

/// One labelled line of the profile panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileLine {
    pub label: &'static str,
    pub value: String,
}

impl ProfileLine {
    fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }
}

/// Quick-action buttons offered to each role
pub fn quick_actions(role: Option<UserRole>) -> &'static [&'static str] {
    match role {
        Some(UserRole::Estudiante) => &["Mis Cursos", "Horarios", "Pagos", "Notas"],
        Some(UserRole::Docente) => &["Mis Clases", "Estudiantes", "Horarios", "Evaluaciones"],
        Some(UserRole::Administrador) => &["Usuarios", "Ciclos", "Cursos", "Reportes"],
        None => &[],
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub greeting: String,
    pub role_label: String,
    pub profile: Vec<ProfileLine>,
    pub actions: &'static [&'static str],
    pub stats: Option<Statistics>,
}

impl Dashboard {
    /// Build the view from stored session data and a statistics snapshot
    pub fn from_parts(auth: &AuthData, stats: Option<Statistics>) -> Self {
        let user = auth.user.clone().unwrap_or_default();
        let username = user.username.clone().unwrap_or_default();

        let display_name = auth
            .student
            .as_ref()
            .map(|s| s.nombre.clone())
            .or_else(|| auth.teacher.as_ref().map(|t| t.nombre.clone()))
            .or_else(|| auth.admin.as_ref().map(|a| a.nombre.clone()))
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| username.clone());

        let mut profile = vec![
            ProfileLine::new("Usuario", username),
            ProfileLine::new("Email", user.email.clone().unwrap_or_default()),
            ProfileLine::new("Tipo de Usuario", user.tipo_usuario.clone().unwrap_or_default()),
        ];

        if let Some(student) = &auth.student {
            profile.push(ProfileLine::new(
                "Nombre Completo",
                format!("{} {}", student.nombre, student.apellido),
            ));
            profile.push(ProfileLine::new(
                "DNI",
                student.dni.clone().unwrap_or_else(|| NOT_REGISTERED.into()),
            ));
            profile.push(ProfileLine::new(
                "Teléfono",
                student.telefono.clone().unwrap_or_else(|| NOT_REGISTERED.into()),
            ));
        }
        if let Some(teacher) = &auth.teacher {
            profile.push(ProfileLine::new(
                "Nombre Completo",
                format!("{} {}", teacher.nombre, teacher.apellido),
            ));
            profile.push(ProfileLine::new(
                "Especialidad",
                teacher
                    .especialidad
                    .clone()
                    .unwrap_or_else(|| "No especificada".into()),
            ));
        }
        if let Some(admin) = &auth.admin {
            profile.push(ProfileLine::new(
                "Nombre Completo",
                format!("{} {}", admin.nombre, admin.apellido),
            ));
            profile.push(ProfileLine::new(
                "Cargo",
                admin.cargo.clone().unwrap_or_else(|| "Administrador".into()),
            ));
        }

        let role = auth.role();

        Self {
            greeting: format!("Bienvenido, {}", display_name),
            role_label: format!(
                "Panel de control - {}",
                user.tipo_usuario.as_deref().unwrap_or("Usuario")
            ),
            profile,
            actions: quick_actions(role),
            stats,
        }
    }

    /// Read the session and fetch statistics
    pub async fn load(session: &SessionStore, api: &ApiClient) -> Self {
        let auth = session.get_auth_data();

        let stats = match api.stats().await {
            Ok(stats) => Some(stats),
            Err(e) => {
                warn!("Statistics unavailable: {}", e);
                None
            }
        };

        info!("Dashboard loaded (stats: {})", stats.is_some());
        Self::from_parts(&auth, stats)
    }

    pub fn logout(session: &SessionStore) {
        session.logout();
    }
}
