//! Wire Models
//!
//! JSON bodies exchanged with the academy backend. Field names follow the
//! backend (Spanish) so the structs serialize without renames. Profile records
//! keep unknown fields in `extra` so a stored profile round-trips unchanged.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Portal user role (`tipo_usuario`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Estudiante,
    Docente,
    Administrador,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Estudiante => "estudiante",
            UserRole::Docente => "docente",
            UserRole::Administrador => "administrador",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "estudiante" | "student" => Ok(UserRole::Estudiante),
            "docente" | "teacher" => Ok(UserRole::Docente),
            "administrador" | "admin" => Ok(UserRole::Administrador),
            other => Err(format!("unknown user role: {}", other)),
        }
    }
}

/// Account record (`usuario`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Usuario {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_usuario: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tipo_usuario: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Usuario {
    /// Parsed role; unknown strings yield `None`
    pub fn role(&self) -> Option<UserRole> {
        self.tipo_usuario.as_deref()?.parse().ok()
    }
}

/// Student profile (`estudiante`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Estudiante {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_usuario: Option<i64>,
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub apellido: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dni: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telefono: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Teacher profile (`docente`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Docente {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_usuario: Option<i64>,
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub apellido: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telefono: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub especialidad: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Administrator profile (`administrador`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Administrador {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_usuario: Option<i64>,
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub apellido: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telefono: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cargo: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body returned by login (and, when the backend issues one, registration)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthPayload {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub usuario: Option<Usuario>,
    #[serde(default)]
    pub estudiante: Option<Estudiante>,
    #[serde(default)]
    pub docente: Option<Docente>,
    #[serde(default)]
    pub administrador: Option<Administrador>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Basic student sign-up (`POST /api/estudiantes`)
#[derive(Debug, Clone, Serialize)]
pub struct StudentSignup {
    pub nombre: String,
    pub apellido: String,
    pub email: String,
    pub telefono: String,
}

/// Credentials nested inside an account registration
#[derive(Debug, Clone, Serialize)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Student account registration (`POST /api/auth/register/estudiante`)
#[derive(Debug, Clone, Serialize)]
pub struct StudentRegistration {
    pub nombre: String,
    pub apellido: String,
    pub email: String,
    pub dni: String,
    pub telefono: String,
    pub usuario: NewAccount,
}

/// `GET /api/auth/verify`
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyResponse {
    #[serde(default)]
    pub message: String,
    pub user: Usuario,
}

/// `GET /api/estadisticas` snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    #[serde(default)]
    pub total_estudiantes: u64,
    #[serde(default)]
    pub total_docentes: u64,
    #[serde(default)]
    pub total_administradores: u64,
    #[serde(default)]
    pub total_ciclos: u64,
    #[serde(default)]
    pub total_cursos: u64,
    #[serde(default)]
    pub total_matriculas: u64,
    #[serde(default)]
    pub total_pagos: u64,
    /// Counters added by newer backends
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Academic cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ciclo {
    pub id_ciclo: i64,
    pub nombre: String,
    pub fecha_inicio: NaiveDate,
    pub fecha_fin: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewCiclo {
    pub nombre: String,
    pub fecha_inicio: NaiveDate,
    pub fecha_fin: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Curso {
    pub id_curso: i64,
    pub nombre: String,
    #[serde(default)]
    pub descripcion: Option<String>,
    pub id_ciclo: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewCurso {
    pub nombre: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
    pub id_ciclo: i64,
}

/// Enrollment of a student in a cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matricula {
    pub id_matricula: i64,
    pub id_usuario: i64,
    pub id_ciclo: i64,
    pub fecha_matricula: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewMatricula {
    pub id_usuario: i64,
    pub id_ciclo: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_modalidad: Option<i64>,
}

/// `skip`/`limit` query for list endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Page {
    pub skip: u32,
    pub limit: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self { skip: 0, limit: 100 }
    }
}
