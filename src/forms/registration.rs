use super::{FormController, FormKind, FormState, SubmitError};
use crate::client::ApiClient;
use crate::models::{NewAccount, StudentRegistration, StudentSignup};
use crate::validation::{fields, registration_rules, signup_rules, PhoneRule, RuleTable};
use async_trait::async_trait;
use tracing::info;

/// Which registration flow the form drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationVariant {
    /// Names, email and phone; `POST /api/estudiantes`
    Basic,
    /// Adds DNI and credentials; `POST /api/auth/register/estudiante`
    Account,
}

/// Student registration form
pub struct RegistrationForm {
    variant: RegistrationVariant,
    state: FormState,
    rules: RuleTable,
}

impl RegistrationForm {
    pub fn new(variant: RegistrationVariant, phone: PhoneRule) -> Self {
        let rules = match variant {
            RegistrationVariant::Basic => signup_rules(phone),
            RegistrationVariant::Account => registration_rules(phone),
        };
        Self {
            variant,
            state: FormState::new(rules.field_names()),
            rules,
        }
    }

    pub fn variant(&self) -> RegistrationVariant {
        self.variant
    }

    /// Greeting shown once the form reached `Success`
    pub fn success_message(&self) -> String {
        format!(
            "¡Registro Exitoso! Bienvenido(a) {} {}",
            self.state.value(fields::NOMBRE).trim(),
            self.state.value(fields::APELLIDO).trim()
        )
    }

    fn field(&self, name: &str) -> String {
        self.state.value(name).trim().to_string()
    }
}

#[async_trait]
impl FormController for RegistrationForm {
    fn kind(&self) -> FormKind {
        FormKind::Registration
    }

    fn rules(&self) -> &RuleTable {
        &self.rules
    }

    fn state(&self) -> &FormState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut FormState {
        &mut self.state
    }

    async fn send(&mut self, api: &ApiClient) -> Result<(), SubmitError> {
        match self.variant {
            RegistrationVariant::Basic => {
                let signup = StudentSignup {
                    nombre: self.field(fields::NOMBRE),
                    apellido: self.field(fields::APELLIDO),
                    email: self.field(fields::EMAIL),
                    telefono: self.field(fields::TELEFONO),
                };
                let student = api.create_student(&signup).await?;
                info!("Student registered: {} {}", student.nombre, student.apellido);
            }
            RegistrationVariant::Account => {
                let email = self.field(fields::EMAIL);
                let registration = StudentRegistration {
                    nombre: self.field(fields::NOMBRE),
                    apellido: self.field(fields::APELLIDO),
                    email: email.clone(),
                    dni: self.field(fields::DNI),
                    telefono: self.field(fields::TELEFONO),
                    usuario: NewAccount {
                        username: self.field(fields::USERNAME),
                        email,
                        password: self.state.value(fields::PASSWORD).to_string(),
                    },
                };
                let payload = api.register_student(&registration).await?;
                if payload.access_token.is_some() {
                    api.session().set_auth_data(&payload)?;
                }
                info!("Account registered: {}", registration.usuario.username);
            }
        }
        Ok(())
    }
}
