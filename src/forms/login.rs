use super::{FormController, FormKind, FormState, SubmitError};
use crate::client::ApiClient;
use crate::models::{AuthPayload, LoginRequest};
use crate::validation::{fields, login_rules, RuleTable};
use async_trait::async_trait;
use tracing::info;

/// Email + password login; a successful response is stored in the session
pub struct LoginForm {
    state: FormState,
    rules: RuleTable,
    payload: Option<AuthPayload>,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginForm {
    pub fn new() -> Self {
        let rules = login_rules();
        Self {
            state: FormState::new(rules.field_names()),
            rules,
            payload: None,
        }
    }

    /// Payload of the last successful login
    pub fn payload(&self) -> Option<&AuthPayload> {
        self.payload.as_ref()
    }
}

#[async_trait]
impl FormController for LoginForm {
    fn kind(&self) -> FormKind {
        FormKind::Login
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
        let request = LoginRequest {
            email: self.state.value(fields::EMAIL).trim().to_string(),
            password: self.state.value(fields::PASSWORD).to_string(),
        };

        let payload = api.login(&request).await?;
        api.session().set_auth_data(&payload)?;
        info!("Login succeeded for {}", request.email);

        self.payload = Some(payload);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::forms::{FormPhase, SubmitOutcome};
    use crate::navigation::HistoryNavigator;
    use crate::session::SessionStore;
    use crate::storage::MemoryStorage;
    use crate::validation::{MSG_EMAIL, MSG_LOGIN_REQUIRED};
    use std::sync::Arc;

    // Nothing listens on this port; reaching the network would surface as a
    // transport failure rather than `Invalid`.
    fn offline_api() -> ApiClient {
        let session = Arc::new(SessionStore::new(
            Arc::new(MemoryStorage::new()),
            Arc::new(HistoryNavigator::new()),
        ));
        let config = Config {
            api_url: "http://127.0.0.1:9".to_string(),
            ..Config::default()
        };
        ApiClient::new(&config, session).unwrap()
    }

    #[test]
    fn test_empty_fields_block_submit() {
        let api = offline_api();
        let mut form = LoginForm::new();
        form.set_field("email", "a@a.com");

        let outcome = tokio_test::block_on(form.submit(&api));

        assert_eq!(outcome, SubmitOutcome::Invalid(MSG_LOGIN_REQUIRED.to_string()));
        assert_eq!(form.state().error(), Some(MSG_LOGIN_REQUIRED));
        assert_eq!(form.state().phase(), FormPhase::Editing);
    }

    #[test]
    fn test_bad_email_blocks_submit() {
        let api = offline_api();
        let mut form = LoginForm::new();
        form.set_field("email", "user example.com");
        form.set_field("password", "x");

        assert!(!form.is_valid());
        let outcome = tokio_test::block_on(form.submit(&api));
        assert_eq!(outcome, SubmitOutcome::Invalid(MSG_EMAIL.to_string()));
        assert!(form.payload().is_none());
    }
}
