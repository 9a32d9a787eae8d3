//! Form Validation
//!
//! One declarative rule table per form, evaluated by a single engine:
//!
//! 1. Every required field is checked for emptiness first; any empty field
//!    yields the table's form-level message.
//! 2. The remaining checks run in table order; the first violation wins.
//!
//! Optional fields left empty skip their checks.

use crate::error::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::str::FromStr;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Field names shared by forms and tables
pub mod fields {
    pub const NOMBRE: &str = "nombre";
    pub const APELLIDO: &str = "apellido";
    pub const EMAIL: &str = "email";
    pub const TELEFONO: &str = "telefono";
    pub const DNI: &str = "dni";
    pub const USERNAME: &str = "username";
    pub const PASSWORD: &str = "password";
    pub const CONFIRM_PASSWORD: &str = "confirm_password";
}

pub const MSG_LOGIN_REQUIRED: &str = "Por favor ingrese su email y contraseña";
pub const MSG_REQUIRED: &str = "Por favor complete todos los campos obligatorios";
pub const MSG_EMAIL: &str = "Por favor ingrese un email válido";
pub const MSG_PHONE_AT_LEAST: &str = "El teléfono debe tener al menos 9 dígitos";
pub const MSG_PHONE_EXACT: &str = "El teléfono debe tener 9 dígitos";
pub const MSG_DNI: &str = "El DNI debe tener exactamente 8 dígitos";
pub const MSG_PASSWORD_LENGTH: &str = "La contraseña debe tener al menos 6 caracteres";
pub const MSG_PASSWORD_MATCH: &str = "Las contraseñas no coinciden";

pub const MIN_PASSWORD_LEN: usize = 6;

/// Required digit count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigitCount {
    Exactly(usize),
    AtLeast(usize),
}

impl DigitCount {
    fn accepts(&self, value: &str) -> bool {
        if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
            return false;
        }
        match *self {
            DigitCount::Exactly(n) => value.len() == n,
            DigitCount::AtLeast(n) => value.len() >= n,
        }
    }
}

/// Phone length policy. Iterations of the portal disagree, so it is a
/// configuration choice rather than a constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PhoneRule {
    Exactly9,
    #[default]
    AtLeast9,
}

impl PhoneRule {
    pub fn digit_count(&self) -> DigitCount {
        match self {
            PhoneRule::Exactly9 => DigitCount::Exactly(9),
            PhoneRule::AtLeast9 => DigitCount::AtLeast(9),
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            PhoneRule::Exactly9 => MSG_PHONE_EXACT,
            PhoneRule::AtLeast9 => MSG_PHONE_AT_LEAST,
        }
    }
}

impl FromStr for PhoneRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "exact" | "exactly" | "exactly-9" => Ok(PhoneRule::Exactly9),
            "at-least" | "at_least" | "min" | "at-least-9" => Ok(PhoneRule::AtLeast9),
            other => Err(format!("unknown phone rule: {}", other)),
        }
    }
}

/// A single check on a field value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    Email,
    Digits(DigitCount),
    MinLength(usize),
    /// Value must equal another field's value
    MatchesField(&'static str),
}

impl Rule {
    fn check(&self, value: &str, values: &HashMap<String, String>) -> bool {
        match self {
            Rule::Email => EMAIL_RE.is_match(value),
            Rule::Digits(count) => count.accepts(value),
            Rule::MinLength(n) => value.chars().count() >= *n,
            Rule::MatchesField(other) => {
                values.get(*other).map(String::as_str).unwrap_or("") == value
            }
        }
    }
}

/// Rules attached to one field
#[derive(Debug, Clone)]
pub struct FieldRules {
    pub field: &'static str,
    pub required: bool,
    pub checks: Vec<(Rule, &'static str)>,
}

impl FieldRules {
    pub fn required(field: &'static str) -> Self {
        Self {
            field,
            required: true,
            checks: Vec::new(),
        }
    }

    pub fn optional(field: &'static str) -> Self {
        Self {
            field,
            required: false,
            checks: Vec::new(),
        }
    }

    pub fn check(mut self, rule: Rule, message: &'static str) -> Self {
        self.checks.push((rule, message));
        self
    }
}

/// Declarative validation table for a form
#[derive(Debug, Clone)]
pub struct RuleTable {
    pub required_message: &'static str,
    pub fields: Vec<FieldRules>,
}

impl RuleTable {
    /// Field names in declaration order
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.field)
    }

    /// First violated rule, if any
    pub fn validate(&self, values: &HashMap<String, String>) -> Result<(), ValidationError> {
        let value_of = |field: &str| values.get(field).map(String::as_str).unwrap_or("");

        if let Some(empty) = self
            .fields
            .iter()
            .find(|f| f.required && value_of(f.field).trim().is_empty())
        {
            return Err(ValidationError::new(Some(empty.field), self.required_message));
        }

        for field in &self.fields {
            let value = value_of(field.field);
            if !field.required && value.trim().is_empty() {
                continue;
            }
            for (rule, message) in &field.checks {
                if !rule.check(value, values) {
                    return Err(ValidationError::new(Some(field.field), *message));
                }
            }
        }

        Ok(())
    }
}

/// Login: email + password
pub fn login_rules() -> RuleTable {
    RuleTable {
        required_message: MSG_LOGIN_REQUIRED,
        fields: vec![
            FieldRules::required(fields::EMAIL).check(Rule::Email, MSG_EMAIL),
            FieldRules::required(fields::PASSWORD),
        ],
    }
}

/// Basic student sign-up: names, email, phone
pub fn signup_rules(phone: PhoneRule) -> RuleTable {
    RuleTable {
        required_message: MSG_REQUIRED,
        fields: vec![
            FieldRules::required(fields::NOMBRE),
            FieldRules::required(fields::APELLIDO),
            FieldRules::required(fields::EMAIL).check(Rule::Email, MSG_EMAIL),
            FieldRules::required(fields::TELEFONO)
                .check(Rule::Digits(phone.digit_count()), phone.message()),
        ],
    }
}

/// Full account registration: sign-up fields plus DNI and credentials
pub fn registration_rules(phone: PhoneRule) -> RuleTable {
    let mut table = signup_rules(phone);
    table.fields.extend([
        FieldRules::required(fields::DNI).check(Rule::Digits(DigitCount::Exactly(8)), MSG_DNI),
        FieldRules::required(fields::USERNAME),
        FieldRules::required(fields::PASSWORD)
            .check(Rule::MinLength(MIN_PASSWORD_LEN), MSG_PASSWORD_LENGTH),
        FieldRules::required(fields::CONFIRM_PASSWORD)
            .check(Rule::MatchesField(fields::PASSWORD), MSG_PASSWORD_MATCH),
    ]);
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn signup_values(phone: &str) -> HashMap<String, String> {
        values(&[
            ("nombre", "Juan Carlos"),
            ("apellido", "Pérez García"),
            ("email", "juan@example.com"),
            ("telefono", phone),
        ])
    }

    fn registration_values(dni: &str) -> HashMap<String, String> {
        let mut v = signup_values("987654321");
        v.extend(values(&[
            ("dni", dni),
            ("username", "jcperez"),
            ("password", "secreto1"),
            ("confirm_password", "secreto1"),
        ]));
        v
    }

    #[test]
    fn test_email_pattern() {
        assert!(EMAIL_RE.is_match("user@example.com"));
        assert!(!EMAIL_RE.is_match("user@"));
        assert!(!EMAIL_RE.is_match("user example.com"));
        assert!(!EMAIL_RE.is_match("user@example"));
    }

    #[test]
    fn test_login_required_first() {
        let table = login_rules();
        let err = table
            .validate(&values(&[("email", "not-an-email"), ("password", "  ")]))
            .unwrap_err();
        assert_eq!(err.message, MSG_LOGIN_REQUIRED);
        assert_eq!(err.field.as_deref(), Some("password"));

        let err = table
            .validate(&values(&[("email", "user@"), ("password", "x")]))
            .unwrap_err();
        assert_eq!(err.message, MSG_EMAIL);

        assert!(table
            .validate(&values(&[("email", "a@a.com"), ("password", "x")]))
            .is_ok());
    }

    #[test]
    fn test_missing_field_counts_as_empty() {
        let err = login_rules().validate(&HashMap::new()).unwrap_err();
        assert_eq!(err.message, MSG_LOGIN_REQUIRED);
    }

    #[test]
    fn test_phone_rules() {
        let at_least = signup_rules(PhoneRule::AtLeast9);
        assert!(at_least.validate(&signup_values("987654321")).is_ok());
        assert!(at_least.validate(&signup_values("9876543210")).is_ok());
        assert_eq!(
            at_least.validate(&signup_values("98765432")).unwrap_err().message,
            MSG_PHONE_AT_LEAST
        );
        assert!(at_least.validate(&signup_values("98765432a")).is_err());

        let exact = signup_rules(PhoneRule::Exactly9);
        assert!(exact.validate(&signup_values("987654321")).is_ok());
        assert_eq!(
            exact.validate(&signup_values("9876543210")).unwrap_err().message,
            MSG_PHONE_EXACT
        );
    }

    #[test]
    fn test_dni_exactly_eight_digits() {
        let table = registration_rules(PhoneRule::AtLeast9);
        assert!(table.validate(&registration_values("12345678")).is_ok());

        for bad in ["1234567", "123456789", "1234567a", "12 45678"] {
            let err = table.validate(&registration_values(bad)).unwrap_err();
            assert_eq!(err.message, MSG_DNI, "dni {:?}", bad);
        }
    }

    #[test]
    fn test_password_rules() {
        let table = registration_rules(PhoneRule::AtLeast9);

        let mut short = registration_values("12345678");
        short.insert("password".into(), "abc".into());
        short.insert("confirm_password".into(), "abc".into());
        assert_eq!(table.validate(&short).unwrap_err().message, MSG_PASSWORD_LENGTH);

        let mut mismatch = registration_values("12345678");
        mismatch.insert("confirm_password".into(), "otro1234".into());
        assert_eq!(table.validate(&mismatch).unwrap_err().message, MSG_PASSWORD_MATCH);
    }

    #[test]
    fn test_optional_field_skips_checks_when_empty() {
        let table = RuleTable {
            required_message: MSG_REQUIRED,
            fields: vec![FieldRules::optional(fields::TELEFONO)
                .check(Rule::Digits(DigitCount::AtLeast(9)), MSG_PHONE_AT_LEAST)],
        };
        assert!(table.validate(&HashMap::new()).is_ok());
        assert!(table.validate(&values(&[("telefono", "12")])).is_err());
    }

    #[test]
    fn test_phone_rule_parse() {
        assert_eq!("exact".parse::<PhoneRule>().unwrap(), PhoneRule::Exactly9);
        assert_eq!("AT-LEAST".parse::<PhoneRule>().unwrap(), PhoneRule::AtLeast9);
        assert!("nine".parse::<PhoneRule>().is_err());
    }
}
