use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;

use crate::config::{Config, ValidationConfig};
use crate::user::input::{Field, RegistrationInput};
use crate::user::EMAIL_REGEX;

lazy_static! {
    static ref EMAIL_PATTERN: Regex = Regex::new(EMAIL_REGEX).expect("email pattern is valid");
}

/// A single failed field rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    Required(Field),
    TooLong(Field, usize),
    InvalidEmail,
    SurroundingWhitespace,
    PasswordTooLong(usize),
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::Required(field) => write!(f, "{} is required", field.label()),
            // Length messages name the field key rather than its label
            FieldError::TooLong(field, max) => write!(f, "{} must be at most {} characters", field.as_str(), max),
            FieldError::InvalidEmail => write!(f, "Must be a valid email"),
            FieldError::SurroundingWhitespace => write!(f, "Password cannot start or end with spaces"),
            // "less than" although a password of exactly `max` characters passes
            FieldError::PasswordTooLong(max) => write!(f, "Password must be less than {} characters", max),
        }
    }
}

/// Validation errors keyed by field; at most one error per field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(BTreeMap<Field, FieldError>);

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: Field) -> Option<&FieldError> {
        self.0.get(&field)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &FieldError)> {
        self.0.iter().map(|(field, error)| (*field, error))
    }

    /// Field name to display message
    pub fn messages(&self) -> BTreeMap<Field, String> {
        self.0.iter().map(|(field, error)| (*field, error.to_string())).collect()
    }

    /// Keep only the errors of the given fields
    pub fn retain(&mut self, mut keep: impl FnMut(Field) -> bool) {
        self.0.retain(|field, _| keep(*field));
    }

    fn insert(&mut self, field: Field, error: FieldError) {
        self.0.entry(field).or_insert(error);
    }
}

/// Declarative rules for the registration form
#[derive(Debug, Clone, Default)]
pub struct FormValidator {
    limits: ValidationConfig,
}

impl FormValidator {
    pub fn new(limits: ValidationConfig) -> Self {
        Self { limits }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.validation.clone())
    }

    /// Validate every field independently, returning the first failing rule per field
    pub fn validate(&self, input: &RegistrationInput) -> FormErrors {
        let mut errors = FormErrors::default();

        for field in Field::ALL {
            if let Some(error) = self.validate_field(field, input.get(field)) {
                errors.insert(field, error);
            }
        }

        debug!("Form validation found {} error(s)", errors.len());
        errors
    }

    /// Validate a single field value
    pub fn validate_field(&self, field: Field, value: &str) -> Option<FieldError> {
        match field {
            Field::Firstname | Field::Lastname => self.check_name(field, value),
            Field::Email => self.check_email(value),
            Field::Password => self.check_password(value),
            Field::Company => None,
        }
    }

    fn check_name(&self, field: Field, value: &str) -> Option<FieldError> {
        if value.is_empty() {
            return Some(FieldError::Required(field));
        }
        if value.chars().count() > self.limits.name_max_len {
            return Some(FieldError::TooLong(field, self.limits.name_max_len));
        }
        None
    }

    fn check_email(&self, value: &str) -> Option<FieldError> {
        if value.is_empty() {
            return Some(FieldError::Required(Field::Email));
        }
        if !is_valid_email(value) {
            return Some(FieldError::InvalidEmail);
        }
        if value.chars().count() > self.limits.email_max_len {
            return Some(FieldError::TooLong(Field::Email, self.limits.email_max_len));
        }
        None
    }

    fn check_password(&self, value: &str) -> Option<FieldError> {
        if value.is_empty() {
            return Some(FieldError::Required(Field::Password));
        }
        if value != value.trim() {
            return Some(FieldError::SurroundingWhitespace);
        }
        if value.chars().count() > self.limits.password_max_len {
            return Some(FieldError::PasswordTooLong(self.limits.password_max_len));
        }
        None
    }
}

/// Check an address against the email pattern
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn valid_input() -> RegistrationInput {
        RegistrationInput {
            firstname: "Jane".to_string(),
            lastname: "Doe".to_string(),
            company: String::new(),
            email: "jane@example.com".to_string(),
            password: "s3cret!".to_string(),
        }
    }

    /// Email of exactly `len` characters
    fn email_of_length(len: usize) -> String {
        let domain = "@example.com";
        format!("{}{}", "a".repeat(len - domain.len()), domain)
    }

    #[test]
    fn test_valid_input_has_no_errors() {
        let errors = FormValidator::default().validate(&valid_input());
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
    }

    #[test]
    fn test_empty_form_reports_required_fields() {
        let errors = FormValidator::default().validate(&RegistrationInput::default());
        let messages = errors.messages();

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[&Field::Firstname], "First Name is required");
        assert_eq!(messages[&Field::Lastname], "Last Name is required");
        assert_eq!(messages[&Field::Email], "Email is required");
        assert_eq!(messages[&Field::Password], "Password is required");
        assert!(!errors.contains(Field::Company));
    }

    #[rstest]
    #[case(" secret")]
    #[case("secret ")]
    #[case("\tsecret")]
    fn test_password_with_surrounding_whitespace(#[case] password: &str) {
        let mut input = valid_input();
        input.password = password.to_string();

        let errors = FormValidator::default().validate(&input);
        assert_eq!(errors.get(Field::Password), Some(&FieldError::SurroundingWhitespace));
        assert_eq!(
            errors.messages()[&Field::Password],
            "Password cannot start or end with spaces"
        );
    }

    #[rstest]
    #[case("abcdefghij", true)]
    #[case("abcdefghijk", false)]
    #[case("ab cd", true)]
    fn test_password_max_length(#[case] password: &str, #[case] accepted: bool) {
        let mut input = valid_input();
        input.password = password.to_string();

        let errors = FormValidator::default().validate(&input);
        assert_eq!(errors.is_empty(), accepted);
        if !accepted {
            assert_eq!(
                errors.messages()[&Field::Password],
                "Password must be less than 10 characters"
            );
        }
    }

    #[test]
    fn test_names_and_email_accepted_at_boundary() {
        let mut input = valid_input();
        input.firstname = "a".repeat(255);
        input.lastname = "é".repeat(255);
        input.email = email_of_length(255);
        assert_eq!(input.email.chars().count(), 255);

        let errors = FormValidator::default().validate(&input);
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
    }

    #[test]
    fn test_names_and_email_rejected_past_boundary() {
        let mut input = valid_input();
        input.firstname = "a".repeat(256);
        input.lastname = "b".repeat(256);
        input.email = email_of_length(256);

        let messages = FormValidator::default().validate(&input).messages();
        assert_eq!(messages[&Field::Firstname], "firstname must be at most 255 characters");
        assert_eq!(messages[&Field::Lastname], "lastname must be at most 255 characters");
        assert_eq!(messages[&Field::Email], "email must be at most 255 characters");
    }

    #[rstest]
    #[case("plainaddress")]
    #[case("missing-at.example.com")]
    #[case("jane@")]
    #[case("@example.com")]
    #[case("jane doe@example.com")]
    fn test_invalid_email_format(#[case] email: &str) {
        let mut input = valid_input();
        input.email = email.to_string();

        let errors = FormValidator::default().validate(&input);
        assert_eq!(errors.get(Field::Email), Some(&FieldError::InvalidEmail));
    }

    #[test]
    fn test_company_is_unrestricted() {
        let mut input = valid_input();
        input.company = "x".repeat(1000);
        assert!(FormValidator::default().validate(&input).is_empty());
    }

    #[test]
    fn test_limits_from_config() {
        let mut config = Config::default();
        config.validation.password_max_len = 64;
        let validator = FormValidator::from_config(&config);

        assert_eq!(validator.validate_field(Field::Password, "a-much-longer-passphrase"), None);
    }

    #[test]
    fn test_retain_filters_fields() {
        let mut errors = FormValidator::default().validate(&RegistrationInput::default());
        errors.retain(|field| field == Field::Email);

        assert_eq!(errors.len(), 1);
        assert!(errors.contains(Field::Email));
    }
}
