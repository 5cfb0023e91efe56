use log::trace;
use std::collections::BTreeSet;

use crate::security::strength::{self, StrengthResult};
use crate::user::input::{Field, RegistrationInput};
use crate::user::validation::{FormErrors, FormValidator};

/// Editable form state: current values, which fields were touched,
/// the latest validation result and the password strength meter.
#[derive(Debug, Clone)]
pub struct RegistrationForm {
    values: RegistrationInput,
    touched: BTreeSet<Field>,
    errors: FormErrors,
    strength: StrengthResult,
    validator: FormValidator,
}

impl RegistrationForm {
    pub fn new(validator: FormValidator) -> Self {
        let values = RegistrationInput::default();
        let errors = validator.validate(&values);

        Self {
            values,
            touched: BTreeSet::new(),
            errors,
            // Meter starts from the empty password
            strength: strength::score(""),
            validator,
        }
    }

    pub fn values(&self) -> &RegistrationInput {
        &self.values
    }

    pub fn strength(&self) -> &StrengthResult {
        &self.strength
    }

    /// Change a field value and re-run validation
    pub fn change(&mut self, field: Field, value: impl Into<String>) {
        self.values.set(field, value);
        if field == Field::Password {
            self.strength = strength::score(&self.values.password);
        }
        self.revalidate();
    }

    /// Mark a field as touched (focus left it) and re-run validation
    pub fn blur(&mut self, field: Field) {
        trace!("Field {} touched", field);
        self.touched.insert(field);
        self.revalidate();
    }

    /// Submit attempts reveal errors on every field
    pub fn touch_all(&mut self) {
        self.touched.extend(Field::ALL);
        self.revalidate();
    }

    pub fn is_touched(&self, field: Field) -> bool {
        self.touched.contains(&field)
    }

    /// All current errors, touched or not
    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    /// Errors that should be displayed: only those of touched fields
    pub fn visible_errors(&self) -> FormErrors {
        let mut visible = self.errors.clone();
        visible.retain(|field| self.touched.contains(&field));
        visible
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn revalidate(&mut self) {
        self.errors = self.validator.validate(&self.values);
    }
}

impl Default for RegistrationForm {
    fn default() -> Self {
        Self::new(FormValidator::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let form = RegistrationForm::default();

        assert!(!form.is_valid());
        assert!(form.visible_errors().is_empty());
        assert_eq!(form.strength().score, 0);
        assert_eq!(form.strength().label, "Poor");
    }

    #[test]
    fn test_errors_visible_only_after_blur() {
        let mut form = RegistrationForm::default();
        form.change(Field::Email, "not-an-email");
        assert!(form.errors().contains(Field::Email));
        assert!(form.visible_errors().is_empty());

        form.blur(Field::Email);
        let visible = form.visible_errors();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible.messages()[&Field::Email], "Must be a valid email");
    }

    #[test]
    fn test_touch_all_reveals_every_error() {
        let mut form = RegistrationForm::default();
        form.touch_all();

        assert_eq!(form.visible_errors().len(), 4);
        assert!(Field::ALL.iter().all(|field| form.is_touched(*field)));
    }

    #[test]
    fn test_change_clears_fixed_error() {
        let mut form = RegistrationForm::default();
        form.blur(Field::Firstname);
        assert!(form.visible_errors().contains(Field::Firstname));

        form.change(Field::Firstname, "Jane");
        assert!(!form.visible_errors().contains(Field::Firstname));
    }

    #[test]
    fn test_password_change_updates_strength() {
        let mut form = RegistrationForm::default();
        form.change(Field::Password, "abcdeG1!");

        assert_eq!(form.strength().score, 4);
        assert_eq!(form.strength().label, "Strong");

        form.change(Field::Email, "jane@example.com");
        assert_eq!(form.strength().score, 4);
    }
}
