// User registration module
// This module provides the registration form: field values and validation,
// profile photo intake, and the submit flow that stores new users.

mod input;
mod form;
pub mod photo;
pub mod registration;
pub mod validation;

pub use input::{Field, RegistrationInput};
pub use form::RegistrationForm;
pub use photo::{Completion, PhotoAsset, PhotoError, PhotoIntake, PhotoRead, PhotoReadOutcome, SelectedFile};
pub use registration::{RegistrationController, RegistrationError, SubmissionState, SubmitOutcome};
pub use validation::{is_valid_email, FieldError, FormErrors, FormValidator};

/// Maximum first/last name length
pub const MAX_NAME_LENGTH: usize = 255;

/// Maximum email length
pub const MAX_EMAIL_LENGTH: usize = 255;

/// Maximum password length
pub const MAX_PASSWORD_LENGTH: usize = 10;

/// Maximum profile photo size (2 MiB)
pub const MAX_PHOTO_BYTES: u64 = 2 * 1024 * 1024;

/// Email regex pattern for validation
pub const EMAIL_REGEX: &str = r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$";
