use chrono::Utc;
use log::{debug, error, info, warn};

use crate::config::Config;
use crate::storage::{RegistrationStore, UserRecord};
use crate::user::form::RegistrationForm;
use crate::user::input::Field;
use crate::user::photo::{Completion, PhotoError, PhotoIntake, PhotoRead, PhotoReadOutcome, SelectedFile};
use crate::user::validation::{FormErrors, FormValidator};

/// Business-rule failures on submit; display strings are shown in the banner
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("Please upload your profile photo")]
    MissingPhoto,

    #[error("User with this email already exists")]
    DuplicateEmail,

    #[error("Unable to save your registration, please try again")]
    Storage(String),
}

/// Whether a submission is in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Editing,
    Submitting,
}

/// Result of a submit attempt
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The user was stored
    Success(UserRecord),
    /// A business rule rejected the submission
    Failed(RegistrationError),
    /// Field validation blocked the submission before any other check
    Invalid(FormErrors),
}

impl SubmitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmitOutcome::Success(_))
    }
}

type SuccessCallback = Box<dyn FnMut()>;

/// Drives the registration form: field edits, photo intake and submit
pub struct RegistrationController<S> {
    store: S,
    form: RegistrationForm,
    photo: PhotoIntake,
    banner: Option<String>,
    state: SubmissionState,
    on_success: Option<SuccessCallback>,
}

impl<S: RegistrationStore> RegistrationController<S> {
    pub fn new(store: S) -> Self {
        Self::from_config(store, &Config::default())
    }

    pub fn from_config(store: S, config: &Config) -> Self {
        Self {
            store,
            form: RegistrationForm::new(FormValidator::from_config(config)),
            photo: PhotoIntake::from_config(config),
            banner: None,
            state: SubmissionState::Editing,
            on_success: None,
        }
    }

    /// Notification fired once per successful registration
    pub fn on_success(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_success = Some(Box::new(callback));
        self
    }

    pub fn form(&self) -> &RegistrationForm {
        &self.form
    }

    pub fn photo(&self) -> &PhotoIntake {
        &self.photo
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Current error banner, if any
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    pub fn is_submitting(&self) -> bool {
        self.state == SubmissionState::Submitting
    }

    pub fn change(&mut self, field: Field, value: impl Into<String>) {
        self.form.change(field, value);
    }

    pub fn blur(&mut self, field: Field) {
        self.form.blur(field);
    }

    /// Start a photo selection; returns the read to run, or `None` when rejected
    pub fn select_photo(&mut self, file: SelectedFile) -> Option<PhotoRead> {
        match self.photo.select(file) {
            Ok(read) => {
                self.banner = None;
                Some(read)
            }
            Err(e) => {
                self.banner = Some(e.to_string());
                None
            }
        }
    }

    /// Hand back a finished photo read; a failed read also sets the banner
    pub fn complete_photo(&mut self, outcome: PhotoReadOutcome) -> Result<Completion, PhotoError> {
        self.photo.complete(outcome).map_err(|e| {
            self.banner = Some(e.to_string());
            e
        })
    }

    /// Select a photo and wait for its preview; true when the photo is ready
    pub async fn upload_photo(&mut self, file: SelectedFile) -> bool {
        let Some(read) = self.select_photo(file) else {
            return false;
        };
        let outcome = read.run().await;
        matches!(self.complete_photo(outcome), Ok(Completion::Ready))
    }

    pub fn remove_photo(&mut self) {
        self.photo.remove();
    }

    /// Attempt to register the user currently in the form
    pub fn submit(&mut self) -> SubmitOutcome {
        self.form.touch_all();
        if !self.form.is_valid() {
            debug!("Submit blocked by {} validation error(s)", self.form.errors().len());
            return SubmitOutcome::Invalid(self.form.errors().clone());
        }

        self.banner = None;
        self.state = SubmissionState::Submitting;

        let outcome = match self.register() {
            Ok(record) => {
                if let Some(callback) = self.on_success.as_mut() {
                    callback();
                }
                SubmitOutcome::Success(record)
            }
            Err(e) => {
                self.banner = Some(e.to_string());
                SubmitOutcome::Failed(e)
            }
        };

        self.state = SubmissionState::Editing;
        outcome
    }

    fn register(&mut self) -> Result<UserRecord, RegistrationError> {
        let photo = match self.photo.preview() {
            Some(preview) => preview.to_string(),
            None => {
                warn!("Registration attempted without a profile photo");
                return Err(RegistrationError::MissingPhoto);
            }
        };

        let values = self.form.values();
        if self.store.email_exists(&values.email) {
            warn!("Registration rejected, email already registered: {}", values.email);
            return Err(RegistrationError::DuplicateEmail);
        }

        let record = UserRecord::new(values, photo, Utc::now());
        self.store.append(record.clone()).map_err(|e| {
            error!("Failed to store registration: {}", e);
            RegistrationError::Storage(e.to_string())
        })?;

        info!("User registered successfully: {}", record.email);
        Ok(record)
    }
}
