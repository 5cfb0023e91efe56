use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::user::RegistrationInput;

/// A registered user as persisted in the `users` collection
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    #[serde(default)]
    pub company: String,
    pub password: String,
    /// Profile photo as a data-URL
    pub photo: String,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn new(input: &RegistrationInput, photo: String, created_at: DateTime<Utc>) -> Self {
        Self {
            firstname: input.firstname.clone(),
            lastname: input.lastname.clone(),
            email: input.email.clone(),
            company: input.company.clone(),
            password: input.password.clone(),
            photo,
            created_at,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
    }
}
