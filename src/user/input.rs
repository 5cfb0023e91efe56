use serde::{Deserialize, Serialize};
use std::fmt;

/// Form fields of the registration form, in display order
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Firstname,
    Lastname,
    Company,
    Email,
    Password,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Firstname,
        Field::Lastname,
        Field::Company,
        Field::Email,
        Field::Password,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Field::Firstname => "firstname",
            Field::Lastname => "lastname",
            Field::Company => "company",
            Field::Email => "email",
            Field::Password => "password",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "firstname" => Ok(Field::Firstname),
            "lastname" => Ok(Field::Lastname),
            "company" => Ok(Field::Company),
            "email" => Ok(Field::Email),
            "password" => Ok(Field::Password),
            _ => Err(format!("Invalid field: {}", s)),
        }
    }

    /// Human readable label used in validation messages
    pub fn label(&self) -> &str {
        match self {
            Field::Firstname => "First Name",
            Field::Lastname => "Last Name",
            Field::Company => "Company",
            Field::Email => "Email",
            Field::Password => "Password",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw values typed into the registration form
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct RegistrationInput {
    pub firstname: String,
    pub lastname: String,
    pub company: String,
    pub email: String,
    pub password: String,
}

impl RegistrationInput {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Firstname => &self.firstname,
            Field::Lastname => &self.lastname,
            Field::Company => &self.company,
            Field::Email => &self.email,
            Field::Password => &self.password,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Firstname => self.firstname = value,
            Field::Lastname => self.lastname = value,
            Field::Company => self.company = value,
            Field::Email => self.email = value,
            Field::Password => self.password = value,
        }
    }
}
