//! Profile registration core.
//!
//! Validates the registration form, rates password strength, turns the
//! selected profile photo into a data-URL preview and stores new users in a
//! local JSON collection with unique emails.

pub mod config;
pub mod security;
pub mod storage;
pub mod user;

pub use storage::{LocalRegistrationStore, RegistrationStore, UserRecord};
pub use user::{RegistrationController, SubmitOutcome};
