// Password strength rating for the registration form.
// Credentials are stored as entered; no hashing happens here.

pub mod strength;

pub use strength::{score, StrengthColor, StrengthResult};
