pub mod user;
pub mod utils;
