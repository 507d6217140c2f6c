pub mod auth;
pub mod error_code;

pub use error_code::ErrorCodeGenerator;
