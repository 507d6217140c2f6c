pub mod boats;
pub mod credentials;
pub mod token;
