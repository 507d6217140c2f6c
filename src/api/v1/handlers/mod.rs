pub mod boats;
pub mod health;
pub mod token;
