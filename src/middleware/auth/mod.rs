pub mod access;
pub mod entrypoint;
