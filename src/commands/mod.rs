//! Command implementations invoked by the binary

pub mod enumerate;

pub use enumerate::{execute, handle_enumerate_command};
