//! Connection settings.
//!
//! Opening the session is the job of the execution collaborator, see
//! [`Connect`][crate::executor::Connect], this module only builds the
//! conninfo string it consumes.
mod config;

pub use config::{Config, ParseError};
