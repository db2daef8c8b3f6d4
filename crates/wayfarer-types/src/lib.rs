//! Foundation types for Wayfarer.
//!
//! Shared by every Wayfarer crate: the error enum with its `Result` alias and
//! the TOML-backed browser configuration.

pub mod config;
pub mod error;

pub use config::{AddressTracking, BrowserConfig};
pub use error::{Result, WayfarerError};
