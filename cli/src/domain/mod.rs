//! Domain layer — pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod error;
pub mod inflight;
pub mod labels;
pub mod preferences;

pub use config::{NodescaleConfig, config_problems, validate_config_key};
pub use error::ConfigError;
pub use inflight::{InFlightKey, InFlightLedger, Operation};
pub use labels::{validate_labels, validate_node_label};
pub use preferences::{ClusterPreferences, resolve_spot};
