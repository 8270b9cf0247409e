//! Configuration management
//!
//! Node identity, storage locations, and proof-of-work parameters,
//! seeded from environment variables and overridable at runtime.

pub mod settings;

pub use settings::{Config, GLOBAL_CONFIG};
