//! Infrastructure implementations.
//!
//! Contains port trait definitions and their adapters for external
//! dependencies, plus process-level concerns (configuration, shutdown).

pub mod assets;
pub mod clock;
pub mod config;
pub mod error;
pub mod kv_store;
pub mod notifier;
pub mod ports;
pub mod shutdown;
