//! A minimal blocking client for the Synapse repository service: enough to
//! log in with a personal access token and fetch submission files.

pub mod client;
pub mod config;
mod error;
pub mod model;

pub use client::Session;
pub use config::{ConfigError, SynapseConfig};
pub use error::SynapseError;
