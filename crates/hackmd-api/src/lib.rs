//! hackmd-api: reqwest client for the HackMD REST API v1.
//!
//! Implements share-core's `RemoteNotes` seam over HTTP with bearer-token
//! auth. Construct one client per action from an [`ApiConfig`]; nothing is
//! cached between actions.

pub mod client;
pub mod config;

pub use client::HackmdClient;
pub use config::{ApiConfig, ConfigError, DEFAULT_ENDPOINT};
