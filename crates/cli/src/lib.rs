//! `claimguard-cli` — command-line host for the claimguard authorization core.

pub mod commands;
pub mod config;

pub use commands::{Decision, Outcome, Requirement};
pub use config::AppConfig;
