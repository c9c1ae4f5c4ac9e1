//! Application configuration module.
//!
//! Manages the TOML config file: response language, API endpoints, search
//! tuning and genre grid sizes.

#[allow(clippy::module_inception)]
mod config;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::AppConfig;
pub use paths::resolve_config_path;
