//! Shared library for the Aniview catalog browser.
//!
//! This crate provides common functionality used across the workspace:
//! - Configuration management
//! - Logging infrastructure
//! - Shared data models (content categories)

pub mod config;
pub mod logging;
pub mod models;

// Re-export commonly used types
pub use config::Config;
pub use logging::LogConfig;
pub use models::Category;
