//! Jukebox Host Library
//!
//! Terminal host for the credit-operated jukebox: configuration, the rodio
//! audio engine, the numbered-directory album library and keypad commands.
//!
//! This library exposes the host components for testing purposes.

pub mod commands;
pub mod config;
pub mod engine;
pub mod error;
pub mod library;

// Re-export commonly used types for convenience
pub use commands::Command;
pub use config::AppConfig;
pub use engine::RodioEngine;
pub use error::{AppError, Result};
pub use library::DirectoryLibrary;
