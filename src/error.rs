//! Error types for startup validation and fatal player failures.
//!
//! Per-frame rasterizer failures live in [`crate::rasterizer::RasterError`]
//! and never abort playback.

use std::path::PathBuf;

use crate::config::ConfigError;

/// Errors that stop the player before or during playback.
#[derive(Debug, thiserror::Error)]
pub enum PlayerError {
    #[error("Frame directory '{}' does not exist", .0.display())]
    DirectoryMissing(PathBuf),

    #[error("'{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("Frame directory '{}' is empty", .0.display())]
    EmptyDirectory(PathBuf),

    #[error("Frame directory '{}' contains no frame files", .0.display())]
    NoFrames(PathBuf),

    #[error("Failed to read frame directory '{}': {source}", path.display())]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    #[error("Failed to install signal handler: {0}")]
    Signal(#[from] ctrlc::Error),
}

impl PlayerError {
    /// Whether this error was raised by startup validation, before any
    /// terminal state was touched.
    pub fn is_startup_validation(&self) -> bool {
        matches!(
            self,
            PlayerError::DirectoryMissing(_)
                | PlayerError::NotADirectory(_)
                | PlayerError::EmptyDirectory(_)
                | PlayerError::NoFrames(_)
                | PlayerError::ReadDir { .. }
                | PlayerError::Config(_)
        )
    }
}
