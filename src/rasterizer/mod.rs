//! External rasterizer invocation.
//!
//! The rasterizer is a separate image-to-text program run once per frame.
//! Its stdout goes straight to the terminal; only its exit status is
//! inspected, and only for logging.

mod args;

pub use args::build_args;

use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

/// Errors that can occur while rendering a single frame.
#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error("Rasterizer '{program}' not found. Install it or pass --rasterizer <PROGRAM>")]
    NotFound { program: String },

    #[error("Failed to spawn rasterizer '{program}': {source}")]
    SpawnFailed {
        program: String,
        source: std::io::Error,
    },

    #[error("Rasterizer '{program}' exited with {status}")]
    ProcessFailed { program: String, status: ExitStatus },
}

/// Renders one frame file with a prepared argument list.
pub trait Rasterize {
    fn render(&mut self, frame: &Path, args: &[String]) -> Result<(), RasterError>;
}

/// Runs an external program per frame, blocking until it exits.
#[derive(Debug, Clone)]
pub struct ExternalRasterizer {
    program: String,
}

impl ExternalRasterizer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Rasterize for ExternalRasterizer {
    fn render(&mut self, frame: &Path, args: &[String]) -> Result<(), RasterError> {
        let status = Command::new(&self.program)
            .args(args)
            .arg(frame)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    RasterError::NotFound {
                        program: self.program.clone(),
                    }
                } else {
                    RasterError::SpawnFailed {
                        program: self.program.clone(),
                        source: e,
                    }
                }
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(RasterError::ProcessFailed {
                program: self.program.clone(),
                status,
            })
        }
    }
}

/// Render the full invocation as one shell-pasteable line.
pub fn format_invocation(program: &str, args: &[String], frame: &Path) -> String {
    let frame = frame.to_string_lossy();
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .chain(std::iter::once(&*frame))
        .map(shell_quote)
        .collect::<Vec<_>>()
        .join(" ")
}

fn shell_quote(word: &str) -> String {
    let safe = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_=./,:+@%".contains(c));
    if safe {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}
