//! Frame discovery.
//!
//! The frame list is read once at startup and replayed in a closed loop.
//! Files added or removed afterwards are not picked up.

use std::path::{Path, PathBuf};

use crate::error::PlayerError;

/// Ordered, fixed list of frame files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameList {
    dir: PathBuf,
    frames: Vec<PathBuf>,
}

impl FrameList {
    /// List the regular, non-hidden files in `dir`, sorted by file name.
    ///
    /// # Errors
    /// - `DirectoryMissing` / `NotADirectory` if `dir` is not a directory
    /// - `EmptyDirectory` if it has no entries at all
    /// - `NoFrames` if it has entries but none are frame files
    pub fn discover(dir: &Path) -> Result<Self, PlayerError> {
        if !dir.exists() {
            return Err(PlayerError::DirectoryMissing(dir.to_path_buf()));
        }
        if !dir.is_dir() {
            return Err(PlayerError::NotADirectory(dir.to_path_buf()));
        }

        let read_err = |source| PlayerError::ReadDir {
            path: dir.to_path_buf(),
            source,
        };

        let mut saw_entry = false;
        let mut frames = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(read_err)? {
            let entry = entry.map_err(read_err)?;
            saw_entry = true;

            if entry.file_name().to_string_lossy().starts_with('.') {
                continue;
            }
            // Follows symlinks, so linked frames count
            if entry.path().is_file() {
                frames.push(entry.path());
            }
        }

        if !saw_entry {
            return Err(PlayerError::EmptyDirectory(dir.to_path_buf()));
        }
        if frames.is_empty() {
            return Err(PlayerError::NoFrames(dir.to_path_buf()));
        }

        frames.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(Self {
            dir: dir.to_path_buf(),
            frames,
        })
    }

    /// Directory the frames were read from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Path> {
        self.frames.get(index).map(PathBuf::as_path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.frames.iter().map(PathBuf::as_path)
    }
}
