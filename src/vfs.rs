use crate::{errors::IoError, materialize::Materializer};
use std::path::{Path, PathBuf};

/// Represents a virtual file or directory entry to be created in memory before writing to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct VirtualEntry {
    /// Path of the entry, relative to the output location.
    pub destination: PathBuf,
    /// Contents to be written if the entry represents a file.
    pub content: Option<String>,
    /// Indicates whether this entry is a file (`true`) or a directory (`false`).
    pub is_file: bool,
}
/// Represents a virtual file system composed of multiple [`VirtualEntry`] values.
///
/// Walking a structure into a `VirtualFS` validates the whole structure without touching
/// the disk. The recorded entries are in creation order, so every directory precedes the
/// entries inside it, and can be replayed onto any other [`Materializer`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VirtualFS {
    pub entries: Vec<VirtualEntry>,
}
impl VirtualFS {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn directories(&self) -> impl Iterator<Item = &VirtualEntry> {
        self.entries.iter().filter(|e| !e.is_file)
    }

    pub fn files(&self) -> impl Iterator<Item = &VirtualEntry> {
        self.entries.iter().filter(|e| e.is_file)
    }

    pub fn file(&self, destination: impl AsRef<Path>) -> Option<&VirtualEntry> {
        let destination = destination.as_ref();
        self.files().find(|e| e.destination == destination)
    }
    /// Replays every entry, in order, onto `target`.
    pub fn apply<M: Materializer>(&self, target: &mut M) -> Result<(), IoError> {
        for entry in &self.entries {
            if entry.is_file {
                let content = entry.content.as_deref().unwrap_or_default();
                target.make_file(&entry.destination, content)?;
            } else {
                target.make_directory(&entry.destination)?;
            }
        }

        Ok(())
    }
}
impl Materializer for VirtualFS {
    fn make_directory(&mut self, path: &Path) -> Result<(), IoError> {
        self.entries.push(VirtualEntry {
            destination: path.to_path_buf(),
            content: None,
            is_file: false,
        });

        Ok(())
    }

    fn make_file(&mut self, path: &Path, content: &str) -> Result<(), IoError> {
        self.entries.push(VirtualEntry {
            destination: path.to_path_buf(),
            content: Some(content.to_string()),
            is_file: true,
        });

        Ok(())
    }
}
