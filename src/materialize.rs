use crate::errors::{FileOperation, IoError};
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Capability the structure walker uses to create directories and files.
///
/// Paths are relative to the output location. Any error is fatal to the run; nothing that
/// was already created is removed.
pub trait Materializer {
    fn make_directory(&mut self, path: &Path) -> Result<(), IoError>;

    fn make_file(&mut self, path: &Path, content: &str) -> Result<(), IoError>;
}

/// Writes entries below `output_root` on the real filesystem.
#[derive(Debug, Clone)]
pub struct DiskMaterializer {
    output_root: PathBuf,
    created: usize,
}
impl DiskMaterializer {
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
            created: 0,
        }
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }
    /// Number of directories and files created so far.
    pub fn created(&self) -> usize {
        self.created
    }
}
impl Materializer for DiskMaterializer {
    /// Creates all directories in the path if they do not exist, using
    /// [`std::fs::create_dir_all`].
    ///
    /// # Errors
    ///
    /// Returns an [`IoError`] if any directory creation fails.
    fn make_directory(&mut self, path: &Path) -> Result<(), IoError> {
        let final_path = self.output_root.join(path);

        std::fs::create_dir_all(&final_path)
            .map_err(|error| IoError::new(FileOperation::Mkdir, final_path.clone(), error))?;

        log::debug!("created directory {}", final_path.display());

        self.created += 1;

        Ok(())
    }
    /// Writes a file with the provided contents, replacing any existing file, and prints a
    /// `create` line for it.
    ///
    /// # Errors
    ///
    /// Returns an [`IoError`] if writing the file fails.
    fn make_file(&mut self, path: &Path, content: &str) -> Result<(), IoError> {
        let final_path = self.output_root.join(path);

        std::fs::write(&final_path, content)
            .map_err(|error| IoError::new(FileOperation::Write, final_path.clone(), error))?;

        println!("{} {}", "create".green(), final_path.display());

        self.created += 1;

        Ok(())
    }
}
