use crate::errors::{FileOperation, IoError};
use miette::Diagnostic;
use serde::Deserialize;
use std::{
    fmt, fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

pub const DEFAULT_VARIABLES_FILE: &str = "./specification/variables.pgen";
pub const DEFAULT_STRUCTURE_FILE: &str = "./specification/structure.pgen";
pub const DEFAULT_CONTENT_FILE: &str = "./specification/content.pgen";
pub const DEFAULT_OUTPUT_DIRECTORY: &str = "./out";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputRole {
    Variables,
    Structure,
    Content,
}
impl InputRole {
    pub fn as_str(&self) -> &str {
        match self {
            InputRole::Variables => "variables",
            InputRole::Structure => "structure",
            InputRole::Content => "content",
        }
    }
}
impl fmt::Display for InputRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("{role} file not found at '{path}'")]
    #[diagnostic(
        code(pgen::config::missing_input),
        help("Pass the file location on the command line or in the config file")
    )]
    MissingInput { role: InputRole, path: PathBuf },

    #[error("I/O error within config domain")]
    #[diagnostic(code(pgen::config::io))]
    Io(#[from] IoError),

    #[error("Unable to parse toml file at '{path}': {source}")]
    #[diagnostic(code(pgen::config::parse_toml), help("Review toml file"))]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Settings for one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub variables_file: PathBuf,
    pub structure_file: PathBuf,
    pub content_file: PathBuf,
    pub output_directory: PathBuf,
    /// Fail on placeholders with no matching variable.
    pub strict: bool,
    /// Print the planned tree instead of writing it.
    pub dry_run: bool,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            variables_file: PathBuf::from(DEFAULT_VARIABLES_FILE),
            structure_file: PathBuf::from(DEFAULT_STRUCTURE_FILE),
            content_file: PathBuf::from(DEFAULT_CONTENT_FILE),
            output_directory: PathBuf::from(DEFAULT_OUTPUT_DIRECTORY),
            strict: false,
            dry_run: false,
        }
    }
}
impl Config {
    /// Overrides every setting present in `file`.
    pub fn merge(mut self, file: ConfigFile) -> Self {
        if let Some(path) = file.variables {
            self.variables_file = path;
        }
        if let Some(path) = file.structure {
            self.structure_file = path;
        }
        if let Some(path) = file.content {
            self.content_file = path;
        }
        if let Some(path) = file.output {
            self.output_directory = path;
        }
        if let Some(strict) = file.strict {
            self.strict = strict;
        }

        self
    }
}

/// Optional `pgen.toml`. Relative paths are resolved against the directory holding it.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub variables: Option<PathBuf>,
    pub structure: Option<PathBuf>,
    pub content: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub strict: Option<bool>,
}
impl ConfigFile {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let content = fs::read_to_string(path)
            .map_err(|error| IoError::new(FileOperation::Read, path.to_path_buf(), error))?;

        let parsed: ConfigFile =
            toml::from_str(&content).map_err(|err| ConfigError::ParseToml {
                path: path.to_path_buf(),
                source: err,
            })?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));

        Ok(parsed.relative_to(base))
    }

    fn relative_to(self, base: &Path) -> Self {
        let rebase = |p: Option<PathBuf>| p.map(|p| if p.is_absolute() { p } else { base.join(p) });

        Self {
            variables: rebase(self.variables),
            structure: rebase(self.structure),
            content: rebase(self.content),
            output: rebase(self.output),
            strict: self.strict,
        }
    }
}

/// The three input texts, read before anything is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inputs {
    pub variables: String,
    pub structure: String,
    pub content: String,
}
impl Inputs {
    pub fn load(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            variables: read_input(InputRole::Variables, &config.variables_file)?,
            structure: read_input(InputRole::Structure, &config.structure_file)?,
            content: read_input(InputRole::Content, &config.content_file)?,
        })
    }
}

fn read_input(role: InputRole, path: &Path) -> Result<String, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::MissingInput {
            role,
            path: path.to_path_buf(),
        });
    }

    log::debug!("reading {role} file from {}", path.display());

    let text = fs::read_to_string(path)
        .map_err(|error| IoError::new(FileOperation::Read, path.to_path_buf(), error))?;

    Ok(text)
}
