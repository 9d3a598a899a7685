use crate::{
    content::ContentStore,
    errors::IoError,
    interpolate::{InterpolateError, Interpolator},
    materialize::Materializer,
    DIRECTORY_INDICATOR,
};
use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum StructureError {
    #[error("structure file has no entries")]
    #[diagnostic(
        code(pgen::structure::empty),
        help("The first line must name the root directory, e.g. 'my-project/'")
    )]
    Empty,

    #[error("root entry '{line}' on line {line_number} is not a directory")]
    #[diagnostic(
        code(pgen::structure::root_not_directory),
        help("Mark the root entry as a directory with a trailing '|' or '/'")
    )]
    RootNotDirectory { line_number: usize, line: String },

    #[error("line {line_number} is nested {depth} level(s) deep, at most {allowed} is allowed here")]
    #[diagnostic(
        code(pgen::structure::depth),
        help("Every entry must be a direct child of the closest directory above it. Indent by one tab at a time.")
    )]
    Depth {
        line_number: usize,
        depth: usize,
        allowed: usize,
    },

    #[error("line {line_number} is indented less than the root entry ({depth} < {root_depth})")]
    #[diagnostic(code(pgen::structure::above_root))]
    AboveRoot {
        line_number: usize,
        depth: usize,
        root_depth: usize,
    },

    #[error("line {line_number} has an empty name")]
    #[diagnostic(code(pgen::structure::empty_name))]
    EmptyName { line_number: usize },

    #[error("line {line_number} names '{name}', which is not a single path segment")]
    #[diagnostic(
        code(pgen::structure::invalid_name),
        help("Put one directory or file per line and express nesting with tabs, not '/'")
    )]
    InvalidName { line_number: usize, name: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Interpolate(#[from] InterpolateError),

    #[error("I/O error while materializing the structure")]
    #[diagnostic(code(pgen::structure::io))]
    Io(#[from] IoError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
}

/// One non-blank line of a structure file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructureLine<'a> {
    pub line_number: usize,
    /// Number of leading tabs.
    pub depth: usize,
    pub kind: EntryKind,
    rest: &'a str,
}
impl<'a> StructureLine<'a> {
    /// Returns `None` for blank lines.
    pub fn parse(line_number: usize, raw: &'a str) -> Option<Self> {
        let raw = raw.strip_suffix('\r').unwrap_or(raw);

        if raw.trim().is_empty() {
            return None;
        }

        let rest = raw.trim_start_matches('\t');
        let depth = raw.len() - rest.len();
        let rest = rest.trim_end();

        let kind = if rest.contains(DIRECTORY_INDICATOR) || rest.ends_with('/') {
            EntryKind::Directory
        } else {
            EntryKind::File
        };

        Some(Self {
            line_number,
            depth,
            kind,
            rest,
        })
    }

    pub fn name(&self) -> &'a str {
        self.name_as(self.kind)
    }
    /// Name of the entry read as `kind`. The symbolic view of a line is always read with
    /// the kind of its specific view.
    pub fn name_as(&self, kind: EntryKind) -> &'a str {
        match kind {
            EntryKind::File => self.rest,
            EntryKind::Directory => match self.rest.find(DIRECTORY_INDICATOR) {
                Some(index) => &self.rest[..index],
                None => self.rest.trim_end_matches('/'),
            },
        }
    }
}

fn is_path_segment(name: &str) -> bool {
    !name.contains(['/', '\\']) && name != "." && name != ".."
}

/// A directory as seen in both views: with placeholders and with their values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub symbolic: String,
    pub specific: String,
}

/// Stack of the currently open directories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathContext {
    frames: Vec<Frame>,
}
impl PathContext {
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    pub fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    pub fn pop(&mut self, levels: usize) {
        let keep = self.frames.len().saturating_sub(levels);
        self.frames.truncate(keep);
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn specific_path(&self) -> PathBuf {
        self.frames.iter().map(|f| f.specific.as_str()).collect()
    }
    /// Symbolic identifier of `file_name` inside the current directory, e.g.
    /// `root/hello/•name•.txt`.
    pub fn symbolic_key(&self, file_name: &str) -> String {
        let mut key: String = self
            .frames
            .iter()
            .map(|f| format!("{}/", f.symbolic))
            .collect();
        key.push_str(file_name);
        key
    }
}

/// Counts reported after a successful walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkSummary {
    pub directories: usize,
    pub files: usize,
    /// Symbolic identifiers of files written without a content entry.
    pub missing_content: Vec<String>,
}

/// Walks an indentation-encoded structure and materializes it.
///
/// The symbolic view is the structure text as written; the specific view is the same
/// line with placeholders substituted. Directories are pushed onto a [`PathContext`] holding
/// both views, so a file is written to its specific path while its content is looked up by
/// its symbolic identifier.
pub struct StructureWalker<'a> {
    interpolator: &'a Interpolator,
    content: &'a ContentStore,
}

struct WalkState {
    context: PathContext,
    root_depth: usize,
}
impl WalkState {
    /// Deepest indentation the next line may use.
    fn allowed_depth(&self) -> usize {
        self.root_depth + self.context.len()
    }
}

impl<'a> StructureWalker<'a> {
    pub fn new(interpolator: &'a Interpolator, content: &'a ContentStore) -> Self {
        Self {
            interpolator,
            content,
        }
    }
    /// Walks `structure` top to bottom and creates every entry on `target`.
    ///
    /// # Errors
    ///
    /// Returns a [`StructureError`] on the first invalid line; entries before it have
    /// already been handed to `target`.
    pub fn walk<M: Materializer>(
        &self,
        structure: &str,
        target: &mut M,
    ) -> Result<WalkSummary, StructureError> {
        let mut summary = WalkSummary::default();
        let mut walk_state: Option<WalkState> = None;

        for (index, raw) in structure.lines().enumerate() {
            let line_number = index + 1;
            let specific_raw = self.interpolator.try_interpolate(raw)?;

            let Some(specific) = StructureLine::parse(line_number, &specific_raw) else {
                continue;
            };
            let Some(symbolic) = StructureLine::parse(line_number, raw) else {
                continue;
            };

            let frame = || Frame {
                symbolic: symbolic.name_as(specific.kind).to_string(),
                specific: specific.name().to_string(),
            };

            if specific.name().is_empty() {
                return Err(StructureError::EmptyName { line_number });
            }

            if !is_path_segment(specific.name()) {
                return Err(StructureError::InvalidName {
                    line_number,
                    name: specific.name().to_string(),
                });
            }

            if walk_state.is_none() {
                if specific.kind != EntryKind::Directory {
                    return Err(StructureError::RootNotDirectory {
                        line_number,
                        line: raw.trim().to_string(),
                    });
                }

                let mut context = PathContext::new();
                context.push(frame());
                target.make_directory(&context.specific_path())?;
                summary.directories += 1;

                log::debug!("root '{}' at depth {}", specific.name(), specific.depth);

                walk_state = Some(WalkState {
                    context,
                    root_depth: specific.depth,
                });
                continue;
            }
            let Some(state) = walk_state.as_mut() else {
                continue;
            };

            let current = specific.depth;
            if current < state.root_depth {
                return Err(StructureError::AboveRoot {
                    line_number,
                    depth: current,
                    root_depth: state.root_depth,
                });
            }

            let allowed = state.allowed_depth();
            if current > allowed {
                return Err(StructureError::Depth {
                    line_number,
                    depth: current,
                    allowed,
                });
            }

            log::debug!("line {line_number}: depth {current}, at most {allowed}");

            // close every directory at or below the new entry's depth
            state.context.pop(allowed - current);

            match specific.kind {
                EntryKind::Directory => {
                    state.context.push(frame());
                    target.make_directory(&state.context.specific_path())?;
                    summary.directories += 1;
                }
                EntryKind::File => {
                    let path = state.context.specific_path().join(specific.name());
                    let key = state.context.symbolic_key(symbolic.name_as(EntryKind::File));

                    if self.content.get(&key).is_none() {
                        log::debug!("no content for '{key}', writing an empty file");
                        summary.missing_content.push(key.clone());
                    }

                    target.make_file(&path, self.content.content_for(&key))?;
                    summary.files += 1;
                }
            }
        }

        if walk_state.is_none() {
            return Err(StructureError::Empty);
        }

        Ok(summary)
    }
}
