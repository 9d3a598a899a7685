use crate::{
    config::{self, Config, Inputs},
    content::{self, ContentStore},
    errors::IoError,
    interpolate::{self, Interpolator},
    materialize::DiskMaterializer,
    preview::preview_as_tree,
    structure::{self, StructureWalker, WalkSummary},
    variables::{self, VariableTable},
    vfs::VirtualFS,
};

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum PgenError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Variables(#[from] variables::VariableParseError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Content(#[from] content::ContentError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Interpolate(#[from] interpolate::InterpolateError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Structure(#[from] structure::StructureError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Io(#[from] IoError),
}

/// A validated project tree, ready to be written.
#[derive(Debug, Clone)]
pub struct Generation {
    pub plan: VirtualFS,
    pub summary: WalkSummary,
}

/// Builds the full project tree in memory from already loaded inputs.
///
/// Nothing touches the disk, so a malformed structure is reported before any directory
/// or file exists.
///
/// # Errors
///
/// Returns a [`PgenError`] if:
///
/// - A variables line is not a single `name=value` pair.
/// - A content segment has no body.
/// - A structure line is nested too deep, or the root is not a directory.
/// - `strict` is set and a placeholder has no matching variable.
pub fn plan(inputs: &Inputs, strict: bool) -> Result<Generation, PgenError> {
    let variables = VariableTable::parse(&inputs.variables)?;

    let interpolator = Interpolator::new(&variables).strict(strict);

    let content = ContentStore::parse(&inputs.content)?.resolve(&interpolator)?;

    let mut plan = VirtualFS::new();

    let summary = StructureWalker::new(&interpolator, &content).walk(&inputs.structure, &mut plan)?;

    log::debug!(
        "planned {} director(y/ies) and {} file(s), {} without content",
        summary.directories,
        summary.files,
        summary.missing_content.len()
    );

    Ok(Generation { plan, summary })
}

/// Reads the inputs named by `config` and generates the project below its output directory.
///
/// With `dry_run` set the planned tree is printed instead of written.
///
/// # Errors
///
/// Returns a [`PgenError`] if an input file is missing or unreadable, if planning fails
/// (see [`plan`]) or if a directory or file cannot be created. Entries written before an
/// I/O failure are left in place.
pub fn generate(config: &Config) -> Result<Generation, PgenError> {
    let inputs = Inputs::load(config)?;

    let generation = plan(&inputs, config.strict)?;

    if config.dry_run {
        preview_as_tree(&generation.plan, &config.output_directory);

        return Ok(generation);
    }

    let mut disk = DiskMaterializer::new(&config.output_directory);

    generation.plan.apply(&mut disk)?;

    log::info!(
        "created {} entries in {}",
        disk.created(),
        disk.output_root().display()
    );

    Ok(generation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs, path::Path};

    fn inputs(variables: &str, structure: &str, content: &str) -> Inputs {
        Inputs {
            variables: variables.to_string(),
            structure: structure.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_plan_substitutes_paths_and_content() {
        let generation = plan(
            &inputs(
                "name=Widget\n",
                "root/\n\thello|\n\t\t•name•.txt\n",
                "•••\nroot/hello/•name•.txt\nThis is •name•.\n",
            ),
            false,
        )
        .unwrap();

        let file = generation
            .plan
            .file(Path::new("root").join("hello").join("Widget.txt"))
            .unwrap();
        assert_eq!(file.content.as_deref(), Some("This is Widget.\n"));
    }

    #[test]
    fn test_plan_unmatched_content_gives_empty_files() {
        let generation = plan(
            &inputs(
                "",
                "root/\n\ta.txt\n\tb.txt\n",
                "•••\nsomewhere/else.txt\nunused\n",
            ),
            false,
        )
        .unwrap();

        assert!(generation
            .plan
            .files()
            .all(|f| f.content.as_deref() == Some("")));
        assert_eq!(generation.summary.missing_content.len(), 2);
    }

    #[test]
    fn test_plan_reports_variable_errors() {
        let err = plan(&inputs("broken\n", "root/\n", ""), false).unwrap_err();

        assert!(matches!(err, PgenError::Variables(_)));
    }

    #[test]
    fn test_plan_reports_malformed_content() {
        let err = plan(&inputs("", "root/\n", "•••\nno-body"), false).unwrap_err();

        assert!(matches!(err, PgenError::Content(_)));
    }

    #[test]
    fn test_plan_strict_checks_content_bodies() {
        let err = plan(
            &inputs("", "root/\n\ta.txt\n", "root/a.txt\n•missing•\n"),
            true,
        )
        .unwrap_err();

        assert!(matches!(err, PgenError::Interpolate(_)));
    }

    #[test]
    fn test_generate_depth_error_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("variables.pgen"), "").unwrap();
        fs::write(
            dir.path().join("structure.pgen"),
            "root/\n\ta|\n\t\t\tb|\n",
        )
        .unwrap();
        fs::write(dir.path().join("content.pgen"), "").unwrap();

        let config = Config {
            variables_file: dir.path().join("variables.pgen"),
            structure_file: dir.path().join("structure.pgen"),
            content_file: dir.path().join("content.pgen"),
            output_directory: dir.path().join("out"),
            ..Config::default()
        };

        let err = generate(&config).unwrap_err();

        assert!(matches!(
            err,
            PgenError::Structure(structure::StructureError::Depth { .. })
        ));
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_generate_writes_tree() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("variables.pgen"), "name=Widget\n").unwrap();
        fs::write(
            dir.path().join("structure.pgen"),
            "root/\n\thello|\n\t\t•name•.txt\n\tempty|\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("content.pgen"),
            "•••\nroot/hello/•name•.txt\nHello •name•\n",
        )
        .unwrap();

        let config = Config {
            variables_file: dir.path().join("variables.pgen"),
            structure_file: dir.path().join("structure.pgen"),
            content_file: dir.path().join("content.pgen"),
            output_directory: dir.path().join("out"),
            ..Config::default()
        };

        generate(&config).unwrap();

        let out = dir.path().join("out");
        assert_eq!(
            fs::read_to_string(out.join("root/hello/Widget.txt")).unwrap(),
            "Hello Widget\n"
        );
        assert!(out.join("root/empty").is_dir());
    }

    #[test]
    fn test_generate_dry_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("variables.pgen"), "").unwrap();
        fs::write(dir.path().join("structure.pgen"), "root/\n\ta.txt\n").unwrap();
        fs::write(dir.path().join("content.pgen"), "").unwrap();

        let config = Config {
            variables_file: dir.path().join("variables.pgen"),
            structure_file: dir.path().join("structure.pgen"),
            content_file: dir.path().join("content.pgen"),
            output_directory: dir.path().join("out"),
            dry_run: true,
            ..Config::default()
        };

        let generation = generate(&config).unwrap();

        assert_eq!(generation.plan.entries.len(), 2);
        assert!(!dir.path().join("out").exists());
    }
}
