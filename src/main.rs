use clap::{
    crate_authors, crate_description, crate_name, crate_version, value_parser, Arg, ArgAction,
    ArgMatches, Command,
};
use pgen::config::{
    Config, ConfigFile, DEFAULT_CONTENT_FILE, DEFAULT_OUTPUT_DIRECTORY, DEFAULT_STRUCTURE_FILE,
    DEFAULT_VARIABLES_FILE,
};
use std::path::PathBuf;

// The CLI layer should only parse inputs and forward them to library code.
fn main() -> miette::Result<()> {
    let matches = Command::new(crate_name!())
        .about(crate_description!())
        .author(crate_authors!())
        .version(crate_version!())
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("variables")
                .short('v')
                .long("variables")
                .value_parser(value_parser!(PathBuf))
                .help(format!(
                    "The location of the project variables file [default: {DEFAULT_VARIABLES_FILE}]"
                )),
        )
        .arg(
            Arg::new("structure")
                .short('s')
                .long("structure")
                .value_parser(value_parser!(PathBuf))
                .help(format!(
                    "The location of the project structure file [default: {DEFAULT_STRUCTURE_FILE}]"
                )),
        )
        .arg(
            Arg::new("content")
                .short('c')
                .long("content")
                .value_parser(value_parser!(PathBuf))
                .help(format!(
                    "The location of the project content file [default: {DEFAULT_CONTENT_FILE}]"
                )),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_parser(value_parser!(PathBuf))
                .help(format!(
                    "The directory the generated project is written to [default: {DEFAULT_OUTPUT_DIRECTORY}]"
                )),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_parser(value_parser!(PathBuf))
                .help("A toml file providing any of the locations above"),
        )
        .arg(
            Arg::new("strict")
                .long("strict")
                .help("Fail on placeholders that have no matching variable")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .help("Print the project tree without writing it")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    init_logger(matches.get_flag("verbose"));

    let config = build_config(&matches)?;

    log::debug!("{config:?}");

    pgen::generate(&config)?;

    if !config.dry_run {
        println!("Project created.");
    }

    Ok(())
}

fn init_logger(is_verbose: bool) {
    let level = if is_verbose { "debug" } else { "info" };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn build_config(args: &ArgMatches) -> Result<Config, pgen::PgenError> {
    let mut config = Config::default();

    if let Some(path) = args.get_one::<PathBuf>("config") {
        config = config.merge(ConfigFile::from_file(path).map_err(pgen::PgenError::from)?);
    }

    if let Some(path) = args.get_one::<PathBuf>("variables") {
        config.variables_file = path.clone();
    }
    if let Some(path) = args.get_one::<PathBuf>("structure") {
        config.structure_file = path.clone();
    }
    if let Some(path) = args.get_one::<PathBuf>("content") {
        config.content_file = path.clone();
    }
    if let Some(path) = args.get_one::<PathBuf>("output") {
        config.output_directory = path.clone();
    }
    if args.get_flag("strict") {
        config.strict = true;
    }
    config.dry_run = args.get_flag("dry-run");

    Ok(config)
}
