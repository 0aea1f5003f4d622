mod error;
mod logger;

use clap::{AppSettings, ArgEnum, Args, Parser, Subcommand};
use const_format::{formatcp, str_index};
use error::{CliError, CliResult};
use git_version::git_version;
use mathobj::{
    definitions::Definition,
    parser::{parse_entries, Entry},
    proof_state::EntryKind,
    Config, ProofState, Session, TermId,
};
use std::{
    fs::File,
    io::{self, BufRead, IsTerminal},
};

// `git describe --all` will try to find any ref (including tags) that describes the current commit.
// This will include release tags like `mathobj-0.1.0`, so we pass `--exclude 'mathobj-*'` to
// ignore them.
const GIT_BRANCH_NAME: &str = git_version!(
    args = ["--all", "--exclude", "mathobj-*"],
    fallback = "heads/none",
);
const GIT_COMMIT_HASH: &str = git_version!(fallback = "unknown");
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

const VERSION_STRING: &str = formatcp!(
    "{} [git {} {}]",
    APP_VERSION,
    // By default, `git describe` returns something like "heads/main". We ignore the "heads/" part
    // to get only the branch name
    str_index!(GIT_BRANCH_NAME, 6..),
    GIT_COMMIT_HASH,
);

#[derive(Parser)]
#[clap(
    name = "mathobj",
    version = VERSION_STRING,
    setting = AppSettings::DeriveDisplayOrder
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,

    /// Sets the maximum logging level.
    #[clap(arg_enum, global = true, long = "log", default_value_t = LogLevel::Warn)]
    log_level: LogLevel,

    /// Disables output coloring.
    #[clap(global = true, long)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Builds a proof state and prints its context and targets.
    Parse(ParseCommandOptions),

    /// Unfolds the implicit definitions in every target of a proof state.
    Unfold(UnfoldCommandOptions),
}

#[derive(Args)]
struct Input {
    /// The hypotheses stream, with one `object` or `property` entry per context entry. Use `-`
    /// to read it from stdin.
    hypotheses: String,

    /// The targets stream, with one `target` entry per goal. Use `-` to read it from stdin.
    targets: String,
}

#[derive(Args, Clone, Copy)]
struct SessionOptions {
    /// Lets the connective tests recognize a term through an implicit definition.
    #[clap(long)]
    implicit: bool,

    /// Makes the bound variables of parallel sub-expressions share their local context.
    #[clap(long)]
    shared_local_context: bool,

    /// Does not use the name of a variable's type when naming it.
    #[clap(long)]
    no_type_hints: bool,
}

impl From<SessionOptions> for Config {
    fn from(options: SessionOptions) -> Self {
        Config::new()
            .allow_implicit_use_of_definitions(options.implicit)
            .independent_local_contexts(!options.shared_local_context)
            .use_type_name_as_hint(!options.no_type_hints)
    }
}

#[derive(Args)]
struct ParseCommandOptions {
    #[clap(flatten)]
    input: Input,

    #[clap(flatten)]
    session: SessionOptions,
}

#[derive(Args)]
struct UnfoldCommandOptions {
    /// The definitions file, with one `definition` entry per definition.
    definitions: String,

    #[clap(flatten)]
    input: Input,

    #[clap(flatten)]
    session: SessionOptions,
}

#[derive(ArgEnum, Clone)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Off => Self::Off,
            LogLevel::Error => Self::Error,
            LogLevel::Warn => Self::Warn,
            LogLevel::Info => Self::Info,
            LogLevel::Debug => Self::Debug,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let colors_enabled = !cli.no_color && std::io::stderr().is_terminal();

    if let Err(e) = logger::init(cli.log_level.into(), colors_enabled) {
        eprintln!("couldn't set up logger: {}", e);
    }

    let result = match cli.command {
        Command::Parse(options) => parse_command(options),
        Command::Unfold(options) => unfold_command(options),
    };
    if let Err(e) = result {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn reader_from_path(path: &str) -> CliResult<Box<dyn BufRead>> {
    if path == "-" {
        return Ok(Box::new(io::stdin().lock()));
    }
    Ok(Box::new(io::BufReader::new(File::open(path)?)))
}

fn check_stdin_use(paths: &[&str]) -> CliResult<()> {
    if paths.iter().filter(|&&p| p == "-").count() > 1 {
        return Err(CliError::ManyInputsFromStdin);
    }
    Ok(())
}

fn build_proof_state(session: &mut Session, input: &Input) -> CliResult<ProofState> {
    check_stdin_use(&[&input.hypotheses, &input.targets])?;
    let hypotheses = reader_from_path(&input.hypotheses)?;
    let targets = reader_from_path(&input.targets)?;
    let state = ProofState::from_streams(session, hypotheses, targets)?;
    state.name_bound_vars(session);
    Ok(state)
}

fn print_target(session: &Session, target: TermId) {
    let symbol = session.main_symbol(target, true).unwrap_or("atom");
    println!("  [{}] {}", symbol, session.display(target));
}

fn parse_command(options: ParseCommandOptions) -> CliResult<()> {
    let mut session = Session::new(options.session.into());
    let state = build_proof_state(&mut session, &options.input)?;

    println!("context:");
    for entry in &state.context {
        let math_type = entry.math_type(&session);
        let name = entry.name(&session).unwrap_or("_");
        match entry.kind {
            EntryKind::Object => {
                println!("  {} : {}", name, session.display(math_type));
            }
            EntryKind::Property => {
                let symbol = session.main_symbol(math_type, true).unwrap_or("atom");
                println!("  {} : [{}] {}", name, symbol, session.display(math_type));
            }
        }
    }
    println!("targets:");
    for &target in &state.targets {
        print_target(&session, target);
    }
    let domains: Vec<_> = session.number_domains().iter().map(ToString::to_string).collect();
    if !domains.is_empty() {
        println!("number domains: {}", domains.join(", "));
    }
    Ok(())
}

fn unfold_command(options: UnfoldCommandOptions) -> CliResult<()> {
    let mut session = Session::new(options.session.into());

    check_stdin_use(&[&options.definitions, &options.input.hypotheses, &options.input.targets])?;
    let definitions: Vec<Definition> = {
        let entries = parse_entries(&mut session, reader_from_path(&options.definitions)?)?;
        entries
            .into_iter()
            .filter_map(|entry| match entry {
                Entry::Definition(d) => Some(d),
                other => {
                    log::warn!("ignoring '{}' entry in definitions file", other.header());
                    None
                }
            })
            .collect()
    };
    session.load_definitions(definitions);
    log::info!("loaded {} definitions", session.definitions().len());

    let state = build_proof_state(&mut session, &options.input)?;
    for &target in &state.targets {
        println!("target:");
        print_target(&session, target);

        let unfolded = session.unfold_recursively(target)?;
        session.propagate_local_context(unfolded);
        session.name_bound_vars(unfolded);
        println!("unfolded:");
        print_target(&session, unfolded);

        let names: Vec<_> = session
            .matching_definitions(target, true)?
            .into_iter()
            .map(|d| d.name.as_str())
            .collect();
        if !names.is_empty() {
            println!("matching definitions: {}", names.join(", "));
        }
    }
    Ok(())
}
