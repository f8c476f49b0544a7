//! doclint CLI - documentation and declaration consistency checks for C-family code.

use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use doclint::builder::Linter;
use doclint::config::{LintConfig, Strictness};
use doclint::errors::{exit_code, DoclintError};
use doclint::filter::{detect_source_kind, SourceKind};
use doclint::output::{format_functions, format_report, format_tokens, OutputError, OutputFormat};
use doclint::parsed::ParsedFile;
use doclint::xref::{find_header, find_implementation};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "doclint")]
#[command(about = "Check documentation and header consistency of C-family code")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lint a directory or file
    Check {
        /// Root directory or file to check
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// How severely documentation problems are reported
        #[arg(long, value_enum, default_value = "standard")]
        strictness: StrictnessArg,

        /// Check the structure of existing documentation
        #[arg(long)]
        check_format: bool,

        /// Skip header/implementation cross-referencing
        #[arg(long)]
        no_xref: bool,

        /// Compare return and parameter types, not just parameter counts
        #[arg(long)]
        strict_signatures: bool,

        /// Extra subdirectory of include/ or src/ to search when pairing
        #[arg(long = "include-subdir")]
        include_subdirs: Vec<String>,

        /// Skip files matching this glob (relative to PATH)
        #[arg(long)]
        exclude: Vec<String>,

        /// Include hidden files and directories
        #[arg(long)]
        include_hidden: bool,

        /// Maximum directory depth
        #[arg(long)]
        max_depth: Option<usize>,

        /// Print per-file progress to stderr
        #[arg(long, short)]
        verbose: bool,
    },

    /// List the functions found in a file
    Functions {
        /// Source or header file
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Dump the token stream of a file
    Scan {
        /// Source or header file
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the header or implementation paired with a file
    Pair {
        /// Source or header file
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Extra subdirectory of include/ or src/ to search
        #[arg(long = "include-subdir")]
        include_subdirs: Vec<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Clone, ValueEnum)]
enum StrictnessArg {
    Lenient,
    Standard,
    Strict,
}

impl From<StrictnessArg> for Strictness {
    fn from(arg: StrictnessArg) -> Self {
        match arg {
            StrictnessArg::Lenient => Strictness::Lenient,
            StrictnessArg::Standard => Strictness::Standard,
            StrictnessArg::Strict => Strictness::Strict,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let json_output = json_flag(&cli.command);

    let result = match cli.command {
        Commands::Check {
            path,
            json,
            strictness,
            check_format,
            no_xref,
            strict_signatures,
            include_subdirs,
            exclude,
            include_hidden,
            max_depth,
            verbose,
        } => {
            let config = LintConfig::default()
                .with_strictness(strictness.into())
                .with_format_check(check_format)
                .with_cross_reference(!no_xref)
                .with_strict_signatures(strict_signatures)
                .with_include_subdirs(include_subdirs);
            run_check(path, json, config, exclude, include_hidden, max_depth, verbose)
        }
        Commands::Functions { file, json } => run_functions(file, json),
        Commands::Scan { file, json } => run_scan(file, json),
        Commands::Pair {
            file,
            json,
            include_subdirs,
        } => run_pair(file, json, include_subdirs),
        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "doclint", &mut std::io::stdout());
            Ok(true)
        }
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            if json_output {
                #[derive(Serialize)]
                struct ErrorOutput {
                    error: String,
                }

                let payload = ErrorOutput {
                    error: e.to_string(),
                };

                let json = serde_json::to_string(&payload)
                    .unwrap_or_else(|_| "{\"error\":\"serialization failed\"}".to_string());
                eprintln!("{json}");
            } else {
                eprintln!("error: {}", e);
            }
            std::process::exit(exit_code(&e));
        }
    }
}

fn json_flag(cmd: &Commands) -> bool {
    match cmd {
        Commands::Check { json, .. } => *json,
        Commands::Functions { json, .. } => *json,
        Commands::Scan { json, .. } => *json,
        Commands::Pair { json, .. } => *json,
        Commands::Completions { .. } => false,
    }
}

// --- Check command ---

/// Returns `Ok(false)` when violations were found.
fn run_check(
    path: PathBuf,
    json: bool,
    config: LintConfig,
    exclude: Vec<String>,
    include_hidden: bool,
    max_depth: Option<usize>,
    verbose: bool,
) -> Result<bool, DoclintError> {
    let mut linter = Linter::new(path)
        .config(config)
        .exclude(&exclude)
        .include_hidden(include_hidden);
    if let Some(depth) = max_depth {
        linter = linter.max_depth(depth);
    }

    let report = linter.run()?;

    if verbose {
        for file in &report.files {
            eprintln!(
                "checked {}: {} functions, {} violations",
                file.path.display(),
                file.function_count,
                file.violations.len()
            );
        }
    }

    print!("{}", format_report(&report, OutputFormat::from_json_flag(json))?);

    Ok(!report.has_violations())
}

// --- Functions / Scan commands ---

fn parse_existing(file: &Path) -> Result<ParsedFile, DoclintError> {
    if !file.exists() {
        return Err(DoclintError::PathNotFound(file.to_path_buf()));
    }
    Ok(ParsedFile::parse(file)?)
}

fn run_functions(file: PathBuf, json: bool) -> Result<bool, DoclintError> {
    let parsed = parse_existing(&file)?;
    let output = format_functions(
        parsed.path(),
        parsed.functions(),
        OutputFormat::from_json_flag(json),
    )?;
    print!("{}", output);
    Ok(true)
}

fn run_scan(file: PathBuf, json: bool) -> Result<bool, DoclintError> {
    let parsed = parse_existing(&file)?;
    let output = format_tokens(
        parsed.path(),
        parsed.tokens(),
        OutputFormat::from_json_flag(json),
    )?;
    print!("{}", output);
    Ok(true)
}

// --- Pair command ---

#[derive(Serialize)]
struct PairOutput {
    file: PathBuf,
    kind: Option<SourceKind>,
    pair: Option<PathBuf>,
}

fn run_pair(file: PathBuf, json: bool, include_subdirs: Vec<String>) -> Result<bool, DoclintError> {
    if !file.exists() {
        return Err(DoclintError::PathNotFound(file));
    }

    let root = LintConfig::default().search_root();
    let kind = detect_source_kind(&file);
    let pair = match kind {
        Some(SourceKind::Implementation) => find_header(&file, &root, &include_subdirs),
        Some(SourceKind::Header) => find_implementation(&file, &root, &include_subdirs),
        None => None,
    };

    if json {
        let output = PairOutput { file, kind, pair };
        let json = serde_json::to_string_pretty(&output).map_err(OutputError::from)?;
        println!("{json}");
    } else {
        match &pair {
            Some(pair) => println!("{} -> {}", file.display(), pair.display()),
            None => println!("{}: no pair found", file.display()),
        }
    }

    Ok(true)
}
