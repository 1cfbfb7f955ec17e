mod console;

use anyhow::Result;
use clap::Parser;
use clap::error::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use console::Console;
use legal_mentions::checker::{self, LegalMentionsChecker};
use legal_mentions::config::CheckerConfig;

/// Help or version displayed, or config written.
const EXIT_DONE: u8 = 0;
/// At least one file misses the mention.
const EXIT_FAILURE: u8 = 1;
/// Every file carries the mention.
const EXIT_SUCCESS: u8 = 2;
/// Malformed arguments or failed pre-checks (-1 for the shell).
const EXIT_ERROR: u8 = 255;

const DEFAULT_CONFIG_FILE: &str = "legal-mentions.json";

#[derive(Parser, Debug)]
#[command(
    name = "legal-mentions-checker",
    version,
    about = "Check that every image in a folder carries the expected legal mention in its metadata",
    after_help = "Exit codes: 0 help/version, 1 a file misses the mention, 2 all files contain it, -1 bad arguments"
)]
struct Cli {
    /// Folder to look into, recursively
    #[arg(long, value_name = "PATH", required_unless_present = "init")]
    folder: Option<String>,

    /// Exact copyright / credit line expected in the metadata
    #[arg(long, value_name = "TEXT", required_unless_present = "init")]
    mention: Option<String>,

    /// Regular expression selecting the files to check (default: png|PNG)
    #[arg(long, value_name = "REGEX")]
    filter: Option<String>,

    /// Path to a JSON config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write a default config file and exit
    #[arg(long)]
    init: bool,

    /// Print the per-file report as JSON
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::from(EXIT_DONE),
                _ => {
                    Console::new(false).bad_command_line();
                    ExitCode::from(EXIT_ERROR)
                }
            };
        }
    };

    let console = Console::new(cli.verbose);
    console.init_logging();

    match run(&cli, &console) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            console.error(&format!("{e:#}"));
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn run(cli: &Cli, console: &Console) -> Result<u8> {
    // Handle --init
    if cli.init {
        let path = cli
            .config
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        CheckerConfig::default().save(&path)?;
        println!("Default config written to {}", path.display());
        return Ok(EXIT_DONE);
    }

    let folder = cli.folder.as_deref().unwrap_or_default();
    let mention = cli.mention.as_deref().unwrap_or_default();
    checker::preflight(folder, mention)?;

    let mut config = match cli.config.as_deref() {
        Some(path) => CheckerConfig::load(path)?,
        None => CheckerConfig::default(),
    };
    if let Some(ref filter) = cli.filter {
        config.filter = filter.clone();
    }

    let checker = LegalMentionsChecker::from_config(&config)?;

    if !cli.json {
        console.welcome();
        console.write(&format!(
            "Will look in folder '{folder}' for mention '{mention}'"
        ));
        console.verbose(&format!("Files filtered with '{}'", checker.filter()));
    }

    let report = checker.look_in(Path::new(folder), mention)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        console.report(&report);
        console.bye();
    }

    Ok(if report.all_suitable() { EXIT_SUCCESS } else { EXIT_FAILURE })
}
