use legal_mentions::explorer::{CheckReport, FileCheck, FileOutcome};

// ANSI color codes
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

/// Human-readable output of the checker.
///
/// Informational lines go to stdout, errors to stderr. Verbosity is fixed at
/// construction and also selects the log level of library diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct Console {
    verbose: bool,
}

impl Console {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Install the logger: `info` by default, `debug` when verbose.
    /// `RUST_LOG` still wins when set.
    pub fn init_logging(&self) {
        let log_level = if self.verbose { "debug" } else { "info" };
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
            .format_timestamp(None)
            .init();
    }

    pub fn welcome(&self) {
        println!(
            "{BOLD}legal-mentions-checker{RESET} {DIM}v{}{RESET}",
            env!("CARGO_PKG_VERSION")
        );
    }

    pub fn bye(&self) {
        println!("{DIM}Bye!{RESET}");
    }

    pub fn write(&self, message: &str) {
        println!("{message}");
    }

    pub fn error(&self, message: &str) {
        eprintln!("{RED}{message}{RESET}");
    }

    /// Printed only in verbose mode.
    pub fn verbose(&self, message: &str) {
        if self.verbose {
            println!("{DIM}{message}{RESET}");
        }
    }

    pub fn bad_command_line(&self) {
        self.error("Bad command line. Use --help for usage.");
    }

    /// Per-file summary, then the overall verdict.
    pub fn report(&self, report: &CheckReport) {
        if report.is_empty() {
            self.write("⚠️  No file matched the filter, nothing was checked");
        }

        for check in &report.files {
            if check.is_suitable() {
                if let Some(group) = check.matched_group {
                    self.verbose(&format!("✔ {} ({group})", check.path.display()));
                }
            } else {
                self.write(&format!(
                    "❌ It seems the file at {} does not have in metadata the mention {DIM}({}){RESET}",
                    check.path.display(),
                    describe(check)
                ));
            }
        }

        self.verbose(&format!(
            "{} of {} file(s) contain the mention",
            report.suitable_count(),
            report.len()
        ));

        if report.all_suitable() {
            self.write(&format!(
                "{GREEN}✅ SUCCESS ✅: All files contain legal mention in metadata{RESET}"
            ));
        } else {
            self.write(&format!(
                "{RED}🚨 FAILURE 🚨: There is at least one file without legal mention in metadata{RESET}"
            ));
        }
    }
}

fn describe(check: &FileCheck) -> String {
    match &check.outcome {
        FileOutcome::Suitable => "ok".to_string(),
        FileOutcome::MissingMention => "mention not found".to_string(),
        FileOutcome::NoMetadata => "no metadata".to_string(),
        FileOutcome::ReadFailed(e) => format!("read error: {e}"),
        FileOutcome::DecodeFailed(e) => format!("decode error: {e}"),
    }
}
