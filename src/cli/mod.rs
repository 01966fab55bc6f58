//! Command-line interface module

use clap::{Parser, Subcommand};
use console::style;
use std::path::PathBuf;
use std::time::Duration;

use crate::cli::path_mapping::normalize;
use crate::conversion::config::{DEFAULT_EXE, DEFAULT_EXTENSION, DEFAULT_OUTPUT, DEFAULT_TESTSUITE};
use crate::conversion::HarnessConfig;
use crate::error::{HarnessError, HarnessErrorKind, HarnessResult};

pub mod path_mapping;

/// Main CLI arguments
#[derive(Parser, Debug, Clone)]
#[command(name = "wastwalk")]
#[command(about = "Convert every .wast script in a test suite to JSON with wast2json")]
#[command(version)]
#[command(long_about = None)]
pub struct Args {
    /// Directory holding the test suite and the converter (default: current directory)
    #[arg(long, env = "WASTWALK_ROOT")]
    pub root: Option<PathBuf>,

    /// Test-suite directory name; replaced by --output-dir in output paths
    #[arg(long, env = "WASTWALK_TESTSUITE", default_value = DEFAULT_TESTSUITE)]
    pub testsuite: String,

    /// Output directory name mirroring the test suite
    #[arg(long, env = "WASTWALK_OUTPUT", default_value = DEFAULT_OUTPUT)]
    pub output_dir: String,

    /// Converter executable (default: <root>/wast2json.exe)
    #[arg(long, env = "WASTWALK_EXE")]
    pub exe: Option<PathBuf>,

    /// File-name suffix selecting source scripts
    #[arg(long, default_value = DEFAULT_EXTENSION)]
    pub extension: String,

    /// Also write the end-of-run report as JSON to this file
    #[arg(long, global = true)]
    pub report: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// CLI subcommands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Convert every source script (the default)
    Walk,
    /// Check the artifacts already in the output tree
    Audit,
}

/// CLI configuration
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub args: Args,
    pub harness_config: HarnessConfig,
}

impl CliConfig {
    /// Create CLI configuration from arguments
    pub fn from_args(args: Args) -> HarnessResult<Self> {
        let harness_config = Self::create_harness_config(&args)?;

        Ok(Self {
            args,
            harness_config,
        })
    }

    fn create_harness_config(args: &Args) -> HarnessResult<HarnessConfig> {
        let cwd = std::env::current_dir().map_err(|e| HarnessError::io(".", e))?;
        let root = match &args.root {
            Some(root) => normalize(&cwd.join(root)),
            None => cwd,
        };
        let exe = match &args.exe {
            Some(exe) => normalize(&root.join(exe)),
            None => root.join(DEFAULT_EXE),
        };

        let config = HarnessConfig {
            root,
            testsuite: args.testsuite.clone(),
            output: args.output_dir.clone(),
            exe,
            extension: args.extension.clone(),
        };

        config
            .validate()
            .map_err(|e| HarnessError::new(HarnessErrorKind::configuration(e)))?;

        Ok(config)
    }

    pub fn command(&self) -> Commands {
        self.args.command.clone().unwrap_or(Commands::Walk)
    }

    /// Check if quiet mode is enabled
    pub fn is_quiet(&self) -> bool {
        self.args.quiet
    }

    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.args.verbose
    }

    pub fn report_path(&self) -> Option<&PathBuf> {
        self.args.report.as_ref()
    }
}

/// CLI utilities and helpers
pub struct CliUtils;

impl CliUtils {
    /// Format a duration in human-readable format
    pub fn format_duration(duration: Duration) -> String {
        let total_millis = duration.as_millis();

        if total_millis < 1000 {
            format!("{}ms", total_millis)
        } else if total_millis < 60_000 {
            format!("{:.1}s", total_millis as f64 / 1000.0)
        } else {
            let minutes = total_millis / 60_000;
            let seconds = (total_millis % 60_000) / 1000;
            format!("{}m {}s", minutes, seconds)
        }
    }

    /// Create a progress bar, hidden when quiet or not on a terminal
    pub fn create_progress_bar(quiet: bool) -> indicatif::ProgressBar {
        if quiet || !atty::is(atty::Stream::Stderr) {
            return indicatif::ProgressBar::hidden();
        }

        let pb = indicatif::ProgressBar::new(0);
        if let Ok(bar_style) = indicatif::ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(bar_style.progress_chars("#>-"));
        }
        pb
    }

    /// Show a success message (if not in quiet mode)
    pub fn show_success(message: &str, quiet: bool) {
        if !quiet {
            println!("{} {}", Self::paint("✓", Tone::Good), message);
        }
    }

    /// Show an error message
    pub fn show_error(message: &str) {
        eprintln!("{} {}", Self::paint("✗", Tone::Bad), message);
    }

    /// Show a warning message (if not in quiet mode)
    pub fn show_warning(message: &str, quiet: bool) {
        if !quiet {
            eprintln!("{} {}", Self::paint("⚠", Tone::Warn), message);
        }
    }

    /// Check if output should be colored
    pub fn should_use_color() -> bool {
        atty::is(atty::Stream::Stdout) && std::env::var("NO_COLOR").is_err()
    }

    fn paint(marker: &str, tone: Tone) -> String {
        if !Self::should_use_color() {
            return marker.to_string();
        }
        let styled = match tone {
            Tone::Good => style(marker).green(),
            Tone::Bad => style(marker).red().bold(),
            Tone::Warn => style(marker).yellow(),
        };
        styled.force_styling(true).to_string()
    }
}

enum Tone {
    Good,
    Bad,
    Warn,
}

/// Handle CLI errors with user-friendly messages
pub fn handle_error(error: &HarnessError) {
    CliUtils::show_error(&error.user_message());

    match error.kind() {
        Some(HarnessErrorKind::RootNotFound { .. }) => {
            eprintln!("\nTip: Run from the directory containing the test suite, or pass --root");
        }
        Some(HarnessErrorKind::OutputNotFound { .. }) => {
            eprintln!("\nTip: Run 'wastwalk' first to populate the output directory");
        }
        Some(HarnessErrorKind::Configuration { .. }) => {
            eprintln!("\nTip: Check --testsuite, --output-dir and --extension");
        }
        _ => {}
    }

    eprintln!("\nTry 'wastwalk --help' for usage information.");
}
