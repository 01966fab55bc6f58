use clap::Parser;

use anyhow::Result;

use wastwalk::audit::{audit, AuditReport, ManifestStatus};
use wastwalk::cli::{handle_error, Args, CliConfig, CliUtils, Commands};
use wastwalk::{convert_testsuite, HarnessError, RunReport};

fn main() {
    let args = Args::parse();
    init_logging(&args);

    let code = match CliConfig::from_args(args) {
        Ok(config) => match execute(&config) {
            Ok(()) => 0,
            Err(e) => {
                match e.downcast_ref::<HarnessError>() {
                    Some(harness) => handle_error(harness),
                    None => CliUtils::show_error(&format!("{:#}", e)),
                }
                1
            }
        },
        Err(e) => {
            handle_error(&e);
            1
        }
    };

    std::process::exit(code);
}

// Structured logging with env-based filter; --verbose raises the default to debug
fn init_logging(args: &Args) {
    let default = if args.verbose {
        "debug"
    } else if args.quiet {
        "error"
    } else {
        "warn"
    };

    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .try_init();
}

fn execute(config: &CliConfig) -> Result<()> {
    match config.command() {
        Commands::Walk => handle_walk(config),
        Commands::Audit => handle_audit(config),
    }
}

fn handle_walk(config: &CliConfig) -> Result<()> {
    let report = convert_testsuite(&config.harness_config)?;

    output_run_report(&report, config.is_quiet());
    if let Some(path) = config.report_path() {
        report.write_json(path)?;
        CliUtils::show_success(&format!("Report written to {}", path.display()), config.is_quiet());
    }

    // Converter failures are reported, never turned into a non-zero exit
    Ok(())
}

fn handle_audit(config: &CliConfig) -> Result<()> {
    let progress = CliUtils::create_progress_bar(config.is_quiet());
    let report = audit(&config.harness_config, &progress)?;

    output_audit_report(&report, config.is_quiet(), config.is_verbose());
    if let Some(path) = config.report_path() {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(&report)?)?;
        CliUtils::show_success(&format!("Report written to {}", path.display()), config.is_quiet());
    }

    Ok(())
}

fn output_run_report(report: &RunReport, quiet: bool) {
    let mut lines = report.summary().into_iter();
    if let Some(headline) = lines.next() {
        let headline = format!(
            "{} in {}",
            headline,
            CliUtils::format_duration(report.elapsed())
        );
        if report.all_succeeded() {
            CliUtils::show_success(&headline, quiet);
        } else {
            CliUtils::show_warning(&headline, quiet);
        }
    }
    for line in lines {
        CliUtils::show_warning(line.trim_start(), quiet);
    }
}

fn output_audit_report(report: &AuditReport, quiet: bool, verbose: bool) {
    for check in &report.manifests {
        match &check.status {
            ManifestStatus::Valid {
                missing_modules, ..
            } if missing_modules.is_empty() => {
                if verbose {
                    CliUtils::show_success(&check.path.display().to_string(), quiet);
                }
            }
            ManifestStatus::Valid {
                missing_modules, ..
            } => {
                for module in missing_modules {
                    CliUtils::show_error(&format!(
                        "{}: missing module {}",
                        check.path.display(),
                        module.display()
                    ));
                }
            }
            ManifestStatus::Invalid { message } => CliUtils::show_error(message),
        }
    }

    for source in &report.missing_manifests {
        CliUtils::show_error(&format!("{}: no artifact produced", source.display()));
    }

    if quiet {
        return;
    }

    println!("\nAudit of {}:", report.output_root.display());
    println!("Valid manifests: {}", report.valid_count());
    println!("Invalid manifests: {}", report.invalid_count());
    println!("Sources without artifact: {}", report.missing_manifests.len());
    for (kind, count) in &report.command_totals {
        println!("  {}: {}", kind, count);
    }
}
