use anyhow::{Context, Result, bail};
use areaseed_core::data::Database;
use areaseed_core::load::{Loader, SeedConfig, SeedSummary};
use areaseed_core::report::{
    ReportFormat, generate_seed_report, generate_verify_report, to_json,
};
use areaseed_core::verify::{VerifyReport, verify};
use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Log to stderr, filtered by RUST_LOG (default: warn)
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // a second call (tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Expand a leading `~` in a user supplied path
pub fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

pub fn seed_config_from_args(args: &ArgMatches) -> SeedConfig {
    let defaults = SeedConfig::default();
    SeedConfig {
        data_dir: args
            .get_one::<String>("data-dir")
            .map(|d| expand_path(d))
            .unwrap_or(defaults.data_dir),
        db_path: db_path_from_args(args).unwrap_or(defaults.db_path),
        strict: args.get_flag("strict"),
    }
}

pub fn db_path_from_args(args: &ArgMatches) -> Option<PathBuf> {
    args.get_one::<String>("db").map(|p| expand_path(p))
}

pub fn report_format_from_args(args: &ArgMatches) -> ReportFormat {
    args.get_one::<String>("format")
        .and_then(|f| ReportFormat::from_str(f))
        .unwrap_or(ReportFormat::Text)
}

fn spinner() -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

pub fn handle_seed(config: &SeedConfig, format: ReportFormat, quiet: bool) -> Result<SeedSummary> {
    info!(
        data_dir = %config.data_dir.display(),
        db = %config.db_path.display(),
        strict = config.strict,
        "starting seed"
    );

    let db = Database::open(&config.db_path)
        .with_context(|| format!("Failed to open database {}", config.db_path.display()))?;
    let mut loader = Loader::new(db, config.clone());

    let progress = if quiet { None } else { Some(spinner()?) };
    if let Some(pb) = &progress {
        let pb = pb.clone();
        loader = loader.with_progress_callback(Arc::new(move |msg: String| pb.set_message(msg)));
    }

    let result = loader.run();

    if let Some(pb) = &progress {
        pb.finish_and_clear();
    }
    let summary = result.context("Seed aborted; re-run to rebuild the table from scratch")?;

    match format {
        ReportFormat::Json => println!("{}", to_json(&summary)?),
        ReportFormat::Text => {
            if !quiet {
                println!("{} Seed complete!\n", "✓".green().bold());
            }
            print!("{}", generate_seed_report(&summary));
        }
    }

    Ok(summary)
}

/// Returns `Ok(false)` when the table loads but breaks the hierarchy invariants
pub fn handle_verify(db_path: &Path, format: ReportFormat, quiet: bool) -> Result<bool> {
    if !Database::exists(db_path) {
        bail!("No database at {}", db_path.display());
    }

    let db = Database::open_read_only(db_path)
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;
    info!(db = %db_path.display(), journal_mode = %db.journal_mode()?, "verifying");
    if !db.table_exists()? {
        bail!(
            "{} has no area table; run `areaseed seed` first",
            db_path.display()
        );
    }

    let report: VerifyReport = verify(&db).context("Verification query failed")?;

    match format {
        ReportFormat::Json => println!("{}", to_json(&report)?),
        ReportFormat::Text => {
            print!("{}", generate_verify_report(&report));
            if !quiet {
                if report.is_valid() {
                    println!("{} {} is consistent", "✓".green().bold(), db_path.display());
                } else {
                    println!(
                        "{} {} has {} violation(s)",
                        "✗".red().bold(),
                        db_path.display(),
                        report.violation_count()
                    );
                }
            }
        }
    }

    Ok(report.is_valid())
}
