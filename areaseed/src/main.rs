use areaseed::{
    command_argument_builder, db_path_from_args, handle_seed, handle_verify, init_logging,
    report_format_from_args, seed_config_from_args,
};
use areaseed_core::load::{DEFAULT_DB_PATH, SeedConfig};
use areaseed_core::report::ReportFormat;
use colored::Colorize;
use std::path::PathBuf;

fn main() {
    let chosen_command = command_argument_builder().get_matches();
    let quiet = chosen_command.get_flag("quiet");

    init_logging();

    let outcome = match chosen_command.subcommand() {
        Some(("seed", sub_matches)) => handle_seed(
            &seed_config_from_args(sub_matches),
            report_format_from_args(sub_matches),
            quiet,
        )
        .map(|_| true),
        Some(("verify", sub_matches)) => handle_verify(
            &db_path_from_args(sub_matches).unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH)),
            report_format_from_args(sub_matches),
            quiet,
        ),
        // No subcommand: full reseed with the default layout
        None => handle_seed(&SeedConfig::default(), ReportFormat::Text, quiet).map(|_| true),
        _ => unreachable!("clap should ensure we don't get here"),
    };

    match outcome {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{} {:#}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    }
}
