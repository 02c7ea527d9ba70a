use areaseed_core::load::{DEFAULT_DATA_DIR, DEFAULT_DB_PATH};
use clap::{arg, command};

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

fn db_arg() -> clap::Arg {
    arg!(--"db" <PATH>)
        .required(false)
        .help("Location of the SQLite database file")
        .default_value(DEFAULT_DB_PATH)
}

fn format_arg() -> clap::Arg {
    arg!(-f --"format" <FORMAT>)
        .required(false)
        .help("Summary format: text, json")
        .value_parser(["text", "json"])
        .default_value("text")
}

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("areaseed")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("areaseed")
        .about("Seeds a SQLite table with the province/city/area/street hierarchy")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Suppress progress and non-essential output")
                .required(false)
                .global(true),
        )
        .subcommand_required(false)
        .subcommand(
            command!("seed")
                .about(
                    "Drops and recreates the area table, then loads provinces, cities, areas \
                and streets in that order. Runs with defaults when no subcommand is given.",
                )
                .arg(
                    arg!(-d --"data-dir" <DIR>)
                        .required(false)
                        .help("Directory containing provinces.json, cities.json, areas.json and streets.json")
                        .default_value(DEFAULT_DATA_DIR),
                )
                .arg(db_arg())
                .arg(
                    arg!(--"strict")
                        .required(false)
                        .help("Abort when a record's parent code was not loaded at the level above")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(format_arg()),
        )
        .subcommand(
            command!("verify")
                .about(
                    "Checks an existing database: levels in range, every parent present one \
                level up, codes unique.",
                )
                .arg(db_arg())
                .arg(format_arg()),
        )
}
