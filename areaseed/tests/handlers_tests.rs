use areaseed::commands::command_argument_builder;
use areaseed::handlers::*;
use areaseed_core::data::Database;
use areaseed_core::load::SeedConfig;
use areaseed_core::model::Level;
use areaseed_core::report::ReportFormat;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_fixture(dir: &Path, orphan_street: bool) {
    let streets = if orphan_street {
        json!([{"code": "999999001", "name": "Lost", "areaCode": "999999"}])
    } else {
        json!([{"code": "110101001", "name": "Donghuamen", "areaCode": "110101"}])
    };
    let files = [
        ("provinces.json", json!([{"code": "11", "name": "Beijing"}])),
        (
            "cities.json",
            json!([{"code": "1101", "name": "Beijing City", "provinceCode": "11"}]),
        ),
        (
            "areas.json",
            json!([{"code": "110101", "name": "Dongcheng", "cityCode": "1101"}]),
        ),
        ("streets.json", streets),
    ];
    for (name, value) in files {
        fs::write(dir.join(name), value.to_string()).unwrap();
    }
}

fn config_for(temp_dir: &TempDir) -> SeedConfig {
    SeedConfig {
        data_dir: temp_dir.path().to_path_buf(),
        db_path: temp_dir.path().join("data.db"),
        strict: false,
    }
}

// ============================================================================
// Argument parsing
// ============================================================================

#[test]
fn test_expand_path_without_tilde() {
    assert_eq!(expand_path("data/area.db"), PathBuf::from("data/area.db"));
}

#[test]
fn test_expand_path_with_tilde() {
    let expanded = expand_path("~/area.db");
    assert!(expanded.ends_with("area.db"));
}

#[test]
fn test_seed_defaults() {
    let matches = command_argument_builder()
        .try_get_matches_from(["areaseed", "seed"])
        .unwrap();
    let (_, sub) = matches.subcommand().unwrap();

    assert_eq!(seed_config_from_args(sub), SeedConfig::default());
    assert_eq!(report_format_from_args(sub), ReportFormat::Text);
}

#[test]
fn test_seed_arguments() {
    let matches = command_argument_builder()
        .try_get_matches_from([
            "areaseed", "seed", "-d", "fixtures", "--db", "out.db", "--strict", "-f", "json",
        ])
        .unwrap();
    let (name, sub) = matches.subcommand().unwrap();
    assert_eq!(name, "seed");

    let config = seed_config_from_args(sub);
    assert_eq!(config.data_dir, PathBuf::from("fixtures"));
    assert_eq!(config.db_path, PathBuf::from("out.db"));
    assert!(config.strict);
    assert_eq!(report_format_from_args(sub), ReportFormat::Json);
}

#[test]
fn test_quiet_is_global() {
    let matches = command_argument_builder()
        .try_get_matches_from(["areaseed", "verify", "-q"])
        .unwrap();
    assert!(matches.get_flag("quiet"));
}

#[test]
fn test_no_subcommand_is_allowed() {
    let matches = command_argument_builder()
        .try_get_matches_from(["areaseed"])
        .unwrap();
    assert!(matches.subcommand().is_none());
}

#[test]
fn test_unknown_format_rejected() {
    let result =
        command_argument_builder().try_get_matches_from(["areaseed", "verify", "-f", "csv"]);
    assert!(result.is_err());
}

#[test]
fn test_verify_db_argument() {
    let matches = command_argument_builder()
        .try_get_matches_from(["areaseed", "verify", "--db", "other.db"])
        .unwrap();
    let (_, sub) = matches.subcommand().unwrap();
    assert_eq!(db_path_from_args(sub), Some(PathBuf::from("other.db")));
}

// ============================================================================
// Handlers
// ============================================================================

#[test]
fn test_handle_seed_then_verify() {
    let temp_dir = TempDir::new().unwrap();
    write_fixture(temp_dir.path(), false);
    let config = config_for(&temp_dir);

    let summary = handle_seed(&config, ReportFormat::Text, true).unwrap();
    assert_eq!(summary.total_inserted(), 4);
    assert_eq!(summary.database, config.db_path);

    let valid = handle_verify(&config.db_path, ReportFormat::Json, true).unwrap();
    assert!(valid);
}

#[test]
fn test_handle_verify_reports_orphans() {
    let temp_dir = TempDir::new().unwrap();
    write_fixture(temp_dir.path(), true);
    let config = config_for(&temp_dir);

    handle_seed(&config, ReportFormat::Text, true).unwrap();
    let valid = handle_verify(&config.db_path, ReportFormat::Text, true).unwrap();
    assert!(!valid);
}

#[test]
fn test_handle_seed_strict_fails_on_orphans() {
    let temp_dir = TempDir::new().unwrap();
    write_fixture(temp_dir.path(), true);
    let mut config = config_for(&temp_dir);
    config.strict = true;

    let err = handle_seed(&config, ReportFormat::Text, true).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("Seed aborted"));
    assert!(message.contains("999999001"));

    let db = Database::open(&config.db_path).unwrap();
    assert_eq!(db.count_by_level().unwrap().get(Level::Area), 1);
    assert_eq!(db.count_by_level().unwrap().get(Level::Street), 0);
}

#[test]
fn test_handle_seed_missing_data_dir() {
    let temp_dir = TempDir::new().unwrap();
    let config = SeedConfig {
        data_dir: temp_dir.path().join("nope"),
        db_path: temp_dir.path().join("data.db"),
        strict: false,
    };

    let err = handle_seed(&config, ReportFormat::Text, true).unwrap_err();
    assert!(format!("{err:#}").contains("provinces.json"));
}

#[test]
fn test_handle_verify_missing_database() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("missing.db");

    let err = handle_verify(&db_path, ReportFormat::Text, true).unwrap_err();
    assert!(err.to_string().contains("No database"));
    assert!(!db_path.exists());
}

#[test]
fn test_handle_verify_without_table() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("empty.db");
    Database::open(&db_path).unwrap();

    let err = handle_verify(&db_path, ReportFormat::Text, true).unwrap_err();
    assert!(err.to_string().contains("no area table"));
}

#[test]
fn test_handle_verify_keeps_rollback_journal() {
    let temp_dir = TempDir::new().unwrap();
    write_fixture(temp_dir.path(), false);
    let config = config_for(&temp_dir);
    handle_seed(&config, ReportFormat::Text, true).unwrap();

    // rebuild the file as a rollback-journal database, like other tools produce
    {
        let db = Database::open(&config.db_path).unwrap();
        db.get_connection()
            .execute_batch("PRAGMA journal_mode = DELETE;")
            .unwrap();
        assert_eq!(db.journal_mode().unwrap(), "delete");
    }

    let valid = handle_verify(&config.db_path, ReportFormat::Text, true).unwrap();
    assert!(valid);

    let db = Database::open_read_only(&config.db_path).unwrap();
    assert_eq!(db.journal_mode().unwrap(), "delete");
    assert!(!temp_dir.path().join("data.db-wal").exists());
}
