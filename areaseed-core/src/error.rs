use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Invalid level: {0} (expected 1-4)")]
    InvalidLevel(i64),

    #[error("Record '{code}' at level {level} is missing its '{field}' field")]
    MissingParentField {
        code: String,
        level: i64,
        field: &'static str,
    },

    #[error("Record '{code}' at level {level} has a non-text '{field}' field")]
    InvalidParentField {
        code: String,
        level: i64,
        field: &'static str,
    },

    #[error("Record '{code}' at level {level} references unknown parent '{parent_code}'")]
    OrphanRecord {
        code: String,
        level: i64,
        parent_code: String,
    },
}

pub type Result<T> = std::result::Result<T, SeedError>;
