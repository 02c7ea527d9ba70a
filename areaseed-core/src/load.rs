use crate::data::Database;
use crate::error::{Result, SeedError};
use crate::model::{Area, AreaRecord, Level};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

pub const DEFAULT_DATA_DIR: &str = "./area";
pub const DEFAULT_DB_PATH: &str = "data.db";

/// Options for a seed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedConfig {
    /// Directory holding provinces.json, cities.json, areas.json and streets.json
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
    /// Reject records whose parent code was not loaded at the level above
    pub strict: bool,
}

impl Default for SeedConfig {
    fn default() -> Self {
        SeedConfig {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            strict: false,
        }
    }
}

impl SeedConfig {
    pub fn source_path(&self, level: Level) -> PathBuf {
        self.data_dir.join(level.source_file())
    }
}

/// Callback for reporting seed progress
pub type SeedProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSummary {
    pub level: Level,
    pub source: PathBuf,
    pub inserted: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedSummary {
    pub database: PathBuf,
    pub strict: bool,
    pub levels: Vec<LevelSummary>,
}

impl SeedSummary {
    pub fn total_inserted(&self) -> usize {
        self.levels.iter().map(|l| l.inserted).sum()
    }
}

/// Read one level's JSON array
pub fn read_records(path: &Path) -> Result<Vec<AreaRecord>> {
    let file = File::open(path).map_err(|source| SeedError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_reader(BufReader::new(file)).map_err(|source| SeedError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Drives the fixed reset → province → city → area → street sequence
pub struct Loader {
    db: Database,
    config: SeedConfig,
    progress_callback: Option<SeedProgressCallback>,
}

impl Loader {
    pub fn new(db: Database, config: SeedConfig) -> Self {
        Loader {
            db,
            config,
            progress_callback: None,
        }
    }

    pub fn with_progress_callback(mut self, callback: SeedProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    fn report(&self, msg: String) {
        if let Some(cb) = &self.progress_callback {
            cb(msg);
        }
    }

    pub fn config(&self) -> &SeedConfig {
        &self.config
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn into_database(self) -> Database {
        self.db
    }

    pub fn reset_schema(&self) -> Result<()> {
        self.report("Resetting area table...".to_string());
        self.db.reset_schema()?;
        info!("area table recreated");
        Ok(())
    }

    /// Load every record of `path` as rows at `level`.
    /// The parent level must already be fully loaded.
    pub fn load_level(&mut self, path: &Path, level: Level) -> Result<usize> {
        self.report(format!("Loading {}s from {}", level.as_str(), path.display()));

        let records = read_records(path)?;
        if records.is_empty() {
            warn!(level = level.as_str(), path = %path.display(), "source file has no records");
        }

        let areas = records
            .into_iter()
            .map(|record| record.into_area(level))
            .collect::<Result<Vec<Area>>>()?;

        if self.config.strict {
            self.check_parents(level, &areas)?;
        }

        let inserted = self.db.insert_areas(level, &areas)?;
        info!(level = level.as_str(), rows = inserted, "level loaded");
        self.report(format!("✓ {} {} rows", inserted, level.as_str()));
        Ok(inserted)
    }

    fn check_parents(&self, level: Level, areas: &[Area]) -> Result<()> {
        let Some(parent_level) = level.parent() else {
            return Ok(());
        };
        let known = self.db.codes_at_level(parent_level)?;

        for area in areas {
            let parent = area.parent_code.as_deref().unwrap_or_default();
            if !known.contains(parent) {
                return Err(SeedError::OrphanRecord {
                    code: area.code.clone(),
                    level: level.as_i64(),
                    parent_code: parent.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Full reseed. Stops at the first failing step; levels committed
    /// before the failure stay in the table.
    pub fn run(&mut self) -> Result<SeedSummary> {
        self.reset_schema()?;

        let mut levels = Vec::with_capacity(Level::ALL.len());
        for level in Level::ALL {
            let source = self.config.source_path(level);
            let inserted = self.load_level(&source, level)?;
            levels.push(LevelSummary {
                level,
                source,
                inserted,
            });
        }

        Ok(SeedSummary {
            database: self.config.db_path.clone(),
            strict: self.config.strict,
            levels,
        })
    }
}
