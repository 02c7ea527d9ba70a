use crate::model::{Area, Level};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{Connection, OpenFlags, OptionalExtension, Result, Row, params};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

pub const AREA_TABLE: &str = "area";
pub const AREA_NAME_INDEX: &str = "idx_area_name";

pub struct Database {
    conn: Connection,
}

/// Row counts per level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelCounts {
    pub province: i64,
    pub city: i64,
    pub area: i64,
    pub street: i64,
}

impl LevelCounts {
    pub fn get(&self, level: Level) -> i64 {
        match level {
            Level::Province => self.province,
            Level::City => self.city,
            Level::Area => self.area,
            Level::Street => self.street,
        }
    }

    fn set(&mut self, level: Level, count: i64) {
        match level {
            Level::Province => self.province = count,
            Level::City => self.city = count,
            Level::Area => self.area = count,
            Level::Street => self.street = count,
        }
    }

    pub fn total(&self) -> i64 {
        self.province + self.city + self.area + self.street
    }
}

impl ToSql for Level {
    fn to_sql(&self) -> Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_i64()))
    }
}

impl FromSql for Level {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let raw = i64::column_result(value)?;
        Level::from_i64(raw).map_err(|_| FromSqlError::OutOfRange(raw))
    }
}

fn area_from_row(row: &Row<'_>) -> Result<Area> {
    Ok(Area {
        code: row.get(0)?,
        name: row.get(1)?,
        level: row.get(2)?,
        parent_code: row.get(3)?,
    })
}

impl Database {
    pub fn exists(path: &Path) -> bool {
        path.exists()
    }

    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        // Single writer doing large batches
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA cache_size = -64000;  -- 64MB cache
            PRAGMA temp_store = MEMORY;
            ",
        )?;

        debug!(path = %path.display(), "opened database");
        Ok(Database { conn })
    }

    /// Open an existing database without changing it. No pragmas are
    /// applied, so the file keeps whatever journal mode it was built with.
    pub fn open_read_only(path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        debug!(path = %path.display(), "opened database read-only");
        Ok(Database { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Database { conn })
    }

    /// Drop and recreate the `area` table and its name index.
    /// All previous contents are lost.
    pub fn reset_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "
            DROP TABLE IF EXISTS area;

            CREATE TABLE area (
                code VARCHAR(20) PRIMARY KEY,
                name VARCHAR(100),
                level TINYINT(1),
                parent_code VARCHAR(20)
            );

            CREATE INDEX idx_area_name ON area (name, level);
            ",
        )?;
        Ok(())
    }

    /// Insert a batch of rows for one level inside a single transaction.
    /// The stored level always comes from `level`, not from the rows.
    pub fn insert_areas(&mut self, level: Level, areas: &[Area]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO area (code, name, level, parent_code) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for area in areas {
                stmt.execute(params![&area.code, &area.name, level, &area.parent_code])?;
            }
        }
        tx.commit()?;

        debug!(level = level.as_str(), rows = areas.len(), "inserted batch");
        Ok(areas.len())
    }

    pub fn codes_at_level(&self, level: Level) -> Result<HashSet<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT code FROM area WHERE level = ?1")?;

        let codes = stmt
            .query_map(params![level], |row| row.get(0))?
            .collect::<Result<HashSet<String>>>()?;

        Ok(codes)
    }

    pub fn get_area(&self, code: &str) -> Result<Option<Area>> {
        let mut stmt = self
            .conn
            .prepare("SELECT code, name, level, parent_code FROM area WHERE code = ?1")?;

        let result = stmt.query_row(params![code], area_from_row).optional()?;
        Ok(result)
    }

    pub fn get_areas_by_level(&self, level: Level) -> Result<Vec<Area>> {
        let mut stmt = self.conn.prepare(
            "SELECT code, name, level, parent_code FROM area WHERE level = ?1 ORDER BY code",
        )?;

        let areas = stmt
            .query_map(params![level], area_from_row)?
            .collect::<Result<Vec<_>>>()?;

        Ok(areas)
    }

    pub fn count_by_level(&self) -> Result<LevelCounts> {
        let mut stmt = self.conn.prepare(
            "SELECT level, COUNT(*) FROM area WHERE level BETWEEN 1 AND 4 GROUP BY level",
        )?;

        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, Level>(0)?, row.get::<_, i64>(1)?)))?
            .collect::<Result<Vec<_>>>()?;

        let mut counts = LevelCounts::default();
        for (level, count) in rows {
            counts.set(level, count);
        }
        Ok(counts)
    }

    pub fn total_count(&self) -> Result<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM area", [], |row| row.get(0))
    }

    pub fn table_exists(&self) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            params![AREA_TABLE],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    pub fn index_exists(&self, name: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name = ?1",
            params![name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    pub fn journal_mode(&self) -> Result<String> {
        self.conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
    }

    pub fn get_connection(&self) -> &Connection {
        &self.conn
    }
}
