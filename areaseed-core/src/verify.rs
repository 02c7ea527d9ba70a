// Post-load consistency checks over the area table

use crate::data::{Database, LevelCounts};
use crate::error::Result;
use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

pub const MAX_VIOLATIONS_PER_KIND: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// `level` is null or outside 1..=4
    InvalidLevel { code: String, level: Option<i64> },
    /// A province row carries a parent code
    UnexpectedParent { code: String, parent_code: String },
    /// A level 2-4 row has no parent code
    MissingParent { code: String, level: i64 },
    /// The parent code does not match any row exactly one level up
    DanglingParent {
        code: String,
        level: i64,
        parent_code: String,
    },
    DuplicateCode { code: String, occurrences: i64 },
}

impl Violation {
    pub fn describe(&self) -> String {
        match self {
            Violation::InvalidLevel { code, level } => match level {
                Some(level) => format!("{code}: level {level} is not in 1-4"),
                None => format!("{code}: level is null"),
            },
            Violation::UnexpectedParent { code, parent_code } => {
                format!("{code}: province has parent '{parent_code}'")
            }
            Violation::MissingParent { code, level } => {
                format!("{code}: level {level} row has no parent")
            }
            Violation::DanglingParent {
                code,
                level,
                parent_code,
            } => format!(
                "{code}: parent '{parent_code}' is not a level {} row",
                level - 1
            ),
            Violation::DuplicateCode { code, occurrences } => {
                format!("{code}: appears {occurrences} times")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyReport {
    pub counts: LevelCounts,
    pub total_rows: i64,
    pub violations: Vec<Violation>,
    /// Violations found but not listed because of the per-kind cap
    pub omitted: usize,
}

impl VerifyReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty() && self.omitted == 0
    }

    pub fn violation_count(&self) -> usize {
        self.violations.len() + self.omitted
    }
}

fn push_capped(into: &mut Vec<Violation>, omitted: &mut usize, mut found: Vec<Violation>) {
    if found.len() > MAX_VIOLATIONS_PER_KIND {
        *omitted += found.len() - MAX_VIOLATIONS_PER_KIND;
        found.truncate(MAX_VIOLATIONS_PER_KIND);
    }
    into.extend(found);
}

fn find_violations<F>(conn: &Connection, sql: &str, map: F) -> rusqlite::Result<Vec<Violation>>
where
    F: FnMut(&Row<'_>) -> rusqlite::Result<Violation>,
{
    let mut stmt = conn.prepare(sql)?;
    let found = stmt
        .query_map([], map)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(found)
}

/// Check the hierarchy invariants of a loaded table. Read-only.
pub fn verify(db: &Database) -> Result<VerifyReport> {
    let conn = db.get_connection();
    let mut violations = Vec::new();
    let mut omitted = 0;

    let invalid_levels = find_violations(
        conn,
        "SELECT code, level FROM area
         WHERE level IS NULL OR level NOT IN (1, 2, 3, 4)
         ORDER BY code",
        |row| {
            Ok(Violation::InvalidLevel {
                code: row.get(0)?,
                level: row.get(1)?,
            })
        },
    )?;
    push_capped(&mut violations, &mut omitted, invalid_levels);

    let unexpected_parents = find_violations(
        conn,
        "SELECT code, parent_code FROM area
         WHERE level = 1 AND parent_code IS NOT NULL
         ORDER BY code",
        |row| {
            Ok(Violation::UnexpectedParent {
                code: row.get(0)?,
                parent_code: row.get(1)?,
            })
        },
    )?;
    push_capped(&mut violations, &mut omitted, unexpected_parents);

    let missing_parents = find_violations(
        conn,
        "SELECT code, level FROM area
         WHERE level BETWEEN 2 AND 4 AND parent_code IS NULL
         ORDER BY code",
        |row| {
            Ok(Violation::MissingParent {
                code: row.get(0)?,
                level: row.get(1)?,
            })
        },
    )?;
    push_capped(&mut violations, &mut omitted, missing_parents);

    let dangling_parents = find_violations(
        conn,
        "SELECT c.code, c.level, c.parent_code FROM area c
         LEFT JOIN area p ON p.code = c.parent_code AND p.level = c.level - 1
         WHERE c.level BETWEEN 2 AND 4
           AND c.parent_code IS NOT NULL
           AND p.code IS NULL
         ORDER BY c.code",
        |row| {
            Ok(Violation::DanglingParent {
                code: row.get(0)?,
                level: row.get(1)?,
                parent_code: row.get(2)?,
            })
        },
    )?;
    push_capped(&mut violations, &mut omitted, dangling_parents);

    // Unreachable under the primary key, kept for databases built elsewhere
    let duplicates = find_violations(
        conn,
        "SELECT code, COUNT(*) FROM area
         GROUP BY code HAVING COUNT(*) > 1
         ORDER BY code",
        |row| {
            Ok(Violation::DuplicateCode {
                code: row.get(0)?,
                occurrences: row.get(1)?,
            })
        },
    )?;
    push_capped(&mut violations, &mut omitted, duplicates);

    Ok(VerifyReport {
        counts: db.count_by_level()?,
        total_rows: db.total_count()?,
        violations,
        omitted,
    })
}
