use crate::error::{Result, SeedError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Depth in the administrative hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Province,
    City,
    Area,
    Street,
}

impl Level {
    /// All levels in load order (parents before children)
    pub const ALL: [Level; 4] = [Level::Province, Level::City, Level::Area, Level::Street];

    pub fn as_i64(&self) -> i64 {
        match self {
            Level::Province => 1,
            Level::City => 2,
            Level::Area => 3,
            Level::Street => 4,
        }
    }

    pub fn from_i64(value: i64) -> Result<Self> {
        match value {
            1 => Ok(Level::Province),
            2 => Ok(Level::City),
            3 => Ok(Level::Area),
            4 => Ok(Level::Street),
            other => Err(SeedError::InvalidLevel(other)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Province => "province",
            Level::City => "city",
            Level::Area => "area",
            Level::Street => "street",
        }
    }

    /// The level directly above this one, `None` for provinces
    pub fn parent(&self) -> Option<Level> {
        match self {
            Level::Province => None,
            Level::City => Some(Level::Province),
            Level::Area => Some(Level::City),
            Level::Street => Some(Level::Area),
        }
    }

    pub fn source_file(&self) -> &'static str {
        match self {
            Level::Province => "provinces.json",
            Level::City => "cities.json",
            Level::Area => "areas.json",
            Level::Street => "streets.json",
        }
    }

    /// Name of the JSON field holding the parent code
    pub fn parent_field(&self) -> Option<&'static str> {
        match self {
            Level::Province => None,
            Level::City => Some("provinceCode"),
            Level::Area => Some("cityCode"),
            Level::Street => Some("areaCode"),
        }
    }
}

/// One object from a level's JSON file.
///
/// Everything besides `code` and `name` stays untyped; only the field the
/// target level reads its parent from is ever interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaRecord {
    pub code: String,
    pub name: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl AreaRecord {
    /// Raw value of `level`'s parent field, `None` when the field is absent
    pub fn parent_value(&self, level: Level) -> Option<&Value> {
        level.parent_field().and_then(|field| self.fields.get(field))
    }

    /// Project this record onto a table row at `level`.
    ///
    /// Provinces never carry a parent. Every other level requires its parent
    /// field to be present; an explicit `null` stores a NULL parent and a
    /// number is stored as its decimal text.
    pub fn into_area(self, level: Level) -> Result<Area> {
        let parent_code = match level.parent_field() {
            None => None,
            Some(field) => match self.fields.get(field) {
                None => {
                    return Err(SeedError::MissingParentField {
                        code: self.code,
                        level: level.as_i64(),
                        field,
                    });
                }
                Some(Value::Null) => None,
                Some(Value::String(code)) => Some(code.clone()),
                Some(Value::Number(n)) => Some(n.to_string()),
                Some(_) => {
                    return Err(SeedError::InvalidParentField {
                        code: self.code,
                        level: level.as_i64(),
                        field,
                    });
                }
            },
        };

        Ok(Area {
            code: self.code,
            name: self.name,
            level,
            parent_code,
        })
    }
}

/// One row of the `area` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    pub code: String,
    pub name: String,
    pub level: Level,
    pub parent_code: Option<String>,
}
