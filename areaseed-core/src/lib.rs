//! Seeds a SQLite `area` table with the province → city → area → street
//! hierarchy from four JSON files.

pub mod data;
pub mod error;
pub mod load;
pub mod model;
pub mod report;
pub mod verify;

pub use data::{Database, LevelCounts};
pub use error::{Result, SeedError};
pub use load::{Loader, SeedConfig, SeedProgressCallback, SeedSummary};
pub use model::{Area, AreaRecord, Level};
pub use verify::{VerifyReport, Violation, verify};
