// Plain-text and JSON summaries for seed and verify runs

use crate::load::SeedSummary;
use crate::model::Level;
use crate::verify::VerifyReport;
use serde::Serialize;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

pub fn to_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}

pub fn generate_seed_report(summary: &SeedSummary) -> String {
    let mut report = String::new();
    report.push_str(RULE);
    report.push_str("\n# Seed summary:\n");
    report.push_str(&format!("  Database: {}\n", summary.database.display()));
    if summary.strict {
        report.push_str("  Parent checks: strict\n");
    }
    report.push('\n');

    for level in &summary.levels {
        report.push_str(&format!(
            "  {:<9} {:>8}  {}\n",
            level.level.as_str(),
            level.inserted,
            level.source.display()
        ));
    }

    report.push_str(&format!("  {:<9} {:>8}\n", "total", summary.total_inserted()));
    report.push('\n');
    report.push_str(RULE);
    report
}

pub fn generate_verify_report(verify: &VerifyReport) -> String {
    let mut report = String::new();
    report.push_str(RULE);
    report.push_str("\n# Row counts:\n");
    for level in Level::ALL {
        report.push_str(&format!(
            "  {:<9} {:>8}\n",
            level.as_str(),
            verify.counts.get(level)
        ));
    }
    report.push_str(&format!("  {:<9} {:>8}\n", "total", verify.total_rows));

    report.push_str("\n# Hierarchy:\n");
    if verify.is_valid() {
        report.push_str("  OK - no violations\n");
    } else {
        report.push_str(&format!("  {} violation(s)\n", verify.violation_count()));
        for violation in &verify.violations {
            report.push_str(&format!("  - {}\n", violation.describe()));
        }
        if verify.omitted > 0 {
            report.push_str(&format!("  ... and {} more\n", verify.omitted));
        }
    }

    report.push('\n');
    report.push_str(RULE);
    report
}
