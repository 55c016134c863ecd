//! Reporting: console rendering and the versioned JSON report document.
//!
//! The reporter consumes evaluator and aggregator output only; it never
//! re-derives a status. Console lines are tagged by outcome, the summary
//! line is keyed by overall status, and the optional JSON document follows
//! report schema version 2.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;

use crate::checks::{CheckResult, Outcome, Severity};
use crate::modules::ModuleCheckResult;
use crate::status::Status;

/// Version of the JSON report document.
pub const REPORT_SCHEMA_VERSION: u32 = 2;

/// The machine-readable validation report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub schema_version: u32,
    pub status: Status,
    pub infra_status: Status,
    pub feature_status: Status,
    pub started_at: String,
    pub finished_at: String,
    pub project_dir: String,
    pub checks: Vec<CheckResult>,
    pub module_checks: Vec<ModuleCheckResult>,
    /// Ids of failed checks: registry checks first, then module contracts.
    pub failed_checks: Vec<String>,
    pub warnings: Vec<String>,
}

impl Report {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        status: Status,
        infra_status: Status,
        feature_status: Status,
        started_at: String,
        finished_at: String,
        project_dir: &Path,
        checks: Vec<CheckResult>,
        module_checks: Vec<ModuleCheckResult>,
        warnings: Vec<String>,
    ) -> Self {
        let failed_checks = checks
            .iter()
            .filter(|c| c.outcome == Outcome::Fail)
            .map(|c| c.id.clone())
            .chain(
                module_checks
                    .iter()
                    .filter(|m| m.outcome == Outcome::Fail)
                    .map(|m| m.id.clone()),
            )
            .collect();

        Self {
            schema_version: REPORT_SCHEMA_VERSION,
            status,
            infra_status,
            feature_status,
            started_at,
            finished_at,
            project_dir: project_dir.display().to_string(),
            checks,
            module_checks,
            failed_checks,
            warnings,
        }
    }
}

/// Write the report as pretty-printed JSON, creating parent directories and
/// overwriting any existing file. Returns the path actually written.
pub fn write_report(report: &Report, path: &Path) -> Result<PathBuf> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create report directory {}", parent.display()))?;
        }
    }
    let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
    fs::write(path, json + "\n")
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    Ok(fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf()))
}

fn outcome_tag(outcome: Outcome) -> colored::ColoredString {
    match outcome {
        Outcome::Pass => "[OK]".green(),
        Outcome::Fail => "[FAIL]".red(),
        Outcome::Skipped => "[SKIP]".yellow(),
    }
}

fn print_line(id: &str, name: &str, severity: Severity, outcome: Outcome, reason: &str) {
    let tag = outcome_tag(outcome);
    if reason.is_empty() {
        println!("{} {} {} ({})", tag, id, name, severity);
    } else {
        println!("{} {} {} ({}): {}", tag, id, name, severity, reason);
    }
}

/// Print one line per check, then one per module contract.
pub fn print_results(checks: &[CheckResult], module_checks: &[ModuleCheckResult]) {
    for check in checks {
        print_line(
            &check.id,
            &check.name,
            check.severity,
            check.outcome,
            &check.reason,
        );
    }
    for module in module_checks {
        print_line(
            &module.id,
            &module.name,
            Severity::Module,
            module.outcome,
            &module.reason,
        );
    }
}

/// Echo run-level warnings.
pub fn print_warnings(warnings: &[String]) {
    for warning in warnings {
        println!("{} {}", "[INFO]".blue(), warning);
    }
}

/// Print the final summary line keyed by overall status.
pub fn print_summary(status: Status) {
    match status {
        Status::Pass => println!("{}", "Validation passed.".green()),
        Status::Partial => println!(
            "{}",
            "Validation partial: blockers passed but conditional or feature checks need follow-up."
                .yellow()
        ),
        Status::Fail => println!("{}", "Validation failed.".red()),
    }
}
