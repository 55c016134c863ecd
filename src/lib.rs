//! # Preflight - Expo iOS project contract validator
//!
//! Preflight inspects an Expo iOS app project's static configuration surface
//! (manifests, CI workflow, feature-module scaffolding) and decides whether a
//! build pipeline may proceed. It never runs the project's own build, lint,
//! or test commands; it only reads files and reports.
//!
//! ## Overview
//!
//! A run gathers [`facts::ProjectFacts`] from disk once, evaluates the fixed
//! check registry in [`checks`], evaluates the feature-module contract table
//! in [`modules`], folds everything into a three-tier verdict in [`status`],
//! and renders console output plus an optional JSON report in [`report`].
//!
//! ## Modules
//!
//! - [`facts`] - Single I/O pass producing the per-run fact bag
//! - [`contracts`] - Violation-list extractors for individual artifacts
//! - [`checks`] - Check registry (VC-xxx) and the gated evaluator
//! - [`modules`] - Feature-flag module contracts (MC-xxx)
//! - [`status`] - Status folds: infra, feature, and overall
//! - [`report`] - Console rendering and the versioned report document

pub mod checks;
pub mod contracts;
pub mod facts;
pub mod modules;
pub mod report;
pub mod status;

/// Fixed project-relative path constants inspected by the validator.
pub mod paths {
    /// Package manifest: scripts, entry point, dependency sets.
    pub const PACKAGE_MANIFEST: &str = "package.json";
    /// App configuration in manifest mode.
    pub const APP_MANIFEST: &str = "app.json";
    /// App configuration in inline-config mode.
    pub const APP_CONFIG_SCRIPT: &str = "app.config.ts";
    /// EAS build-profile manifest.
    pub const EAS_MANIFEST: &str = "eas.json";
    /// TypeScript compiler configuration.
    pub const TSCONFIG: &str = "tsconfig.json";
    /// Project metadata: release branch and feature-flag map.
    pub const PROJECT_METADATA: &str = "skill.modules.json";
    /// CI workflow for EAS iOS builds.
    pub const CI_WORKFLOW: &str = ".github/workflows/eas-ios.yml";
    /// Required smoke test file.
    pub const SMOKE_TEST: &str = "__tests__/app-shell.test.tsx";
}

/// Generate a UTC timestamp in ISO 8601 format: `YYYY-MM-DDTHH:MM:SSZ`
///
/// This function uses `chrono::Utc::now()` to ensure the timestamp is truly
/// in UTC, not local time with a misleading `Z` suffix.
pub fn utc_now_iso() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
