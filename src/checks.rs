//! The check registry and its evaluator.
//!
//! Checks are declarative: `(id, name, severity, requires, predicate)`.
//! The evaluator walks the registry in order and records exactly one
//! [`CheckResult`] per check per run. Gating is an explicit dependency edge:
//! a check whose `requires` prerequisite did not pass is recorded as
//! `Skipped` without running its predicate, so a missing project directory
//! or unparsable package.json never cascades into misleading failures.

use serde::Serialize;

use crate::contracts;
use crate::facts::{AppConfig, ManifestState, ProjectFacts};

/// Severity tier. Blocker failures force overall failure; Conditional
/// failures only downgrade the verdict to partial. Module is the implicit
/// tier of feature-module results and never appears in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Blocker,
    Conditional,
    Module,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blocker => write!(f, "Blocker"),
            Self::Conditional => write!(f, "Conditional"),
            Self::Module => write!(f, "Module"),
        }
    }
}

/// Outcome of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Fail,
    Skipped,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pass => write!(f, "pass"),
            Self::Fail => write!(f, "fail"),
            Self::Skipped => write!(f, "skipped"),
        }
    }
}

/// One evaluated check. Field names on the wire (`blocking`, `result`)
/// match report schema version 2.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub id: String,
    pub name: String,
    #[serde(rename = "blocking")]
    pub severity: Severity,
    #[serde(rename = "result")]
    pub outcome: Outcome,
    pub reason: String,
}

/// What a predicate decided, plus an optional run-level warning.
pub struct CheckEval {
    pub outcome: Outcome,
    pub reason: String,
    pub warning: Option<String>,
}

impl CheckEval {
    pub fn pass() -> Self {
        Self {
            outcome: Outcome::Pass,
            reason: String::new(),
            warning: None,
        }
    }

    pub fn fail(reason: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Fail,
            reason: reason.into(),
            warning: None,
        }
    }

    pub fn skipped(reason: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Skipped,
            reason: reason.into(),
            warning: None,
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warning = Some(warning.into());
        self
    }

    fn pass_if(condition: bool, reason: &str) -> Self {
        if condition {
            Self::pass()
        } else {
            Self::fail(reason)
        }
    }
}

/// A registered check definition.
pub struct CheckDef {
    pub id: &'static str,
    pub name: &'static str,
    pub severity: Severity,
    /// Prerequisite check id; anything but a recorded pass skips this check.
    pub requires: Option<&'static str>,
    pub predicate: fn(&ProjectFacts) -> CheckEval,
}

/// The fixed, ordered check registry. Dependency edges always point at
/// earlier entries.
pub const REGISTRY: &[CheckDef] = &[
    CheckDef {
        id: "VC-000",
        name: "Project Directory Exists",
        severity: Severity::Blocker,
        requires: None,
        predicate: vc000_project_dir,
    },
    CheckDef {
        id: "VC-001",
        name: "package.json Exists",
        severity: Severity::Blocker,
        requires: Some("VC-000"),
        predicate: vc001_package_exists,
    },
    CheckDef {
        id: "VC-002",
        name: "package.json Parse",
        severity: Severity::Blocker,
        requires: Some("VC-001"),
        predicate: vc002_package_parse,
    },
    CheckDef {
        id: "VC-003",
        name: "package.json scripts.lint",
        severity: Severity::Blocker,
        requires: Some("VC-002"),
        predicate: |facts| script_check(facts, "lint"),
    },
    CheckDef {
        id: "VC-004",
        name: "package.json scripts.typecheck",
        severity: Severity::Blocker,
        requires: Some("VC-002"),
        predicate: |facts| script_check(facts, "typecheck"),
    },
    CheckDef {
        id: "VC-005",
        name: "package.json scripts.test",
        severity: Severity::Blocker,
        requires: Some("VC-002"),
        predicate: |facts| script_check(facts, "test"),
    },
    CheckDef {
        id: "VC-006",
        name: "package.json main Entry",
        severity: Severity::Blocker,
        requires: Some("VC-002"),
        predicate: vc006_main_entry,
    },
    CheckDef {
        id: "VC-007",
        name: "expo-router Dependency",
        severity: Severity::Blocker,
        requires: Some("VC-002"),
        predicate: |facts| dependency_check(facts, "expo-router"),
    },
    CheckDef {
        id: "VC-008",
        name: "tsconfig.json Exists",
        severity: Severity::Blocker,
        requires: Some("VC-002"),
        predicate: |facts| CheckEval::pass_if(facts.tsconfig_exists, "tsconfig.json is missing"),
    },
    CheckDef {
        id: "VC-009",
        name: "TypeScript Dependency",
        severity: Severity::Blocker,
        requires: Some("VC-002"),
        predicate: |facts| dependency_check(facts, "typescript"),
    },
    CheckDef {
        id: "VC-010",
        name: "App Config Contract",
        severity: Severity::Blocker,
        requires: Some("VC-002"),
        predicate: |facts| violations_check(&facts.app_config_violations),
    },
    CheckDef {
        id: "VC-011",
        name: "EAS Profile Contract",
        severity: Severity::Blocker,
        requires: Some("VC-002"),
        predicate: |facts| violations_check(&facts.eas_violations),
    },
    CheckDef {
        id: "VC-012",
        name: "Expo Ignore Policy",
        severity: Severity::Blocker,
        requires: Some("VC-002"),
        predicate: |facts| violations_check(&facts.gitignore_violations),
    },
    CheckDef {
        id: "VC-013",
        name: "CI Workflow Presence",
        severity: Severity::Conditional,
        requires: Some("VC-002"),
        predicate: vc013_workflow_presence,
    },
    CheckDef {
        id: "VC-014",
        name: "Non-placeholder Test Script",
        severity: Severity::Blocker,
        requires: Some("VC-002"),
        predicate: vc014_test_script,
    },
    CheckDef {
        id: "VC-015",
        name: "Project Metadata Parse",
        severity: Severity::Blocker,
        requires: Some("VC-002"),
        predicate: vc015_metadata_parse,
    },
    CheckDef {
        id: "VC-016",
        name: "Smoke Test File Presence",
        severity: Severity::Blocker,
        requires: Some("VC-002"),
        predicate: |facts| {
            CheckEval::pass_if(
                facts.smoke_test_exists,
                "__tests__/app-shell.test.tsx is missing.",
            )
        },
    },
    CheckDef {
        id: "VC-017",
        name: "Workflow Release Branch Contract",
        severity: Severity::Conditional,
        requires: Some("VC-013"),
        predicate: vc017_release_branch,
    },
    CheckDef {
        id: "VC-018",
        name: "App Config Mode Contract",
        severity: Severity::Blocker,
        requires: Some("VC-002"),
        predicate: vc018_mode_contract,
    },
    CheckDef {
        id: "VC-019",
        name: "Push Plugin Contract",
        severity: Severity::Blocker,
        requires: Some("VC-002"),
        predicate: vc019_push_plugin,
    },
];

fn vc000_project_dir(facts: &ProjectFacts) -> CheckEval {
    if facts.dir_exists {
        CheckEval::pass()
    } else {
        CheckEval::fail(format!(
            "Project directory does not exist: {}",
            facts.project_dir.display()
        ))
    }
}

fn vc001_package_exists(facts: &ProjectFacts) -> CheckEval {
    CheckEval::pass_if(facts.package_manifest.exists(), "package.json not found.")
}

fn vc002_package_parse(facts: &ProjectFacts) -> CheckEval {
    match &facts.package_manifest {
        ManifestState::Parsed(_) => CheckEval::pass(),
        ManifestState::ParseFailed(err) => CheckEval::fail(err.clone()),
        ManifestState::Missing => CheckEval::fail("package.json not found."),
    }
}

fn script_check(facts: &ProjectFacts, script_name: &str) -> CheckEval {
    let present = facts
        .package_manifest
        .parsed()
        .is_some_and(|pkg| pkg.scripts.contains(script_name));
    CheckEval::pass_if(present, &format!("scripts.{} is missing", script_name))
}

fn dependency_check(facts: &ProjectFacts, dep_name: &str) -> CheckEval {
    let present = facts
        .package_manifest
        .parsed()
        .is_some_and(|pkg| pkg.dependencies.contains(dep_name));
    CheckEval::pass_if(present, &format!("{} dependency is missing", dep_name))
}

fn vc006_main_entry(facts: &ProjectFacts) -> CheckEval {
    let is_router_entry = facts
        .package_manifest
        .parsed()
        .is_some_and(|pkg| pkg.main_entry.as_deref() == Some("expo-router/entry"));
    CheckEval::pass_if(
        is_router_entry,
        "package.json main must be expo-router/entry",
    )
}

fn violations_check(violations: &[String]) -> CheckEval {
    if violations.is_empty() {
        CheckEval::pass()
    } else {
        CheckEval::fail(violations.join(" | "))
    }
}

fn vc013_workflow_presence(facts: &ProjectFacts) -> CheckEval {
    if facts.workflow_text.is_some() {
        CheckEval::pass()
    } else {
        CheckEval::skipped("CI workflow not found yet.")
            .with_warning("CI workflow missing; complete CI setup to finish the pipeline.")
    }
}

fn vc014_test_script(facts: &ProjectFacts) -> CheckEval {
    let test_script = facts
        .package_manifest
        .parsed()
        .and_then(|pkg| pkg.test_script.as_deref())
        .unwrap_or("");
    if test_script.is_empty() {
        CheckEval::fail("scripts.test is missing or appears to be placeholder/no-op")
    } else if contracts::is_placeholder_test_script(test_script) {
        CheckEval::fail(format!(
            "scripts.test appears to be placeholder/no-op: {}",
            test_script
        ))
    } else {
        CheckEval::pass()
    }
}

fn vc015_metadata_parse(facts: &ProjectFacts) -> CheckEval {
    match &facts.metadata {
        ManifestState::Parsed(_) => CheckEval::pass(),
        ManifestState::ParseFailed(err) => CheckEval::fail(err.clone()),
        ManifestState::Missing => CheckEval::fail("skill.modules.json is missing."),
    }
}

fn vc017_release_branch(facts: &ProjectFacts) -> CheckEval {
    let Some(workflow) = facts.workflow_text.as_deref() else {
        return CheckEval::skipped("CI workflow not found yet.");
    };
    let branch = facts.release_branch();
    let expected_ref = format!("refs/heads/{}", branch);
    let expected_branch_line = format!("- {}", branch);
    // Both tokens are independently required.
    if workflow.contains(&expected_ref) && workflow.contains(&expected_branch_line) {
        CheckEval::pass()
    } else {
        CheckEval::fail(format!(
            "Workflow does not appear to target release branch '{}'.",
            branch
        ))
    }
}

fn vc018_mode_contract(facts: &ProjectFacts) -> CheckEval {
    let ManifestState::Parsed(meta) = &facts.metadata else {
        return CheckEval::fail(
            "cannot resolve app config mode: project metadata is missing or invalid.",
        );
    };
    match &meta.app_config {
        AppConfig::InlineConfig { text: Some(_) } => CheckEval::pass(),
        AppConfig::InlineConfig { text: None } => {
            CheckEval::fail("useAppConfigTs is enabled but app.config.ts is missing.")
        }
        AppConfig::Manifest { plugins } if plugins.exists() => CheckEval::pass(),
        AppConfig::Manifest { .. } => {
            CheckEval::fail("useAppConfigTs is disabled but app.json is missing.")
        }
    }
}

fn vc019_push_plugin(facts: &ProjectFacts) -> CheckEval {
    if !facts.flag_enabled("withPush") {
        return CheckEval::skipped("withPush is not enabled.");
    }
    let ManifestState::Parsed(meta) = &facts.metadata else {
        return CheckEval::skipped("withPush is not enabled.");
    };
    match &meta.app_config {
        AppConfig::InlineConfig { text: None } => {
            CheckEval::fail("withPush is enabled but app.config.ts is missing.")
        }
        AppConfig::InlineConfig { text: Some(text) } => CheckEval::pass_if(
            text.contains("expo-notifications"),
            "withPush is enabled but app.config.ts is missing expo-notifications plugin.",
        ),
        AppConfig::Manifest { plugins } => match plugins {
            ManifestState::Missing => CheckEval::fail("withPush is enabled but app.json is missing."),
            ManifestState::ParseFailed(err) => CheckEval::fail(err.clone()),
            ManifestState::Parsed(plugins) => CheckEval::pass_if(
                contracts::has_plugin(plugins, "expo-notifications"),
                "withPush is enabled but app.json is missing expo-notifications plugin.",
            ),
        },
    }
}

/// Output of one evaluator run: every registered check, in registry order,
/// plus run-level warnings.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub checks: Vec<CheckResult>,
    pub warnings: Vec<String>,
}

/// Evaluate the full registry against gathered facts.
pub fn run_checks(facts: &ProjectFacts) -> Evaluation {
    let mut checks = Vec::with_capacity(REGISTRY.len());
    let mut warnings = Vec::new();
    let mut passed: Vec<&str> = Vec::new();

    for def in REGISTRY {
        if let Some(required) = def.requires {
            if !passed.contains(&required) {
                checks.push(CheckResult {
                    id: def.id.to_string(),
                    name: def.name.to_string(),
                    severity: def.severity,
                    outcome: Outcome::Skipped,
                    reason: format!("skipped: prerequisite {} did not pass", required),
                });
                continue;
            }
        }

        let eval = (def.predicate)(facts);
        if eval.outcome == Outcome::Pass {
            passed.push(def.id);
        }
        if let Some(warning) = eval.warning {
            warnings.push(warning);
        }
        checks.push(CheckResult {
            id: def.id.to_string(),
            name: def.name.to_string(),
            severity: def.severity,
            outcome: eval.outcome,
            reason: eval.reason,
        });
    }

    Evaluation { checks, warnings }
}
