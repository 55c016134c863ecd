//! Feature-module contracts.
//!
//! Each enabled feature flag requires a fixed set of scaffold files. The
//! table is declarative and evaluated in order; a disabled flag is recorded
//! as skipped without touching the filesystem, so disabled features are
//! never penalized for missing scaffolding.

use serde::Serialize;

use crate::checks::Outcome;
use crate::facts::ProjectFacts;

/// One feature-module contract: a flag and the files it requires.
pub struct ModuleContract {
    pub flag_key: &'static str,
    pub id: &'static str,
    pub name: &'static str,
    pub required_paths: &'static [&'static str],
}

/// The fixed module contract table.
pub const MODULE_CONTRACTS: &[ModuleContract] = &[
    ModuleContract {
        flag_key: "withUiFoundation",
        id: "MC-001",
        name: "UI Foundation Contract",
        required_paths: &[
            "app/(tabs)/_layout.tsx",
            "app/(tabs)/index.tsx",
            "app/(tabs)/explore.tsx",
            "app/(tabs)/profile.tsx",
        ],
    },
    ModuleContract {
        flag_key: "withProfile",
        id: "MC-002",
        name: "Profile Contract",
        required_paths: &["app/settings.tsx", "src/profile/ProfileActions.tsx"],
    },
    ModuleContract {
        flag_key: "withAuth",
        id: "MC-003",
        name: "Auth Contract",
        required_paths: &[
            "app/sign-in.tsx",
            "src/auth/AuthContext.tsx",
            "src/auth/secureSession.ts",
            "src/auth/oauthProviders.ts",
            "__tests__/auth-oauth.test.ts",
        ],
    },
    ModuleContract {
        flag_key: "withPush",
        id: "MC-004",
        name: "Push Contract",
        required_paths: &[
            "src/notifications/registerForPushNotifications.ts",
            "src/notifications/NotificationProvider.tsx",
            "src/notifications/notificationDeepLink.ts",
            "__tests__/notification-deeplink.test.ts",
        ],
    },
    ModuleContract {
        flag_key: "withDataLayer",
        id: "MC-005",
        name: "Data Layer Contract",
        required_paths: &[
            "src/data/apiClient.ts",
            "src/data/requestPolicy.ts",
            "src/data/useAsyncResource.ts",
            "__tests__/async-resource.test.ts",
        ],
    },
    ModuleContract {
        flag_key: "withAnalytics",
        id: "MC-006",
        name: "Analytics Contract",
        required_paths: &["src/observability/analytics.ts"],
    },
    ModuleContract {
        flag_key: "withCrashReporting",
        id: "MC-007",
        name: "Crash Contract",
        required_paths: &["src/observability/crashReporter.ts"],
    },
    ModuleContract {
        flag_key: "withLocalization",
        id: "MC-008",
        name: "Localization Contract",
        required_paths: &["src/localization/i18n.ts", "src/localization/messages/en.ts"],
    },
    ModuleContract {
        flag_key: "withAccessibilityChecks",
        id: "MC-009",
        name: "Accessibility Checklist Contract",
        required_paths: &["docs/accessibility-checklist.md"],
    },
    ModuleContract {
        flag_key: "withPrivacyChecklist",
        id: "MC-010",
        name: "Privacy Checklist Contract",
        required_paths: &["docs/privacy-checklist.md"],
    },
];

/// One evaluated module contract, tagged with the flag that gated it.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleCheckResult {
    pub id: String,
    pub name: String,
    #[serde(rename = "flagKey")]
    pub flag_key: String,
    #[serde(rename = "result")]
    pub outcome: Outcome,
    pub reason: String,
}

/// Evaluate the module contract table against enabled flags.
///
/// Returns an empty list when the package manifest did not parse; module
/// contracts share the same gate as the manifest-dependent checks.
pub fn run_module_checks(facts: &ProjectFacts) -> Vec<ModuleCheckResult> {
    if facts.package_manifest.parsed().is_none() {
        return Vec::new();
    }

    MODULE_CONTRACTS
        .iter()
        .map(|contract| {
            if !facts.flag_enabled(contract.flag_key) {
                return ModuleCheckResult {
                    id: contract.id.to_string(),
                    name: contract.name.to_string(),
                    flag_key: contract.flag_key.to_string(),
                    outcome: Outcome::Skipped,
                    reason: format!("{} is not enabled.", contract.flag_key),
                };
            }

            // Collect every missing path, never short-circuit.
            let missing: Vec<&str> = contract
                .required_paths
                .iter()
                .filter(|rel| !facts.project_dir.join(rel).exists())
                .copied()
                .collect();

            if missing.is_empty() {
                ModuleCheckResult {
                    id: contract.id.to_string(),
                    name: contract.name.to_string(),
                    flag_key: contract.flag_key.to_string(),
                    outcome: Outcome::Pass,
                    reason: String::new(),
                }
            } else {
                ModuleCheckResult {
                    id: contract.id.to_string(),
                    name: contract.name.to_string(),
                    flag_key: contract.flag_key.to_string(),
                    outcome: Outcome::Fail,
                    reason: format!("Missing required files: {}", missing.join(", ")),
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, rel: &str, content: &str) {
        let path = dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn project_with_metadata(metadata: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        write(&dir, "package.json", "{}");
        write(&dir, "skill.modules.json", metadata);
        dir
    }

    #[test]
    fn test_disabled_flags_skip_without_file_checks() {
        let dir = project_with_metadata(r#"{"modules": {}}"#);
        let facts = facts::gather(dir.path());
        let results = run_module_checks(&facts);

        assert_eq!(results.len(), MODULE_CONTRACTS.len());
        for result in &results {
            assert_eq!(result.outcome, Outcome::Skipped);
            assert!(result.reason.ends_with("is not enabled."));
        }
    }

    #[test]
    fn test_enabled_flag_with_complete_scaffolding_passes() {
        let dir = project_with_metadata(r#"{"modules": {"withAnalytics": true}}"#);
        write(&dir, "src/observability/analytics.ts", "export {};");
        let facts = facts::gather(dir.path());
        let results = run_module_checks(&facts);

        let analytics = results.iter().find(|r| r.id == "MC-006").unwrap();
        assert_eq!(analytics.outcome, Outcome::Pass);
        assert!(analytics.reason.is_empty());
    }

    #[test]
    fn test_enabled_flag_collects_all_missing_paths() {
        let dir = project_with_metadata(r#"{"modules": {"withProfile": true}}"#);
        let facts = facts::gather(dir.path());
        let results = run_module_checks(&facts);

        let profile = results.iter().find(|r| r.id == "MC-002").unwrap();
        assert_eq!(profile.outcome, Outcome::Fail);
        assert_eq!(
            profile.reason,
            "Missing required files: app/settings.tsx, src/profile/ProfileActions.tsx"
        );
    }

    #[test]
    fn test_single_missing_path_listed_alone() {
        let dir = project_with_metadata(
            r#"{"modules": {"withLocalization": true, "withAnalytics": true}}"#,
        );
        write(&dir, "src/localization/i18n.ts", "export {};");
        write(&dir, "src/observability/analytics.ts", "export {};");
        let facts = facts::gather(dir.path());
        let results = run_module_checks(&facts);

        let localization = results.iter().find(|r| r.id == "MC-008").unwrap();
        assert_eq!(localization.outcome, Outcome::Fail);
        assert_eq!(
            localization.reason,
            "Missing required files: src/localization/messages/en.ts"
        );
        // A complete module is unaffected by its neighbor's failure.
        let analytics = results.iter().find(|r| r.id == "MC-006").unwrap();
        assert_eq!(analytics.outcome, Outcome::Pass);
    }

    #[test]
    fn test_unparsable_package_yields_no_module_results() {
        let dir = TempDir::new().unwrap();
        write(&dir, "package.json", "{broken");
        write(
            &dir,
            "skill.modules.json",
            r#"{"modules": {"withAuth": true}}"#,
        );
        let facts = facts::gather(dir.path());
        assert!(run_module_checks(&facts).is_empty());
    }

    #[test]
    fn test_metadata_unreadable_treats_all_flags_disabled() {
        let dir = TempDir::new().unwrap();
        write(&dir, "package.json", "{}");
        write(&dir, "skill.modules.json", "{broken");
        let facts = facts::gather(dir.path());
        let results = run_module_checks(&facts);
        assert!(results.iter().all(|r| r.outcome == Outcome::Skipped));
    }
}
