//! Status aggregation: three pure folds over already-computed results.

use serde::Serialize;

use crate::checks::{CheckResult, Outcome, Severity};
use crate::modules::ModuleCheckResult;

/// Three-tier verdict for each status axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pass,
    Partial,
    Fail,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pass => write!(f, "pass"),
            Self::Partial => write!(f, "partial"),
            Self::Fail => write!(f, "fail"),
        }
    }
}

/// Infrastructure axis: fails iff any Blocker check failed. Conditional and
/// skipped results never affect it.
pub fn infra_status(checks: &[CheckResult]) -> Status {
    let blocker_failed = checks
        .iter()
        .any(|c| c.severity == Severity::Blocker && c.outcome == Outcome::Fail);
    if blocker_failed {
        Status::Fail
    } else {
        Status::Pass
    }
}

/// Feature axis: fails iff any module result failed. An empty or
/// all-skipped list passes. The fold is binary today; `overall_status`
/// still maps a partial feature axis so a finer-grained module severity
/// can slot in later.
pub fn feature_status(module_checks: &[ModuleCheckResult]) -> Status {
    let module_failed = module_checks.iter().any(|m| m.outcome == Outcome::Fail);
    if module_failed {
        Status::Fail
    } else {
        Status::Pass
    }
}

/// Overall verdict. Infra and feature failures dominate unconditionally;
/// only then do Conditional failures downgrade to partial.
pub fn overall_status(infra: Status, feature: Status, checks: &[CheckResult]) -> Status {
    if infra == Status::Fail || feature == Status::Fail {
        return Status::Fail;
    }
    let conditional_failed = checks
        .iter()
        .any(|c| c.severity == Severity::Conditional && c.outcome == Outcome::Fail);
    if conditional_failed || feature == Status::Partial {
        return Status::Partial;
    }
    Status::Pass
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(id: &str, severity: Severity, outcome: Outcome) -> CheckResult {
        CheckResult {
            id: id.to_string(),
            name: id.to_string(),
            severity,
            outcome,
            reason: String::new(),
        }
    }

    fn module(id: &str, outcome: Outcome) -> ModuleCheckResult {
        ModuleCheckResult {
            id: id.to_string(),
            name: id.to_string(),
            flag_key: "withTest".to_string(),
            outcome,
            reason: String::new(),
        }
    }

    #[test]
    fn test_infra_fails_iff_blocker_fails() {
        let checks = vec![
            check("VC-001", Severity::Blocker, Outcome::Pass),
            check("VC-002", Severity::Blocker, Outcome::Fail),
        ];
        assert_eq!(infra_status(&checks), Status::Fail);

        let checks = vec![
            check("VC-001", Severity::Blocker, Outcome::Pass),
            check("VC-013", Severity::Conditional, Outcome::Fail),
            check("VC-019", Severity::Blocker, Outcome::Skipped),
        ];
        assert_eq!(infra_status(&checks), Status::Pass);
    }

    #[test]
    fn test_infra_passes_on_empty_list() {
        assert_eq!(infra_status(&[]), Status::Pass);
    }

    #[test]
    fn test_feature_fails_iff_module_fails() {
        assert_eq!(feature_status(&[]), Status::Pass);
        assert_eq!(
            feature_status(&[module("MC-001", Outcome::Skipped)]),
            Status::Pass
        );
        assert_eq!(
            feature_status(&[
                module("MC-001", Outcome::Pass),
                module("MC-002", Outcome::Fail)
            ]),
            Status::Fail
        );
    }

    #[test]
    fn test_dominance_infra_failure_beats_conditional() {
        let checks = vec![
            check("VC-002", Severity::Blocker, Outcome::Fail),
            check("VC-017", Severity::Conditional, Outcome::Fail),
        ];
        let infra = infra_status(&checks);
        assert_eq!(overall_status(infra, Status::Pass, &checks), Status::Fail);
    }

    #[test]
    fn test_dominance_feature_failure_beats_conditional() {
        let checks = vec![check("VC-017", Severity::Conditional, Outcome::Fail)];
        assert_eq!(
            overall_status(Status::Pass, Status::Fail, &checks),
            Status::Fail
        );
    }

    #[test]
    fn test_partial_iff_conditional_failed_and_no_axis_failed() {
        let checks = vec![
            check("VC-001", Severity::Blocker, Outcome::Pass),
            check("VC-017", Severity::Conditional, Outcome::Fail),
        ];
        assert_eq!(
            overall_status(Status::Pass, Status::Pass, &checks),
            Status::Partial
        );
    }

    #[test]
    fn test_skipped_conditional_does_not_trigger_partial() {
        let checks = vec![
            check("VC-001", Severity::Blocker, Outcome::Pass),
            check("VC-013", Severity::Conditional, Outcome::Skipped),
        ];
        assert_eq!(
            overall_status(Status::Pass, Status::Pass, &checks),
            Status::Pass
        );
    }

    #[test]
    fn test_partial_feature_status_maps_to_partial_overall() {
        // No producer of a partial feature axis exists today; the mapping is
        // pinned so a future module severity tier keeps the dominance law.
        assert_eq!(
            overall_status(Status::Pass, Status::Partial, &[]),
            Status::Partial
        );
    }
}
