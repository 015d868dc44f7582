use super::model::{Finding, Module, ScenarioResult, Severity};

/// Synthetic module that collects findings derived from scenario telemetry.
pub const SYNTHETIC_MODULE_KEY: &str = "ux_heuristics";

/// Derive module-level findings from scenario step telemetry.
///
/// Used when a report carries scenario results but no aggregated findings.
/// Ids are sequential by emission order (`violation-0`, `error-1`, ...), so
/// re-deriving from the same scenario data yields the same ids and fix state
/// keyed by id does not drift between renders.
///
/// Returns no modules at all when no step produced a violation or error; the
/// normalizer then reports "no issues found" rather than an empty category.
pub fn derive_findings_from_scenarios(scenarios: &[ScenarioResult]) -> Vec<Module> {
    let mut findings: Vec<Finding> = Vec::new();

    for scenario in scenarios {
        for step in &scenario.steps {
            if step.violations > 0 {
                findings.push(Finding {
                    id: Some(format!("violation-{}", findings.len())),
                    kind: "violation".to_string(),
                    message: format!(
                        "{} heuristic violation(s) detected in scenario \"{}\" during step \"{}\"",
                        step.violations, scenario.name, step.action
                    ),
                    severity: Severity::Medium,
                    element: step.selector.clone(),
                    screenshot: step.screenshot.clone(),
                    ..Finding::default()
                });
            }

            let step_error = step
                .error
                .clone()
                .or_else(|| step.errors.first().cloned());
            if step_error.is_some() || step.status == "failed" {
                let detail = step_error.unwrap_or_else(|| "step failed".to_string());
                findings.push(Finding {
                    id: Some(format!("error-{}", findings.len())),
                    kind: "error".to_string(),
                    message: format!(
                        "Scenario \"{}\" step \"{}\" failed: {}",
                        scenario.name, step.action, detail
                    ),
                    severity: Severity::High,
                    element: step.selector.clone(),
                    screenshot: step.screenshot.clone(),
                    ..Finding::default()
                });
            }
        }
    }

    if findings.is_empty() {
        return Vec::new();
    }

    vec![Module {
        key: SYNTHETIC_MODULE_KEY.to_string(),
        title: "UX Heuristics".to_string(),
        findings,
        derived: true,
        ..Module::default()
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::model::ScenarioStep;

    fn scenario(name: &str, steps: Vec<ScenarioStep>) -> ScenarioResult {
        ScenarioResult {
            name: name.to_string(),
            status: "completed".to_string(),
            steps,
            ..ScenarioResult::default()
        }
    }

    fn step(action: &str) -> ScenarioStep {
        ScenarioStep {
            action: action.to_string(),
            status: "passed".to_string(),
            ..ScenarioStep::default()
        }
    }

    #[test]
    fn test_violations_become_medium_findings() {
        let mut s = step("click login");
        s.violations = 2;
        let modules = derive_findings_from_scenarios(&[scenario("login", vec![s])]);

        assert_eq!(modules.len(), 1);
        assert_eq!(modules[0].key, SYNTHETIC_MODULE_KEY);
        assert!(modules[0].derived);
        assert_eq!(modules[0].findings.len(), 1);
        let f = &modules[0].findings[0];
        assert_eq!(f.kind, "violation");
        assert_eq!(f.severity, Severity::Medium);
        assert!(f.message.contains('2'));
        assert!(f.message.contains("login"));
    }

    #[test]
    fn test_failed_step_becomes_high_finding() {
        let mut s = step("submit form");
        s.status = "failed".to_string();
        let modules = derive_findings_from_scenarios(&[scenario("checkout", vec![s])]);

        let f = &modules[0].findings[0];
        assert_eq!(f.kind, "error");
        assert_eq!(f.severity, Severity::High);
        assert!(f.message.contains("checkout"));
    }

    #[test]
    fn test_step_error_field_emits_error_finding() {
        let mut s = step("load page");
        s.error = Some("net::ERR_TIMED_OUT".to_string());
        let modules = derive_findings_from_scenarios(&[scenario("home", vec![s])]);

        assert_eq!(modules[0].findings[0].kind, "error");
        assert!(modules[0].findings[0].message.contains("ERR_TIMED_OUT"));
    }

    #[test]
    fn test_clean_scenarios_yield_no_modules() {
        let modules =
            derive_findings_from_scenarios(&[scenario("login", vec![step("click login")])]);
        assert!(modules.is_empty());
    }

    #[test]
    fn test_ids_are_sequential_and_deterministic() {
        let mut s1 = step("a");
        s1.violations = 1;
        let mut s2 = step("b");
        s2.status = "failed".to_string();
        let scenarios = vec![scenario("flow", vec![s1, s2])];

        let first = derive_findings_from_scenarios(&scenarios);
        let second = derive_findings_from_scenarios(&scenarios);

        let ids: Vec<_> = first[0].findings.iter().map(|f| f.id.clone()).collect();
        assert_eq!(
            ids,
            vec![
                Some("violation-0".to_string()),
                Some("error-1".to_string())
            ]
        );
        assert_eq!(first, second);
    }

    #[test]
    fn test_step_with_violation_and_error_emits_both() {
        let mut s = step("scroll");
        s.violations = 3;
        s.errors = vec!["console error".to_string()];
        let modules = derive_findings_from_scenarios(&[scenario("browse", vec![s])]);

        assert_eq!(modules[0].findings.len(), 2);
        assert_eq!(modules[0].findings[0].kind, "violation");
        assert_eq!(modules[0].findings[1].kind, "error");
    }
}
