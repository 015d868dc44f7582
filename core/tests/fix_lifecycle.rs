use serde_json::json;
use uxaudit_core::error::CoreError;
use uxaudit_core::lifecycle::fixes::{
    apply_fix, merge_fix_response, set_status, FixApplicationResponse, IssueRef,
};
use uxaudit_core::report::model::{IssueStatus, NormalizedReport};
use uxaudit_core::report::normalize::normalize;

fn sample_report() -> NormalizedReport {
    normalize(&json!({
        "analysis_id": "a_100",
        "module_results": {
            "accessibility": {
                "findings": [
                    {"type": "contrast", "message": "Low contrast", "severity": "high"},
                    {"type": "alt_text", "message": "Missing alt", "severity": "medium"}
                ]
            },
            "usability": {
                "findings": [
                    {"type": "labels", "message": "Ambiguous labels", "severity": "low"}
                ]
            }
        }
    }))
}

#[test]
fn apply_fix_mutates_exactly_one_finding() {
    let mut report = sample_report();
    let before = report.clone();

    let entry = apply_fix(&mut report, "accessibility", 0, "fixed contrast", Some("sam")).unwrap();

    let fixed = &report.module("accessibility").unwrap().findings[0];
    assert!(fixed.fixed);
    assert_eq!(fixed.status, IssueStatus::Fixed);
    assert_eq!(fixed.fix_timestamp.as_deref(), Some(entry.timestamp.as_str()));

    // Sibling finding and the other module are untouched.
    assert_eq!(
        report.module("accessibility").unwrap().findings[1],
        before.module("accessibility").unwrap().findings[1]
    );
    assert_eq!(report.module("usability"), before.module("usability"));

    // Report-level fields are unchanged.
    assert_eq!(report.analysis_id, before.analysis_id);
    assert_eq!(report.total_issues, before.total_issues);
    assert_eq!(report.status, before.status);
    assert_eq!(report.scenario_results, before.scenario_results);

    // Exactly one history entry, keyed by the synthesized issue id.
    let history = report.fix_history.get("accessibility-0").unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].note, "fixed contrast");
    assert_eq!(history[0].developer.as_deref(), Some("sam"));
}

#[test]
fn reapplying_a_fix_appends_history_without_changing_the_timestamp() {
    let mut report = sample_report();

    apply_fix(&mut report, "accessibility", 0, "fixed contrast", None).unwrap();
    let first_ts = report.module("accessibility").unwrap().findings[0]
        .fix_timestamp
        .clone();

    apply_fix(&mut report, "accessibility", 0, "re-verified after deploy", None).unwrap();

    let finding = &report.module("accessibility").unwrap().findings[0];
    assert!(finding.fixed);
    assert_eq!(finding.fix_timestamp, first_ts);

    let history = report.fix_history.get("accessibility-0").unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].note, "re-verified after deploy");
}

#[test]
fn unknown_module_is_rejected_with_no_partial_mutation() {
    let mut report = sample_report();
    let before = report.clone();

    let err = apply_fix(&mut report, "nope", 0, "x", None).unwrap_err();
    assert!(matches!(err, CoreError::InvalidFixTarget(_)));
    assert_eq!(report, before);
}

#[test]
fn out_of_range_index_is_rejected_with_no_partial_mutation() {
    let mut report = sample_report();
    let before = report.clone();

    let err = apply_fix(&mut report, "accessibility", 99, "x", None).unwrap_err();
    assert!(matches!(err, CoreError::InvalidFixTarget(_)));
    assert_eq!(report, before);
}

#[test]
fn set_status_walks_the_three_state_lifecycle() {
    let mut report = sample_report();
    let issue = IssueRef::new("usability", 0);

    set_status(&mut report, &issue, IssueStatus::Ignored).unwrap();
    assert_eq!(
        report.module("usability").unwrap().findings[0].status,
        IssueStatus::Ignored
    );
    assert!(!report.module("usability").unwrap().findings[0].fixed);

    set_status(&mut report, &issue, IssueStatus::Fixed).unwrap();
    let finding = &report.module("usability").unwrap().findings[0];
    assert!(finding.fixed);
    assert!(finding.fix_timestamp.is_some());

    // Reopening clears the fix state.
    set_status(&mut report, &issue, IssueStatus::Open).unwrap();
    let finding = &report.module("usability").unwrap().findings[0];
    assert_eq!(finding.status, IssueStatus::Open);
    assert!(!finding.fixed);
    assert!(finding.fix_timestamp.is_none());

    assert_eq!(report.fix_history.get("usability-0").unwrap().len(), 3);
}

#[test]
fn merge_fix_response_fills_recommendation_and_maps_status() {
    let mut report = sample_report();
    let issue = IssueRef::new("accessibility", 0);

    let response = FixApplicationResponse {
        status: "ok".to_string(),
        fix_suggestions: vec![
            "Use #1a1a1a on #ffffff".to_string(),
            "Increase font weight".to_string(),
        ],
        issue_status: Some("fixed".to_string()),
    };
    merge_fix_response(&mut report, &issue, &response).unwrap();

    let finding = &report.module("accessibility").unwrap().findings[0];
    assert_eq!(finding.status, IssueStatus::Fixed);
    assert!(finding
        .recommendation
        .as_deref()
        .unwrap()
        .contains("font weight"));
}

#[test]
fn merge_fix_response_never_replaces_an_existing_recommendation() {
    let mut report = sample_report();
    let issue = IssueRef::new("accessibility", 0);
    report.module_mut("accessibility").unwrap().findings[0].recommendation =
        Some("keep me".to_string());

    let response = FixApplicationResponse {
        status: "ok".to_string(),
        fix_suggestions: vec!["overwrite attempt".to_string()],
        issue_status: None,
    };
    merge_fix_response(&mut report, &issue, &response).unwrap();

    assert_eq!(
        report.module("accessibility").unwrap().findings[0]
            .recommendation
            .as_deref(),
        Some("keep me")
    );
    // A response without a recognizable status still lands in history.
    assert_eq!(report.fix_history.get("accessibility-0").unwrap().len(), 1);
}

#[test]
fn issue_ref_id_format() {
    assert_eq!(IssueRef::new("accessibility", 3).id(), "accessibility-3");
}
