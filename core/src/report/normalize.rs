use super::classify::{classify, ReportShape};
use super::model::{
    Finding, Module, NormalizedReport, ReportStatus, ScenarioResult, Severity,
};
use super::synthesize::derive_findings_from_scenarios;
use crate::render::urls::{to_absolute_url, DEFAULT_ORIGIN};
use serde_json::Value;

const LEGACY_RECOMMENDATION: &str =
    "Review this issue against current UX guidance and re-run the analysis to confirm the fix.";

/// Normalize a raw report document into the canonical view model.
///
/// Total function: any input, including null and garbage, produces a valid
/// `NormalizedReport`. Malformed documents degrade to an empty report rather
/// than an error; only an explicit backend failure is surfaced as
/// `is_failed` with a human-readable `ui_error`.
pub fn normalize(raw: &Value) -> NormalizedReport {
    normalize_with_origin(raw, DEFAULT_ORIGIN)
}

/// `normalize` with an explicit origin for resolving relative URL fields.
pub fn normalize_with_origin(raw: &Value, origin: &str) -> NormalizedReport {
    let shape = classify(raw);

    let mut report = NormalizedReport {
        analysis_id: str_field(raw, "analysis_id").unwrap_or_default(),
        url: to_absolute_url(str_field(raw, "url").as_deref(), origin),
        status: str_field(raw, "status")
            .map(|s| ReportStatus::parse(&s))
            .unwrap_or(ReportStatus::Unknown),
        timestamp: str_field(raw, "timestamp"),
        app_type: str_field(raw, "app_type"),
        overall_score: f64_field(raw, "overall_score"),
        performance_metrics: raw.get("performance_metrics").filter(|v| !v.is_null()).cloned(),
        has_screenshots: raw
            .get("has_screenshots")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        ado_integration: raw.get("ado_integration").filter(|v| !v.is_null()).cloned(),
        scenario_results: scenario_results_from_value(raw.get("scenario_results")),
        ..NormalizedReport::default()
    };

    match shape {
        ReportShape::Failed => {
            // Failure is decided here, once, and never contradicted by later
            // merges. The rest of the metadata stays displayable.
            report.status = ReportStatus::Failed;
            report.is_failed = true;
            report.ui_error = str_field(raw, "ui_error").or_else(|| str_field(raw, "error"));
            report.overall_score = Some(0.0);
            if report.timestamp.is_none() {
                report.timestamp = Some(now_rfc3339_utc());
            }
            report.modules = Vec::new();
            report.total_issues = 0;
            return report;
        }
        ReportShape::Current => {
            if let Some(results) = raw.get("module_results").and_then(Value::as_object) {
                report.modules = results
                    .iter()
                    .map(|(key, entry)| module_from_entry(key, entry))
                    .collect();
            }
        }
        ReportShape::DerivedFromScenarios => {
            report.modules = derive_findings_from_scenarios(&report.scenario_results);
        }
        ReportShape::LegacyModules => {
            if let Some(modules) = raw.get("modules").and_then(Value::as_object) {
                report.modules = modules
                    .iter()
                    .map(|(key, entry)| legacy_module_from_entry(key, entry))
                    .collect();
            }
        }
        ReportShape::LegacyFlatIssues => {
            // Preserved verbatim for the legacy rendering path; not force-fit
            // into the Module/Finding shape.
            if let Some(issues) = raw.get("ux_issues").and_then(Value::as_array) {
                report.ux_issues = issues.clone();
            }
        }
        ReportShape::Unknown => {}
    }

    let computed = report.computed_issue_total();
    report.total_issues = match explicit_total(raw) {
        // An explicit backend count is preferred, but an empty report is
        // never inflated to a non-zero total.
        Some(n) if n == 0 || computed > 0 || !report.ux_issues.is_empty() => n,
        _ => computed,
    };

    report
}

/// `raw.total_issues` when it is a finite, non-negative number.
fn explicit_total(raw: &Value) -> Option<usize> {
    let n = raw.get("total_issues")?.as_f64()?;
    if n.is_finite() && n >= 0.0 {
        Some(n as usize)
    } else {
        None
    }
}

fn module_from_entry(key: &str, entry: &Value) -> Module {
    Module {
        key: key.to_string(),
        title: str_field(entry, "title").unwrap_or_else(|| title_from_key(key)),
        score: f64_field(entry, "score"),
        findings: entry
            .get("findings")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(finding_from_value).collect())
            .unwrap_or_default(),
        recommendations: string_vec(entry.get("recommendations")),
        threshold_met: entry.get("threshold_met").and_then(Value::as_bool),
        analytics_enabled: entry.get("analytics_enabled").and_then(Value::as_bool),
        derived: false,
    }
}

/// Legacy flat module entry: `{score, issues: [{title, description, severity}]}`.
fn legacy_module_from_entry(key: &str, entry: &Value) -> Module {
    let findings = entry
        .get("issues")
        .and_then(Value::as_array)
        .map(|issues| {
            issues
                .iter()
                .map(|issue| Finding {
                    kind: str_field(issue, "title").unwrap_or_else(|| "issue".to_string()),
                    message: str_field(issue, "description").unwrap_or_default(),
                    severity: str_field(issue, "severity")
                        .map(|s| Severity::parse(&s))
                        .unwrap_or(Severity::Medium),
                    recommendation: Some(LEGACY_RECOMMENDATION.to_string()),
                    ..Finding::default()
                })
                .collect()
        })
        .unwrap_or_default();

    Module {
        key: key.to_string(),
        title: title_from_key(key),
        score: f64_field(entry, "score"),
        findings,
        ..Module::default()
    }
}

fn finding_from_value(v: &Value) -> Finding {
    Finding {
        id: str_field(v, "id").or_else(|| v.get("id").and_then(Value::as_i64).map(|n| n.to_string())),
        kind: str_field(v, "type")
            .or_else(|| str_field(v, "title"))
            .unwrap_or_else(|| "issue".to_string()),
        message: str_field(v, "message")
            .or_else(|| str_field(v, "description"))
            .unwrap_or_default(),
        severity: str_field(v, "severity")
            .map(|s| Severity::parse(&s))
            .unwrap_or(Severity::Medium),
        element: str_field(v, "element"),
        recommendation: str_field(v, "recommendation"),
        fixed: v.get("fixed").and_then(Value::as_bool).unwrap_or(false),
        fix_timestamp: str_field(v, "fix_timestamp"),
        status: str_field(v, "status")
            .and_then(|s| crate::report::model::IssueStatus::parse(&s))
            .unwrap_or_default(),
        ado_work_item_id: v.get("ado_work_item_id").and_then(Value::as_i64),
        ado_status: str_field(v, "ado_status"),
        ado_url: str_field(v, "ado_url"),
        screenshot: str_field(v, "screenshot"),
        video: str_field(v, "video"),
        screenshot_base64: str_field(v, "screenshot_base64"),
        video_base64: str_field(v, "video_base64"),
    }
}

/// Lenient scenario parse: elements that do not deserialize are skipped
/// rather than failing the whole report.
fn scenario_results_from_value(v: Option<&Value>) -> Vec<ScenarioResult> {
    let Some(items) = v.and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| serde_json::from_value(item.clone()).ok())
        .collect()
}

fn str_field(v: &Value, key: &str) -> Option<String> {
    v.get(key).and_then(Value::as_str).map(str::to_string)
}

fn f64_field(v: &Value, key: &str) -> Option<f64> {
    v.get(key).and_then(Value::as_f64).filter(|n| n.is_finite())
}

fn string_vec(v: Option<&Value>) -> Vec<String> {
    v.and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// "ux_heuristics" -> "Ux Heuristics"
fn title_from_key(key: &str) -> String {
    key.split(['_', '-'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn now_rfc3339_utc() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_default()
}
