use serde_json::Value;

/// The known historical shapes of a raw analysis report document.
///
/// The backend has shipped four incompatible JSON layouts over its lifetime.
/// This tag is the single source of truth for which one a document is in;
/// no other component probes raw fields to make that call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportShape {
    /// Explicit backend failure (`status: "failed"` or an `error` field).
    Failed,
    /// Current layout: `module_results` mapping with per-module findings.
    Current,
    /// No aggregated findings, but scenario telemetry to derive them from.
    DerivedFromScenarios,
    /// Legacy flat `modules` mapping (score + issues per key).
    LegacyModules,
    /// Oldest layout: a flat `ux_issues` list and nothing else.
    LegacyFlatIssues,
    /// None of the above. Rendered as an empty-but-valid report, not an error.
    Unknown,
}

/// Select the shape of a raw report document. First match wins.
///
/// Total over any JSON value including null and garbage; a missing or
/// mistyped field degrades to the next rule rather than failing.
pub fn classify(raw: &Value) -> ReportShape {
    let Some(obj) = raw.as_object() else {
        return ReportShape::Unknown;
    };

    let failed_status = obj
        .get("status")
        .and_then(Value::as_str)
        .map(|s| s.eq_ignore_ascii_case("failed"))
        .unwrap_or(false);
    let has_error = obj.get("error").map(|v| !v.is_null()).unwrap_or(false);
    if failed_status || has_error {
        return ReportShape::Failed;
    }

    if let Some(results) = obj.get("module_results").and_then(Value::as_object) {
        if !results.is_empty() {
            return ReportShape::Current;
        }
    }

    if let Some(scenarios) = obj.get("scenario_results").and_then(Value::as_array) {
        if !scenarios.is_empty() {
            return ReportShape::DerivedFromScenarios;
        }
    }

    if obj.get("modules").map(Value::is_object).unwrap_or(false) {
        return ReportShape::LegacyModules;
    }

    if let Some(issues) = obj.get("ux_issues").and_then(Value::as_array) {
        if !issues.is_empty() {
            return ReportShape::LegacyFlatIssues;
        }
    }

    ReportShape::Unknown
}
