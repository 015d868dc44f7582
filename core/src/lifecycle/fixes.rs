use crate::error::{CoreError, CoreResult};
use crate::report::model::{Finding, FixHistoryEntry, IssueStatus, NormalizedReport};
use serde::{Deserialize, Serialize};

/// Addresses one finding inside a normalized report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IssueRef {
    pub module_key: String,
    pub finding_index: usize,
}

impl IssueRef {
    pub fn new(module_key: &str, finding_index: usize) -> Self {
        Self {
            module_key: module_key.to_string(),
            finding_index,
        }
    }

    /// Synthesized issue id the lifecycle log is keyed by.
    pub fn id(&self) -> String {
        format!("{}-{}", self.module_key, self.finding_index)
    }
}

/// Response of the external fix-application API. Only `fix_suggestions` and
/// `issue_status` are consumed here; the call itself is outside this core.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FixApplicationResponse {
    pub status: String,
    pub fix_suggestions: Vec<String>,
    pub issue_status: Option<String>,
}

/// Mark one finding fixed and append one history entry.
///
/// Exactly one finding is mutated; every other finding, module and
/// report-level field is left untouched. Re-applying to an already-fixed
/// finding keeps the original `fix_timestamp` but still appends a history
/// entry: re-verification is representable and is not an error.
///
/// An unknown module key or out-of-range index is a caller bug and returns
/// `InvalidFixTarget` with no partial mutation.
pub fn apply_fix(
    report: &mut NormalizedReport,
    module_key: &str,
    finding_index: usize,
    note: &str,
    developer: Option<&str>,
) -> CoreResult<FixHistoryEntry> {
    let entry = FixHistoryEntry {
        timestamp: now_rfc3339_utc(),
        note: note.to_string(),
        developer: developer.map(str::to_string),
    };

    let finding = target_finding_mut(report, module_key, finding_index)?;
    if !finding.fixed {
        finding.fixed = true;
        finding.fix_timestamp = Some(entry.timestamp.clone());
    }
    finding.status = IssueStatus::Fixed;

    let issue_id = IssueRef::new(module_key, finding_index).id();
    report
        .fix_history
        .entry(issue_id)
        .or_default()
        .push(entry.clone());

    Ok(entry)
}

/// Move one finding through the open/fixed/ignored lifecycle.
///
/// Same single-finding-mutation guarantee as `apply_fix`. Reopening clears
/// `fixed` and `fix_timestamp`.
pub fn set_status(
    report: &mut NormalizedReport,
    issue: &IssueRef,
    status: IssueStatus,
) -> CoreResult<FixHistoryEntry> {
    let entry = FixHistoryEntry {
        timestamp: now_rfc3339_utc(),
        note: match status {
            IssueStatus::Open => "issue reopened".to_string(),
            IssueStatus::Fixed => "issue marked fixed".to_string(),
            IssueStatus::Ignored => "issue ignored".to_string(),
        },
        developer: None,
    };

    let finding = target_finding_mut(report, &issue.module_key, issue.finding_index)?;
    finding.status = status;
    match status {
        IssueStatus::Fixed => {
            if !finding.fixed {
                finding.fixed = true;
                finding.fix_timestamp = Some(entry.timestamp.clone());
            }
        }
        IssueStatus::Open => {
            finding.fixed = false;
            finding.fix_timestamp = None;
        }
        IssueStatus::Ignored => {}
    }

    report
        .fix_history
        .entry(issue.id())
        .or_default()
        .push(entry.clone());

    Ok(entry)
}

/// Fold the external fix API's response into the report.
///
/// `issue_status` maps onto the three-state lifecycle; unrecognized values
/// leave the finding's status alone. Suggestions only fill an empty
/// recommendation, never replace an existing one.
pub fn merge_fix_response(
    report: &mut NormalizedReport,
    issue: &IssueRef,
    response: &FixApplicationResponse,
) -> CoreResult<FixHistoryEntry> {
    {
        let finding = target_finding_mut(report, &issue.module_key, issue.finding_index)?;
        if finding.recommendation.as_deref().unwrap_or("").is_empty()
            && !response.fix_suggestions.is_empty()
        {
            finding.recommendation = Some(response.fix_suggestions.join("\n"));
        }
    }

    if let Some(status) = response.issue_status.as_deref().and_then(IssueStatus::parse) {
        return set_status(report, issue, status);
    }

    let entry = FixHistoryEntry {
        timestamp: now_rfc3339_utc(),
        note: format!("fix response received: {}", response.status),
        developer: None,
    };
    report
        .fix_history
        .entry(issue.id())
        .or_default()
        .push(entry.clone());
    Ok(entry)
}

fn target_finding_mut<'a>(
    report: &'a mut NormalizedReport,
    module_key: &str,
    finding_index: usize,
) -> CoreResult<&'a mut Finding> {
    let module = report
        .module_mut(module_key)
        .ok_or_else(|| CoreError::InvalidFixTarget(format!("unknown module {}", module_key)))?;
    let count = module.findings.len();
    module.findings.get_mut(finding_index).ok_or_else(|| {
        CoreError::InvalidFixTarget(format!(
            "finding index {} out of range for module {} ({} findings)",
            finding_index, module_key, count
        ))
    })
}

fn now_rfc3339_utc() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_default()
}
