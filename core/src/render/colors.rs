use crate::report::model::{IssueStatus, ReportStatus, Severity};

/// CSS class for a severity badge.
pub fn severity_color_class(severity: Severity) -> &'static str {
    match severity {
        Severity::Low => "sev-low",
        Severity::Medium => "sev-medium",
        Severity::High => "sev-high",
        Severity::Critical => "sev-critical",
    }
}

/// CSS class for an issue's lifecycle state in the issue table.
pub fn issue_status_color_class(status: IssueStatus) -> &'static str {
    match status {
        IssueStatus::Open => "status-open",
        IssueStatus::Fixed => "status-fixed",
        IssueStatus::Ignored => "status-ignored",
    }
}

/// Human-readable label for the report banner.
pub fn report_status_label(status: ReportStatus) -> &'static str {
    match status {
        ReportStatus::Pending => "Analysis in progress",
        ReportStatus::Completed => "Analysis completed",
        ReportStatus::Failed => "Analysis failed",
        ReportStatus::Unknown => "Status unknown",
    }
}
