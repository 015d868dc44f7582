use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Overall state of an analysis run as reported by the backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Pending,
    Completed,
    Failed,
    Unknown,
}

impl Default for ReportStatus {
    fn default() -> Self {
        ReportStatus::Unknown
    }
}

impl ReportStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "pending" | "running" | "queued" => ReportStatus::Pending,
            "completed" | "complete" | "done" => ReportStatus::Completed,
            "failed" | "error" => ReportStatus::Failed,
            _ => ReportStatus::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Medium
    }
}

impl Severity {
    /// Backend severity strings vary in casing; anything unrecognized maps to Medium.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "low" | "minor" | "info" => Severity::Low,
            "high" | "major" => Severity::High,
            "critical" | "blocker" => Severity::Critical,
            _ => Severity::Medium,
        }
    }
}

/// Three-state fix lifecycle used by the dashboard issue table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum IssueStatus {
    #[default]
    Open,
    Fixed,
    Ignored,
}

impl IssueStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "open" | "reopened" => Some(IssueStatus::Open),
            "fixed" | "resolved" => Some(IssueStatus::Fixed),
            "ignored" | "wont_fix" | "wontfix" => Some(IssueStatus::Ignored),
            _ => None,
        }
    }
}

/// A single detected issue within a module.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Finding {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub severity: Severity,
    pub element: Option<String>,
    pub recommendation: Option<String>,
    pub fixed: bool,
    pub fix_timestamp: Option<String>,
    pub status: IssueStatus,
    pub ado_work_item_id: Option<i64>,
    pub ado_status: Option<String>,
    pub ado_url: Option<String>,
    pub screenshot: Option<String>,
    pub video: Option<String>,
    pub screenshot_base64: Option<String>,
    pub video_base64: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Module {
    pub key: String,
    pub title: String,
    pub score: Option<f64>,
    pub findings: Vec<Finding>,
    pub recommendations: Vec<String>,
    pub threshold_met: Option<bool>,
    pub analytics_enabled: Option<bool>,
    /// True for modules synthesized from scenario telemetry rather than
    /// asserted by the backend.
    pub derived: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct ScenarioStep {
    pub action: String,
    pub status: String,
    pub duration_ms: u64,
    pub selector: Option<String>,
    pub url: Option<String>,
    pub screenshot: Option<String>,
    pub violations: u32,
    pub errors: Vec<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct ScenarioResult {
    pub name: String,
    pub status: String,
    pub score: Option<f64>,
    pub duration_ms: u64,
    pub steps: Vec<ScenarioStep>,
}

/// One entry in a finding's fix lifecycle log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FixHistoryEntry {
    pub timestamp: String,
    pub note: String,
    pub developer: Option<String>,
}

/// Canonical, shape-independent view model consumed by the dashboard.
///
/// Constructed once per raw document fetch and treated as an immutable value;
/// the only mutation paths are the fix-lifecycle merge and the media merge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct NormalizedReport {
    pub analysis_id: String,
    pub url: Option<String>,
    pub status: ReportStatus,
    pub total_issues: usize,
    pub modules: Vec<Module>,
    pub timestamp: Option<String>,
    pub app_type: Option<String>,
    pub overall_score: Option<f64>,
    pub performance_metrics: Option<Value>,
    pub has_screenshots: bool,
    pub ado_integration: Option<Value>,
    pub scenario_results: Vec<ScenarioResult>,
    /// Oldest backend shape: flat issue objects preserved verbatim for the
    /// legacy rendering path. Callers must handle both this and `modules`.
    pub ux_issues: Vec<Value>,
    pub is_failed: bool,
    pub ui_error: Option<String>,
    /// Fix lifecycle log, keyed by issue ref (`{module_key}-{finding_index}`).
    pub fix_history: BTreeMap<String, Vec<FixHistoryEntry>>,
}

impl NormalizedReport {
    pub fn module(&self, key: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.key == key)
    }

    pub fn module_mut(&mut self, key: &str) -> Option<&mut Module> {
        self.modules.iter_mut().find(|m| m.key == key)
    }

    /// Sum of findings across all modules.
    pub fn computed_issue_total(&self) -> usize {
        self.modules.iter().map(|m| m.findings.len()).sum()
    }
}
