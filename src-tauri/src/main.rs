#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use serde::Deserialize;
use std::time::Duration;
use uxaudit_core::lifecycle::fixes::{
    apply_fix, merge_fix_response, set_status, FixApplicationResponse, IssueRef,
};
use uxaudit_core::lifecycle::journal::{now_rfc3339_utc, FixAction, FixJournal, JournalRecord};
use uxaudit_core::media::merge::merge_media;
use uxaudit_core::media::model::EnhancedReport;
use uxaudit_core::render::colors::{
    issue_status_color_class, report_status_label, severity_color_class,
};
use uxaudit_core::render::csv::render_findings_csv;
use uxaudit_core::render::urls::{to_absolute_url, DEFAULT_ORIGIN};
use uxaudit_core::report::model::{IssueStatus, NormalizedReport};
use uxaudit_core::report::normalize::normalize;

#[derive(Debug, Deserialize)]
struct FixRequest {
    module_key: String,
    finding_index: usize,
    note: String,
    developer: Option<String>,
}

/// Normalize a raw report document for rendering. Never fails: unparseable
/// JSON degrades to an empty-but-valid report.
#[tauri::command]
fn load_report(raw_json: String) -> NormalizedReport {
    let raw: serde_json::Value =
        serde_json::from_str(&raw_json).unwrap_or(serde_json::Value::Null);
    normalize(&raw)
}

/// Fetch the optional enhanced-report document. The only async operation in
/// the dashboard; dropping the invoke (view unmount, re-navigation) cancels
/// the request, and failure means "no extra media", never a broken report.
#[tauri::command]
async fn fetch_enhanced_report(json_file: String) -> Result<EnhancedReport, String> {
    let url = to_absolute_url(Some(&json_file), DEFAULT_ORIGIN)
        .ok_or_else(|| format!("invalid enhanced report reference: {}", json_file))?;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .map_err(|e| e.to_string())?;
    let value: serde_json::Value = client
        .get(&url)
        .send()
        .await
        .map_err(|e| format!("enhanced report fetch failed: {}", e))?
        .error_for_status()
        .map_err(|e| format!("enhanced report fetch failed: {}", e))?
        .json()
        .await
        .map_err(|e| format!("enhanced report is not JSON: {}", e))?;

    Ok(EnhancedReport::from_value(&value))
}

/// Pure merge of already-fetched media into an already-normalized report.
#[tauri::command]
fn merge_enhanced_media(
    mut report: NormalizedReport,
    enhanced: Option<EnhancedReport>,
) -> NormalizedReport {
    merge_media(&mut report, enhanced.as_ref());
    report
}

#[tauri::command]
fn apply_issue_fix(
    mut report: NormalizedReport,
    request: FixRequest,
) -> Result<NormalizedReport, String> {
    let already_fixed = report
        .module(&request.module_key)
        .and_then(|m| m.findings.get(request.finding_index))
        .map(|f| f.fixed)
        .unwrap_or(false);

    let entry = apply_fix(
        &mut report,
        &request.module_key,
        request.finding_index,
        &request.note,
        request.developer.as_deref(),
    )
    .map_err(|e| e.to_string())?;

    let action = if already_fixed {
        FixAction::Reconfirmed
    } else {
        FixAction::Fixed
    };
    journal_append(&report, &request.module_key, request.finding_index, action, &entry.note, entry.developer.clone());

    Ok(report)
}

#[tauri::command]
fn set_issue_status(
    mut report: NormalizedReport,
    module_key: String,
    finding_index: usize,
    status: String,
) -> Result<NormalizedReport, String> {
    let status = IssueStatus::parse(&status)
        .ok_or_else(|| format!("unknown issue status: {}", status))?;
    let issue = IssueRef::new(&module_key, finding_index);
    let entry = set_status(&mut report, &issue, status).map_err(|e| e.to_string())?;

    let action = match status {
        IssueStatus::Open => FixAction::Reopened,
        IssueStatus::Fixed => FixAction::Fixed,
        IssueStatus::Ignored => FixAction::Ignored,
    };
    journal_append(&report, &module_key, finding_index, action, &entry.note, None);

    Ok(report)
}

/// Fold the external fix API's response into the report after the outbound
/// call (made by the frontend) succeeded.
#[tauri::command]
fn record_fix_response(
    mut report: NormalizedReport,
    module_key: String,
    finding_index: usize,
    response: FixApplicationResponse,
) -> Result<NormalizedReport, String> {
    let issue = IssueRef::new(&module_key, finding_index);
    merge_fix_response(&mut report, &issue, &response).map_err(|e| e.to_string())?;
    Ok(report)
}

#[tauri::command]
fn export_findings_csv(report: NormalizedReport) -> Result<String, String> {
    render_findings_csv(&report).map_err(|e| e.to_string())
}

/// Resolve a link for rendering; relative paths resolve against the backend
/// origin, garbage resolves to nothing.
#[tauri::command]
fn resolve_link(href: Option<String>) -> Option<String> {
    to_absolute_url(href.as_deref(), DEFAULT_ORIGIN)
}

#[tauri::command]
fn style_classes(report: NormalizedReport) -> Vec<(String, String, String)> {
    report
        .modules
        .iter()
        .flat_map(|m| {
            m.findings.iter().enumerate().map(move |(i, f)| {
                (
                    format!("{}-{}", m.key, i),
                    severity_color_class(f.severity).to_string(),
                    issue_status_color_class(f.status).to_string(),
                )
            })
        })
        .collect()
}

#[tauri::command]
fn status_banner(report: NormalizedReport) -> String {
    report_status_label(report.status).to_string()
}

/// Best effort: a journal write failure must never fail the fix action the
/// user just confirmed.
fn journal_append(
    report: &NormalizedReport,
    module_key: &str,
    finding_index: usize,
    action: FixAction,
    note: &str,
    developer: Option<String>,
) {
    let path = std::env::temp_dir().join("uxaudit_fix_journal.ndjson");
    let result = FixJournal::open_or_create(&path).and_then(|mut journal| {
        journal.append(JournalRecord {
            ts_utc: now_rfc3339_utc(),
            report_id: report.analysis_id.clone(),
            issue_ref: IssueRef::new(module_key, finding_index).id(),
            action,
            note: note.to_string(),
            developer,
            prev_entry_hash: String::new(),
            entry_hash: String::new(),
        })
    });
    if let Err(e) = result {
        eprintln!("fix journal append failed: {}", e);
    }
}

fn main() {
    tauri::Builder::default()
        .invoke_handler(tauri::generate_handler![
            load_report,
            fetch_enhanced_report,
            merge_enhanced_media,
            apply_issue_fix,
            set_issue_status,
            record_fix_response,
            export_findings_csv,
            resolve_link,
            style_classes,
            status_banner
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
