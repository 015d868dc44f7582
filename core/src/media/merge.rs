use super::model::{EnhancedReport, MediaAttachment};
use crate::report::model::{Finding, NormalizedReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MediaKind {
    Screenshot,
    Video,
}

/// Merge visual evidence from the secondary fetch into a normalized report.
///
/// Attachment fields that are already populated are never overwritten; only
/// empty ones are filled in. `None` (fetch skipped or failed) leaves the
/// report exactly as normalized.
pub fn merge_media(report: &mut NormalizedReport, enhanced: Option<&EnhancedReport>) {
    let Some(enhanced) = enhanced else {
        return;
    };

    let mut any_screenshot = false;
    for shot in &enhanced.media_attachments.screenshots {
        any_screenshot |= attach(report, shot, MediaKind::Screenshot);
    }
    for video in &enhanced.media_attachments.videos {
        attach(report, video, MediaKind::Video);
    }
    if any_screenshot {
        // Additive only: never flips back to false.
        report.has_screenshots = true;
    }
}

/// Returns true when the attachment landed somewhere.
fn attach(report: &mut NormalizedReport, att: &MediaAttachment, kind: MediaKind) -> bool {
    // Finding targets: module key plus id or index.
    if let Some(module_key) = &att.module_key {
        let Some(module) = report.module_mut(module_key) else {
            return false;
        };
        let finding = match (&att.finding_id, att.finding_index) {
            (Some(id), _) => module
                .findings
                .iter_mut()
                .find(|f| f.id.as_deref() == Some(id.as_str())),
            (None, Some(index)) => module.findings.get_mut(index),
            (None, None) => None,
        };
        return match finding {
            Some(f) => fill_finding(f, att, kind),
            None => false,
        };
    }

    // Id-only targets: search every module.
    if let Some(id) = &att.finding_id {
        for module in &mut report.modules {
            if let Some(f) = module
                .findings
                .iter_mut()
                .find(|f| f.id.as_deref() == Some(id.as_str()))
            {
                return fill_finding(f, att, kind);
            }
        }
        return false;
    }

    // Scenario step targets carry screenshots only.
    if kind == MediaKind::Screenshot {
        if let (Some(scenario), Some(step_index)) = (&att.scenario, att.step_index) {
            if let Some(step) = report
                .scenario_results
                .iter_mut()
                .find(|s| &s.name == scenario)
                .and_then(|s| s.steps.get_mut(step_index))
            {
                if is_blank(&step.screenshot) {
                    if let Some(url) = &att.url {
                        step.screenshot = Some(url.clone());
                        return true;
                    }
                }
            }
        }
    }

    false
}

fn fill_finding(finding: &mut Finding, att: &MediaAttachment, kind: MediaKind) -> bool {
    let mut filled = false;
    match kind {
        MediaKind::Screenshot => {
            if is_blank(&finding.screenshot) && att.url.is_some() {
                finding.screenshot = att.url.clone();
                filled = true;
            }
            if is_blank(&finding.screenshot_base64) && att.base64.is_some() {
                finding.screenshot_base64 = att.base64.clone();
                filled = true;
            }
        }
        MediaKind::Video => {
            if is_blank(&finding.video) && att.url.is_some() {
                finding.video = att.url.clone();
                filled = true;
            }
            if is_blank(&finding.video_base64) && att.base64.is_some() {
                finding.video_base64 = att.base64.clone();
                filled = true;
            }
        }
    }
    filled
}

/// Empty strings count as unpopulated.
fn is_blank(field: &Option<String>) -> bool {
    field.as_deref().map_or(true, str::is_empty)
}
