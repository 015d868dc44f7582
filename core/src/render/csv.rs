use crate::error::CoreResult;
use crate::report::model::NormalizedReport;

/// Render the issue table as CSV for export from the dashboard.
pub fn render_findings_csv(report: &NormalizedReport) -> CoreResult<String> {
    let mut csv =
        String::from("module,index,severity,type,message,status,fixed,ado_work_item_id\n");

    for module in &report.modules {
        for (index, finding) in module.findings.iter().enumerate() {
            let severity = serde_json::to_value(finding.severity)?;
            let status = serde_json::to_value(finding.status)?;
            csv.push_str(&format!(
                "{},{},{},{},{},{},{},{}\n",
                csv_field(&module.key),
                index,
                severity.as_str().unwrap_or("medium"),
                csv_field(&finding.kind),
                csv_field(&finding.message),
                status.as_str().unwrap_or("open"),
                finding.fixed,
                finding
                    .ado_work_item_id
                    .map(|id| id.to_string())
                    .unwrap_or_default(),
            ));
        }
    }

    Ok(csv)
}

/// Quote fields containing separators; embedded quotes are doubled.
fn csv_field(raw: &str) -> String {
    if raw.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}
