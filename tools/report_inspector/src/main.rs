use serde_json::json;
use uxaudit_core::report::classify::classify;
use uxaudit_core::report::normalize::normalize;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("usage: report_inspector <path/to/report.json>");
        std::process::exit(2);
    }

    let raw_text = match std::fs::read_to_string(&args[1]) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("cannot read {}: {}", args[1], e);
            std::process::exit(2);
        }
    };

    // Unparseable documents normalize like any other unknown shape.
    let raw: serde_json::Value =
        serde_json::from_str(&raw_text).unwrap_or(serde_json::Value::Null);
    let shape = classify(&raw);
    let report = normalize(&raw);

    let modules: Vec<_> = report
        .modules
        .iter()
        .map(|m| {
            json!({
                "key": m.key,
                "title": m.title,
                "score": m.score,
                "findings": m.findings.len(),
                "derived": m.derived,
            })
        })
        .collect();

    let summary = json!({
        "shape": format!("{:?}", shape),
        "analysis_id": report.analysis_id,
        "status": report.status,
        "is_failed": report.is_failed,
        "ui_error": report.ui_error,
        "total_issues": report.total_issues,
        "modules": modules,
        "scenario_count": report.scenario_results.len(),
        "legacy_issue_count": report.ux_issues.len(),
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&summary).unwrap_or_default()
    );

    if report.is_failed {
        std::process::exit(1);
    }
}
