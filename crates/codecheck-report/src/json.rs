use codecheck_core::types::CheckReport;

/// Format a check report as JSON.
///
/// In errors-only mode per-file scores and the aggregate are dropped, the
/// same as in text output.
pub fn format_report(report: &CheckReport, compact: bool) -> String {
    let stripped;
    let report = if report.errors_only() {
        let mut copy = report.clone();
        copy.aggregate = None;
        for file in &mut copy.files {
            file.score = None;
        }
        stripped = copy;
        &stripped
    } else {
        report
    };

    if compact {
        serde_json::to_string(report).expect("CheckReport should be serializable")
    } else {
        serde_json::to_string_pretty(report).expect("CheckReport should be serializable")
    }
}
