use colored::{ColoredString, Colorize};

use codecheck_core::types::{CheckReport, FileFailure, FileResult};

/// Format a check report for terminal output.
///
/// A file gets a block when it has messages, or a score outside errors-only
/// mode. Message lines are written exactly as the checker printed them. In
/// errors-only mode no score or average line is written.
pub fn format_report(report: &CheckReport) -> String {
    let errors_only = report.errors_only();
    let mut out = String::new();

    // Header
    out.push_str(&format!(
        "\n{}\n",
        format!("Codecheck - {}", report.tool).bold()
    ));
    out.push_str(&format!("{}\n", "=".repeat(40)));
    if let Some(ref filter) = report.filter {
        out.push_str(&format!("{}: {filter}\n", "Filter".bold()));
    }

    if report.checked_count == 0 {
        out.push_str(&format!("\n{}\n\n", "No files to check.".yellow()));
        return out;
    }

    for file in &report.files {
        out.push_str(&format_file(file, errors_only));
    }

    if !report.failures.is_empty() {
        out.push_str(&format_failures(&report.failures));
    }

    if !errors_only {
        if let Some(ref aggregate) = report.aggregate {
            match aggregate.average_score {
                Some(avg) => out.push_str(&format!(
                    "\n{}: {}/10 over {} scored file(s)\n",
                    "Average score".bold(),
                    color_score(avg),
                    aggregate.scored_count,
                )),
                None => out.push_str(&format!(
                    "\n{}: n/a (no file produced a score)\n",
                    "Average score".bold()
                )),
            }
        }
    }

    out.push_str(&format!(
        "\n{}: {} file(s) checked, {} reported, {} failed\n\n",
        "Summary".bold(),
        report.checked_count,
        report.files.len(),
        report.failures.len(),
    ));
    out
}

fn format_file(file: &FileResult, errors_only: bool) -> String {
    let show_score = !errors_only && file.score.is_some();
    if file.messages.is_empty() && !show_score {
        return String::new();
    }

    let mut out = format!("\n{}\n", file.path.display().to_string().bold());
    for msg in &file.messages {
        out.push_str(&msg.text);
        out.push('\n');
    }
    if show_score {
        if let Some(score) = file.score {
            out.push_str(&format!("  Score: {}/10\n", color_score(score)));
        }
    }
    out
}

fn format_failures(failures: &[FileFailure]) -> String {
    let mut out = format!(
        "\n{} ({})\n{}\n",
        "Failures".red().bold(),
        failures.len(),
        "-".repeat(40),
    );
    for failure in failures {
        out.push_str(&format!(
            "  {}: {} ({})\n",
            failure.path.display(),
            failure.kind,
            failure.detail
        ));
    }
    out
}

fn color_score(score: f64) -> ColoredString {
    let text = format!("{score:.2}");
    if score >= 8.0 {
        text.green()
    } else if score >= 5.0 {
        text.yellow()
    } else {
        text.red()
    }
}
