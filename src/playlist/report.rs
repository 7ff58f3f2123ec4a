//! Plain-text probe report

use chrono::NaiveDateTime;
use std::fmt::Write;

use super::TIMESTAMP_FORMAT;
use crate::models::{ProbeResult, ProbeStatus, ProbeSummary};

const REPORT_WIDTH: usize = 100;

/// Render the detailed report: one section per outcome class, entries sorted by name
pub fn render_report(summary: &ProbeSummary<'_, '_>, generated_at: NaiveDateTime) -> String {
    let (working, failed, invalid) = summary.sorted_by_name();
    let mut out = String::new();

    let _ = writeln!(out, "M3U Stream Test Report");
    let _ = writeln!(out, "Generated: {}", generated_at.format(TIMESTAMP_FORMAT));
    let _ = writeln!(out, "{}\n", "=".repeat(REPORT_WIDTH));

    let sections = [
        ("WORKING STREAMS", working),
        ("FAILED STREAMS", failed),
        ("INVALID URLs", invalid),
    ];
    for (position, (title, items)) in sections.into_iter().enumerate() {
        if position > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "{} ({})", title, items.len());
        let _ = writeln!(out, "{}", "-".repeat(REPORT_WIDTH));
        for item in items {
            write_entry(&mut out, item);
        }
    }

    out
}

fn write_entry(out: &mut String, item: &ProbeResult<'_>) {
    let record = item.record;
    let marker = match item.status {
        ProbeStatus::Working => "✓",
        ProbeStatus::Failed => "✗",
        ProbeStatus::Invalid => "⚠",
    };

    let _ = writeln!(out, "{} {}", marker, record.name());
    let _ = writeln!(out, "  Group: {}", record.group());
    let _ = writeln!(
        out,
        "  Line: {}",
        record.endpoint_line().map(|n| n.to_string()).unwrap_or_default()
    );
    match item.status {
        ProbeStatus::Working => {
            let _ = writeln!(
                out,
                "  Status: {}",
                item.http_status.map(|c| c.to_string()).unwrap_or_default()
            );
        }
        ProbeStatus::Failed | ProbeStatus::Invalid => {
            let _ = writeln!(out, "  Error: {}", item.error_detail.as_deref().unwrap_or_default());
        }
    }
    let _ = writeln!(out, "  URL: {}\n", record.endpoint());
}
