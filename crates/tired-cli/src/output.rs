use serde::Serialize;
use tired_engine::{format_duration, Rejection, WorkRecord};

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

const HEADERS: [&str; 6] = ["LINE", "DATE", "TIME", "SPENT", "ISSUE", "COMMENT"];

/// Columns holding numbers, aligned right.
const NUMERIC: [bool; 6] = [true, false, false, true, false, false];

fn record_cells(r: &WorkRecord) -> [String; 6] {
    [
        r.line_number.to_string(),
        r.date.clone(),
        format!("{}-{}", r.start_time, r.end_time),
        format_duration(r.duration_seconds),
        r.issue.clone(),
        r.comment.clone(),
    ]
}

/// Lay out accepted records as aligned text lines, header first.
///
/// The comment column is last and never padded, so long comments do not
/// widen the table.
pub fn render_records(records: &[WorkRecord]) -> Vec<String> {
    let rows: Vec<[String; 6]> = records.iter().map(record_cells).collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: [&str; 6]| {
        let mut out = String::new();
        for (i, cell) in cells.iter().enumerate() {
            if i > 0 {
                out.push_str("  ");
            }
            let width = if i == cells.len() - 1 { 0 } else { widths[i] };
            if NUMERIC[i] {
                out.push_str(&format!("{cell:>width$}"));
            } else {
                out.push_str(&format!("{cell:<width$}"));
            }
        }
        out.trim_end().to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(line(HEADERS));
    for row in &rows {
        lines.push(line(row.each_ref().map(String::as_str)));
    }
    lines
}

pub fn print_records(records: &[WorkRecord]) {
    for line in render_records(records) {
        println!("{line}");
    }
}

pub fn print_rejections(rejections: &[Rejection]) {
    for rejection in rejections {
        for violation in &rejection.violations {
            println!("line {}: {}", rejection.line_number, violation);
        }
    }
}
