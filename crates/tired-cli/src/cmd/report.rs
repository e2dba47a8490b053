use chrono::Datelike;
use serde::Serialize;
use tired_engine::{aggregate, format_duration, report_boundary, Totals};

use super::Context;
use crate::calendar;
use crate::output::{print_json, print_rejections};

#[derive(Debug, Serialize)]
struct Report {
    #[serde(flatten)]
    totals: Totals,
    /// Contracted hours for the current month, when known.
    month_norm_hours: Option<u32>,
    skipped: usize,
}

pub fn run(ctx: &Context) -> anyhow::Result<()> {
    let lines = ctx.read_lines()?;
    let boundary = report_boundary(ctx.now, ctx.zone);
    tracing::debug!(boundary = %boundary, "Report boundary.");

    let outcome = ctx.parse_batch(&lines, &boundary)?;
    if !outcome.is_clean() {
        tracing::warn!(
            number = outcome.error_count(),
            "Some work records are invalid and not counted."
        );
    }

    let local = ctx.now.with_timezone(&ctx.zone);
    let report = Report {
        totals: aggregate(&outcome.accepted, ctx.now),
        month_norm_hours: calendar::working_hours(local.year(), local.month()),
        skipped: outcome.error_count(),
    };

    if ctx.json {
        return print_json(&report);
    }

    print_rejections(&outcome.rejected);
    println!("Today:      {}", format_duration(report.totals.daily));
    println!("This week:  {}", format_duration(report.totals.weekly));
    match report.month_norm_hours {
        Some(hours) => println!(
            "This month: {} of {}h",
            format_duration(report.totals.monthly),
            hours
        ),
        None => println!("This month: {}", format_duration(report.totals.monthly)),
    }
    Ok(())
}
