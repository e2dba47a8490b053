use anyhow::bail;
use tired_engine::format_duration;

use super::Context;
use crate::output::{print_json, print_records, print_rejections};

pub fn run(ctx: &Context) -> anyhow::Result<()> {
    let lines = ctx.read_lines()?;
    let outcome = ctx.parse_batch(&lines, &ctx.marker)?;

    if ctx.json {
        print_json(&outcome)?;
    } else if outcome.accepted.is_empty() && outcome.is_clean() {
        println!("No new work records.");
    } else {
        print_records(&outcome.accepted);
        print_rejections(&outcome.rejected);
        println!();
        println!(
            "{} record(s), {} total, {} pending, {} invalid",
            outcome.accepted.len(),
            format_duration(outcome.total_seconds()),
            outcome.pending.len(),
            outcome.error_count()
        );
    }

    if !outcome.is_clean() {
        bail!("{} invalid work record(s)", outcome.error_count());
    }
    Ok(())
}
