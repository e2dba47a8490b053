use anyhow::bail;
use clap::Args;
use tired_engine::{format_duration, relocate_marker_before};

use super::Context;
use crate::jira::{send_work_records, JiraClient, Tracker};
use crate::secret::{self, Keyring, SecretStore};
use crate::timesheet;

#[derive(Args)]
pub struct SubmitArgs {
    /// Jira base URL (default: keyring, then prompt)
    #[arg(long, env = "TIRED_URL")]
    pub url: Option<String>,

    /// Jira username (default: keyring, then prompt)
    #[arg(long, env = "TIRED_USERNAME")]
    pub username: Option<String>,

    /// Jira password or API token (default: keyring, then prompt)
    #[arg(long, env = "TIRED_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Look up the issues but send nothing and leave the timesheet untouched
    #[arg(long)]
    pub dry: bool,
}

/// Jira connection settings after the keyring and prompt fallbacks.
#[derive(Debug, PartialEq, Eq)]
pub struct Credentials {
    pub url: String,
    pub username: String,
    pub password: String,
}

impl SubmitArgs {
    pub fn credentials(
        &self,
        store: &dyn SecretStore,
        prompt: impl Fn(&str) -> anyhow::Result<String>,
    ) -> anyhow::Result<Credentials> {
        Ok(Credentials {
            url: secret::obtain("url", self.url.as_deref(), store, &prompt)?,
            username: secret::obtain("user", self.username.as_deref(), store, &prompt)?,
            password: secret::obtain("password", self.password.as_deref(), store, &prompt)?,
        })
    }
}

pub fn run(ctx: &Context, args: &SubmitArgs) -> anyhow::Result<()> {
    let creds = args.credentials(&Keyring, secret::prompt_hidden)?;
    let tracker = JiraClient::new(&creds.url, &creds.username, &creds.password)?;
    tracing::info!(url = %creds.url, "Connection to Jira configured.");
    submit(ctx, &tracker, args.dry)
}

/// Validate, send, then move the marker below what was sent.
///
/// Nothing is sent if any line is invalid, and the timesheet is only rewritten
/// when every record reached the tracker. An unfinished entry keeps the marker
/// above it so it is picked up once it has an end time; finished entries
/// below an unfinished one are refused for the same reason.
pub fn submit(ctx: &Context, tracker: &dyn Tracker, dry: bool) -> anyhow::Result<()> {
    let size_before = timesheet::file_size(&ctx.timesheet)?;
    let lines = ctx.read_lines()?;
    let outcome = ctx.parse_batch(&lines, &ctx.marker)?;

    if !outcome.is_clean() {
        bail!(
            "{} invalid work record(s), nothing was sent",
            outcome.error_count()
        );
    }

    if outcome.accepted.is_empty() {
        tracing::warn!("No actual work records was found.");
        return Ok(());
    }

    let first_pending = outcome.pending.first().copied();
    if let Some(pending) = first_pending {
        if let Some(after) = outcome.accepted.iter().find(|r| r.line_number > pending) {
            bail!(
                "line {} is unfinished but line {} below it is complete; finish or move it first",
                pending,
                after.line_number
            );
        }
    }

    let failures = send_work_records(tracker, &outcome.accepted, dry);
    if failures > 0 {
        bail!("Jira Time Reporter finished with {failures} error(s)");
    }

    if !dry {
        let position = first_pending.unwrap_or(lines.len() + 1);
        let updated = relocate_marker_before(&lines, &ctx.marker, position);
        timesheet::write_timesheet(&ctx.timesheet, &updated, size_before)?;
    }

    println!(
        "{} {} record(s), {} total{}",
        if dry { "Checked" } else { "Sent" },
        outcome.accepted.len(),
        format_duration(outcome.total_seconds()),
        if dry { " (dry run)" } else { "" }
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::cmd::testing::context;
    use crate::jira::testing::FakeTracker;
    use crate::secret::testing::MemoryStore;

    const SHEET: &str = "2025-01-14,09:00,17:00,ABC-1,\"old\"\n\
        >>> TIRED <<<\n\
        2025-01-15,09:00,10:00,ABC-1,\"first\"\n\
        # break\n\
        2025-01-15,10:30,12:00,ABC-2,\"second\"\n";

    #[test]
    fn test_submit_sends_and_moves_marker() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&dir, SHEET);
        let tracker = FakeTracker::with_issues(&["ABC-1", "ABC-2"]);

        submit(&ctx, &tracker, false).unwrap();

        let sent = tracker.worklogs.borrow();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].1.comment, "first");
        assert_eq!(sent[1].1.time_spent_seconds, 5400);

        let content = fs::read_to_string(&ctx.timesheet).unwrap();
        assert!(content.ends_with("\"second\"\n\n>>> TIRED <<<"));
        assert_eq!(content.matches(">>> TIRED <<<").count(), 1);
        assert_eq!(content.len(), SHEET.len());
        assert_eq!(
            fs::read_to_string(timesheet::backup_path(&ctx.timesheet)).unwrap(),
            SHEET
        );
    }

    #[test]
    fn test_second_run_finds_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&dir, SHEET);
        let tracker = FakeTracker::with_issues(&["ABC-1", "ABC-2"]);

        submit(&ctx, &tracker, false).unwrap();
        submit(&ctx, &tracker, false).unwrap();
        assert_eq!(tracker.worklogs.borrow().len(), 2);
    }

    #[test]
    fn test_dry_run_leaves_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&dir, SHEET);
        let tracker = FakeTracker::with_issues(&["ABC-1", "ABC-2"]);

        submit(&ctx, &tracker, true).unwrap();

        assert!(tracker.worklogs.borrow().is_empty());
        assert_eq!(fs::read_to_string(&ctx.timesheet).unwrap(), SHEET);
        assert!(!timesheet::backup_path(&ctx.timesheet).exists());
    }

    #[test]
    fn test_tracker_failure_keeps_marker() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&dir, SHEET);
        let tracker = FakeTracker::with_issues(&["ABC-1"]);

        let err = submit(&ctx, &tracker, false).unwrap_err();
        assert!(err.to_string().contains("1 error(s)"));
        assert_eq!(fs::read_to_string(&ctx.timesheet).unwrap(), SHEET);
    }

    #[test]
    fn test_invalid_line_sends_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let sheet = format!("{SHEET}2025-01-15,11:00,11:30,abc-3,\"bad\"\n");
        let ctx = context(&dir, &sheet);
        let tracker = FakeTracker::with_issues(&["ABC-1", "ABC-2"]);

        let err = submit(&ctx, &tracker, false).unwrap_err();
        assert!(err.to_string().contains("nothing was sent"));
        assert!(tracker.worklogs.borrow().is_empty());
    }

    #[test]
    fn test_pending_entry_stays_below_marker() {
        let dir = tempfile::tempdir().unwrap();
        let sheet = format!("{SHEET}2025-01-15,13:00,,ABC-2,\"ongoing\"\n");
        let ctx = context(&dir, &sheet);
        let tracker = FakeTracker::with_issues(&["ABC-1", "ABC-2"]);

        submit(&ctx, &tracker, false).unwrap();

        let content = fs::read_to_string(&ctx.timesheet).unwrap();
        assert!(content.contains(">>> TIRED <<<\n2025-01-15,13:00,,ABC-2,\"ongoing\"\n"));
        assert_eq!(content.len(), sheet.len());
    }

    #[test]
    fn test_complete_entry_below_pending_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let sheet = ">>> TIRED <<<\n\
            2025-01-15,09:00,,ABC-1,\"ongoing\"\n\
            2025-01-15,10:00,11:00,ABC-2,\"done\"\n";
        let ctx = context(&dir, sheet);
        let tracker = FakeTracker::with_issues(&["ABC-1", "ABC-2"]);

        let err = submit(&ctx, &tracker, false).unwrap_err();
        assert!(err.to_string().contains("line 2 is unfinished"));
        assert!(tracker.worklogs.borrow().is_empty());
    }

    #[test]
    fn test_nothing_new_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&dir, "2025-01-14,09:00,17:00,ABC-1,\"old\"\n>>> TIRED <<<");
        let tracker = FakeTracker::default();
        submit(&ctx, &tracker, false).unwrap();
    }

    fn args(url: Option<&str>, username: Option<&str>, password: Option<&str>) -> SubmitArgs {
        SubmitArgs {
            url: url.map(str::to_string),
            username: username.map(str::to_string),
            password: password.map(str::to_string),
            dry: false,
        }
    }

    #[test]
    fn test_credentials_from_flags() {
        let store = MemoryStore::default();
        let creds = args(Some("https://jira"), Some("me"), Some("secret"))
            .credentials(&store, |name| panic!("prompted for '{name}'"))
            .unwrap();
        assert_eq!(creds.username, "me");
        assert!(store.values.borrow().is_empty());
    }

    #[test]
    fn test_missing_credentials_come_from_keyring_or_prompt() {
        let store = MemoryStore::with(&[("url", "https://jira.example.com")]);
        let creds = args(None, Some("me"), None)
            .credentials(&store, |name| Ok(format!("typed-{name}")))
            .unwrap();
        assert_eq!(
            creds,
            Credentials {
                url: "https://jira.example.com".to_string(),
                username: "me".to_string(),
                password: "typed-password".to_string(),
            }
        );
        assert_eq!(store.values.borrow()["password"], "typed-password");
        assert!(!store.values.borrow().contains_key("user"));
    }
}
