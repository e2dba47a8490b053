//! Worklog submission to Jira.
//!
//! [`Tracker`] is the seam between the submission loop and the network; the
//! REST client is [`JiraClient`].

use anyhow::Context;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tired_engine::WorkRecord;

/// Jira's timestamp format for `started`.
const STARTED_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub key: String,
    pub summary: String,
    pub worklog_total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Worklog {
    pub comment: String,
    pub started: String,
    pub time_spent_seconds: i64,
}

impl From<&WorkRecord> for Worklog {
    fn from(record: &WorkRecord) -> Self {
        Worklog {
            comment: record.comment.clone(),
            started: record.parsed_start.format(STARTED_FORMAT).to_string(),
            time_spent_seconds: record.duration_seconds,
        }
    }
}

pub trait Tracker {
    fn get_issue(&self, key: &str) -> anyhow::Result<Issue>;
    fn add_worklog(&self, key: &str, worklog: &Worklog) -> anyhow::Result<()>;
}

// ── REST client ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct IssueResponse {
    key: String,
    fields: IssueFields,
}

#[derive(Deserialize)]
struct IssueFields {
    #[serde(default)]
    summary: String,
    worklog: Option<WorklogPage>,
}

#[derive(Deserialize)]
struct WorklogPage {
    total: u64,
}

pub struct JiraClient {
    http: Client,
    base_url: String,
    username: String,
    password: String,
}

impl JiraClient {
    pub fn new(base_url: &str, username: &str, password: &str) -> anyhow::Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("tired/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;
        Ok(JiraClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    fn issue_url(&self, key: &str) -> String {
        format!("{}/rest/api/2/issue/{}", self.base_url, key)
    }
}

impl Tracker for JiraClient {
    fn get_issue(&self, key: &str) -> anyhow::Result<Issue> {
        let response: IssueResponse = self
            .http
            .get(self.issue_url(key))
            .query(&[("fields", "summary,worklog")])
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .and_then(|r| r.error_for_status())
            .with_context(|| format!("can't get access to the issue {key}"))?
            .json()
            .with_context(|| format!("unexpected response for issue {key}"))?;

        Ok(Issue {
            key: response.key,
            summary: response.fields.summary,
            worklog_total: response.fields.worklog.map_or(0, |w| w.total),
        })
    }

    fn add_worklog(&self, key: &str, worklog: &Worklog) -> anyhow::Result<()> {
        self.http
            .post(format!("{}/worklog", self.issue_url(key)))
            .basic_auth(&self.username, Some(&self.password))
            .json(worklog)
            .send()
            .and_then(|r| r.error_for_status())
            .with_context(|| format!("failed to add worklog to {key}"))?;
        Ok(())
    }
}

// ── Submission loop ─────────────────────────────────────────────────────────

/// Send every record to the tracker, one call pair per record.
///
/// Each issue is looked up before its worklog is added; with `dry` the lookup
/// still happens but nothing is written. Returns the number of records that
/// failed. A failure does not stop the remaining records.
pub fn send_work_records(tracker: &dyn Tracker, records: &[WorkRecord], dry: bool) -> usize {
    tracing::info!(number = records.len(), dry, "Sending work records to Jira.");
    let mut failures = 0;

    for record in records {
        let issue = match tracker.get_issue(&record.issue) {
            Ok(issue) => issue,
            Err(e) => {
                let error = format!("{e:#}");
                tracing::error!(
                    line = record.line_number,
                    issue = %record.issue,
                    %error,
                    "Can't get access to the issue."
                );
                failures += 1;
                continue;
            }
        };
        tracing::debug!(
            issue = %issue.key,
            worklog_total = issue.worklog_total,
            summary = %issue.summary,
            "Issue found."
        );

        if !dry {
            if let Err(e) = tracker.add_worklog(&record.issue, &Worklog::from(record)) {
                let error = format!("{e:#}");
                tracing::error!(
                    line = record.line_number,
                    issue = %record.issue,
                    %error,
                    "Failed to add work record to the issue."
                );
                failures += 1;
                continue;
            }
        }

        tracing::info!(
            dry,
            issue = %issue.key,
            summary = %issue.summary,
            spent = record.duration_seconds,
            "Work record added."
        );
    }

    failures
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;

    use super::*;

    /// In-memory tracker that knows a fixed set of issue keys.
    #[derive(Default)]
    pub struct FakeTracker {
        pub known: Vec<String>,
        pub reject_worklogs: bool,
        pub worklogs: RefCell<Vec<(String, Worklog)>>,
    }

    impl FakeTracker {
        pub fn with_issues(keys: &[&str]) -> Self {
            FakeTracker {
                known: keys.iter().map(|k| k.to_string()).collect(),
                ..Default::default()
            }
        }
    }

    impl Tracker for FakeTracker {
        fn get_issue(&self, key: &str) -> anyhow::Result<Issue> {
            if !self.known.iter().any(|k| k == key) {
                anyhow::bail!("404 Not Found");
            }
            Ok(Issue {
                key: key.to_string(),
                summary: format!("Summary of {key}"),
                worklog_total: self.worklogs.borrow().len() as u64,
            })
        }

        fn add_worklog(&self, key: &str, worklog: &Worklog) -> anyhow::Result<()> {
            if self.reject_worklogs {
                anyhow::bail!("403 Forbidden");
            }
            self.worklogs
                .borrow_mut()
                .push((key.to_string(), worklog.clone()));
            Ok(())
        }
    }
}
