use chrono::{DateTime, NaiveDateTime, Utc};

use crate::gitlab::events::Commit;

/// SHA GitLab reports for a ref that did not exist before, or no longer
/// exists after, a push.
pub const ZERO_SHA: &str = "0000000000000000000000000000000000000000";

/// Font colours understood by the WeCom markdown renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusColor {
    Info,
    Warning,
    Default,
}

impl StatusColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Default => "comment",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub label: String,
    pub color: StatusColor,
    pub icon: Option<&'static str>,
}

/// Label, colour and icon for a pipeline or job status.
pub fn format_status(status: &str) -> Status {
    let (label, color, icon) = match status {
        "failed" => ("failed", StatusColor::Warning, Some("✗")),
        "success" => ("succeeded", StatusColor::Info, Some("✓")),
        "running" => ("running", StatusColor::Default, Some("⏳")),
        "pending" => ("pending", StatusColor::Warning, Some("🔄")),
        "canceled" => ("canceled", StatusColor::Default, None),
        "skipped" => ("skipped", StatusColor::Default, None),
        "manual" => ("needs manual trigger", StatusColor::Default, None),
        other => {
            return Status {
                label: format!("unknown status ({})", other),
                color: StatusColor::Default,
                icon: None,
            }
        }
    };
    Status {
        label: label.to_string(),
        color,
        icon,
    }
}

/// Job states that mean the pipeline has not settled yet.
pub fn is_in_flight(status: &str) -> bool {
    matches!(status, "created" | "running" | "pending")
}

/// `45s`, `2m 5s`; an hour or more stays in plain seconds.
pub fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else {
        format!("{}s", seconds)
    }
}

pub fn strip_ref(git_ref: &str) -> &str {
    git_ref
        .strip_prefix("refs/heads/")
        .or_else(|| git_ref.strip_prefix("refs/tags/"))
        .unwrap_or(git_ref)
}

pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefChange {
    Created,
    Deleted,
    Updated,
}

pub fn ref_change(before: &str, after: &str) -> RefChange {
    if before == ZERO_SHA {
        RefChange::Created
    } else if after == ZERO_SHA {
        RefChange::Deleted
    } else {
        RefChange::Updated
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeCounts {
    pub added: usize,
    pub modified: usize,
    pub removed: usize,
}

pub fn count_changes(commits: &[Commit]) -> ChangeCounts {
    commits
        .iter()
        .fold(ChangeCounts::default(), |acc, c| ChangeCounts {
            added: acc.added + c.added.len(),
            modified: acc.modified + c.modified.len(),
            removed: acc.removed + c.removed.len(),
        })
}

/// `MM-DD HH:mm` in UTC. GitLab has shipped both RFC 3339 and
/// `2024-05-01 09:30:00 UTC` style timestamps; anything else is returned
/// as-is.
pub fn format_timestamp(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S %z"))
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S UTC").map(|n| n.and_utc())
        })
        .map(|dt| dt.format("%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| raw.to_string())
}
