use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Sort rank: high outranks medium outranks low.
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        };
        f.write_str(s)
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(format!("unknown priority: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Completed,
    Incomplete,
}

impl Status {
    pub fn toggle(self) -> Self {
        match self {
            Status::Completed => Status::Incomplete,
            Status::Incomplete => Status::Completed,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Completed => "completed",
            Status::Incomplete => "incomplete",
        };
        f.write_str(s)
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "completed" => Ok(Status::Completed),
            "incomplete" => Ok(Status::Incomplete),
            other => Err(format!("unknown status: {other}")),
        }
    }
}

/// A single task as persisted in the owner's `tasks_<email>` blob.
/// `id` and `created_at` are assigned at creation and never change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: Status,
    #[serde(with = "time::serde::rfc3339")]
    pub deadline: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Fields the caller supplies when creating a task.
#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: Status,
    pub deadline: OffsetDateTime,
}

/// Partial update; unset fields keep their prior values.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    pub deadline: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Completed,
    Incomplete,
}

impl StatusFilter {
    pub fn matches(self, status: Status) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Completed => status == Status::Completed,
            StatusFilter::Incomplete => status == Status::Incomplete,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "all" => Ok(StatusFilter::All),
            "completed" => Ok(StatusFilter::Completed),
            "incomplete" => Ok(StatusFilter::Incomplete),
            other => Err(format!("unknown status filter: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorityFilter {
    All,
    High,
    Medium,
    Low,
}

impl PriorityFilter {
    pub fn matches(self, priority: Priority) -> bool {
        match self {
            PriorityFilter::All => true,
            PriorityFilter::High => priority == Priority::High,
            PriorityFilter::Medium => priority == Priority::Medium,
            PriorityFilter::Low => priority == Priority::Low,
        }
    }
}

impl FromStr for PriorityFilter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "all" => Ok(PriorityFilter::All),
            "high" => Ok(PriorityFilter::High),
            "medium" => Ok(PriorityFilter::Medium),
            "low" => Ok(PriorityFilter::Low),
            other => Err(format!("unknown priority filter: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    /// Ascending by deadline.
    Deadline,
    /// Descending by rank, ties broken by creation time ascending.
    Priority,
    /// Most recently created first.
    Created,
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "deadline" => Ok(SortBy::Deadline),
            "priority" => Ok(SortBy::Priority),
            "created" => Ok(SortBy::Created),
            other => Err(format!("unknown sort key: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskFilters {
    pub status: StatusFilter,
    pub priority: PriorityFilter,
    pub sort_by: SortBy,
}

impl Default for TaskFilters {
    fn default() -> Self {
        Self {
            status: StatusFilter::All,
            priority: PriorityFilter::All,
            sort_by: SortBy::Deadline,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub incomplete: usize,
    pub overdue: usize,
}

/// Parse a user-supplied deadline: a plain `YYYY-MM-DD` date (interpreted
/// as midnight UTC, matching the original form input) or a full RFC 3339
/// timestamp.
pub fn parse_deadline(input: &str) -> Result<OffsetDateTime> {
    let input = input.trim();
    if let Ok(date) = Date::parse(input, format_description!("[year]-[month]-[day]")) {
        return Ok(date.midnight().assume_utc());
    }
    OffsetDateTime::parse(input, &Rfc3339)
        .map_err(|_| Error::validation(format!("invalid deadline: {input} (expected YYYY-MM-DD)")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn status_toggle_roundtrip() {
        assert_eq!(Status::Incomplete.toggle(), Status::Completed);
        assert_eq!(Status::Incomplete.toggle().toggle(), Status::Incomplete);
    }

    #[test]
    fn priority_rank_order() {
        assert!(Priority::High.rank() > Priority::Medium.rank());
        assert!(Priority::Medium.rank() > Priority::Low.rank());
    }

    #[test]
    fn task_json_uses_original_field_names() {
        let task = Task {
            id: "1".into(),
            title: "Ship".into(),
            description: String::new(),
            priority: Priority::High,
            status: Status::Incomplete,
            deadline: datetime!(2025-02-01 00:00:00 UTC),
            created_at: datetime!(2025-01-01 09:30:00 UTC),
        };
        let json = serde_json::to_string(&task).unwrap();
        assert!(json.contains("\"createdAt\""));
        assert!(json.contains("\"priority\":\"high\""));
        assert!(json.contains("\"status\":\"incomplete\""));

        let back: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(back, task);
    }

    #[test]
    fn parse_deadline_accepts_date_and_rfc3339() {
        assert_eq!(
            parse_deadline("2025-03-01").unwrap(),
            datetime!(2025-03-01 00:00:00 UTC)
        );
        assert_eq!(
            parse_deadline("2025-03-01T12:30:00Z").unwrap(),
            datetime!(2025-03-01 12:30:00 UTC)
        );
        assert!(matches!(
            parse_deadline("next tuesday"),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn filter_matching() {
        assert!(StatusFilter::All.matches(Status::Completed));
        assert!(StatusFilter::Completed.matches(Status::Completed));
        assert!(!StatusFilter::Completed.matches(Status::Incomplete));
        assert!(PriorityFilter::All.matches(Priority::Low));
        assert!(!PriorityFilter::High.matches(Priority::Low));
    }

    #[test]
    fn default_filters_match_the_dashboard() {
        let filters = TaskFilters::default();
        assert_eq!(filters.status, StatusFilter::All);
        assert_eq!(filters.priority, PriorityFilter::All);
        assert_eq!(filters.sort_by, SortBy::Deadline);
    }
}
