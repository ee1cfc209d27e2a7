//! Task records, task drafts and listing filters.
//!
//! - [`Task`] - A validated task held by the list
//! - [`TaskDraft`] - Unvalidated input for a new task
//! - [`TaskFilter`] - Which tasks a listing shows

use crate::error::{Result, TaskListError};
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

/// Date format used when rendering due dates.
pub const DISPLAY_DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// Task
// ============================================================================

/// A single task.
///
/// The description is the task's key within a list. Apart from the
/// completion flag a task never changes after construction; the history
/// manager shares tasks between snapshots and copies one before completing
/// it, so completing a task never reaches back into older snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    description: String,
    due_date: Option<NaiveDate>,
    tags: Option<Vec<String>>,
    completed: bool,
}

impl Task {
    /// Create a pending task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskListError::Validation`] if the description is blank.
    ///
    /// # Example
    ///
    /// ```
    /// use tasklist::Task;
    ///
    /// let task = Task::new("Pay bills", None, Some(vec!["finance".into()])).unwrap();
    /// assert_eq!(task.display(), "Pay bills - Pending, Tags: finance");
    /// ```
    pub fn new(
        description: impl Into<String>,
        due_date: Option<NaiveDate>,
        tags: Option<Vec<String>>,
    ) -> Result<Self> {
        let description = description.into();
        let description = description.trim();
        if description.is_empty() {
            return Err(TaskListError::validation(
                "description",
                "description must not be empty",
            ));
        }

        Ok(Self {
            description: description.to_string(),
            due_date,
            tags: tags.map(dedup_tags),
            completed: false,
        })
    }

    /// The task's description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The due date, if any.
    #[must_use]
    pub fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Tags in insertion order, if any.
    #[must_use]
    pub fn tags(&self) -> Option<&[String]> {
        self.tags.as_deref()
    }

    /// Whether the task has been completed.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Mark the task completed. Calling this twice is a no-op.
    pub fn mark_completed(&mut self) {
        self.completed = true;
    }

    /// Render the task as a single line.
    ///
    /// Format: `<description> - <Completed|Pending>[, Due: YYYY-MM-DD][, Tags: a, b]`
    #[must_use]
    pub fn display(&self) -> String {
        let status = if self.completed { "Completed" } else { "Pending" };
        let mut output = format!("{} - {}", self.description, status);

        if let Some(due) = self.due_date {
            output.push_str(&format!(", Due: {}", due.format(DISPLAY_DATE_FORMAT)));
        }

        if let Some(tags) = self.tags.as_ref().filter(|t| !t.is_empty()) {
            output.push_str(&format!(", Tags: {}", tags.join(", ")));
        }

        output
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

fn dedup_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_string();
        if !tag.is_empty() && !seen.contains(&tag) {
            seen.push(tag);
        }
    }
    seen
}

// ============================================================================
// Task Draft
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum DueInput {
    Date(NaiveDate),
    Text(String),
}

/// Unvalidated input for a new task.
///
/// Drafts carry due dates either as a parsed [`NaiveDate`] or as raw text
/// from a user; the text form is parsed when the draft is built.
///
/// # Example
///
/// ```
/// use tasklist::TaskDraft;
///
/// let task = TaskDraft::new("Pay bills")
///     .due_text("2023-09-25")
///     .tags(["finance", "urgent"])
///     .build("%Y-%m-%d")
///     .unwrap();
/// assert_eq!(task.display(), "Pay bills - Pending, Due: 2023-09-25, Tags: finance, urgent");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskDraft {
    description: String,
    due: Option<DueInput>,
    tags: Option<Vec<String>>,
}

impl TaskDraft {
    /// Start a draft with the given description.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    /// Set an already parsed due date.
    #[must_use]
    pub fn due(mut self, date: NaiveDate) -> Self {
        self.due = Some(DueInput::Date(date));
        self
    }

    /// Set a due date to be parsed on [`build`](Self::build).
    #[must_use]
    pub fn due_text(mut self, text: impl Into<String>) -> Self {
        self.due = Some(DueInput::Text(text.into()));
        self
    }

    /// Set the tags.
    #[must_use]
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    /// The draft's description, as given.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Validate the draft and produce a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskListError::Validation`] for a blank description or a
    /// due date that does not match `date_format`.
    pub fn build(self, date_format: &str) -> Result<Task> {
        let due_date = match self.due {
            None => None,
            Some(DueInput::Date(date)) => Some(date),
            Some(DueInput::Text(text)) => Some(parse_due_date(&text, date_format)?),
        };
        Task::new(self.description, due_date, self.tags)
    }
}

impl From<&str> for TaskDraft {
    fn from(description: &str) -> Self {
        Self::new(description)
    }
}

impl From<String> for TaskDraft {
    fn from(description: String) -> Self {
        Self::new(description)
    }
}

/// Parse a due date using the given `chrono` format string.
///
/// # Errors
///
/// Returns [`TaskListError::Validation`] if the text is not a valid date.
pub fn parse_due_date(text: &str, date_format: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), date_format).map_err(|e| {
        TaskListError::validation("due_date", format!("'{}' is not a valid date: {}", text, e))
    })
}

// ============================================================================
// Task Filter
// ============================================================================

/// Which tasks a listing includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskFilter {
    /// Every task
    #[default]
    All,
    /// Completed tasks only
    Completed,
    /// Pending tasks only
    Pending,
}

impl TaskFilter {
    /// Check whether a task passes this filter.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Completed => task.is_completed(),
            TaskFilter::Pending => !task.is_completed(),
        }
    }

    /// Parse an optional filter name; `None` means [`TaskFilter::All`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskListError::InvalidArgument`] for anything other than
    /// `"completed"` or `"pending"`.
    pub fn parse_optional(name: Option<&str>) -> Result<Self> {
        name.map_or(Ok(TaskFilter::All), str::parse)
    }

    /// Heading used when listing tasks with this filter.
    #[must_use]
    pub fn heading(&self) -> &'static str {
        match self {
            TaskFilter::All => "All tasks:",
            TaskFilter::Completed => "Completed tasks:",
            TaskFilter::Pending => "Pending tasks:",
        }
    }
}

impl FromStr for TaskFilter {
    type Err = TaskListError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "completed" => Ok(TaskFilter::Completed),
            "pending" => Ok(TaskFilter::Pending),
            other => Err(TaskListError::invalid_argument("filter", other)),
        }
    }
}

impl fmt::Display for TaskFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskFilter::All => write!(f, "all"),
            TaskFilter::Completed => write!(f, "completed"),
            TaskFilter::Pending => write!(f, "pending"),
        }
    }
}
