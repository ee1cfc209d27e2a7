//! Task list with snapshot-based undo/redo.
//!
//! The [`HistoryManager`] owns the live task list and two stacks of
//! [`Snapshot`]s. Every mutation appends a snapshot of the resulting list to
//! the undo stack and clears the redo stack, so after any successful
//! mutation the undo stack's top is the live list.
//!
//! # Example
//!
//! ```
//! use tasklist::HistoryManager;
//!
//! let mut manager = HistoryManager::new();
//! manager.add_task("A").unwrap();
//! manager.add_task("B").unwrap();
//! manager.delete_task("A").unwrap();
//!
//! manager.undo().unwrap();
//! assert_eq!(manager.descriptions(), vec!["A", "B"]);
//!
//! manager.redo().unwrap();
//! assert_eq!(manager.descriptions(), vec!["B"]);
//! ```

mod snapshot;

pub use snapshot::Snapshot;

use crate::error::{HistoryDirection, InvalidStateReason, Result, TaskListError};
use crate::task::{Task, TaskDraft, TaskFilter, DISPLAY_DATE_FORMAT};
use std::collections::VecDeque;
use std::sync::Arc;

// ============================================================================
// Manager Configuration
// ============================================================================

/// Configuration for a [`HistoryManager`]: history depth and due date parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerConfig {
    /// Maximum number of undo steps retained. `None` keeps everything.
    pub max_history: Option<usize>,

    /// `chrono` format used to parse due dates given as text.
    pub date_format: String,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            max_history: None,
            date_format: DISPLAY_DATE_FORMAT.to_string(),
        }
    }
}

impl ManagerConfig {
    /// Create a new configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound the number of undo steps. Values below 1 are raised to 1.
    #[must_use]
    pub fn with_max_history(mut self, max: usize) -> Self {
        self.max_history = Some(max.max(1));
        self
    }

    /// Set the due date parse format.
    #[must_use]
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }
}

// ============================================================================
// Change
// ============================================================================

/// The effect of a successful mutating operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// A task was appended
    Added(Arc<Task>),
    /// A task was removed
    Deleted(Arc<Task>),
    /// A task was marked completed (holds the completed task)
    Completed(Arc<Task>),
}

impl Change {
    /// The task affected by this change.
    #[must_use]
    pub fn task(&self) -> &Task {
        match self {
            Change::Added(task) | Change::Deleted(task) | Change::Completed(task) => task,
        }
    }
}

// ============================================================================
// History Manager
// ============================================================================

/// Owns the live task list and its undo/redo history.
///
/// Invariants:
/// - `current` equals the top of `undo_stack`, or `baseline` when the undo
///   stack is empty
/// - no two tasks in `current` share a description
#[derive(Debug, Clone, Default)]
pub struct HistoryManager {
    current: Vec<Arc<Task>>,
    undo_stack: VecDeque<Snapshot>,
    redo_stack: Vec<Snapshot>,
    /// State restored once the undo stack is exhausted. Empty unless old
    /// entries were dropped to honor `max_history`.
    baseline: Snapshot,
    config: ManagerConfig,
}

impl HistoryManager {
    /// Create an empty manager with unbounded history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty manager with custom configuration.
    #[must_use]
    pub fn with_config(config: ManagerConfig) -> Self {
        let config = ManagerConfig {
            max_history: config.max_history.map(|max| max.max(1)),
            ..config
        };
        Self {
            config,
            ..Self::default()
        }
    }

    /// Get the current configuration.
    #[must_use]
    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    // ------------------------------------------------------------------------
    // Mutating operations
    // ------------------------------------------------------------------------

    /// Add a task to the end of the list.
    ///
    /// # Errors
    ///
    /// - [`TaskListError::Validation`] if the draft is invalid
    /// - [`TaskListError::DuplicateTask`] if the description is taken
    ///
    /// Neither error changes the list or the history.
    pub fn add_task(&mut self, draft: impl Into<TaskDraft>) -> Result<Change> {
        let task = draft.into().build(&self.config.date_format)?;
        if self.position(task.description()).is_some() {
            return Err(TaskListError::duplicate(task.description()));
        }

        let task = Arc::new(task);
        self.current.push(Arc::clone(&task));
        self.commit();
        Ok(Change::Added(task))
    }

    /// Remove the task with the given description.
    ///
    /// # Errors
    ///
    /// Returns [`TaskListError::NotFound`] if no task matches.
    pub fn delete_task(&mut self, description: &str) -> Result<Change> {
        let index = self
            .position(description)
            .ok_or_else(|| TaskListError::not_found(description))?;

        let task = self.current.remove(index);
        self.commit();
        Ok(Change::Deleted(task))
    }

    /// Mark the task with the given description completed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskListError::InvalidState`] if no task matches or the task
    /// is already completed; the reason tells the two apart.
    pub fn mark_task_completed(&mut self, description: &str) -> Result<Change> {
        let index = self.position(description).ok_or_else(|| {
            TaskListError::invalid_state(description, InvalidStateReason::NotFound)
        })?;

        if self.current[index].is_completed() {
            return Err(TaskListError::invalid_state(
                description,
                InvalidStateReason::AlreadyCompleted,
            ));
        }

        // Clones the task if any snapshot still holds it.
        Arc::make_mut(&mut self.current[index]).mark_completed();
        let task = Arc::clone(&self.current[index]);
        self.commit();
        Ok(Change::Completed(task))
    }

    /// Step back to the state before the last mutation (or redo).
    ///
    /// # Errors
    ///
    /// Returns [`TaskListError::NoHistory`] when there is nothing to undo.
    pub fn undo(&mut self) -> Result<()> {
        let top = self.undo_stack.pop_back().ok_or(TaskListError::NoHistory {
            direction: HistoryDirection::Undo,
        })?;
        debug_assert!(top.matches(&self.current));

        self.current = self.undo_stack.back().unwrap_or(&self.baseline).to_live();
        self.redo_stack.push(top);
        Ok(())
    }

    /// Replay the most recently undone step.
    ///
    /// # Errors
    ///
    /// Returns [`TaskListError::NoHistory`] when there is nothing to redo.
    pub fn redo(&mut self) -> Result<()> {
        let next = self.redo_stack.pop().ok_or(TaskListError::NoHistory {
            direction: HistoryDirection::Redo,
        })?;

        self.current = next.to_live();
        self.undo_stack.push_back(next);
        self.trim();
        Ok(())
    }

    /// Forget all history, keeping the current list as the new baseline.
    pub fn clear_history(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.baseline = Snapshot::capture(&self.current);
    }

    // ------------------------------------------------------------------------
    // Read operations
    // ------------------------------------------------------------------------

    /// Display strings of the tasks passing the named filter.
    ///
    /// `None` lists every task; otherwise the name must be `"completed"` or
    /// `"pending"`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskListError::InvalidArgument`] for any other filter name.
    pub fn view_tasks(&self, filter: Option<&str>) -> Result<impl Iterator<Item = String> + '_> {
        let filter = TaskFilter::parse_optional(filter)?;
        Ok(self.view(filter))
    }

    /// Display strings of the tasks passing `filter`, lazily.
    pub fn view(&self, filter: TaskFilter) -> impl Iterator<Item = String> + '_ {
        self.current
            .iter()
            .filter(move |task| filter.matches(task))
            .map(|task| task.display())
    }

    /// The live task list.
    #[must_use]
    pub fn tasks(&self) -> &[Arc<Task>] {
        &self.current
    }

    /// Descriptions of the live tasks, in order.
    #[must_use]
    pub fn descriptions(&self) -> Vec<&str> {
        self.current.iter().map(|t| t.description()).collect()
    }

    /// Look up a task by description.
    #[must_use]
    pub fn get(&self, description: &str) -> Option<&Task> {
        self.position(description).map(|i| self.current[i].as_ref())
    }

    /// Number of live tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.current.len()
    }

    /// Whether the live list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// Check if undo is available
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of steps that can be undone.
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of steps that can be redone.
    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// The most recent undo snapshot.
    #[must_use]
    pub fn undo_top(&self) -> Option<&Snapshot> {
        self.undo_stack.back()
    }

    /// The most recent redo snapshot.
    #[must_use]
    pub fn redo_top(&self) -> Option<&Snapshot> {
        self.redo_stack.last()
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn position(&self, description: &str) -> Option<usize> {
        let description = description.trim();
        self.current
            .iter()
            .position(|t| t.description() == description)
    }

    /// Record the live list as a new history entry.
    fn commit(&mut self) {
        self.undo_stack.push_back(Snapshot::capture(&self.current));
        self.redo_stack.clear();
        self.trim();
    }

    fn trim(&mut self) {
        let Some(max) = self.config.max_history else {
            return;
        };
        while self.undo_stack.len() > max {
            if let Some(oldest) = self.undo_stack.pop_front() {
                self.baseline = oldest;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn assert_committed(manager: &HistoryManager) {
        let top = manager.undo_top().expect("undo stack should not be empty");
        assert!(top.matches(manager.tasks()));
        assert!(!manager.can_redo());
    }

    #[test]
    fn test_starts_empty() {
        let manager = HistoryManager::new();
        assert!(manager.is_empty());
        assert!(!manager.can_undo());
        assert!(!manager.can_redo());
    }

    #[test]
    fn test_history_flow() {
        let mut manager = HistoryManager::new();

        manager.add_task("A").unwrap();
        assert_committed(&manager);
        manager.add_task("B").unwrap();
        assert_committed(&manager);
        assert_eq!(manager.descriptions(), vec!["A", "B"]);

        manager.delete_task("A").unwrap();
        assert_committed(&manager);
        assert_eq!(manager.descriptions(), vec!["B"]);

        manager.undo().unwrap();
        assert_eq!(manager.descriptions(), vec!["A", "B"]);
        manager.undo().unwrap();
        assert_eq!(manager.descriptions(), vec!["A"]);
        manager.redo().unwrap();
        assert_eq!(manager.descriptions(), vec!["A", "B"]);
        manager.redo().unwrap();
        assert_eq!(manager.descriptions(), vec!["B"]);
    }

    #[test]
    fn test_undo_to_empty_then_no_history() {
        let mut manager = HistoryManager::new();
        manager.add_task("A").unwrap();

        manager.undo().unwrap();
        assert!(manager.is_empty());

        let err = manager.undo().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoHistory);
        assert!(manager.is_empty());
        assert_eq!(manager.redo_depth(), 1);
    }

    #[test]
    fn test_undo_and_redo_on_empty_stacks() {
        let mut manager = HistoryManager::new();
        assert!(matches!(
            manager.undo(),
            Err(TaskListError::NoHistory {
                direction: HistoryDirection::Undo
            })
        ));
        assert!(matches!(
            manager.redo(),
            Err(TaskListError::NoHistory {
                direction: HistoryDirection::Redo
            })
        ));

        manager.add_task("A").unwrap();
        assert!(manager.redo().is_err());
        assert_eq!(manager.descriptions(), vec!["A"]);
    }

    #[test]
    fn test_new_edit_clears_redo() {
        let mut manager = HistoryManager::new();
        manager.add_task("A").unwrap();
        manager.add_task("B").unwrap();
        manager.undo().unwrap();
        assert!(manager.can_redo());

        manager.add_task("C").unwrap();
        assert_committed(&manager);
        assert!(manager.redo().is_err());

        manager.undo().unwrap();
        assert_eq!(manager.descriptions(), vec!["A"]);
    }

    #[test]
    fn test_duplicate_rejected_without_change() {
        let mut manager = HistoryManager::new();
        manager.add_task("A").unwrap();
        manager.undo().unwrap();
        manager.add_task("A").unwrap();

        let depth = manager.undo_depth();
        let err = manager.add_task(" A ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateTask);
        assert_eq!(manager.descriptions(), vec!["A"]);
        assert_eq!(manager.undo_depth(), depth);
    }

    #[test]
    fn test_validation_failure_leaves_state() {
        let mut manager = HistoryManager::new();
        manager.add_task("A").unwrap();
        manager.undo().unwrap();
        manager.redo().unwrap();
        manager.undo().unwrap();

        let err = manager
            .add_task(TaskDraft::new("B").due_text("2023-13-01"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(manager.is_empty());
        assert!(manager.can_redo());

        assert!(manager.add_task("").is_err());
        assert!(manager.can_redo());
    }

    #[test]
    fn test_delete_missing() {
        let mut manager = HistoryManager::new();
        manager.add_task("A").unwrap();
        let err = manager.delete_task("Z").unwrap_err();
        assert!(matches!(err, TaskListError::NotFound { .. }));
        assert_eq!(manager.undo_depth(), 1);
    }

    #[test]
    fn test_mark_completed_reasons() {
        let mut manager = HistoryManager::new();
        manager.add_task("X").unwrap();

        let missing = manager.mark_task_completed("Y").unwrap_err();
        assert!(matches!(
            missing,
            TaskListError::InvalidState {
                reason: InvalidStateReason::NotFound,
                ..
            }
        ));

        let change = manager.mark_task_completed("X").unwrap();
        assert!(change.task().is_completed());
        assert_committed(&manager);

        let again = manager.mark_task_completed("X").unwrap_err();
        assert!(matches!(
            again,
            TaskListError::InvalidState {
                reason: InvalidStateReason::AlreadyCompleted,
                ..
            }
        ));
        assert!(again.to_string().contains("already completed"));
        assert_eq!(manager.undo_depth(), 2);
    }

    #[test]
    fn test_completion_is_not_retroactive() {
        let mut manager = HistoryManager::new();
        manager.add_task("A").unwrap();
        manager.add_task("B").unwrap();
        manager.mark_task_completed("A").unwrap();
        assert!(manager.get("A").unwrap().is_completed());

        manager.undo().unwrap();
        assert!(!manager.get("A").unwrap().is_completed());

        manager.undo().unwrap();
        assert!(!manager.get("A").unwrap().is_completed());

        manager.redo().unwrap();
        manager.redo().unwrap();
        assert!(manager.get("A").unwrap().is_completed());
    }

    #[test]
    fn test_view_tasks_filters() {
        let mut manager = HistoryManager::new();
        manager.add_task("A").unwrap();
        manager.add_task("B").unwrap();
        manager.mark_task_completed("B").unwrap();

        let all: Vec<String> = manager.view_tasks(None).unwrap().collect();
        assert_eq!(all, vec!["A - Pending", "B - Completed"]);

        let done: Vec<String> = manager.view_tasks(Some("completed")).unwrap().collect();
        assert_eq!(done, vec!["B - Completed"]);

        let pending: Vec<String> = manager.view_tasks(Some("pending")).unwrap().collect();
        assert_eq!(pending, vec!["A - Pending"]);
    }

    #[test]
    fn test_view_tasks_bogus_filter() {
        let mut manager = HistoryManager::new();
        manager.add_task("A").unwrap();
        let undo_depth = manager.undo_depth();

        let err = manager.view_tasks(Some("bogus")).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(manager.descriptions(), vec!["A"]);
        assert_eq!(manager.undo_depth(), undo_depth);
        assert_eq!(manager.redo_depth(), 0);
    }

    #[test]
    fn test_view_tasks_rejects_all_name() {
        let mut manager = HistoryManager::new();
        manager.add_task("A").unwrap();
        manager.add_task("B").unwrap();
        manager.undo().unwrap();

        let err = manager.view_tasks(Some("all")).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(err.to_string(), "Invalid filter: all");
        assert_eq!(manager.descriptions(), vec!["A"]);
        assert_eq!(manager.undo_depth(), 1);
        assert_eq!(manager.redo_depth(), 1);
    }

    #[test]
    fn test_history_limit_keeps_baseline() {
        let mut manager = HistoryManager::with_config(ManagerConfig::new().with_max_history(2));
        manager.add_task("A").unwrap();
        manager.add_task("B").unwrap();
        manager.add_task("C").unwrap();
        assert_eq!(manager.undo_depth(), 2);

        manager.undo().unwrap();
        assert_eq!(manager.descriptions(), vec!["A", "B"]);
        manager.undo().unwrap();
        assert_eq!(manager.descriptions(), vec!["A"]);
        assert!(manager.undo().is_err());
        assert_eq!(manager.descriptions(), vec!["A"]);

        manager.redo().unwrap();
        manager.redo().unwrap();
        assert_eq!(manager.descriptions(), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_zero_max_history_is_raised() {
        let manager = HistoryManager::with_config(ManagerConfig {
            max_history: Some(0),
            ..ManagerConfig::default()
        });
        assert_eq!(manager.config().max_history, Some(1));
    }

    #[test]
    fn test_clear_history() {
        let mut manager = HistoryManager::new();
        manager.add_task("A").unwrap();
        manager.add_task("B").unwrap();
        manager.undo().unwrap();

        manager.clear_history();
        assert!(!manager.can_undo());
        assert!(!manager.can_redo());
        assert_eq!(manager.descriptions(), vec!["A"]);

        manager.add_task("C").unwrap();
        manager.undo().unwrap();
        assert_eq!(manager.descriptions(), vec!["A"]);
    }
}
