//! Tasklist - in-memory task list with undo/redo
//!
//! Tasks can be added, deleted, completed and listed; every change can be
//! undone and redone. History is kept as full snapshots of the list, so
//! stepping back and forth is exact whatever the operation was.
//!
//! # Architecture
//!
//! - [`task`] - Task records, drafts and listing filters
//! - [`history`] - The [`HistoryManager`] and its snapshots
//! - [`session`] - Line-oriented command front end
//! - [`config`] - Settings loading
//! - [`error`] - Error types
//!
//! # Example
//!
//! ```
//! use tasklist::{HistoryManager, TaskDraft};
//!
//! let mut manager = HistoryManager::new();
//! manager.add_task(TaskDraft::new("Pay bills").due_text("2023-09-25"))?;
//! manager.mark_task_completed("Pay bills")?;
//!
//! let done: Vec<String> = manager.view_tasks(Some("completed"))?.collect();
//! assert_eq!(done, vec!["Pay bills - Completed, Due: 2023-09-25"]);
//!
//! manager.undo()?;
//! assert!(!manager.get("Pay bills").unwrap().is_completed());
//! # Ok::<(), tasklist::TaskListError>(())
//! ```

pub mod config;
pub mod error;
pub mod history;
pub mod session;
pub mod task;

// Re-export commonly used types
pub use error::{ErrorKind, HistoryDirection, InvalidStateReason, Result, TaskListError};

pub use config::TaskListConfig;
pub use history::{Change, HistoryManager, ManagerConfig, Snapshot};
pub use session::{Command, Flow, Session};
pub use task::{Task, TaskDraft, TaskFilter};
