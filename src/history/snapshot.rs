//! Point-in-time copies of the task list.

use crate::task::Task;
use std::sync::Arc;

/// The task list as it stood right after one mutation.
///
/// Capturing a snapshot copies the list of task handles, not the tasks.
/// Tasks are only ever modified through [`Arc::make_mut`], which clones any
/// task still referenced here, so a snapshot never changes after capture.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Snapshot {
    tasks: Vec<Arc<Task>>,
}

impl Snapshot {
    /// Capture the given task list.
    #[must_use]
    pub fn capture(tasks: &[Arc<Task>]) -> Self {
        Self {
            tasks: tasks.to_vec(),
        }
    }

    /// Tasks in list order.
    #[must_use]
    pub fn tasks(&self) -> &[Arc<Task>] {
        &self.tasks
    }

    /// Number of tasks in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the snapshot holds no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Check whether this snapshot holds exactly the given tasks, in order.
    #[must_use]
    pub fn matches(&self, tasks: &[Arc<Task>]) -> bool {
        self.tasks.as_slice() == tasks
    }

    pub(crate) fn to_live(&self) -> Vec<Arc<Task>> {
        self.tasks.clone()
    }
}
