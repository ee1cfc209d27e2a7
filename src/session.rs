//! Line-oriented front end over a [`HistoryManager`].
//!
//! A [`Session`] reads one command per line, applies it to its manager and
//! writes a human-readable outcome. Rejected operations are reported and
//! logged; they never end the session.
//!
//! # Commands
//!
//! ```text
//! add <description> [--due DATE] [--tags a,b]
//! delete <description>
//! done <description>
//! list [all|completed|pending]
//! undo | redo | history | help | quit
//! ```

use crate::error::{ErrorKind, InvalidStateReason, Result, TaskListError};
use crate::history::{Change, HistoryManager};
use crate::task::{TaskDraft, TaskFilter};
use colored::Colorize;
use std::io::{BufRead, Write};
use tracing::{debug, error, info, warn};

/// Help text printed by the `help` command.
pub const HELP: &str = "\
Commands:
  add <description> [--due DATE] [--tags a,b]   Add a task
  delete <description>                          Delete a task
  done <description>                            Mark a task completed
  list [all|completed|pending]                  List tasks
  undo                                          Undo the last action
  redo                                          Redo the last undone action
  history                                       Show undo/redo depth
  help                                          Show this help
  quit                                          Leave the session";

/// Sample session replayed by `tasklist demo`.
pub const DEMO_SCRIPT: &str = r#"# Add some tasks
add "Buy groceries" --due 2023-09-20
add "Pay bills" --due 2023-09-25 --tags finance,urgent
add "Complete Assignment" --due 2023-09-22 --tags urgent
add "Attend Vishal's party" --due 2023-10-21 --tags Leisure
add "Read a book" --due 2023-10-21

list
done "Buy groceries"
list completed

delete "Read a book"
undo
delete "Attend Vishal's party"
delete "Attend Vishal's party"

# Bring back "Attend Vishal's party", step back past the completion, replay it
undo
undo
redo
"#;

// ============================================================================
// Command
// ============================================================================

/// A parsed session command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(TaskDraft),
    Delete(String),
    Done(String),
    List(Option<String>),
    Undo,
    Redo,
    History,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line. Returns `Ok(None)` for blank lines and comments.
    ///
    /// # Errors
    ///
    /// Returns [`TaskListError::InvalidArgument`] for unbalanced quotes,
    /// unknown commands or missing arguments.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let words =
            shlex::split(line).ok_or_else(|| TaskListError::invalid_argument("input", line))?;
        let Some((name, args)) = words.split_first() else {
            return Ok(None);
        };

        let command = match name.as_str() {
            "add" => Command::Add(parse_add(args)?),
            "delete" | "rm" => Command::Delete(required_description(args, "delete <description>")?),
            "done" | "complete" => {
                Command::Done(required_description(args, "done <description>")?)
            }
            "list" | "ls" => match args {
                [] => Command::List(None),
                [filter] if filter == "all" => Command::List(None),
                [filter] => Command::List(Some(filter.clone())),
                _ => return Err(usage("list [all|completed|pending]")),
            },
            "undo" => Command::Undo,
            "redo" => Command::Redo,
            "history" => Command::History,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(TaskListError::invalid_argument("command", other)),
        };
        Ok(Some(command))
    }
}

fn usage(text: &str) -> TaskListError {
    TaskListError::invalid_argument("usage", text)
}

fn required_description(args: &[String], usage_text: &str) -> Result<String> {
    if args.is_empty() {
        return Err(usage(usage_text));
    }
    Ok(args.join(" "))
}

fn parse_add(args: &[String]) -> Result<TaskDraft> {
    const USAGE: &str = "add <description> [--due DATE] [--tags a,b]";

    let mut words = Vec::new();
    let mut due = None;
    let mut tags = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--due" => due = Some(iter.next().ok_or_else(|| usage(USAGE))?.clone()),
            "--tags" => {
                let list = iter.next().ok_or_else(|| usage(USAGE))?;
                tags = Some(list.split(',').map(str::to_string).collect::<Vec<_>>());
            }
            _ => words.push(arg.as_str()),
        }
    }

    if words.is_empty() {
        return Err(usage(USAGE));
    }

    let mut draft = TaskDraft::new(words.join(" "));
    if let Some(due) = due {
        draft = draft.due_text(due);
    }
    if let Some(tags) = tags {
        draft = draft.tags(tags);
    }
    Ok(draft)
}

// ============================================================================
// Session
// ============================================================================

/// Whether the session should keep reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Runs commands against a [`HistoryManager`] and renders the outcomes.
pub struct Session<W: Write> {
    manager: HistoryManager,
    out: W,
    color: bool,
}

impl<W: Write> Session<W> {
    /// Create a session writing to `out`.
    pub fn new(manager: HistoryManager, out: W) -> Self {
        Self {
            manager,
            out,
            color: false,
        }
    }

    /// Enable or disable colored output.
    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// The underlying manager.
    pub fn manager(&self) -> &HistoryManager {
        &self.manager
    }

    /// Consume the session, returning the manager and writer.
    pub fn into_parts(self) -> (HistoryManager, W) {
        (self.manager, self.out)
    }

    /// Read and execute lines until input ends or `quit` is entered.
    ///
    /// With `prompt` set, `> ` is written before each line.
    ///
    /// # Errors
    ///
    /// Only I/O failures on the input or output end the run with an error.
    pub fn run<R: BufRead>(&mut self, input: R, prompt: bool) -> Result<()> {
        let mut lines = input.lines();
        loop {
            if prompt {
                write!(self.out, "> ")?;
                self.out.flush()?;
            }
            let Some(line) = lines.next() else {
                break;
            };
            if self.execute_line(&line?)? == Flow::Quit {
                break;
            }
        }
        self.out.flush()?;
        Ok(())
    }

    /// Parse and execute a single line.
    ///
    /// # Errors
    ///
    /// Returns an error only when writing the outcome fails.
    pub fn execute_line(&mut self, line: &str) -> Result<Flow> {
        match Command::parse(line) {
            Ok(Some(command)) => self.execute(command),
            Ok(None) => Ok(Flow::Continue),
            Err(e) => {
                warn!("Rejected input '{}': {}", line.trim(), e);
                self.error_line(&e.to_string())?;
                Ok(Flow::Continue)
            }
        }
    }

    /// Execute a parsed command.
    ///
    /// # Errors
    ///
    /// Returns an error only when writing the outcome fails.
    pub fn execute(&mut self, command: Command) -> Result<Flow> {
        debug!("Executing {:?}", command);
        match command {
            Command::Add(draft) => {
                let outcome = self.manager.add_task(draft);
                self.report_change(outcome)?;
            }
            Command::Delete(description) => {
                let outcome = self.manager.delete_task(&description);
                self.report_change(outcome)?;
            }
            Command::Done(description) => {
                let outcome = self.manager.mark_task_completed(&description);
                self.report_change(outcome)?;
            }
            Command::List(filter) => match TaskFilter::parse_optional(filter.as_deref()) {
                Ok(filter) => self.list(filter)?,
                Err(e) => self.report_error(&e)?,
            },
            Command::Undo => match self.manager.undo() {
                Ok(()) => {
                    info!("Undid the last action");
                    self.success_line("Undid the last action. Tasks at present:")?;
                    self.list(TaskFilter::All)?;
                }
                Err(e) => self.report_error(&e)?,
            },
            Command::Redo => match self.manager.redo() {
                Ok(()) => {
                    info!("Redid the last action");
                    self.success_line("Redid the last action. Tasks at present:")?;
                    self.list(TaskFilter::All)?;
                }
                Err(e) => self.report_error(&e)?,
            },
            Command::History => {
                writeln!(
                    self.out,
                    "Undo steps: {}, redo steps: {}",
                    self.manager.undo_depth(),
                    self.manager.redo_depth()
                )?;
            }
            Command::Help => writeln!(self.out, "{}", HELP)?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn list(&mut self, filter: TaskFilter) -> Result<()> {
        let heading = if self.color {
            filter.heading().bold().to_string()
        } else {
            filter.heading().to_string()
        };
        writeln!(self.out, "{}", heading)?;
        for line in self.manager.view(filter) {
            writeln!(self.out, "{}", line)?;
        }
        Ok(())
    }

    fn report_change(&mut self, outcome: Result<Change>) -> Result<()> {
        let message = match outcome {
            Ok(Change::Added(task)) => format!("Added task: {}", task.display()),
            Ok(Change::Deleted(task)) => format!("Deleted task: {}", task.display()),
            Ok(Change::Completed(task)) => {
                format!("Marked task as completed: {}", task.display())
            }
            Err(e) => return self.report_error(&e),
        };
        info!("{}", message);
        self.success_line(&message)
    }

    fn report_error(&mut self, err: &TaskListError) -> Result<()> {
        let message = match err {
            TaskListError::Validation { field, reason } if field == "due_date" => {
                format!(
                    "Invalid date: {}\nPlease enter a valid date in the format {}",
                    reason,
                    self.manager.config().date_format
                )
            }
            TaskListError::Validation { reason, .. } => format!("Invalid task: {}", reason),
            TaskListError::InvalidState {
                description,
                reason,
            } => match reason {
                InvalidStateReason::NotFound => {
                    format!("No pending task found with description: {} (not found)", description)
                }
                InvalidStateReason::AlreadyCompleted => format!(
                    "No pending task found with description: {} (already completed)",
                    description
                ),
            },
            other => other.to_string(),
        };

        if err.kind() == ErrorKind::NoHistory {
            warn!("{}", err);
        } else {
            error!("{}", err);
        }
        self.error_line(&message)
    }

    fn success_line(&mut self, message: &str) -> Result<()> {
        if self.color {
            writeln!(self.out, "{}", message.green())?;
        } else {
            writeln!(self.out, "{}", message)?;
        }
        Ok(())
    }

    fn error_line(&mut self, message: &str) -> Result<()> {
        if self.color {
            writeln!(self.out, "{}", message.red())?;
        } else {
            writeln!(self.out, "{}", message)?;
        }
        Ok(())
    }
}
