//! Deadline monitor: finds tasks whose deadline has elapsed and asks the user
//! what to do with each of them.
//!
//! Each elapsed deadline is handled at most once. The `handled` flag is set
//! before the user is asked, so a second tick never asks again unless the
//! deadline was edited in between.

use crate::board::Board;
use crate::clock::Clock;
use crate::deadline::{compose_display_text, parse_deadline};
use crate::error::AppError;
use crate::model::TaskId;
use crate::notify::Notifier;
use crate::view::Surfaces;
use time::OffsetDateTime;

const NEW_DEADLINE_PROMPT: &str = "Enter new deadline (YYYY-MM-DDTHH:MM, empty to cancel):";
const RETRY_DEADLINE_PROMPT: &str =
    "The new deadline must be a future YYYY-MM-DDTHH:MM value (empty to cancel):";

/// Synchronous user prompts. Errors are treated as a cancelled prompt.
pub trait Prompter {
    fn confirm(&mut self, message: &str) -> Result<bool, AppError>;

    /// Free-text question; `None` means the user cancelled.
    fn input(&mut self, message: &str) -> Result<Option<String>, AppError>;
}

/// What the user chose for an elapsed, unfinished task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Delete,
    Change,
    Keep,
}

impl Resolution {
    /// Cancelled and unrecognized answers keep the task.
    pub fn from_answer(answer: Option<&str>) -> Self {
        match answer.map(|value| value.trim().to_ascii_lowercase()).as_deref() {
            Some("delete") => Resolution::Delete,
            Some("change") => Resolution::Change,
            _ => Resolution::Keep,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub escalated: Vec<TaskId>,
    pub deleted: Vec<TaskId>,
    pub rescheduled: Vec<TaskId>,
}

impl TickReport {
    pub fn is_empty(&self) -> bool {
        self.escalated.is_empty()
    }
}

pub struct DeadlineMonitor {
    notifier: Box<dyn Notifier>,
}

impl DeadlineMonitor {
    pub fn new(notifier: Box<dyn Notifier>) -> Self {
        Self { notifier }
    }

    /// Tasks with an elapsed deadline that have not been handled yet, in
    /// creation order.
    pub fn due_tasks<S: Surfaces>(board: &Board<S>, now: OffsetDateTime) -> Vec<TaskId> {
        board
            .tasks()
            .filter(|task| !task.handled && task.deadline_elapsed(now))
            .map(|task| task.id)
            .collect()
    }

    /// Runs one scan and resolves every task it finds, one prompt at a time.
    pub fn tick<S: Surfaces>(
        &self,
        board: &mut Board<S>,
        prompter: &mut dyn Prompter,
        clock: &dyn Clock,
    ) -> TickReport {
        let mut report = TickReport::default();
        let due = Self::due_tasks(board, clock.now());
        if !due.is_empty() {
            tracing::debug!(count = due.len(), "deadline tick found elapsed tasks");
        }

        for id in due {
            if !board.mark_handled(id) {
                continue;
            }
            let Some(task) = board.get_task(id).cloned() else {
                continue;
            };
            report.escalated.push(id);
            tracing::info!(task_id = %id, completed = task.completed, "deadline elapsed");

            if let Err(err) = self.notifier.notify(&task) {
                tracing::warn!(task_id = %id, error = %err, "deadline notification failed");
            }

            let label = compose_display_text(&task, board.settings().offset);
            if task.completed {
                let message =
                    format!("Deadline passed and \"{label}\" is complete. Delete this task?");
                if confirm(prompter, &message) && board.delete_task(id).is_some() {
                    report.deleted.push(id);
                }
                continue;
            }

            let message = format!("Deadline passed for \"{label}\". Type:\n- delete\n- change\n- keep");
            match Resolution::from_answer(ask(prompter, &message).as_deref()) {
                Resolution::Delete => {
                    if board.delete_task(id).is_some() {
                        report.deleted.push(id);
                    }
                }
                Resolution::Change => {
                    if let Some(deadline) = ask_new_deadline(board, prompter, clock)
                        && board.set_deadline(id, deadline, clock.now())
                    {
                        report.rescheduled.push(id);
                    }
                }
                Resolution::Keep => {
                    tracing::debug!(task_id = %id, "kept task with elapsed deadline");
                }
            }
        }

        report
    }
}

fn confirm(prompter: &mut dyn Prompter, message: &str) -> bool {
    prompter.confirm(message).unwrap_or_else(|err| {
        tracing::warn!(error = %err, "confirmation prompt failed");
        false
    })
}

fn ask(prompter: &mut dyn Prompter, message: &str) -> Option<String> {
    match prompter.input(message) {
        Ok(answer) => answer.filter(|value| !value.trim().is_empty()),
        Err(err) => {
            tracing::warn!(error = %err, "input prompt failed");
            None
        }
    }
}

/// Asks until the user enters a parseable future deadline or cancels. A
/// deadline that has already passed would re-trigger on the next tick, so it
/// is refused.
fn ask_new_deadline<S: Surfaces>(
    board: &Board<S>,
    prompter: &mut dyn Prompter,
    clock: &dyn Clock,
) -> Option<OffsetDateTime> {
    let mut message = NEW_DEADLINE_PROMPT;
    loop {
        let answer = ask(prompter, message)?;
        match parse_deadline(&answer, board.settings().offset) {
            Some(deadline) if deadline > clock.now() => return Some(deadline),
            _ => {
                tracing::debug!(input = %answer, "rejected replacement deadline");
                message = RETRY_DEADLINE_PROMPT;
            }
        }
    }
}
