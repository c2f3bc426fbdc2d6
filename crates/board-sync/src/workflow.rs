//! Status Workflow
//!
//! The fixed status cycle and the done-toggle rules. Pure functions only.

use crate::domain::{Status, Task};

/// Successor in the cycle to-do → in-progress → need-review → done → to-do
pub fn next_status(status: Status) -> Status {
    match status {
        Status::ToDo => Status::InProgress,
        Status::InProgress => Status::NeedReview,
        Status::NeedReview => Status::Done,
        Status::Done => Status::ToDo,
    }
}

/// Successor of a raw status value; anything unrecognized restarts at to-do
pub fn next_status_raw(raw: &str) -> Status {
    Status::parse(raw).map(next_status).unwrap_or_default()
}

/// Status the done checkbox moves a task to.
///
/// Checking marks done; unchecking restores the status held before done,
/// or to-do when none was recorded.
pub fn done_toggle(task: &Task, checked: bool) -> Status {
    if checked {
        Status::Done
    } else if task.status == Status::Done {
        task.previous_status.unwrap_or_default()
    } else {
        task.status
    }
}

/// Move `task` to `to`, keeping the previous-status shadow in step
pub(crate) fn transition(task: &mut Task, to: Status) {
    if to == Status::Done {
        if task.status != Status::Done {
            task.previous_status = Some(task.status);
        }
    } else {
        task.previous_status = None;
    }
    task.status = to;
}
