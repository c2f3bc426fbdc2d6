//! Drag Reorder Handler
//!
//! A drop onto a column is a status change; the position inside the column
//! is ignored.

use log::debug;

use crate::domain::{Status, TaskId, TaskPatch};
use crate::mutator::{OptimisticMutator, PendingMutation};
use crate::service::TaskService;

/// Column key of a drop target; unknown keys are not valid targets
pub fn resolve_drop_target(key: Option<&str>) -> Option<Status> {
    key.and_then(Status::parse)
}

impl<S: TaskService + 'static> OptimisticMutator<S> {
    /// Handle a finished drag. `None` (released outside any column) leaves
    /// the store untouched and sends nothing.
    pub fn on_drop(&self, id: &TaskId, destination: Option<Status>) -> Option<PendingMutation<S>> {
        let Some(destination) = destination else {
            debug!("drop of {id} outside any column");
            return None;
        };
        Some(self.mutate(id, TaskPatch::status(destination)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Task;
    use crate::memory::{MemoryTaskService, Request};
    use crate::mutator::Outcome;
    use crate::store::{SharedStore, TaskStore};
    use serde_json::json;
    use std::rc::Rc;

    fn board() -> OptimisticMutator<MemoryTaskService> {
        let tasks = vec![
            Task::new(1, "one"),
            Task::new(2, "two").with_status(Status::InProgress),
            Task::new(3, "three"),
            Task::new(4, "four").with_status(Status::Done),
        ];
        let service = MemoryTaskService::with_tasks(tasks.clone());
        OptimisticMutator::with_store(Rc::new(service), SharedStore::new(TaskStore::with_tasks(tasks)))
    }

    #[test]
    fn test_drop_outside_is_noop() {
        let board = board();
        let before = board.store().snapshot();
        let revision = board.store().revision();

        assert!(board.on_drop(&TaskId::Num(3), None).is_none());
        assert_eq!(board.store().snapshot(), before);
        assert_eq!(board.store().revision(), revision);
        assert!(board.service().requests().is_empty());
    }

    #[tokio::test]
    async fn test_drop_changes_only_status_of_dropped_task() {
        let board = board();
        let before = board.store().snapshot();

        let pending = board.on_drop(&TaskId::Num(3), Some(Status::NeedReview)).unwrap();
        let after = board.store().snapshot();
        for (old, new) in before.iter().zip(&after) {
            if old.id == TaskId::Num(3) {
                assert_eq!(new.status, Status::NeedReview);
                assert_eq!(Task { status: old.status, ..new.clone() }, *old);
            } else {
                assert_eq!(old, new);
            }
        }

        assert_eq!(pending.settle().await, Outcome::Confirmed);
        assert_eq!(
            board.service().requests(),
            vec![Request::UpdateTask(TaskId::Num(3), json!({ "status": "need-review" }))]
        );
    }

    #[test]
    fn test_drop_keeps_relative_order() {
        let board = board();
        let _pending = board.on_drop(&TaskId::Num(1), Some(Status::InProgress));
        let ids: Vec<_> = board.store().snapshot().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![TaskId::Num(1), TaskId::Num(2), TaskId::Num(3), TaskId::Num(4)]);
    }

    #[test]
    fn test_resolve_drop_target() {
        assert_eq!(resolve_drop_target(Some("need-review")), Some(Status::NeedReview));
        assert_eq!(resolve_drop_target(Some("trash")), None);
        assert_eq!(resolve_drop_target(None), None);
    }
}
