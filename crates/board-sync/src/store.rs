//! Task Store
//!
//! In-memory ordered collection of the board's tasks. Column membership is
//! derived from status, so order only matters for display stability.
//!
//! `TaskStore` is plain data; `SharedStore` is the handle the mutator and
//! the UI share. Mutation through the handle is crate-private: presentation
//! code goes through [`crate::OptimisticMutator`].

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use log::{debug, info};

use crate::domain::{Status, Task, TaskId, TaskPatch};
use crate::error::ServiceResult;
use crate::service::TaskService;

#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    /// Latest mutation sequence issued per task
    sequences: HashMap<TaskId, u64>,
    /// Bumped on every change
    revision: u64,
    /// Changes to provisional tasks, replayed once the server id is known
    deferred: HashMap<TaskId, TaskPatch>,
    /// Provisional tasks deleted while their create was in flight
    discarded: HashSet<TaskId>,
}

/// Remote work left over when a provisional task receives its server id
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Followup {
    None,
    Delete(TaskId),
    Update { id: TaskId, patch: TaskPatch, seq: u64 },
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            ..Default::default()
        }
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| &task.id == id)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replace the whole collection with a fresh server listing.
    ///
    /// The done shadow survives for tasks the server still reports as done;
    /// the server never stores it.
    pub fn replace_all(&mut self, mut incoming: Vec<Task>) {
        for task in incoming.iter_mut().filter(|t| t.status == Status::Done) {
            task.previous_status = self.get(&task.id).and_then(|old| old.previous_status);
        }
        self.tasks = incoming;
        self.bump();
    }

    /// Patch a task in place. Absent ids are ignored: the task may have
    /// just been deleted by another action.
    pub fn apply_local(&mut self, id: &TaskId, patch: &TaskPatch) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|task| &task.id == id) else {
            debug!("apply_local: task {id} not in store, ignoring");
            return false;
        };
        task.apply(patch);
        self.bump();
        true
    }

    /// Append a task, or replace the one with the same id
    pub fn insert_local(&mut self, task: Task) {
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => *existing = task,
            None => self.tasks.push(task),
        }
        self.bump();
    }

    pub fn remove_local(&mut self, id: &TaskId) -> Option<Task> {
        let index = self.tasks.iter().position(|task| &task.id == id)?;
        self.sequences.remove(id);
        self.bump();
        Some(self.tasks.remove(index))
    }

    /// Tag a new outgoing mutation for `id`
    pub fn begin_mutation(&mut self, id: &TaskId) -> u64 {
        let seq = self.sequences.entry(id.clone()).or_insert(0);
        *seq += 1;
        *seq
    }

    /// Whether `seq` is still the newest mutation issued for `id`
    pub fn is_latest(&self, id: &TaskId, seq: u64) -> bool {
        self.sequences.get(id).map_or(true, |latest| *latest == seq)
    }

    /// Overwrite a task with the server's echo of mutation `seq`.
    ///
    /// Stale echoes (a newer mutation was issued since) and echoes for tasks
    /// no longer in the store are dropped.
    pub fn reconcile(&mut self, id: &TaskId, mut echo: Task, seq: u64) -> bool {
        if !self.is_latest(id, seq) {
            return false;
        }
        let Some(task) = self.tasks.iter_mut().find(|task| &task.id == id) else {
            return false;
        };
        echo.id = id.clone();
        echo.previous_status = match echo.status {
            Status::Done => task.previous_status,
            _ => None,
        };
        *task = echo;
        self.bump();
        true
    }

    /// Remember a change to a provisional task for replay
    pub(crate) fn defer(&mut self, provisional: &TaskId, patch: TaskPatch) {
        self.deferred.entry(provisional.clone()).or_default().merge(patch);
    }

    /// Remember that a provisional task was deleted
    pub(crate) fn discard(&mut self, provisional: &TaskId) {
        self.deferred.remove(provisional);
        self.discarded.insert(provisional.clone());
    }

    /// Drop bookkeeping for a provisional task whose create failed
    pub(crate) fn forget_provisional(&mut self, provisional: &TaskId) {
        self.deferred.remove(provisional);
        self.discarded.remove(provisional);
    }

    /// Swap a provisional task for the server-created one, keeping its slot.
    ///
    /// Deferred changes are applied to the created task and returned for
    /// sending; a discarded task stays out of the store.
    pub(crate) fn replace_provisional(&mut self, provisional: &TaskId, created: Task) -> Followup {
        if self.discarded.remove(provisional) {
            self.deferred.remove(provisional);
            return Followup::Delete(created.id);
        }

        let id = created.id.clone();
        match self.tasks.iter_mut().find(|t| &t.id == provisional) {
            Some(task) => *task = created,
            // A resync already dropped the placeholder
            None => self.tasks.push(created),
        }
        self.bump();

        match self.deferred.remove(provisional) {
            Some(patch) => {
                self.apply_local(&id, &patch);
                let seq = self.begin_mutation(&id);
                Followup::Update { id, patch, seq }
            }
            None => Followup::None,
        }
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

/// Shared handle to the board's single [`TaskStore`].
///
/// Borrows are short and never held across an `.await`.
#[derive(Debug, Clone, Default)]
pub struct SharedStore(Rc<RefCell<TaskStore>>);

impl SharedStore {
    pub fn new(store: TaskStore) -> Self {
        Self(Rc::new(RefCell::new(store)))
    }

    /// Read access
    pub fn with<R>(&self, f: impl FnOnce(&TaskStore) -> R) -> R {
        f(&*self.0.borrow())
    }

    pub(crate) fn update<R>(&self, f: impl FnOnce(&mut TaskStore) -> R) -> R {
        f(&mut *self.0.borrow_mut())
    }

    pub fn snapshot(&self) -> Vec<Task> {
        self.with(|store| store.tasks().to_vec())
    }

    pub fn get(&self, id: &TaskId) -> Option<Task> {
        self.with(|store| store.get(id).cloned())
    }

    pub fn revision(&self) -> u64 {
        self.with(TaskStore::revision)
    }

    /// Replace the local collection with the service's full listing.
    ///
    /// On failure the current collection stays as it is.
    pub async fn load<S: TaskService + ?Sized>(&self, service: &S) -> ServiceResult<usize> {
        let tasks = service.fetch_tasks().await?;
        let count = tasks.len();
        self.update(|store| store.replace_all(tasks));
        info!("loaded {count} tasks");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryTaskService, Operation};

    fn store_of(tasks: Vec<Task>) -> TaskStore {
        TaskStore::with_tasks(tasks)
    }

    #[test]
    fn test_apply_local_updates_in_place() {
        let mut store = store_of(vec![Task::new(1, "a"), Task::new(2, "b")]);
        let before = store.revision();

        assert!(store.apply_local(&TaskId::Num(2), &TaskPatch::status(Status::InProgress)));
        assert_eq!(store.get(&TaskId::Num(2)).unwrap().status, Status::InProgress);
        assert_eq!(store.tasks()[1].id, TaskId::Num(2));
        assert!(store.revision() > before);
    }

    #[test]
    fn test_apply_local_missing_is_noop() {
        let mut store = store_of(vec![Task::new(1, "a")]);
        let before = store.revision();
        assert!(!store.apply_local(&TaskId::Num(9), &TaskPatch::status(Status::Done)));
        assert_eq!(store.revision(), before);
        assert_eq!(store.tasks(), &[Task::new(1, "a")]);
    }

    #[test]
    fn test_insert_and_remove() {
        let mut store = TaskStore::new();
        store.insert_local(Task::new(1, "a"));
        store.insert_local(Task::new(1, "a renamed"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&TaskId::Num(1)).unwrap().title, "a renamed");

        assert!(store.remove_local(&TaskId::Num(1)).is_some());
        assert!(store.remove_local(&TaskId::Num(1)).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_replace_all_keeps_done_shadow() {
        let mut store = store_of(vec![Task::new(1, "a").with_status(Status::NeedReview), Task::new(2, "b")]);
        store.apply_local(&TaskId::Num(1), &TaskPatch::status(Status::Done));
        store.apply_local(&TaskId::Num(2), &TaskPatch::status(Status::Done));

        store.replace_all(vec![
            Task::new(1, "a").with_status(Status::Done),
            Task::new(2, "b").with_status(Status::InProgress),
        ]);

        assert_eq!(store.get(&TaskId::Num(1)).unwrap().previous_status, Some(Status::NeedReview));
        assert_eq!(store.get(&TaskId::Num(2)).unwrap().previous_status, None);
    }

    #[test]
    fn test_sequences() {
        let mut store = store_of(vec![Task::new(1, "a")]);
        let id = TaskId::Num(1);
        assert!(store.is_latest(&id, 0));

        let first = store.begin_mutation(&id);
        let second = store.begin_mutation(&id);
        assert!(!store.is_latest(&id, first));
        assert!(store.is_latest(&id, second));
    }

    #[test]
    fn test_reconcile_drops_stale_echo() {
        let mut store = store_of(vec![Task::new(1, "a")]);
        let id = TaskId::Num(1);
        let first = store.begin_mutation(&id);
        let second = store.begin_mutation(&id);

        let stale = Task::new(1, "a").with_status(Status::InProgress);
        assert!(!store.reconcile(&id, stale, first));

        let fresh = Task::new(1, "a (server)").with_status(Status::NeedReview);
        assert!(store.reconcile(&id, fresh, second));
        assert_eq!(store.get(&id).unwrap().title, "a (server)");
    }

    #[test]
    fn test_replace_provisional_keeps_slot() {
        let mut store = store_of(vec![Task::new(1, "a")]);
        let provisional = TaskId::Provisional(1);
        store.insert_local(Task::new(provisional.clone(), "draft"));
        store.insert_local(Task::new(2, "b"));

        assert_eq!(store.replace_provisional(&provisional, Task::new(40, "draft")), Followup::None);
        let ids: Vec<_> = store.iter().map(|t| t.id.clone()).collect();
        assert_eq!(ids, vec![TaskId::Num(1), TaskId::Num(40), TaskId::Num(2)]);
    }

    #[test]
    fn test_discarded_provisional_is_not_reinserted() {
        let mut store = TaskStore::new();
        let provisional = TaskId::Provisional(1);
        store.insert_local(Task::new(provisional.clone(), "draft"));
        store.remove_local(&provisional);
        store.discard(&provisional);

        let followup = store.replace_provisional(&provisional, Task::new(40, "draft"));
        assert_eq!(followup, Followup::Delete(TaskId::Num(40)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_deferred_changes_replay_on_created_task() {
        let mut store = TaskStore::new();
        let provisional = TaskId::Provisional(1);
        store.insert_local(Task::new(provisional.clone(), "draft"));
        store.defer(&provisional, TaskPatch::status(Status::InProgress));
        store.defer(&provisional, TaskPatch { title: Some("final".to_string()), ..Default::default() });

        let followup = store.replace_provisional(&provisional, Task::new(40, "draft"));
        let Followup::Update { id, patch, seq } = followup else {
            panic!("expected an update");
        };
        assert_eq!(id, TaskId::Num(40));
        assert_eq!(patch.status, Some(Status::InProgress));
        assert_eq!(patch.title.as_deref(), Some("final"));
        assert!(store.is_latest(&id, seq));

        let task = store.get(&id).unwrap();
        assert_eq!(task.status, Status::InProgress);
        assert_eq!(task.title, "final");
    }

    #[tokio::test]
    async fn test_load_replaces_collection() {
        let service = MemoryTaskService::with_tasks(vec![Task::new(5, "remote")]);
        let shared = SharedStore::new(store_of(vec![Task::new(1, "local")]));

        assert_eq!(shared.load(&service).await, Ok(1));
        assert_eq!(shared.snapshot(), vec![Task::new(5, "remote")]);
    }

    #[tokio::test]
    async fn test_failed_load_leaves_store_unchanged() {
        let service = MemoryTaskService::with_tasks(vec![Task::new(5, "remote")]);
        service.fail(Operation::FetchTasks);
        let shared = SharedStore::new(store_of(vec![Task::new(1, "local")]));
        let revision = shared.revision();

        assert!(shared.load(&service).await.is_err());
        assert_eq!(shared.snapshot(), vec![Task::new(1, "local")]);
        assert_eq!(shared.revision(), revision);
    }
}
