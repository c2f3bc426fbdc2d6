//! Optimistic Mutator
//!
//! Every user-triggered change goes through here. The change is applied to
//! the [`SharedStore`] before the call returns; the returned
//! [`PendingMutation`] carries the matching remote request and reconciles
//! once it is driven to completion:
//!
//! - success with an echo: the echo replaces the local task, unless a newer
//!   mutation of the same task was issued meanwhile
//! - failure: one full reload from the service, server wins
//!
//! Changes to a task whose create is still in flight are held back and sent
//! once the server id is known.

use std::cell::Cell;
use std::rc::Rc;

use log::{debug, error, warn};

use crate::domain::{NewTask, Task, TaskId, TaskPatch};
use crate::error::{DraftError, ServiceError, ServiceResult};
use crate::service::TaskService;
use crate::store::{Followup, SharedStore, TaskStore};
use crate::workflow::{done_toggle, next_status};

/// How a mutation ended once its remote call settled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The service accepted the change
    Confirmed,
    /// Accepted, but a newer mutation of the task is in flight; echo ignored
    Superseded,
    /// Applied locally; sent when the task's create settles
    LocalOnly,
    /// The task was not in the store; nothing happened
    Missing,
    /// The service rejected the change; the board was reloaded
    Resynchronized { cause: ServiceError },
    /// The service rejected the change and the reload failed too;
    /// the optimistic state stays on screen
    Unreconciled { cause: ServiceError, refresh: ServiceError },
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Resynchronized { .. } | Outcome::Unreconciled { .. })
    }

    pub fn cause(&self) -> Option<&ServiceError> {
        match self {
            Outcome::Resynchronized { cause } | Outcome::Unreconciled { cause, .. } => Some(cause),
            _ => None,
        }
    }
}

/// Owner of board state transitions.
///
/// Cheap to clone; clones share the store and the service.
pub struct OptimisticMutator<S> {
    store: SharedStore,
    service: Rc<S>,
    provisional: Rc<Cell<u64>>,
}

impl<S> Clone for OptimisticMutator<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            service: Rc::clone(&self.service),
            provisional: Rc::clone(&self.provisional),
        }
    }
}

impl<S: TaskService + 'static> OptimisticMutator<S> {
    pub fn new(service: S) -> Self {
        Self::with_store(Rc::new(service), SharedStore::new(TaskStore::new()))
    }

    pub fn with_store(service: Rc<S>, store: SharedStore) -> Self {
        Self {
            store,
            service,
            provisional: Rc::new(Cell::new(0)),
        }
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Full refresh from the service; the store is untouched on failure
    pub async fn load(&self) -> ServiceResult<usize> {
        self.store.load(&*self.service).await
    }

    /// Freshest server copy of one task, for editing. Does not touch the store.
    pub async fn fetch_fresh(&self, id: &TaskId) -> ServiceResult<Task> {
        self.service.fetch_task(id).await
    }

    /// Apply `patch` to task `id` now; the PUT runs when the result is settled
    pub fn mutate(&self, id: &TaskId, patch: TaskPatch) -> PendingMutation<S> {
        if self.store.with(|store| store.get(id).is_none()) {
            debug!("mutate: task {id} not in store");
            return self.pending(Call::Done(Outcome::Missing));
        }

        if id.is_provisional() {
            self.store.update(|store| {
                store.apply_local(id, &patch);
                store.defer(id, patch);
            });
            debug!("mutate: task {id} has no server id yet, change deferred");
            return self.pending(Call::Done(Outcome::LocalOnly));
        }

        let seq = self.store.update(|store| {
            store.apply_local(id, &patch);
            store.begin_mutation(id)
        });
        debug!("mutate: task {id} seq {seq} applied locally");
        self.pending(Call::Update {
            id: id.clone(),
            patch,
            seq,
        })
    }

    /// Advance the task one step along the status cycle
    pub fn cycle_status(&self, id: &TaskId) -> PendingMutation<S> {
        match self.store.get(id) {
            Some(task) => self.mutate(id, TaskPatch::status(next_status(task.status))),
            None => self.pending(Call::Done(Outcome::Missing)),
        }
    }

    /// Check or uncheck "done". Unchecking restores the status held before done.
    pub fn set_done(&self, id: &TaskId, done: bool) -> PendingMutation<S> {
        match self.store.get(id) {
            Some(task) => self.mutate(id, TaskPatch::status(done_toggle(&task, done))),
            None => self.pending(Call::Done(Outcome::Missing)),
        }
    }

    /// Show the new task immediately under a provisional id; POST on settle
    pub fn create(&self, draft: NewTask) -> Result<PendingMutation<S>, DraftError> {
        let draft = draft.validate()?;
        let n = self.provisional.get() + 1;
        self.provisional.set(n);
        let provisional = TaskId::Provisional(n);

        self.store.update(|store| store.insert_local(draft.to_task(provisional.clone())));
        debug!("create: inserted {provisional}");
        Ok(self.pending(Call::Create { provisional, draft }))
    }

    /// Remove the task now; DELETE on settle
    pub fn delete(&self, id: &TaskId) -> PendingMutation<S> {
        let removed = self.store.update(|store| {
            let removed = store.remove_local(id).is_some();
            if removed && id.is_provisional() {
                store.discard(id);
            }
            removed
        });
        if !removed {
            return self.pending(Call::Done(Outcome::Missing));
        }
        if id.is_provisional() {
            debug!("delete: task {id} has no server id yet, delete deferred");
            return self.pending(Call::Done(Outcome::LocalOnly));
        }
        self.pending(Call::Delete { id: id.clone() })
    }

    fn pending(&self, call: Call) -> PendingMutation<S> {
        PendingMutation {
            mutator: self.clone(),
            call,
        }
    }

    /// Server wins: one reload, no retries
    async fn resynchronize(&self, cause: ServiceError) -> Outcome {
        warn!("remote mutation failed ({cause}); reloading board");
        match self.load().await {
            Ok(_) => Outcome::Resynchronized { cause },
            Err(refresh) => {
                error!("reload after failed mutation also failed: {refresh}");
                Outcome::Unreconciled { cause, refresh }
            }
        }
    }
}

enum Call {
    Done(Outcome),
    Update {
        id: TaskId,
        patch: TaskPatch,
        seq: u64,
    },
    Create {
        provisional: TaskId,
        draft: NewTask,
    },
    Delete {
        id: TaskId,
    },
}

/// A mutation already visible locally whose remote half has not run yet
#[must_use = "the remote request is only sent when the mutation is settled"]
pub struct PendingMutation<S> {
    mutator: OptimisticMutator<S>,
    call: Call,
}

impl<S: TaskService + 'static> PendingMutation<S> {
    /// Whether a remote request will be sent
    pub fn is_remote(&self) -> bool {
        !matches!(self.call, Call::Done(_))
    }

    /// Send the remote request and reconcile with its result.
    ///
    /// A create also sends whatever was deferred for the new task.
    pub async fn settle(self) -> Outcome {
        let mutator = self.mutator;
        let mut call = self.call;
        loop {
            call = match call {
                Call::Done(outcome) => return outcome,
                Call::Update { id, patch, seq } => {
                    return match mutator.service.update_task(&id, &patch).await {
                        Ok(echo) => {
                            if !mutator.store.with(|store| store.is_latest(&id, seq)) {
                                debug!("task {id} seq {seq} superseded, ignoring echo");
                                return Outcome::Superseded;
                            }
                            if let Some(echo) = echo {
                                mutator.store.update(|store| store.reconcile(&id, echo, seq));
                            }
                            Outcome::Confirmed
                        }
                        Err(cause) => mutator.resynchronize(cause).await,
                    };
                }
                Call::Create { provisional, draft } => match mutator.service.create_task(&draft).await {
                    Ok(created) => {
                        debug!("create: {provisional} is now {}", created.id);
                        match mutator.store.update(|store| store.replace_provisional(&provisional, created)) {
                            Followup::None => return Outcome::Confirmed,
                            Followup::Delete(id) => {
                                debug!("create: {provisional} was deleted meanwhile, deleting {id}");
                                Call::Delete { id }
                            }
                            Followup::Update { id, patch, seq } => {
                                debug!("create: sending changes made to {provisional} as {id} seq {seq}");
                                Call::Update { id, patch, seq }
                            }
                        }
                    }
                    Err(cause) => {
                        mutator.store.update(|store| store.forget_provisional(&provisional));
                        return mutator.resynchronize(cause).await;
                    }
                },
                Call::Delete { id } => {
                    return match mutator.service.delete_task(&id).await {
                        Ok(()) => Outcome::Confirmed,
                        Err(cause) => mutator.resynchronize(cause).await,
                    };
                }
            };
        }
    }
}
