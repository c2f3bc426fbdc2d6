//! Board Context
//!
//! Shared handles provided via Leptos Context API: the optimistic mutator and
//! the UI store.

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{error, info};

use board_sync::{HttpTaskService, OptimisticMutator, PendingMutation, Task, UserDirectory};

use crate::format::outcome_message;
use crate::store::{raise_banner, BoardStore, BoardUiStateStoreFields};

type Mutator = OptimisticMutator<HttpTaskService>;

#[derive(Clone, Copy)]
pub struct BoardContext {
    mutator: StoredValue<Mutator, LocalStorage>,
    pub state: BoardStore,
}

impl BoardContext {
    pub fn new(mutator: Mutator, state: BoardStore) -> Self {
        Self {
            mutator: StoredValue::new_local(mutator),
            state,
        }
    }

    pub fn mutator(&self) -> Mutator {
        self.mutator.get_value()
    }

    /// Publish the task store revision so projections re-run
    pub fn refresh(&self) {
        let revision = self.mutator.with_value(|m| m.store().revision());
        self.state.revision().set(revision);
    }

    /// Read the tasks, tracking the revision
    pub fn with_tasks<R>(&self, f: impl FnOnce(&[Task]) -> R) -> R {
        self.state.revision().track();
        self.mutator.with_value(|m| m.store().with(|store| f(store.tasks())))
    }

    /// Show the local change now, settle the remote call in the background
    pub fn run(&self, pending: PendingMutation<HttpTaskService>) {
        self.refresh();
        if !pending.is_remote() {
            return;
        }
        let ctx = *self;
        spawn_local(async move {
            let outcome = pending.settle().await;
            ctx.refresh();
            if let Some(message) = outcome_message(&outcome) {
                raise_banner(&ctx.state, message);
            }
        });
    }

    pub fn fail(&self, message: impl Into<String>) {
        raise_banner(&self.state, message.into());
    }

    /// Full refresh of the tasks
    pub async fn reload(&self) {
        match self.mutator().load().await {
            Ok(count) => info!("board loaded with {count} tasks"),
            Err(e) => {
                error!("loading tasks failed: {e}");
                self.fail(format!("Could not load tasks ({e})."));
            }
        }
        self.refresh();
    }

    pub async fn reload_users(&self) {
        let mutator = self.mutator();
        match UserDirectory::fetch(mutator.service()).await {
            Ok(directory) => self.state.users().set(directory),
            Err(e) => {
                error!("loading users failed: {e}");
                self.fail(format!("Could not load team members ({e})."));
            }
        }
    }
}

pub fn use_board() -> BoardContext {
    expect_context::<BoardContext>()
}
