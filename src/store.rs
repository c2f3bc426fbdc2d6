//! Board UI State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity. Tasks themselves
//! live in the synchronizer's store; `revision` mirrors its change counter so
//! views re-project when it moves.

use leptos::prelude::*;
use reactive_stores::Store;

use board_sync::{BoardConfig, TaskId, UserDirectory, VisibleCounts};

/// A failure message shown at the top of the board
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Banner {
    pub id: u64,
    pub message: String,
}

#[derive(Clone, Debug, Default, Store)]
pub struct BoardUiState {
    /// Last seen task store revision
    pub revision: u64,
    /// Per-column "load more" counts
    pub visible_counts: VisibleCounts,
    pub users: UserDirectory,
    /// Task form visibility; `editing` picks edit over create
    pub form_open: bool,
    pub editing: Option<TaskId>,
    pub member_open: bool,
    pub banner: Option<Banner>,
    /// Number of banners raised so far
    pub banner_serial: u64,
}

impl BoardUiState {
    pub fn new(config: &BoardConfig) -> Self {
        Self {
            visible_counts: VisibleCounts::from_config(config),
            ..Default::default()
        }
    }
}

pub type BoardStore = Store<BoardUiState>;

// ========================
// Store Helper Functions
// ========================

/// Open the task form, for a new task or for editing `id`
pub fn open_task_form(store: &BoardStore, editing: Option<TaskId>) {
    store.editing().set(editing);
    store.form_open().set(true);
}

pub fn close_task_form(store: &BoardStore) {
    store.form_open().set(false);
    store.editing().set(None);
}

/// Raise a banner; returns its id
pub fn raise_banner(store: &BoardStore, message: String) -> u64 {
    let id = store.banner_serial().get_untracked() + 1;
    store.banner_serial().set(id);
    store.banner().set(Some(Banner { id, message }));
    id
}

/// Clear the banner if it is still `id`
pub fn dismiss_banner(store: &BoardStore, id: u64) {
    let current = store.banner().with_untracked(|b| b.as_ref().map(|b| b.id));
    if current == Some(id) {
        store.banner().set(None);
    }
}
