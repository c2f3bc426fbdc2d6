//! Board Sync
//!
//! Keeps an in-memory task board consistent with a remote task service.
//! Changes are applied locally first, then sent; a rejected change makes
//! the board reload from the service.
//!
//! Layout:
//! - domain: tasks, users, patches
//! - workflow: status cycle and done toggle
//! - store: the task store and its shared handle
//! - mutator / drag: optimistic state transitions
//! - projector: per-column visible slices
//! - service / http / memory: the remote task service and its implementations

mod config;
mod domain;
mod drag;
mod error;
mod http;
#[cfg(any(test, feature = "testing"))]
mod memory;
mod mutator;
mod projector;
mod service;
mod store;
mod users;
pub mod workflow;

pub use config::{BoardConfig, DEFAULT_API_URL, DEFAULT_PAGE_SIZE, DEFAULT_PAGE_STEP};
pub use domain::{parse_due_date, AssignedUser, NewTask, NewUser, Priority, Status, Task, TaskId, TaskPatch, User, UserId};
pub use drag::resolve_drop_target;
pub use error::{DraftError, ServiceError, ServiceResult};
pub use http::HttpTaskService;
#[cfg(any(test, feature = "testing"))]
pub use memory::{MemoryTaskService, Operation, Request};
pub use mutator::{OptimisticMutator, Outcome, PendingMutation};
pub use projector::{project, BoardView, ColumnView, VisibleCounts};
pub use service::TaskService;
pub use store::{SharedStore, TaskStore};
pub use users::{display_case, initial, UserDirectory, UNASSIGNED};
pub use workflow::{next_status, next_status_raw};
