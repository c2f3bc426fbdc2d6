//! Task Service Port
//!
//! The remote source of truth for tasks and users, as seen by the board.
//! `HttpTaskService` talks to the REST API; `MemoryTaskService` stands in
//! for it in tests.

use async_trait::async_trait;

use crate::domain::{NewTask, NewUser, Task, TaskId, TaskPatch, User};
use crate::error::ServiceResult;

/// Remote task/user persistence.
///
/// Futures are not `Send`: in the browser they wrap `fetch` promises and
/// run on the single UI thread.
#[async_trait(?Send)]
pub trait TaskService {
    /// `GET /task/getAll`
    async fn fetch_tasks(&self) -> ServiceResult<Vec<Task>>;

    /// `GET /task/get/{id}`
    async fn fetch_task(&self, id: &TaskId) -> ServiceResult<Task>;

    /// `POST /task/add`, returns the task with its server identifier
    async fn create_task(&self, draft: &NewTask) -> ServiceResult<Task>;

    /// `PUT /task/update/{id}`.
    ///
    /// Returns the server's representation when the response carries one.
    async fn update_task(&self, id: &TaskId, patch: &TaskPatch) -> ServiceResult<Option<Task>>;

    /// `DELETE /task/delete/{id}`
    async fn delete_task(&self, id: &TaskId) -> ServiceResult<()>;

    /// `GET /user/getAll`
    async fn fetch_users(&self) -> ServiceResult<Vec<User>>;

    /// `POST /user/add`
    async fn create_user(&self, member: &NewUser) -> ServiceResult<User>;
}
