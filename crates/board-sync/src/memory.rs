//! In-memory task service.
//!
//! Behaves like the REST API (server-assigned ids, echoes without the local
//! done shadow) and records every request with its wire payload. Individual
//! operations can be made to fail.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;

use async_trait::async_trait;

use crate::domain::{NewTask, NewUser, Task, TaskId, TaskPatch, User, UserId};
use crate::error::{ServiceError, ServiceResult};
use crate::service::TaskService;

/// Service operations, for failure injection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    FetchTasks,
    FetchTask,
    CreateTask,
    UpdateTask,
    DeleteTask,
    FetchUsers,
    CreateUser,
}

impl Operation {
    fn endpoint(&self) -> &'static str {
        match self {
            Operation::FetchTasks => "GET /task/getAll",
            Operation::FetchTask => "GET /task/get",
            Operation::CreateTask => "POST /task/add",
            Operation::UpdateTask => "PUT /task/update",
            Operation::DeleteTask => "DELETE /task/delete",
            Operation::FetchUsers => "GET /user/getAll",
            Operation::CreateUser => "POST /user/add",
        }
    }
}

/// A request as it would have gone over the wire
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    FetchTasks,
    FetchTask(TaskId),
    CreateTask(serde_json::Value),
    UpdateTask(TaskId, serde_json::Value),
    DeleteTask(TaskId),
    FetchUsers,
    CreateUser(serde_json::Value),
}

#[derive(Debug, Default)]
pub struct MemoryTaskService {
    tasks: RefCell<Vec<Task>>,
    users: RefCell<Vec<User>>,
    next_id: Cell<u64>,
    failing: RefCell<HashSet<Operation>>,
    requests: RefCell<Vec<Request>>,
}

impl MemoryTaskService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let next_id = tasks
            .iter()
            .filter_map(|t| match t.id {
                TaskId::Num(n) => Some(n),
                _ => None,
            })
            .max()
            .unwrap_or(0);
        let service = Self::default();
        service.next_id.set(next_id);
        *service.tasks.borrow_mut() = tasks.into_iter().map(wire).collect();
        service
    }

    pub fn with_users(self, users: Vec<User>) -> Self {
        let highest = users
            .iter()
            .filter_map(|u| match u.id {
                UserId::Num(n) => Some(n),
                _ => None,
            })
            .max()
            .unwrap_or(0);
        self.next_id.set(self.next_id.get().max(highest));
        *self.users.borrow_mut() = users;
        self
    }

    /// Make `operation` fail with HTTP 503 until [`Self::recover`]
    pub fn fail(&self, operation: Operation) {
        self.failing.borrow_mut().insert(operation);
    }

    pub fn recover(&self, operation: Operation) {
        self.failing.borrow_mut().remove(&operation);
    }

    /// Server-side view of the tasks
    pub fn tasks(&self) -> Vec<Task> {
        self.tasks.borrow().clone()
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.borrow().clone()
    }

    pub fn clear_requests(&self) {
        self.requests.borrow_mut().clear();
    }

    fn record(&self, request: Request) {
        self.requests.borrow_mut().push(request);
    }

    fn check(&self, operation: Operation) -> ServiceResult<()> {
        if self.failing.borrow().contains(&operation) {
            return Err(ServiceError::Status {
                endpoint: operation.endpoint().to_string(),
                status: 503,
            });
        }
        Ok(())
    }

    fn allocate_id(&self) -> u64 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }

    fn not_found(operation: Operation) -> ServiceError {
        ServiceError::Status {
            endpoint: operation.endpoint().to_string(),
            status: 404,
        }
    }
}

/// What a client decoding the JSON would see
fn wire(mut task: Task) -> Task {
    task.previous_status = None;
    task
}

fn payload<T: serde::Serialize>(value: &T) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or(serde_json::Value::Null)
}

#[async_trait(?Send)]
impl TaskService for MemoryTaskService {
    async fn fetch_tasks(&self) -> ServiceResult<Vec<Task>> {
        self.record(Request::FetchTasks);
        self.check(Operation::FetchTasks)?;
        Ok(self.tasks())
    }

    async fn fetch_task(&self, id: &TaskId) -> ServiceResult<Task> {
        self.record(Request::FetchTask(id.clone()));
        self.check(Operation::FetchTask)?;
        self.tasks
            .borrow()
            .iter()
            .find(|t| &t.id == id)
            .cloned()
            .ok_or_else(|| Self::not_found(Operation::FetchTask))
    }

    async fn create_task(&self, draft: &NewTask) -> ServiceResult<Task> {
        self.record(Request::CreateTask(payload(draft)));
        self.check(Operation::CreateTask)?;
        let task = wire(draft.to_task(TaskId::Num(self.allocate_id())));
        self.tasks.borrow_mut().push(task.clone());
        Ok(task)
    }

    async fn update_task(&self, id: &TaskId, patch: &TaskPatch) -> ServiceResult<Option<Task>> {
        self.record(Request::UpdateTask(id.clone(), payload(patch)));
        self.check(Operation::UpdateTask)?;
        let mut tasks = self.tasks.borrow_mut();
        let task = tasks
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or_else(|| Self::not_found(Operation::UpdateTask))?;
        task.apply(patch);
        task.previous_status = None;
        Ok(Some(task.clone()))
    }

    async fn delete_task(&self, id: &TaskId) -> ServiceResult<()> {
        self.record(Request::DeleteTask(id.clone()));
        self.check(Operation::DeleteTask)?;
        self.tasks.borrow_mut().retain(|t| &t.id != id);
        Ok(())
    }

    async fn fetch_users(&self) -> ServiceResult<Vec<User>> {
        self.record(Request::FetchUsers);
        self.check(Operation::FetchUsers)?;
        Ok(self.users.borrow().clone())
    }

    async fn create_user(&self, member: &NewUser) -> ServiceResult<User> {
        self.record(Request::CreateUser(payload(member)));
        self.check(Operation::CreateUser)?;
        let user = User {
            id: UserId::Num(self.allocate_id()),
            name: member.name.clone(),
            phone: member.phone.clone(),
            designation: member.designation.clone(),
        };
        self.users.borrow_mut().push(user.clone());
        Ok(user)
    }
}
