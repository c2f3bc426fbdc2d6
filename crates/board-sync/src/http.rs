//! REST implementation of [`TaskService`] over reqwest.
//!
//! Runs in the browser (reqwest's fetch backend) as well as natively.

use async_trait::async_trait;
use log::debug;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::config::BoardConfig;
use crate::domain::{NewTask, NewUser, Task, TaskId, TaskPatch, User};
use crate::error::{ServiceError, ServiceResult};
use crate::service::TaskService;

#[derive(Debug, Clone)]
pub struct HttpTaskService {
    client: Client,
    base_url: String,
}

impl HttpTaskService {
    pub fn new(config: &BoardConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.api_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn execute(&self, request: RequestBuilder, endpoint: &str) -> ServiceResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| ServiceError::transport(endpoint, e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    async fn json<T: DeserializeOwned>(&self, request: RequestBuilder, endpoint: &str) -> ServiceResult<T> {
        let response = self.execute(request, endpoint).await?;
        response.json::<T>().await.map_err(|e| ServiceError::decode(endpoint, e))
    }
}

/// Path segment for a task id; string ids are percent-encoded
fn path_segment(id: &TaskId) -> String {
    match id {
        TaskId::Num(n) => n.to_string(),
        TaskId::Text(s) => utf8_percent_encode(s, NON_ALPHANUMERIC).to_string(),
        // Never sent: the mutator keeps provisional tasks local
        TaskId::Provisional(n) => format!("pending-{n}"),
    }
}

fn task_path(action: &str, id: &TaskId) -> String {
    format!("/task/{action}/{}", path_segment(id))
}

#[async_trait(?Send)]
impl TaskService for HttpTaskService {
    async fn fetch_tasks(&self) -> ServiceResult<Vec<Task>> {
        let endpoint = "GET /task/getAll";
        let tasks: Option<Vec<Task>> = self.json(self.client.get(self.url("/task/getAll")), endpoint).await?;
        Ok(tasks.unwrap_or_default())
    }

    async fn fetch_task(&self, id: &TaskId) -> ServiceResult<Task> {
        let path = task_path("get", id);
        let endpoint = format!("GET {path}");
        self.json(self.client.get(self.url(&path)), &endpoint).await
    }

    async fn create_task(&self, draft: &NewTask) -> ServiceResult<Task> {
        let endpoint = "POST /task/add";
        self.json(self.client.post(self.url("/task/add")).json(draft), endpoint).await
    }

    async fn update_task(&self, id: &TaskId, patch: &TaskPatch) -> ServiceResult<Option<Task>> {
        let path = task_path("update", id);
        let endpoint = format!("PUT {path}");
        let response = self
            .execute(self.client.put(self.url(&path)).json(patch), &endpoint)
            .await?;
        let body = response
            .text()
            .await
            .map_err(|e| ServiceError::transport(&endpoint, e))?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        match serde_json::from_str::<Task>(&body) {
            Ok(task) => Ok(Some(task)),
            Err(e) => {
                debug!("{endpoint}: response is not a task ({e}), keeping local state");
                Ok(None)
            }
        }
    }

    async fn delete_task(&self, id: &TaskId) -> ServiceResult<()> {
        let path = task_path("delete", id);
        let endpoint = format!("DELETE {path}");
        self.execute(self.client.delete(self.url(&path)), &endpoint).await?;
        Ok(())
    }

    async fn fetch_users(&self) -> ServiceResult<Vec<User>> {
        let endpoint = "GET /user/getAll";
        let users: Option<Vec<User>> = self.json(self.client.get(self.url("/user/getAll")), endpoint).await?;
        Ok(users.unwrap_or_default())
    }

    async fn create_user(&self, member: &NewUser) -> ServiceResult<User> {
        let endpoint = "POST /user/add";
        self.json(self.client.post(self.url("/user/add")).json(member), endpoint).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_paths() {
        assert_eq!(task_path("update", &TaskId::Num(7)), "/task/update/7");
        assert_eq!(task_path("delete", &TaskId::Text("a b/c".to_string())), "/task/delete/a%20b%2Fc");
        assert_eq!(task_path("get", &TaskId::Text("65f0c2".to_string())), "/task/get/65f0c2");
    }

    #[test]
    fn test_base_url_is_normalized() {
        let config = BoardConfig {
            api_url: "http://localhost:5000/".to_string(),
            ..BoardConfig::default()
        };
        let service = HttpTaskService::new(&config);
        assert_eq!(service.base_url(), "http://localhost:5000");
        assert_eq!(service.url("/task/getAll"), "http://localhost:5000/task/getAll");
    }

    #[tokio::test]
    async fn test_unreachable_service_is_transport_error() {
        let config = BoardConfig::default().with_api_url("http://127.0.0.1:9");
        let service = HttpTaskService::new(&config);
        let err = service.fetch_tasks().await.unwrap_err();
        assert!(matches!(err, ServiceError::Transport { .. }), "{err:?}");
        assert_eq!(err.endpoint(), "GET /task/getAll");
    }
}
