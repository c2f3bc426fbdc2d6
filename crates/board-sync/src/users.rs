//! User directory: read-only list of team members for assignee display and
//! the assignment picker. Users are owned by the service; the board only
//! fetches them.

use log::info;

use crate::domain::{NewUser, Task, User, UserId};
use crate::error::ServiceResult;
use crate::service::TaskService;

pub const UNASSIGNED: &str = "Unassigned";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDirectory {
    users: Vec<User>,
}

impl UserDirectory {
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }

    /// `GET /user/getAll`
    pub async fn fetch<S: TaskService + ?Sized>(service: &S) -> ServiceResult<Self> {
        let users = service.fetch_users().await?;
        info!("loaded {} users", users.len());
        Ok(Self::new(users))
    }

    /// Register a new member, then add it to this directory
    pub async fn add_member<S: TaskService + ?Sized>(&mut self, service: &S, member: &NewUser) -> ServiceResult<User> {
        let user = service.create_user(member).await?;
        self.users.push(user.clone());
        Ok(user)
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn get(&self, id: &UserId) -> Option<&User> {
        self.users.iter().find(|u| &u.id == id)
    }

    /// Case-insensitive substring match on names; empty query matches all
    pub fn search(&self, query: &str) -> Vec<&User> {
        let needle = query.trim().to_lowercase();
        self.users
            .iter()
            .filter(|u| u.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Card label for a task's assignee
    pub fn assignee_label(&self, task: &Task) -> String {
        let embedded = task.assigned_user.as_ref().and_then(|u| u.name.as_deref());
        let name = embedded.or_else(|| {
            task.assignee_id()
                .and_then(|id| self.get(id))
                .map(|u| u.name.as_str())
        });
        match name {
            Some(name) if !name.trim().is_empty() => display_case(name),
            _ => UNASSIGNED.to_string(),
        }
    }
}

/// First letter upper case, rest lower case
pub fn display_case(name: &str) -> String {
    let mut chars = name.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect(),
        None => String::new(),
    }
}

/// Single-letter avatar text
pub fn initial(name: &str) -> String {
    name.trim().chars().next().map(|c| c.to_uppercase().collect()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AssignedUser, TaskId};
    use crate::memory::{MemoryTaskService, Request};

    fn user(id: u64, name: &str) -> User {
        User {
            id: UserId::Num(id),
            name: name.to_string(),
            phone: None,
            designation: None,
        }
    }

    #[test]
    fn test_assignee_label() {
        let directory = UserDirectory::new(vec![user(1, "GRACE hopper")]);

        let mut task = Task::new(TaskId::Num(1), "t");
        assert_eq!(directory.assignee_label(&task), UNASSIGNED);

        task.user_id = Some(UserId::Num(1));
        assert_eq!(directory.assignee_label(&task), "Grace hopper");

        task.user_id = None;
        task.assigned_user = Some(AssignedUser { id: UserId::Num(8), name: Some("linus".to_string()) });
        assert_eq!(directory.assignee_label(&task), "Linus");

        task.assigned_user = Some(AssignedUser { id: UserId::Num(8), name: None });
        assert_eq!(directory.assignee_label(&task), UNASSIGNED);
    }

    #[test]
    fn test_search() {
        let directory = UserDirectory::new(vec![user(1, "Ada"), user(2, "Adrian"), user(3, "Bob")]);
        let names: Vec<_> = directory.search("AD").iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["Ada", "Adrian"]);
        assert_eq!(directory.search("").len(), 3);
        assert!(directory.search("zed").is_empty());
    }

    #[test]
    fn test_initial() {
        assert_eq!(initial(" ada"), "A");
        assert_eq!(initial(""), "");
    }

    #[tokio::test]
    async fn test_fetch_and_add_member() {
        let service = MemoryTaskService::new().with_users(vec![user(1, "Ada")]);
        let mut directory = UserDirectory::fetch(&service).await.unwrap();
        assert_eq!(directory.users().len(), 1);

        let member = NewUser::new("Bob", "555-0100", "").unwrap();
        let added = directory.add_member(&service, &member).await.unwrap();
        assert_eq!(directory.get(&added.id).map(|u| u.name.as_str()), Some("Bob"));
        assert_eq!(
            service.requests().last(),
            Some(&Request::CreateUser(serde_json::json!({ "name": "Bob", "phone": "555-0100" })))
        );
    }
}
