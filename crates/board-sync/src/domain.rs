//! Board Domain Model
//!
//! Tasks, users and the partial updates exchanged with the task service.
//! Wire format is camelCase JSON as served by the task API.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::DraftError;
use crate::workflow;

// ========================
// Identifiers
// ========================

/// Task identifier assigned by the task service
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskId {
    Num(u64),
    Text(String),
    /// Placeholder for a locally created task whose create request is still in flight
    #[serde(skip)]
    Provisional(u64),
}

impl TaskId {
    pub fn is_provisional(&self) -> bool {
        matches!(self, TaskId::Provisional(_))
    }
}

impl From<u64> for TaskId {
    fn from(id: u64) -> Self {
        TaskId::Num(id)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        TaskId::Text(id.to_string())
    }
}

impl FromStr for TaskId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<u64>() {
            Ok(n) => TaskId::Num(n),
            Err(_) => TaskId::Text(s.to_string()),
        })
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskId::Num(n) => write!(f, "{n}"),
            TaskId::Text(s) => f.write_str(s),
            TaskId::Provisional(n) => write!(f, "pending-{n}"),
        }
    }
}

/// User identifier assigned by the task service
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Num(u64),
    Text(String),
}

impl UserId {
    /// Parse a form value; blank input means "no user"
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        Some(match raw.parse::<u64>() {
            Ok(n) => UserId::Num(n),
            Err(_) => UserId::Text(raw.to_string()),
        })
    }
}

impl From<u64> for UserId {
    fn from(id: u64) -> Self {
        UserId::Num(id)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserId::Num(n) => write!(f, "{n}"),
            UserId::Text(s) => f.write_str(s),
        }
    }
}

// ========================
// Status & Priority
// ========================

/// Workflow status; decides which column a task lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Status {
    #[default]
    ToDo,
    InProgress,
    NeedReview,
    Done,
}

impl Status {
    /// All statuses in column order
    pub const ALL: [Status; 4] = [Status::ToDo, Status::InProgress, Status::NeedReview, Status::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::ToDo => "to-do",
            Status::InProgress => "in-progress",
            Status::NeedReview => "need-review",
            Status::Done => "done",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Status::ToDo => "To Do",
            Status::InProgress => "In Progress",
            Status::NeedReview => "Need Review",
            Status::Done => "Done",
        }
    }

    /// Strict parse, `None` for anything outside the four known values
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "to-do" => Some(Status::ToDo),
            "in-progress" => Some(Status::InProgress),
            "need-review" => Some(Status::NeedReview),
            "done" => Some(Status::Done),
            _ => None,
        }
    }

    /// Unknown or empty text normalizes to to-do
    pub fn parse_lenient(raw: &str) -> Self {
        Self::parse(raw).unwrap_or_default()
    }

    /// Position in [`Status::ALL`]
    pub fn index(&self) -> usize {
        match self {
            Status::ToDo => 0,
            Status::InProgress => 1,
            Status::NeedReview => 2,
            Status::Done => 3,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Status::parse_lenient).unwrap_or_default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

impl Priority {
    pub const ALL: [Priority; 4] = [Priority::Low, Priority::Normal, Priority::High, Priority::Urgent];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Normal => "normal",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Normal => "Normal",
            Priority::High => "High",
            Priority::Urgent => "Urgent",
        }
    }

    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim() {
            "low" => Priority::Low,
            "high" => Priority::High,
            "urgent" => Priority::Urgent,
            _ => Priority::Normal,
        }
    }
}

impl Serialize for Priority {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Priority::parse_lenient).unwrap_or_default())
    }
}

// ========================
// Entities
// ========================

/// User embedded in a task response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignedUser {
    pub id: UserId,
    #[serde(default)]
    pub name: Option<String>,
}

/// A unit of work on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, alias = "assignedTo", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_user: Option<AssignedUser>,
    #[serde(default, with = "due_date", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: Status,
    /// Status held right before the task entered done.
    /// Local only: set on the transition into done, cleared on the way out.
    #[serde(skip)]
    pub previous_status: Option<Status>,
}

impl Task {
    pub fn new(id: impl Into<TaskId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            user_id: None,
            assigned_user: None,
            due_date: None,
            priority: Priority::Normal,
            status: Status::ToDo,
            previous_status: None,
        }
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Assigned user id, whichever form the service used
    pub fn assignee_id(&self) -> Option<&UserId> {
        self.user_id
            .as_ref()
            .or_else(|| self.assigned_user.as_ref().map(|u| &u.id))
    }

    /// Due strictly before `today` and not yet done
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status != Status::Done && self.due_date.is_some_and(|due| due < today)
    }

    /// Apply a partial update in place, running the done shadow lifecycle
    pub fn apply(&mut self, patch: &TaskPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = (!description.is_empty()).then(|| description.clone());
        }
        match &patch.user_id {
            Some(Some(user_id)) => {
                if self.assigned_user.as_ref().is_some_and(|u| &u.id != user_id) {
                    self.assigned_user = None;
                }
                self.user_id = Some(user_id.clone());
            }
            Some(None) => {
                self.user_id = None;
                self.assigned_user = None;
            }
            None => {}
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(status) = patch.status {
            workflow::transition(self, status);
        }
    }
}

/// Team member shown on the board and offered for assignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
}

// ========================
// Payloads
// ========================

/// Create payload for `POST /task/add`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    #[serde(with = "due_date", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub priority: Priority,
    pub status: Status,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Result<Self, DraftError> {
        let draft = Self {
            title: title.into(),
            description: None,
            user_id: None,
            due_date: None,
            priority: Priority::default(),
            status: Status::default(),
        };
        draft.validate()
    }

    /// Trims the title and rejects an empty one
    pub fn validate(mut self) -> Result<Self, DraftError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(DraftError::EmptyTitle);
        }
        self.title = title.to_string();
        if self.description.as_deref().is_some_and(str::is_empty) {
            self.description = None;
        }
        Ok(self)
    }

    /// Local representation shown while the create request is in flight
    pub fn to_task(&self, id: TaskId) -> Task {
        let mut task = Task::new(id, self.title.clone());
        task.description = self.description.clone();
        task.user_id = self.user_id.clone();
        task.due_date = self.due_date;
        task.priority = self.priority;
        task.status = self.status;
        task
    }
}

/// Partial update for `PUT /task/update/{id}`; only present fields go on the wire
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `Some(None)` unassigns the task
    #[serde(serialize_with = "clearable_user", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Option<UserId>>,
    /// `Some(None)` removes the due date
    #[serde(serialize_with = "due_date::serialize_clearable", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

impl TaskPatch {
    pub fn status(status: Status) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Full-field update as sent by the edit form
    pub fn from_draft(draft: &NewTask) -> Self {
        Self {
            title: Some(draft.title.clone()),
            description: Some(draft.description.clone().unwrap_or_default()),
            user_id: Some(draft.user_id.clone()),
            due_date: Some(draft.due_date),
            priority: Some(draft.priority),
            status: Some(draft.status),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Fold a later patch into this one; fields set in `later` win
    pub fn merge(&mut self, later: TaskPatch) {
        self.title = later.title.or(self.title.take());
        self.description = later.description.or(self.description.take());
        self.user_id = later.user_id.or(self.user_id.take());
        self.due_date = later.due_date.or(self.due_date.take());
        self.priority = later.priority.or(self.priority.take());
        self.status = later.status.or(self.status.take());
    }
}

/// A cleared assignee goes out as `""`, the service's "nobody"
fn clearable_user<S: Serializer>(user_id: &Option<Option<UserId>>, serializer: S) -> Result<S::Ok, S::Error> {
    match user_id {
        Some(Some(id)) => id.serialize(serializer),
        _ => serializer.serialize_str(""),
    }
}

/// Create payload for `POST /user/add`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewUser {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
}

impl NewUser {
    pub fn new(name: &str, phone: &str, designation: &str) -> Result<Self, DraftError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DraftError::EmptyMemberName);
        }
        let optional = |s: &str| {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        };
        Ok(Self {
            name: name.to_string(),
            phone: optional(phone),
            designation: optional(designation),
        })
    }
}

/// Due dates travel as `YYYY-MM-DD`; responses may carry a full timestamp
mod due_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => serializer.serialize_str(&date.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    /// Patch form: a cleared date goes out as `""`
    pub fn serialize_clearable<S: Serializer>(date: &Option<Option<NaiveDate>>, serializer: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(Some(date)) => serializer.serialize_str(&date.format(FORMAT).to_string()),
            _ => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse))
    }

    pub fn parse(raw: &str) -> Option<NaiveDate> {
        let day = raw.trim().split('T').next()?;
        NaiveDate::parse_from_str(day, FORMAT).ok()
    }
}

pub use due_date::parse as parse_due_date;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_task_decodes_service_shape() {
        let task: Task = serde_json::from_value(json!({
            "id": 7,
            "title": "Write report",
            "description": "quarterly",
            "assignedUser": { "id": 3, "name": "ada" },
            "dueDate": "2024-05-01T00:00:00.000Z",
            "priority": "urgent",
            "status": "in-progress"
        }))
        .unwrap();

        assert_eq!(task.id, TaskId::Num(7));
        assert_eq!(task.assignee_id(), Some(&UserId::Num(3)));
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(task.priority, Priority::Urgent);
        assert_eq!(task.status, Status::InProgress);
        assert_eq!(task.previous_status, None);
    }

    #[test]
    fn test_missing_or_unknown_enums_fall_back_to_defaults() {
        let task: Task = serde_json::from_value(json!({
            "id": "abc",
            "title": "Loose",
            "status": "archived"
        }))
        .unwrap();
        assert_eq!(task.id, TaskId::Text("abc".to_string()));
        assert_eq!(task.status, Status::ToDo);
        assert_eq!(task.priority, Priority::Normal);

        let task: Task = serde_json::from_value(json!({ "id": 1, "title": "Bare", "status": null })).unwrap();
        assert_eq!(task.status, Status::ToDo);
        assert_eq!(task.due_date, None);
    }

    #[test]
    fn test_status_patch_serializes_only_status() {
        let body = serde_json::to_value(TaskPatch::status(Status::NeedReview)).unwrap();
        assert_eq!(body, json!({ "status": "need-review" }));
    }

    #[test]
    fn test_previous_status_never_goes_on_the_wire() {
        let mut task = Task::new(1, "Ship").with_status(Status::InProgress);
        task.apply(&TaskPatch::status(Status::Done));
        assert_eq!(task.previous_status, Some(Status::InProgress));

        let body = serde_json::to_value(&task).unwrap();
        assert!(body.get("previousStatus").is_none());
        assert_eq!(body["status"], "done");
    }

    #[test]
    fn test_new_task_requires_title() {
        assert_eq!(NewTask::new("   "), Err(DraftError::EmptyTitle));
        assert_eq!(NewTask::new("  Plan sprint ").unwrap().title, "Plan sprint");
    }

    #[test]
    fn test_new_task_payload() {
        let mut draft = NewTask::new("Plan").unwrap();
        draft.user_id = Some(UserId::Num(4));
        draft.due_date = NaiveDate::from_ymd_opt(2024, 1, 9);
        let body = serde_json::to_value(&draft).unwrap();
        assert_eq!(
            body,
            json!({
                "title": "Plan",
                "userId": 4,
                "dueDate": "2024-01-09",
                "priority": "normal",
                "status": "to-do"
            })
        );
    }

    #[test]
    fn test_reassigning_drops_stale_embedded_user() {
        let mut task: Task = serde_json::from_value(json!({
            "id": 1, "title": "x", "assignedUser": { "id": 3, "name": "ada" }
        }))
        .unwrap();
        task.apply(&TaskPatch { user_id: Some(Some(UserId::Num(5))), ..Default::default() });
        assert_eq!(task.assigned_user, None);
        assert_eq!(task.assignee_id(), Some(&UserId::Num(5)));
    }

    #[test]
    fn test_edit_can_clear_assignee_and_due_date() {
        let mut task = Task::new(1, "a").with_due_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        task.user_id = Some(UserId::Num(3));
        task.assigned_user = Some(AssignedUser { id: UserId::Num(3), name: Some("ada".to_string()) });

        let draft = NewTask::new("a").unwrap();
        let patch = TaskPatch::from_draft(&draft);
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({
                "title": "a",
                "description": "",
                "userId": "",
                "dueDate": "",
                "priority": "normal",
                "status": "to-do"
            })
        );

        task.apply(&patch);
        assert_eq!(task.user_id, None);
        assert_eq!(task.assigned_user, None);
        assert_eq!(task.due_date, None);
    }

    #[test]
    fn test_untouched_fields_stay_off_the_wire() {
        let mut task = Task::new(1, "a").with_due_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        task.user_id = Some(UserId::Num(3));
        task.apply(&TaskPatch::status(Status::InProgress));
        assert_eq!(task.user_id, Some(UserId::Num(3)));
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2024, 1, 1));
    }

    #[test]
    fn test_merge_keeps_latest_value_per_field() {
        let mut patch = TaskPatch::status(Status::InProgress);
        patch.merge(TaskPatch { title: Some("b".to_string()), ..Default::default() });
        patch.merge(TaskPatch { user_id: Some(None), ..TaskPatch::status(Status::Done) });
        assert_eq!(patch.title.as_deref(), Some("b"));
        assert_eq!(patch.status, Some(Status::Done));
        assert_eq!(patch.user_id, Some(None));
        assert_eq!(patch.priority, None);
    }

    #[test]
    fn test_overdue() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let yesterday = NaiveDate::from_ymd_opt(2024, 6, 9).unwrap();
        let task = Task::new(1, "late").with_due_date(yesterday);
        assert!(task.is_overdue(today));
        assert!(!task.clone().with_status(Status::Done).is_overdue(today));
        assert!(!Task::new(2, "today").with_due_date(today).is_overdue(today));
        assert!(!Task::new(3, "undated").is_overdue(today));
    }

    #[test]
    fn test_id_parsing() {
        assert_eq!("12".parse::<TaskId>().unwrap(), TaskId::Num(12));
        assert_eq!("a-1".parse::<TaskId>().unwrap(), TaskId::Text("a-1".to_string()));
        assert_eq!(UserId::parse(" "), None);
        assert_eq!(UserId::parse("9"), Some(UserId::Num(9)));
    }

    #[test]
    fn test_due_date_parse() {
        assert_eq!(parse_due_date("2024-02-29"), NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(parse_due_date(""), None);
        assert_eq!(parse_due_date("soon"), None);
    }
}
