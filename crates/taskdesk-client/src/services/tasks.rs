use super::open_envelope;
use crate::error::ApiResult;
use crate::http::ApiClient;
use crate::notify::Notification;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;

const TASKS_PATH: &str = "/task/";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(deserialize_with = "id_as_string")]
    pub entity_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub is_completed: bool,
}

impl Task {
    /// A task is overdue once its due date has passed. Completion is ignored.
    pub fn is_overdue_at(&self, now: DateTime<Utc>) -> bool {
        self.due_date
            .as_deref()
            .and_then(parse_due_date)
            .map(|due| due < now)
            .unwrap_or(false)
    }

    pub fn is_overdue(&self) -> bool {
        self.is_overdue_at(Utc::now())
    }
}

/// Accepts RFC 3339 timestamps, naive timestamps and plain dates (UTC)
fn parse_due_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match JsonValue::deserialize(deserializer)? {
        JsonValue::String(s) => Ok(s),
        JsonValue::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "invalid task id: {}",
            other
        ))),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

/// Partial update; unset fields are left alone by the server
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TaskFilter {
    #[default]
    All,
    Completed,
    Incomplete,
}

impl TaskFilter {
    fn query(&self) -> &'static str {
        match self {
            TaskFilter::All => "",
            TaskFilter::Completed => "?status=completed",
            TaskFilter::Incomplete => "?status=incomplete",
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Completed => task.is_completed,
            TaskFilter::Incomplete => !task.is_completed,
        }
    }

    /// Filter an already fetched list locally
    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        tasks.iter().filter(|t| self.matches(t)).collect()
    }
}

impl fmt::Display for TaskFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TaskFilter::All => "all",
            TaskFilter::Completed => "completed",
            TaskFilter::Incomplete => "incomplete",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for TaskFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(TaskFilter::All),
            "completed" => Ok(TaskFilter::Completed),
            "incomplete" => Ok(TaskFilter::Incomplete),
            other => Err(format!(
                "unknown filter '{}', expected all, completed or incomplete",
                other
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TaskList {
    #[serde(default)]
    tasks: Vec<Task>,
}

/// Create, update and complete replies; `task` may be omitted
#[derive(Debug, Deserialize)]
struct ChangedTask {
    #[serde(default)]
    task: Option<Task>,
}

#[derive(Debug, Deserialize)]
struct Empty {}

/// Task CRUD over the `/task/` endpoints
#[derive(Clone)]
pub struct TaskService {
    client: ApiClient,
}

impl TaskService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn fetch_tasks(&self, filter: TaskFilter) -> ApiResult<Vec<Task>> {
        let path = format!("{}{}", TASKS_PATH, filter.query());
        let response = self.client.get(&path).await?;
        let envelope = open_envelope::<TaskList>(
            &response,
            "Failed to fetch tasks",
            self.client.notifier().as_ref(),
        )?;
        tracing::debug!(filter = %filter, count = envelope.data.tasks.len(), "Fetched tasks");
        Ok(envelope.data.tasks)
    }

    pub async fn create_task(&self, task: &NewTask) -> ApiResult<Option<Task>> {
        let response = self.client.post(TASKS_PATH, task).await?;
        let envelope = open_envelope::<ChangedTask>(
            &response,
            "Failed to create task",
            self.client.notifier().as_ref(),
        )?;
        self.confirm("Task created successfully!");
        Ok(envelope.data.task)
    }

    pub async fn update_task(&self, id: &str, update: &TaskUpdate) -> ApiResult<Option<Task>> {
        let response = self.client.put(&task_path(id), update).await?;
        let envelope = open_envelope::<ChangedTask>(
            &response,
            "Failed to update task",
            self.client.notifier().as_ref(),
        )?;
        self.confirm("Task updated successfully!");
        Ok(envelope.data.task)
    }

    pub async fn delete_task(&self, id: &str) -> ApiResult<()> {
        let response = self.client.delete(&task_path(id)).await?;
        open_envelope::<Empty>(
            &response,
            "Failed to delete task",
            self.client.notifier().as_ref(),
        )?;
        self.confirm("Task deleted successfully!");
        Ok(())
    }

    /// Completing uses the dedicated endpoint; undoing is a plain update.
    pub async fn mark_complete(&self, id: &str, completed: bool) -> ApiResult<Option<Task>> {
        let response = if completed {
            self.client.patch(&format!("{}/complete", task_path(id))).await?
        } else {
            let update = TaskUpdate {
                is_completed: Some(false),
                ..TaskUpdate::default()
            };
            self.client.put(&task_path(id), &update).await?
        };

        let envelope = open_envelope::<ChangedTask>(
            &response,
            "Failed to update task status",
            self.client.notifier().as_ref(),
        )?;
        self.confirm(if completed {
            "Task marked as complete!"
        } else {
            "Task marked as incomplete!"
        });
        Ok(envelope.data.task)
    }

    fn confirm(&self, message: &str) {
        self.client.notifier().notify(Notification::positive(message));
    }
}

fn task_path(id: &str) -> String {
    format!("{}{}", TASKS_PATH, id)
}
