//! Task commands

use crate::{
    cli::{OutputFormat, TaskCommand},
    error::{CliError, CliResult},
    utils::{truncate_text, ColoredOutput},
};
use taskdesk_client::services::{NewTask, Task, TaskService, TaskUpdate};
use taskdesk_client::ApiClient;

pub struct TasksCommand;

impl TasksCommand {
    pub async fn run(client: ApiClient, action: TaskCommand) -> CliResult<()> {
        let service = TaskService::new(client);

        match action {
            TaskCommand::List { filter, format } => {
                let tasks = service.fetch_tasks(filter).await?;
                match format {
                    OutputFormat::Table => Self::display_tasks_table(&tasks),
                    _ => println!("{}", format.format_json(&serde_json::to_value(&tasks)?)?),
                }
            }
            TaskCommand::Create {
                title,
                description,
                due_date,
            } => {
                let created = service
                    .create_task(&NewTask {
                        title,
                        description,
                        due_date,
                    })
                    .await?;
                if let Some(task) = created {
                    println!("{}", ColoredOutput::highlight(&task.entity_id));
                }
            }
            TaskCommand::Update {
                id,
                title,
                description,
                due_date,
            } => {
                let update = TaskUpdate {
                    title,
                    description,
                    due_date,
                    is_completed: None,
                };
                if update == TaskUpdate::default() {
                    return Err(CliError::InvalidArgument(
                        "nothing to update; pass --title, --description or --due-date".to_string(),
                    ));
                }
                service.update_task(&id, &update).await?;
            }
            TaskCommand::Complete { id, undo } => {
                service.mark_complete(&id, !undo).await?;
            }
            TaskCommand::Delete { id } => {
                service.delete_task(&id).await?;
            }
        }

        Ok(())
    }

    fn display_tasks_table(tasks: &[Task]) {
        if tasks.is_empty() {
            println!("{}", ColoredOutput::warning("No tasks found"));
            return;
        }

        println!(
            "{:<12} {:<6} {:<40} {}",
            "ID", "DONE", "TITLE", "DUE"
        );
        println!("{}", "-".repeat(72));

        for task in tasks {
            let done = if task.is_completed { "yes" } else { "no" };
            let due = task.due_date.as_deref().unwrap_or("-");
            let due = if !task.is_completed && task.is_overdue() {
                ColoredOutput::error(due)
            } else {
                ColoredOutput::dim(due)
            };
            println!(
                "{:<12} {:<6} {:<40} {}",
                truncate_text(&task.entity_id, 12),
                done,
                truncate_text(&task.title, 40),
                due
            );
        }
    }
}
