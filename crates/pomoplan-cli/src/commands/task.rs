//! Task management commands.

use clap::Subcommand;

use pomoplan_core::{estimator, Config, Database, Task};

use crate::common;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Add {
        /// Task title
        title: String,
        /// Task description
        #[arg(long)]
        description: Option<String>,
        /// Estimated pomodoros; omitted means the estimator decides
        #[arg(long)]
        estimate: Option<u32>,
    },
    /// List tasks, newest first
    List,
    /// Get task details
    Get {
        /// Task ID
        id: String,
    },
    /// Update a task
    Update {
        /// Task ID
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
        /// New estimated pomodoros
        #[arg(long)]
        estimate: Option<u32>,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
    /// Bind a task to the timer so completed work phases credit it
    Use {
        /// Task ID, or "none" to unbind
        id: String,
    },
    /// Print the estimate for task text without creating anything
    Estimate {
        /// Task title
        title: String,
        /// Task description
        #[arg(long)]
        description: Option<String>,
    },
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let config = Config::load_or_default();
    let user = common::current_user(&db, &config)?;

    match action {
        TaskAction::Add {
            title,
            description,
            estimate,
        } => {
            let estimated = estimate.unwrap_or_else(|| {
                if config.estimator.auto {
                    estimator::estimate(&title, description.as_deref())
                } else {
                    1
                }
            });
            let task = Task::new(&user.id, title, description, estimated);
            db.create_task(&task)?;
            println!("Task created: {}", task.id);
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::List => {
            let tasks = db.list_tasks(&user.id)?;
            println!("{}", serde_json::to_string_pretty(&tasks)?);
        }
        TaskAction::Get { id } => match db.get_task(&user.id, &id)? {
            Some(task) => println!("{}", serde_json::to_string_pretty(&task)?),
            None => println!("Task not found: {id}"),
        },
        TaskAction::Update {
            id,
            title,
            description,
            estimate,
        } => {
            let mut task = db
                .get_task(&user.id, &id)?
                .ok_or(format!("Task not found: {id}"))?;

            if let Some(t) = title {
                task.title = t;
            }
            if let Some(d) = description {
                task.description = Some(d);
            }
            if let Some(e) = estimate {
                task.estimated_pomodoros = e.max(1);
            }

            db.update_task(&task)?;
            println!("Task updated:");
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::Delete { id } => {
            db.delete_task(&user.id, &id)?;
            println!("Task deleted: {id}");
        }
        TaskAction::Use { id } => {
            let settings = db.get_or_create_settings(&user.id)?;
            let (mut engine, _) = super::timer::load_engine(&db, &settings);
            if id == "none" {
                engine.set_task(None);
                println!("Timer unbound from task");
            } else {
                let task = db
                    .get_task(&user.id, &id)?
                    .ok_or(format!("Task not found: {id}"))?;
                engine.set_task(Some(task.id.clone()));
                println!("Timer bound to task: {}", task.title);
            }
            super::timer::save_engine(&db, &engine)?;
        }
        TaskAction::Estimate { title, description } => {
            let estimated = estimator::estimate(&title, description.as_deref());
            println!("{estimated}");
        }
    }
    Ok(())
}
